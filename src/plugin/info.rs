//! 插件元数据：四条固定字符串，宿主按序号查询。

/// `[API 版本, 插件名, 扩展名通配, 文件类型描述]`
pub const PLUGIN_INFO: [&str; 4] = [
    "00IN",
    "PNG Plugin for Susie Image Viewer",
    "*.png",
    "PNG file (*.png)",
];

pub fn plugin_info(index: usize) -> Option<&'static str> {
    PLUGIN_INFO.get(index).copied()
}

/// 把第 `index` 条信息拷入宿主缓冲，超长截断并以 NUL 结尾。
///
/// 返回写入的字节数（不含 NUL）；序号越界或缓冲为空时返回 0。
pub fn copy_plugin_info(index: usize, dst: &mut [u8]) -> usize {
    let Some(text) = plugin_info(index) else {
        return 0;
    };
    let Some(capacity) = dst.len().checked_sub(1) else {
        return 0;
    };

    let length = text.len().min(capacity);
    dst[..length].copy_from_slice(&text.as_bytes()[..length]);
    dst[length] = 0;
    length
}

//! # 错误模型模块
//!
//! ## 设计思路
//!
//! 使用单一错误枚举承载转换链路中的所有失败来源，避免字符串拼接式错误处理。
//! 通过 `thiserror` 保持人类可读错误，同时让插件层可按分支映射为宿主状态码。
//!
//! 所有失败都只影响单次调用：没有重试，也不会向宿主暴露半成品缓冲。

/// 转换链路统一错误类型。
///
/// 在插件层会被映射为 Susie 状态码（见 `plugin::status`）。
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// 解码器上下文无法建立。
    #[error("解码器初始化失败：{0}")]
    DecoderInitFailed(String),

    /// PNG 数据损坏、截断或含有解码器拒绝的内容。
    #[error("解码错误：{0}")]
    DecodeFailed(String),

    /// 解码结果的颜色类型不在支持范围内。
    #[error("不支持的颜色类型：{0}")]
    UnsupportedFormat(String),

    /// 光栅或宿主缓冲分配失败，或超过配置的资源上限。
    #[error("内存不足：{0}")]
    OutOfMemory(String),

    /// 宿主缓冲已分配但无法锁定写入。
    #[error("宿主内存错误：{0}")]
    HostMemory(String),

    /// 文件模式下读取输入失败。
    #[error("文件读取错误：{0}")]
    FileRead(String),

    /// 调用方通过进度回调请求取消。
    #[error("已被调用方取消")]
    Abort,
}

impl From<png::DecodingError> for ConvertError {
    fn from(error: png::DecodingError) -> Self {
        match error {
            png::DecodingError::LimitsExceeded => {
                Self::OutOfMemory("解码所需内存超过上限".to_string())
            }
            other => Self::DecodeFailed(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ConvertError;

    #[test]
    fn limits_exceeded_maps_to_out_of_memory() {
        let error = ConvertError::from(png::DecodingError::LimitsExceeded);
        assert!(matches!(error, ConvertError::OutOfMemory(_)));
    }

    #[test]
    fn io_errors_map_to_decode_failed() {
        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof");
        let error = ConvertError::from(png::DecodingError::IoError(io));
        assert!(matches!(error, ConvertError::DecodeFailed(_)));
    }

    #[test]
    fn display_keeps_detail() {
        let message = ConvertError::DecodeFailed("CRC error".to_string()).to_string();
        assert_eq!(message, "解码错误：CRC error");
    }
}

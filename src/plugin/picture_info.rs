//! 宿主 `PictureInfo` 结构（1 字节对齐）。

use std::ffi::c_void;

use crate::converter::PictureSummary;

#[repr(C, packed)]
#[derive(Debug, Clone, Copy)]
pub struct PictureInfo {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
    pub x_density: u16,
    pub y_density: u16,
    pub color_depth: i16,
    /// 附加文本信息句柄；本插件不提供，恒为空。
    pub h_info: *mut c_void,
}

impl From<PictureSummary> for PictureInfo {
    fn from(summary: PictureSummary) -> Self {
        Self {
            left: summary.left,
            top: summary.top,
            width: summary.width.min(i32::MAX as u32) as i32,
            height: summary.height.min(i32::MAX as u32) as i32,
            x_density: summary.x_density,
            y_density: summary.y_density,
            color_depth: summary.color_depth as i16,
            h_info: std::ptr::null_mut(),
        }
    }
}

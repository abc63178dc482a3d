//! # 宿主插件接口（plugin）
//!
//! 与宿主约定相关的部分：元数据字符串、格式嗅探、状态码、`PictureInfo` 布局，
//! 以及仅在 Windows 上编译的导出函数（`ffi`）。

pub mod info;
pub mod picture_info;
pub mod sniff;
pub mod status;

#[cfg(windows)]
pub mod ffi;

pub use info::{PLUGIN_INFO, copy_plugin_info, plugin_info};
pub use picture_info::PictureInfo;
pub use sniff::is_supported;
pub use status::SpiStatus;

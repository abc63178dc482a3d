//! 统一错误类型模块
//!
//! # 设计思路
//!
//! 转换链路内部使用 `ConvertError`，宿主侧由 `plugin::status` 映射为状态码；
//! 命令行工具还会遇到参数与文件 I/O 错误，因此在顶层定义 `AppError` 统一承载。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - 为 `ConvertError` / `std::io::Error` 提供 `From` 转换，无需手动 map。
//! - 实现 `Serialize` 将错误序列化为字符串，便于 `--info` 以 JSON 输出失败原因。

use serde::Serialize;

use crate::converter::ConvertError;

/// 应用级统一错误类型
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 转换流水线错误（解码 / 打包）
    #[error("{0}")]
    Convert(#[from] ConvertError),

    /// 文件系统 I/O 错误
    #[error("文件系统错误: {0}")]
    Io(#[from] std::io::Error),

    /// 命令行参数错误
    #[error("参数错误: {0}")]
    Usage(String),

    /// 输出序列化失败
    #[error("序列化失败: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

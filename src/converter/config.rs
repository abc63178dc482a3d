//! # 配置模块
//!
//! ## 设计思路
//!
//! 将所有“可调阈值”集中到 `ConvertConfig`，保证插件行为可观测、可调整、可测试。
//! 宿主进程无法向插件传参，因此配置来源只有两个：内置默认值与可选的 JSON 文件。
//!
//! ## 实现思路
//!
//! - `Default` 提供生产可用的上限。
//! - `load_from_path` 读取 JSON；文件缺失或格式错误时回退默认值，不让插件因配置失效。
//! - `from_env_with` 通过注入的查找函数读取 `SPI_PNG_CONFIG`，测试无需修改进程环境变量。

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::ConvertError;

/// 指向 JSON 配置文件的环境变量名。
pub const CONFIG_ENV_VAR: &str = "SPI_PNG_CONFIG";

/// 转换配置。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    /// 文件模式下允许读取的最大输入体积（字节）。
    pub max_input_size: u64,
    /// 解码后的像素上限（`width * height`）。
    pub max_decoded_pixels: u64,
    /// 解码阶段允许的内存上限（按 BGRA 估算，字节），同时作为解码器的内部上限。
    pub max_decoded_bytes: u64,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            max_input_size: 512 * 1024 * 1024,
            max_decoded_pixels: 16_384 * 16_384,
            max_decoded_bytes: 1024 * 1024 * 1024,
        }
    }
}

impl ConvertConfig {
    /// 从 JSON 文件加载配置。
    ///
    /// 读取或解析失败时记录警告并返回默认值。
    pub fn load_from_path(path: &Path) -> Self {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                log::warn!("⚠️ 读取配置文件失败，使用默认配置 - 路径: {} 错误: {}", path.display(), e);
                return Self::default();
            }
        };

        let parsed = serde_json::from_str::<Self>(&content)
            .map_err(|e| ConvertError::DecoderInitFailed(format!("解析配置文件失败: {}", e)))
            .and_then(|config| config.validate().map(|_| config));

        match parsed {
            Ok(config) => {
                log::debug!("⚙️ 已加载配置文件 - 路径: {} {:?}", path.display(), config);
                config
            }
            Err(e) => {
                log::warn!("⚠️ {}，使用默认配置", e);
                Self::default()
            }
        }
    }

    /// 根据环境变量定位配置文件。
    ///
    /// `lookup` 通常为 `|key| std::env::var(key).ok()`。
    pub fn from_env_with<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        match lookup(CONFIG_ENV_VAR) {
            Some(path) if !path.trim().is_empty() => Self::load_from_path(Path::new(path.trim())),
            _ => Self::default(),
        }
    }

    /// 从当前进程环境读取配置。
    pub fn from_env() -> Self {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// 校验阈值是否可用。
    pub fn validate(&self) -> Result<(), ConvertError> {
        if self.max_input_size == 0 {
            return Err(ConvertError::DecoderInitFailed("max_input_size 不能为 0".to_string()));
        }
        if self.max_decoded_pixels == 0 {
            return Err(ConvertError::DecoderInitFailed("max_decoded_pixels 不能为 0".to_string()));
        }
        if self.max_decoded_bytes == 0 {
            return Err(ConvertError::DecoderInitFailed("max_decoded_bytes 不能为 0".to_string()));
        }
        Ok(())
    }

    /// 校验图片尺寸是否在像素与内存上限之内。
    pub(crate) fn check_dimensions(&self, width: u32, height: u32) -> Result<(), ConvertError> {
        let pixels = (width as u64)
            .checked_mul(height as u64)
            .ok_or_else(|| ConvertError::OutOfMemory("图片像素数溢出".to_string()))?;

        if pixels > self.max_decoded_pixels {
            return Err(ConvertError::OutOfMemory(format!(
                "图片像素过大：{} 像素（限制：{} 像素）",
                pixels, self.max_decoded_pixels
            )));
        }

        let estimated = pixels
            .checked_mul(4)
            .ok_or_else(|| ConvertError::OutOfMemory("图片解码内存估算溢出".to_string()))?;

        if estimated > self.max_decoded_bytes {
            return Err(ConvertError::OutOfMemory(format!(
                "图片解码预计内存过大：{:.2} MB（限制：{:.2} MB）",
                estimated as f64 / 1024.0 / 1024.0,
                self.max_decoded_bytes as f64 / 1024.0 / 1024.0
            )));
        }

        Ok(())
    }
}

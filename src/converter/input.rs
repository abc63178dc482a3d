//! # 输入来源
//!
//! 宿主以两种方式提供图片：
//! - 内存模式：整份 PNG 已读入内存
//! - 文件模式：给出文件路径与起始偏移（例如归档内嵌的图片）
//!
//! 文件模式在读取前校验体积上限，读取失败映射为 `FileRead`。

use std::borrow::Cow;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use super::{ConvertConfig, ConvertError};

/// 宿主 `flag` 参数中标识输入类型的低 3 位。
pub const INPUT_KIND_MASK: u32 = 0x7;

/// 宿主输入类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    File,
    Memory,
}

impl InputKind {
    /// 解析宿主 `flag`；未知取值返回 `None`。
    pub fn from_flag(flag: u32) -> Option<Self> {
        match flag & INPUT_KIND_MASK {
            0 => Some(Self::File),
            1 => Some(Self::Memory),
            _ => None,
        }
    }
}

/// 一次调用的输入。
#[derive(Debug, Clone)]
pub enum InputSource<'a> {
    Memory(&'a [u8]),
    File { path: PathBuf, offset: u64 },
}

impl<'a> InputSource<'a> {
    pub fn file(path: impl AsRef<Path>, offset: u64) -> Self {
        Self::File {
            path: path.as_ref().to_path_buf(),
            offset,
        }
    }

    /// 取得整份 PNG 字节；内存模式不拷贝。
    pub fn load(&self, config: &ConvertConfig) -> Result<Cow<'a, [u8]>, ConvertError> {
        match self {
            Self::Memory(bytes) => Ok(Cow::Borrowed(*bytes)),
            Self::File { path, offset } => read_file_from(path, *offset, config).map(Cow::Owned),
        }
    }
}

fn read_file_from(path: &Path, offset: u64, config: &ConvertConfig) -> Result<Vec<u8>, ConvertError> {
    log::debug!("📁 读取图片文件 - 路径: {} 偏移: {}", path.display(), offset);

    let mut file = File::open(path)
        .map_err(|e| ConvertError::FileRead(format!("无法打开文件 {}：{}", path.display(), e)))?;
    let total = file
        .metadata()
        .map_err(|e| ConvertError::FileRead(format!("无法读取文件信息：{}", e)))?
        .len();

    let length = total.checked_sub(offset).ok_or_else(|| {
        ConvertError::FileRead(format!("偏移 {} 超出文件长度 {}", offset, total))
    })?;

    if length > config.max_input_size {
        return Err(ConvertError::OutOfMemory(format!(
            "文件过大：{:.2} MB（限制：{:.2} MB）",
            length as f64 / 1024.0 / 1024.0,
            config.max_input_size as f64 / 1024.0 / 1024.0
        )));
    }

    file.seek(SeekFrom::Start(offset))
        .map_err(|e| ConvertError::FileRead(format!("定位偏移失败：{}", e)))?;

    let mut bytes = Vec::new();
    bytes
        .try_reserve_exact(length as usize)
        .map_err(|e| ConvertError::OutOfMemory(format!("无法分配输入缓冲：{}", e)))?;
    file.take(length)
        .read_to_end(&mut bytes)
        .map_err(|e| ConvertError::FileRead(format!("读取文件失败：{}", e)))?;

    Ok(bytes)
}

//! # 宿主状态码
//!
//! ## 设计思路
//!
//! 宿主只认识整型状态码。`SpiStatus` 固定这些取值，`From<&ConvertError>`
//! 负责把内部错误分支映射过去，导出函数里不再散落魔法数字。

use crate::converter::ConvertError;

/// 插件 API 返回码。
///
/// 旧版插件对 `GetPicture` / `GetPictureInfo` 的所有解码失败都返回 `MemoryError`（5）；
/// 这里按错误分支细分：数据损坏为 `OutOfOrder`（3），颜色类型不支持为 `NotSupport`（2），
/// 只有解码器初始化失败与宿主缓冲锁定失败仍为 `MemoryError`。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum SpiStatus {
    NoFunction = -1,
    AllRight = 0,
    Abort = 1,
    NotSupport = 2,
    OutOfOrder = 3,
    NoMemory = 4,
    MemoryError = 5,
    FileReadError = 6,
    WindowError = 7,
    OtherError = 8,
    EndError = 9,
}

impl SpiStatus {
    pub fn code(self) -> i32 {
        self as i32
    }
}

impl From<&ConvertError> for SpiStatus {
    fn from(error: &ConvertError) -> Self {
        match error {
            ConvertError::Abort => Self::Abort,
            ConvertError::UnsupportedFormat(_) => Self::NotSupport,
            ConvertError::DecodeFailed(_) => Self::OutOfOrder,
            ConvertError::OutOfMemory(_) => Self::NoMemory,
            ConvertError::DecoderInitFailed(_) | ConvertError::HostMemory(_) => Self::MemoryError,
            ConvertError::FileRead(_) => Self::FileReadError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_variants_map_to_host_codes() {
        let cases = [
            (ConvertError::Abort, 1),
            (ConvertError::UnsupportedFormat(String::new()), 2),
            (ConvertError::DecodeFailed(String::new()), 3),
            (ConvertError::OutOfMemory(String::new()), 4),
            (ConvertError::DecoderInitFailed(String::new()), 5),
            (ConvertError::HostMemory(String::new()), 5),
            (ConvertError::FileRead(String::new()), 6),
        ];

        for (error, code) in cases {
            assert_eq!(SpiStatus::from(&error).code(), code, "{error:?}");
        }
    }

    #[test]
    fn success_and_missing_entry_codes() {
        assert_eq!(SpiStatus::AllRight.code(), 0);
        assert_eq!(SpiStatus::NoFunction.code(), -1);
    }
}

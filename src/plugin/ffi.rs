//! # 宿主导出函数（Windows）
//!
//! ## 设计思路
//!
//! 本文件只做 ABI 适配：裸指针 → 切片 / 路径，`ConvertError` → 状态码，
//! 宿主缓冲由 `LocalSink`（`LocalAlloc` 可移动内存）提供。业务流程全部在 `converter` 中。
//!
//! ## 实现思路
//!
//! - 每个导出函数都经过 `guarded`：首次调用时初始化日志，并用 `catch_unwind`
//!   拦截 panic，保证任何异常都不会展开到宿主进程。
//! - 输出句柄在入口处先置空，失败路径上宿主不会拿到悬空句柄。
//! - 转换器配置在首次使用时从 `SPI_PNG_CONFIG` 加载，之后只读共享。
//!
//! ## 错误日志字段约定
//!
//! 失败日志统一带上 `entry`（导出函数名）与 `status`（返回给宿主的状态码）。

#![allow(non_snake_case)]

use std::ffi::{CStr, OsString, c_char, c_void};
use std::os::windows::ffi::OsStringExt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::PathBuf;
use std::ptr::copy_nonoverlapping;

use once_cell::sync::Lazy;
use windows::Win32::Foundation::{HANDLE, HLOCAL, LocalFree};
use windows::Win32::Globalization::{CP_ACP, MULTI_BYTE_TO_WIDE_CHAR_FLAGS, MultiByteToWideChar};
use windows::Win32::Storage::FileSystem::ReadFile;
use windows::Win32::System::Memory::{LMEM_MOVEABLE, LMEM_ZEROINIT, LocalAlloc, LocalLock, LocalUnlock};

use super::info::copy_plugin_info;
use super::picture_info::PictureInfo;
use super::sniff::{HEADER_PROBE_SIZE, PNG_SIGNATURE_PREFIX, is_supported};
use super::status::SpiStatus;
use crate::converter::{ConvertConfig, ConvertError, Converter, InputKind, InputSource, OutputSink, SinkError};
use crate::logging;

/// 宿主进度回调：返回非 0 表示取消。
pub type ProgressCallback = unsafe extern "system" fn(num: i32, denom: i32, user_data: isize) -> i32;

static CONVERTER: Lazy<Converter> = Lazy::new(|| Converter::new(ConvertConfig::from_env()));

/// `LocalAlloc` 可移动内存实现的宿主缓冲。
struct LocalSink;

impl OutputSink for LocalSink {
    type Block = HLOCAL;

    fn allocate(&mut self, len: usize, zeroed: bool) -> Result<HLOCAL, SinkError> {
        let flags = if zeroed {
            LMEM_MOVEABLE | LMEM_ZEROINIT
        } else {
            LMEM_MOVEABLE
        };
        unsafe { LocalAlloc(flags, len) }.map_err(|e| {
            log::warn!("LocalAlloc 失败: len={} hr=0x{:08X}", len, e.code().0 as u32);
            SinkError::Alloc { len }
        })
    }

    fn fill(&mut self, block: &mut HLOCAL, bytes: &[u8]) -> Result<(), SinkError> {
        unsafe {
            let ptr = LocalLock(*block) as *mut u8;
            if ptr.is_null() {
                return Err(SinkError::Lock);
            }
            copy_nonoverlapping(bytes.as_ptr(), ptr, bytes.len());
            let _ = LocalUnlock(*block);
        }
        Ok(())
    }

    fn release(&mut self, block: HLOCAL) {
        unsafe {
            let _ = LocalFree(Some(block));
        }
    }
}

fn guarded(entry: &str, f: impl FnOnce() -> SpiStatus) -> i32 {
    logging::init_plugin();

    let status = catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|_| {
        log::error!("💥 导出函数发生 panic: entry={}", entry);
        SpiStatus::OutOfOrder
    });

    if status != SpiStatus::AllRight {
        log::debug!("entry={} status={:?}", entry, status);
    }
    status.code()
}

/// 把宿主的 ANSI 路径转换为 `PathBuf`。
fn ansi_to_path(raw: &CStr) -> Result<PathBuf, ConvertError> {
    let bytes = raw.to_bytes();
    if bytes.is_empty() {
        return Err(ConvertError::FileRead("文件路径为空".to_string()));
    }

    let flags = MULTI_BYTE_TO_WIDE_CHAR_FLAGS(0);
    let needed = unsafe { MultiByteToWideChar(CP_ACP, flags, bytes, None) };
    if needed <= 0 {
        return Err(ConvertError::FileRead("文件路径编码转换失败".to_string()));
    }

    let mut wide = vec![0u16; needed as usize];
    let written = unsafe { MultiByteToWideChar(CP_ACP, flags, bytes, Some(&mut wide)) };
    if written <= 0 {
        return Err(ConvertError::FileRead("文件路径编码转换失败".to_string()));
    }
    wide.truncate(written as usize);

    Ok(PathBuf::from(OsString::from_wide(&wide)))
}

/// 根据 `flag` 解释 `buf`/`len`。
///
/// # Safety
/// 内存模式下 `buf` 必须指向至少 `len` 字节；文件模式下 `buf` 必须是 NUL 结尾字符串。
unsafe fn input_source<'a>(buf: *const c_char, len: isize, flag: u32) -> Result<InputSource<'a>, ConvertError> {
    if buf.is_null() {
        return Err(ConvertError::FileRead("输入指针为空".to_string()));
    }

    match InputKind::from_flag(flag) {
        Some(InputKind::Memory) => {
            let len = usize::try_from(len)
                .map_err(|_| ConvertError::DecodeFailed(format!("输入长度非法：{}", len)))?;
            Ok(InputSource::Memory(unsafe {
                std::slice::from_raw_parts(buf.cast::<u8>(), len)
            }))
        }
        Some(InputKind::File) => {
            let offset = u64::try_from(len)
                .map_err(|_| ConvertError::FileRead(format!("文件偏移非法：{}", len)))?;
            let path = ansi_to_path(unsafe { CStr::from_ptr(buf) })?;
            Ok(InputSource::file(path, offset))
        }
        None => Err(ConvertError::UnsupportedFormat(format!("未知输入类型 flag=0x{:X}", flag))),
    }
}

fn report(entry: &str, error: &ConvertError) -> SpiStatus {
    let status = SpiStatus::from(error);
    match error {
        ConvertError::Abort => log::info!("entry={} status={:?} {}", entry, status, error),
        _ => log::warn!("❌ entry={} status={:?} {}", entry, status, error),
    }
    status
}

/// 查询插件信息。
///
/// # Safety
/// `buf` 必须可写 `buflen` 字节。
#[unsafe(no_mangle)]
pub unsafe extern "system" fn GetPluginInfo(infono: i32, buf: *mut c_char, buflen: i32) -> i32 {
    let mut copied = 0i32;
    guarded("GetPluginInfo", || {
        let (Ok(index), Ok(capacity)) = (usize::try_from(infono), usize::try_from(buflen)) else {
            return SpiStatus::AllRight;
        };
        if buf.is_null() {
            return SpiStatus::AllRight;
        }
        let dst = unsafe { std::slice::from_raw_parts_mut(buf.cast::<u8>(), capacity) };
        copied = copy_plugin_info(index, dst) as i32;
        SpiStatus::AllRight
    });
    copied
}

/// 判断是否为可处理的 PNG。
///
/// `dw` 高位非 0 时是宿主读好的头部缓冲（至少 2KB），否则是文件句柄。
///
/// # Safety
/// `dw` 必须是有效的缓冲指针或文件句柄。
#[unsafe(no_mangle)]
pub unsafe extern "system" fn IsSupported(_filename: *const c_char, dw: usize) -> i32 {
    let mut supported = false;
    guarded("IsSupported", || {
        if dw & !0xFFFF != 0 {
            let probe = unsafe {
                std::slice::from_raw_parts(dw as *const u8, PNG_SIGNATURE_PREFIX.len())
            };
            supported = is_supported(probe);
        } else {
            let mut header = [0u8; HEADER_PROBE_SIZE];
            let mut read = 0u32;
            let result = unsafe {
                ReadFile(HANDLE(dw as *mut c_void), Some(&mut header), Some(&mut read as *mut u32), None)
            };
            match result {
                Ok(()) => supported = is_supported(&header[..read as usize]),
                Err(e) => log::warn!("ReadFile 失败: hr=0x{:08X}", e.code().0 as u32),
            }
        }
        SpiStatus::AllRight
    });
    supported as i32
}

/// 查询图片尺寸等信息（只解析头部）。
///
/// # Safety
/// 参数需满足 `input_source` 的约定，`lp_info` 必须可写。
#[unsafe(no_mangle)]
pub unsafe extern "system" fn GetPictureInfo(
    buf: *const c_char,
    len: isize,
    flag: u32,
    lp_info: *mut PictureInfo,
) -> i32 {
    guarded("GetPictureInfo", || {
        if lp_info.is_null() {
            return SpiStatus::OtherError;
        }

        let result = unsafe { input_source(buf, len, flag) }.and_then(|source| {
            let bytes = source.load(CONVERTER.config())?;
            CONVERTER.picture_info(&bytes)
        });

        match result {
            Ok(summary) => {
                unsafe { lp_info.write_unaligned(PictureInfo::from(summary)) };
                SpiStatus::AllRight
            }
            Err(e) => report("GetPictureInfo", &e),
        }
    })
}

/// 解码并返回 `BITMAPINFO` 与像素两个 `LocalAlloc` 句柄。
///
/// # Safety
/// 参数需满足 `input_source` 的约定，两个输出指针必须可写。
#[unsafe(no_mangle)]
pub unsafe extern "system" fn GetPicture(
    buf: *const c_char,
    len: isize,
    flag: u32,
    p_hb_info: *mut *mut c_void,
    p_hbm: *mut *mut c_void,
    progress: Option<ProgressCallback>,
    l_data: isize,
) -> i32 {
    guarded("GetPicture", || {
        if p_hb_info.is_null() || p_hbm.is_null() {
            return SpiStatus::OtherError;
        }
        unsafe {
            *p_hb_info = std::ptr::null_mut();
            *p_hbm = std::ptr::null_mut();
        }

        let source = match unsafe { input_source(buf, len, flag) } {
            Ok(source) => source,
            Err(e) => return report("GetPicture", &e),
        };
        let bytes = match source.load(CONVERTER.config()) {
            Ok(bytes) => bytes,
            Err(e) => return report("GetPicture", &e),
        };

        let on_progress = progress.map(|callback| {
            move |current: u32, total: u32| unsafe { callback(current as i32, total as i32, l_data) != 0 }
        });

        let mut sink = LocalSink;
        match CONVERTER.extract_picture(&bytes, &mut sink, on_progress) {
            Ok(delivered) => {
                unsafe {
                    *p_hb_info = delivered.info.0;
                    *p_hbm = delivered.data.0;
                }
                SpiStatus::AllRight
            }
            Err(e) => report("GetPicture", &e),
        }
    })
}

/// 预览图：未实现。
///
/// # Safety
/// 不访问任何参数。
#[unsafe(no_mangle)]
pub unsafe extern "system" fn GetPreview(
    _buf: *const c_char,
    _len: isize,
    _flag: u32,
    _p_hb_info: *mut *mut c_void,
    _p_hbm: *mut *mut c_void,
    _progress: Option<ProgressCallback>,
    _l_data: isize,
) -> i32 {
    SpiStatus::NoFunction.code()
}

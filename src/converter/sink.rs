//! # 输出缓冲接口
//!
//! ## 设计思路
//!
//! 宿主要求“信息头块 + 像素块”两块可移动内存，分配、锁定、写入、解锁都依赖宿主平台。
//! 核心流程只依赖 `OutputSink` 这个小接口，平台实现（Windows 的 `LocalAlloc`）放在插件层，
//! 测试则使用内存实现，不需要宿主分配器。
//!
//! ## 实现思路
//!
//! `deliver` 统一负责成对释放：任一块分配失败或写入失败，两块都会被释放后再返回错误，
//! 调用方永远看不到半成品。

use super::ConvertError;
use super::bitmap::{BITMAP_INFO_BLOCK_SIZE, BitmapContainer};

/// 宿主缓冲操作失败。
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("分配 {len} 字节失败")]
    Alloc { len: usize },

    #[error("锁定缓冲失败")]
    Lock,

    #[error("写入长度越界：块 {capacity} 字节，数据 {len} 字节")]
    Overflow { capacity: usize, len: usize },
}

impl From<SinkError> for ConvertError {
    fn from(error: SinkError) -> Self {
        match error {
            SinkError::Alloc { .. } => ConvertError::OutOfMemory(error.to_string()),
            SinkError::Lock | SinkError::Overflow { .. } => {
                ConvertError::HostMemory(error.to_string())
            }
        }
    }
}

/// 宿主缓冲分配器。
pub trait OutputSink {
    /// 宿主侧句柄。
    type Block;

    /// 申请 `len` 字节，`zeroed` 为真时内容清零。
    fn allocate(&mut self, len: usize, zeroed: bool) -> Result<Self::Block, SinkError>;

    /// 锁定块、从起始位置写入 `bytes`、解锁。
    fn fill(&mut self, block: &mut Self::Block, bytes: &[u8]) -> Result<(), SinkError>;

    /// 释放块。
    fn release(&mut self, block: Self::Block);
}

/// 成功交付给宿主的一对缓冲。
#[derive(Debug)]
pub struct DeliveredBitmap<B> {
    /// `BITMAPINFO` 块。
    pub info: B,
    /// 像素块。
    pub data: B,
}

impl<B> DeliveredBitmap<B> {
    /// 把两块都交还给分配器。
    pub fn release_into<S: OutputSink<Block = B>>(self, sink: &mut S) {
        sink.release(self.info);
        sink.release(self.data);
    }
}

/// 把容器写入宿主缓冲。
pub fn deliver<S: OutputSink>(
    container: &BitmapContainer,
    sink: &mut S,
) -> Result<DeliveredBitmap<S::Block>, ConvertError> {
    let info = sink.allocate(BITMAP_INFO_BLOCK_SIZE, true);
    let data = sink.allocate(container.data_size(), false);

    let (mut info, mut data) = match (info, data) {
        (Ok(info), Ok(data)) => (info, data),
        (info, data) => {
            let mut first_error = None;
            for block in [info, data] {
                match block {
                    Ok(block) => sink.release(block),
                    Err(e) => {
                        first_error.get_or_insert(e);
                    }
                }
            }
            let error = first_error.unwrap_or(SinkError::Alloc { len: 0 });
            log::warn!("⚠️ 宿主缓冲分配失败：{}", error);
            return Err(error.into());
        }
    };

    let filled = sink
        .fill(&mut info, &container.info_header.to_bytes())
        .and_then(|_| sink.fill(&mut data, container.pixels()));

    if let Err(e) = filled {
        log::warn!("⚠️ 宿主缓冲写入失败：{}", e);
        sink.release(info);
        sink.release(data);
        return Err(e.into());
    }

    Ok(DeliveredBitmap { info, data })
}

/// 基于 `Vec<u8>` 的内存实现，用于测试与命令行工具。
///
/// 可以注入第 N 次分配失败或写入失败，并统计仍存活的块数。
#[derive(Debug, Default)]
pub struct MemorySink {
    allocations: usize,
    live: usize,
    fail_alloc_at: Option<usize>,
    fail_fill: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// 第 `n` 次（从 1 开始）分配返回失败。
    pub fn failing_allocation(n: usize) -> Self {
        Self {
            fail_alloc_at: Some(n),
            ..Self::default()
        }
    }

    /// 所有写入都返回锁定失败。
    pub fn failing_fill() -> Self {
        Self {
            fail_fill: true,
            ..Self::default()
        }
    }

    /// 尚未释放的块数。
    pub fn live_blocks(&self) -> usize {
        self.live
    }
}

impl OutputSink for MemorySink {
    type Block = Vec<u8>;

    fn allocate(&mut self, len: usize, _zeroed: bool) -> Result<Vec<u8>, SinkError> {
        self.allocations += 1;
        if self.fail_alloc_at == Some(self.allocations) {
            return Err(SinkError::Alloc { len });
        }
        self.live += 1;
        Ok(vec![0; len])
    }

    fn fill(&mut self, block: &mut Vec<u8>, bytes: &[u8]) -> Result<(), SinkError> {
        if self.fail_fill {
            return Err(SinkError::Lock);
        }
        let capacity = block.len();
        let target = block.get_mut(..bytes.len()).ok_or(SinkError::Overflow {
            capacity,
            len: bytes.len(),
        })?;
        target.copy_from_slice(bytes);
        Ok(())
    }

    fn release(&mut self, _block: Vec<u8>) {
        self.live = self.live.saturating_sub(1);
    }
}

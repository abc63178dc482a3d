//! # 核心编排模块
//!
//! ## 设计思路
//!
//! `Converter` 只负责流程编排与配置持有，不直接依赖宿主 ABI。
//! 像素提取链路固定为：
//! 1. 进度检查点（可取消）
//! 2. 解码为自底向上的 BGRA 光栅
//! 3. 打包为位图容器
//! 4. 写入宿主缓冲
//! 5. 进度检查点（可取消；取消时释放已交付的两块缓冲）
//!
//! ## 实现思路
//!
//! - 每次调用新建解码器，无共享可变状态，多线程并发调用互不影响。
//! - 记录 `decode/package/deliver/total` 阶段耗时，便于性能诊断。

use std::time::Instant;

use super::bitmap::BitmapContainer;
use super::sink::{self, DeliveredBitmap, OutputSink};
use super::source::PictureSummary;
use super::{ConvertConfig, ConvertError};

/// 两个检查点上报的固定进度值。
const PROGRESS_DONE: (u32, u32) = (1, 1);

/// PNG → 位图转换器。
#[derive(Debug, Clone, Default)]
pub struct Converter {
    pub(super) config: ConvertConfig,
}

impl Converter {
    /// 根据配置创建转换器。
    ///
    /// # 示例
    /// ```rust
    /// use spi_png::converter::{ConvertConfig, Converter};
    ///
    /// let converter = Converter::new(ConvertConfig::default());
    /// assert!(converter.picture_info(b"not a png").is_err());
    /// ```
    pub fn new(config: ConvertConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ConvertConfig {
        &self.config
    }

    /// 元数据查询：只解析 IHDR。
    pub fn picture_info(&self, bytes: &[u8]) -> Result<PictureSummary, ConvertError> {
        let header = self.read_header(bytes)?;
        log::debug!("ℹ️ 图片信息 - {}x{}", header.width, header.height);
        Ok(PictureSummary::from_dimensions(header.width, header.height))
    }

    /// 解码并打包为位图容器。
    pub fn convert(&self, bytes: &[u8]) -> Result<BitmapContainer, ConvertError> {
        let decode_start = Instant::now();
        let raster = self.decode(bytes)?;
        let decode_ms = decode_start.elapsed().as_millis();

        let package_start = Instant::now();
        let container = BitmapContainer::from_raster(raster)?;

        log::debug!(
            "📦 打包完成 - {}x{} bfSize={} decode={}ms package={}ms",
            container.width(),
            container.height(),
            container.file_header.bf_size,
            decode_ms,
            package_start.elapsed().as_millis()
        );

        Ok(container)
    }

    /// 像素提取：转换后写入宿主缓冲。
    ///
    /// `on_progress(current, total)` 返回 `true` 表示请求取消。
    pub fn extract_picture<S, P>(
        &self,
        bytes: &[u8],
        sink: &mut S,
        mut on_progress: Option<P>,
    ) -> Result<DeliveredBitmap<S::Block>, ConvertError>
    where
        S: OutputSink,
        P: FnMut(u32, u32) -> bool,
    {
        let total_start = Instant::now();
        let mut cancelled = || {
            on_progress
                .as_mut()
                .is_some_and(|callback| callback(PROGRESS_DONE.0, PROGRESS_DONE.1))
        };

        if cancelled() {
            log::info!("🛑 调用方在解码前取消");
            return Err(ConvertError::Abort);
        }

        let container = self.convert(bytes)?;

        let deliver_start = Instant::now();
        let delivered = sink::deliver(&container, sink)?;
        let deliver_ms = deliver_start.elapsed().as_millis();
        drop(container);

        if cancelled() {
            log::info!("🛑 调用方在交付后取消，释放已写入的缓冲");
            delivered.release_into(sink);
            return Err(ConvertError::Abort);
        }

        log::info!(
            "✅ 转换完成 - deliver={}ms total={}ms",
            deliver_ms,
            total_start.elapsed().as_millis()
        );

        Ok(delivered)
    }
}

//! # 解码适配模块
//!
//! ## 设计思路
//!
//! PNG 的解析与解压全部委托给 `png` 解码器，本模块只负责三件事：
//! 1. 以内存读取器驱动解码器（不访问文件系统）
//! 2. 统一颜色归一化：调色板 / 灰度 / 灰度+alpha / RGB / RGBA → 32 位 BGRA
//! 3. 把解码器自上而下产出的每一行直接写入镜像行 `height - row - 1`，
//!    输出缓冲天然是自底向上的，不需要第二遍翻转拷贝
//!
//! ## 实现思路
//!
//! - `EXPAND` 负责调色板展开、低位深灰度扩展以及 tRNS → alpha；`STRIP_16` 把 16 位样本降为 8 位。
//! - 先读头部做像素上限检查，再一次性申请光栅（`try_reserve_exact`，失败即 `OutOfMemory`）。
//! - 逐行拉取（`next_row`）；Adam7 隔行图先由解码器整帧去隔行，再逐行镜像写入。
//! - 解码器的所有错误都以 `Result` 返回，在此统一转换为 `ConvertError`。

use std::time::Instant;

use super::reader::MemoryReader;
use super::source::{BYTES_PER_PIXEL, NormalizedRaster, PixelLayout, SourceImageInfo};
use super::{ConvertConfig, ConvertError, Converter};

/// 建立解码器并挂上内存上限与归一化变换。
fn new_decoder<'a>(
    bytes: &'a [u8],
    config: &ConvertConfig,
) -> Result<png::Decoder<MemoryReader<'a>>, ConvertError> {
    config.validate()?;

    let mut limits = png::Limits::default();
    limits.bytes = usize::try_from(config.max_decoded_bytes).unwrap_or(usize::MAX);

    let mut decoder = png::Decoder::new_with_limits(MemoryReader::new(bytes), limits);
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    Ok(decoder)
}

/// 申请一块清零缓冲，分配失败时返回 `OutOfMemory` 而不是中止进程。
pub(crate) fn try_alloc_zeroed(len: usize) -> Result<Vec<u8>, ConvertError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len).map_err(|e| {
        ConvertError::OutOfMemory(format!(
            "无法分配 {:.2} MB 缓冲：{}",
            len as f64 / 1024.0 / 1024.0,
            e
        ))
    })?;
    buf.resize(len, 0);
    Ok(buf)
}

impl Converter {
    /// 只读取 IHDR，不解码像素数据。
    pub fn read_header(&self, bytes: &[u8]) -> Result<SourceImageInfo, ConvertError> {
        let mut decoder = new_decoder(bytes, &self.config)?;
        let info = decoder.read_header_info()?;
        Ok(SourceImageInfo::from_png_info(info))
    }

    /// 将 PNG 字节解码为自底向上的 BGRA 光栅。
    pub fn decode(&self, bytes: &[u8]) -> Result<NormalizedRaster, ConvertError> {
        let started = Instant::now();
        let decoder = new_decoder(bytes, &self.config)?;
        let mut reader = decoder.read_info()?;

        let source = SourceImageInfo::from_png_info(reader.info());
        self.config.check_dimensions(source.width, source.height)?;

        let (output_color, output_depth) = reader.output_color_type();
        if output_depth != png::BitDepth::Eight {
            return Err(ConvertError::DecodeFailed(format!(
                "归一化后位深异常：{:?}",
                output_depth
            )));
        }
        let layout = PixelLayout::resolve(source.color_type, output_color).ok_or_else(|| {
            ConvertError::UnsupportedFormat(format!(
                "{:?}（位深 {:?}）",
                source.color_type, source.bit_depth
            ))
        })?;

        let width = source.width as usize;
        let height = source.height as usize;
        let stride = width * BYTES_PER_PIXEL;
        let total = stride
            .checked_mul(height)
            .ok_or_else(|| ConvertError::OutOfMemory("光栅尺寸溢出".to_string()))?;
        let mut pixels = try_alloc_zeroed(total)?;
        let src_line = width * layout.channels();

        log::debug!(
            "🔍 PNG 头部 - {}x{} {:?}/{:?} tRNS={} alpha={} interlaced={} → {:?}",
            source.width,
            source.height,
            source.color_type,
            source.bit_depth,
            source.has_transparency,
            source.carries_alpha(),
            source.interlaced,
            layout
        );

        if source.interlaced {
            let mut frame = try_alloc_zeroed(reader.output_buffer_size())?;
            let output = reader.next_frame(&mut frame)?;
            if output.line_size < src_line {
                return Err(ConvertError::DecodeFailed("解码行长度异常".to_string()));
            }
            let rows = frame.chunks_exact(output.line_size).take(height);
            if rows.len() != height {
                return Err(ConvertError::DecodeFailed("解码帧行数不足".to_string()));
            }
            for (row, src) in rows.enumerate() {
                let dst = (height - row - 1) * stride;
                layout.write_bgra_row(&src[..src_line], &mut pixels[dst..dst + stride]);
            }
        } else {
            let mut row = 0usize;
            while let Some(decoded) = reader.next_row()? {
                let src = decoded.data();
                if row >= height || src.len() < src_line {
                    return Err(ConvertError::DecodeFailed(format!(
                        "解码行异常：第 {} 行，长度 {}",
                        row,
                        src.len()
                    )));
                }
                let dst = (height - row - 1) * stride;
                layout.write_bgra_row(&src[..src_line], &mut pixels[dst..dst + stride]);
                row += 1;
            }
            if row != height {
                return Err(ConvertError::DecodeFailed(format!(
                    "图像数据提前结束：{}/{} 行",
                    row, height
                )));
            }
        }

        reader.finish()?;

        log::debug!(
            "✅ 解码完成 - {}x{} 耗时 {}ms",
            source.width,
            source.height,
            started.elapsed().as_millis()
        );

        Ok(NormalizedRaster {
            width: source.width,
            height: source.height,
            pixels,
        })
    }
}

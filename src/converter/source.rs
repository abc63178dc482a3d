//! # 中间数据模型
//!
//! ## 设计思路
//!
//! 将“解码器报告的原始描述”和“流水线中间结果”解耦：
//! - `SourceImageInfo` 表示 PNG 头部描述（只读，单次调用内有效）
//! - `NormalizedRaster` 表示自底向上的 BGRA 光栅（单一所有者，按值移交给打包器）
//! - `PictureSummary` 表示元数据查询的结果

use serde::Serialize;

/// 转换后每像素的字节数（固定 32 位 BGRA）。
pub const BYTES_PER_PIXEL: usize = 4;

/// 解码器报告的源图描述。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImageInfo {
    pub width: u32,
    pub height: u32,
    pub color_type: png::ColorType,
    pub bit_depth: png::BitDepth,
    pub interlaced: bool,
    /// 是否存在 tRNS 透明度块。
    pub has_transparency: bool,
}

impl SourceImageInfo {
    pub(crate) fn from_png_info(info: &png::Info<'_>) -> Self {
        Self {
            width: info.width,
            height: info.height,
            color_type: info.color_type,
            bit_depth: info.bit_depth,
            interlaced: info.interlaced,
            has_transparency: info.trns.is_some(),
        }
    }

    /// 输出的 alpha 是否来自源图（alpha 通道，或灰度 / 调色板的 tRNS）。
    ///
    /// RGB 的 tRNS 色键不参与，RGB 输出恒为不透明。
    pub fn carries_alpha(&self) -> bool {
        match self.color_type {
            png::ColorType::GrayscaleAlpha | png::ColorType::Rgba => true,
            png::ColorType::Grayscale | png::ColorType::Indexed => self.has_transparency,
            png::ColorType::Rgb => false,
        }
    }
}

/// 解码器展开后单行像素的排布，决定如何写入 BGRA。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelLayout {
    Gray,
    GrayAlpha,
    Rgb,
    Rgba,
    /// RGB 源图经 tRNS 展开出的第四个样本，写出时丢弃并补 0xFF。
    RgbKeyed,
}

impl PixelLayout {
    /// 由源图颜色类型与解码器的输出颜色类型推导排布。
    ///
    /// 调色板在展开后不应再出现；出现即视为不支持。
    pub fn resolve(source: png::ColorType, output: png::ColorType) -> Option<Self> {
        match (source, output) {
            (png::ColorType::Rgb, png::ColorType::Rgba) => Some(Self::RgbKeyed),
            (_, png::ColorType::Grayscale) => Some(Self::Gray),
            (_, png::ColorType::GrayscaleAlpha) => Some(Self::GrayAlpha),
            (_, png::ColorType::Rgb) => Some(Self::Rgb),
            (_, png::ColorType::Rgba) => Some(Self::Rgba),
            (_, png::ColorType::Indexed) => None,
        }
    }

    /// 单个源像素的样本数。
    pub fn channels(self) -> usize {
        match self {
            Self::Gray => 1,
            Self::GrayAlpha => 2,
            Self::Rgb => 3,
            Self::Rgba | Self::RgbKeyed => 4,
        }
    }

    /// 将一行展开后的 8 位样本写成 BGRA。
    ///
    /// `dst.len()` 必须等于 `width * 4`，`src` 至少包含 `width * channels` 字节。
    pub fn write_bgra_row(self, src: &[u8], dst: &mut [u8]) {
        let pixels = dst.chunks_exact_mut(BYTES_PER_PIXEL);
        match self {
            Self::Gray => {
                for (out, &gray) in pixels.zip(src) {
                    out.copy_from_slice(&[gray, gray, gray, 0xFF]);
                }
            }
            Self::GrayAlpha => {
                for (out, px) in pixels.zip(src.chunks_exact(2)) {
                    out.copy_from_slice(&[px[0], px[0], px[0], px[1]]);
                }
            }
            Self::Rgb => {
                for (out, px) in pixels.zip(src.chunks_exact(3)) {
                    out.copy_from_slice(&[px[2], px[1], px[0], 0xFF]);
                }
            }
            Self::Rgba => {
                for (out, px) in pixels.zip(src.chunks_exact(4)) {
                    out.copy_from_slice(&[px[2], px[1], px[0], px[3]]);
                }
            }
            Self::RgbKeyed => {
                for (out, px) in pixels.zip(src.chunks_exact(4)) {
                    out.copy_from_slice(&[px[2], px[1], px[0], 0xFF]);
                }
            }
        }
    }
}

/// 自底向上的 32 位 BGRA 光栅。
///
/// 不变量：`pixels.len() == width * height * 4`，第 0 行是图像最底部一行。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRaster {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) pixels: Vec<u8>,
}

impl NormalizedRaster {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// 每行字节数（32 位像素天然 4 字节对齐，无需补齐）。
    pub fn stride(&self) -> usize {
        self.width as usize * BYTES_PER_PIXEL
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// 按存储顺序（自底向上）取一行。
    #[cfg(test)]
    pub(crate) fn stored_row(&self, index: usize) -> Option<&[u8]> {
        let stride = self.stride();
        self.pixels.get(index * stride..(index + 1) * stride)
    }

    /// 交出像素所有权。
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }
}

/// 元数据查询结果。
///
/// 颜色深度固定 32，原点与密度固定为 0。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PictureSummary {
    pub left: i32,
    pub top: i32,
    pub width: u32,
    pub height: u32,
    pub x_density: u16,
    pub y_density: u16,
    pub color_depth: u16,
}

impl PictureSummary {
    pub(crate) fn from_dimensions(width: u32, height: u32) -> Self {
        Self {
            left: 0,
            top: 0,
            width,
            height,
            x_density: 0,
            y_density: 0,
            color_depth: 32,
        }
    }
}

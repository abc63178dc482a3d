//! # 位图打包模块
//!
//! ## 设计思路
//!
//! 把归一化光栅包进最小的 BMP 容器：文件头（14 字节）+ 信息头（40 字节）+ 像素数据。
//! 所有尺寸字段只由宽高推导，光栅按值移入容器，不做额外拷贝。
//!
//! ## 实现思路
//!
//! - 每像素固定 4 字节，行天然 4 字节对齐，无需行尾补齐。
//! - `biHeight` 取正值表示自底向上；压缩方式 `BI_RGB`；密度与调色板字段为 0。
//! - 尺寸计算全部使用带检查的算术，超出 32 位头字段范围时返回 `OutOfMemory`。
//! - 头部序列化为固定长度的小端字节数组，保证输出逐字节稳定。

use super::ConvertError;
use super::source::{BYTES_PER_PIXEL, NormalizedRaster};

/// `BITMAPFILEHEADER` 的序列化长度。
pub const FILE_HEADER_SIZE: u32 = 14;
/// `BITMAPINFOHEADER` 的序列化长度。
pub const INFO_HEADER_SIZE: u32 = 40;
/// 宿主侧 `BITMAPINFO` 块长度（信息头 + 一个 `RGBQUAD`）。
pub const BITMAP_INFO_BLOCK_SIZE: usize = INFO_HEADER_SIZE as usize + 4;
/// `'BM'` 的小端表示。
pub const BITMAP_MAGIC: u16 = u16::from_le_bytes(*b"BM");
/// 不压缩。
pub const BI_RGB: u32 = 0;

/// 位图文件头。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitmapFileHeader {
    pub bf_type: u16,
    pub bf_size: u32,
    pub bf_off_bits: u32,
}

impl BitmapFileHeader {
    pub fn to_bytes(&self) -> [u8; FILE_HEADER_SIZE as usize] {
        let mut a = [0u8; FILE_HEADER_SIZE as usize];
        a[0..2].copy_from_slice(&self.bf_type.to_le_bytes());
        a[2..6].copy_from_slice(&self.bf_size.to_le_bytes());
        // 6..10 两个保留字段恒为 0
        a[10..14].copy_from_slice(&self.bf_off_bits.to_le_bytes());
        a
    }
}

/// 位图信息头（`BITMAPINFOHEADER`）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitmapInfoHeader {
    pub bi_size: u32,
    pub bi_width: i32,
    pub bi_height: i32,
    pub bi_planes: u16,
    pub bi_bit_count: u16,
    pub bi_compression: u32,
    pub bi_size_image: u32,
    pub bi_x_pels_per_meter: i32,
    pub bi_y_pels_per_meter: i32,
    pub bi_clr_used: u32,
    pub bi_clr_important: u32,
}

impl BitmapInfoHeader {
    pub fn to_bytes(&self) -> [u8; INFO_HEADER_SIZE as usize] {
        let mut a = [0u8; INFO_HEADER_SIZE as usize];
        a[0..4].copy_from_slice(&self.bi_size.to_le_bytes());
        a[4..8].copy_from_slice(&self.bi_width.to_le_bytes());
        a[8..12].copy_from_slice(&self.bi_height.to_le_bytes());
        a[12..14].copy_from_slice(&self.bi_planes.to_le_bytes());
        a[14..16].copy_from_slice(&self.bi_bit_count.to_le_bytes());
        a[16..20].copy_from_slice(&self.bi_compression.to_le_bytes());
        a[20..24].copy_from_slice(&self.bi_size_image.to_le_bytes());
        a[24..28].copy_from_slice(&self.bi_x_pels_per_meter.to_le_bytes());
        a[28..32].copy_from_slice(&self.bi_y_pels_per_meter.to_le_bytes());
        a[32..36].copy_from_slice(&self.bi_clr_used.to_le_bytes());
        a[36..40].copy_from_slice(&self.bi_clr_important.to_le_bytes());
        a
    }
}

/// 完整的位图容器：文件头 + 信息头 + 自底向上的 BGRA 像素。
///
/// 不变量：
/// - `bf_off_bits == FILE_HEADER_SIZE + INFO_HEADER_SIZE`
/// - `bf_size == bf_off_bits + width * height * 4`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitmapContainer {
    pub file_header: BitmapFileHeader,
    pub info_header: BitmapInfoHeader,
    pixels: Vec<u8>,
}

impl BitmapContainer {
    /// 由光栅构建容器，光栅所有权移入容器。
    pub fn from_raster(raster: NormalizedRaster) -> Result<Self, ConvertError> {
        let overflow = || {
            ConvertError::OutOfMemory(format!(
                "位图尺寸超出头字段范围：{}x{}",
                raster.width, raster.height
            ))
        };

        let width = i32::try_from(raster.width).map_err(|_| overflow())?;
        let height = i32::try_from(raster.height).map_err(|_| overflow())?;
        let size_image = (raster.width as u64)
            .checked_mul(raster.height as u64)
            .and_then(|pixels| pixels.checked_mul(BYTES_PER_PIXEL as u64))
            .and_then(|bytes| u32::try_from(bytes).ok())
            .ok_or_else(overflow)?;

        if size_image as usize != raster.pixels.len() {
            return Err(ConvertError::DecodeFailed(format!(
                "光栅长度异常：期望 {} 实际 {}",
                size_image,
                raster.pixels.len()
            )));
        }

        let off_bits = FILE_HEADER_SIZE + INFO_HEADER_SIZE;
        let file_size = off_bits.checked_add(size_image).ok_or_else(overflow)?;

        Ok(Self {
            file_header: BitmapFileHeader {
                bf_type: BITMAP_MAGIC,
                bf_size: file_size,
                bf_off_bits: off_bits,
            },
            info_header: BitmapInfoHeader {
                bi_size: INFO_HEADER_SIZE,
                bi_width: width,
                bi_height: height,
                bi_planes: 1,
                bi_bit_count: 32,
                bi_compression: BI_RGB,
                bi_size_image: size_image,
                bi_x_pels_per_meter: 0,
                bi_y_pels_per_meter: 0,
                bi_clr_used: 0,
                bi_clr_important: 0,
            },
            pixels: raster.into_pixels(),
        })
    }

    /// 自底向上的 BGRA 像素。
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn width(&self) -> u32 {
        self.info_header.bi_width as u32
    }

    pub fn height(&self) -> u32 {
        self.info_header.bi_height as u32
    }

    /// 像素区字节数，即 `bf_size - bf_off_bits`。
    pub fn data_size(&self) -> usize {
        (self.file_header.bf_size - self.file_header.bf_off_bits) as usize
    }

    /// 序列化为完整的 `.bmp` 文件字节。
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.file_header.bf_size as usize);
        out.extend_from_slice(&self.file_header.to_bytes());
        out.extend_from_slice(&self.info_header.to_bytes());
        out.extend_from_slice(&self.pixels);
        out
    }
}

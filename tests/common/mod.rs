// Fixture builders shared by the integration tests
#![allow(dead_code)]

use spi_png::converter::MemorySink;

/// Encodes an image with the `png` encoder.
pub fn encode(
    width: u32,
    height: u32,
    color: png::ColorType,
    depth: png::BitDepth,
    data: &[u8],
    setup: impl FnOnce(&mut png::Encoder<'_, &mut Vec<u8>>),
) -> Vec<u8> {
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, width, height);
        encoder.set_color(color);
        encoder.set_depth(depth);
        setup(&mut encoder);
        let mut writer = encoder.write_header().expect("write header");
        writer.write_image_data(data).expect("write image data");
    }
    out
}

pub fn rgb8(width: u32, height: u32, data: &[u8]) -> Vec<u8> {
    encode(width, height, png::ColorType::Rgb, png::BitDepth::Eight, data, |_| {})
}

pub fn rgba8(width: u32, height: u32, data: &[u8]) -> Vec<u8> {
    encode(width, height, png::ColorType::Rgba, png::BitDepth::Eight, data, |_| {})
}

/// The 2×2 picture: red, green / blue, white.
pub fn two_by_two_rgb() -> Vec<u8> {
    rgb8(
        2,
        2,
        &[
            255, 0, 0, 0, 255, 0, //
            0, 0, 255, 255, 255, 255,
        ],
    )
}

const fn make_crc_table() -> [u32; 256] {
    let mut out = [0; 256];
    let mut n = 0;
    while n < 256 {
        let mut c = n as u32;
        let mut k = 0;
        while k < 8 {
            if (c & 1) != 0 {
                c = 0xEDB8_8320_u32 ^ (c >> 1);
            } else {
                c >>= 1;
            }
            k += 1;
        }
        out[n] = c;
        n += 1;
    }
    out
}

const CRC_TABLE: [u32; 256] = make_crc_table();

fn png_crc(bytes: &[u8]) -> u32 {
    let mut crc = u32::MAX;
    for &byte in bytes {
        crc = CRC_TABLE[((crc ^ u32::from(byte)) & 0xFF) as usize] ^ (crc >> 8);
    }
    crc ^ u32::MAX
}

fn adler32(bytes: &[u8]) -> u32 {
    let (mut a, mut b) = (1u32, 0u32);
    for &byte in bytes {
        a = (a + u32::from(byte)) % 65_521;
        b = (b + a) % 65_521;
    }
    (b << 16) | a
}

fn push_chunk(out: &mut Vec<u8>, kind: &[u8; 4], data: &[u8]) {
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    let start = out.len();
    out.extend_from_slice(kind);
    out.extend_from_slice(data);
    let crc = png_crc(&out[start..]);
    out.extend_from_slice(&crc.to_be_bytes());
}

/// Builds a PNG by hand from already-filtered scanlines, using a single
/// stored (uncompressed) deflate block. Lets tests produce layouts the
/// encoder cannot, such as Adam7.
pub fn raw_png(width: u32, height: u32, bit_depth: u8, color_type: u8, interlace: u8, scanlines: &[u8]) -> Vec<u8> {
    assert!(scanlines.len() <= u16::MAX as usize);

    let mut ihdr = Vec::new();
    ihdr.extend_from_slice(&width.to_be_bytes());
    ihdr.extend_from_slice(&height.to_be_bytes());
    ihdr.extend_from_slice(&[bit_depth, color_type, 0, 0, interlace]);

    let len = scanlines.len() as u16;
    let mut zlib = vec![0x78, 0x01, 0x01];
    zlib.extend_from_slice(&len.to_le_bytes());
    zlib.extend_from_slice(&(!len).to_le_bytes());
    zlib.extend_from_slice(scanlines);
    zlib.extend_from_slice(&adler32(scanlines).to_be_bytes());

    let mut out = b"\x89PNG\r\n\x1a\n".to_vec();
    push_chunk(&mut out, b"IHDR", &ihdr);
    push_chunk(&mut out, b"IDAT", &zlib);
    push_chunk(&mut out, b"IEND", &[]);
    out
}

/// Byte offset of the first chunk CRC (the IHDR one).
pub const IHDR_CRC_OFFSET: usize = 8 + 4 + 4 + 13;

/// BGRA pixel stored for source pixel (x, y) in a bottom-up raster.
pub fn stored_pixel(pixels: &[u8], width: u32, height: u32, x: u32, y: u32) -> [u8; 4] {
    let row = (height - 1 - y) as usize;
    let offset = (row * width as usize + x as usize) * 4;
    pixels[offset..offset + 4].try_into().expect("pixel slice")
}

pub fn memory_sink() -> MemorySink {
    MemorySink::new()
}

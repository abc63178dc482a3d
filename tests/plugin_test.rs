// Host-facing surface: metadata strings, sniffing, status codes, picture info
mod common;

use std::fs;
use std::path::PathBuf;

use common::{rgba8, two_by_two_rgb};
use spi_png::converter::{ConvertConfig, ConvertError, Converter, InputSource};
use spi_png::plugin::{self, PictureInfo, SpiStatus};

fn unique_temp_file(name: &str, contents: &[u8]) -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    let dir = std::env::temp_dir().join(format!("spi_png_plugin_{}_{}", std::process::id(), nanos));
    fs::create_dir_all(&dir).expect("create temp dir");
    let path = dir.join(name);
    fs::write(&path, contents).expect("write temp file");
    path
}

#[test]
fn metadata_strings_are_indexed_in_order() {
    assert_eq!(plugin::plugin_info(0), Some("00IN"));
    assert_eq!(plugin::plugin_info(1), Some("PNG Plugin for Susie Image Viewer"));
    assert_eq!(plugin::plugin_info(2), Some("*.png"));
    assert_eq!(plugin::plugin_info(3), Some("PNG file (*.png)"));
    assert_eq!(plugin::plugin_info(4), None);
}

#[test]
fn metadata_copy_truncates_to_host_buffer() {
    let mut buf = [0xFFu8; 6];

    let written = plugin::copy_plugin_info(2, &mut buf);

    assert_eq!(written, 5);
    assert_eq!(&buf, b"*.png\0");

    let mut tiny = [0xFFu8; 3];
    assert_eq!(plugin::copy_plugin_info(1, &mut tiny), 2);
    assert_eq!(&tiny, b"PN\0");
}

#[test]
fn sniff_accepts_real_png_and_rejects_others() {
    assert!(plugin::is_supported(&two_by_two_rgb()));
    assert!(!plugin::is_supported(b"GIF89a"));
    assert!(!plugin::is_supported(b"\x89PN"));
    assert!(!plugin::is_supported(&[]));
}

#[test]
fn picture_info_matches_header_dimensions() {
    let png_bytes = rgba8(6, 4, &[0u8; 6 * 4 * 4]);

    let info = PictureInfo::from(Converter::default().picture_info(&png_bytes).expect("info"));

    // 打包结构，先拷出字段再比较
    let (left, top, width, height) = (info.left, info.top, info.width, info.height);
    let (color_depth, h_info) = (info.color_depth, info.h_info);
    assert_eq!((left, top, width, height), (0, 0, 6, 4));
    assert_eq!(color_depth, 32);
    assert!(h_info.is_null());
}

#[test]
fn picture_info_rejects_garbage() {
    let error = Converter::default()
        .picture_info(b"definitely not a png file")
        .expect_err("garbage input");

    assert_eq!(SpiStatus::from(&error), SpiStatus::OutOfOrder);
}

#[test]
fn status_codes_cover_every_outcome() {
    assert_eq!(SpiStatus::AllRight.code(), 0);
    assert_eq!(SpiStatus::from(&ConvertError::Abort).code(), 1);
    assert_eq!(SpiStatus::from(&ConvertError::OutOfMemory(String::new())).code(), 4);
    assert_eq!(SpiStatus::from(&ConvertError::FileRead(String::new())).code(), 6);
    assert_eq!(SpiStatus::NoFunction.code(), -1);
}

#[test]
fn file_input_honours_offset() {
    let png_bytes = two_by_two_rgb();
    let mut archive = b"ARCHIVE-PREFIX".to_vec();
    let offset = archive.len() as u64;
    archive.extend_from_slice(&png_bytes);
    let path = unique_temp_file("embedded.bin", &archive);
    let config = ConvertConfig::default();

    let loaded = InputSource::file(&path, offset).load(&config).expect("load");

    assert_eq!(loaded.as_ref(), png_bytes.as_slice());
    let summary = Converter::new(config).picture_info(&loaded).expect("info");
    assert_eq!((summary.width, summary.height), (2, 2));

    let _ = fs::remove_dir_all(path.parent().expect("temp dir"));
}

#[test]
fn missing_file_maps_to_file_read_error() {
    let result = InputSource::file("/nonexistent/spi_png/missing.png", 0).load(&ConvertConfig::default());

    let error = result.expect_err("missing file");
    assert!(matches!(error, ConvertError::FileRead(_)));
    assert_eq!(SpiStatus::from(&error), SpiStatus::FileReadError);
}

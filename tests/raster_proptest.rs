// Property tests over randomly generated RGB / RGBA images
mod common;

use common::{encode, stored_pixel};
use png::{BitDepth, ColorType};
use proptest::prelude::*;
use spi_png::converter::Converter;

fn image_strategy() -> impl Strategy<Value = (u32, u32, bool, Vec<u8>)> {
    (1u32..=16, 1u32..=16, any::<bool>()).prop_flat_map(|(width, height, alpha)| {
        let channels = if alpha { 4 } else { 3 };
        let len = (width * height * channels) as usize;
        (
            Just(width),
            Just(height),
            Just(alpha),
            proptest::collection::vec(any::<u8>(), len),
        )
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn every_pixel_lands_mirrored_in_bgra((width, height, alpha, data) in image_strategy()) {
        let color = if alpha { ColorType::Rgba } else { ColorType::Rgb };
        let channels = if alpha { 4 } else { 3 };
        let png_bytes = encode(width, height, color, BitDepth::Eight, &data, |_| {});

        let container = Converter::default().convert(&png_bytes).expect("convert");

        prop_assert_eq!(container.data_size(), (width * height * 4) as usize);
        prop_assert_eq!(container.file_header.bf_size, 54 + width * height * 4);
        for y in 0..height {
            for x in 0..width {
                let at = ((y * width + x) * channels) as usize;
                let a = if alpha { data[at + 3] } else { 0xFF };
                prop_assert_eq!(
                    stored_pixel(container.pixels(), width, height, x, y),
                    [data[at + 2], data[at + 1], data[at], a]
                );
            }
        }
    }

    #[test]
    fn output_is_byte_identical_across_runs((width, height, alpha, data) in image_strategy()) {
        let color = if alpha { ColorType::Rgba } else { ColorType::Rgb };
        let png_bytes = encode(width, height, color, BitDepth::Eight, &data, |_| {});
        let converter = Converter::default();

        let first = converter.convert(&png_bytes).expect("convert").to_bytes();
        let second = converter.convert(&png_bytes).expect("convert").to_bytes();

        prop_assert_eq!(first, second);
    }

    #[test]
    fn arbitrary_bytes_never_panic(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
        let mut input = b"\x89PNG\r\n\x1a\n".to_vec();
        input.extend_from_slice(&bytes);

        let _ = Converter::default().convert(&input);
        let _ = Converter::default().picture_info(&input);
    }
}

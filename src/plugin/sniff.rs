//! 格式嗅探。
//!
//! 只比较前 4 字节；期望签名中的 0 字节是通配位，跳过比较。

/// 宿主传给 `IsSupported` 的头部缓冲长度。
pub const HEADER_PROBE_SIZE: usize = 2048;

/// 期望的文件头。
pub const PNG_SIGNATURE_PREFIX: [u8; 4] = [0x89, b'P', b'N', b'G'];

/// 判断缓冲是否以 PNG 签名开头。
///
/// 不足 4 字节的缓冲直接拒绝。
pub fn is_supported(data: &[u8]) -> bool {
    matches_signature(&PNG_SIGNATURE_PREFIX, data)
}

fn matches_signature(expected: &[u8], data: &[u8]) -> bool {
    if data.len() < expected.len() {
        return false;
    }
    expected
        .iter()
        .zip(data)
        .all(|(&want, &got)| want == 0x00 || want == got)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_png_signature() {
        assert!(is_supported(b"\x89PNG\r\n\x1a\n"));
        assert!(is_supported(b"\x89PNG"));
    }

    #[test]
    fn rejects_other_prefixes() {
        assert!(!is_supported(b"BM\0\0"));
        assert!(!is_supported(b"\x89PNg"));
        assert!(!is_supported(b"GIF89a"));
    }

    #[test]
    fn rejects_short_buffers() {
        assert!(!is_supported(b"\x89PN"));
        assert!(!is_supported(&[]));
    }

    #[test]
    fn zero_in_expected_signature_is_wildcard() {
        assert!(matches_signature(&[0x89, 0x00, b'N'], b"\x89XN"));
        assert!(!matches_signature(&[0x89, 0x00, b'N'], b"\x88XN"));
    }
}

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};

/// Best-guess character encoding for a raw CSV buffer.
///
/// Schedule exports commonly arrive in a Latin-accented single-byte
/// encoding. UTF-8 is honored when detected (or signalled by a BOM); the
/// whole ISO-8859-1 / windows-1252 family, and anything inconclusive,
/// resolves to WINDOWS_1252, the superset these files actually use.
#[must_use]
pub fn detect_encoding(bytes: &[u8]) -> &'static Encoding {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return map_supported(encoding);
    }
    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    map_supported(detector.guess(None, true))
}

fn map_supported(detected: &'static Encoding) -> &'static Encoding {
    if detected == UTF_8 {
        UTF_8
    } else {
        WINDOWS_1252
    }
}

/// Decode a buffer with its detected encoding.
///
/// Malformed sequences decode to replacement characters instead of failing;
/// downstream header lookup tolerates the resulting mojibake.
#[must_use]
pub fn decode_buffer(bytes: &[u8]) -> (String, &'static Encoding) {
    let encoding = detect_encoding(bytes);
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        log::warn!(
            "buffer contained sequences invalid for {}; decoded with replacements",
            encoding.name()
        );
    }
    (text.into_owned(), encoding)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_utf8_with_accents() {
        let bytes = "Nome;Nível\nPátio de Alimentação;3\n".as_bytes();
        assert_eq!(detect_encoding(bytes), UTF_8);
    }

    #[test]
    fn test_latin1_bytes_fall_back_to_windows_1252() {
        // "Pátio" encoded as windows-1252
        let (bytes, _, _) = WINDOWS_1252.encode("Nome;Nível\nPátio;3\n");
        let encoding = detect_encoding(&bytes);
        assert_eq!(encoding, WINDOWS_1252);

        let (text, _) = decode_buffer(&bytes);
        assert!(text.contains("Pátio"));
        assert!(text.contains("Nível"));
    }

    #[test]
    fn test_utf8_bom_is_honored_and_stripped() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice("Nome;Dashboard\n".as_bytes());
        let (text, encoding) = decode_buffer(&bytes);
        assert_eq!(encoding, UTF_8);
        assert!(text.starts_with("Nome"));
    }

    #[test]
    fn test_inconclusive_input_uses_fallback() {
        assert_eq!(detect_encoding(b""), WINDOWS_1252);
    }
}

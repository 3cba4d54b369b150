//! Request path sanitizing
//!
//! Turns untrusted URL path parameters into relative paths that can only
//! name entries below the artifact directory.

use super::StoreError;
use percent_encoding::percent_decode_str;
use std::path::PathBuf;

/// Percent-decode a raw path parameter into UTF-8
pub fn decode_param(raw: &str) -> Result<String, StoreError> {
    percent_decode_str(raw)
        .decode_utf8()
        .map(|s| s.into_owned())
        .map_err(|_| StoreError::InvalidEncoding(raw.to_string()))
}

/// Build a relative path from a decoded request path
///
/// Empty and `.` segments are dropped. `..`, NUL bytes and backslashes are
/// rejected outright rather than normalized away.
pub fn sanitize_relative(decoded: &str) -> Result<PathBuf, StoreError> {
    let mut relative = PathBuf::new();

    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => return Err(StoreError::Forbidden(decoded.to_string())),
            s if s.contains('\0') || s.contains('\\') => {
                return Err(StoreError::Forbidden(decoded.to_string()));
            }
            s => relative.push(s),
        }
    }

    Ok(relative)
}

/// Whether any segment names a dotfile (`.git`, `.env`, ...)
pub fn has_hidden_segment(decoded: &str) -> bool {
    decoded
        .split('/')
        .any(|s| s.starts_with('.') && s != "." && s != "..")
}

/// Trim a version record: surrounding whitespace and a leading byte-order mark
pub fn trim_version(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_plain_names() {
        assert_eq!(
            sanitize_relative("firmware.bin").unwrap(),
            Path::new("firmware.bin")
        );
        assert_eq!(
            sanitize_relative("esp32/board-a/firmware.bin").unwrap(),
            Path::new("esp32/board-a/firmware.bin")
        );
    }

    #[test]
    fn test_empty_and_dot_segments_dropped() {
        assert_eq!(sanitize_relative("").unwrap(), Path::new(""));
        assert_eq!(
            sanitize_relative("/./esp32//firmware.bin").unwrap(),
            Path::new("esp32/firmware.bin")
        );
    }

    #[test]
    fn test_parent_segments_rejected() {
        for name in ["..", "../secret", "esp32/../../etc/passwd", "a/.."] {
            assert!(
                matches!(sanitize_relative(name), Err(StoreError::Forbidden(_))),
                "expected {name} to be rejected"
            );
        }
    }

    #[test]
    fn test_nul_and_backslash_rejected() {
        assert!(matches!(
            sanitize_relative("firmware.bin\0.txt"),
            Err(StoreError::Forbidden(_))
        ));
        assert!(matches!(
            sanitize_relative("..\\..\\boot.ini"),
            Err(StoreError::Forbidden(_))
        ));
    }

    #[test]
    fn test_decode_param() {
        assert_eq!(decode_param("firmware.bin").unwrap(), "firmware.bin");
        assert_eq!(decode_param("my%20fw.bin").unwrap(), "my fw.bin");
        assert_eq!(decode_param("..%2Fsecret").unwrap(), "../secret");
        assert!(matches!(
            decode_param("%FF%FE"),
            Err(StoreError::InvalidEncoding(_))
        ));
    }

    #[test]
    fn test_encoded_traversal_caught_after_decode() {
        let decoded = decode_param("..%2F..%2Fetc%2Fpasswd").unwrap();
        assert!(sanitize_relative(&decoded).is_err());
    }

    #[test]
    fn test_hidden_segments() {
        assert!(has_hidden_segment(".env"));
        assert!(has_hidden_segment("esp32/.git/config"));
        assert!(!has_hidden_segment("firmware.bin.version"));
        assert!(!has_hidden_segment("./firmware.bin"));
    }

    #[test]
    fn test_trim_version() {
        assert_eq!(trim_version("1.2.3\n  "), "1.2.3");
        assert_eq!(trim_version("\u{feff}2.0.1\r\n"), "2.0.1");
        assert_eq!(trim_version("  \n"), "");
    }
}

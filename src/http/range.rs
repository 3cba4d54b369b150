//! Byte ranges for resumed downloads
//!
//! Devices on flaky links pick up an interrupted `firmware.bin` transfer with
//! `Range: bytes=N-`. A single `bytes` range is honored. Multi-range,
//! other units and malformed values fall back to the whole artifact.

/// Inclusive span `start..=end` inside an artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    pub const fn byte_count(&self) -> u64 {
        self.end - self.start + 1
    }

    /// `Content-Range` value for an artifact of `total` bytes
    pub fn content_range(&self, total: u64) -> String {
        format!("bytes {}-{}/{total}", self.start, self.end)
    }
}

/// What to send for a request against an artifact of known size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeRange {
    /// No usable Range header, send everything with 200
    Full,
    /// Send this span with 206
    Partial(ByteRange),
    /// The range starts at or past the end, answer 416
    Unsatisfiable,
}

/// Resolve a `Range` header against an artifact of `total` bytes
///
/// # Examples
/// ```
/// use ota_server::http::range::{parse_range, ByteRange, ResumeRange};
///
/// // 4 KiB already on the device, fetch the rest of a 10 000 byte image
/// assert_eq!(
///     parse_range(Some("bytes=4096-"), 10_000),
///     ResumeRange::Partial(ByteRange { start: 4096, end: 9999 })
/// );
/// assert_eq!(parse_range(None, 10_000), ResumeRange::Full);
/// ```
pub fn parse_range(header: Option<&str>, total: u64) -> ResumeRange {
    let Some(spec) = header.and_then(|h| h.trim().strip_prefix("bytes=")) else {
        return ResumeRange::Full;
    };
    if spec.contains(',') {
        return ResumeRange::Full;
    }
    let Some((first, last)) = spec.split_once('-') else {
        return ResumeRange::Full;
    };
    let (first, last) = (first.trim(), last.trim());

    let (start, requested_end) = if first.is_empty() {
        // "-N" asks for the final N bytes
        let Ok(suffix) = last.parse::<u64>() else {
            return ResumeRange::Full;
        };
        (total.saturating_sub(suffix), None)
    } else {
        let Ok(start) = first.parse::<u64>() else {
            return ResumeRange::Full;
        };
        if last.is_empty() {
            (start, None)
        } else {
            let Ok(end) = last.parse::<u64>() else {
                return ResumeRange::Full;
            };
            (start, Some(end))
        }
    };

    // Covers empty artifacts, `bytes=-0` and resuming a finished download
    if start >= total {
        return ResumeRange::Unsatisfiable;
    }

    let last_byte = total - 1;
    let end = requested_end.map_or(last_byte, |e| e.min(last_byte));
    if end < start {
        return ResumeRange::Unsatisfiable;
    }

    ResumeRange::Partial(ByteRange { start, end })
}

#[cfg(test)]
mod tests {
    use super::*;

    const IMAGE_SIZE: u64 = 10_000;

    fn partial(header: &str) -> ByteRange {
        match parse_range(Some(header), IMAGE_SIZE) {
            ResumeRange::Partial(range) => range,
            other => panic!("expected a partial range for {header}, got {other:?}"),
        }
    }

    #[test]
    fn test_resume_after_interrupted_download() {
        let range = partial("bytes=4096-");
        assert_eq!(range, ByteRange { start: 4096, end: 9999 });
        assert_eq!(range.byte_count(), 5904);
        assert_eq!(range.content_range(IMAGE_SIZE), "bytes 4096-9999/10000");
    }

    #[test]
    fn test_chunked_fetch() {
        let range = partial("bytes=1024-2047");
        assert_eq!(range.byte_count(), 1024);

        // A chunk that runs past the image is cut at the last byte
        let tail = partial("bytes=8192-16383");
        assert_eq!(tail, ByteRange { start: 8192, end: 9999 });
    }

    #[test]
    fn test_trailing_bytes() {
        assert_eq!(partial("bytes=-16"), ByteRange { start: 9984, end: 9999 });
        assert_eq!(partial("bytes=-50000"), ByteRange { start: 0, end: 9999 });
    }

    #[test]
    fn test_last_byte_only() {
        let range = partial("bytes=9999-");
        assert_eq!(range.byte_count(), 1);
    }

    #[test]
    fn test_resume_past_end_is_unsatisfiable() {
        // Device already holds the complete image
        assert_eq!(parse_range(Some("bytes=10000-"), IMAGE_SIZE), ResumeRange::Unsatisfiable);
        assert_eq!(parse_range(Some("bytes=-0"), IMAGE_SIZE), ResumeRange::Unsatisfiable);
        assert_eq!(parse_range(Some("bytes=600-500"), IMAGE_SIZE), ResumeRange::Unsatisfiable);
        assert_eq!(parse_range(Some("bytes=0-"), 0), ResumeRange::Unsatisfiable);
    }

    #[test]
    fn test_unusable_headers_send_full_image() {
        for header in ["bytes=a-b", "bytes=0-9,20-29", "items=0-9", "bytes=", "bytes=-", "0-9"] {
            assert_eq!(parse_range(Some(header), IMAGE_SIZE), ResumeRange::Full, "{header}");
        }
        assert_eq!(parse_range(None, IMAGE_SIZE), ResumeRange::Full);
    }
}

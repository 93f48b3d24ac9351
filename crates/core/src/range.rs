//! HTTP `Range` header parsing and byte-window resolution.
//!
//! Unbounded ranges (`bytes=N-`) are capped at [`MAX_CHUNK_SIZE`] instead of
//! running to EOF, bounding memory per request and forcing bulk downloaders
//! into many small requests that the anomaly detector can observe.

/// Maximum window served for a range request with no explicit end (1 MiB).
pub const MAX_CHUNK_SIZE: u64 = 1024 * 1024;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RangeError {
    #[error("Malformed Range header: {0}")]
    Malformed(String),

    #[error("Range {start}-{end} out of bounds for object of {size} bytes")]
    OutOfBounds { start: u64, end: u64, size: u64 },
}

/// A resolved byte window within an object of `total` bytes.
/// `start` and `end` are inclusive, matching `Content-Range` semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteWindow {
    pub start: u64,
    pub end: u64,
    pub total: u64,
}

impl ByteWindow {
    pub fn length(&self) -> u64 {
        self.end - self.start + 1
    }

    /// Render the `Content-Range` response header value.
    pub fn content_range(&self) -> String {
        format!("bytes {}-{}/{}", self.start, self.end, self.total)
    }
}

/// Parse a `Range: bytes=START-END` header value into `(start, optional end)`.
pub fn parse_range_header(range: &str) -> Result<(u64, Option<u64>), RangeError> {
    let malformed = || RangeError::Malformed(range.to_string());

    let spec = range.strip_prefix("bytes=").ok_or_else(malformed)?;
    let (start_str, end_str) = spec.split_once('-').ok_or_else(malformed)?;

    let start = start_str.parse::<u64>().map_err(|_| malformed())?;
    let end = if end_str.is_empty() {
        None
    } else {
        Some(end_str.parse::<u64>().map_err(|_| malformed())?)
    };

    Ok((start, end))
}

/// Resolve a parsed range against the object size.
///
/// An omitted end defaults to `min(start + MAX_CHUNK_SIZE - 1, size - 1)`.
/// A start or explicit end at or past the object size is rejected, not
/// clamped; so is an inverted range.
pub fn resolve_window(start: u64, end: Option<u64>, size: u64) -> Result<ByteWindow, RangeError> {
    if start >= size {
        return Err(RangeError::OutOfBounds {
            start,
            end: end.unwrap_or(start),
            size,
        });
    }

    let end = match end {
        Some(end) if end >= size => {
            return Err(RangeError::OutOfBounds { start, end, size });
        }
        Some(end) if end < start => {
            return Err(RangeError::Malformed(format!("bytes={start}-{end}")));
        }
        Some(end) => end,
        None => (start + MAX_CHUNK_SIZE - 1).min(size - 1),
    };

    Ok(ByteWindow {
        start,
        end,
        total: size,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- Parsing -----------------------------------------------------------

    #[test]
    fn parses_bounded_range() {
        assert_eq!(parse_range_header("bytes=0-499"), Ok((0, Some(499))));
    }

    #[test]
    fn parses_open_ended_range() {
        assert_eq!(parse_range_header("bytes=1000-"), Ok((1000, None)));
    }

    #[test]
    fn rejects_missing_unit_prefix() {
        assert!(parse_range_header("0-499").is_err());
    }

    #[test]
    fn rejects_suffix_range() {
        // `bytes=-500` (last N bytes) is not supported.
        assert!(parse_range_header("bytes=-500").is_err());
    }

    #[test]
    fn rejects_non_numeric_bounds() {
        assert!(parse_range_header("bytes=abc-def").is_err());
        assert!(parse_range_header("bytes=0-x").is_err());
    }

    // -- Window resolution -------------------------------------------------

    #[test]
    fn open_ended_range_is_capped_at_one_mib() {
        let size = 10 * 1024 * 1024;
        let window = resolve_window(0, None, size).unwrap();
        assert_eq!(window.start, 0);
        assert_eq!(window.end, MAX_CHUNK_SIZE - 1);
        assert_eq!(window.length(), MAX_CHUNK_SIZE);
        assert_eq!(window.content_range(), "bytes 0-1048575/10485760");
    }

    #[test]
    fn open_ended_range_near_eof_stops_at_eof() {
        let window = resolve_window(900, None, 1000).unwrap();
        assert_eq!(window.end, 999);
        assert_eq!(window.length(), 100);
    }

    #[test]
    fn explicit_range_is_served_verbatim() {
        let window = resolve_window(1000, Some(1999), 4096).unwrap();
        assert_eq!(window.length(), 1000);
        assert_eq!(window.content_range(), "bytes 1000-1999/4096");
    }

    #[test]
    fn start_at_size_is_rejected() {
        let size = 10 * 1024 * 1024;
        assert!(matches!(
            resolve_window(size, None, size),
            Err(RangeError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn end_at_size_is_rejected_not_clamped() {
        assert!(matches!(
            resolve_window(0, Some(1000), 1000),
            Err(RangeError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn inverted_range_is_rejected() {
        assert!(matches!(
            resolve_window(500, Some(100), 1000),
            Err(RangeError::Malformed(_))
        ));
    }

    #[test]
    fn single_byte_window() {
        let window = resolve_window(0, Some(0), 10).unwrap();
        assert_eq!(window.length(), 1);
    }
}

//! HTTP Range request parsing module
//!
//! Only the open-ended single range `bytes=<start>-` is understood. Players such
//! as VLC use it to resume or seek inside the stream.

/// Parsed Range request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeRequest {
    /// Start byte position, the body runs from here to end of file
    pub start: u64,
}

impl RangeRequest {
    /// Last byte position for a file of `file_size` bytes
    #[inline]
    pub const fn end_position(&self, file_size: u64) -> u64 {
        file_size.saturating_sub(1)
    }

    /// `Content-Range` header value, e.g. `bytes 100-999/1000`
    pub fn content_range(&self, file_size: u64) -> String {
        format!(
            "bytes {}-{}/{file_size}",
            self.start,
            self.end_position(file_size)
        )
    }
}

/// Range header parse result
#[derive(Debug, PartialEq, Eq)]
pub enum RangeParseResult {
    /// Valid range request
    Valid(RangeRequest),
    /// Start at or past end of file - should return 416
    NotSatisfiable,
    /// No Range header or malformed (ignore, return full content)
    None,
}

/// Parse HTTP Range header
///
/// The header must start with `bytes=`, followed by optional whitespace, an
/// integer with an optional `+` sign and a `-`. Whatever follows the `-` is
/// not interpreted, so `bytes=100-200` and `bytes=100-` both stream from byte
/// 100 to end of file.
///
/// # Examples
/// ```
/// use flv_stream_server::http::range::{parse_range_header, RangeParseResult};
///
/// let result = parse_range_header(Some("bytes=100-"), 1000);
/// assert!(matches!(result, RangeParseResult::Valid(r) if r.start == 100));
///
/// let result = parse_range_header(Some("bytes=abc-"), 1000);
/// assert!(matches!(result, RangeParseResult::None));
/// ```
pub fn parse_range_header(range_header: Option<&str>, file_size: u64) -> RangeParseResult {
    let Some(header) = range_header else {
        return RangeParseResult::None;
    };

    let Some(spec) = header.strip_prefix("bytes=") else {
        return RangeParseResult::None; // Not bytes unit, ignore
    };

    let Some((start_str, _)) = spec.split_once('-') else {
        return RangeParseResult::None;
    };

    // Suffix ranges ("-500") leave start_str empty and fail here
    let start_str = start_str.trim_start();
    let start_str = start_str.strip_prefix('+').unwrap_or(start_str);
    if start_str.is_empty() || !start_str.bytes().all(|b| b.is_ascii_digit()) {
        return RangeParseResult::None;
    }
    let Ok(start) = start_str.parse::<u64>() else {
        return RangeParseResult::None; // overflow
    };

    if start >= file_size {
        return RangeParseResult::NotSatisfiable;
    }

    RangeParseResult::Valid(RangeRequest { start })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_range() {
        assert_eq!(parse_range_header(None, 100), RangeParseResult::None);
    }

    #[test]
    fn test_open_range() {
        match parse_range_header(Some("bytes=50-"), 100) {
            RangeParseResult::Valid(r) => {
                assert_eq!(r.start, 50);
                assert_eq!(r.end_position(100), 99);
                assert_eq!(r.content_range(100), "bytes 50-99/100");
            }
            other => panic!("Expected Valid, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_start() {
        assert_eq!(
            parse_range_header(Some("bytes=0-"), 100),
            RangeParseResult::Valid(RangeRequest { start: 0 })
        );
    }

    #[test]
    fn test_end_bound_is_ignored() {
        assert_eq!(
            parse_range_header(Some("bytes=10-20"), 100),
            RangeParseResult::Valid(RangeRequest { start: 10 })
        );
        assert_eq!(
            parse_range_header(Some("bytes=0-9,20-29"), 100),
            RangeParseResult::Valid(RangeRequest { start: 0 })
        );
    }

    #[test]
    fn test_leading_whitespace() {
        assert_eq!(
            parse_range_header(Some("bytes= 7-"), 100),
            RangeParseResult::Valid(RangeRequest { start: 7 })
        );
    }

    #[test]
    fn test_explicit_plus_sign() {
        assert_eq!(
            parse_range_header(Some("bytes=+5-"), 100),
            RangeParseResult::Valid(RangeRequest { start: 5 })
        );
        assert_eq!(
            parse_range_header(Some("bytes= +5-"), 100),
            RangeParseResult::Valid(RangeRequest { start: 5 })
        );
    }

    #[test]
    fn test_not_satisfiable() {
        assert_eq!(
            parse_range_header(Some("bytes=100-"), 100),
            RangeParseResult::NotSatisfiable
        );
        assert_eq!(
            parse_range_header(Some("bytes=0-"), 0),
            RangeParseResult::NotSatisfiable
        );
    }

    #[test]
    fn test_invalid_format() {
        for header in [
            "bytes=abc-",
            "bytes=-20",
            "bytes=++5-",
            "bytes=+-",
            "bytes=-5-",
            "bytes=12",
            "items=0-",
            "BYTES=0-",
            "bytes=99999999999999999999999-",
        ] {
            assert_eq!(
                parse_range_header(Some(header), 100),
                RangeParseResult::None,
                "header {header:?} should be ignored"
            );
        }
    }
}

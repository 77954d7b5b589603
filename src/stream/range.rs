//! `Range` header parsing.
//!
//! Only the `bytes=start-end` form is accepted: `start` is required and
//! `end` is optional (defaulting to the last byte). Anything else —
//! missing prefix, non-numeric bounds, suffix or multi-range forms, a
//! start at or past end-of-file — is unsatisfiable and rejected outright
//! rather than risking a response with the wrong byte count.

use thiserror::Error;

/// Range parse/bounds failure, answered with HTTP 416.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RangeError {
    #[error("range not satisfiable for resource of {size} bytes")]
    Unsatisfiable { size: u64 },
}

/// Inclusive byte span within a resource. Invariant: `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    /// Number of bytes in the span (the `Content-Length` of a 206).
    pub fn content_length(&self) -> u64 {
        self.end - self.start + 1
    }

    /// `Content-Range` header value for a resource of `size` bytes.
    pub fn content_range(&self, size: u64) -> String {
        format!("bytes {}-{}/{}", self.start, self.end, size)
    }
}

/// Parse a `Range` header value against a resource of `size` bytes.
///
/// An `end` past the last byte is clamped to `size - 1`; every other
/// deviation fails closed as unsatisfiable.
pub fn parse_range(header: &str, size: u64) -> Result<ByteRange, RangeError> {
    let unsatisfiable = RangeError::Unsatisfiable { size };

    let ranges = header.strip_prefix("bytes=").ok_or(unsatisfiable)?;
    let (start_part, end_part) = ranges.split_once('-').ok_or(unsatisfiable)?;

    let start = parse_bound(start_part).ok_or(unsatisfiable)?;
    if start >= size {
        // Also covers the empty resource, where no range is servable.
        return Err(unsatisfiable);
    }

    let end = if end_part.is_empty() {
        size - 1
    } else {
        let end = parse_bound(end_part).ok_or(unsatisfiable)?;
        end.min(size - 1)
    };

    if start > end {
        return Err(unsatisfiable);
    }

    Ok(ByteRange { start, end })
}

/// A bound is bare ASCII digits: no sign, no padding, no overflow.
fn parse_bound(text: &str) -> Option<u64> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_range() {
        let range = parse_range("bytes=0-99", 1000).unwrap();
        assert_eq!(range, ByteRange { start: 0, end: 99 });
        assert_eq!(range.content_length(), 100);
        assert_eq!(range.content_range(1000), "bytes 0-99/1000");
    }

    #[test]
    fn test_open_ended_range_defaults_to_last_byte() {
        let range = parse_range("bytes=500-", 1000).unwrap();
        assert_eq!(range, ByteRange { start: 500, end: 999 });
        assert_eq!(range.content_length(), 500);
    }

    #[test]
    fn test_end_clamped_to_resource_size() {
        let range = parse_range("bytes=900-5000", 1000).unwrap();
        assert_eq!(range.end, 999);
    }

    #[test]
    fn test_single_byte_range() {
        let range = parse_range("bytes=999-999", 1000).unwrap();
        assert_eq!(range.content_length(), 1);
    }

    #[test]
    fn test_malformed_ranges_rejected() {
        let unsatisfiable = Err(RangeError::Unsatisfiable { size: 1000 });
        assert_eq!(parse_range("0-99", 1000), unsatisfiable);
        assert_eq!(parse_range("bytes=abc-99", 1000), unsatisfiable);
        assert_eq!(parse_range("bytes=0-xyz", 1000), unsatisfiable);
        assert_eq!(parse_range("bytes=", 1000), unsatisfiable);
        assert_eq!(parse_range("bytes=-500", 1000), unsatisfiable);
        assert_eq!(parse_range("bytes=0-99,200-299", 1000), unsatisfiable);
        assert_eq!(parse_range("items=0-99", 1000), unsatisfiable);
    }

    #[test]
    fn test_signed_or_padded_bounds_rejected() {
        let unsatisfiable = Err(RangeError::Unsatisfiable { size: 1000 });
        assert_eq!(parse_range("bytes=+5-", 1000), unsatisfiable);
        assert_eq!(parse_range("bytes=0-+99", 1000), unsatisfiable);
        assert_eq!(parse_range("bytes= 0-99", 1000), unsatisfiable);
        assert_eq!(parse_range("bytes=0- 99", 1000), unsatisfiable);
        assert_eq!(parse_range("bytes=0-99 ", 1000), unsatisfiable);
        // Bounds past u64 do not wrap into a servable span.
        assert_eq!(
            parse_range("bytes=99999999999999999999999-", 1000),
            unsatisfiable
        );
    }

    #[test]
    fn test_out_of_bounds_start_rejected() {
        assert!(parse_range("bytes=1000-", 1000).is_err());
        assert!(parse_range("bytes=5000-6000", 1000).is_err());
    }

    #[test]
    fn test_inverted_range_rejected() {
        assert!(parse_range("bytes=200-100", 1000).is_err());
    }

    #[test]
    fn test_empty_resource_has_no_satisfiable_range() {
        assert_eq!(
            parse_range("bytes=0-", 0),
            Err(RangeError::Unsatisfiable { size: 0 })
        );
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(256))]

            // A successful parse always yields an in-bounds, ordered span.
            #[test]
            fn prop_parsed_range_is_in_bounds(
                start in 0u64..10_000,
                end in proptest::option::of(0u64..20_000),
                size in 1u64..10_000,
            ) {
                let header = match end {
                    Some(end) => format!("bytes={start}-{end}"),
                    None => format!("bytes={start}-"),
                };
                if let Ok(range) = parse_range(&header, size) {
                    prop_assert!(range.start <= range.end);
                    prop_assert!(range.end < size);
                    prop_assert_eq!(range.start, start);
                }
            }

            // Headers without the bytes= prefix never parse.
            #[test]
            fn prop_missing_prefix_rejected(header in "[a-z]{0,8}=[0-9]{1,4}-[0-9]{0,4}") {
                prop_assume!(!header.starts_with("bytes="));
                prop_assert!(parse_range(&header, 1000).is_err());
            }

            // A start past end-of-file is always unsatisfiable.
            #[test]
            fn prop_start_past_eof_rejected(size in 0u64..10_000, excess in 0u64..100) {
                let header = format!("bytes={}-", size + excess);
                prop_assert_eq!(
                    parse_range(&header, size),
                    Err(RangeError::Unsatisfiable { size })
                );
            }
        }
    }
}

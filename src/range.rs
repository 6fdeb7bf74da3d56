//! Single `Range: bytes=...` header support for seeking media players.

/// Inclusive byte range inside a file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    pub(crate) fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    pub fn content_range(&self, size: u64) -> String {
        format!("bytes {}-{}/{size}", self.start, self.end)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RangeRequest {
    /// No usable range, serve the whole file.
    Full,
    Partial(ByteRange),
    Unsatisfiable,
}

impl RangeRequest {
    /// Interprets a `Range` header value against a file of `size` bytes.
    ///
    /// Multiple ranges and malformed values fall back to [`RangeRequest::Full`].
    pub fn parse(header: &str, size: u64) -> Self {
        let Some((unit, spec)) = header.trim().split_once('=') else {
            return Self::Full;
        };

        if !unit.trim().eq_ignore_ascii_case("bytes") || spec.contains(',') {
            return Self::Full;
        }

        let Some((first, last)) = spec.trim().split_once('-') else {
            return Self::Full;
        };

        let (first, last) = (first.trim(), last.trim());

        if first.is_empty() {
            let Ok(suffix) = last.parse::<u64>() else {
                return Self::Full;
            };

            if suffix == 0 || size == 0 {
                return Self::Unsatisfiable;
            }

            return Self::Partial(ByteRange {
                start: size.saturating_sub(suffix),
                end: size - 1,
            });
        }

        let Ok(start) = first.parse::<u64>() else {
            return Self::Full;
        };

        let end = if last.is_empty() {
            None
        } else {
            match last.parse::<u64>() {
                Ok(end) if end >= start => Some(end),
                _ => return Self::Full,
            }
        };

        if start >= size {
            return Self::Unsatisfiable;
        }

        Self::Partial(ByteRange {
            start,
            end: end.map_or(size - 1, |end| end.min(size - 1)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn partial(start: u64, end: u64) -> RangeRequest {
        RangeRequest::Partial(ByteRange { start, end })
    }

    #[test]
    fn bounded_range() {
        assert_eq!(RangeRequest::parse("bytes=0-99", 1000), partial(0, 99));
        assert_eq!(RangeRequest::parse("bytes=500-", 1000), partial(500, 999));
        assert_eq!(RangeRequest::parse("bytes=900-5000", 1000), partial(900, 999));
    }

    #[test]
    fn suffix_range() {
        assert_eq!(RangeRequest::parse("bytes=-100", 1000), partial(900, 999));
        assert_eq!(RangeRequest::parse("bytes=-5000", 1000), partial(0, 999));
        assert_eq!(RangeRequest::parse("bytes=-0", 1000), RangeRequest::Unsatisfiable);
    }

    #[test]
    fn start_past_end_is_unsatisfiable() {
        assert_eq!(RangeRequest::parse("bytes=1000-", 1000), RangeRequest::Unsatisfiable);
        assert_eq!(RangeRequest::parse("bytes=0-", 0), RangeRequest::Unsatisfiable);
    }

    #[test]
    fn unusable_headers_serve_everything() {
        for header in ["", "bytes", "items=0-1", "bytes=0-1,5-6", "bytes=9-2", "bytes=a-b"] {
            assert_eq!(RangeRequest::parse(header, 1000), RangeRequest::Full, "{header}");
        }
    }

    #[test]
    fn content_range_header() {
        let range = ByteRange { start: 10, end: 19 };

        assert_eq!(range.len(), 10);
        assert_eq!(range.content_range(100), "bytes 10-19/100");
    }
}

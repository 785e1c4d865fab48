//! Page selection for list requests.

use serde::Serialize;

/// Parses the leading integer of `raw`, ignoring anything after it.
///
/// Leading whitespace and one sign character are accepted, so `" 12abc"`
/// yields 12 and `"-3"` yields -3. Returns `None` when no digit follows.
/// Values beyond the `i64` range saturate.
pub fn parse_leading_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, unsigned) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits = unsigned.bytes().take_while(u8::is_ascii_digit);
    let mut seen = false;
    let mut magnitude: i64 = 0;
    for digit in digits {
        seen = true;
        magnitude = magnitude
            .saturating_mul(10)
            .saturating_add(i64::from(digit - b'0'));
    }

    seen.then_some(if negative { -magnitude } else { magnitude })
}

/// Reads a positive count, falling back to `default` otherwise.
fn positive_or(raw: Option<&str>, default: u64) -> u64 {
    raw.and_then(parse_leading_int)
        .filter(|n| *n > 0)
        .and_then(|n| u64::try_from(n).ok())
        .unwrap_or(default)
}

/// A 1-based page of a fixed size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    page: u64,
    limit: u64,
}

impl Pagination {
    /// Default page number.
    pub const DEFAULT_PAGE: u64 = 1;

    /// Creates a pagination; zero values are raised to 1.
    pub fn new(page: u64, limit: u64) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
        }
    }

    /// Reads `page` and `limit` parameters.
    ///
    /// Missing, non-numeric and non-positive values fall back to page 1 and
    /// `default_limit`.
    pub fn from_params(page: Option<&str>, limit: Option<&str>, default_limit: u64) -> Self {
        Self::new(
            positive_or(page, Self::DEFAULT_PAGE),
            positive_or(limit, default_limit),
        )
    }

    /// Returns the page number.
    pub fn page(&self) -> u64 {
        self.page
    }

    /// Returns the page size.
    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Index of the first record on this page.
    pub fn start_index(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Index one past the last record on this page.
    pub fn end_index(&self) -> u64 {
        self.page.saturating_mul(self.limit)
    }

    /// Returns true if records exist after this page.
    pub fn has_next(&self, total: u64) -> bool {
        self.end_index() < total
    }

    /// Returns true if this page does not start at the first record.
    pub fn has_prev(&self) -> bool {
        self.start_index() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_leading_int() {
        assert_eq!(parse_leading_int("12"), Some(12));
        assert_eq!(parse_leading_int("  7"), Some(7));
        assert_eq!(parse_leading_int("3abc"), Some(3));
        assert_eq!(parse_leading_int("2.9"), Some(2));
        assert_eq!(parse_leading_int("-4"), Some(-4));
        assert_eq!(parse_leading_int("+5"), Some(5));
        assert_eq!(parse_leading_int("abc"), None);
        assert_eq!(parse_leading_int(""), None);
        assert_eq!(parse_leading_int("-"), None);
        assert_eq!(parse_leading_int("99999999999999999999999"), Some(i64::MAX));
    }

    #[test]
    fn test_defaults_for_unusable_values() {
        let p = Pagination::from_params(Some("abc"), Some("xyz"), 25);
        assert_eq!((p.page(), p.limit()), (1, 25));

        let p = Pagination::from_params(Some("0"), Some("-10"), 25);
        assert_eq!((p.page(), p.limit()), (1, 25));

        let p = Pagination::from_params(None, None, 10);
        assert_eq!((p.page(), p.limit()), (1, 10));
    }

    #[test]
    fn test_indices() {
        let p = Pagination::from_params(Some("3"), Some("10"), 25);
        assert_eq!(p.start_index(), 20);
        assert_eq!(p.end_index(), 30);
    }

    #[test]
    fn test_indices_hold_for_page_grid() {
        for page in 1..=6u64 {
            for limit in [1u64, 2, 7, 25] {
                let p = Pagination::new(page, limit);
                assert_eq!(p.start_index(), (page - 1) * limit);
                assert_eq!(p.end_index(), page * limit);
                assert_eq!(p.has_prev(), page > 1);
            }
        }
    }

    #[test]
    fn test_next_and_prev() {
        let first = Pagination::new(1, 2);
        assert!(first.has_next(5));
        assert!(!first.has_prev());

        let last = Pagination::new(3, 2);
        assert!(!last.has_next(5));
        assert!(last.has_prev());

        let exact = Pagination::new(1, 5);
        assert!(!exact.has_next(5));
    }

    #[test]
    fn test_saturating_indices() {
        let p = Pagination::new(u64::MAX, u64::MAX);
        assert_eq!(p.end_index(), u64::MAX);
        assert_eq!(p.start_index(), u64::MAX);
    }
}

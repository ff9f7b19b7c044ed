use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const MAX_PAGE_SIZE: u64 = 100;
/// Highest page whose offset still fits a signed 64-bit SQL `OFFSET`.
pub const MAX_PAGE: u64 = i64::MAX as u64 / MAX_PAGE_SIZE;

/// A 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Build a request, clamping `page` to `1..=MAX_PAGE` and `limit` to `1..=MAX_PAGE_SIZE`.
    pub fn new(page: u64, limit: u64) -> Self {
        Self {
            page: page.clamp(1, MAX_PAGE),
            limit: limit.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Lenient parse of raw query values. Anything missing, non-numeric or
    /// non-positive falls back to the default.
    pub fn from_query(page: Option<&str>, limit: Option<&str>) -> Self {
        fn positive(raw: Option<&str>) -> Option<u64> {
            raw.and_then(|s| s.trim().parse::<u64>().ok())
                .filter(|n| *n > 0)
        }

        Self::new(
            positive(page).unwrap_or(1),
            positive(limit).unwrap_or(DEFAULT_PAGE_SIZE),
        )
    }

    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

/// One page of results plus the total row count.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    #[serde(skip)]
    pub request: PageRequest,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> u64 {
        self.total.div_ceil(self.request.limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_is_zero_based() {
        assert_eq!(PageRequest::new(1, 10).offset(), 0);
        assert_eq!(PageRequest::new(2, 5).offset(), 5);
        assert_eq!(PageRequest::new(4, 25).offset(), 75);
    }

    #[test]
    fn test_from_query_falls_back_on_garbage() {
        assert_eq!(
            PageRequest::from_query(Some("abc"), Some("-3")),
            PageRequest::default()
        );
        assert_eq!(
            PageRequest::from_query(Some("0"), None),
            PageRequest::default()
        );
        assert_eq!(
            PageRequest::from_query(Some("3"), Some("1000")),
            PageRequest::new(3, MAX_PAGE_SIZE)
        );
    }

    #[test]
    fn test_huge_page_keeps_offset_in_sql_range() {
        let request = PageRequest::from_query(Some("18446744073709551615"), Some("100"));
        assert_eq!(request.page, MAX_PAGE);
        assert!(request.offset() <= i64::MAX as u64);

        let unclamped = PageRequest {
            page: u64::MAX,
            limit: MAX_PAGE_SIZE,
        };
        assert_eq!(unclamped.offset(), u64::MAX);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let page = Page::<()> {
            items: vec![],
            total: 12,
            request: PageRequest::new(2, 5),
        };
        assert_eq!(page.total_pages(), 3);

        let empty = Page::<()> {
            items: vec![],
            total: 0,
            request: PageRequest::default(),
        };
        assert_eq!(empty.total_pages(), 0);
    }
}

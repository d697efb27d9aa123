//! Pagination types shared by list endpoints

use serde::{Deserialize, Serialize};

/// Default page size when the caller omits `limit`
pub const DEFAULT_PAGE_LIMIT: u32 = 20;
/// Upper bound on `limit`
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Pagination metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageMeta {
    /// Current page number (1-based)
    pub page: u32,
    /// Items per page
    pub limit: u32,
    /// Total number of items
    pub total: u64,
    /// Total number of pages
    pub total_pages: u32,
}

impl PageMeta {
    pub fn new(page: u32, limit: u32, total: u64) -> Self {
        let total_pages = if limit == 0 {
            0
        } else {
            total.div_ceil(u64::from(limit)) as u32
        };
        Self {
            page,
            limit,
            total,
            total_pages,
        }
    }
}

/// `?page=&limit=` query parameters
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl PageParams {
    /// 1-based page, never zero
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    /// Page size clamped to `1..=MAX_PAGE_LIMIT`
    pub fn limit(&self) -> u32 {
        self.limit
            .unwrap_or(DEFAULT_PAGE_LIMIT)
            .clamp(1, MAX_PAGE_LIMIT)
    }

    /// Rows to skip: `(page - 1) * limit`
    pub fn offset(&self) -> u64 {
        u64::from(self.page() - 1) * u64::from(self.limit())
    }

    pub fn meta(&self, total: u64) -> PageMeta {
        PageMeta::new(self.page(), self.limit(), total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_is_page_minus_one_times_limit() {
        let params = PageParams {
            page: Some(3),
            limit: Some(10),
        };
        assert_eq!(params.offset(), 20);
        assert_eq!(params.limit(), 10);
    }

    #[test]
    fn test_defaults_and_clamping() {
        let params = PageParams::default();
        assert_eq!(params.page(), 1);
        assert_eq!(params.offset(), 0);
        assert_eq!(params.limit(), DEFAULT_PAGE_LIMIT);

        let params = PageParams {
            page: Some(0),
            limit: Some(10_000),
        };
        assert_eq!(params.page(), 1);
        assert_eq!(params.limit(), MAX_PAGE_LIMIT);
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(PageMeta::new(1, 20, 0).total_pages, 0);
        assert_eq!(PageMeta::new(1, 20, 20).total_pages, 1);
        assert_eq!(PageMeta::new(1, 20, 21).total_pages, 2);
    }
}

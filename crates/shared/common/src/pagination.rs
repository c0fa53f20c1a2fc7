//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Page size used when the caller gives none
pub const DEFAULT_LIMIT: u64 = 10;

/// Largest page size a caller may ask for
pub const MAX_LIMIT: u64 = 100;

/// Largest offset a store is asked to skip. SQL binds offsets as `BIGINT`.
pub const MAX_OFFSET: u64 = i64::MAX as u64;

/// Pagination query parameters, reusable across all list endpoints.
///
/// `offset` wins over `page` when both are given.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// Page size (default 10, max 100)
    pub limit: Option<u64>,
    /// Number of matches to skip
    pub offset: Option<u64>,
    /// 1-based page number; `offset = (page - 1) * limit`
    pub page: Option<u64>,
}

impl PaginationParams {
    pub fn window(&self) -> Window {
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let offset = match (self.offset, self.page) {
            (Some(offset), _) => offset,
            (None, Some(page)) => page.max(1).saturating_sub(1).saturating_mul(limit),
            (None, None) => 0,
        };
        Window::new(offset, limit)
    }
}

/// Resolved slice of a result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub offset: u64,
    pub limit: u64,
}

impl Default for Window {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Window {
    pub fn new(offset: u64, limit: u64) -> Self {
        Self {
            offset: offset.min(MAX_OFFSET),
            limit,
        }
    }
}

/// Pagination metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub total: u64,
    pub current_page: u64,
    pub total_pages: u64,
    pub limit: u64,
}

impl PageMeta {
    pub fn new(window: Window, total: u64) -> Self {
        let limit = window.limit.max(1);
        Self {
            total,
            current_page: window.offset / limit + 1,
            total_pages: total.div_ceil(limit),
            limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(limit: Option<u64>, offset: Option<u64>, page: Option<u64>) -> PaginationParams {
        PaginationParams {
            limit,
            offset,
            page,
        }
    }

    #[test]
    fn test_defaults() {
        assert_eq!(params(None, None, None).window(), Window::new(0, 10));
    }

    #[test]
    fn test_limit_is_capped() {
        assert_eq!(params(Some(500), None, None).window().limit, MAX_LIMIT);
        assert_eq!(params(Some(0), None, None).window().limit, 1);
    }

    #[test]
    fn test_page_maps_to_offset() {
        assert_eq!(params(Some(3), None, Some(2)).window(), Window::new(3, 3));
        assert_eq!(params(Some(3), None, Some(0)).window(), Window::new(0, 3));
        assert_eq!(params(Some(3), Some(7), Some(2)).window(), Window::new(7, 3));
    }

    #[test]
    fn test_offset_stays_within_bigint() {
        assert_eq!(params(None, Some(u64::MAX), None).window().offset, MAX_OFFSET);
        assert_eq!(params(Some(100), None, Some(u64::MAX)).window().offset, MAX_OFFSET);
        assert_eq!(Window::new(u64::MAX, 5).offset, i64::MAX as u64);
    }

    #[test]
    fn test_meta() {
        let meta = PageMeta::new(Window::new(3, 3), 7);
        assert_eq!(meta.current_page, 2);
        assert_eq!(meta.total_pages, 3);
        assert_eq!(PageMeta::new(Window::default(), 0).total_pages, 0);
    }
}

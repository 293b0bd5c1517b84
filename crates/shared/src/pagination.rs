//! Offset pagination for admin list endpoints.
//!
//! Admin lists are page-numbered: `page` (1-based), `limit`, and an optional
//! `search` substring. Responses carry `{page, limit, total, totalPages}`.

use serde::{Deserialize, Serialize};

/// Default page size for list endpoints.
pub const DEFAULT_LIMIT: i64 = 20;
/// Upper bound on the page size a caller may request.
pub const MAX_LIMIT: i64 = 100;

/// Query parameters for a paginated list request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
}

impl PageParams {
    /// 1-based page number, clamped to at least 1.
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    /// Page size, clamped to `1..=MAX_LIMIT`.
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    /// SQL OFFSET for the current page.
    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.limit()
    }

    /// Trimmed search needle, if one was supplied and non-empty.
    pub fn search(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Pagination metadata attached to a list response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl PageInfo {
    /// Builds page metadata from request params and a total row count.
    pub fn new(params: &PageParams, total: i64) -> Self {
        let limit = params.limit();
        Self {
            page: params.page(),
            limit,
            total,
            total_pages: (total + limit - 1) / limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(page: Option<i64>, limit: Option<i64>) -> PageParams {
        PageParams {
            page,
            limit,
            search: None,
        }
    }

    #[test]
    fn test_defaults() {
        let p = params(None, None);
        assert_eq!(p.page(), 1);
        assert_eq!(p.limit(), DEFAULT_LIMIT);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn test_offset_math() {
        let p = params(Some(3), Some(25));
        assert_eq!(p.offset(), 50);
    }

    #[test]
    fn test_page_clamped_to_one() {
        assert_eq!(params(Some(0), None).page(), 1);
        assert_eq!(params(Some(-5), None).page(), 1);
    }

    #[test]
    fn test_limit_clamped() {
        assert_eq!(params(None, Some(0)).limit(), 1);
        assert_eq!(params(None, Some(10_000)).limit(), MAX_LIMIT);
    }

    #[test]
    fn test_search_trimmed_and_emptied() {
        let mut p = params(None, None);
        p.search = Some("  alice  ".to_string());
        assert_eq!(p.search(), Some("alice"));

        p.search = Some("   ".to_string());
        assert_eq!(p.search(), None);

        p.search = None;
        assert_eq!(p.search(), None);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let p = params(Some(1), Some(20));
        assert_eq!(PageInfo::new(&p, 0).total_pages, 0);
        assert_eq!(PageInfo::new(&p, 20).total_pages, 1);
        assert_eq!(PageInfo::new(&p, 21).total_pages, 2);
        assert_eq!(PageInfo::new(&p, 199).total_pages, 10);
    }

    #[test]
    fn test_page_info_serializes_camel_case() {
        let p = params(Some(2), Some(10));
        let info = PageInfo::new(&p, 35);
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["totalPages"], 4);
        assert_eq!(json["page"], 2);
    }
}

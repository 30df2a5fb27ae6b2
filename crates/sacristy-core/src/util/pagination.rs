//! Pagination arithmetic shared by every list endpoint.
//!
//! ## Summary
//! Turns a 1-based page number, a page size, and a total row count into the
//! limit/offset pair handed to the database plus the page bookkeeping the
//! frontend renders. Pure computation, no side effects.

use serde::Serialize;

use crate::constants::DEFAULT_PAGE_SIZE;

/// Computed pagination block returned alongside every paginated listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    /// 1-based page this block describes.
    pub page: i64,
    /// Rows per page (the query `LIMIT`).
    pub limit: i64,
    /// Zero-based row offset (the query `OFFSET`).
    pub offset: i64,
    /// Total rows across all pages.
    pub total: i64,
    /// Page count, never below 1 even for an empty result.
    pub total_pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    /// ## Summary
    /// Computes the pagination block for a request.
    ///
    /// `page` below 1 is treated as 1 and `page_size` below 1 as 1; `total`
    /// below 0 is treated as 0. `total_pages` is `ceil(total / limit)` with a
    /// floor of 1, so an empty listing still reports one (empty) page.
    #[must_use]
    pub fn compute(page: i64, page_size: i64, total: i64) -> Self {
        let page = page.max(1);
        let limit = page_size.max(1);
        let total = total.max(0);

        let total_pages = (total + limit - 1).div_euclid(limit).max(1);

        Self {
            page,
            limit,
            offset: (page - 1) * limit,
            total,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }

    /// ## Summary
    /// Computes the pagination block from optional request parameters,
    /// applying the defaults (page 1, [`DEFAULT_PAGE_SIZE`] rows).
    #[must_use]
    pub fn from_request(page: Option<i64>, page_size: Option<i64>, total: i64) -> Self {
        Self::compute(
            page.unwrap_or(1),
            page_size.unwrap_or(DEFAULT_PAGE_SIZE),
            total,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_middle_page() {
        let p = Pagination::compute(2, 10, 25);
        assert_eq!(p.limit, 10);
        assert_eq!(p.offset, 10);
        assert_eq!(p.page, 2);
        assert_eq!(p.total_pages, 3);
        assert!(p.has_next);
        assert!(p.has_prev);
    }

    #[test]
    fn test_empty_listing_still_has_one_page() {
        let p = Pagination::compute(1, 10, 0);
        assert_eq!(p.limit, 10);
        assert_eq!(p.offset, 0);
        assert_eq!(p.page, 1);
        assert_eq!(p.total_pages, 1);
        assert!(!p.has_next);
        assert!(!p.has_prev);
    }

    #[test]
    fn test_exact_multiple_of_page_size() {
        let p = Pagination::compute(1, 10, 30);
        assert_eq!(p.total_pages, 3);
        assert!(p.has_next);
        assert!(!p.has_prev);
    }

    #[test]
    fn test_last_page() {
        let p = Pagination::compute(3, 10, 25);
        assert_eq!(p.offset, 20);
        assert!(!p.has_next);
        assert!(p.has_prev);
    }

    #[test]
    fn test_out_of_range_inputs_are_clamped() {
        let p = Pagination::compute(0, -5, -3);
        assert_eq!(p.page, 1);
        assert_eq!(p.limit, 1);
        assert_eq!(p.total, 0);
        assert_eq!(p.total_pages, 1);
    }

    #[test]
    fn test_request_defaults() {
        let p = Pagination::from_request(None, None, 25);
        assert_eq!(p.page, 1);
        assert_eq!(p.limit, DEFAULT_PAGE_SIZE);
        assert_eq!(p.total_pages, 3);
    }
}

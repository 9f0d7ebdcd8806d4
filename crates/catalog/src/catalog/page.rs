//! Pagination request validation and the page envelope.

use serde::Serialize;

use crate::error::{CatalogError, CatalogResult};

/// A validated pagination request. Page numbers are zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub number: u32,
    pub size: u32,
}

impl PageRequest {
    /// Validate raw pagination parameters. The page number must be
    /// non-negative and the size positive; an oversized request is capped to
    /// `max_size` rather than rejected.
    pub fn new(number: i64, size: i64, max_size: u32) -> CatalogResult<Self> {
        if number < 0 {
            return Err(CatalogError::InvalidPagination(format!(
                "pageNumber must be non-negative, got {number}"
            )));
        }
        if size <= 0 {
            return Err(CatalogError::InvalidPagination(format!(
                "pageSize must be positive, got {size}"
            )));
        }

        let number = u32::try_from(number).map_err(|_| {
            CatalogError::InvalidPagination(format!("pageNumber {number} out of range"))
        })?;
        let mut size = u32::try_from(size)
            .map_err(|_| CatalogError::InvalidPagination(format!("pageSize {size} out of range")))?;

        if size > max_size {
            tracing::warn!(requested = size, capped = max_size, "pageSize capped");
            size = max_size;
        }

        Ok(Self { number, size })
    }

    pub fn offset(self) -> u64 {
        u64::from(self.number) * u64::from(self.size)
    }

    pub fn limit(self) -> u64 {
        u64::from(self.size)
    }
}

/// One page of results plus pagination metadata. Field names follow the
/// store's wire format.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    /// Total matching elements across all pages.
    #[serde(rename = "totalProducts")]
    pub total: u64,

    #[serde(rename = "pageNumber")]
    pub number: u32,

    #[serde(rename = "pageSize")]
    pub size: u32,

    #[serde(rename = "totalPages")]
    pub total_pages: u32,

    #[serde(rename = "isFirst")]
    pub is_first: bool,

    #[serde(rename = "isLast")]
    pub is_last: bool,

    #[serde(rename = "products")]
    pub items: Vec<T>,
}

/// `ceil(total / size)` without floating point, saturating at `u32::MAX`.
pub(crate) fn total_pages(total: u64, size: u32) -> u32 {
    if size == 0 {
        return 0;
    }
    u32::try_from(total.div_ceil(u64::from(size))).unwrap_or(u32::MAX)
}

/// Reject a page number past the end of the result set. An empty result set
/// (zero pages) is a valid zero-result page, not an error.
pub(crate) fn ensure_in_bounds(number: u32, total_pages: u32) -> CatalogResult<()> {
    if total_pages > 0 && number >= total_pages {
        return Err(CatalogError::InvalidPagination(format!(
            "pageNumber {number} exceeds totalPages {total_pages}"
        )));
    }
    Ok(())
}

impl<T> Page<T> {
    /// Assemble the envelope with consistent pagination scalars.
    pub fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        let total_pages = total_pages(total, request.size);

        Self {
            total,
            number: request.number,
            size: request.size,
            total_pages,
            is_first: request.number == 0,
            is_last: total_pages == 0 || request.number == total_pages - 1,
            items,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn request(number: i64, size: i64) -> PageRequest {
        PageRequest::new(number, size, 100).unwrap()
    }

    #[test]
    fn negative_page_number_rejected() {
        let err = PageRequest::new(-1, 10, 100).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidPagination(_)));
        assert!(err.to_string().contains("pageNumber"));
    }

    #[test]
    fn non_positive_size_rejected() {
        assert!(PageRequest::new(0, 0, 100).is_err());
        assert!(PageRequest::new(0, -5, 100).is_err());
    }

    #[test]
    fn oversized_page_is_capped() {
        let page = PageRequest::new(0, 5000, 100).unwrap();
        assert_eq!(page.size, 100);
    }

    #[test]
    fn offset_is_number_times_size() {
        assert_eq!(request(0, 12).offset(), 0);
        assert_eq!(request(3, 12).offset(), 36);
    }

    #[test]
    fn total_pages_is_ceiling() {
        assert_eq!(total_pages(100, 10), 10);
        assert_eq!(total_pages(101, 10), 11);
        assert_eq!(total_pages(9, 10), 1);
        assert_eq!(total_pages(0, 10), 0);
    }

    #[test]
    fn total_pages_saturates_instead_of_wrapping() {
        assert_eq!(total_pages(u64::MAX, 1), u32::MAX);
        assert_eq!(total_pages(u64::from(u32::MAX) + 1, 1), u32::MAX);
    }

    #[test]
    fn envelope_invariants() {
        let page = Page::new(vec![1, 2, 3], 23, request(0, 10));
        assert_eq!(page.total_pages, 3);
        assert!(page.is_first);
        assert!(!page.is_last);

        let last = Page::new(vec![4], 23, request(2, 10));
        assert!(!last.is_first);
        assert!(last.is_last);
    }

    #[test]
    fn empty_result_is_valid_single_empty_page() {
        let page: Page<i32> = Page::new(vec![], 0, request(0, 10));
        assert_eq!(page.total_pages, 0);
        assert!(page.is_first);
        assert!(page.is_last);
        assert!(ensure_in_bounds(0, 0).is_ok());
    }

    #[test]
    fn page_past_end_rejected() {
        let err = ensure_in_bounds(3, 3).unwrap_err();
        assert!(err.to_string().contains("exceeds totalPages 3"));
        assert!(ensure_in_bounds(2, 3).is_ok());
    }

    #[test]
    fn envelope_serializes_wire_names() {
        let page = Page::new(vec![1], 1, request(0, 10));
        let json = serde_json::to_value(&page).unwrap();
        assert!(json.get("totalProducts").is_some());
        assert!(json.get("pageNumber").is_some());
        assert!(json.get("isFirst").is_some());
        assert!(json.get("products").is_some());
    }
}

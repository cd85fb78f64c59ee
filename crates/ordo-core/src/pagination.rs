//! # Pagination
//!
//! Page requests for the order listing and the envelope returned with
//! each page.
//!
//! ```text
//! pageNumber=2, pageSize=10, totalCount=23
//!
//!   rows:  [0 ........ 9][10 ....... 19][20 .. 22]
//!              page 1         page 2      page 3
//!                             ▲
//!                  OFFSET 10 LIMIT 10      totalPages = ceil(23/10) = 3
//! ```

use serde::Serialize;

use crate::error::{ValidationError, ValidationErrors};
use crate::MAX_PAGE_SIZE;

// =============================================================================
// Page Request
// =============================================================================

/// A validated page number and size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    number: i64,
    size: i64,
}

impl PageRequest {
    /// Validates caller-supplied page values.
    ///
    /// ## Rules
    /// - `pageNumber` must be at least 1
    /// - `pageSize` must be between 1 and [`MAX_PAGE_SIZE`]
    ///
    /// ## Example
    /// ```rust
    /// use ordo_core::PageRequest;
    ///
    /// let page = PageRequest::new(2, 10).unwrap();
    /// assert_eq!(page.offset(), 10);
    /// assert!(PageRequest::new(0, 10).is_err());
    /// ```
    pub fn new(number: i64, size: i64) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if number < 1 {
            errors.push(ValidationError::OutOfRange {
                field: "pageNumber".to_string(),
                min: 1,
                max: i64::from(i32::MAX),
            });
        }

        if !(1..=MAX_PAGE_SIZE).contains(&size) {
            errors.push(ValidationError::OutOfRange {
                field: "pageSize".to_string(),
                min: 1,
                max: MAX_PAGE_SIZE,
            });
        }

        errors.into_result()?;
        Ok(PageRequest { number, size })
    }

    pub fn number(&self) -> i64 {
        self.number
    }

    pub fn size(&self) -> i64 {
        self.size
    }

    /// Rows to skip: `(number - 1) * size`, saturating for absurd page numbers.
    pub fn offset(&self) -> i64 {
        (self.number - 1).saturating_mul(self.size)
    }

    /// Rows to take.
    pub fn limit(&self) -> i64 {
        self.size
    }
}

// =============================================================================
// Paginated Result
// =============================================================================

/// One page of items plus the metadata needed to compute page count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page_number: i64,
    pub page_size: i64,
    pub total_count: i64,
    pub total_pages: i64,
}

impl<T> Paginated<T> {
    /// Builds the envelope, computing `total_pages = ceil(total_count / size)`.
    pub fn new(items: Vec<T>, page: PageRequest, total_count: i64) -> Self {
        let total_pages = (total_count + page.size() - 1) / page.size();
        Paginated {
            items,
            page_number: page.number(),
            page_size: page.size(),
            total_count,
            total_pages,
        }
    }

    /// Maps the items, keeping the metadata (entity → DTO).
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            page_number: self.page_number,
            page_size: self.page_size,
            total_count: self.total_count,
            total_pages: self.total_pages,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_and_limit() {
        let page = PageRequest::new(1, 10).unwrap();
        assert_eq!(page.offset(), 0);
        assert_eq!(page.limit(), 10);

        let page = PageRequest::new(3, 25).unwrap();
        assert_eq!(page.offset(), 50);
    }

    #[test]
    fn test_rejects_non_positive_values() {
        let errors = PageRequest::new(0, 0).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field()).collect();
        assert_eq!(fields, vec!["pageNumber", "pageSize"]);

        assert!(PageRequest::new(-1, 10).is_err());
        assert!(PageRequest::new(1, -5).is_err());
    }

    #[test]
    fn test_rejects_oversized_page() {
        assert!(PageRequest::new(1, MAX_PAGE_SIZE).is_ok());
        assert!(PageRequest::new(1, MAX_PAGE_SIZE + 1).is_err());
    }

    #[test]
    fn test_total_pages() {
        let page = PageRequest::new(1, 10).unwrap();
        assert_eq!(Paginated::<()>::new(vec![], page, 0).total_pages, 0);
        assert_eq!(Paginated::<()>::new(vec![], page, 10).total_pages, 1);
        assert_eq!(Paginated::<()>::new(vec![], page, 23).total_pages, 3);
    }

    #[test]
    fn test_map_keeps_metadata() {
        let page = PageRequest::new(2, 2).unwrap();
        let mapped = Paginated::new(vec![1, 2], page, 5).map(|n| n * 10);

        assert_eq!(mapped.items, vec![10, 20]);
        assert_eq!(mapped.page_number, 2);
        assert_eq!(mapped.total_pages, 3);
    }

    #[test]
    fn test_envelope_json_fields() {
        let page = PageRequest::new(1, 10).unwrap();
        let json = serde_json::to_value(Paginated::new(vec!["a"], page, 1)).unwrap();

        assert_eq!(json["pageNumber"], 1);
        assert_eq!(json["pageSize"], 10);
        assert_eq!(json["totalCount"], 1);
        assert_eq!(json["totalPages"], 1);
        assert_eq!(json["items"][0], "a");
    }
}

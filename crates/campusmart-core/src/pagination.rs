//! Page-based pagination.
//!
//! List endpoints accept `page` (1-indexed, default 1) and `limit`
//! (clamped to 1..=100, default 10). Stores skip `(page - 1) * limit`
//! records and take `limit`. Every page carries the `total` for the same
//! predicate so clients can compute the number of pages.
//!
//! # Example
//!
//! ```ignore
//! // GET /api/listings?page=2&limit=10
//! let params = PaginationParams { page: Some(2), limit: Some(10) };
//! assert_eq!(params.offset(), 10);
//!
//! let page = Page::new(items, total, &params);
//! ```

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::serde::deserialize_optional_i64;

pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

/// Query parameters for pagination.
///
/// Values arrive as strings from the query string. Empty strings are treated
/// as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// Page number (1-indexed, default: 1)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
    /// Items per page (1-100, default: 10)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub limit: Option<i64>,
}

impl PaginationParams {
    pub fn new(page: i64, limit: i64) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
        }
    }

    /// Returns the effective limit, clamped to [1, 100].
    #[must_use]
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    /// Returns the page number, clamped to a minimum of 1.
    #[must_use]
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    /// Number of records to skip: `(page - 1) * limit`.
    #[must_use]
    pub fn offset(&self) -> i64 {
        (self.page() - 1).saturating_mul(self.limit())
    }
}

/// One page of results plus the total for the same predicate.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Total number of matching records across all pages
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
    pub has_more: bool,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64, params: &PaginationParams) -> Self {
        let limit = params.limit();
        let page = params.page();
        let total_pages = if total == 0 { 0 } else { (total + limit - 1) / limit };
        Self {
            has_more: params.offset() + (items.len() as i64) < total,
            items,
            total,
            page,
            limit,
            total_pages,
        }
    }

    /// Swaps in a transformed item list, keeping the page metadata.
    pub fn with_items<U>(self, items: Vec<U>) -> Page<U> {
        Page {
            items,
            total: self.total,
            page: self.page,
            limit: self.limit,
            total_pages: self.total_pages,
            has_more: self.has_more,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
            total_pages: self.total_pages,
            has_more: self.has_more,
        }
    }
}

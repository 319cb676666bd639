//! Listing pipeline types.
//!
//! Provides type definitions for the collection-listing pipeline:
//! - ListQuery: what the executor runs (filters, sorts, columns)
//! - PageRequest / Pagination: the requested slice and its metadata
//! - ListingConfig: defaults threaded into the pipeline

use serde::{Deserialize, Serialize};

use crate::resources::FieldValue;

/// Query parameters that are never interpreted as filters.
pub const RESERVED_PARAMS: [&str; 4] = ["fields", "sort", "page", "limit"];

/// Comparison operators for filtering.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FilterOperator {
    /// Exact match (no bracket suffix).
    Equals,
    /// `[gt]`
    GreaterThan,
    /// `[gte]`
    GreaterOrEqual,
    /// `[lt]`
    LessThan,
    /// `[lte]`
    LessOrEqual,
}

impl FilterOperator {
    /// Parse the bracketed suffix of a parameter name (`gte` in `id[gte]`).
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "gt" => Some(Self::GreaterThan),
            "gte" => Some(Self::GreaterOrEqual),
            "lt" => Some(Self::LessThan),
            "lte" => Some(Self::LessOrEqual),
            _ => None,
        }
    }
}

/// A single field/operator/value constraint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListFilter {
    /// Declared field of the resource.
    pub field: String,

    /// Comparison operator.
    pub operator: FilterOperator,

    /// Value produced by the resource's coercion hook.
    pub value: FieldValue,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Sort specification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListSort {
    /// Field to sort by.
    pub field: String,

    /// Sort direction.
    pub direction: SortDirection,
}

/// Everything an executor needs to count and fetch one listing.
///
/// Filters are ANDed; an empty filter list means no filtering. Sorts apply
/// left to right, each one breaking ties of the previous.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListQuery {
    /// Backing table.
    pub table: String,

    /// Columns to select. Hidden fields are never included.
    pub columns: Vec<String>,

    /// Filter conditions.
    pub filters: Vec<ListFilter>,

    /// Sort order.
    pub sorts: Vec<ListSort>,
}

/// Requested page and page size, both 1-based and at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    /// Number of records to skip.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

/// Why a query parameter was ignored.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// Filter key does not name a declared field.
    UnknownField,
    /// Value rejected by the field's coercion hook.
    InvalidValue,
    /// Sort key does not name a declared field.
    UnknownSortField,
}

/// Diagnostic for a parameter the pipeline ignored.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DroppedParam {
    /// Parameter key, or the sort segment for sort keys.
    pub key: String,
    pub reason: DropReason,
}

/// Pagination metadata returned alongside the items.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Pagination {
    /// Total number of pages.
    pub total_pages: u32,

    /// Records matching the filters, before paging.
    pub total_records: u64,

    /// Link to the requested page.
    pub current_page: String,

    /// Link to the next page, when there is one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page: Option<String>,

    /// Link to the previous page, when there is one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_page: Option<String>,

    /// Ignored parameters, only reported in strict mode.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dropped_params: Vec<DroppedParam>,
}

/// Number of pages needed for `total` records at `limit` per page.
pub fn total_pages(total: u64, limit: u32) -> u32 {
    if limit == 0 {
        return 0;
    }
    u32::try_from(total.div_ceil(u64::from(limit))).unwrap_or(u32::MAX)
}

/// One page of a listing.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ListPage {
    /// Records for this page, in query order.
    pub items: Vec<serde_json::Value>,

    /// Page that was served after defaults and caps were applied.
    #[serde(skip)]
    pub request: PageRequest,

    pub pagination: Pagination,
}

impl ListPage {
    /// Whether a page follows this one.
    pub fn has_next(&self) -> bool {
        self.request.page < self.pagination.total_pages
    }

    /// Whether a page precedes this one.
    pub fn has_prev(&self) -> bool {
        self.request.page > 1
    }
}

/// Listing defaults, threaded explicitly into the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingConfig {
    /// Page size when `limit` is missing or invalid.
    pub default_per_page: u32,

    /// Upper bound for `limit`.
    pub max_per_page: u32,

    /// Report dropped parameters in the pagination metadata.
    pub strict: bool,
}

/// Default page size.
pub const DEFAULT_PER_PAGE: u32 = 5;

/// Default upper bound for the page size.
pub const MAX_PER_PAGE: u32 = 100;

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            default_per_page: DEFAULT_PER_PAGE,
            max_per_page: MAX_PER_PAGE,
            strict: false,
        }
    }
}

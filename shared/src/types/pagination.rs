//! Pagination types for list endpoints

use serde::{Deserialize, Serialize};

/// Default page size for list endpoints
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Maximum page size accepted from clients
pub const MAX_PAGE_SIZE: u32 = 100;

/// Pagination parameters accepted in list query strings
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct PageQuery {
    /// 1-based page number
    #[serde(default = "default_page")]
    pub page: u32,

    /// Items per page
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
        }
    }
}

impl PageQuery {
    /// Clamp the query to sane bounds (page >= 1, 1 <= limit <= max)
    pub fn normalized(self) -> Self {
        Self {
            page: self.page.max(1),
            limit: self.limit.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Offset for SQL queries
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

/// Pagination metadata returned alongside list data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pagination {
    /// Current page number
    pub page: u32,

    /// Items per page
    pub limit: u32,

    /// Total number of items
    pub total: u64,

    /// Total number of pages
    pub total_pages: u64,

    /// Whether a next page exists
    pub has_next: bool,

    /// Whether a previous page exists
    pub has_prev: bool,
}

impl Pagination {
    /// Build pagination metadata from a query and a total count
    pub fn new(query: PageQuery, total: u64) -> Self {
        let limit = u64::from(query.limit.max(1));
        let total_pages = total.div_ceil(limit);
        Self {
            page: query.page,
            limit: query.limit,
            total,
            total_pages,
            has_next: u64::from(query.page) < total_pages,
            has_prev: query.page > 1,
        }
    }
}

/// A page of items plus pagination metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    /// The page of items
    pub items: Vec<T>,

    /// Pagination metadata
    pub pagination: Pagination,
}

impl<T> PaginatedResponse<T> {
    /// Create a paginated response
    pub fn new(items: Vec<T>, query: PageQuery, total: u64) -> Self {
        Self {
            items,
            pagination: Pagination::new(query, total),
        }
    }
}

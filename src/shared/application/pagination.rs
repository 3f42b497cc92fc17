/// Pagination support for queries
///
/// Offset/limit paging used by collection member listings
use serde::{Deserialize, Serialize};

use crate::shared::config::DEFAULT_PAGE_LIMIT;

/// Pagination parameters for queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationParams {
    /// Number of items to skip from the beginning
    pub offset: u32,
    /// Number of items to fetch
    pub limit: u32,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

impl PaginationParams {
    pub fn new(offset: u32, limit: u32) -> Self {
        Self { offset, limit }
    }

    /// Fill in missing request values, falling back to the configured limit
    pub fn from_request(offset: Option<u32>, limit: Option<u32>, default_limit: u32) -> Self {
        Self {
            offset: offset.unwrap_or(0),
            limit: limit.unwrap_or(default_limit),
        }
    }

    /// Offset for database queries
    pub fn offset(&self) -> i64 {
        self.offset as i64
    }

    /// Limit for database queries
    pub fn limit(&self) -> i64 {
        self.limit as i64
    }
}

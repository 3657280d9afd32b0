//! Shared query-string parameter types.

use serde::Deserialize;

/// Default page size when `limit` is omitted.
pub const DEFAULT_LIMIT: i64 = 50;

/// Upper bound on `limit`; larger requests are clamped, not rejected.
pub const MAX_LIMIT: i64 = 100;

/// `?limit=&offset=` pagination parameters.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PaginationParams {
    pub fn limit(&self) -> i64 {
        clamp_limit(self.limit)
    }

    pub fn offset(&self) -> i64 {
        clamp_offset(self.offset)
    }
}

pub fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
}

pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

//! Pagination window and the list response envelope.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_LIMIT: u32 = 100;
pub const MAX_LIMIT: u32 = 1000;

/// Window actually applied to a list call. Always `page >= 1`, `1 <= limit <= MAX_LIMIT`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    page: u32,
    limit: u32,
}

impl Pagination {
    /// Clamp caller input: `page < 1` becomes 1, `limit < 1` becomes the default,
    /// `limit` above the maximum becomes the maximum.
    pub fn clamp(page: i64, limit: i64) -> Self {
        let page = u32::try_from(page.max(1)).unwrap_or(u32::MAX);
        let limit = if limit < 1 {
            DEFAULT_LIMIT
        } else {
            u32::try_from(limit).unwrap_or(MAX_LIMIT).min(MAX_LIMIT)
        };
        Self { page, limit }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Zero-based index of the first item in the window.
    pub fn offset(&self) -> usize {
        (self.page as usize - 1).saturating_mul(self.limit as usize)
    }

    /// Cut the window out of the full, ordered match set.
    pub fn apply(&self, matches: Vec<Value>) -> ListResponse {
        let total = matches.len() as u64;
        let items = matches
            .into_iter()
            .skip(self.offset())
            .take(self.limit as usize)
            .collect();
        ListResponse::new(items, total, *self)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ListResponse {
    pub items: Vec<Value>,
    /// Matches across all pages.
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

impl ListResponse {
    pub fn new(items: Vec<Value>, total: u64, window: Pagination) -> Self {
        Self {
            items,
            total,
            page: window.page,
            limit: window.limit,
        }
    }
}

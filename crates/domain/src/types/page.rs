//! Pagination types

use serde::{Deserialize, Serialize};

/// One page of a listing plus the total row count across all pages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number this slice came from.
    pub page: u32,
    pub page_size: u32,
    /// Rows matching the filter across all pages.
    pub total: u64,
}

impl<T> Page<T> {
    /// Assembles a page.
    pub const fn new(items: Vec<T>, page: u32, page_size: u32, total: u64) -> Self {
        Self { items, page, page_size, total }
    }

    /// Number of pages needed for `total` rows.
    pub const fn total_pages(&self) -> u64 {
        if self.page_size == 0 {
            0
        } else {
            self.total.div_ceil(self.page_size as u64)
        }
    }
}

/// SQL OFFSET for a 1-based page number. Page 0 is treated as page 1.
pub const fn list_offset(page: u32, page_size: u32) -> i64 {
    let page = if page == 0 { 1 } else { page };
    (page as i64 - 1) * page_size as i64
}

//! Pagination metadata

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};

use auvea_app::pagination::Page;

/// Page Metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct PageMeta {
    /// The 1-based page returned
    pub current_page: u32,

    /// The last page holding any results, never below 1
    pub last_page: u64,

    /// Results per page
    pub per_page: u32,

    /// Results across all pages
    pub total: u64,
}

impl<T> From<&Page<T>> for PageMeta {
    fn from(page: &Page<T>) -> Self {
        Self {
            current_page: page.page,
            last_page: page.last_page(),
            per_page: page.per_page,
            total: page.total,
        }
    }
}

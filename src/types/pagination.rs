//! Pagination types for list endpoints.
//!
//! Page numbers are resolved leniently: a missing or non-numeric `page`
//! selects the first page, and any number outside `1..=num_pages` selects
//! the last one. An empty listing still has a single, empty page.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::config::DEFAULT_PAGE_NUMBER;
use crate::domain::{Comment, FollowerSet, PostView, UserResponse};

/// `?page=` query parameter. Kept as raw text so junk values fall back to
/// page 1 instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct PaginationParams {
    /// 1-based page number
    pub page: Option<String>,
}

impl PaginationParams {
    pub fn page(number: u64) -> Self {
        Self {
            page: Some(number.to_string()),
        }
    }

    /// Resolve the requested page against a listing of `total` rows.
    pub fn resolve(&self, total: u64, per_page: u64) -> u64 {
        let last = num_pages(total, per_page);
        match self.page.as_deref().map(str::trim).map(str::parse::<i64>) {
            None | Some(Err(_)) => DEFAULT_PAGE_NUMBER,
            Some(Ok(n)) if n >= 1 && (n as u64) <= last => n as u64,
            Some(Ok(_)) => last,
        }
    }
}

/// Number of pages for `total` rows; never below one.
pub fn num_pages(total: u64, per_page: u64) -> u64 {
    if per_page == 0 {
        return 1;
    }
    total.div_ceil(per_page).max(1)
}

/// Paginated response wrapper
#[derive(Debug, Serialize, ToSchema)]
#[aliases(
    PostPage = Paginated<PostView>,
    UserPage = Paginated<UserResponse>,
    CommentPage = Paginated<Comment>,
    FollowerSetPage = Paginated<FollowerSet>
)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub meta: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct PaginationMeta {
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_previous: bool,
}

impl PaginationMeta {
    pub fn new(page: u64, per_page: u64, total: u64) -> Self {
        let total_pages = num_pages(total, per_page);
        Self {
            page,
            per_page,
            total,
            total_pages,
            has_next: page < total_pages,
            has_previous: page > 1,
        }
    }
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, page: u64, per_page: u64, total: u64) -> Self {
        Self {
            data,
            meta: PaginationMeta::new(page, per_page, total),
        }
    }

    /// An empty first page.
    pub fn empty(per_page: u64) -> Self {
        Self::new(Vec::new(), DEFAULT_PAGE_NUMBER, per_page, 0)
    }

    /// Convert every item, keeping the page metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            data: self.data.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }
}

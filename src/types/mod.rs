//! Shared types used across handlers and services.

mod pagination;
mod response;

pub use pagination::{
    num_pages, CommentPage, FollowerSetPage, Paginated, PaginationMeta, PaginationParams, PostPage,
    UserPage,
};
pub use response::{Created, NoContent};

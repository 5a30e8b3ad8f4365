//! Comment service.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::{ADMIN_PAGE_SIZE, MAX_COMMENT_LENGTH};
use crate::domain::Comment;
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::{Paginated, PaginationParams};

#[async_trait]
pub trait CommentService: Send + Sync {
    /// Comment on a post and bump its comment counter.
    async fn comment(&self, viewer: Uuid, post_id: Uuid, text: String) -> AppResult<Comment>;

    /// A post's comments, newest first.
    async fn list_for_post(&self, post_id: Uuid) -> AppResult<Vec<Comment>>;

    /// Admin comment listing.
    async fn search(
        &self,
        term: Option<String>,
        params: PaginationParams,
    ) -> AppResult<Paginated<Comment>>;
}

pub struct CommentManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> CommentManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> CommentService for CommentManager<U> {
    async fn comment(&self, viewer: Uuid, post_id: Uuid, text: String) -> AppResult<Comment> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::validation("Comment cannot be empty."));
        }
        if text.chars().count() as u64 > MAX_COMMENT_LENGTH {
            return Err(AppError::validation(format!(
                "Comment cannot exceed {} characters.",
                MAX_COMMENT_LENGTH
            )));
        }

        let comment = self
            .uow
            .comments()
            .create(post_id, viewer, text.to_string())
            .await?;
        tracing::debug!(comment_id = %comment.id, %post_id, "Comment added");
        Ok(comment)
    }

    async fn list_for_post(&self, post_id: Uuid) -> AppResult<Vec<Comment>> {
        self.uow.posts().find_by_id(post_id).await?.ok_or_not_found()?;
        self.uow.comments().list_for_post(post_id).await
    }

    async fn search(
        &self,
        term: Option<String>,
        params: PaginationParams,
    ) -> AppResult<Paginated<Comment>> {
        self.uow
            .comments()
            .search(term, params, ADMIN_PAGE_SIZE)
            .await
    }
}

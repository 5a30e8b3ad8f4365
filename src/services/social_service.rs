//! Social graph service: following, unfollowing and "who to follow".

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use super::parallel;
use crate::config::{ADMIN_PAGE_SIZE, SUGGESTION_LIMIT};
use crate::domain::{Author, FollowStats, FollowerSet, User};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::{Paginated, PaginationParams};

#[async_trait]
pub trait SocialService: Send + Sync {
    /// Make `viewer` follow `username`. Following twice is a no-op.
    async fn follow(&self, viewer: Uuid, username: &str) -> AppResult<()>;

    /// Stop following `username`. No-op when not following.
    async fn unfollow(&self, viewer: Uuid, username: &str) -> AppResult<()>;

    /// Up to six random users the viewer does not follow yet.
    /// Anonymous viewers get none.
    async fn suggestions(&self, viewer: Option<Uuid>) -> AppResult<Vec<Author>>;

    async fn follow_stats(&self, user_id: Uuid, viewer: Option<Uuid>) -> AppResult<FollowStats>;

    /// Admin listing of follower sets.
    async fn search_follower_sets(
        &self,
        term: Option<String>,
        params: PaginationParams,
    ) -> AppResult<Paginated<FollowerSet>>;
}

pub struct SocialGraph<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> SocialGraph<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn target(&self, username: &str) -> AppResult<User> {
        self.uow
            .users()
            .find_by_username(username)
            .await?
            .ok_or_not_found()
    }
}

#[async_trait]
impl<U: UnitOfWork> SocialService for SocialGraph<U> {
    async fn follow(&self, viewer: Uuid, username: &str) -> AppResult<()> {
        let target = self.target(username).await?;
        if target.id == viewer {
            return Err(AppError::validation("You cannot follow yourself."));
        }

        self.uow.followers().add(target.id, viewer).await?;
        tracing::debug!(%viewer, followed = %target.id, "Followed");
        Ok(())
    }

    async fn unfollow(&self, viewer: Uuid, username: &str) -> AppResult<()> {
        let target = self.target(username).await?;
        self.uow.followers().remove(target.id, viewer).await?;
        tracing::debug!(%viewer, unfollowed = %target.id, "Unfollowed");
        Ok(())
    }

    async fn suggestions(&self, viewer: Option<Uuid>) -> AppResult<Vec<Author>> {
        let Some(viewer) = viewer else {
            return Ok(Vec::new());
        };

        let users = self
            .uow
            .users()
            .suggestions(viewer, SUGGESTION_LIMIT)
            .await?;
        Ok(users.into_iter().map(Author::from).collect())
    }

    async fn follow_stats(&self, user_id: Uuid, viewer: Option<Uuid>) -> AppResult<FollowStats> {
        let followers = self.uow.followers();
        let is_follower = async {
            match viewer {
                Some(viewer) => followers.is_following(user_id, viewer).await,
                None => Ok(false),
            }
        };

        let (follower_count, following_count, is_follower) = parallel::join3(
            followers.follower_count(user_id),
            followers.following_count(user_id),
            is_follower,
        )
        .await?;

        Ok(FollowStats {
            follower_count,
            following_count,
            is_follower,
        })
    }

    async fn search_follower_sets(
        &self,
        term: Option<String>,
        params: PaginationParams,
    ) -> AppResult<Paginated<FollowerSet>> {
        self.uow
            .followers()
            .search(term, params, ADMIN_PAGE_SIZE)
            .await
    }
}

//! Feed service: the paginated post listings and the profile page.
//!
//! Every feed is newest first, ten posts a page, and comes with a fresh
//! sample of follow suggestions for a signed-in viewer.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use super::post_service::present;
use super::social_service::{SocialGraph, SocialService};
use super::parallel;
use crate::config::FEED_PAGE_SIZE;
use crate::domain::{Author, PostView, UserResponse};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{PostFilter, UnitOfWork};
use crate::types::{Paginated, PaginationParams};

/// Which feed to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feed {
    /// Every post
    Index,
    /// Posts by users the viewer follows
    Following,
    /// Posts the viewer saved
    Saved,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FeedPage {
    #[schema(value_type = PostPage)]
    pub posts: Paginated<PostView>,
    pub suggestions: Vec<Author>,
}

/// A user's profile page.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProfilePage {
    pub user: UserResponse,
    pub posts_count: u64,
    pub follower_count: u64,
    pub following_count: u64,
    /// The viewer follows this user
    pub is_follower: bool,
    #[schema(value_type = PostPage)]
    pub posts: Paginated<PostView>,
    pub suggestions: Vec<Author>,
}

#[async_trait]
pub trait FeedService: Send + Sync {
    /// `Following` and `Saved` need a signed-in viewer.
    async fn feed(
        &self,
        feed: Feed,
        viewer: Option<Uuid>,
        params: PaginationParams,
    ) -> AppResult<FeedPage>;

    async fn profile(
        &self,
        username: &str,
        viewer: Option<Uuid>,
        params: PaginationParams,
    ) -> AppResult<ProfilePage>;
}

pub struct FeedReader<U: UnitOfWork> {
    uow: Arc<U>,
    social: SocialGraph<U>,
}

impl<U: UnitOfWork> FeedReader<U> {
    pub fn new(uow: Arc<U>) -> Self {
        let social = SocialGraph::new(uow.clone());
        Self { uow, social }
    }

    async fn posts(
        &self,
        filter: PostFilter,
        viewer: Option<Uuid>,
        params: PaginationParams,
    ) -> AppResult<Paginated<PostView>> {
        let page = self
            .uow
            .posts()
            .list(filter, params, FEED_PAGE_SIZE)
            .await?;
        present(self.uow.as_ref(), page, viewer).await
    }
}

#[async_trait]
impl<U: UnitOfWork> FeedService for FeedReader<U> {
    async fn feed(
        &self,
        feed: Feed,
        viewer: Option<Uuid>,
        params: PaginationParams,
    ) -> AppResult<FeedPage> {
        let filter = match (feed, viewer) {
            (Feed::Index, _) => PostFilter::All,
            (Feed::Following, Some(viewer)) => PostFilter::FollowedBy(viewer),
            (Feed::Saved, Some(viewer)) => PostFilter::SavedBy(viewer),
            (Feed::Following | Feed::Saved, None) => return Err(AppError::Unauthorized),
        };

        let (posts, suggestions) = parallel::join2(
            self.posts(filter, viewer, params),
            self.social.suggestions(viewer),
        )
        .await?;

        Ok(FeedPage { posts, suggestions })
    }

    async fn profile(
        &self,
        username: &str,
        viewer: Option<Uuid>,
        params: PaginationParams,
    ) -> AppResult<ProfilePage> {
        let user = self
            .uow
            .users()
            .find_by_username(username)
            .await?
            .ok_or_not_found()?;

        let (posts, posts_count, stats, suggestions) = parallel::join4(
            self.posts(PostFilter::CreatedBy(user.id), viewer, params),
            self.uow.posts().count_by_creater(user.id),
            self.social.follow_stats(user.id, viewer),
            self.social.suggestions(viewer),
        )
        .await?;

        Ok(ProfilePage {
            user: user.into(),
            posts_count,
            follower_count: stats.follower_count,
            following_count: stats.following_count,
            is_follower: stats.is_follower,
            posts,
            suggestions,
        })
    }
}

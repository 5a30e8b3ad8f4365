//! Post service: creating, editing and deleting posts, likes and saves.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::ADMIN_PAGE_SIZE;
use crate::domain::{EditedPost, Engagement, NewPost, Post, PostEdit, PostView};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{PostFilter, PostRelation, UnitOfWork};
use crate::types::{Paginated, PaginationParams};

#[async_trait]
pub trait PostService: Send + Sync {
    async fn create(&self, viewer: Uuid, content: NewPost) -> AppResult<PostView>;

    /// Edit a post the viewer created. Other posts read as missing.
    async fn edit(&self, viewer: Uuid, post_id: Uuid, edit: PostEdit) -> AppResult<EditedPost>;

    /// Delete a post the viewer created. Other posts read as missing.
    async fn delete(&self, viewer: Uuid, post_id: Uuid) -> AppResult<()>;

    /// Like/save (`on = true`) or unlike/unsave a post. Idempotent.
    async fn set_relation(
        &self,
        viewer: Uuid,
        post_id: Uuid,
        relation: PostRelation,
        on: bool,
    ) -> AppResult<()>;

    /// Admin post listing.
    async fn search(
        &self,
        term: Option<String>,
        params: PaginationParams,
    ) -> AppResult<Paginated<PostView>>;
}

/// Attach like counts and the viewer's likes/saves to a page of posts.
pub(crate) async fn present<U: UnitOfWork + ?Sized>(
    uow: &U,
    page: Paginated<Post>,
    viewer: Option<Uuid>,
) -> AppResult<Paginated<PostView>> {
    let ids = page.data.iter().map(|post| post.id).collect();
    let mut engagement = uow.posts().engagement(ids, viewer).await?;

    Ok(page.map(|post| {
        let facts = engagement.remove(&post.id).unwrap_or_default();
        PostView::new(post, viewer, facts)
    }))
}

/// Blank text counts as no text.
fn normalize_text(text: Option<String>) -> Option<String> {
    text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
}

fn normalize_image(image: Option<String>) -> Option<String> {
    image.filter(|i| !i.trim().is_empty())
}

pub struct PostManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> PostManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn owned_post(&self, viewer: Uuid, post_id: Uuid) -> AppResult<Post> {
        let post = self.uow.posts().find_by_id(post_id).await?.ok_or_not_found()?;
        if !post.is_owned_by(viewer) {
            tracing::warn!(%viewer, %post_id, "Attempt to modify another user's post");
            return Err(AppError::NotFound);
        }
        Ok(post)
    }
}

#[async_trait]
impl<U: UnitOfWork> PostService for PostManager<U> {
    async fn create(&self, viewer: Uuid, content: NewPost) -> AppResult<PostView> {
        let content = NewPost {
            content_text: normalize_text(content.content_text),
            content_image: normalize_image(content.content_image),
        };
        if content.content_text.is_none() && content.content_image.is_none() {
            return Err(AppError::validation("A post needs text or a picture."));
        }

        let post = self.uow.posts().create(viewer, content).await?;
        tracing::info!(post_id = %post.id, creater = %viewer, "Post created");
        Ok(PostView::new(post, Some(viewer), Engagement::default()))
    }

    async fn edit(&self, viewer: Uuid, post_id: Uuid, edit: PostEdit) -> AppResult<EditedPost> {
        let post = self.owned_post(viewer, post_id).await?;

        let edit = PostEdit {
            content_text: normalize_text(edit.content_text),
            image: edit.image.map(normalize_image),
        };
        let image_after = match &edit.image {
            Some(image) => image.as_ref(),
            None => post.content_image.as_ref(),
        };
        if edit.content_text.is_none() && image_after.is_none() {
            return Err(AppError::validation("A post needs text or a picture."));
        }

        let post = self.uow.posts().update(post_id, edit).await?;
        Ok(EditedPost::from(post))
    }

    async fn delete(&self, viewer: Uuid, post_id: Uuid) -> AppResult<()> {
        self.owned_post(viewer, post_id).await?;
        self.uow.posts().delete(post_id).await?;
        tracing::info!(%post_id, "Post deleted");
        Ok(())
    }

    async fn set_relation(
        &self,
        viewer: Uuid,
        post_id: Uuid,
        relation: PostRelation,
        on: bool,
    ) -> AppResult<()> {
        let posts = self.uow.posts();
        posts.find_by_id(post_id).await?.ok_or_not_found()?;

        if on {
            posts.add_relation(relation, post_id, viewer).await
        } else {
            posts.remove_relation(relation, post_id, viewer).await
        }
    }

    async fn search(
        &self,
        term: Option<String>,
        params: PaginationParams,
    ) -> AppResult<Paginated<PostView>> {
        let filter = match term.filter(|t| !t.trim().is_empty()) {
            Some(term) => PostFilter::Search(term),
            None => PostFilter::All,
        };
        let page = self
            .uow
            .posts()
            .list(filter, params, ADMIN_PAGE_SIZE)
            .await?;
        present(self.uow.as_ref(), page, None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_text_is_no_text() {
        assert_eq!(normalize_text(Some("   ".to_string())), None);
        assert_eq!(normalize_text(None), None);
        assert_eq!(
            normalize_text(Some("  hi \n".to_string())),
            Some("hi".to_string())
        );
    }

    #[test]
    fn blank_image_is_no_image() {
        assert_eq!(normalize_image(Some(String::new())), None);
        assert_eq!(
            normalize_image(Some("posts/cat.png".to_string())),
            Some("posts/cat.png".to_string())
        );
    }
}

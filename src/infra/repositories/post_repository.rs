//! Post repository: posts, their likers and their savers.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use sea_orm::{
    sea_query::{Expr, InsertStatement, OnConflict, Query},
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, QueryTrait, Set,
};
use uuid::Uuid;

use super::entities::{follower, post, post_liker, post_saver, user};
use crate::domain::{Engagement, NewPost, Post, PostEdit};
use crate::errors::{AppError, AppResult};
use crate::types::{Paginated, PaginationParams};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Which posts a listing shows. Every listing is newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostFilter {
    All,
    CreatedBy(Uuid),
    /// Posts by anyone the given user follows
    FollowedBy(Uuid),
    SavedBy(Uuid),
    /// Admin search over creator username and text
    Search(String),
}

/// Many-to-many relations between posts and users.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostRelation {
    Like,
    Save,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Post>>;

    async fn create(&self, creater_id: Uuid, content: NewPost) -> AppResult<Post>;

    async fn update(&self, id: Uuid, edit: PostEdit) -> AppResult<Post>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;

    async fn list(
        &self,
        filter: PostFilter,
        params: PaginationParams,
        per_page: u64,
    ) -> AppResult<Paginated<Post>>;

    async fn count_by_creater(&self, creater_id: Uuid) -> AppResult<u64>;

    /// Add `user_id` to the relation. Adding twice keeps a single row.
    async fn add_relation(&self, relation: PostRelation, post_id: Uuid, user_id: Uuid)
        -> AppResult<()>;

    /// Remove `user_id` from the relation; absent rows are ignored.
    async fn remove_relation(
        &self,
        relation: PostRelation,
        post_id: Uuid,
        user_id: Uuid,
    ) -> AppResult<()>;

    /// Like counts, plus the viewer's likes and saves, for a page of posts.
    async fn engagement(
        &self,
        post_ids: Vec<Uuid>,
        viewer: Option<Uuid>,
    ) -> AppResult<HashMap<Uuid, Engagement>>;
}

pub struct PostStore {
    db: DatabaseConnection,
}

impl PostStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn load(&self, id: Uuid) -> AppResult<Option<Post>> {
        post::Entity::find_by_id(id)
            .find_also_related(user::Entity)
            .one(&self.db)
            .await?
            .map(post::into_domain)
            .transpose()
    }

    async fn viewer_rows(
        &self,
        relation: PostRelation,
        viewer: Uuid,
        post_ids: &[Uuid],
    ) -> AppResult<HashSet<Uuid>> {
        let ids: Vec<Uuid> = match relation {
            PostRelation::Like => {
                post_liker::Entity::find()
                    .select_only()
                    .column(post_liker::Column::PostId)
                    .filter(post_liker::Column::UserId.eq(viewer))
                    .filter(post_liker::Column::PostId.is_in(post_ids.to_vec()))
                    .into_tuple()
                    .all(&self.db)
                    .await?
            }
            PostRelation::Save => {
                post_saver::Entity::find()
                    .select_only()
                    .column(post_saver::Column::PostId)
                    .filter(post_saver::Column::UserId.eq(viewer))
                    .filter(post_saver::Column::PostId.is_in(post_ids.to_vec()))
                    .into_tuple()
                    .all(&self.db)
                    .await?
            }
        };
        Ok(ids.into_iter().collect())
    }
}

/// `None` for the unfiltered listing.
fn filter_condition(filter: PostFilter) -> Option<Condition> {
    let condition = match filter {
        PostFilter::All => return None,
        PostFilter::CreatedBy(user_id) => Condition::all().add(post::Column::CreaterId.eq(user_id)),
        PostFilter::FollowedBy(user_id) => Condition::all()
            .add(post::Column::CreaterId.in_subquery(follower::followed_by(user_id))),
        PostFilter::SavedBy(user_id) => Condition::all().add(
            post::Column::Id.in_subquery(
                Query::select()
                    .column(post_saver::Column::PostId)
                    .from(post_saver::Entity)
                    .and_where(post_saver::Column::UserId.eq(user_id))
                    .to_owned(),
            ),
        ),
        PostFilter::Search(term) => {
            let term = term.trim();
            Condition::any()
                .add(user::Column::Username.contains(term))
                .add(post::Column::ContentText.contains(term))
        }
    };
    Some(condition)
}

/// Insert of one relation row that keeps the existing row on a repeat.
fn relation_insert(relation: PostRelation, post_id: Uuid, user_id: Uuid) -> InsertStatement {
    match relation {
        PostRelation::Like => post_liker::Entity::insert(post_liker::ActiveModel {
            post_id: Set(post_id),
            user_id: Set(user_id),
        })
        .on_conflict(
            OnConflict::columns([post_liker::Column::PostId, post_liker::Column::UserId])
                .do_nothing()
                .to_owned(),
        )
        .into_query(),
        PostRelation::Save => post_saver::Entity::insert(post_saver::ActiveModel {
            post_id: Set(post_id),
            user_id: Set(user_id),
        })
        .on_conflict(
            OnConflict::columns([post_saver::Column::PostId, post_saver::Column::UserId])
                .do_nothing()
                .to_owned(),
        )
        .into_query(),
    }
}

#[async_trait]
impl PostRepository for PostStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Post>> {
        self.load(id).await
    }

    async fn create(&self, creater_id: Uuid, content: NewPost) -> AppResult<Post> {
        let model = post::ActiveModel {
            id: Set(Uuid::new_v4()),
            creater_id: Set(creater_id),
            content_text: Set(content.content_text),
            content_image: Set(content.content_image),
            date_created: Set(chrono::Utc::now()),
            comment_count: Set(0),
        }
        .insert(&self.db)
        .await?;

        self.load(model.id).await?.ok_or_else(|| {
            AppError::internal(format!("Post {} vanished after insert", model.id))
        })
    }

    async fn update(&self, id: Uuid, edit: PostEdit) -> AppResult<Post> {
        let existing = post::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: post::ActiveModel = existing.into();
        active.content_text = Set(edit.content_text);
        if let Some(image) = edit.image {
            active.content_image = Set(image);
        }
        active.update(&self.db).await?;

        self.load(id).await?.ok_or(AppError::NotFound)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = post::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    async fn list(
        &self,
        filter: PostFilter,
        params: PaginationParams,
        per_page: u64,
    ) -> AppResult<Paginated<Post>> {
        let paginator = post::Entity::find()
            .find_also_related(user::Entity)
            .apply_if(filter_condition(filter), |query, condition| query.filter(condition))
            .order_by_desc(post::Column::DateCreated)
            .order_by_desc(post::Column::Id)
            .paginate(&self.db, per_page);

        let total = paginator.num_items().await?;
        let page = params.resolve(total, per_page);
        let rows = paginator.fetch_page(page - 1).await?;

        let posts = rows
            .into_iter()
            .map(post::into_domain)
            .collect::<AppResult<Vec<_>>>()?;

        Ok(Paginated::new(posts, page, per_page, total))
    }

    async fn count_by_creater(&self, creater_id: Uuid) -> AppResult<u64> {
        let count = post::Entity::find()
            .filter(post::Column::CreaterId.eq(creater_id))
            .count(&self.db)
            .await?;
        Ok(count)
    }

    async fn add_relation(
        &self,
        relation: PostRelation,
        post_id: Uuid,
        user_id: Uuid,
    ) -> AppResult<()> {
        let statement = relation_insert(relation, post_id, user_id);
        let backend = self.db.get_database_backend();
        self.db.execute(backend.build(&statement)).await?;
        Ok(())
    }

    async fn remove_relation(
        &self,
        relation: PostRelation,
        post_id: Uuid,
        user_id: Uuid,
    ) -> AppResult<()> {
        match relation {
            PostRelation::Like => {
                post_liker::Entity::delete_many()
                    .filter(post_liker::Column::PostId.eq(post_id))
                    .filter(post_liker::Column::UserId.eq(user_id))
                    .exec(&self.db)
                    .await?;
            }
            PostRelation::Save => {
                post_saver::Entity::delete_many()
                    .filter(post_saver::Column::PostId.eq(post_id))
                    .filter(post_saver::Column::UserId.eq(user_id))
                    .exec(&self.db)
                    .await?;
            }
        }
        Ok(())
    }

    async fn engagement(
        &self,
        post_ids: Vec<Uuid>,
        viewer: Option<Uuid>,
    ) -> AppResult<HashMap<Uuid, Engagement>> {
        let mut result: HashMap<Uuid, Engagement> = post_ids
            .iter()
            .map(|id| (*id, Engagement::default()))
            .collect();
        if post_ids.is_empty() {
            return Ok(result);
        }

        let counts: Vec<(Uuid, i64)> = post_liker::Entity::find()
            .select_only()
            .column(post_liker::Column::PostId)
            .column_as(Expr::col(post_liker::Column::UserId).count(), "like_count")
            .filter(post_liker::Column::PostId.is_in(post_ids.clone()))
            .group_by(post_liker::Column::PostId)
            .into_tuple()
            .all(&self.db)
            .await?;

        for (post_id, count) in counts {
            if let Some(entry) = result.get_mut(&post_id) {
                entry.like_count = count.max(0) as u64;
            }
        }

        if let Some(viewer) = viewer {
            let liked = self.viewer_rows(PostRelation::Like, viewer, &post_ids).await?;
            let saved = self.viewer_rows(PostRelation::Save, viewer, &post_ids).await?;
            for (post_id, entry) in result.iter_mut() {
                entry.liked = liked.contains(post_id);
                entry.saved = saved.contains(post_id);
            }
        }

        Ok(result)
    }
}

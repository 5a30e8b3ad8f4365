//! Comment repository.

use async_trait::async_trait;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QueryTrait, Set, TransactionError, TransactionTrait,
};
use uuid::Uuid;

use super::entities::{comment, post, user};
use crate::domain::Comment;
use crate::errors::{AppError, AppResult};
use crate::types::{Paginated, PaginationParams};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Insert the comment and bump the post's comment counter in one
    /// transaction. `NotFound` if the post is gone.
    async fn create(&self, post_id: Uuid, commenter_id: Uuid, content: String)
        -> AppResult<Comment>;

    /// Every comment on a post, newest first.
    async fn list_for_post(&self, post_id: Uuid) -> AppResult<Vec<Comment>>;

    /// Admin listing, newest first, optionally filtered by commenter, text
    /// or (for a full UUID) the post it belongs to.
    async fn search(
        &self,
        term: Option<String>,
        params: PaginationParams,
        per_page: u64,
    ) -> AppResult<Paginated<Comment>>;
}

pub struct CommentStore {
    db: DatabaseConnection,
}

impl CommentStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn search_condition(term: &str) -> Option<Condition> {
    let term = term.trim();
    if term.is_empty() {
        return None;
    }
    Some(
        Condition::any()
            .add_option(
                Uuid::parse_str(term)
                    .ok()
                    .map(|post_id| comment::Column::PostId.eq(post_id)),
            )
            .add(user::Column::Username.contains(term))
            .add(comment::Column::CommentContent.contains(term)),
    )
}

#[async_trait]
impl CommentRepository for CommentStore {
    async fn create(
        &self,
        post_id: Uuid,
        commenter_id: Uuid,
        content: String,
    ) -> AppResult<Comment> {
        let row = self
            .db
            .transaction::<_, (comment::Model, Option<user::Model>), AppError>(|txn| {
                Box::pin(async move {
                    let bumped = post::Entity::update_many()
                        .col_expr(
                            post::Column::CommentCount,
                            Expr::col(post::Column::CommentCount).add(1),
                        )
                        .filter(post::Column::Id.eq(post_id))
                        .exec(txn)
                        .await?;
                    if bumped.rows_affected == 0 {
                        return Err(AppError::NotFound);
                    }

                    let inserted = comment::ActiveModel {
                        id: Set(Uuid::new_v4()),
                        post_id: Set(post_id),
                        commenter_id: Set(commenter_id),
                        comment_content: Set(content),
                        comment_time: Set(chrono::Utc::now()),
                    }
                    .insert(txn)
                    .await?;

                    let commenter = user::Entity::find_by_id(commenter_id).one(txn).await?;
                    Ok((inserted, commenter))
                })
            })
            .await
            .map_err(|e| match e {
                TransactionError::Connection(db) => AppError::Database(db),
                TransactionError::Transaction(app) => app,
            })?;

        comment::into_domain(row)
    }

    async fn list_for_post(&self, post_id: Uuid) -> AppResult<Vec<Comment>> {
        comment::Entity::find()
            .find_also_related(user::Entity)
            .filter(comment::Column::PostId.eq(post_id))
            .order_by_desc(comment::Column::CommentTime)
            .order_by_desc(comment::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(comment::into_domain)
            .collect()
    }

    async fn search(
        &self,
        term: Option<String>,
        params: PaginationParams,
        per_page: u64,
    ) -> AppResult<Paginated<Comment>> {
        let paginator = comment::Entity::find()
            .find_also_related(user::Entity)
            .apply_if(term.as_deref().and_then(search_condition), |query, condition| {
                query.filter(condition)
            })
            .order_by_desc(comment::Column::CommentTime)
            .paginate(&self.db, per_page);
        let total = paginator.num_items().await?;
        let page = params.resolve(total, per_page);

        let comments = paginator
            .fetch_page(page - 1)
            .await?
            .into_iter()
            .map(comment::into_domain)
            .collect::<AppResult<Vec<_>>>()?;

        Ok(Paginated::new(comments, page, per_page, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::DbBackend;

    fn sql_for(term: &str) -> String {
        comment::Entity::find()
            .find_also_related(user::Entity)
            .apply_if(search_condition(term), |query, condition| query.filter(condition))
            .build(DbBackend::Postgres)
            .to_string()
    }

    #[test]
    fn search_matches_commenter_or_text() {
        let sql = sql_for("nice");
        assert!(sql.contains(r#""users"."username" LIKE '%nice%'"#));
        assert!(sql.contains(r#""comments"."comment_content" LIKE '%nice%'"#));
        assert!(!sql.contains(r#""comments"."post_id" ="#));
    }

    #[test]
    fn uuid_search_also_matches_post() {
        let sql = sql_for("00000000-0000-0000-0000-000000000000");
        assert!(sql.contains(
            r#""comments"."post_id" = '00000000-0000-0000-0000-000000000000' OR "users"."username" LIKE"#
        ));
    }

    #[test]
    fn blank_search_has_no_filter() {
        assert!(search_condition("   ").is_none());
    }
}

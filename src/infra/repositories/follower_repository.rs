//! Follow graph repository.
//!
//! Every user owns one `followers` row (created at registration); the users
//! following them are its `follower_members`.

use async_trait::async_trait;
use sea_orm::{
    sea_query::{OnConflict, Query},
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QueryTrait, SelectTwo, Set, TransactionTrait,
};
use uuid::Uuid;

use super::entities::{follower, follower_member, user};
use crate::domain::FollowerSet;
use crate::errors::{AppError, AppResult};
use crate::types::{Paginated, PaginationParams};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait FollowerRepository: Send + Sync {
    /// Make `follower_id` follow `user_id`. Following twice is a no-op.
    async fn add(&self, user_id: Uuid, follower_id: Uuid) -> AppResult<()>;

    /// Stop `follower_id` following `user_id`. No-op when not following.
    async fn remove(&self, user_id: Uuid, follower_id: Uuid) -> AppResult<()>;

    async fn is_following(&self, user_id: Uuid, follower_id: Uuid) -> AppResult<bool>;

    /// How many users follow `user_id`.
    async fn follower_count(&self, user_id: Uuid) -> AppResult<u64>;

    /// How many users `user_id` follows.
    async fn following_count(&self, user_id: Uuid) -> AppResult<u64>;

    /// Admin listing of follower sets by owner username, optionally
    /// filtered by that username.
    async fn search(
        &self,
        term: Option<String>,
        params: PaginationParams,
        per_page: u64,
    ) -> AppResult<Paginated<FollowerSet>>;
}

pub struct FollowerStore {
    db: DatabaseConnection,
}

impl FollowerStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn set_of(user_id: Uuid) -> sea_orm::sea_query::SelectStatement {
    Query::select()
        .column(follower::Column::Id)
        .from(follower::Entity)
        .and_where(follower::Column::UserId.eq(user_id))
        .to_owned()
}

fn search_query(term: Option<&str>) -> SelectTwo<follower::Entity, user::Entity> {
    let term = term.map(str::trim).filter(|t| !t.is_empty());
    follower::Entity::find()
        .find_also_related(user::Entity)
        .apply_if(term, |query, term| {
            query.filter(user::Column::Username.contains(term))
        })
        .order_by_asc(user::Column::Username)
}

fn into_follower_set(row: (follower::Model, Option<user::Model>)) -> AppResult<FollowerSet> {
    let (set, owner) = row;
    let owner = owner
        .ok_or_else(|| AppError::internal(format!("Follower set {} has no owner row", set.id)))?;
    Ok(FollowerSet {
        id: set.id,
        user: owner.into(),
    })
}

#[async_trait]
impl FollowerRepository for FollowerStore {
    async fn add(&self, user_id: Uuid, follower_id: Uuid) -> AppResult<()> {
        self.db
            .transaction::<_, (), sea_orm::DbErr>(|txn| {
                Box::pin(async move {
                    // Accounts created outside registration may lack their set.
                    follower::Entity::insert(follower::ActiveModel {
                        id: Set(Uuid::new_v4()),
                        user_id: Set(user_id),
                    })
                    .on_conflict(
                        OnConflict::column(follower::Column::UserId)
                            .do_nothing()
                            .to_owned(),
                    )
                    .exec_without_returning(txn)
                    .await?;

                    let set = follower::Entity::find()
                        .filter(follower::Column::UserId.eq(user_id))
                        .one(txn)
                        .await?
                        .ok_or_else(|| {
                            sea_orm::DbErr::RecordNotFound(format!(
                                "follower set for {user_id}"
                            ))
                        })?;

                    follower_member::Entity::insert(follower_member::ActiveModel {
                        follower_id: Set(set.id),
                        user_id: Set(follower_id),
                    })
                    .on_conflict(
                        OnConflict::columns([
                            follower_member::Column::FollowerId,
                            follower_member::Column::UserId,
                        ])
                        .do_nothing()
                        .to_owned(),
                    )
                    .exec_without_returning(txn)
                    .await?;

                    Ok(())
                })
            })
            .await
            .map_err(AppError::from)
    }

    async fn remove(&self, user_id: Uuid, follower_id: Uuid) -> AppResult<()> {
        follower_member::Entity::delete_many()
            .filter(follower_member::Column::FollowerId.in_subquery(set_of(user_id)))
            .filter(follower_member::Column::UserId.eq(follower_id))
            .exec(&self.db)
            .await?;
        Ok(())
    }

    async fn is_following(&self, user_id: Uuid, follower_id: Uuid) -> AppResult<bool> {
        let count = follower_member::Entity::find()
            .filter(follower_member::Column::FollowerId.in_subquery(set_of(user_id)))
            .filter(follower_member::Column::UserId.eq(follower_id))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn follower_count(&self, user_id: Uuid) -> AppResult<u64> {
        let count = follower_member::Entity::find()
            .filter(follower_member::Column::FollowerId.in_subquery(set_of(user_id)))
            .count(&self.db)
            .await?;
        Ok(count)
    }

    async fn following_count(&self, user_id: Uuid) -> AppResult<u64> {
        let count = follower_member::Entity::find()
            .filter(follower_member::Column::UserId.eq(user_id))
            .count(&self.db)
            .await?;
        Ok(count)
    }

    async fn search(
        &self,
        term: Option<String>,
        params: PaginationParams,
        per_page: u64,
    ) -> AppResult<Paginated<FollowerSet>> {
        let paginator = search_query(term.as_deref()).paginate(&self.db, per_page);
        let total = paginator.num_items().await?;
        let page = params.resolve(total, per_page);

        let sets = paginator
            .fetch_page(page - 1)
            .await?
            .into_iter()
            .map(into_follower_set)
            .collect::<AppResult<Vec<_>>>()?;

        Ok(Paginated::new(sets, page, per_page, total))
    }
}

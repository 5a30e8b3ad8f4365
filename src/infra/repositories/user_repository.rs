//! User repository.

use async_trait::async_trait;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait,
    Order, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set, TransactionError,
    TransactionTrait,
};
use uuid::Uuid;

use super::entities::{follower, user};
use crate::config::ROLE_USER;
use crate::domain::{NewUser, ProfileChanges, User, UserRole};
use crate::errors::{AppError, AppResult};
use crate::types::{Paginated, PaginationParams};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// Insert the account together with its (empty) follower set.
    /// A taken username yields `Conflict`.
    async fn create(&self, new_user: NewUser) -> AppResult<User>;

    async fn update_profile(&self, id: Uuid, changes: ProfileChanges) -> AppResult<User>;

    async fn set_role(&self, username: &str, role: UserRole) -> AppResult<User>;

    /// Random sample of users `viewer_id` does not follow, excluding the viewer.
    async fn suggestions(&self, viewer_id: Uuid, limit: u64) -> AppResult<Vec<User>>;

    /// Admin listing ordered by username, optionally filtered by a search term.
    async fn search(
        &self,
        term: Option<String>,
        params: PaginationParams,
        per_page: u64,
    ) -> AppResult<Paginated<User>>;
}

/// Everyone except `viewer_id` and the users they already follow, shuffled.
fn suggestions_query(viewer_id: Uuid, limit: u64) -> Select<user::Entity> {
    user::Entity::find()
        .filter(user::Column::Id.ne(viewer_id))
        .filter(user::Column::Id.not_in_subquery(follower::followed_by(viewer_id)))
        .order_by(Expr::cust("RANDOM()"), Order::Asc)
        .limit(limit)
}

pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let model = user::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(User::from))
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await?;
        Ok(model.map(User::from))
    }

    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let now = chrono::Utc::now();
        let account = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            username: Set(new_user.username),
            email: Set(new_user.email),
            password_hash: Set(new_user.password_hash),
            first_name: Set(new_user.first_name),
            last_name: Set(new_user.last_name),
            bio: Set(String::new()),
            profile_pic: Set(new_user.profile_pic),
            cover: Set(new_user.cover),
            role: Set(ROLE_USER.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = self
            .db
            .transaction::<_, user::Model, sea_orm::DbErr>(|txn| {
                Box::pin(async move {
                    let model = account.insert(txn).await?;
                    follower::ActiveModel {
                        id: Set(Uuid::new_v4()),
                        user_id: Set(model.id),
                    }
                    .insert(txn)
                    .await?;
                    Ok(model)
                })
            })
            .await
            .map_err(|e| match e {
                TransactionError::Connection(e) | TransactionError::Transaction(e) => {
                    AppError::unique_violation(e, "Username")
                }
            })?;

        Ok(User::from(model))
    }

    async fn update_profile(&self, id: Uuid, changes: ProfileChanges) -> AppResult<User> {
        let existing = user::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: user::ActiveModel = existing.into();
        if let Some(first_name) = changes.first_name {
            active.first_name = Set(first_name);
        }
        if let Some(last_name) = changes.last_name {
            active.last_name = Set(last_name);
        }
        if let Some(profile_pic) = changes.profile_pic {
            active.profile_pic = Set(profile_pic);
        }
        active.bio = Set(changes.bio);
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await?;
        Ok(User::from(model))
    }

    async fn set_role(&self, username: &str, role: UserRole) -> AppResult<User> {
        let existing = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: user::ActiveModel = existing.into();
        active.role = Set(role.to_string());
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await?;
        Ok(User::from(model))
    }

    async fn suggestions(&self, viewer_id: Uuid, limit: u64) -> AppResult<Vec<User>> {
        let models = suggestions_query(viewer_id, limit).all(&self.db).await?;

        Ok(models.into_iter().map(User::from).collect())
    }

    async fn search(
        &self,
        term: Option<String>,
        params: PaginationParams,
        per_page: u64,
    ) -> AppResult<Paginated<User>> {
        let mut select = user::Entity::find().order_by_asc(user::Column::Username);
        if let Some(term) = term.filter(|t| !t.trim().is_empty()) {
            let term = term.trim();
            select = select.filter(
                Condition::any()
                    .add(user::Column::Username.contains(term))
                    .add(user::Column::Email.contains(term))
                    .add(user::Column::FirstName.contains(term))
                    .add(user::Column::LastName.contains(term)),
            );
        }

        let paginator = select.paginate(&self.db, per_page);
        let total = paginator.num_items().await?;
        let page = params.resolve(total, per_page);
        let models = paginator.fetch_page(page - 1).await?;

        Ok(Paginated::new(
            models.into_iter().map(User::from).collect(),
            page,
            per_page,
            total,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, QueryTrait};

    #[test]
    fn suggestions_skip_viewer_and_followed_users() {
        let sql = suggestions_query(Uuid::nil(), 6)
            .build(DbBackend::Postgres)
            .to_string();
        assert!(sql.contains(
            r#""users"."id" <> '00000000-0000-0000-0000-000000000000' AND "users"."id" NOT IN (SELECT "followers"."user_id" FROM "followers""#
        ));
        assert!(sql.contains(
            r#""follower_members"."user_id" = '00000000-0000-0000-0000-000000000000'"#
        ));
        assert!(sql.ends_with("ORDER BY RANDOM() ASC LIMIT 6"));
    }
}

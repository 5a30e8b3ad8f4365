//! User service: profile lookups, profile settings and roles.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::ADMIN_PAGE_SIZE;
use crate::domain::{ProfileChanges, User, UserResponse, UserRole};
use crate::errors::{AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::{Paginated, PaginationParams};

#[async_trait]
pub trait UserService: Send + Sync {
    async fn get_user(&self, id: Uuid) -> AppResult<User>;

    async fn get_by_username(&self, username: &str) -> AppResult<User>;

    /// Apply an "edit profile" form. An absent bio clears it.
    async fn update_profile(&self, id: Uuid, changes: ProfileChanges) -> AppResult<User>;

    async fn set_role(&self, username: &str, role: UserRole) -> AppResult<User>;

    /// Admin user listing.
    async fn search(
        &self,
        term: Option<String>,
        params: PaginationParams,
    ) -> AppResult<Paginated<UserResponse>>;
}

pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> UserManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn get_user(&self, id: Uuid) -> AppResult<User> {
        self.uow.users().find_by_id(id).await?.ok_or_not_found()
    }

    async fn get_by_username(&self, username: &str) -> AppResult<User> {
        self.uow
            .users()
            .find_by_username(username)
            .await?
            .ok_or_not_found()
    }

    async fn update_profile(&self, id: Uuid, changes: ProfileChanges) -> AppResult<User> {
        let user = self.uow.users().update_profile(id, changes).await?;
        tracing::debug!(user_id = %id, "Profile updated");
        Ok(user)
    }

    async fn set_role(&self, username: &str, role: UserRole) -> AppResult<User> {
        let user = self.uow.users().set_role(username, role).await?;
        tracing::info!(username, role = %role, "Role changed");
        Ok(user)
    }

    async fn search(
        &self,
        term: Option<String>,
        params: PaginationParams,
    ) -> AppResult<Paginated<UserResponse>> {
        let page = self
            .uow
            .users()
            .search(term, params, ADMIN_PAGE_SIZE)
            .await?;
        Ok(page.map(UserResponse::from))
    }
}

//! Service Container - Centralized service access with parallel execution support.
//!
//! Handlers reach every use case through `ServiceContainer`, which hands out
//! trait objects so tests can swap in mocks.

use std::future::Future;
use std::sync::Arc;

use super::{AuthService, CommentService, FeedService, PostService, SocialService, UserService};
use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::{Persistence, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn users(&self) -> Arc<dyn UserService>;

    fn feeds(&self) -> Arc<dyn FeedService>;

    fn posts(&self) -> Arc<dyn PostService>;

    fn comments(&self) -> Arc<dyn CommentService>;

    fn social(&self) -> Arc<dyn SocialService>;
}

/// Concrete implementation of ServiceContainer
#[derive(Clone)]
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    user_service: Arc<dyn UserService>,
    feed_service: Arc<dyn FeedService>,
    post_service: Arc<dyn PostService>,
    comment_service: Arc<dyn CommentService>,
    social_service: Arc<dyn SocialService>,
}

impl Services {
    /// Build every service over the Postgres-backed Unit of Work.
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: Config) -> Self {
        Self::with_unit_of_work(Arc::new(Persistence::new(db)), config)
    }

    /// Build every service over one Unit of Work.
    pub fn with_unit_of_work<U: UnitOfWork + 'static>(uow: Arc<U>, config: Config) -> Self {
        use super::{
            Authenticator, CommentManager, FeedReader, PostManager, SocialGraph, UserManager,
        };

        Self {
            auth_service: Arc::new(Authenticator::new(uow.clone(), config)),
            user_service: Arc::new(UserManager::new(uow.clone())),
            feed_service: Arc::new(FeedReader::new(uow.clone())),
            post_service: Arc::new(PostManager::new(uow.clone())),
            comment_service: Arc::new(CommentManager::new(uow.clone())),
            social_service: Arc::new(SocialGraph::new(uow)),
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    fn feeds(&self) -> Arc<dyn FeedService> {
        self.feed_service.clone()
    }

    fn posts(&self) -> Arc<dyn PostService> {
        self.post_service.clone()
    }

    fn comments(&self) -> Arc<dyn CommentService> {
        self.comment_service.clone()
    }

    fn social(&self) -> Arc<dyn SocialService> {
        self.social_service.clone()
    }
}

/// Run independent reads of one request concurrently.
///
/// Each helper returns when every future completes, or with the first error.
pub mod parallel {
    use super::*;
    use tokio::try_join;

    pub async fn join2<F1, F2, T1, T2>(f1: F1, f2: F2) -> AppResult<(T1, T2)>
    where
        F1: Future<Output = AppResult<T1>>,
        F2: Future<Output = AppResult<T2>>,
    {
        try_join!(f1, f2)
    }

    pub async fn join3<F1, F2, F3, T1, T2, T3>(
        f1: F1,
        f2: F2,
        f3: F3,
    ) -> AppResult<(T1, T2, T3)>
    where
        F1: Future<Output = AppResult<T1>>,
        F2: Future<Output = AppResult<T2>>,
        F3: Future<Output = AppResult<T3>>,
    {
        try_join!(f1, f2, f3)
    }

    pub async fn join4<F1, F2, F3, F4, T1, T2, T3, T4>(
        f1: F1,
        f2: F2,
        f3: F3,
        f4: F4,
    ) -> AppResult<(T1, T2, T3, T4)>
    where
        F1: Future<Output = AppResult<T1>>,
        F2: Future<Output = AppResult<T2>>,
        F3: Future<Output = AppResult<T3>>,
        F4: Future<Output = AppResult<T4>>,
    {
        try_join!(f1, f2, f3, f4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;

    #[tokio::test]
    async fn join2_returns_both_results() {
        async fn op1() -> AppResult<i32> {
            Ok(1)
        }
        async fn op2() -> AppResult<&'static str> {
            Ok("two")
        }

        let (a, b) = parallel::join2(op1(), op2()).await.unwrap();
        assert_eq!(a, 1);
        assert_eq!(b, "two");
    }

    #[tokio::test]
    async fn join3_short_circuits_on_error() {
        let result = parallel::join3(
            async { Ok::<_, AppError>(1) },
            async { Err::<i32, _>(AppError::NotFound) },
            async { Ok::<_, AppError>(3) },
        )
        .await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }
}

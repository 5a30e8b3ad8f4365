//! Unit of Work: one place to reach every repository.
//!
//! Multi-row writes that must be atomic (registration, commenting, following)
//! run inside a SeaORM transaction within the repository method itself, so
//! services only ever see the repository traits and stay mockable.

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use super::repositories::{
    CommentRepository, CommentStore, FollowerRepository, FollowerStore, PostRepository, PostStore,
    UserRepository, UserStore,
};

/// Repository access for the service layer.
pub trait UnitOfWork: Send + Sync {
    fn users(&self) -> Arc<dyn UserRepository>;

    fn posts(&self) -> Arc<dyn PostRepository>;

    fn comments(&self) -> Arc<dyn CommentRepository>;

    fn followers(&self) -> Arc<dyn FollowerRepository>;
}

/// Concrete Unit of Work backed by a SeaORM connection pool.
pub struct Persistence {
    user_repo: Arc<UserStore>,
    post_repo: Arc<PostStore>,
    comment_repo: Arc<CommentStore>,
    follower_repo: Arc<FollowerStore>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            user_repo: Arc::new(UserStore::new(db.clone())),
            post_repo: Arc::new(PostStore::new(db.clone())),
            comment_repo: Arc::new(CommentStore::new(db.clone())),
            follower_repo: Arc::new(FollowerStore::new(db)),
        }
    }
}

impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn posts(&self) -> Arc<dyn PostRepository> {
        self.post_repo.clone()
    }

    fn comments(&self) -> Arc<dyn CommentRepository> {
        self.comment_repo.clone()
    }

    fn followers(&self) -> Arc<dyn FollowerRepository> {
        self.follower_repo.clone()
    }
}

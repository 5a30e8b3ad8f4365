//! Infrastructure layer - External systems integration
//!
//! - Database connection, migrations and repositories (PostgreSQL via SeaORM)
//! - Sessions and rate limiting (Redis)
//! - Unit of Work for repository access

pub mod cache;
pub mod db;
pub mod repositories;
pub mod unit_of_work;

pub use cache::{Cache, CacheBackend, SessionRecord};
pub use db::{Database, Migrator};
pub use repositories::{
    CommentRepository, CommentStore, FollowerRepository, FollowerStore, PostFilter, PostRelation,
    PostRepository, PostStore, UserRepository, UserStore,
};
pub use unit_of_work::{Persistence, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use cache::MockCacheBackend;
#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{
    MockCommentRepository, MockFollowerRepository, MockPostRepository, MockUserRepository,
};

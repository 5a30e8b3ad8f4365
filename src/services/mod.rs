//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on the repository traits behind
//! the Unit of Work, never on SeaORM directly.

mod auth_service;
mod comment_service;
pub mod container;
mod feed_service;
mod post_service;
mod social_service;
mod user_service;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use auth_service::{
    AuthService, AuthSession, Authenticator, Claims, Registration, TokenResponse,
};
pub use comment_service::{CommentManager, CommentService};
pub use feed_service::{Feed, FeedPage, FeedReader, FeedService, ProfilePage};
pub use post_service::{PostManager, PostService};
pub use social_service::{SocialGraph, SocialService};
pub use user_service::{UserManager, UserService};

// Parallel execution utilities
pub use container::parallel;

#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;

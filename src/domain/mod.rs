//! Domain layer - Core business entities and logic
//!
//! Entities and value objects of the network: users, posts, comments and
//! the follow graph. Nothing here touches the database or HTTP.

pub mod comment;
pub mod follow;
pub mod password;
pub mod post;
pub mod user;

pub use comment::Comment;
pub use follow::{FollowStats, FollowerSet};
pub use password::Password;
pub use post::{EditedPost, Engagement, NewPost, Post, PostEdit, PostView};
pub use user::{
    Author, NewUser, ProfileChanges, ProfileSettings, User, UserResponse, UserRole,
};

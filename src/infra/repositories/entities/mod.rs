//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod comment;
pub mod follower;
pub mod follower_member;
pub mod post;
pub mod post_liker;
pub mod post_saver;
pub mod user;

//! HTTP request handlers.

pub mod admin_handler;
pub mod auth_handler;
pub mod comment_handler;
pub mod feed_handler;
pub mod post_handler;
pub mod profile_handler;
pub mod social_handler;

pub use admin_handler::admin_routes;
pub use auth_handler::{auth_routes, logout_routes};
pub use comment_handler::comment_routes;
pub use feed_handler::{feed_routes, public_feed_routes};
pub use post_handler::post_routes;
pub use profile_handler::profile_routes;
pub use social_handler::social_routes;

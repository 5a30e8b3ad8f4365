//! Social network API
//!
//! A JSON backend for a small social network: posts, comments, likes,
//! bookmarks, follows and profiles, with admin listings.
//!
//! # Architecture Layers
//!
//! - **cli** / **commands**: command-line interface and its commands
//! - **config**: configuration and constants
//! - **domain**: entities and value objects
//! - **services**: use cases behind traits
//! - **infra**: PostgreSQL (SeaORM), Redis, Unit of Work
//! - **api**: axum handlers, middleware, extractors and routes
//! - **types**: pagination and response helpers
//! - **errors**: the `AppError` type and its HTTP mapping
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server (applies pending migrations)
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//!
//! # Make someone an administrator
//! cargo run -- admin promote ada
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Password, User, UserRole};
pub use errors::{AppError, AppResult};
pub use infra::Cache;

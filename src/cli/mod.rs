//! CLI module - Command-line interface for the application.
//!
//! - `serve` - Start the HTTP server
//! - `migrate` - Database migrations
//! - `admin` - Promote or demote administrators

pub mod args;

pub use args::{Cli, Commands};

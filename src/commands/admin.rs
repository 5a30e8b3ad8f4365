//! Admin command - Grant or revoke the admin role.

use std::sync::Arc;

use crate::cli::args::{AdminAction, AdminArgs};
use crate::config::Config;
use crate::domain::UserRole;
use crate::errors::{AppError, AppResult};
use crate::infra::{Database, Persistence};
use crate::services::{UserManager, UserService};

pub async fn execute(args: AdminArgs, config: Config) -> AppResult<()> {
    let db = Database::connect_without_migrations(&config)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;
    let users = UserManager::new(Arc::new(Persistence::new(db.get_connection())));

    let (username, role) = match args.action {
        AdminAction::Promote { username } => (username, UserRole::Admin),
        AdminAction::Demote { username } => (username, UserRole::User),
    };

    match users.set_role(&username, role).await {
        Ok(user) => {
            println!("{}: {}", user.username, user.role);
            Ok(())
        }
        Err(AppError::NotFound) => Err(AppError::validation(format!(
            "No user named '{}'",
            username
        ))),
        Err(e) => Err(e),
    }
}

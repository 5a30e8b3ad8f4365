//! Follow and unfollow.

use axum::{
    extract::{Path, State},
    routing::put,
    Router,
};

use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::errors::AppResult;
use crate::types::NoContent;

pub fn social_routes() -> Router<AppState> {
    Router::new()
        .route("/users/:username/follow", put(follow))
        .route("/users/:username/unfollow", put(unfollow))
}

/// Follow a user
#[utoipa::path(
    put,
    path = "/users/{username}/follow",
    tag = "Social",
    params(("username" = String, Path, description = "User to follow")),
    responses(
        (status = 204, description = "Following"),
        (status = 400, description = "Tried to follow yourself"),
        (status = 404, description = "No such user")
    ),
    security(("bearer_auth" = []))
)]
pub async fn follow(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(username): Path<String>,
) -> AppResult<NoContent> {
    state.services.social().follow(user.id, &username).await?;
    Ok(NoContent)
}

/// Stop following a user
#[utoipa::path(
    put,
    path = "/users/{username}/unfollow",
    tag = "Social",
    params(("username" = String, Path, description = "User to unfollow")),
    responses(
        (status = 204, description = "Not following"),
        (status = 404, description = "No such user")
    ),
    security(("bearer_auth" = []))
)]
pub async fn unfollow(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(username): Path<String>,
) -> AppResult<NoContent> {
    state.services.social().unfollow(user.id, &username).await?;
    Ok(NoContent)
}

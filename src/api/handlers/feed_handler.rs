//! Feed handlers: the post listings and profile pages.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::get,
    Router,
};

use crate::api::extractors::Viewer;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::errors::AppResult;
use crate::services::{Feed, FeedPage, ProfilePage};
use crate::types::PaginationParams;

/// Feeds anyone may read.
pub fn public_feed_routes() -> Router<AppState> {
    Router::new()
        .route("/posts", get(index))
        .route("/users/:username", get(profile))
}

/// Feeds that only make sense for a signed-in viewer.
pub fn feed_routes() -> Router<AppState> {
    Router::new()
        .route("/posts/following", get(following))
        .route("/posts/saved", get(saved))
}

/// Every post, newest first
#[utoipa::path(
    get,
    path = "/posts",
    tag = "Feeds",
    params(PaginationParams),
    responses((status = 200, description = "One page of posts", body = FeedPage)),
    security((), ("bearer_auth" = []))
)]
pub async fn index(
    State(state): State<AppState>,
    viewer: Viewer,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<FeedPage>> {
    let page = state
        .services
        .feeds()
        .feed(Feed::Index, viewer.id(), params)
        .await?;
    Ok(Json(page))
}

/// Posts by users the viewer follows
#[utoipa::path(
    get,
    path = "/posts/following",
    tag = "Feeds",
    params(PaginationParams),
    responses(
        (status = 200, description = "One page of posts", body = FeedPage),
        (status = 401, description = "Not signed in")
    ),
    security(("bearer_auth" = []))
)]
pub async fn following(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<FeedPage>> {
    let page = state
        .services
        .feeds()
        .feed(Feed::Following, Some(user.id), params)
        .await?;
    Ok(Json(page))
}

/// Posts the viewer saved
#[utoipa::path(
    get,
    path = "/posts/saved",
    tag = "Feeds",
    params(PaginationParams),
    responses(
        (status = 200, description = "One page of posts", body = FeedPage),
        (status = 401, description = "Not signed in")
    ),
    security(("bearer_auth" = []))
)]
pub async fn saved(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<FeedPage>> {
    let page = state
        .services
        .feeds()
        .feed(Feed::Saved, Some(user.id), params)
        .await?;
    Ok(Json(page))
}

/// A user's profile with their posts and follow counters
#[utoipa::path(
    get,
    path = "/users/{username}",
    tag = "Feeds",
    params(
        ("username" = String, Path, description = "Profile owner"),
        PaginationParams
    ),
    responses(
        (status = 200, description = "Profile page", body = ProfilePage),
        (status = 404, description = "No such user")
    ),
    security((), ("bearer_auth" = []))
)]
pub async fn profile(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(username): Path<String>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<ProfilePage>> {
    let page = state
        .services
        .feeds()
        .profile(&username, viewer.id(), params)
        .await?;
    Ok(Json(page))
}

//! Admin listings of users, posts, comments and follower sets.

use axum::{
    extract::{Query, State},
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::api::AppState;
use crate::errors::AppResult;
use crate::types::{CommentPage, FollowerSetPage, PaginationParams, PostPage, UserPage};

/// `?page=&search=` on admin listings.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct AdminQuery {
    /// 1-based page number
    pub page: Option<String>,
    /// Case-sensitive substring to look for
    pub search: Option<String>,
}

impl AdminQuery {
    fn split(self) -> (Option<String>, PaginationParams) {
        (self.search, PaginationParams { page: self.page })
    }
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/posts", get(list_posts))
        .route("/comments", get(list_comments))
        .route("/followers", get(list_followers))
}

/// Users by username, searchable by username, email and name
#[utoipa::path(
    get,
    path = "/admin/users",
    tag = "Admin",
    params(AdminQuery),
    responses(
        (status = 200, description = "One page of users", body = UserPage),
        (status = 403, description = "Admin role required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<AdminQuery>,
) -> AppResult<Json<UserPage>> {
    let (term, params) = query.split();
    Ok(Json(state.services.users().search(term, params).await?))
}

/// Posts newest first, searchable by creator and text
#[utoipa::path(
    get,
    path = "/admin/posts",
    tag = "Admin",
    params(AdminQuery),
    responses(
        (status = 200, description = "One page of posts", body = PostPage),
        (status = 403, description = "Admin role required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<AdminQuery>,
) -> AppResult<Json<PostPage>> {
    let (term, params) = query.split();
    Ok(Json(state.services.posts().search(term, params).await?))
}

/// Comments newest first, searchable by commenter, text and post id
#[utoipa::path(
    get,
    path = "/admin/comments",
    tag = "Admin",
    params(AdminQuery),
    responses(
        (status = 200, description = "One page of comments", body = CommentPage),
        (status = 403, description = "Admin role required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_comments(
    State(state): State<AppState>,
    Query(query): Query<AdminQuery>,
) -> AppResult<Json<CommentPage>> {
    let (term, params) = query.split();
    Ok(Json(state.services.comments().search(term, params).await?))
}

/// Follower sets by owner, searchable by owner username
#[utoipa::path(
    get,
    path = "/admin/followers",
    tag = "Admin",
    params(AdminQuery),
    responses(
        (status = 200, description = "One page of follower sets", body = FollowerSetPage),
        (status = 403, description = "Admin role required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_followers(
    State(state): State<AppState>,
    Query(query): Query<AdminQuery>,
) -> AppResult<Json<FollowerSetPage>> {
    let (term, params) = query.split();
    Ok(Json(
        state
            .services
            .social()
            .search_follower_sets(term, params)
            .await?,
    ))
}

//! Comment handlers.

use axum::{
    extract::State,
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::{PostId, ValidatedJson};
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::Comment;
use crate::errors::AppResult;
use crate::types::Created;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CommentRequest {
    #[schema(example = "Nice shot!")]
    pub comment_text: String,
}

pub fn comment_routes() -> Router<AppState> {
    Router::new().route("/posts/:id/comments", get(list_comments).post(add_comment))
}

/// A post's comments, newest first
#[utoipa::path(
    get,
    path = "/posts/{id}/comments",
    tag = "Comments",
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Comments", body = [Comment]),
        (status = 404, description = "No such post")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_comments(
    State(state): State<AppState>,
    _user: CurrentUser,
    PostId(id): PostId,
) -> AppResult<Json<Vec<Comment>>> {
    let comments = state.services.comments().list_for_post(id).await?;
    Ok(Json(comments))
}

/// Comment on a post
///
/// Answers with a one-element list holding the new comment.
#[utoipa::path(
    post,
    path = "/posts/{id}/comments",
    tag = "Comments",
    params(("id" = Uuid, Path, description = "Post ID")),
    request_body = CommentRequest,
    responses(
        (status = 201, description = "Comment added", body = [Comment]),
        (status = 400, description = "Empty comment"),
        (status = 404, description = "No such post")
    ),
    security(("bearer_auth" = []))
)]
pub async fn add_comment(
    State(state): State<AppState>,
    user: CurrentUser,
    PostId(id): PostId,
    ValidatedJson(payload): ValidatedJson<CommentRequest>,
) -> AppResult<Created<Vec<Comment>>> {
    let comment = state
        .services
        .comments()
        .comment(user.id, id, payload.comment_text)
        .await?;
    Ok(Created(vec![comment]))
}

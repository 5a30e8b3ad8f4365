//! Post handlers: writing, editing, deleting, liking and saving posts.

use axum::{
    extract::State,
    response::Json,
    routing::{post, put},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::{PostId, ValidatedJson};
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{EditedPost, NewPost, PostEdit, PostView};
use crate::errors::AppResult;
use crate::infra::PostRelation;
use crate::types::{Created, NoContent};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePostRequest {
    #[schema(example = "Hello, network!")]
    pub text: Option<String>,
    /// Image reference
    pub picture: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct EditPostRequest {
    /// Replaces the text; absent or blank clears it
    pub text: Option<String>,
    pub picture: Option<String>,
    /// Replace the image with `picture` (clearing it when absent)
    #[serde(default)]
    pub img_change: bool,
}

impl From<EditPostRequest> for PostEdit {
    fn from(request: EditPostRequest) -> Self {
        Self {
            content_text: request.text,
            image: request.img_change.then_some(request.picture),
        }
    }
}

pub fn post_routes() -> Router<AppState> {
    Router::new()
        .route("/posts", post(create_post))
        .route("/posts/:id", put(edit_post).delete(delete_post))
        .route("/posts/:id/like", put(like_post))
        .route("/posts/:id/unlike", put(unlike_post))
        .route("/posts/:id/save", put(save_post))
        .route("/posts/:id/unsave", put(unsave_post))
}

/// Publish a post
#[utoipa::path(
    post,
    path = "/posts",
    tag = "Posts",
    request_body = CreatePostRequest,
    responses(
        (status = 201, description = "Post created", body = PostView),
        (status = 400, description = "Neither text nor picture given"),
        (status = 401, description = "Not signed in")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_post(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidatedJson(payload): ValidatedJson<CreatePostRequest>,
) -> AppResult<Created<PostView>> {
    let view = state
        .services
        .posts()
        .create(
            user.id,
            NewPost {
                content_text: payload.text,
                content_image: payload.picture,
            },
        )
        .await?;
    Ok(Created(view))
}

/// Edit one of your posts
#[utoipa::path(
    put,
    path = "/posts/{id}",
    tag = "Posts",
    params(("id" = Uuid, Path, description = "Post ID")),
    request_body = EditPostRequest,
    responses(
        (status = 200, description = "Post edited", body = EditedPost),
        (status = 404, description = "No such post among yours")
    ),
    security(("bearer_auth" = []))
)]
pub async fn edit_post(
    State(state): State<AppState>,
    user: CurrentUser,
    PostId(id): PostId,
    ValidatedJson(payload): ValidatedJson<EditPostRequest>,
) -> AppResult<Json<EditedPost>> {
    let edited = state
        .services
        .posts()
        .edit(user.id, id, payload.into())
        .await?;
    Ok(Json(edited))
}

/// Delete one of your posts
#[utoipa::path(
    delete,
    path = "/posts/{id}",
    tag = "Posts",
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 204, description = "Post deleted"),
        (status = 404, description = "No such post among yours")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_post(
    State(state): State<AppState>,
    user: CurrentUser,
    PostId(id): PostId,
) -> AppResult<NoContent> {
    state.services.posts().delete(user.id, id).await?;
    Ok(NoContent)
}

async fn set_relation(
    state: &AppState,
    user: &CurrentUser,
    post_id: Uuid,
    relation: PostRelation,
    on: bool,
) -> AppResult<NoContent> {
    state
        .services
        .posts()
        .set_relation(user.id, post_id, relation, on)
        .await?;
    Ok(NoContent)
}

/// Like a post
#[utoipa::path(
    put,
    path = "/posts/{id}/like",
    tag = "Posts",
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 204, description = "Liked"),
        (status = 404, description = "No such post")
    ),
    security(("bearer_auth" = []))
)]
pub async fn like_post(
    State(state): State<AppState>,
    user: CurrentUser,
    PostId(id): PostId,
) -> AppResult<NoContent> {
    set_relation(&state, &user, id, PostRelation::Like, true).await
}

/// Withdraw a like
#[utoipa::path(
    put,
    path = "/posts/{id}/unlike",
    tag = "Posts",
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 204, description = "Like removed"),
        (status = 404, description = "No such post")
    ),
    security(("bearer_auth" = []))
)]
pub async fn unlike_post(
    State(state): State<AppState>,
    user: CurrentUser,
    PostId(id): PostId,
) -> AppResult<NoContent> {
    set_relation(&state, &user, id, PostRelation::Like, false).await
}

/// Bookmark a post
#[utoipa::path(
    put,
    path = "/posts/{id}/save",
    tag = "Posts",
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 204, description = "Saved"),
        (status = 404, description = "No such post")
    ),
    security(("bearer_auth" = []))
)]
pub async fn save_post(
    State(state): State<AppState>,
    user: CurrentUser,
    PostId(id): PostId,
) -> AppResult<NoContent> {
    set_relation(&state, &user, id, PostRelation::Save, true).await
}

/// Remove a bookmark
#[utoipa::path(
    put,
    path = "/posts/{id}/unsave",
    tag = "Posts",
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 204, description = "Bookmark removed"),
        (status = 404, description = "No such post")
    ),
    security(("bearer_auth" = []))
)]
pub async fn unsave_post(
    State(state): State<AppState>,
    user: CurrentUser,
    PostId(id): PostId,
) -> AppResult<NoContent> {
    set_relation(&state, &user, id, PostRelation::Save, false).await
}

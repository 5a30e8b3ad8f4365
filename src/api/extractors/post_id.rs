//! `:id` segment of the `/posts/:id/...` routes.

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use uuid::Uuid;

use crate::errors::AppError;

/// The post named in the path. An id that is not a UUID names no post,
/// so it is rejected with `NotFound`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostId(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for PostId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<Uuid>::from_request_parts(parts, state)
            .await
            .map_err(|e| {
                tracing::debug!(error = %e.body_text(), "Unusable post id in path");
                AppError::NotFound
            })?;
        Ok(PostId(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, routing::get, Router};
    use tower::ServiceExt;

    async fn status_for(uri: &str) -> (axum::http::StatusCode, String) {
        let app = Router::new().route(
            "/posts/:id",
            get(|PostId(id): PostId| async move { id.to_string() }),
        );
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn uuid_segment_is_extracted() {
        let id = Uuid::new_v4();
        let (status, body) = status_for(&format!("/posts/{id}")).await;
        assert_eq!(status, axum::http::StatusCode::OK);
        assert_eq!(body, id.to_string());
    }

    #[tokio::test]
    async fn non_uuid_segment_is_enveloped_not_found() {
        let (status, body) = status_for("/posts/42").await;
        assert_eq!(status, axum::http::StatusCode::NOT_FOUND);

        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["error"]["code"], "NOT_FOUND");
    }
}

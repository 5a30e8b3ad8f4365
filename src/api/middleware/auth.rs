//! Session authentication middleware.
//!
//! A session token is read from the `Authorization: Bearer` header, or from
//! the `session` cookie when no header is sent. The token must verify and
//! its session id must still be live in Redis.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;
use uuid::Uuid;

use crate::api::AppState;
use crate::config::{BEARER_TOKEN_PREFIX, ROLE_ADMIN, SESSION_COOKIE_NAME};
use crate::errors::AppError;

/// Authenticated user behind the current request
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: Uuid,
    pub username: String,
    pub role: String,
    pub session_id: String,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}

/// The raw session token, if the request carries one.
pub(crate) fn session_token(headers: &HeaderMap, jar: &CookieJar) -> Option<String> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix(BEARER_TOKEN_PREFIX))
        .map(str::trim)
        .filter(|t| !t.is_empty());

    match bearer {
        Some(token) => Some(token.to_string()),
        None => jar
            .get(SESSION_COOKIE_NAME)
            .map(|c| c.value().to_string())
            .filter(|t| !t.is_empty()),
    }
}

async fn authenticate(state: &AppState, token: &str) -> Result<CurrentUser, AppError> {
    let claims = state.services.auth().verify_token(token)?;

    match state.cache.get_session(&claims.sid).await? {
        Some(record) if record.user_id == claims.sub => Ok(CurrentUser {
            id: claims.sub,
            username: claims.username,
            role: claims.role,
            session_id: claims.sid,
        }),
        _ => {
            tracing::debug!(user_id = %claims.sub, "Rejected revoked session");
            Err(AppError::Unauthorized)
        }
    }
}

/// Require a live session; inject `CurrentUser` into the request.
pub async fn auth_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = session_token(request.headers(), &jar).ok_or(AppError::Unauthorized)?;
    let current_user = authenticate(&state, &token).await?;

    request.extensions_mut().insert(current_user);
    Ok(next.run(request).await)
}

/// Like `auth_middleware`, but lets anonymous requests through.
/// A bad or revoked token is treated as no token.
pub async fn optional_auth_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Some(token) = session_token(request.headers(), &jar) {
        match authenticate(&state, &token).await {
            Ok(current_user) => {
                request.extensions_mut().insert(current_user);
            }
            Err(AppError::Unauthorized) | Err(AppError::Jwt(_)) => {}
            Err(e) => return Err(e),
        }
    }

    Ok(next.run(request).await)
}

/// Require the admin role. Runs after `auth_middleware`. The role is read
/// from the database so promotions and demotions apply immediately.
pub async fn admin_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let current_user = request
        .extensions()
        .get::<CurrentUser>()
        .ok_or(AppError::Unauthorized)?;

    let user = state.services.users().get_user(current_user.id).await?;
    if !user.is_admin() {
        tracing::warn!(user_id = %user.id, "Non-admin tried an admin listing");
        return Err(AppError::Forbidden);
    }

    Ok(next.run(request).await)
}

//! Authentication handlers.

use axum::{extract::State, http::StatusCode, response::Json, routing::post, Router};
use axum_extra::extract::{
    cookie::{Cookie, SameSite},
    CookieJar,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::{ValidatedJson, Viewer};
use crate::api::AppState;
use crate::config::SESSION_COOKIE_NAME;
use crate::errors::AppResult;
use crate::infra::SessionRecord;
use crate::services::{AuthSession, Registration};

/// Letters, digits and `@ . + - _`.
static USERNAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\w.@+-]+$").expect("username pattern is valid"));

/// User registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(
        length(min = 1, max = 150, message = "Username must be 1-150 characters"),
        regex(path = *USERNAME_PATTERN, message = "Username may only contain letters, digits and @/./+/-/_")
    )]
    #[schema(example = "ada")]
    pub username: String,
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[serde(default)]
    #[schema(example = "Ada")]
    pub first_name: String,
    #[serde(default)]
    #[schema(example = "Lovelace")]
    pub last_name: String,
    /// Profile picture reference; a placeholder is used when absent
    pub profile_pic: Option<String>,
    /// Cover image reference
    pub cover: Option<String>,
    #[schema(example = "SecurePass123!", min_length = 8)]
    pub password: String,
    /// Must equal `password`
    #[schema(example = "SecurePass123!")]
    pub confirmation: String,
}

/// User login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    #[schema(example = "ada")]
    pub username: String,
    #[schema(example = "SecurePass123!")]
    pub password: String,
}

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

pub fn logout_routes() -> Router<AppState> {
    Router::new().route("/auth/logout", post(logout))
}

/// Record the session in Redis and hand the token out as a cookie too.
async fn start_session(
    state: &AppState,
    jar: CookieJar,
    session: &AuthSession,
) -> AppResult<CookieJar> {
    let record = SessionRecord {
        user_id: session.user.id,
        username: session.user.username.clone(),
    };
    state
        .cache
        .set_session(&session.session_id, &record, state.config.session_ttl_seconds())
        .await?;

    let cookie = Cookie::build((SESSION_COOKIE_NAME, session.token.access_token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.config.session_cookie_secure);

    Ok(jar.add(cookie))
}

/// Register a new user and sign them in
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered and signed in", body = AuthSession),
        (status = 400, description = "Validation error, e.g. passwords do not match"),
        (status = 409, description = "Username already exists")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<(StatusCode, CookieJar, Json<AuthSession>)> {
    let session = state
        .services
        .auth()
        .register(Registration {
            username: payload.username,
            email: payload.email,
            first_name: payload.first_name,
            last_name: payload.last_name,
            profile_pic: payload.profile_pic,
            cover: payload.cover,
            password: payload.password,
            confirmation: payload.confirmation,
        })
        .await?;

    let jar = start_session(&state, jar, &session).await?;
    Ok((StatusCode::CREATED, jar, Json(session)))
}

/// Sign in with username and password
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = AuthSession),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<(CookieJar, Json<AuthSession>)> {
    let session = state
        .services
        .auth()
        .login(payload.username, payload.password)
        .await?;

    tracing::info!(user_id = %session.user.id, "User signed in");
    let jar = start_session(&state, jar, &session).await?;
    Ok((jar, Json(session)))
}

/// Sign out: revoke the session and clear the cookie
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "Authentication",
    responses((status = 204, description = "Signed out")),
    security((), ("bearer_auth" = []))
)]
pub async fn logout(
    State(state): State<AppState>,
    viewer: Viewer,
    jar: CookieJar,
) -> AppResult<(StatusCode, CookieJar)> {
    if let Some(user) = viewer.0 {
        state.cache.delete_session(&user.session_id).await?;
        tracing::info!(user_id = %user.id, "User signed out");
    }

    let jar = jar.remove(Cookie::build(SESSION_COOKIE_NAME).path("/"));
    Ok((StatusCode::NO_CONTENT, jar))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(username: &str, email: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            first_name: String::new(),
            last_name: String::new(),
            profile_pic: None,
            cover: None,
            password: "SecurePass123!".to_string(),
            confirmation: "SecurePass123!".to_string(),
        }
    }

    #[test]
    fn usernames_allow_the_usual_punctuation() {
        assert!(request("ada.lovelace+1@home-x_y", "ada@example.com")
            .validate()
            .is_ok());
    }

    #[test]
    fn usernames_reject_spaces_and_blanks() {
        assert!(request("ada lovelace", "ada@example.com").validate().is_err());
        assert!(request("", "ada@example.com").validate().is_err());
        assert!(request(&"a".repeat(151), "ada@example.com").validate().is_err());
    }

    #[test]
    fn email_must_be_valid() {
        assert!(request("ada", "not-an-email").validate().is_err());
    }
}

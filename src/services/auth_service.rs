//! Authentication service: registration, login and session tokens.
//!
//! A session is a signed JWT carrying a random session id (`sid`). The API
//! layer records the sid in Redis so logout can revoke the token early.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{Config, DEFAULT_PROFILE_PIC, TOKEN_TYPE_BEARER};
use crate::domain::{NewUser, Password, User, UserResponse};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// JWT claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub role: String,
    /// Session id, revocable through Redis
    pub sid: String,
    pub exp: i64,
    pub iat: i64,
}

/// Token returned after successful authentication
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TokenResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token expiration time in seconds
    #[schema(example = 86400)]
    pub expires_in: u64,
}

/// A freshly opened session for `user`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthSession {
    pub user: UserResponse,
    #[serde(flatten)]
    pub token: TokenResponse,
    #[serde(skip)]
    pub session_id: String,
}

/// Sign-up form.
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub profile_pic: Option<String>,
    pub cover: Option<String>,
    pub password: String,
    pub confirmation: String,
}

#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create the account and log it in.
    async fn register(&self, registration: Registration) -> AppResult<AuthSession>;

    async fn login(&self, username: String, password: String) -> AppResult<AuthSession>;

    /// Check signature and expiry. Revocation is checked by the caller.
    fn verify_token(&self, token: &str) -> AppResult<Claims>;
}

fn open_session(user: User, config: &Config) -> AppResult<AuthSession> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(config.jwt_expiration_hours);
    let session_id = Uuid::new_v4().simple().to_string();

    let claims = Claims {
        sub: user.id,
        username: user.username.clone(),
        role: user.role.to_string(),
        sid: session_id.clone(),
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?;

    Ok(AuthSession {
        user: user.into(),
        token: TokenResponse {
            access_token: token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in: config.session_ttl_seconds(),
        },
        session_id,
    })
}

pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    config: Config,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(uow: Arc<U>, config: Config) -> Self {
        Self { uow, config }
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn register(&self, registration: Registration) -> AppResult<AuthSession> {
        let password = Password::confirmed(&registration.password, &registration.confirmation)?;

        if self
            .uow
            .users()
            .find_by_username(&registration.username)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("Username"));
        }

        let user = self
            .uow
            .users()
            .create(NewUser {
                username: registration.username,
                email: registration.email,
                password_hash: password.into_string(),
                first_name: registration.first_name,
                last_name: registration.last_name,
                profile_pic: registration
                    .profile_pic
                    .filter(|p| !p.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_PROFILE_PIC.to_string()),
                cover: registration.cover.filter(|c| !c.trim().is_empty()),
            })
            .await?;

        tracing::info!(user_id = %user.id, username = %user.username, "User registered");
        open_session(user, &self.config)
    }

    async fn login(&self, username: String, password: String) -> AppResult<AuthSession> {
        let user = self.uow.users().find_by_username(&username).await?;

        // Verify against a dummy hash for unknown users so both paths cost the same.
        let stored = match &user {
            Some(user) => Password::from_hash(user.password_hash.clone()),
            None => Password::dummy(),
        };
        let password_valid = stored.verify(&password);

        match user {
            Some(user) if password_valid => open_session(user, &self.config),
            _ => Err(AppError::InvalidCredentials),
        }
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }
}

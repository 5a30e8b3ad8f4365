//! Profile settings of the signed-in user.

use axum::{extract::State, response::Json, routing::get, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{ProfileChanges, ProfileSettings};
use crate::errors::AppResult;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// Absent clears the bio
    pub bio: Option<String>,
    pub profile_pic: Option<String>,
}

impl From<UpdateProfileRequest> for ProfileChanges {
    fn from(request: UpdateProfileRequest) -> Self {
        Self {
            first_name: request.first_name,
            last_name: request.last_name,
            bio: request.bio.unwrap_or_default(),
            profile_pic: request.profile_pic.filter(|p| !p.trim().is_empty()),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UpdatedProfile {
    pub success: bool,
    #[serde(flatten)]
    pub settings: ProfileSettings,
}

pub fn profile_routes() -> Router<AppState> {
    Router::new().route("/profile", get(get_profile).post(update_profile))
}

/// Your profile settings
#[utoipa::path(
    get,
    path = "/profile",
    tag = "Profile",
    responses(
        (status = 200, description = "Profile settings", body = ProfileSettings),
        (status = 401, description = "Not signed in")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_profile(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<ProfileSettings>> {
    if let Some(settings) = state.cache.get_profile(&user.id).await? {
        return Ok(Json(settings));
    }

    let settings = ProfileSettings::from(state.services.users().get_user(user.id).await?);
    state.cache.set_profile(&user.id, &settings).await?;
    Ok(Json(settings))
}

/// Update your profile settings
#[utoipa::path(
    post,
    path = "/profile",
    tag = "Profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Settings after the update", body = UpdatedProfile),
        (status = 401, description = "Not signed in")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_profile(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidatedJson(payload): ValidatedJson<UpdateProfileRequest>,
) -> AppResult<Json<UpdatedProfile>> {
    let updated = state
        .services
        .users()
        .update_profile(user.id, payload.into())
        .await?;
    if let Err(error) = state.cache.invalidate_profile(&user.id).await {
        tracing::warn!(user_id = %user.id, %error, "Failed to drop cached profile settings");
    }

    Ok(Json(UpdatedProfile {
        success: true,
        settings: updated.into(),
    }))
}

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use tracing::{error, info, instrument, warn};

use super::dto::UpdateProfileRequest;
use super::repo::Profile;
use crate::{auth::services::AuthUser, state::AppState};

pub fn profile_routes() -> Router<AppState> {
    Router::new().route("/profile", get(get_profile).put(update_profile))
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Profile>, (StatusCode, String)> {
    match Profile::find(&state.db, user_id).await {
        Ok(Some(p)) => Ok(Json(p)),
        Ok(None) => Ok(Json(Profile::defaults(user_id))),
        Err(e) => {
            error!(error = %e, %user_id, "load profile failed");
            Err((StatusCode::INTERNAL_SERVER_ERROR, "Failed to load profile".into()))
        }
    }
}

#[instrument(skip(state, payload))]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<Profile>, (StatusCode, String)> {
    let profile = payload.into_profile(user_id).map_err(|msg| {
        warn!(%user_id, %msg, "invalid profile update");
        (StatusCode::BAD_REQUEST, msg)
    })?;

    let saved = Profile::upsert(&state.db, &profile).await.map_err(|e| {
        error!(error = %e, %user_id, "save profile failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "Failed to save profile".into())
    })?;

    info!(%user_id, "profile updated");
    Ok(Json(saved))
}

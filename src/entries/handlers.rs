use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    routing::{delete, get},
    Json, Router,
};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use super::dto::{CreateEntryRequest, DayJournal, DayQuery};
use super::repo_types::{FoodEntry, NewFoodEntry};
use crate::{auth::services::AuthUser, dates, state::AppState};

pub fn entry_routes() -> Router<AppState> {
    Router::new()
        .route("/entries", get(list_entries).post(create_entry))
        .route("/entries/:id", delete(delete_entry))
}

#[instrument(skip(state, body))]
pub async fn create_entry(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<CreateEntryRequest>,
) -> Result<(StatusCode, HeaderMap, Json<FoodEntry>), (StatusCode, String)> {
    let food_name = body.food_name.trim();
    if food_name.is_empty() {
        warn!(%user_id, "food entry without name");
        return Err((StatusCode::BAD_REQUEST, "food_name is required".into()));
    }

    let new_entry = NewFoodEntry {
        user_id,
        food_name: food_name.to_string(),
        calories: body.calories,
        protein: body.protein,
        carbs: body.carbs,
        fat: body.fat,
        serving_size: body
            .serving_size
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()),
        meal_type: body.meal_type.unwrap_or_default(),
        date: body
            .date
            .unwrap_or_else(|| dates::today(state.config.utc_offset())),
    };

    let entry = state.entries.insert(new_entry).await.map_err(|e| {
        error!(error = %e, %user_id, "insert food entry failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to add food entry".to_string(),
        )
    })?;

    let mut headers = HeaderMap::new();
    if let Ok(location) = HeaderValue::from_str(&format!("/api/v1/entries/{}", entry.id)) {
        headers.insert(axum::http::header::LOCATION, location);
    }

    info!(%user_id, entry_id = %entry.id, calories = entry.calories, "food entry added");
    Ok((StatusCode::CREATED, headers, Json(entry)))
}

#[instrument(skip(state))]
pub async fn list_entries(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<DayQuery>,
) -> Result<Json<DayJournal>, (StatusCode, String)> {
    let date = q
        .date
        .unwrap_or_else(|| dates::today(state.config.utc_offset()));
    let entries = state
        .entries
        .list_for_date(user_id, date)
        .await
        .map_err(|e| {
            error!(error = %e, %user_id, "fetching food entries failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to load food entries".to_string(),
            )
        })?;
    Ok(Json(DayJournal::build(date, entries)))
}

#[instrument(skip(state))]
pub async fn delete_entry(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    match state.entries.delete(user_id, id).await {
        Ok(true) => {
            info!(%user_id, entry_id = %id, "food entry deleted");
            Ok(StatusCode::NO_CONTENT)
        }
        Ok(false) => Err((StatusCode::NOT_FOUND, "Entry not found".into())),
        Err(e) => {
            error!(error = %e, %user_id, entry_id = %id, "delete food entry failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to delete entry".into(),
            ))
        }
    }
}

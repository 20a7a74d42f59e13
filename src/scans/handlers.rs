use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::services::AuthUser, entries::dto::CreateEntryRequest, nutrition::dto::ScannedFood,
    state::AppState,
};

pub fn scan_routes() -> Router<AppState> {
    Router::new().route("/scans/pending", get(take_pending).post(put_pending))
}

/// Prefill for the journal form built from a scanned product.
pub(crate) fn entry_draft(food: ScannedFood) -> CreateEntryRequest {
    let serving_size = match (food.serving_qty, food.serving_unit.as_deref()) {
        (Some(qty), Some(unit)) if !unit.is_empty() => Some(format!("{qty} {unit}")),
        _ => None,
    };
    CreateEntryRequest {
        food_name: food.food_name,
        calories: food
            .calories
            .map(|c| c.clamp(0, i64::from(i32::MAX)) as i32)
            .unwrap_or(0),
        protein: food.protein.unwrap_or(0.0).max(0.0),
        carbs: food.total_carbohydrate.unwrap_or(0.0).max(0.0),
        fat: food.total_fat.unwrap_or(0.0).max(0.0),
        serving_size,
        meal_type: None,
        date: None,
    }
}

#[instrument(skip(state, food))]
pub async fn put_pending(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(food): Json<ScannedFood>,
) -> Result<StatusCode, (StatusCode, String)> {
    if food.food_name.trim().is_empty() {
        warn!(%user_id, "pending scan without name");
        return Err((StatusCode::BAD_REQUEST, "food_name is required".into()));
    }
    info!(%user_id, food = %food.food_name, "scan stored for journal");
    state.pending_scans.put(user_id, food).await;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn take_pending(State(state): State<AppState>, AuthUser(user_id): AuthUser) -> Response {
    match state.pending_scans.take(user_id).await {
        Some(food) => Json(entry_draft(food)).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_maps_form_fields() {
        let draft = entry_draft(ScannedFood {
            food_name: "Cheerios, Original".into(),
            serving_qty: Some(1.0),
            serving_unit: Some("cup (28g)".into()),
            calories: Some(100),
            protein: Some(3.0),
            total_fat: Some(2.0),
            total_carbohydrate: Some(20.0),
            ..Default::default()
        });
        assert_eq!(draft.food_name, "Cheerios, Original");
        assert_eq!(draft.calories, 100);
        assert_eq!(draft.carbs, 20.0);
        assert_eq!(draft.fat, 2.0);
        assert_eq!(draft.serving_size.as_deref(), Some("1 cup (28g)"));
    }

    #[test]
    fn draft_without_serving_unit() {
        let draft = entry_draft(ScannedFood {
            food_name: "Mystery".into(),
            serving_qty: Some(2.5),
            ..Default::default()
        });
        assert_eq!(draft.serving_size, None);
        assert_eq!(draft.calories, 0);
        assert_eq!(draft.protein, 0.0);
    }
}

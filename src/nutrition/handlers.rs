use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{instrument, warn};

use super::client::NutritionError;
use super::dto::{FoodSearchHit, ScannedFood, SearchQuery};
use crate::{auth::services::AuthUser, state::AppState};

pub fn food_routes() -> Router<AppState> {
    Router::new()
        .route("/foods/upc/:upc", get(lookup_upc))
        .route("/foods/search", get(search_foods))
}

/// UPC-A, EAN-8/13 and GTIN-14 are all 8 to 14 digits.
pub(crate) fn is_valid_upc(upc: &str) -> bool {
    (8..=14).contains(&upc.len()) && upc.bytes().all(|b| b.is_ascii_digit())
}

fn lookup_failed(e: NutritionError) -> (StatusCode, String) {
    let status = match e {
        NutritionError::NotFound | NutritionError::NoMatch => StatusCode::NOT_FOUND,
        NutritionError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        _ => StatusCode::BAD_GATEWAY,
    };
    (status, e.to_string())
}

#[instrument(skip(state))]
pub async fn lookup_upc(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(upc): Path<String>,
) -> Result<Json<ScannedFood>, (StatusCode, String)> {
    if !is_valid_upc(&upc) {
        warn!(%upc, "invalid barcode");
        return Err((StatusCode::BAD_REQUEST, "Invalid barcode".into()));
    }
    let food = state.nutrition.lookup_upc(&upc).await.map_err(lookup_failed)?;
    Ok(Json(food))
}

#[instrument(skip(state))]
pub async fn search_foods(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<SearchQuery>,
) -> Result<Json<Vec<FoodSearchHit>>, (StatusCode, String)> {
    let query = q.q.trim();
    if query.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "q is required".into()));
    }
    let hits = state.nutrition.search(query).await.map_err(lookup_failed)?;
    Ok(Json(hits))
}

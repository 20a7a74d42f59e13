use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use tracing::{debug, instrument};

use super::dto::{Dashboard, DashboardQuery};
use super::services;
use crate::{auth::services::AuthUser, dates, state::AppState};

pub fn dashboard_routes() -> Router<AppState> {
    Router::new().route("/dashboard", get(get_dashboard))
}

#[instrument(skip(state))]
pub async fn get_dashboard(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<DashboardQuery>,
) -> Json<Dashboard> {
    let today = q
        .date
        .unwrap_or_else(|| dates::today(state.config.utc_offset()));
    let dashboard = services::dashboard(state.entries.as_ref(), user_id, today).await;
    debug!(%user_id, streak = dashboard.streak, "dashboard computed");
    Json(dashboard)
}

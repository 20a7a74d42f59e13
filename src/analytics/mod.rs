mod aggregate;
mod dto;
pub mod handlers;
pub mod services;

pub use aggregate::{daily_totals, DailyTotals};

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::dashboard_routes())
}

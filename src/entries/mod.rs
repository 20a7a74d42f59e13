pub mod dto;
pub mod handlers;
mod lenient;
pub mod repo;
pub mod repo_types;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::entry_routes())
}

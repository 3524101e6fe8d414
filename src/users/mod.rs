pub mod dto;
pub mod handlers;
pub mod repo_types;
pub mod schema;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::user_routes()
}

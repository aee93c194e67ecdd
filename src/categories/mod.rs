use crate::state::AppState;
use axum::Router;

mod dto;
mod handlers;
pub mod repo_types;
pub mod services;

pub fn router() -> Router<AppState> {
    handlers::category_routes()
}

use crate::state::AppState;
use axum::Router;

pub mod dto;
mod handlers;
pub mod services;

pub fn router() -> Router<AppState> {
    handlers::analytics_routes()
}

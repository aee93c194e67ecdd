use axum::{extract::State, routing::get, Json, Router};
use tracing::instrument;

use super::dto::Series;
use crate::{auth::extractors::CurrentUser, error::AppError, state::AppState};

pub fn analytics_routes() -> Router<AppState> {
    Router::new()
        .route("/analytics/spending-by-date", get(spending_by_date))
        .route("/analytics/spending-by-category", get(spending_by_category))
        .route("/analytics/spending-by-month", get(spending_by_month))
}

#[instrument(skip_all)]
pub async fn spending_by_date(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Series<String>>, AppError> {
    Ok(Json(state.analytics.by_date(&user).await?))
}

#[instrument(skip_all)]
pub async fn spending_by_category(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Series<String>>, AppError> {
    Ok(Json(state.analytics.by_category(&user).await?))
}

#[instrument(skip_all)]
pub async fn spending_by_month(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Series<u8>>, AppError> {
    Ok(Json(state.analytics.by_month(&user).await?))
}

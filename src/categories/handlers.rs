use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use axum_extra::extract::WithRejection;
use tracing::instrument;

use super::{dto::CreateCategoryRequest, repo_types::Category};
use crate::{auth::extractors::CurrentUser, error::AppError, state::AppState};

pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route("/categories/", get(list_categories).post(create_category))
}

#[instrument(skip_all)]
pub async fn list_categories(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<Category>>, AppError> {
    Ok(Json(state.categories.list(&user).await?))
}

#[instrument(skip_all)]
pub async fn create_category(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    WithRejection(Json(body), _): WithRejection<Json<CreateCategoryRequest>, AppError>,
) -> Result<(StatusCode, Json<Category>), AppError> {
    let category = state.categories.create(&user, body.name, body.color).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use axum_extra::extract::WithRejection;
use tracing::instrument;
use uuid::Uuid;

use super::dto::{CreateExpenseRequest, ExpensePatch, ExpenseQuery, ExpenseView};
use crate::{auth::extractors::CurrentUser, error::AppError, state::AppState};

pub fn expense_routes() -> Router<AppState> {
    Router::new()
        .route("/expenses", get(list_expenses).post(create_expense))
        .route("/expenses/", get(list_expenses).post(create_expense))
        .route(
            "/expenses/:id",
            get(get_expense).put(update_expense).delete(delete_expense),
        )
}

#[instrument(skip(state, user))]
pub async fn list_expenses(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    WithRejection(Query(query), _): WithRejection<Query<ExpenseQuery>, AppError>,
) -> Result<Json<Vec<ExpenseView>>, AppError> {
    Ok(Json(state.expenses.list(&user, query.into()).await?))
}

#[instrument(skip_all)]
pub async fn create_expense(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    WithRejection(Json(body), _): WithRejection<Json<CreateExpenseRequest>, AppError>,
) -> Result<(StatusCode, Json<ExpenseView>), AppError> {
    let view = state.expenses.create(&user, body).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

#[instrument(skip(state, user))]
pub async fn get_expense(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, AppError>,
) -> Result<Json<ExpenseView>, AppError> {
    Ok(Json(state.expenses.get(&user, id).await?))
}

#[instrument(skip(state, user, patch))]
pub async fn update_expense(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, AppError>,
    WithRejection(Json(patch), _): WithRejection<Json<ExpensePatch>, AppError>,
) -> Result<Json<ExpenseView>, AppError> {
    Ok(Json(state.expenses.update(&user, id, patch).await?))
}

/// Answers `null` rather than an empty body; clients parse JSON on every success.
#[instrument(skip(state, user))]
pub async fn delete_expense(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, AppError>,
) -> Result<Json<()>, AppError> {
    state.expenses.delete(&user, id).await?;
    Ok(Json(()))
}

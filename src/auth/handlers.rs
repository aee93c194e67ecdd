use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Form, Json, Router,
};
use axum_extra::extract::WithRejection;
use tracing::instrument;

use super::{
    dto::{LoginForm, ProfileResponse, RegisterRequest, RegisteredUser, TokenResponse},
    extractors::CurrentUser,
};
use crate::{error::AppError, state::AppState};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

pub fn me_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(profile))
        .route("/users/", get(profile))
        .route("/users/me", get(profile))
}

#[instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<RegisterRequest>, AppError>,
) -> Result<(StatusCode, Json<RegisteredUser>), AppError> {
    let user = state.credentials.register(payload).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    WithRejection(Form(form), _): WithRejection<Form<LoginForm>, AppError>,
) -> Result<Json<TokenResponse>, AppError> {
    let token = state.credentials.login(&form.username, &form.password).await?;
    Ok(Json(TokenResponse::bearer(token)))
}

#[instrument(skip_all)]
pub async fn profile(CurrentUser(user): CurrentUser) -> Json<ProfileResponse> {
    Json(ProfileResponse {
        username: user.username,
        full_name: user.full_name,
        email: user.email,
    })
}

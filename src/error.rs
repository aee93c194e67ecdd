use axum::{
    extract::rejection::{FormRejection, JsonRejection, PathRejection, QueryRejection},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::store::StoreError;

/// Every failure a request can end with.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Username or email already exists")]
    DuplicateCredential,
    #[error("Incorrect username or password")]
    InvalidCredential,
    #[error("Invalid authentication credentials")]
    InvalidToken,
    #[error("Category not found")]
    CategoryNotFound,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    InvalidInput(String),
    #[error("amount must be a positive number")]
    InvalidAmount,
    /// Body, query or path that could not be extracted.
    #[error("{1}")]
    Malformed(StatusCode, String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    detail: String,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::DuplicateCredential | AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredential | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::CategoryNotFound | AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidAmount => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Malformed(status, _) => *status,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match &self {
            AppError::Internal(e) => {
                tracing::error!(error = %e, "internal error");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };

        let mut res = (status, Json(ErrorBody { detail })).into_response();
        if status == StatusCode::UNAUTHORIZED {
            res.headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        res
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict => AppError::DuplicateCredential,
            StoreError::MissingReference => AppError::CategoryNotFound,
            StoreError::Database(e) => AppError::Internal(e.into()),
        }
    }
}

macro_rules! malformed_from {
    ($($rejection:ty),+) => {$(
        impl From<$rejection> for AppError {
            fn from(rejection: $rejection) -> Self {
                AppError::Malformed(rejection.status(), rejection.body_text())
            }
        }
    )+};
}

malformed_from!(JsonRejection, FormRejection, QueryRejection, PathRejection);

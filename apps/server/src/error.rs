use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tenorvest_core::errors::{DatabaseError, Error as CoreError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Core(#[from] CoreError),
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    code: u16,
    message: String,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Core(e) => match e {
                CoreError::Validation(_) => StatusCode::BAD_REQUEST,
                CoreError::InsufficientFunds { .. } | CoreError::NothingToClaim { .. } => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                CoreError::NotFound(_) => StatusCode::NOT_FOUND,
                CoreError::InvalidStateTransition(_)
                | CoreError::ConcurrencyConflict(_)
                | CoreError::Database(DatabaseError::UniqueViolation(_)) => StatusCode::CONFLICT,
                CoreError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
                CoreError::Database(_) | CoreError::Unexpected(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            ApiError::Anyhow(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }
        let body = Json(ErrorBody {
            code: status.as_u16(),
            message: self.to_string(),
        });
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

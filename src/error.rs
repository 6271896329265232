use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("No key provided")]
    MissingKey,

    #[error("No device id provided")]
    MissingDeviceId,

    #[error("Invalid or deleted license key")]
    InvalidKey,

    #[error("Key expired")]
    Expired,

    #[error("This license is already logged in on another device.")]
    DeviceConflict,

    #[error("License key already exists")]
    DuplicateKey,

    #[error("{0}")]
    NotFound(String),

    #[error("Invalid duration option: {0}")]
    UnrecognizedDuration(String),

    #[error("Could not generate a unique key after {0} attempts")]
    KeyspaceExhausted(u32),

    #[error("{0}")]
    BadRequest(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingKey
            | AppError::MissingDeviceId
            | AppError::UnrecognizedDuration(_)
            | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidKey | AppError::Expired | AppError::DeviceConflict => {
                StatusCode::FORBIDDEN
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::DuplicateKey => StatusCode::CONFLICT,
            AppError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::KeyspaceExhausted(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(err: rusqlite::Error) -> Self {
        AppError::StoreUnavailable(err.to_string())
    }
}

impl From<r2d2::Error> for AppError {
    fn from(err: r2d2::Error) -> Self {
        AppError::StoreUnavailable(err.to_string())
    }
}

#[derive(Serialize)]
struct ErrorBody {
    status: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Don't leak storage internals to clients
        let message = match &self {
            AppError::StoreUnavailable(detail) => {
                tracing::error!("Store error: {}", detail);
                "Service temporarily unavailable".to_string()
            }
            other => other.to_string(),
        };

        (
            status,
            Json(ErrorBody {
                status: "error",
                message,
            }),
        )
            .into_response()
    }
}

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{debug, error};

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    /// A write payload the store schema would refuse; reported like any other
    /// store-side failure.
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Validation(_) | AppError::Database(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();
        match self {
            // A lookup miss answers with a bare `null` body.
            AppError::NotFound(_) => {
                debug!(%message, "Not found");
                (status, Json(serde_json::Value::Null)).into_response()
            }
            AppError::BadRequest(_) => (
                status,
                Json(json!({ "error": "Bad Request", "message": message })),
            )
                .into_response(),
            AppError::Validation(_) => {
                error!(error = %message, "Rejected payload");
                (
                    status,
                    Json(json!({ "error": "Validation Failure", "message": message })),
                )
                    .into_response()
            }
            AppError::Database(_) => {
                error!(error = %message, "Store failure");
                (
                    status,
                    Json(json!({ "error": "Store Failure", "message": message })),
                )
                    .into_response()
            }
            AppError::Internal(_) => {
                error!(error = %message, "Internal error");
                (
                    status,
                    Json(json!({ "error": "Internal Server Error", "message": message })),
                )
                    .into_response()
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

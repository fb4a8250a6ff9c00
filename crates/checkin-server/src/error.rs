use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use checkin_core::error::CheckinError;

/// Application error type that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Checkin(CheckinError),
}

impl From<CheckinError> for AppError {
    fn from(err: CheckinError) -> Self {
        AppError::Checkin(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Checkin(CheckinError::InvalidInput(msg)) => {
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            AppError::Checkin(err) => {
                // Storage detail stays in the log; clients only get a retry prompt.
                tracing::error!(error = %err, "check-in storage failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong, please try again".to_string(),
                )
            }
        };

        let body = json!({ "success": false, "error": message });
        (status, axum::Json(body)).into_response()
    }
}

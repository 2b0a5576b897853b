//! HTTP-facing error type. Every variant renders as `{ "error": ..., "code": ... }`.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
  #[error("Invalid {name} parameter: {reason}")]
  InvalidParameter { name: &'static str, reason: String },
  #[error("Invalid request body: {0}")]
  InvalidBody(String),
  #[error("Invalid outcome: {0}")]
  InvalidOutcome(String),
  #[error("Task is not internally consistent")]
  InconsistentTask,
}

#[derive(Serialize)]
struct ErrorBody {
  error: String,
  code: u16,
}

impl ApiError {
  pub fn status(&self) -> StatusCode {
    match self {
      ApiError::InvalidParameter { .. } | ApiError::InvalidBody(_) | ApiError::InvalidOutcome(_) => {
        StatusCode::BAD_REQUEST
      }
      ApiError::InconsistentTask => StatusCode::UNPROCESSABLE_ENTITY,
    }
  }
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self {
    ApiError::InvalidBody(rejection.body_text())
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    let body = ErrorBody { error: self.to_string(), code: status.as_u16() };
    (status, Json(body)).into_response()
  }
}

//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::{JsonRejection, PathRejection, QueryRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::Envelope;

/// Message returned for an intake body that could not be read.
pub const INTAKE_FAILED: &str = "Failed to create lead";

/// An error returned by an API handler. Every variant renders as
/// `{"success": false, "error": "..."}`.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("{0}")]
  NotFound(String),

  #[error("{0}")]
  Validation(String),

  /// The intake submission was not turned into a lead.
  #[error("{0}")]
  Intake(String),

  #[error("{0}")]
  Internal(String),
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = match &self {
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::Validation(_) => StatusCode::BAD_REQUEST,
      ApiError::Intake(_) | ApiError::Internal(_) => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
    };
    (status, Json(Envelope::<()>::failure(self.to_string()))).into_response()
  }
}

impl From<leadline_core::Error> for ApiError {
  fn from(e: leadline_core::Error) -> Self {
    match e {
      leadline_core::Error::NotFound(_) => ApiError::NotFound(e.to_string()),
      leadline_core::Error::Validation(m) => ApiError::Validation(m),
      leadline_core::Error::Persistence(_) => ApiError::Internal(e.to_string()),
    }
  }
}

// Extractor rejections keep the envelope shape instead of axum's plain text.

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self {
    ApiError::Validation(rejection.body_text())
  }
}

impl From<PathRejection> for ApiError {
  fn from(rejection: PathRejection) -> Self {
    ApiError::Validation(rejection.body_text())
  }
}

impl From<QueryRejection> for ApiError {
  fn from(rejection: QueryRejection) -> Self {
    ApiError::Validation(rejection.body_text())
  }
}

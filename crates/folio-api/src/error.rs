//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use folio_core::ValidationErrors;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("validation failed: {0}")]
  Validation(ValidationErrors),

  #[error("method not allowed: {0}")]
  MethodNotAllowed(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }
}

impl From<folio_core::Error> for ApiError {
  fn from(e: folio_core::Error) -> Self {
    use folio_core::Error as E;
    match e {
      E::Validation(errors) => Self::Validation(errors),
      E::UnknownEntity(_) => Self::NotFound(e.to_string()),
      E::NotPermitted { .. } => Self::MethodNotAllowed(e.to_string()),
      E::UnknownColumn { .. }
      | E::NotEditable { .. }
      | E::NotFilterable { .. }
      | E::NotSortable { .. } => Self::BadRequest(e.to_string()),
    }
  }
}

impl From<ValidationErrors> for ApiError {
  fn from(errors: ValidationErrors) -> Self { Self::Validation(errors) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, Json(json!({ "error": m }))).into_response(),
      ApiError::BadRequest(m) => {
        (StatusCode::BAD_REQUEST, Json(json!({ "error": m }))).into_response()
      }
      ApiError::Validation(fields) => (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({ "error": "validation failed", "fields": fields })),
      )
        .into_response(),
      ApiError::MethodNotAllowed(m) => {
        (StatusCode::METHOD_NOT_ALLOWED, Json(json!({ "error": m }))).into_response()
      }
      ApiError::Conflict(m) => (StatusCode::CONFLICT, Json(json!({ "error": m }))).into_response(),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store operation failed");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          Json(json!({ "error": "internal server error" })),
        )
          .into_response()
      }
    }
  }
}

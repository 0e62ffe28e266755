//! Error types and axum `IntoResponse` implementation for the HTML site.

use axum::{
  http::{HeaderValue, StatusCode, header},
  response::{Html, IntoResponse, Response},
};
use thiserror::Error;

use crate::render;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unauthorized")]
  Unauthorized,
  #[error("not found")]
  NotFound,
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    match self {
      Error::Unauthorized => {
        let mut res = (StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
        res.headers_mut().insert(
          header::WWW_AUTHENTICATE,
          HeaderValue::from_static("Basic realm=\"folio admin\""),
        );
        res
      }
      Error::NotFound => (StatusCode::NOT_FOUND, Html(render::not_found())).into_response(),
      Error::Store(e) => {
        tracing::error!(error = %e, "store operation failed");
        (StatusCode::INTERNAL_SERVER_ERROR, Html(render::server_error())).into_response()
      }
    }
  }
}

//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("unauthorized")]
  Unauthorized,

  /// Covers both "no such post" and "not yours to see".
  #[error("not found")]
  NotFound,

  #[error("action denied")]
  ActionDenied,

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  pub fn store(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Store(Box::new(e))
  }
}

impl From<quill_core::Error> for ApiError {
  fn from(e: quill_core::Error) -> Self {
    match e {
      quill_core::Error::NotFoundOrForbidden => Self::NotFound,
      quill_core::Error::ActionDenied => Self::ActionDenied,
      quill_core::Error::Validation(m) => Self::BadRequest(m),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = match &self {
      ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
      ApiError::NotFound => StatusCode::NOT_FOUND,
      ApiError::ActionDenied => StatusCode::FORBIDDEN,
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store failure");
        StatusCode::INTERNAL_SERVER_ERROR
      }
    };

    let mut res = (status, Json(json!({ "error": self.to_string() }))).into_response();
    if status == StatusCode::UNAUTHORIZED {
      res.headers_mut().insert(
        header::WWW_AUTHENTICATE,
        HeaderValue::from_static("Basic realm=\"quill\""),
      );
    }
    res
  }
}

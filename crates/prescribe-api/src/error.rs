//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Message returned for every server-side failure. Store detail stays in the
/// logs.
pub const STORE_FAILURE_MESSAGE: &str =
  "An exception occurred while fetching the prescription.";

pub const TIMEOUT_MESSAGE: &str =
  "The prescription service is temporarily unavailable.";

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error(transparent)]
  Resolve(#[from] prescribe_core::Error),

  #[error("resolution timed out")]
  Timeout,
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::Resolve(e) if e.is_validation() => {
        (StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
      }
      ApiError::Resolve(_) => {
        (StatusCode::INTERNAL_SERVER_ERROR, STORE_FAILURE_MESSAGE.to_owned())
      }
      ApiError::Timeout => {
        (StatusCode::SERVICE_UNAVAILABLE, TIMEOUT_MESSAGE.to_owned())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}

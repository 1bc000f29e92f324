//! API error type and its JSON rendering.

use crate::db::StoreError;
use axum::{
  Json,
  extract::rejection::{JsonRejection, PathRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
  #[error("Todo not found")]
  NotFound,
  #[error(transparent)]
  Body(#[from] JsonRejection),
  #[error(transparent)]
  Path(#[from] PathRejection),
  #[error("database error: {0}")]
  Store(sqlx::Error),
}

impl From<StoreError> for ApiError {
  fn from(e: StoreError) -> Self {
    match e {
      StoreError::NotFound(_) => ApiError::NotFound,
      StoreError::Database(e) => ApiError::Store(e),
    }
  }
}

/// `{"detail": "..."}`
#[derive(Debug, Serialize)]
pub struct ErrorBody {
  pub detail: String,
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, detail) = match self {
      ApiError::NotFound => (StatusCode::NOT_FOUND, "Todo not found".to_string()),
      // Every malformed request is a 422, whatever the extractor would say.
      ApiError::Body(rejection) => (StatusCode::UNPROCESSABLE_ENTITY, rejection.body_text()),
      ApiError::Path(rejection) => (StatusCode::UNPROCESSABLE_ENTITY, rejection.body_text()),
      ApiError::Store(e) => {
        error!("database error: {e}");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          "Internal server error".to_string(),
        )
      }
    };
    (status, Json(ErrorBody { detail })).into_response()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn store_errors_map_to_api_errors() {
    assert!(matches!(
      ApiError::from(StoreError::NotFound(3)),
      ApiError::NotFound
    ));
    assert!(matches!(
      ApiError::from(StoreError::Database(sqlx::Error::PoolTimedOut)),
      ApiError::Store(_)
    ));
  }

  #[test]
  fn status_codes() {
    assert_eq!(
      ApiError::NotFound.into_response().status(),
      StatusCode::NOT_FOUND
    );
    assert_eq!(
      ApiError::Store(sqlx::Error::PoolTimedOut)
        .into_response()
        .status(),
      StatusCode::INTERNAL_SERVER_ERROR
    );
  }
}

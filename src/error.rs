//! Error taxonomy for FuelRadar.
//!
//! Every request failure is folded into [`ApiError`] and rendered as a JSON
//! `{message}` body:
//!
//! - `Validation` → 400, with a descriptive message
//! - `NotFound` → 404, with a descriptive message
//! - `Storage` (persistence unavailable) → 500, generic message
//! - `Upstream` (external call failed or returned a malformed payload) → 500,
//!   generic message
//!
//! The underlying cause is logged server-side and never echoed to the client.
//! No error is retried and none terminates the listening loop.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::warn;

/// A request-scoped failure, carrying the message the client is allowed to see.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or unparseable request input.
    #[error("{0}")]
    Validation(String),

    /// A lookup key the caller supplied matched nothing.
    #[error("{0}")]
    NotFound(String),

    /// The persistence layer failed.
    #[error("{public}")]
    Storage {
        public: &'static str,
        #[source]
        source: sqlx::Error,
    },

    /// An external service call failed, either in transport or because the
    /// payload could not be decoded.
    #[error("{public}")]
    Upstream {
        public: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

impl ApiError {
    /// Wrap a persistence failure with the route's client-facing message.
    pub fn storage(public: &'static str, source: sqlx::Error) -> Self {
        ApiError::Storage { public, source }
    }

    /// Wrap an upstream failure with the route's client-facing message.
    pub fn upstream(public: &'static str, source: reqwest::Error) -> Self {
        ApiError::Upstream { public, source }
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Storage { .. } | ApiError::Upstream { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Validation(message) => {
                warn!(%message, "Request rejected");
            }
            ApiError::NotFound(message) => {
                warn!(%message, "Lookup missed");
            }
            ApiError::Storage { source, .. } => {
                warn!(error = %source, "Storage operation failed");
            }
            ApiError::Upstream { source, .. } if source.is_decode() => {
                warn!(error = %source, "Upstream returned a malformed payload");
            }
            ApiError::Upstream { source, .. } => {
                warn!(error = %source, "Upstream request failed");
            }
        }

        (self.status(), Json(json!({ "message": self.to_string() }))).into_response()
    }
}

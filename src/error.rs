//! Error types for the book listing service
//!
//! Provides unified error handling using thiserror. Every error raised inside
//! a front door is converted here into the `{ success: false, data: { message } }`
//! envelope, so no raw fault reaches a caller.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorEnvelope;

// == Listing Error Enum ==
/// Unified error type for the listing pipeline and its front doors.
#[derive(Error, Debug)]
pub enum ListingError {
    /// A request parameter was missing or out of range
    #[error("{0}")]
    Validation(String),

    /// The anti-forgery token was missing, malformed or stale
    #[error("{0}")]
    Authenticity(String),

    /// A record addressed by id does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// A template failed to render
    #[error("Render error: {0}")]
    Render(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ListingError {
    /// HTTP status the error maps to at a front door.
    pub fn status(&self) -> StatusCode {
        match self {
            ListingError::Validation(_) => StatusCode::BAD_REQUEST,
            ListingError::Authenticity(_) => StatusCode::FORBIDDEN,
            ListingError::NotFound(_) => StatusCode::NOT_FOUND,
            ListingError::Render(_) | ListingError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<askama::Error> for ListingError {
    fn from(err: askama::Error) -> Self {
        ListingError::Render(err.to_string())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ListingError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(error = %self, "request rejected");
        }

        (status, Json(ErrorEnvelope::new(self.to_string()))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the listing service.
pub type Result<T> = std::result::Result<T, ListingError>;

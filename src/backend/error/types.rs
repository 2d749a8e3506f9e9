/**
 * Backend Error Types
 *
 * This module defines the error type returned by HTTP handlers. Each variant
 * carries enough context to produce a JSON error response; the `conversion`
 * module does the rendering.
 *
 * # Error Categories
 *
 * ## Handler Errors
 *
 * Request-shaped failures: bad payloads, missing fields, explicit status
 * overrides.
 *
 * ## Auth Errors
 *
 * `Unauthorized` for missing/invalid sessions, `Forbidden` for valid
 * sessions whose role does not satisfy a route.
 *
 * ## Wrapped Errors
 *
 * Store, shared, serialization and token-issuing errors convert in with
 * `#[from]` so handlers can use `?` throughout.
 */
use axum::http::StatusCode;
use thiserror::Error;

use crate::backend::store::StoreError;
use crate::shared::error::SharedError;

/// Backend-specific error type
///
/// # Usage
///
/// ```rust
/// use stagelink::backend::error::ApiError;
/// use axum::http::StatusCode;
///
/// let err = ApiError::bad_request("running order must be an array");
/// assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
/// ```
#[derive(Debug, Error)]
pub enum ApiError {
    /// Handler error with an explicit status code
    #[error("Handler error: {message}")]
    HandlerError {
        /// HTTP status code for this error
        status: StatusCode,
        /// Human-readable error message
        message: String,
    },

    /// Missing or invalid session
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Human-readable error message
        message: String,
    },

    /// Valid session, insufficient role
    #[error("Forbidden: {message}")]
    Forbidden {
        /// Human-readable error message
        message: String,
    },

    /// Requested entity does not exist
    #[error("Not found: {message}")]
    NotFound {
        /// Human-readable error message
        message: String,
    },

    /// Document store failure
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Error from the shared module
    #[error(transparent)]
    Shared(#[from] SharedError),

    /// JSON serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Token issuing failure (signing, never verification)
    #[error("Token issue error: {0}")]
    TokenIssue(#[from] jsonwebtoken::errors::Error),
}

impl ApiError {
    /// Create a handler error with an explicit status
    pub fn handler(status: StatusCode, message: impl Into<String>) -> Self {
        Self::HandlerError {
            status,
            message: message.into(),
        }
    }

    /// Create a 400 handler error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::BAD_REQUEST, message)
    }

    /// Create a 500 handler error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Create an unauthorized error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Create a forbidden error
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    /// Create a not-found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// The HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::HandlerError { status, .. } => *status,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Store(StoreError::Unavailable { .. }) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Store(StoreError::Corrupt { .. }) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Store(StoreError::InvalidKey { .. }) => StatusCode::BAD_REQUEST,
            Self::Shared(SharedError::ValidationError { .. }) => StatusCode::BAD_REQUEST,
            Self::Shared(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::TokenIssue(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message included in the response body
    pub fn message(&self) -> String {
        self.to_string()
    }
}

//! Typed error handling for snapgraph
//!
//! Every core operation returns [`SocialResult`]. Storage backends speak
//! `anyhow::Result`; the core turns those failures into
//! [`SocialError::Storage`] at the boundary of each operation so callers can
//! never confuse "could not complete" with "no data".
//!
//! # Error Categories
//!
//! - `NotFound`: a referenced user, post, comment, follow edge or like is missing
//! - `Conflict`: the operation violates a state invariant (duplicate follow,
//!   accepting an accepted request, ...)
//! - `Forbidden`: the visibility guard denied access, or the caller does not
//!   own the resource being mutated
//! - `Unauthenticated`: the operation needs a caller identity and none (or an
//!   invalid one) was supplied
//! - `Validation`: malformed input
//! - `Storage`: the backend failed
//! - `Internal`: any other server-side fault
//!
//! # Example
//!
//! ```rust,ignore
//! match follows.accept_follow(owner_id, requester_id).await {
//!     Ok(()) => println!("accepted"),
//!     Err(SocialError::Conflict { message }) => println!("nothing to accept: {message}"),
//!     Err(e) => eprintln!("{e}"),
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use uuid::Uuid;

/// Result alias used by every core operation
pub type SocialResult<T> = Result<T, SocialError>;

/// The main error type for snapgraph
#[derive(Debug, thiserror::Error)]
pub enum SocialError {
    /// Referenced resource does not exist
    #[error("{resource} '{id}' not found")]
    NotFound { resource: &'static str, id: String },

    /// Operation violates a state invariant
    #[error("{message}")]
    Conflict { message: String },

    /// Access denied by the visibility guard or by ownership rules
    #[error("{message}")]
    Forbidden { message: String },

    /// Caller identity is missing or invalid
    #[error("{message}")]
    Unauthenticated { message: String },

    /// Invalid input
    #[error("Validation error for field '{field}': {message}")]
    Validation { field: String, message: String },

    /// Storage backend failure
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Server-side fault outside storage, such as token signing
    #[error("{message}")]
    Internal { message: String },
}

/// Errors reported by storage backends
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The backend rejected or failed an operation
    #[error("Storage operation '{operation}' failed: {message}")]
    OperationFailed { operation: String, message: String },
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl SocialError {
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        SocialError::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        SocialError::Conflict {
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        SocialError::Forbidden {
            message: message.into(),
        }
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        SocialError::Unauthenticated {
            message: message.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        SocialError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Wrap a backend failure, logging it before it is absorbed
    pub fn storage(operation: &str, err: anyhow::Error) -> Self {
        tracing::warn!(operation, error = %err, "storage failure absorbed");
        SocialError::Storage(StorageError::OperationFailed {
            operation: operation.to_string(),
            message: err.to_string(),
        })
    }

    pub fn internal(message: impl Into<String>) -> Self {
        let message = message.into();
        tracing::error!(error = %message, "internal failure");
        SocialError::Internal { message }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            SocialError::NotFound { .. } => StatusCode::NOT_FOUND,
            SocialError::Conflict { .. } => StatusCode::CONFLICT,
            SocialError::Forbidden { .. } => StatusCode::FORBIDDEN,
            SocialError::Unauthenticated { .. } => StatusCode::UNAUTHORIZED,
            SocialError::Validation { .. } => StatusCode::BAD_REQUEST,
            SocialError::Storage(_) | SocialError::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            SocialError::NotFound { .. } => "NOT_FOUND",
            SocialError::Conflict { .. } => "CONFLICT",
            SocialError::Forbidden { .. } => "FORBIDDEN",
            SocialError::Unauthenticated { .. } => "UNAUTHENTICATED",
            SocialError::Validation { .. } => "VALIDATION_ERROR",
            SocialError::Storage(_) => "STORAGE_ERROR",
            SocialError::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response
    ///
    /// Storage and internal messages stay in the logs; clients only see a generic message.
    pub fn to_response(&self) -> ErrorResponse {
        let message = match self {
            SocialError::Storage(_) | SocialError::Internal { .. } => {
                "Could not complete the request".to_string()
            }
            other => other.to_string(),
        };

        ErrorResponse {
            code: self.error_code().to_string(),
            message,
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            SocialError::NotFound { resource, id } => Some(serde_json::json!({
                "resource": resource,
                "id": id,
            })),
            SocialError::Validation { field, .. } => Some(serde_json::json!({ "field": field })),
            _ => None,
        }
    }
}

impl IntoResponse for SocialError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

impl From<validator::ValidationErrors> for SocialError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let (field, message) = errors
            .field_errors()
            .into_iter()
            .next()
            .map(|(field, errs)| {
                let message = errs
                    .first()
                    .and_then(|e| e.message.as_ref().map(|m| m.to_string()))
                    .unwrap_or_else(|| "invalid value".to_string());
                (field.to_string(), message)
            })
            .unwrap_or_else(|| ("body".to_string(), "invalid value".to_string()));

        SocialError::Validation { field, message }
    }
}

/// Converts a backend `anyhow::Result` into a [`SocialResult`]
///
/// ```rust,ignore
/// let edge = store.find_edge(&a, &b).await.or_storage("find_edge")?;
/// ```
pub trait StorageContext<T> {
    fn or_storage(self, operation: &str) -> SocialResult<T>;
}

impl<T> StorageContext<T> for anyhow::Result<T> {
    fn or_storage(self, operation: &str) -> SocialResult<T> {
        self.map_err(|err| SocialError::storage(operation, err))
    }
}

/// Shorthand for "user not found" on a raw id
pub(crate) fn user_not_found(id: Uuid) -> SocialError {
    SocialError::not_found("user", id)
}

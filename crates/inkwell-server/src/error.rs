//! Error types for the view-tracking service and their HTTP mapping

use crate::admin::AdminError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use inkwell_domain::{Slug, SlugError};
use inkwell_janitor::JanitorError;
use inkwell_store::StoreError;
use serde::Serialize;
use thiserror::Error;

/// Failures of [`crate::tracker::ViewTracker`] operations
#[derive(Debug, Error)]
pub enum TrackerError {
    /// No published item with this slug
    #[error("Post not found: {0}")]
    NotFound(Slug),

    /// Storage layer error
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Retention sweep failed
    #[error(transparent)]
    Janitor(#[from] JanitorError),

    /// The blocking task running a store call did not complete
    #[error("Store task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human readable message
    pub error: String,
    /// Stable machine readable category
    pub kind: &'static str,
    /// Underlying cause, when useful to the caller
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// Item missing or unpublished
    NotFound,
    /// Malformed request input
    BadRequest(String),
    /// Missing or rejected admin credentials
    Unauthorized(String),
    /// Store unreachable or failing
    StoreUnavailable(String),
    /// Any other server-side failure
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::NotFound => (
                StatusCode::NOT_FOUND,
                ErrorResponse {
                    error: "Post not found".to_string(),
                    kind: "not_found",
                    details: None,
                },
            ),
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: msg,
                    kind: "bad_request",
                    details: None,
                },
            ),
            AppError::Unauthorized(msg) => (
                StatusCode::UNAUTHORIZED,
                ErrorResponse {
                    error: msg,
                    kind: "unauthorized",
                    details: None,
                },
            ),
            AppError::StoreUnavailable(details) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse {
                    error: "View store unavailable".to_string(),
                    kind: "store_unavailable",
                    details: Some(details),
                },
            ),
            AppError::Internal(details) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse {
                    error: "Internal server error".to_string(),
                    kind: "internal",
                    details: Some(details),
                },
            ),
        };

        (status, Json(body)).into_response()
    }
}

impl From<TrackerError> for AppError {
    fn from(e: TrackerError) -> Self {
        match e {
            TrackerError::NotFound(_) => AppError::NotFound,
            other => {
                tracing::warn!("Store failure: {}", other);
                AppError::StoreUnavailable(other.to_string())
            }
        }
    }
}

impl From<SlugError> for AppError {
    fn from(e: SlugError) -> Self {
        AppError::BadRequest(format!("Invalid slug: {}", e))
    }
}

impl From<AdminError> for AppError {
    fn from(e: AdminError) -> Self {
        match e {
            AdminError::JwtEncode(err) => AppError::Internal(err.to_string()),
            other => AppError::Unauthorized(other.to_string()),
        }
    }
}

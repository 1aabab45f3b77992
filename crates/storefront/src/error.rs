//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.
//!
//! Unexpected failures carry a fixed, endpoint-specific message which is the
//! only thing the client sees; the underlying cause is logged and reported.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::services::auth::AuthError;

/// Boxed cause of an unexpected failure.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Registration attempted with an email that is already taken.
    #[error("User already exist!!!")]
    DuplicateUser,

    /// Unknown email or wrong password.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Unexpected failure behind an endpoint.
    #[error("{context}: {source}")]
    Internal {
        context: &'static str,
        #[source]
        source: BoxError,
    },
}

impl AppError {
    /// Wrap an unexpected failure with the message clients should see.
    pub fn internal(context: &'static str, source: impl Into<BoxError>) -> Self {
        Self::Internal {
            context,
            source: source.into(),
        }
    }

    /// Map an authentication error, keeping client rejections distinct.
    #[must_use]
    pub fn from_auth(err: AuthError, context: &'static str) -> Self {
        match err {
            AuthError::DuplicateUser => Self::DuplicateUser,
            AuthError::InvalidCredentials => Self::InvalidCredentials,
            other => Self::internal(context, other),
        }
    }
}

/// Attach an endpoint message to any error result.
pub trait ResultExt<T> {
    /// Convert the error into `AppError::Internal` with `context` as the client message.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Internal` if `self` is an error.
    fn or_internal(self, context: &'static str) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn or_internal(self, context: &'static str) -> Result<T> {
        self.map_err(|e| AppError::internal(context, e))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Internal { .. }) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Don't expose internal error details to clients
        match &self {
            Self::DuplicateUser => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "success": false, "message": self.to_string() })),
            )
                .into_response(),
            Self::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "success": false, "message": self.to_string() })),
            )
                .into_response(),
            Self::Internal { context, .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "message": context })),
            )
                .into_response(),
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for catalog and account actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("catalog", "Product created", Some(&[("product_id", "123")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

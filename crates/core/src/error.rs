//! Shared request-level error taxonomy.
//!
//! Every failure a handler can surface maps onto one of these variants, and
//! every variant maps onto exactly one HTTP status and one client-safe
//! message. Internal detail stays in the logs.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::envelope::Envelope;

/// Platform-wide error taxonomy.
///
/// Auth-gate failures terminate the request before any handler logic runs;
/// aggregation failures are fail-fast and non-partial; storage errors pass
/// through unchanged as [`ServiceError::Internal`].
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Missing, malformed, or expired credential.
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),

    /// Valid credential, but the role is not permitted for this route.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Empty filtered result set, or a referenced entity is absent.
    #[error("not found: {0}")]
    NotFound(String),

    /// A peer service call failed.
    #[error("upstream unavailable: {0}")]
    Upstream(String),

    /// A peer service call exceeded its deadline.
    #[error("upstream timeout: {0}")]
    Timeout(String),

    /// Malformed peer response or malformed stored session.
    #[error("decode error: {0}")]
    Decode(String),

    /// Anything else, including storage errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// The HTTP status this error maps to.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Upstream(_) | Self::Timeout(_) | Self::Decode(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// The message shown to clients.
    ///
    /// Auth and not-found messages are caller-facing as-is; everything else
    /// collapses to a generic message so internals never leak.
    #[must_use]
    pub fn client_message(&self) -> String {
        match self {
            Self::Unauthenticated(msg) | Self::Forbidden(msg) | Self::NotFound(msg) => msg.clone(),
            Self::Upstream(_) | Self::Timeout(_) => "upstream service unavailable".to_owned(),
            Self::Decode(_) | Self::Internal(_) => "internal server error".to_owned(),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        if matches!(
            self,
            Self::Upstream(_) | Self::Timeout(_) | Self::Decode(_) | Self::Internal(_)
        ) {
            tracing::error!(error = %self, "request failed");
        }

        let body = Envelope::<()>::error(self.client_message());
        (self.status_code(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ServiceError::Unauthenticated("x".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ServiceError::Forbidden("x".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ServiceError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServiceError::Timeout("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_detail_does_not_leak() {
        let err = ServiceError::Internal("password for db is hunter2".into());
        assert_eq!(err.client_message(), "internal server error");

        let err = ServiceError::Upstream("connect refused 10.0.0.3:8081".into());
        assert_eq!(err.client_message(), "upstream service unavailable");
    }

    #[test]
    fn test_not_found_message_is_caller_facing() {
        let err = ServiceError::NotFound("order not found".into());
        assert_eq!(err.client_message(), "order not found");
    }
}

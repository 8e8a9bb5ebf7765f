//! Handler-boundary error mapping.
//!
//! Every error is caught here and rendered as one JSON body shape.
//! Database and provider failures are logged with full context and
//! surfaced with a generic message — internals never reach the
//! response body.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use portico_auth::AuthError;
use portico_core::error::PorticoError;
use serde::Serialize;
use tracing::error;

#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

#[derive(Debug)]
pub struct ApiError(pub PorticoError);

impl From<PorticoError> for ApiError {
    fn from(err: PorticoError) -> Self {
        Self(err)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self(err.into())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            PorticoError::Validation { .. } => StatusCode::BAD_REQUEST,
            PorticoError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            PorticoError::AuthorizationDenied { .. } => StatusCode::FORBIDDEN,
            PorticoError::NotFound { .. } => StatusCode::NOT_FOUND,
            PorticoError::AlreadyExists { .. } => StatusCode::CONFLICT,
            PorticoError::Database(_)
            | PorticoError::Provider(_)
            | PorticoError::Crypto(_)
            | PorticoError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %self.0, "request failed");
            ErrorBody {
                message: "Server error".into(),
                details: None,
            }
        } else {
            ErrorBody {
                message: self.0.to_string(),
                details: None,
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: PorticoError) -> StatusCode {
        ApiError(err).status()
    }

    #[test]
    fn taxonomy_maps_to_http_statuses() {
        assert_eq!(
            status_of(PorticoError::Validation {
                message: "m".into()
            }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(PorticoError::AuthenticationFailed {
                reason: "r".into()
            }),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(PorticoError::AuthorizationDenied {
                reason: "r".into()
            }),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_of(PorticoError::NotFound {
                entity: "listing".into(),
                id: "x".into()
            }),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(PorticoError::AlreadyExists { entity: "e".into() }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(PorticoError::Database("boom".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(PorticoError::Provider("down".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}

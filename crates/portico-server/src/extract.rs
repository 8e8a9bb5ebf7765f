//! Bearer-token extraction for protected routes.

use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::{extract::FromRequestParts, http::HeaderMap};
use portico_auth::{AuthError, SessionClaims, token};

use crate::error::ApiError;
use crate::state::SharedState;

/// Validated session claims extracted from the `Authorization`
/// header. Rejects with 401 when the token is absent, malformed,
/// expired, or signed with the wrong secret.
pub struct AuthClaims(pub SessionClaims);

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

impl FromRequestParts<SharedState> for AuthClaims {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or(AuthError::TokenMissing)?;
        let validated = token::validate_session_token(token, state.auth.config())?;
        Ok(AuthClaims(validated.0))
    }
}

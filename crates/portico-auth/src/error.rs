//! Authentication error types.

use portico_core::error::PorticoError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Deliberately generic: never distinguishes a missing user from
    /// a wrong password.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("no token provided")]
    TokenMissing,

    #[error("token has expired")]
    TokenExpired,

    #[error("invalid token: {0}")]
    TokenInvalid(String),

    #[error("cryptography error: {0}")]
    Crypto(String),
}

impl From<AuthError> for PorticoError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials
            | AuthError::TokenMissing
            | AuthError::TokenExpired
            | AuthError::TokenInvalid(_) => PorticoError::AuthenticationFailed {
                reason: err.to_string(),
            },
            AuthError::Crypto(msg) => PorticoError::Crypto(msg),
        }
    }
}

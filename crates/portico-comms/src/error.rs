//! Communications error types.

use portico_core::error::PorticoError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CommsError {
    /// The outbound provider rejected or failed the dispatch.
    #[error("provider dispatch failed: {0}")]
    Provider(String),

    /// The resolved agent has no phone number on file, so call and
    /// chat dispatches cannot be addressed.
    #[error("agent has no phone number on file")]
    AgentPhoneMissing,

    #[error("transport error: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for CommsError {
    fn from(err: reqwest::Error) -> Self {
        CommsError::Transport(err.to_string())
    }
}

impl From<CommsError> for PorticoError {
    fn from(err: CommsError) -> Self {
        match err {
            CommsError::AgentPhoneMissing => PorticoError::Validation {
                message: err.to_string(),
            },
            CommsError::Provider(msg) => PorticoError::Provider(msg),
            CommsError::Transport(msg) => PorticoError::Provider(msg),
        }
    }
}

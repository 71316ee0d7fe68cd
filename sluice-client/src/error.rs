//! Errors surfaced by the Sluice admin client

use thiserror::Error;

/// Result alias used throughout the client
pub type Result<T> = std::result::Result<T, ClientError>;

/// Ways a call against the dispatcher admin API can fail
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a response
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The dispatcher answered with a non-success status
    #[error("dispatcher returned {status}: {message}")]
    Api { status: u16, message: String },

    /// The response body did not have the expected shape
    #[error("unexpected response body: {0}")]
    BadPayload(String),
}

impl ClientError {
    /// True when the dispatcher answered 404 for the requested resource
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
    }
}

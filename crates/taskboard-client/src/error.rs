//! Client error types.

use thiserror::Error;

/// Errors surfaced by the client.
///
/// Clone so a single shared refetch can hand the same failure to every
/// caller waiting on it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Server returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Refetch superseded by a newer invalidation")]
    Aborted,

    #[error("Client has been shut down")]
    Closed,
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Http(e.to_string())
        }
    }
}

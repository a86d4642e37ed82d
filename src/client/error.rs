//! Client-side failures.
//!
//! 404 keeps its own variant so callers can tell a missing todo apart from a
//! failing server; every other non-success status lands in `RequestFailed`
//! with the server's message.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("todo not found")]
    NotFound,
    #[error("request failed with status {status}: {message}")]
    RequestFailed { status: u16, message: String },
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    pub fn is_not_found(&self) -> bool { matches!(self, Self::NotFound) }
}

pub type ClientResult<T> = Result<T, ClientError>;

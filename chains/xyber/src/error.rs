//! Error taxonomy for one account pass.
//!
//! Only [`XyberError::Server`] is retried by the request executor. Everything
//! else is terminal for the step that produced it.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum XyberError {
    #[error("Invalid private key: {reason}")]
    InvalidKey { reason: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Server error: Status: {status} | Body: {body}")]
    Server { status: u16, body: String },

    #[error("Request rejected: Status: {status} | Body: {body}")]
    Client { status: u16, body: String },

    #[error("Unexpected response: {0}")]
    Protocol(String),

    #[error("Cancelled by shutdown")]
    Cancelled,
}

impl XyberError {
    /// Classifies a non-accepted HTTP status.
    pub fn from_status(status: u16, body: String) -> Self {
        if status >= 500 || status == 429 {
            XyberError::Server { status, body }
        } else {
            XyberError::Client { status, body }
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, XyberError::Server { .. })
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, XyberError::Server { status: 429, .. })
    }
}

pub type XyberResult<T> = Result<T, XyberError>;

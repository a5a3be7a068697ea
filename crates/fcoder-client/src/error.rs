use fcoder_validate::messages;
use thiserror::Error;

use crate::config::ConfigError;

/// Result type for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Failures talking to the backend. A non-2xx status is not an error at
/// this level; it comes back as an [`ApiResponse`](crate::auth::ApiResponse).
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request did not complete within the configured timeout
    #[error("Request timed out")]
    Timeout,

    /// No connection could be established
    #[error("Connection failed: {0}")]
    Connect(String),

    /// Any other transport-level failure
    #[error("HTTP error: {0}")]
    Http(#[source] reqwest::Error),

    /// A success body could not be decoded
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Client could not be configured
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ClientError {
    /// Whether the failure happened before any response was received.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Timeout | Self::Connect(_) | Self::Http(_))
    }

    /// The message shown to the user in the form's general slot.
    pub fn user_message(&self) -> &'static str {
        if self.is_network() {
            messages::NETWORK_ERROR
        } else {
            messages::GENERAL_ERROR
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::Connect(err.to_string())
        } else {
            Self::Http(err)
        }
    }
}

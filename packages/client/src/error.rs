//! Error types for the cowatch client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The configured server URL cannot be turned into endpoint URLs
    #[error("Invalid server URL '{0}': expected http:// or https://")]
    InvalidServerUrl(String),

    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// An HTTP pull request failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// A transport control was used before any video was loaded
    #[error("Please select a video first.")]
    NoVideoSelected,
}

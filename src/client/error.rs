use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Rejected locally, no request was sent.
    #[error("Invalid YouTube video id or URL: {0:?}")]
    InvalidVideoId(String),

    #[error("Analysis API request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Analysis API returned {status}: {detail}")]
    Status { status: StatusCode, detail: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Failed to decode analysis API response: {0}")]
    Decode(String),
}

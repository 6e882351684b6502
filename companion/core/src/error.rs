//! Backend error types

use thiserror::Error;

/// Errors from the generative-AI backend
///
/// Both transport failures and well-formed-but-empty responses land here so
/// the calling view can turn either into user-visible feedback.
#[derive(Debug, Error)]
pub enum BackendError {
    /// No API key was configured
    #[error("No API key configured (set GEMINI_API_KEY)")]
    MissingApiKey,

    /// The request never produced a response
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("API returned {status}: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message extracted from the body
        message: String,
    },

    /// The response body could not be decoded
    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The image call succeeded but carried no inline image
    #[error("No image was produced")]
    NoImage,

    /// No conversational session is open
    #[error("No chat session is open")]
    NoSession,

    /// Failure injected by a scripted backend
    #[error("{0}")]
    Scripted(String),
}

impl BackendError {
    /// Whether the failure is an empty-but-valid response rather than a transport error
    #[must_use]
    pub fn is_empty_response(&self) -> bool {
        matches!(self, Self::NoImage)
    }
}

/// Convenience result alias for backend calls
pub type BackendResult<T> = Result<T, BackendError>;

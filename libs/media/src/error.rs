use thiserror::Error;

/// Errors from an image hosting provider
#[derive(Debug, Error)]
pub enum MediaError {
    /// Provider configuration is missing or invalid
    #[error("Media configuration error: {0}")]
    Config(String),

    /// The HTTP request to the provider could not be completed
    #[error("Image host request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider answered with a non-success status
    #[error("Image host error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The provider answered with a payload we could not interpret
    #[error("Unexpected image host response: {0}")]
    InvalidResponse(String),
}

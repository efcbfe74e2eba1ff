//! Error types for the pollution data clients.

use thiserror::Error;

/// Failure of a single fetch attempt against a pollution data provider.
///
/// Every variant is terminal for the attempt. Retry policy belongs to the
/// refresh schedule, not to the clients.
#[derive(Debug, Error)]
pub enum PollutionError {
    /// Transport-level failure: DNS, connect, timeout, reset.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The response body was not the expected JSON envelope.
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The provider answered with a well-formed body that reports logical
    /// failure, such as a bad token or rate limiting.
    #[error("Provider rejected request: {0}")]
    UpstreamRejected(String),
}

impl PollutionError {
    /// User-friendly error message for display surfaces.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(_) => "Network error. Check your connection and try again.".to_string(),
            Self::Decode(_) => "Received an unexpected response. Please try again later.".to_string(),
            Self::UpstreamRejected(status) => {
                format!("Air quality provider rejected the request: {status}")
            }
        }
    }
}

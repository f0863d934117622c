//! Error types returned by weather lookups.

use thiserror::Error;

/// Failure of a single weather lookup.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The request could not be built; nothing was sent.
    #[error("Invalid weather request: {0}")]
    InvalidRequest(String),

    /// Transport-level failure (DNS, connect, reset, body read).
    #[error("Network failure: {0}")]
    NetworkFailure(#[source] reqwest::Error),

    /// The response body did not match the expected shape.
    #[error("Failed to decode weather response: {0}")]
    DecodeFailure(#[from] DecodeError),
}

/// Why a response body could not be turned into a `WeatherModel`.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed body (HTTP {status}): {source}; body: {body}")]
    Json {
        status: u16,
        body: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("response contained an empty `weather` list")]
    EmptyWeather,
}

impl LookupError {
    /// Short message suitable for showing to an end user.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidRequest(reason) => format!("Cannot request weather: {reason}"),
            Self::NetworkFailure(_) => "Network error. Check your connection.".to_string(),
            Self::DecodeFailure(_) => "Weather service returned unexpected data.".to_string(),
        }
    }

    /// Only transport failures are worth retrying; the caller owns the policy.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::NetworkFailure(_))
    }
}

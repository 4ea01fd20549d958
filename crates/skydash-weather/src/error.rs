//! Weather provider error type.

use thiserror::Error;

/// Failure talking to the weather provider.
///
/// Every failure mode of a current/forecast fetch collapses into this type so
/// the UI boundary has one thing to render. Nothing here is retried
/// automatically.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timeout - please check your connection")]
    Timeout,

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("API quota exceeded")]
    QuotaExceeded,

    #[error("Weather API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid weather data received: {0}")]
    InvalidResponse(String),
}

impl UpstreamError {
    /// User-friendly error message for UI display.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Network(_) => "Unable to reach the weather service. Check your connection.",
            Self::Timeout => "Request timeout - please check your connection.",
            Self::InvalidApiKey => "Weather API key is invalid. Check settings.",
            Self::QuotaExceeded => "Weather API quota exceeded. Please try again later.",
            Self::Api { status, .. } if *status >= 500 => {
                "Weather service unavailable. Please try again later."
            }
            Self::Api { .. } => "Failed to fetch weather data. Check the city and try again.",
            Self::InvalidResponse(_) => "Received invalid weather data. Please try again.",
        }
    }
}

impl From<reqwest::Error> for UpstreamError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_decode() {
            Self::InvalidResponse(e.to_string())
        } else if let Some(status) = e.status() {
            Self::Api {
                status: status.as_u16(),
                message: e.to_string(),
            }
        } else {
            Self::Network(e.to_string())
        }
    }
}

//! Error types for the asset watcher

use thiserror::Error;

/// Errors that can occur when fetching assets from a provider
///
/// The store never propagates these; it keeps their `Display` text in the
/// relevant error slot.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Network request failed (connect, timeout, body read)
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// Non-success HTTP status
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Body could not be decoded
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Configured base URL is not a valid absolute URL
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

impl ProviderError {
    /// Creates an Http error
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Creates an InvalidResponse error
    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Returns the HTTP status code if the failure carried one
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::RateLimitExceeded => Some(429),
            Self::NetworkError(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_never_empty() {
        let errors = [
            ProviderError::http(404, "Not Found"),
            ProviderError::RateLimitExceeded,
            ProviderError::invalid_response("missing field `id`"),
            ProviderError::InvalidBaseUrl("nope".to_string()),
        ];
        for e in errors {
            assert!(!e.to_string().is_empty());
        }
    }

    #[test]
    fn test_status() {
        assert_eq!(ProviderError::http(503, "Service Unavailable").status(), Some(503));
        assert_eq!(ProviderError::RateLimitExceeded.status(), Some(429));
        assert_eq!(ProviderError::invalid_response("x").status(), None);
        assert_eq!(
            ProviderError::http(404, "Not Found").to_string(),
            "HTTP 404: Not Found"
        );
    }
}

/// Provider-layer error classification.
///
/// Raw transport failures are classified into exactly four categories, each
/// carrying one fixed user-facing message. This is the only layer that
/// produces a distinguishable error value: the stream engines catch every
/// `ProviderError` at their boundary, publish an empty result, and log
/// the diagnostic. No error object travels further downstream.

use thiserror::Error;

/// Classified failure from a data provider request.
///
/// The `Display` text is the user-facing message for the category; any
/// diagnostic detail is carried separately (see [`ProviderError::detail`])
/// and is meant for logs, never for display.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// No connection could be established (DNS, connect, timeout).
    #[error("Network error. Please check your connection.")]
    Network { detail: String },

    /// The remote service reported a fault (HTTP 5xx).
    #[error("Server error. Please try again later.")]
    Server { status: u16 },

    /// The requested resource does not exist (HTTP 404).
    #[error("Data not found.")]
    NotFound,

    /// Anything else: malformed payloads, unexpected statuses, internal
    /// client errors.
    #[error("An error occurred. Please try again.")]
    Other { detail: String },
}

impl ProviderError {
    /// Classifies an HTTP status line into an error category.
    pub fn from_status(status: u16) -> Self {
        if status == 404 {
            ProviderError::NotFound
        } else if status >= 500 {
            ProviderError::Server { status }
        } else {
            ProviderError::Other { detail: format!("unexpected HTTP status {}", status) }
        }
    }

    /// Convenience constructor for the generic category.
    pub fn other(detail: impl Into<String>) -> Self {
        ProviderError::Other { detail: detail.into() }
    }

    /// The fixed user-facing message for this error's category. Total over
    /// every variant: each possible failure maps to exactly one message.
    pub fn user_message(&self) -> &'static str {
        match self {
            ProviderError::Network { .. } => "Network error. Please check your connection.",
            ProviderError::Server { .. } => "Server error. Please try again later.",
            ProviderError::NotFound => "Data not found.",
            ProviderError::Other { .. } => "An error occurred. Please try again.",
        }
    }

    /// Diagnostic detail for logging, where the category carries any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ProviderError::Network { detail } | ProviderError::Other { detail } => Some(detail),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return ProviderError::from_status(status.as_u16());
        }
        if err.is_connect() || err.is_timeout() {
            return ProviderError::Network { detail: err.to_string() };
        }
        ProviderError::Other { detail: err.to_string() }
    }
}

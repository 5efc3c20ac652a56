use thiserror::Error;

/// Message used when a transport failure carries no text of its own.
pub const UNEXPECTED_NETWORK_ERROR: &str = "An unexpected network error occurred.";

/// The single failure kind of the request pipeline.
///
/// Every variant displays as its human-readable message only; callers are
/// expected to show [`RequestFailure::message`] and nothing else. The variant
/// exists for logging and tests.
#[derive(Debug, Error)]
pub enum RequestFailure {
    /// The server answered with a non-2xx status.
    #[error("{message}")]
    Http {
        message: String,
        status: u16,
        /// The raw `detail` field of the error body, when there was one.
        detail: Option<serde_json::Value>,
    },

    /// Network, TLS, timeout or body-read failure.
    #[error("{message}")]
    Transport {
        message: String,
        #[source]
        source: reqwest::Error,
    },

    /// A 2xx response whose body did not match the expected shape.
    #[error("{message}")]
    Decode {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// Rejected before any request was sent.
    #[error("{0}")]
    Validation(String),
}

impl RequestFailure {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// The request URL is stripped from `source`, since a manage URL carries
    /// the management token.
    pub(crate) fn transport(source: reqwest::Error) -> Self {
        let source = source.without_url();
        let text = source.to_string();
        let message = if text.trim().is_empty() {
            UNEXPECTED_NETWORK_ERROR.to_string()
        } else {
            text
        };
        Self::Transport { message, source }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Http { message, .. }
            | Self::Transport { message, .. }
            | Self::Decode { message, .. }
            | Self::Validation(message) => message,
        }
    }

    /// HTTP status of the failed response, if the server answered at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Transport { source, .. } => source.status().map(|s| s.as_u16()),
            Self::Decode { .. } | Self::Validation(_) => None,
        }
    }

    #[must_use]
    pub fn detail(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Http { detail, .. } => detail.as_ref(),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

//! Client error model.

use thiserror::Error;

/// Result type used across the client layers.
pub type ClientResult<T> = Result<T, ClientError>;

/// Client-side error taxonomy.
///
/// Every variant carries a human-readable message suitable for direct
/// display; callers branch on the kind, never on parsed message text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// A required credential or setting is missing (fatal, fix the config).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The remote rejected our credentials (HTTP 401).
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// The remote throttled us (HTTP 429). Retryable by the caller.
    #[error("rate limit exceeded: {0}")]
    RateLimited(String),

    /// Transport-level failure (connection refused, DNS, timeout).
    #[error("network error: {0}")]
    Network(String),

    /// Any other non-2xx remote response, with best-effort detail.
    #[error("remote API error: {0}")]
    RemoteApi(String),

    /// The caller supplied invalid input (e.g. an empty order).
    #[error("validation failed: {0}")]
    Validation(String),
}

impl ClientError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn authentication(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    pub fn rate_limited(msg: impl Into<String>) -> Self {
        Self::RateLimited(msg.into())
    }

    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    pub fn remote_api(msg: impl Into<String>) -> Self {
        Self::RemoteApi(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Whether the caller may reasonably retry the same call later.
    ///
    /// Configuration, authentication, and validation failures require a
    /// human to change something first.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited(_) | Self::Network(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_displayable() {
        let err = ClientError::configuration("MOYSKLAD_TOKEN is not set");
        assert_eq!(
            err.to_string(),
            "configuration error: MOYSKLAD_TOKEN is not set"
        );

        let err = ClientError::remote_api("402 Payment Required");
        assert_eq!(err.to_string(), "remote API error: 402 Payment Required");
    }

    #[test]
    fn only_rate_limit_and_network_are_retryable() {
        assert!(ClientError::rate_limited("slow down").is_retryable());
        assert!(ClientError::network("connection refused").is_retryable());

        assert!(!ClientError::configuration("no token").is_retryable());
        assert!(!ClientError::authentication("bad token").is_retryable());
        assert!(!ClientError::remote_api("boom").is_retryable());
        assert!(!ClientError::validation("empty order").is_retryable());
    }
}

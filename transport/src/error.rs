//! Normalized transport failures.

use thiserror::Error;

/// A transport-layer failure.
///
/// HTTP errors normalize to [`TransportError::Api`] with the status code,
/// a message, and any server-supplied error list; the raw body is kept for
/// upper layers that classify failures from it. Security-policy violations
/// (`RateLimited`, `InvalidResponseShape`) abort before/after dispatch and
/// are never partially applied.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("rate limit exceeded for {endpoint}: {max} requests per {window_secs}s")]
    RateLimited {
        endpoint: String,
        max: usize,
        window_secs: u64,
    },

    #[error("invalid response shape: {0}")]
    InvalidResponseShape(String),

    /// The server rejected our credentials; the embedding application is
    /// expected to drop its session.
    #[error("unauthorized")]
    Unauthorized,

    #[error("HTTP {status}: {message}")]
    Api {
        status: u16,
        message: String,
        errors: Option<Vec<String>>,
        /// Parsed error body, `Null` when the server sent none.
        body: serde_json::Value,
    },

    #[error("request timed out")]
    Timeout,

    #[error("request failed: {0}")]
    Http(String),
}

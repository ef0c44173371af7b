//! Tagged ledger failures.
//!
//! Every network-facing operation classifies its failure instead of
//! collapsing to one opaque error per operation, so callers can tell a
//! retryable sequence race from a terminal validation failure. The original
//! detail string is preserved in each variant for logging.

use lgst_transport::TransportError;
use serde_json::Value;
use thiserror::Error;

/// A failure from the ledger client.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("insufficient funds: {0}")]
    InsufficientFunds(String),

    #[error("invalid destination account: {0}")]
    InvalidDestination(String),

    /// Another transaction consumed the source account's sequence number
    /// between our read and our submission.
    #[error("sequence number conflict: {0}")]
    SequenceConflict(String),

    #[error("ledger request timed out: {0}")]
    NetworkTimeout(String),

    #[error("account not found: {0}")]
    NoAccount(String),

    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("invalid ledger response: {0}")]
    InvalidResponse(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error(transparent)]
    Transport(TransportError),

    #[error("ledger error: {0}")]
    Unknown(String),
}

impl From<TransportError> for LedgerError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Timeout => Self::NetworkTimeout("request timed out".into()),
            TransportError::Api {
                status,
                ref message,
                ref body,
                ..
            } => {
                if let Some(classified) = classify_result_codes(body) {
                    return classified;
                }
                match status {
                    404 => Self::NoAccount(message.clone()),
                    408 | 504 => Self::NetworkTimeout(message.clone()),
                    _ => Self::Unknown(format!("HTTP {status}: {message}")),
                }
            }
            other => Self::Transport(other),
        }
    }
}

/// Map the ledger's `extras.result_codes` into a tagged error.
///
/// Returns `None` when the body carries no recognizable codes.
fn classify_result_codes(body: &Value) -> Option<LedgerError> {
    let codes = body.get("extras")?.get("result_codes")?;
    let tx_code = codes
        .get("transaction")
        .and_then(|v| v.as_str())
        .unwrap_or("");
    let op_codes: Vec<&str> = codes
        .get("operations")
        .and_then(|v| v.as_array())
        .map(|ops| ops.iter().filter_map(|v| v.as_str()).collect())
        .unwrap_or_default();

    let detail = if op_codes.is_empty() {
        tx_code.to_string()
    } else {
        format!("{tx_code} [{}]", op_codes.join(", "))
    };

    if tx_code == "tx_bad_seq" {
        return Some(LedgerError::SequenceConflict(detail));
    }
    if tx_code == "tx_too_late" {
        return Some(LedgerError::NetworkTimeout(detail));
    }
    if tx_code == "tx_insufficient_balance" || op_codes.contains(&"op_underfunded") {
        return Some(LedgerError::InsufficientFunds(detail));
    }
    if op_codes.contains(&"op_no_destination") || op_codes.contains(&"op_no_trust") {
        return Some(LedgerError::InvalidDestination(detail));
    }
    None
}

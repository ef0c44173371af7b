//! Token transaction records.

use crate::{AccountId, Timestamp, TokenAmount};
use serde::{Deserialize, Serialize};

/// Kind of ledger operation a transaction represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Payment,
    EscrowCreate,
    EscrowRelease,
    Refund,
}

/// Lifecycle state of a transaction.
///
/// The authoritative status comes from the ledger; the client records
/// `Pending` on submission and only moves to `Completed`/`Failed` from a
/// subsequent fetch. A transaction never changes after reaching a terminal
/// status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
}

/// A submitted or observed token transfer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TokenTransaction {
    /// Transaction hash on the ledger.
    pub id: String,
    #[serde(rename = "type")]
    pub tx_type: TransactionType,
    pub from: AccountId,
    pub to: AccountId,
    pub amount: TokenAmount,
    pub status: TransactionStatus,
    pub timestamp: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
}

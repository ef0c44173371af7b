//! Wire records for the horizon-style REST surface.

use lgst_types::{Timestamp, TokenAmount};
use serde::Deserialize;

/// An account as returned by `GET /accounts/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountRecord {
    pub account_id: String,
    /// Sequence numbers are serialized as strings by the ledger.
    pub sequence: String,
    #[serde(default)]
    pub balances: Vec<BalanceRecord>,
}

/// One trustline/asset entry of an account.
#[derive(Debug, Clone, Deserialize)]
pub struct BalanceRecord {
    pub asset_type: String,
    #[serde(default)]
    pub asset_code: Option<String>,
    #[serde(default)]
    pub asset_issuer: Option<String>,
    pub balance: TokenAmount,
}

/// Response from `POST /transactions`.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitResult {
    pub hash: String,
    #[serde(default)]
    pub successful: bool,
}

/// Response page from `GET /accounts/{id}/payments`.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentsPage {
    #[serde(default)]
    pub records: Vec<PaymentRecord>,
}

/// One settled payment involving the account.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentRecord {
    pub id: String,
    pub from: String,
    pub to: String,
    pub amount: TokenAmount,
    #[serde(default)]
    pub asset_code: Option<String>,
    #[serde(default)]
    pub asset_issuer: Option<String>,
    pub created_at: Timestamp,
    #[serde(default)]
    pub memo: Option<String>,
}

//! Client configuration with TOML file support.

use crate::error::LedgerError;
use lgst_types::{NetworkId, TokenAmount};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for a [`crate::HorizonClient`].
///
/// Can be loaded from a TOML file via [`ClientConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Which ledger network to target.
    #[serde(default)]
    pub network: NetworkId,

    /// Override for the network's default horizon endpoint.
    #[serde(default)]
    pub horizon_url: Option<String>,

    /// Asset code of the marketplace token.
    #[serde(default = "default_token_code")]
    pub token_code: String,

    /// Account id of the token's issuing identity.
    pub token_issuer: String,

    /// Secret seed of the issuing identity; required only by
    /// `create_account`.
    #[serde(default)]
    pub issuer_secret: Option<String>,

    /// The designated escrow-holding identity.
    #[serde(default)]
    pub escrow_address: Option<String>,

    /// Flat fee attached to every transaction, in raw units.
    #[serde(default = "default_base_fee")]
    pub base_fee: u32,

    /// Submission window for payments and releases, in seconds.
    #[serde(default = "default_tx_timeout_secs")]
    pub tx_timeout_secs: u64,

    /// Funding for newly created accounts.
    #[serde(default = "default_starting_balance")]
    pub starting_balance: TokenAmount,

    /// Maximum trustline limit established by `trust_asset`.
    #[serde(default = "default_trust_limit")]
    pub trust_limit: TokenAmount,

    /// Shared secret keying the transport layer's field cipher.
    #[serde(default = "default_field_secret")]
    pub field_secret: String,

    /// Rate-limit ceiling per endpoint per window.
    #[serde(default = "default_rate_limit_max_requests")]
    pub rate_limit_max_requests: usize,

    /// Rate-limit trailing window, in seconds.
    #[serde(default = "default_rate_limit_window_secs")]
    pub rate_limit_window_secs: u64,
}

impl ClientConfig {
    /// Configuration with every field at its default.
    pub fn new(network: NetworkId, token_issuer: impl Into<String>) -> Self {
        Self {
            network,
            horizon_url: None,
            token_code: default_token_code(),
            token_issuer: token_issuer.into(),
            issuer_secret: None,
            escrow_address: None,
            base_fee: default_base_fee(),
            tx_timeout_secs: default_tx_timeout_secs(),
            starting_balance: default_starting_balance(),
            trust_limit: default_trust_limit(),
            field_secret: default_field_secret(),
            rate_limit_max_requests: default_rate_limit_max_requests(),
            rate_limit_window_secs: default_rate_limit_window_secs(),
        }
    }

    /// The effective horizon endpoint: explicit override or the network
    /// default.
    pub fn horizon_url(&self) -> &str {
        self.horizon_url
            .as_deref()
            .unwrap_or_else(|| self.network.horizon_url())
    }

    /// Parse a configuration from TOML text.
    pub fn from_toml_str(raw: &str) -> Result<Self, LedgerError> {
        toml::from_str(raw).map_err(|e| LedgerError::Serialization(e.to_string()))
    }

    /// Load a configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self, LedgerError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| LedgerError::Serialization(format!("read {}: {e}", path.display())))?;
        Self::from_toml_str(&raw)
    }
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_token_code() -> String {
    "LGST".to_string()
}

fn default_base_fee() -> u32 {
    100
}

fn default_tx_timeout_secs() -> u64 {
    30
}

fn default_starting_balance() -> TokenAmount {
    // 1.5 tokens: the ledger's minimum balance for a fresh account.
    TokenAmount::from_raw(15_000_000)
}

fn default_trust_limit() -> TokenAmount {
    // 1,000,000,000 tokens.
    TokenAmount::from_raw(10_000_000_000_000_000)
}

fn default_field_secret() -> String {
    "default-key-for-development".to_string()
}

fn default_rate_limit_max_requests() -> usize {
    100
}

fn default_rate_limit_window_secs() -> u64 {
    60
}

//! The horizon client: the only code that talks to the ledger network.

use crate::config::ClientConfig;
use crate::error::LedgerError;
use crate::horizon::{AccountRecord, PaymentsPage, SubmitResult};
use crate::tx::{Asset, Operation, SignedTransaction, TimeBounds, Transaction};
use lgst_crypto::{
    encode_account_id, encode_secret_seed, generate_keypair, keypair_from_secret,
    strkey,
};
use lgst_transport::{SecureHttp, SecurityContext};
use lgst_types::{
    AccountId, KeyPair, Timestamp, TokenAmount, TokenTransaction, TransactionStatus,
    TransactionType,
};
use serde::Serialize;
use std::time::Duration;

/// A freshly generated key pair in its text encodings.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedKeypair {
    pub public_key: String,
    pub secret_key: String,
}

/// Client for a horizon-style ledger REST endpoint.
///
/// Owns no mutable state beyond the transport's security context; every
/// operation is fire-once with the account state re-read per call.
pub struct HorizonClient {
    http: SecureHttp,
    base_url: String,
    asset: Asset,
    config: ClientConfig,
}

impl HorizonClient {
    pub fn new(config: ClientConfig) -> Result<Self, LedgerError> {
        let ctx = SecurityContext::with_rate_limit(
            &config.field_secret,
            config.rate_limit_max_requests,
            Duration::from_secs(config.rate_limit_window_secs),
        );
        let http = SecureHttp::new(ctx).map_err(LedgerError::Transport)?;
        let base_url = config.horizon_url().trim_end_matches('/').to_string();
        let asset = Asset {
            code: config.token_code.clone(),
            issuer: config.token_issuer.clone(),
        };
        Ok(Self {
            http,
            base_url,
            asset,
            config,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The token's balance on `address`.
    ///
    /// An account without the token trustline holds none of the token; that
    /// is a zero balance, not an error.
    pub async fn get_balance(&self, address: &AccountId) -> Result<TokenAmount, LedgerError> {
        let account = self.load_account(address.as_str()).await?;
        Ok(token_balance_of(&account, &self.asset))
    }

    /// Settled token payments involving `address`, newest first as the
    /// ledger returns them. Payments in other assets are filtered out.
    pub async fn payments(&self, address: &AccountId) -> Result<Vec<TokenTransaction>, LedgerError> {
        let url = format!("{}/accounts/{}/payments", self.base_url, address.as_str());
        let json = self.http.get_json(&url).await?;
        let page: PaymentsPage = serde_json::from_value(json)
            .map_err(|e| LedgerError::InvalidResponse(format!("payments page: {e}")))?;

        Ok(page
            .records
            .into_iter()
            .filter(|r| {
                r.asset_code.as_deref() == Some(self.asset.code.as_str())
                    && r.asset_issuer.as_deref() == Some(self.asset.issuer.as_str())
            })
            .map(|r| TokenTransaction {
                id: r.id,
                tx_type: TransactionType::Payment,
                from: AccountId::new(r.from),
                to: AccountId::new(r.to),
                amount: r.amount,
                status: TransactionStatus::Completed,
                timestamp: r.created_at,
                memo: r.memo,
            })
            .collect())
    }

    /// Submit a single-payment transfer. Returns the transaction hash.
    pub async fn transfer(
        &self,
        from_secret: &str,
        to: &AccountId,
        amount: TokenAmount,
        memo: Option<String>,
    ) -> Result<String, LedgerError> {
        self.submit_payment(from_secret, to, amount, memo, self.config.tx_timeout_secs)
            .await
    }

    /// Pay `amount` into the designated escrow identity. The submission
    /// window is derived from the escrow duration.
    pub async fn create_escrow(
        &self,
        from_secret: &str,
        escrow_address: &AccountId,
        amount: TokenAmount,
        duration_secs: u64,
    ) -> Result<String, LedgerError> {
        self.submit_payment(from_secret, escrow_address, amount, None, duration_secs)
            .await
    }

    /// Pay escrowed funds from the escrow identity back to `destination`.
    pub async fn release_escrow(
        &self,
        escrow_secret: &str,
        destination: &AccountId,
        amount: TokenAmount,
    ) -> Result<String, LedgerError> {
        self.submit_payment(
            escrow_secret,
            destination,
            amount,
            None,
            self.config.tx_timeout_secs,
        )
        .await
    }

    /// Fund a new account from the issuing identity with the configured
    /// starting balance.
    pub async fn create_account(&self, destination: &AccountId) -> Result<String, LedgerError> {
        let issuer_secret = self
            .config
            .issuer_secret
            .as_deref()
            .ok_or_else(|| LedgerError::InvalidKey("issuer secret not configured".into()))?
            .to_string();
        if !strkey::is_valid_public_key(destination.as_str()) {
            return Err(LedgerError::InvalidDestination(destination.to_string()));
        }

        let (keys, source) = keys_from_secret(&issuer_secret)?;
        let account = self.load_account(source.as_str()).await?;
        let tx = Transaction {
            source: source.as_str().to_string(),
            sequence: next_sequence(&account)?,
            fee: self.config.base_fee,
            time_bounds: self.time_bounds(self.config.tx_timeout_secs),
            memo: None,
            operations: vec![Operation::CreateAccount {
                destination: destination.as_str().to_string(),
                starting_balance: self.config.starting_balance,
            }],
        };
        let result = self.submit(tx.sign(&keys, self.config.network)?).await?;
        tracing::debug!(hash = %result.hash, destination = %destination, "account created");
        Ok(result.hash)
    }

    /// Establish the token trustline for the account behind `secret`, with
    /// the configured maximum limit.
    pub async fn trust_asset(&self, secret: &str) -> Result<String, LedgerError> {
        let (keys, source) = keys_from_secret(secret)?;
        let account = self.load_account(source.as_str()).await?;
        let tx = Transaction {
            source: source.as_str().to_string(),
            sequence: next_sequence(&account)?,
            fee: self.config.base_fee,
            time_bounds: self.time_bounds(self.config.tx_timeout_secs),
            memo: None,
            operations: vec![Operation::ChangeTrust {
                asset: self.asset.clone(),
                limit: self.config.trust_limit,
            }],
        };
        let result = self.submit(tx.sign(&keys, self.config.network)?).await?;
        tracing::debug!(hash = %result.hash, account = %source, "trustline established");
        Ok(result.hash)
    }

    /// Generate a fresh key pair. Pure; no network call.
    pub fn generate_keypair(&self) -> GeneratedKeypair {
        let keys = generate_keypair();
        GeneratedKeypair {
            public_key: encode_account_id(&keys.public).as_str().to_string(),
            secret_key: encode_secret_seed(&keys.secret),
        }
    }

    /// Format + checksum validation only; does not check existence on the
    /// ledger.
    pub fn is_valid_public_key(&self, key: &str) -> bool {
        strkey::is_valid_public_key(key)
    }

    /// Format + checksum validation only.
    pub fn is_valid_secret_key(&self, key: &str) -> bool {
        strkey::is_valid_secret_key(key)
    }

    // ── Internals ───────────────────────────────────────────────────────

    async fn load_account(&self, address: &str) -> Result<AccountRecord, LedgerError> {
        let url = format!("{}/accounts/{}", self.base_url, address);
        let json = self.http.get_json(&url).await?;
        serde_json::from_value(json)
            .map_err(|e| LedgerError::InvalidResponse(format!("account record: {e}")))
    }

    async fn submit(&self, signed: SignedTransaction) -> Result<SubmitResult, LedgerError> {
        let url = format!("{}/transactions", self.base_url);
        let body = serde_json::to_value(&signed)
            .map_err(|e| LedgerError::Serialization(e.to_string()))?;
        let json = self.http.post_json(&url, body).await?;
        serde_json::from_value(json)
            .map_err(|e| LedgerError::InvalidResponse(format!("submit result: {e}")))
    }

    /// Build, sign, and submit a single-payment transaction.
    ///
    /// The source account's sequence number is re-read immediately before
    /// building; nothing is cached across calls.
    async fn submit_payment(
        &self,
        secret: &str,
        destination: &AccountId,
        amount: TokenAmount,
        memo: Option<String>,
        timeout_secs: u64,
    ) -> Result<String, LedgerError> {
        if !strkey::is_valid_public_key(destination.as_str()) {
            return Err(LedgerError::InvalidDestination(destination.to_string()));
        }
        let (keys, source) = keys_from_secret(secret)?;
        let account = self.load_account(source.as_str()).await?;
        let tx = Transaction {
            source: source.as_str().to_string(),
            sequence: next_sequence(&account)?,
            fee: self.config.base_fee,
            time_bounds: self.time_bounds(timeout_secs),
            memo,
            operations: vec![Operation::Payment {
                destination: destination.as_str().to_string(),
                asset: self.asset.clone(),
                amount,
            }],
        };
        let result = self.submit(tx.sign(&keys, self.config.network)?).await?;
        tracing::debug!(hash = %result.hash, source = %source, %amount, "payment submitted");
        Ok(result.hash)
    }

    fn time_bounds(&self, timeout_secs: u64) -> TimeBounds {
        TimeBounds {
            min_time: 0,
            max_time: Timestamp::now().plus_secs(timeout_secs).as_secs(),
        }
    }
}

/// Decode a secret seed string and derive its key pair and account id.
fn keys_from_secret(secret: &str) -> Result<(KeyPair, AccountId), LedgerError> {
    let seed = strkey::decode_secret_seed(secret)
        .ok_or_else(|| LedgerError::InvalidKey("malformed secret seed".into()))?;
    let keys = keypair_from_secret(seed);
    let address = encode_account_id(&keys.public);
    Ok((keys, address))
}

/// The account's balance in the given asset.
///
/// An account without the matching trustline holds none of the token: zero,
/// not an error.
fn token_balance_of(account: &AccountRecord, asset: &Asset) -> TokenAmount {
    account
        .balances
        .iter()
        .find(|b| {
            b.asset_code.as_deref() == Some(asset.code.as_str())
                && b.asset_issuer.as_deref() == Some(asset.issuer.as_str())
        })
        .map(|b| b.balance)
        .unwrap_or(TokenAmount::ZERO)
}

/// The sequence number the next transaction from this account must carry.
fn next_sequence(account: &AccountRecord) -> Result<u64, LedgerError> {
    let current: u64 = account.sequence.parse().map_err(|e| {
        LedgerError::InvalidResponse(format!("sequence `{}`: {e}", account.sequence))
    })?;
    current
        .checked_add(1)
        .ok_or_else(|| LedgerError::InvalidResponse("sequence overflow".into()))
}

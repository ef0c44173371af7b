//! The ledger port: the seam between the store and the network.

use async_trait::async_trait;
use lgst_crypto::{encode_account_id, keypair_from_secret, strkey};
use lgst_ledger::{HorizonClient, LedgerError};
use lgst_types::{
    AccountId, EscrowBalance, EscrowStatus, Timestamp, TokenAmount, TokenTransaction,
    TransactionStatus, TransactionType,
};
use lgst_validation::{ValidatedEscrowCreate, ValidatedTransfer};

/// Outcome of releasing an escrow: which entry, where the funds went, and
/// the release transaction hash.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EscrowRelease {
    pub escrow_id: String,
    pub to: AccountId,
    pub tx_hash: String,
}

/// Everything the store needs from the ledger.
///
/// The production implementation is [`HorizonGateway`]; tests substitute a
/// mock to drive the store without a network.
#[async_trait]
pub trait LedgerGateway: Send + Sync {
    async fn fetch_balance(&self, address: &AccountId) -> Result<TokenAmount, LedgerError>;

    async fn fetch_transactions(
        &self,
        address: &AccountId,
    ) -> Result<Vec<TokenTransaction>, LedgerError>;

    async fn transfer(&self, transfer: &ValidatedTransfer)
        -> Result<TokenTransaction, LedgerError>;

    async fn create_escrow(
        &self,
        escrow: &ValidatedEscrowCreate,
    ) -> Result<EscrowBalance, LedgerError>;

    async fn release_escrow(&self, escrow: &EscrowBalance) -> Result<EscrowRelease, LedgerError>;
}

/// Production gateway backed by the horizon client.
///
/// Holds the wallet's signing identity and the escrow identity. Escrow
/// releases pay back to the wallet's own account; picking a different
/// destination per booking is the embedding application's concern.
pub struct HorizonGateway {
    client: HorizonClient,
    wallet_secret: String,
    wallet_address: AccountId,
    escrow_secret: String,
    escrow_address: AccountId,
}

impl HorizonGateway {
    pub fn new(
        client: HorizonClient,
        wallet_secret: String,
        escrow_secret: String,
    ) -> Result<Self, LedgerError> {
        let wallet_address = address_of(&wallet_secret)?;
        let escrow_address = address_of(&escrow_secret)?;
        Ok(Self {
            client,
            wallet_secret,
            wallet_address,
            escrow_secret,
            escrow_address,
        })
    }

    pub fn wallet_address(&self) -> &AccountId {
        &self.wallet_address
    }

    pub fn escrow_address(&self) -> &AccountId {
        &self.escrow_address
    }
}

#[async_trait]
impl LedgerGateway for HorizonGateway {
    async fn fetch_balance(&self, address: &AccountId) -> Result<TokenAmount, LedgerError> {
        self.client.get_balance(address).await
    }

    async fn fetch_transactions(
        &self,
        address: &AccountId,
    ) -> Result<Vec<TokenTransaction>, LedgerError> {
        self.client.payments(address).await
    }

    async fn transfer(
        &self,
        transfer: &ValidatedTransfer,
    ) -> Result<TokenTransaction, LedgerError> {
        let hash = self
            .client
            .transfer(
                &self.wallet_secret,
                &transfer.to,
                transfer.amount,
                transfer.memo.clone(),
            )
            .await?;
        Ok(TokenTransaction {
            id: hash,
            tx_type: TransactionType::Payment,
            from: self.wallet_address.clone(),
            to: transfer.to.clone(),
            amount: transfer.amount,
            status: TransactionStatus::Pending,
            timestamp: Timestamp::now(),
            memo: transfer.memo.clone(),
        })
    }

    async fn create_escrow(
        &self,
        escrow: &ValidatedEscrowCreate,
    ) -> Result<EscrowBalance, LedgerError> {
        let hash = self
            .client
            .create_escrow(
                &self.wallet_secret,
                &self.escrow_address,
                escrow.amount,
                escrow.duration_secs,
            )
            .await?;
        let now = Timestamp::now();
        Ok(EscrowBalance {
            id: hash,
            booking_id: escrow.booking_id.clone(),
            amount: escrow.amount,
            created_at: now,
            expires_at: now.plus_secs(escrow.duration_secs),
            status: EscrowStatus::Active,
        })
    }

    async fn release_escrow(&self, escrow: &EscrowBalance) -> Result<EscrowRelease, LedgerError> {
        let hash = self
            .client
            .release_escrow(&self.escrow_secret, &self.wallet_address, escrow.amount)
            .await?;
        Ok(EscrowRelease {
            escrow_id: escrow.id.clone(),
            to: self.wallet_address.clone(),
            tx_hash: hash,
        })
    }
}

/// Derive the account id behind a secret seed string.
fn address_of(secret: &str) -> Result<AccountId, LedgerError> {
    let seed = strkey::decode_secret_seed(secret)
        .ok_or_else(|| LedgerError::InvalidKey("malformed secret seed".into()))?;
    let keys = keypair_from_secret(seed);
    Ok(encode_account_id(&keys.public))
}

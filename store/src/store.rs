//! The token state store.

use crate::error::StoreError;
use crate::gateway::{EscrowRelease, LedgerGateway};
use crate::status::{OpStatus, StatusMap, TokenOp};
use lgst_types::{AccountId, EscrowBalance, EscrowStatus, TokenAmount, TokenTransaction};
use lgst_validation::{
    validate_escrow_create, validate_transfer, EscrowCreateRequest, TransferRequest,
};

/// Client-side token state and the orchestration of its async operations.
///
/// Owns `balance`, `transactions`, and `escrows` exclusively: callers read
/// them through accessors and mutate them only through the operation
/// methods. Every mutating operation validates before it touches the
/// gateway, and the post-mutation balance refresh is an awaited follow-up
/// step inside the mutating method itself: when `transfer` returns, the
/// refreshed balance is already in place (or the refresh failure has been
/// logged and the cached value kept). Nothing is retried.
pub struct TokenStore<G> {
    gateway: G,
    balance: TokenAmount,
    transactions: Vec<TokenTransaction>,
    escrows: Vec<EscrowBalance>,
    status: StatusMap,
}

impl<G: LedgerGateway> TokenStore<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            balance: TokenAmount::ZERO,
            transactions: Vec::new(),
            escrows: Vec::new(),
            status: StatusMap::default(),
        }
    }

    // ── State accessors ─────────────────────────────────────────────────

    pub fn balance(&self) -> TokenAmount {
        self.balance
    }

    pub fn transactions(&self) -> &[TokenTransaction] {
        &self.transactions
    }

    pub fn escrows(&self) -> &[EscrowBalance] {
        &self.escrows
    }

    pub fn status(&self, op: TokenOp) -> OpStatus {
        self.status.status(op)
    }

    pub fn error(&self, op: TokenOp) -> Option<&str> {
        self.status.error(op)
    }

    // ── Direct reducers ─────────────────────────────────────────────────

    pub fn clear_error(&mut self, op: TokenOp) {
        self.status.clear_error(op);
    }

    /// Overwrite the cached balance (e.g. from a push update).
    pub fn update_balance(&mut self, balance: TokenAmount) {
        self.balance = balance;
    }

    // ── Async operations ────────────────────────────────────────────────

    /// Fetch and replace the cached balance for `address`.
    ///
    /// On rejection the cached balance is left unchanged.
    pub async fn fetch_balance(&mut self, address: &AccountId) -> Result<TokenAmount, StoreError> {
        self.status.begin(TokenOp::FetchBalance);
        match self.gateway.fetch_balance(address).await {
            Ok(balance) => {
                self.balance = balance;
                self.status.fulfill(TokenOp::FetchBalance);
                Ok(balance)
            }
            Err(e) => {
                self.status.reject(TokenOp::FetchBalance, e.to_string());
                Err(e.into())
            }
        }
    }

    /// Fetch and replace the transaction history for `address` wholesale.
    pub async fn fetch_transactions(&mut self, address: &AccountId) -> Result<(), StoreError> {
        self.status.begin(TokenOp::FetchTransactions);
        match self.gateway.fetch_transactions(address).await {
            Ok(transactions) => {
                self.transactions = transactions;
                self.status.fulfill(TokenOp::FetchTransactions);
                Ok(())
            }
            Err(e) => {
                self.status.reject(TokenOp::FetchTransactions, e.to_string());
                Err(e.into())
            }
        }
    }

    /// Validate and submit a transfer.
    ///
    /// On fulfillment the resulting transaction is prepended to the history
    /// and the sender's balance is refreshed before this method returns. A
    /// validation failure rejects the operation without invoking the
    /// gateway.
    pub async fn transfer(
        &mut self,
        request: &TransferRequest,
    ) -> Result<TokenTransaction, StoreError> {
        self.status.begin(TokenOp::Transfer);

        let validated = match validate_transfer(request) {
            Ok(v) => v,
            Err(errors) => {
                self.status.reject(TokenOp::Transfer, errors.to_string());
                return Err(errors.into());
            }
        };

        match self.gateway.transfer(&validated).await {
            Ok(tx) => {
                self.transactions.insert(0, tx.clone());
                self.status.fulfill(TokenOp::Transfer);
                let sender = tx.from.clone();
                self.refresh_balance(&sender).await;
                Ok(tx)
            }
            Err(e) => {
                self.status.reject(TokenOp::Transfer, e.to_string());
                Err(e.into())
            }
        }
    }

    /// Validate and submit an escrow creation. Appends the new entry on
    /// fulfillment; the balance is not refreshed.
    pub async fn create_escrow(
        &mut self,
        request: &EscrowCreateRequest,
    ) -> Result<EscrowBalance, StoreError> {
        self.status.begin(TokenOp::CreateEscrow);

        let validated = match validate_escrow_create(request) {
            Ok(v) => v,
            Err(errors) => {
                self.status.reject(TokenOp::CreateEscrow, errors.to_string());
                return Err(errors.into());
            }
        };

        match self.gateway.create_escrow(&validated).await {
            Ok(escrow) => {
                self.escrows.push(escrow.clone());
                self.status.fulfill(TokenOp::CreateEscrow);
                Ok(escrow)
            }
            Err(e) => {
                self.status.reject(TokenOp::CreateEscrow, e.to_string());
                Err(e.into())
            }
        }
    }

    /// Release the escrow with id `escrow_id`.
    ///
    /// On fulfillment the entry is removed from the collection and the
    /// destination's balance is refreshed before this method returns.
    pub async fn release_escrow(&mut self, escrow_id: &str) -> Result<EscrowRelease, StoreError> {
        self.status.begin(TokenOp::ReleaseEscrow);

        let Some(index) = self.escrows.iter().position(|e| e.id == escrow_id) else {
            let err = StoreError::EscrowNotFound(escrow_id.to_string());
            self.status.reject(TokenOp::ReleaseEscrow, err.to_string());
            return Err(err);
        };

        // Guard the status transition before submitting the release.
        let mut escrow = self.escrows[index].clone();
        if let Err(e) = escrow.transition(EscrowStatus::Released) {
            self.status.reject(TokenOp::ReleaseEscrow, e.to_string());
            return Err(e.into());
        }

        match self.gateway.release_escrow(&self.escrows[index]).await {
            Ok(release) => {
                self.escrows.remove(index);
                self.status.fulfill(TokenOp::ReleaseEscrow);
                let destination = release.to.clone();
                self.refresh_balance(&destination).await;
                Ok(release)
            }
            Err(e) => {
                self.status.reject(TokenOp::ReleaseEscrow, e.to_string());
                Err(e.into())
            }
        }
    }

    /// Awaited post-mutation balance refresh.
    ///
    /// The mutation already settled on the ledger, so a refresh failure only
    /// leaves the cached balance stale; it is logged, not surfaced.
    async fn refresh_balance(&mut self, address: &AccountId) {
        match self.gateway.fetch_balance(address).await {
            Ok(balance) => self.balance = balance,
            Err(e) => tracing::warn!(
                address = %address,
                error = %e,
                "post-mutation balance refresh failed; keeping cached balance"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::LedgerGateway;
    use async_trait::async_trait;
    use lgst_ledger::LedgerError;
    use lgst_types::{Timestamp, TransactionStatus, TransactionType};
    use lgst_validation::{ValidatedEscrowCreate, ValidatedTransfer};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn sender() -> AccountId {
        AccountId::new("G".to_string() + &"SENDER".repeat(9) + "X")
    }

    fn dest_address() -> String {
        "G".to_string() + &"A7B2".repeat(13) + "XYZ"
    }

    /// Programmable in-memory gateway.
    #[derive(Default)]
    struct MockGateway {
        balance: Mutex<TokenAmount>,
        history: Mutex<Vec<TokenTransaction>>,
        fetch_balance_calls: AtomicUsize,
        transfer_calls: AtomicUsize,
        fail_fetch_balance: Mutex<Option<String>>,
        fail_transfer: Mutex<Option<String>>,
        fail_release: Mutex<Option<String>>,
    }

    impl MockGateway {
        fn set_balance(&self, amount: &str) {
            *self.balance.lock().unwrap() = TokenAmount::parse(amount).unwrap();
        }

        fn failure(slot: &Mutex<Option<String>>) -> Option<LedgerError> {
            slot.lock()
                .unwrap()
                .as_ref()
                .map(|msg| LedgerError::Unknown(msg.clone()))
        }
    }

    #[async_trait]
    impl LedgerGateway for MockGateway {
        async fn fetch_balance(&self, _address: &AccountId) -> Result<TokenAmount, LedgerError> {
            self.fetch_balance_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(e) = Self::failure(&self.fail_fetch_balance) {
                return Err(e);
            }
            Ok(*self.balance.lock().unwrap())
        }

        async fn fetch_transactions(
            &self,
            _address: &AccountId,
        ) -> Result<Vec<TokenTransaction>, LedgerError> {
            Ok(self.history.lock().unwrap().clone())
        }

        async fn transfer(
            &self,
            transfer: &ValidatedTransfer,
        ) -> Result<TokenTransaction, LedgerError> {
            self.transfer_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(e) = Self::failure(&self.fail_transfer) {
                return Err(e);
            }
            Ok(TokenTransaction {
                id: "abc123".into(),
                tx_type: TransactionType::Payment,
                from: sender(),
                to: transfer.to.clone(),
                amount: transfer.amount,
                status: TransactionStatus::Pending,
                timestamp: Timestamp::new(1_700_000_000),
                memo: transfer.memo.clone(),
            })
        }

        async fn create_escrow(
            &self,
            escrow: &ValidatedEscrowCreate,
        ) -> Result<EscrowBalance, LedgerError> {
            Ok(EscrowBalance {
                id: format!("escrow-{}", escrow.booking_id),
                booking_id: escrow.booking_id.clone(),
                amount: escrow.amount,
                created_at: Timestamp::new(1_700_000_000),
                expires_at: Timestamp::new(1_700_000_000 + escrow.duration_secs),
                status: EscrowStatus::Active,
            })
        }

        async fn release_escrow(
            &self,
            escrow: &EscrowBalance,
        ) -> Result<EscrowRelease, LedgerError> {
            if let Some(e) = Self::failure(&self.fail_release) {
                return Err(e);
            }
            Ok(EscrowRelease {
                escrow_id: escrow.id.clone(),
                to: sender(),
                tx_hash: "rel456".into(),
            })
        }
    }

    fn transfer_request(amount: &str) -> TransferRequest {
        TransferRequest {
            to: dest_address(),
            amount: amount.into(),
            memo: Some("rent".into()),
        }
    }

    fn escrow_request() -> EscrowCreateRequest {
        EscrowCreateRequest {
            amount: "25".into(),
            booking_id: "booking-42".into(),
            duration_secs: 86_400,
        }
    }

    #[tokio::test]
    async fn transfer_prepends_transaction_and_refreshes_balance() {
        let gateway = MockGateway::default();
        gateway.set_balance("89.5");
        let mut store = TokenStore::new(gateway);

        let tx = store.transfer(&transfer_request("10.5")).await.unwrap();

        assert_eq!(tx.id, "abc123");
        assert_eq!(store.transactions()[0].id, "abc123");
        assert_eq!(store.status(TokenOp::Transfer), OpStatus::Fulfilled);
        assert_eq!(store.error(TokenOp::Transfer), None);
        // The refresh is part of the transfer's own completion.
        assert_eq!(store.balance(), TokenAmount::parse("89.5").unwrap());
        assert_eq!(store.gateway.fetch_balance_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn new_transfers_go_to_the_front() {
        let gateway = MockGateway::default();
        let mut store = TokenStore::new(gateway);
        store.transactions.push(TokenTransaction {
            id: "old".into(),
            tx_type: TransactionType::Payment,
            from: sender(),
            to: sender(),
            amount: TokenAmount::parse("1").unwrap(),
            status: TransactionStatus::Completed,
            timestamp: Timestamp::new(1),
            memo: None,
        });

        store.transfer(&transfer_request("2")).await.unwrap();

        assert_eq!(store.transactions().len(), 2);
        assert_eq!(store.transactions()[0].id, "abc123");
        assert_eq!(store.transactions()[1].id, "old");
    }

    #[tokio::test]
    async fn invalid_transfer_never_reaches_the_gateway() {
        let gateway = MockGateway::default();
        let mut store = TokenStore::new(gateway);

        let err = store.transfer(&transfer_request("-5")).await.unwrap_err();

        assert!(matches!(err, StoreError::Validation(_)));
        assert_eq!(store.gateway.transfer_calls.load(Ordering::SeqCst), 0);
        assert_eq!(store.gateway.fetch_balance_calls.load(Ordering::SeqCst), 0);
        assert_eq!(store.status(TokenOp::Transfer), OpStatus::Rejected);
        assert!(store
            .error(TokenOp::Transfer)
            .unwrap()
            .contains("Invalid amount format"));
        assert!(store.transactions().is_empty());
    }

    #[tokio::test]
    async fn rejected_transfer_records_the_error() {
        let gateway = MockGateway::default();
        *gateway.fail_transfer.lock().unwrap() = Some("tx_bad_seq".into());
        let mut store = TokenStore::new(gateway);

        let err = store.transfer(&transfer_request("10.5")).await.unwrap_err();

        assert!(matches!(err, StoreError::Ledger(_)));
        assert_eq!(store.status(TokenOp::Transfer), OpStatus::Rejected);
        assert!(store.error(TokenOp::Transfer).unwrap().contains("tx_bad_seq"));
        assert!(store.transactions().is_empty());
    }

    #[tokio::test]
    async fn refresh_failure_does_not_fail_the_transfer() {
        let gateway = MockGateway::default();
        *gateway.fail_fetch_balance.lock().unwrap() = Some("horizon down".into());
        let mut store = TokenStore::new(gateway);
        store.update_balance(TokenAmount::parse("100").unwrap());

        let tx = store.transfer(&transfer_request("10.5")).await.unwrap();

        assert_eq!(tx.id, "abc123");
        assert_eq!(store.status(TokenOp::Transfer), OpStatus::Fulfilled);
        // Cached balance kept when the refresh fails.
        assert_eq!(store.balance(), TokenAmount::parse("100").unwrap());
    }

    #[tokio::test]
    async fn fetch_balance_replaces_cached_value() {
        let gateway = MockGateway::default();
        gateway.set_balance("120.5");
        let mut store = TokenStore::new(gateway);

        let balance = store.fetch_balance(&sender()).await.unwrap();

        assert_eq!(balance, TokenAmount::parse("120.5").unwrap());
        assert_eq!(store.balance(), balance);
        assert_eq!(store.status(TokenOp::FetchBalance), OpStatus::Fulfilled);
    }

    #[tokio::test]
    async fn rejected_fetch_keeps_old_balance() {
        let gateway = MockGateway::default();
        *gateway.fail_fetch_balance.lock().unwrap() = Some("horizon down".into());
        let mut store = TokenStore::new(gateway);
        store.update_balance(TokenAmount::parse("42").unwrap());

        let err = store.fetch_balance(&sender()).await.unwrap_err();

        assert!(matches!(err, StoreError::Ledger(_)));
        assert_eq!(store.balance(), TokenAmount::parse("42").unwrap());
        assert_eq!(store.status(TokenOp::FetchBalance), OpStatus::Rejected);
        assert!(store
            .error(TokenOp::FetchBalance)
            .unwrap()
            .contains("horizon down"));
    }

    #[tokio::test]
    async fn fetch_transactions_replaces_wholesale() {
        let gateway = MockGateway::default();
        gateway.history.lock().unwrap().push(TokenTransaction {
            id: "hist1".into(),
            tx_type: TransactionType::Payment,
            from: sender(),
            to: sender(),
            amount: TokenAmount::parse("3").unwrap(),
            status: TransactionStatus::Completed,
            timestamp: Timestamp::new(5),
            memo: None,
        });
        let mut store = TokenStore::new(gateway);
        store.transactions.push(TokenTransaction {
            id: "stale".into(),
            tx_type: TransactionType::Payment,
            from: sender(),
            to: sender(),
            amount: TokenAmount::parse("9").unwrap(),
            status: TransactionStatus::Completed,
            timestamp: Timestamp::new(1),
            memo: None,
        });

        store.fetch_transactions(&sender()).await.unwrap();

        assert_eq!(store.transactions().len(), 1);
        assert_eq!(store.transactions()[0].id, "hist1");
    }

    #[tokio::test]
    async fn create_escrow_appends_without_balance_refresh() {
        let gateway = MockGateway::default();
        let mut store = TokenStore::new(gateway);

        let escrow = store.create_escrow(&escrow_request()).await.unwrap();

        assert_eq!(escrow.booking_id, "booking-42");
        assert_eq!(store.escrows().len(), 1);
        assert_eq!(store.escrows()[0].status, EscrowStatus::Active);
        assert_eq!(store.status(TokenOp::CreateEscrow), OpStatus::Fulfilled);
        assert_eq!(store.gateway.fetch_balance_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn invalid_escrow_rejected_before_gateway() {
        let gateway = MockGateway::default();
        let mut store = TokenStore::new(gateway);
        let mut request = escrow_request();
        request.amount = "0".into();

        let err = store.create_escrow(&request).await.unwrap_err();

        assert!(matches!(err, StoreError::Validation(_)));
        assert_eq!(store.status(TokenOp::CreateEscrow), OpStatus::Rejected);
        assert!(store.escrows().is_empty());
    }

    #[tokio::test]
    async fn release_escrow_removes_entry_and_refreshes() {
        let gateway = MockGateway::default();
        gateway.set_balance("75");
        let mut store = TokenStore::new(gateway);
        store.create_escrow(&escrow_request()).await.unwrap();
        let id = store.escrows()[0].id.clone();

        let release = store.release_escrow(&id).await.unwrap();

        assert_eq!(release.escrow_id, id);
        assert_eq!(release.tx_hash, "rel456");
        assert!(store.escrows().iter().all(|e| e.id != id));
        assert_eq!(store.status(TokenOp::ReleaseEscrow), OpStatus::Fulfilled);
        assert_eq!(store.balance(), TokenAmount::parse("75").unwrap());
        assert_eq!(store.gateway.fetch_balance_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn releasing_unknown_escrow_is_rejected() {
        let gateway = MockGateway::default();
        let mut store = TokenStore::new(gateway);

        let err = store.release_escrow("nope").await.unwrap_err();

        assert!(matches!(err, StoreError::EscrowNotFound(_)));
        assert_eq!(store.status(TokenOp::ReleaseEscrow), OpStatus::Rejected);
    }

    #[tokio::test]
    async fn failed_release_keeps_the_entry() {
        let gateway = MockGateway::default();
        *gateway.fail_release.lock().unwrap() = Some("op_underfunded".into());
        let mut store = TokenStore::new(gateway);
        store.create_escrow(&escrow_request()).await.unwrap();
        let id = store.escrows()[0].id.clone();

        let err = store.release_escrow(&id).await.unwrap_err();

        assert!(matches!(err, StoreError::Ledger(_)));
        assert_eq!(store.escrows().len(), 1);
        assert_eq!(store.status(TokenOp::ReleaseEscrow), OpStatus::Rejected);
    }

    #[tokio::test]
    async fn operation_statuses_do_not_clobber_each_other() {
        let gateway = MockGateway::default();
        gateway.set_balance("10");
        let mut store = TokenStore::new(gateway);

        store.transfer(&transfer_request("1")).await.unwrap();
        *store.gateway.fail_fetch_balance.lock().unwrap() = Some("down".into());
        let _ = store.fetch_balance(&sender()).await;

        // A rejected balance fetch leaves the transfer's indicator alone.
        assert_eq!(store.status(TokenOp::Transfer), OpStatus::Fulfilled);
        assert_eq!(store.status(TokenOp::FetchBalance), OpStatus::Rejected);
        assert_eq!(store.error(TokenOp::Transfer), None);
    }

    #[tokio::test]
    async fn clear_error_resets_the_slot() {
        let gateway = MockGateway::default();
        let mut store = TokenStore::new(gateway);

        let _ = store.transfer(&transfer_request("-5")).await;
        assert!(store.error(TokenOp::Transfer).is_some());

        store.clear_error(TokenOp::Transfer);
        assert_eq!(store.error(TokenOp::Transfer), None);
    }
}

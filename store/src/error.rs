//! Store operation failures.

use lgst_ledger::LedgerError;
use lgst_types::EscrowTransitionError;
use lgst_validation::ValidationErrors;
use thiserror::Error;

/// Why a store operation was rejected.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The request never left the client; the gateway was not invoked.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("escrow {0} not found")]
    EscrowNotFound(String),

    #[error(transparent)]
    EscrowTransition(#[from] EscrowTransitionError),
}

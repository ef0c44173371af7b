//! Token state store for the LGST client.
//!
//! [`TokenStore`] owns the in-memory collections the UI renders (cached
//! balance, transaction history, escrow list) and orchestrates each
//! asynchronous operation's `idle → pending → {fulfilled, rejected}`
//! lifecycle. Each operation kind tracks its own status and error, so
//! concurrent operations never clobber one another's indicator.
//!
//! The ledger is reached through the [`LedgerGateway`] port;
//! [`HorizonGateway`] is the production implementation, and tests substitute
//! a mock.

pub mod error;
pub mod gateway;
pub mod status;
pub mod store;

pub use error::StoreError;
pub use gateway::{EscrowRelease, HorizonGateway, LedgerGateway};
pub use status::{OpStatus, TokenOp};
pub use store::TokenStore;

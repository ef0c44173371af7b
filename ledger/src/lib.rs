//! Ledger client for the LGST token.
//!
//! The only crate that talks to the ledger network. [`HorizonClient`] wraps
//! a horizon-style REST endpoint behind the secure transport layer:
//! loading accounts, building and signing JSON transaction envelopes,
//! submitting them, and reading payment history.
//!
//! Every mutating operation re-reads the source account's sequence number
//! immediately before building its transaction; nothing is cached between
//! calls and nothing is retried. Two concurrent submissions from the same
//! account race on sequence allocation and one of them fails with
//! [`LedgerError::SequenceConflict`]; callers that need ordering must
//! serialize their own submissions.

pub mod client;
pub mod config;
pub mod error;
pub mod horizon;
pub mod tx;

pub use client::{GeneratedKeypair, HorizonClient};
pub use config::ClientConfig;
pub use error::LedgerError;
pub use tx::{Asset, Operation, SignedTransaction, TimeBounds, Transaction};

//! Fundamental types for the LGST settlement client.
//!
//! This crate defines the core types shared across every other crate in the
//! workspace: account identifiers, fixed-point token amounts, transaction and
//! escrow records, timestamps, keys, and network identifiers.

pub mod address;
pub mod amount;
pub mod escrow;
pub mod keys;
pub mod network;
pub mod time;
pub mod transaction;

pub use address::AccountId;
pub use amount::{AmountParseError, TokenAmount};
pub use escrow::{EscrowBalance, EscrowStatus, EscrowTransitionError};
pub use keys::{KeyPair, PublicKey, SecretSeed, Signature};
pub use network::NetworkId;
pub use time::Timestamp;
pub use transaction::{TokenTransaction, TransactionStatus, TransactionType};

//! Request validation and sanitization.
//!
//! Everything here is a pure function of its input: requests are checked and
//! normalized before they reach the transport or ledger layers, and expected
//! validation failures come back as accumulated human-readable messages
//! rather than panics. Stateful checks (balance sufficiency, account
//! existence) belong to the ledger.

pub mod error;
pub mod escrow;
pub mod sanitize;
pub mod transfer;

pub use error::ValidationErrors;
pub use escrow::{validate_escrow_create, EscrowCreateRequest, ValidatedEscrowCreate};
pub use sanitize::{sanitize_input, sanitize_json};
pub use transfer::{validate_transfer, TransferRequest, ValidatedTransfer};

//! Ledger account identifier.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A ledger account identifier in its text form.
///
/// Well-formed identifiers are 56 characters of uppercase letters and digits
/// (a base32-encoded Ed25519 public key with version byte and checksum).
/// This type only checks shape; full checksum validation lives in
/// `lgst-crypto`, which is the only crate that can decode the key material.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(String);

/// Length of an encoded account identifier.
pub const ACCOUNT_ID_LEN: usize = 56;

impl AccountId {
    /// Wrap a raw string without validating it.
    ///
    /// Use [`AccountId::is_wellformed`] (or the checksum validators in
    /// `lgst-crypto`) before trusting the value.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Return the raw identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Shape check: exactly 56 characters, all uppercase alphanumeric.
    ///
    /// This mirrors what request validation enforces before submission; it
    /// deliberately does not verify the embedded checksum.
    pub fn is_wellformed(&self) -> bool {
        self.0.len() == ACCOUNT_ID_LEN
            && self
                .0
                .bytes()
                .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for AccountId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for AccountId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

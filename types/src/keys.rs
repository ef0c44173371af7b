//! Cryptographic key types for account identity and transaction signing.

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A 32-byte Ed25519 public key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PublicKey(pub [u8; 32]);

/// A 32-byte Ed25519 secret seed.
///
/// Intentionally implements neither `Debug`, `Clone`, nor `Serialize` to
/// prevent accidental exposure. Bytes are zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SecretSeed(pub [u8; 32]);

/// A 64-byte Ed25519 signature, hex-encoded on the wire.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature(pub [u8; 64]);

impl Serialize for Signature {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut out = String::with_capacity(128);
        for b in self.0 {
            out.push_str(&format!("{b:02x}"));
        }
        serializer.serialize_str(&out)
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        if s.len() != 128 {
            return Err(serde::de::Error::invalid_length(s.len(), &"128 hex chars"));
        }
        let mut arr = [0u8; 64];
        for (i, byte) in arr.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&s[2 * i..2 * i + 2], 16)
                .map_err(|_| serde::de::Error::custom("invalid hex in signature"))?;
        }
        Ok(Signature(arr))
    }
}

/// An Ed25519 key pair (public + secret seed).
///
/// Use `lgst_crypto::generate_keypair()` or
/// `lgst_crypto::keypair_from_seed()` to construct key pairs. This struct is
/// intentionally just data.
pub struct KeyPair {
    pub public: PublicKey,
    pub secret: SecretSeed,
}

impl PublicKey {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl SecretSeed {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl Signature {
    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }
}

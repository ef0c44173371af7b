//! Ed25519 key generation.

use ed25519_dalek::SigningKey;
use lgst_types::{KeyPair, PublicKey, SecretSeed};
use rand::rngs::OsRng;

/// Generate a new Ed25519 key pair from a secure random source.
pub fn generate_keypair() -> KeyPair {
    let signing_key = SigningKey::generate(&mut OsRng);
    let verifying_key = signing_key.verifying_key();
    KeyPair {
        public: PublicKey(verifying_key.to_bytes()),
        secret: SecretSeed(signing_key.to_bytes()),
    }
}

/// Derive the public key from a secret seed.
pub fn public_from_seed(secret: &SecretSeed) -> PublicKey {
    let signing_key = SigningKey::from_bytes(&secret.0);
    PublicKey(signing_key.verifying_key().to_bytes())
}

/// Reconstruct a full key pair from a secret seed.
pub fn keypair_from_secret(secret: SecretSeed) -> KeyPair {
    let public = public_from_seed(&secret);
    KeyPair { public, secret }
}

/// Derive a key pair from raw 32-byte seed material (deterministic).
pub fn keypair_from_seed(seed: &[u8; 32]) -> KeyPair {
    let signing_key = SigningKey::from_bytes(seed);
    let verifying_key = signing_key.verifying_key();
    KeyPair {
        public: PublicKey(verifying_key.to_bytes()),
        secret: SecretSeed(signing_key.to_bytes()),
    }
}

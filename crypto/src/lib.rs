//! Cryptographic primitives for the LGST settlement client.
//!
//! - **Ed25519** for transaction signing and verification
//! - **SHA-256** for hashing (signing payloads, cipher key derivation)
//! - Checksummed base32 account addresses (`G…` public / `S…` secret, 56 chars)
//! - `FieldCipher`, the reversible AES-256-GCM cipher the transport layer
//!   applies to sensitive request/response fields
//! - Argon2id + AES-256-GCM password keystore for secret seeds

pub mod field_cipher;
pub mod hash;
pub mod keys;
pub mod keystore;
pub mod sign;
pub mod strkey;
pub mod token;

pub use field_cipher::{CipherError, FieldCipher};
pub use hash::{sha256, sha256_multi};
pub use keys::{generate_keypair, keypair_from_secret, keypair_from_seed, public_from_seed};
pub use keystore::{
    decrypt_keystore, encrypt_keystore, load_keystore, save_keystore, KeystoreError, KeystoreFile,
};
pub use sign::{sign_message, verify_signature};
pub use strkey::{
    decode_account_id, decode_secret_seed, encode_account_id, encode_secret_seed,
    is_valid_public_key, is_valid_secret_key,
};
pub use token::{random_hex, secure_compare};

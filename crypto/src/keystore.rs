//! Argon2id encrypted keystore for Ed25519 secret seeds.
//!
//! Encrypts a 32-byte secret seed with a user-chosen password:
//! 1. Argon2id derives a 32-byte encryption key from the password + random salt
//! 2. AES-256-GCM encrypts the seed with a random nonce
//! 3. The result is stored as a JSON file with all parameters for future decryption

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use argon2::{Algorithm, Argon2, Params, Version};
use lgst_types::SecretSeed;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Argon2id parameters: 64 MB memory, 3 iterations, 1 lane of parallelism.
const ARGON2_MEMORY_KIB: u32 = 65536;
const ARGON2_ITERATIONS: u32 = 3;
const ARGON2_PARALLELISM: u32 = 1;
const ARGON2_OUTPUT_LEN: usize = 32;

/// Salt length in bytes.
const SALT_LEN: usize = 32;
/// AES-GCM nonce length in bytes (96 bits).
const NONCE_LEN: usize = 12;

/// Keystore failures.
#[derive(Debug, Error)]
pub enum KeystoreError {
    #[error("unsupported keystore version: {0}")]
    UnsupportedVersion(u32),

    #[error("key derivation failed: {0}")]
    Kdf(String),

    #[error("invalid keystore field: {0}")]
    InvalidField(String),

    #[error("decryption failed: wrong password or corrupted data")]
    WrongPassword,

    #[error("keystore I/O error: {0}")]
    Io(String),
}

/// The top-level keystore file structure, serializable to/from JSON.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KeystoreFile {
    pub version: u32,
    pub crypto: KeystoreCrypto,
}

/// The crypto section of the keystore, containing all encryption parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KeystoreCrypto {
    pub cipher: String,
    pub kdf: String,
    pub kdf_params: KdfParams,
    /// Hex-encoded salt.
    pub salt: String,
    /// Hex-encoded nonce.
    pub nonce: String,
    /// Hex-encoded ciphertext.
    pub ciphertext: String,
}

/// KDF parameters for Argon2id.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KdfParams {
    pub memory: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

/// Encrypt a secret seed with a password using Argon2id + AES-256-GCM.
pub fn encrypt_keystore(secret: &SecretSeed, password: &str) -> Result<KeystoreFile, KeystoreError> {
    let mut rng = rand::thread_rng();

    let mut salt = [0u8; SALT_LEN];
    rng.fill_bytes(&mut salt);

    let mut nonce_bytes = [0u8; NONCE_LEN];
    rng.fill_bytes(&mut nonce_bytes);

    let derived_key = derive_key(password, &salt)?;

    let cipher = Aes256Gcm::new_from_slice(&derived_key)
        .map_err(|e| KeystoreError::Kdf(format!("AES key init failed: {e}")))?;

    let nonce = Nonce::from_slice(&nonce_bytes);
    let ciphertext = cipher
        .encrypt(nonce, secret.0.as_ref())
        .map_err(|e| KeystoreError::Kdf(format!("encryption failed: {e}")))?;

    Ok(KeystoreFile {
        version: 1,
        crypto: KeystoreCrypto {
            cipher: "aes-256-gcm".to_string(),
            kdf: "argon2id".to_string(),
            kdf_params: KdfParams {
                memory: ARGON2_MEMORY_KIB,
                iterations: ARGON2_ITERATIONS,
                parallelism: ARGON2_PARALLELISM,
            },
            salt: hex::encode(salt),
            nonce: hex::encode(nonce_bytes),
            ciphertext: hex::encode(ciphertext),
        },
    })
}

/// Decrypt a keystore file with the given password, returning the secret seed.
pub fn decrypt_keystore(
    keystore: &KeystoreFile,
    password: &str,
) -> Result<SecretSeed, KeystoreError> {
    if keystore.version != 1 {
        return Err(KeystoreError::UnsupportedVersion(keystore.version));
    }

    let salt = hex::decode(&keystore.crypto.salt)
        .map_err(|e| KeystoreError::InvalidField(format!("salt: {e}")))?;
    let nonce_bytes = hex::decode(&keystore.crypto.nonce)
        .map_err(|e| KeystoreError::InvalidField(format!("nonce: {e}")))?;
    let ciphertext = hex::decode(&keystore.crypto.ciphertext)
        .map_err(|e| KeystoreError::InvalidField(format!("ciphertext: {e}")))?;

    if nonce_bytes.len() != NONCE_LEN {
        return Err(KeystoreError::InvalidField(format!(
            "nonce length: expected {NONCE_LEN}, got {}",
            nonce_bytes.len()
        )));
    }

    let derived_key = derive_key(password, &salt)?;

    let cipher = Aes256Gcm::new_from_slice(&derived_key)
        .map_err(|e| KeystoreError::Kdf(format!("AES key init failed: {e}")))?;

    let nonce = Nonce::from_slice(&nonce_bytes);
    let plaintext = cipher
        .decrypt(nonce, ciphertext.as_ref())
        .map_err(|_| KeystoreError::WrongPassword)?;

    if plaintext.len() != 32 {
        return Err(KeystoreError::InvalidField(format!(
            "decrypted key length: expected 32, got {}",
            plaintext.len()
        )));
    }

    let mut key = [0u8; 32];
    key.copy_from_slice(&plaintext);
    Ok(SecretSeed(key))
}

/// Save a keystore to a JSON file.
pub fn save_keystore(keystore: &KeystoreFile, path: &Path) -> Result<(), KeystoreError> {
    let json = serde_json::to_string_pretty(keystore)
        .map_err(|e| KeystoreError::Io(format!("JSON serialization failed: {e}")))?;
    std::fs::write(path, json).map_err(|e| KeystoreError::Io(e.to_string()))?;
    Ok(())
}

/// Load a keystore from a JSON file.
pub fn load_keystore(path: &Path) -> Result<KeystoreFile, KeystoreError> {
    let json = std::fs::read_to_string(path).map_err(|e| KeystoreError::Io(e.to_string()))?;
    let keystore: KeystoreFile =
        serde_json::from_str(&json).map_err(|e| KeystoreError::Io(format!("invalid JSON: {e}")))?;
    Ok(keystore)
}

/// Derive a 32-byte key from a password and salt using Argon2id.
fn derive_key(password: &str, salt: &[u8]) -> Result<[u8; 32], KeystoreError> {
    let params = Params::new(
        ARGON2_MEMORY_KIB,
        ARGON2_ITERATIONS,
        ARGON2_PARALLELISM,
        Some(ARGON2_OUTPUT_LEN),
    )
    .map_err(|e| KeystoreError::Kdf(e.to_string()))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut output = [0u8; 32];
    argon2
        .hash_password_into(password.as_bytes(), salt, &mut output)
        .map_err(|e| KeystoreError::Kdf(e.to_string()))?;

    Ok(output)
}

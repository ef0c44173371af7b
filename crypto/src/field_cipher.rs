//! Reversible cipher for sensitive request/response fields.
//!
//! The transport layer runs string fields named in its sensitive set through
//! this cipher before they leave the process and reverses them on the way
//! back. AES-256-GCM, keyed by SHA-256 of a shared secret string. Output
//! format: hex(nonce || ciphertext).

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use rand::RngCore;
use thiserror::Error;

/// AES-GCM nonce length in bytes (96 bits).
const NONCE_LEN: usize = 12;

/// Errors from reversing an encrypted field.
#[derive(Debug, Error)]
pub enum CipherError {
    #[error("invalid ciphertext encoding: {0}")]
    Encoding(String),

    #[error("decryption failed: authentication check failed")]
    Authentication,

    #[error("decrypted data is not valid UTF-8")]
    NotUtf8,
}

/// A reversible field cipher keyed from a shared secret.
#[derive(Clone)]
pub struct FieldCipher {
    key: [u8; 32],
}

impl FieldCipher {
    /// Derive the cipher key from a shared secret string.
    pub fn new(shared_secret: &str) -> Self {
        Self {
            key: crate::hash::sha256(shared_secret.as_bytes()),
        }
    }

    /// Encrypt a field value. Each call uses a fresh random nonce, so the
    /// same plaintext encrypts to different ciphertexts.
    pub fn encrypt(&self, plaintext: &str) -> String {
        let cipher = Aes256Gcm::new_from_slice(&self.key).expect("valid key length");

        let mut nonce_bytes = [0u8; NONCE_LEN];
        rand::thread_rng().fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = cipher
            .encrypt(nonce, plaintext.as_bytes())
            .expect("encryption should not fail");

        let mut out = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        out.extend_from_slice(&nonce_bytes);
        out.extend_from_slice(&ciphertext);
        hex::encode(out)
    }

    /// Decrypt a field value produced by [`FieldCipher::encrypt`].
    pub fn decrypt(&self, encoded: &str) -> Result<String, CipherError> {
        let bytes = hex::decode(encoded).map_err(|e| CipherError::Encoding(e.to_string()))?;
        if bytes.len() <= NONCE_LEN {
            return Err(CipherError::Encoding("ciphertext too short".into()));
        }
        let (nonce_bytes, ciphertext) = bytes.split_at(NONCE_LEN);

        let cipher = Aes256Gcm::new_from_slice(&self.key).expect("valid key length");
        let nonce = Nonce::from_slice(nonce_bytes);

        let plaintext = cipher
            .decrypt(nonce, ciphertext)
            .map_err(|_| CipherError::Authentication)?;

        String::from_utf8(plaintext).map_err(|_| CipherError::NotUtf8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn roundtrip() {
        let cipher = FieldCipher::new("shared-secret");
        let encrypted = cipher.encrypt("SABCDEF123");
        assert_ne!(encrypted, "SABCDEF123");
        assert_eq!(cipher.decrypt(&encrypted).unwrap(), "SABCDEF123");
    }

    #[test]
    fn fresh_nonce_per_call() {
        let cipher = FieldCipher::new("shared-secret");
        assert_ne!(cipher.encrypt("same input"), cipher.encrypt("same input"));
    }

    #[test]
    fn wrong_secret_fails_authentication() {
        let encrypted = FieldCipher::new("secret-a").encrypt("payload");
        let result = FieldCipher::new("secret-b").decrypt(&encrypted);
        assert!(matches!(result, Err(CipherError::Authentication)));
    }

    #[test]
    fn tampered_ciphertext_rejected() {
        let cipher = FieldCipher::new("shared-secret");
        let mut encrypted = cipher.encrypt("payload");
        let flipped = if encrypted.ends_with('0') { '1' } else { '0' };
        encrypted.pop();
        encrypted.push(flipped);
        assert!(cipher.decrypt(&encrypted).is_err());
    }

    #[test]
    fn plain_text_is_not_valid_ciphertext() {
        let cipher = FieldCipher::new("shared-secret");
        assert!(matches!(
            cipher.decrypt("not hex at all"),
            Err(CipherError::Encoding(_))
        ));
        assert!(matches!(
            cipher.decrypt("abcd"),
            Err(CipherError::Encoding(_))
        ));
    }

    proptest! {
        /// decrypt(encrypt(x)) == x for arbitrary strings.
        #[test]
        fn roundtrip_arbitrary(s in ".*") {
            let cipher = FieldCipher::new("prop-secret");
            let encrypted = cipher.encrypt(&s);
            prop_assert_eq!(cipher.decrypt(&encrypted).unwrap(), s);
        }
    }
}

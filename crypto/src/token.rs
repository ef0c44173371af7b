//! Opaque session token helpers.

use rand::rngs::OsRng;
use rand::RngCore;

/// Generate `n_bytes` of secure random data, hex-encoded.
///
/// Used for CSRF tokens and other opaque session identifiers.
pub fn random_hex(n_bytes: usize) -> String {
    let mut bytes = vec![0u8; n_bytes];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Compare two strings in constant time.
///
/// Always examines every byte of equal-length inputs so timing does not leak
/// the position of the first mismatch.
pub fn secure_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        diff |= x ^ y;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_hex_has_requested_length() {
        assert_eq!(random_hex(16).len(), 32);
        assert_eq!(random_hex(0).len(), 0);
    }

    #[test]
    fn random_hex_is_unique() {
        assert_ne!(random_hex(16), random_hex(16));
    }

    #[test]
    fn secure_compare_equal() {
        assert!(secure_compare("token-abc", "token-abc"));
        assert!(secure_compare("", ""));
    }

    #[test]
    fn secure_compare_unequal() {
        assert!(!secure_compare("token-abc", "token-abd"));
        assert!(!secure_compare("short", "longer-string"));
    }
}

//! Checksummed account address encoding.
//!
//! Address format: base32(version_byte || key || checksum), 56 characters.
//!
//! Version byte: `0x30` for public keys (addresses start with `G`), `0x90`
//! for secret seeds (start with `S`). Checksum: CRC16-XModem over
//! version byte + key, appended little-endian. Base32 alphabet: RFC 4648
//! uppercase, no padding (35 bytes → exactly 56 characters).

use lgst_types::{AccountId, PublicKey, SecretSeed};

/// RFC 4648 base32 alphabet.
const BASE32_ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

/// Reverse lookup table: ASCII byte → 5-bit value (0xFF = invalid).
const BASE32_DECODE: [u8; 128] = {
    let mut table = [0xFFu8; 128];
    let alpha = BASE32_ALPHABET;
    let mut i = 0;
    while i < 32 {
        table[alpha[i] as usize] = i as u8;
        i += 1;
    }
    table
};

/// Version byte for public-key addresses (first character `G`).
const VERSION_ACCOUNT: u8 = 6 << 3;
/// Version byte for secret seeds (first character `S`).
const VERSION_SECRET: u8 = 18 << 3;

/// Decoded payload: version byte + 32-byte key + 2-byte checksum.
const PAYLOAD_LEN: usize = 35;
/// Encoded address length: 280 bits / 5 bits per character.
const ENCODED_LEN: usize = 56;

/// CRC16-XModem (poly 0x1021, init 0).
fn crc16_xmodem(data: &[u8]) -> u16 {
    let mut crc: u16 = 0;
    for &byte in data {
        crc ^= (byte as u16) << 8;
        for _ in 0..8 {
            if crc & 0x8000 != 0 {
                crc = (crc << 1) ^ 0x1021;
            } else {
                crc <<= 1;
            }
        }
    }
    crc
}

/// Encode a byte slice as base32.
fn encode_base32(bytes: &[u8]) -> String {
    let total_bits = bytes.len() * 8;
    let num_chars = total_bits.div_ceil(5);
    let mut result = String::with_capacity(num_chars);

    let mut buffer: u64 = 0;
    let mut bits_in_buffer = 0;

    for &byte in bytes {
        buffer = (buffer << 8) | byte as u64;
        bits_in_buffer += 8;
        while bits_in_buffer >= 5 {
            bits_in_buffer -= 5;
            let idx = ((buffer >> bits_in_buffer) & 0x1F) as usize;
            result.push(BASE32_ALPHABET[idx] as char);
        }
    }
    // Remaining bits (padded with zeros on the right).
    if bits_in_buffer > 0 {
        let idx = ((buffer << (5 - bits_in_buffer)) & 0x1F) as usize;
        result.push(BASE32_ALPHABET[idx] as char);
    }

    result
}

/// Decode a base32 string into a fixed-size byte array. Returns `None` on
/// invalid characters or wrong length. Zero-allocation.
fn decode_base32_fixed<const N: usize>(s: &str) -> Option<[u8; N]> {
    let mut buffer: u64 = 0;
    let mut bits_in_buffer = 0;
    let mut result = [0u8; N];
    let mut pos = 0;

    for c in s.bytes() {
        if c >= 128 {
            return None;
        }
        let val = BASE32_DECODE[c as usize];
        if val == 0xFF {
            return None;
        }
        buffer = (buffer << 5) | val as u64;
        bits_in_buffer += 5;
        if bits_in_buffer >= 8 {
            bits_in_buffer -= 8;
            if pos < N {
                result[pos] = (buffer >> bits_in_buffer) as u8;
                pos += 1;
            }
        }
    }

    if pos < N {
        return None;
    }
    Some(result)
}

fn encode_key(version: u8, key: &[u8; 32]) -> String {
    let mut payload = [0u8; PAYLOAD_LEN];
    payload[0] = version;
    payload[1..33].copy_from_slice(key);
    let crc = crc16_xmodem(&payload[..33]);
    payload[33..].copy_from_slice(&crc.to_le_bytes());
    encode_base32(&payload)
}

fn decode_key(version: u8, s: &str) -> Option<[u8; 32]> {
    if s.len() != ENCODED_LEN {
        return None;
    }
    let payload: [u8; PAYLOAD_LEN] = decode_base32_fixed(s)?;
    if payload[0] != version {
        return None;
    }
    let expected = crc16_xmodem(&payload[..33]).to_le_bytes();
    if payload[33..] != expected {
        return None;
    }
    let mut key = [0u8; 32];
    key.copy_from_slice(&payload[1..33]);
    Some(key)
}

/// Encode a public key as a `G…` account identifier.
pub fn encode_account_id(public: &PublicKey) -> AccountId {
    AccountId::new(encode_key(VERSION_ACCOUNT, &public.0))
}

/// Decode a `G…` account identifier back to its public key.
///
/// Returns `None` if the address is malformed, carries the wrong version
/// byte, or fails its checksum.
pub fn decode_account_id(s: &str) -> Option<PublicKey> {
    decode_key(VERSION_ACCOUNT, s).map(PublicKey)
}

/// Encode a secret seed as an `S…` string.
pub fn encode_secret_seed(secret: &SecretSeed) -> String {
    encode_key(VERSION_SECRET, &secret.0)
}

/// Decode an `S…` string back to its secret seed.
pub fn decode_secret_seed(s: &str) -> Option<SecretSeed> {
    decode_key(VERSION_SECRET, s).map(SecretSeed)
}

/// Full format + checksum validation of a public-key address.
///
/// Does not check that the account exists on the ledger.
pub fn is_valid_public_key(s: &str) -> bool {
    decode_account_id(s).is_some()
}

/// Full format + checksum validation of a secret seed string.
pub fn is_valid_secret_key(s: &str) -> bool {
    decode_secret_seed(s).is_some()
}

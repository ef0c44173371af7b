//! Transaction envelope building and signing.
//!
//! Transactions are JSON envelopes signed with Ed25519 over
//! SHA-256(network-id ‖ canonical transaction JSON), where the network id is
//! SHA-256 of the network passphrase. Mixing the network id into the payload
//! makes a testnet signature useless on the public network.

use crate::error::LedgerError;
use lgst_crypto::{sha256, sha256_multi, sign_message};
use lgst_types::{KeyPair, NetworkId, TokenAmount};
use serde::{Deserialize, Serialize};

/// The token asset: 4-letter code plus issuing account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub code: String,
    pub issuer: String,
}

/// A single ledger operation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Operation {
    Payment {
        destination: String,
        asset: Asset,
        amount: TokenAmount,
    },
    CreateAccount {
        destination: String,
        starting_balance: TokenAmount,
    },
    ChangeTrust {
        asset: Asset,
        limit: TokenAmount,
    },
}

/// Validity window for a transaction, in Unix seconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBounds {
    pub min_time: u64,
    pub max_time: u64,
}

/// An unsigned transaction envelope.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Source account id.
    pub source: String,
    /// The source account's next sequence number.
    pub sequence: u64,
    /// Flat fee in raw units.
    pub fee: u32,
    pub time_bounds: TimeBounds,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    pub operations: Vec<Operation>,
}

impl Transaction {
    /// Hash committing to the network and the canonical transaction JSON.
    pub fn signing_payload(&self, network: NetworkId) -> Result<[u8; 32], LedgerError> {
        let tx_bytes =
            serde_json::to_vec(self).map_err(|e| LedgerError::Serialization(e.to_string()))?;
        let network_id = sha256(network.passphrase().as_bytes());
        Ok(sha256_multi(&[&network_id, &tx_bytes]))
    }

    /// Sign the envelope for `network` with the given key pair.
    pub fn sign(self, keys: &KeyPair, network: NetworkId) -> Result<SignedTransaction, LedgerError> {
        let payload = self.signing_payload(network)?;
        let signature = sign_message(&payload, &keys.secret);
        Ok(SignedTransaction {
            tx: self,
            signatures: vec![hex::encode(signature.as_bytes())],
        })
    }
}

/// A signed transaction envelope ready for submission.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SignedTransaction {
    pub tx: Transaction,
    /// Hex-encoded Ed25519 signatures over the signing payload.
    pub signatures: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use lgst_crypto::{keypair_from_seed, verify_signature};
    use lgst_types::Signature;

    fn payment_tx(sequence: u64) -> Transaction {
        Transaction {
            source: "GSOURCE".into(),
            sequence,
            fee: 100,
            time_bounds: TimeBounds {
                min_time: 0,
                max_time: 1_700_000_030,
            },
            memo: Some("rent".into()),
            operations: vec![Operation::Payment {
                destination: "GDEST".into(),
                asset: Asset {
                    code: "LGST".into(),
                    issuer: "GISSUER".into(),
                },
                amount: TokenAmount::parse("10.5").unwrap(),
            }],
        }
    }

    #[test]
    fn operations_are_tagged_snake_case() {
        let json = serde_json::to_value(payment_tx(7)).unwrap();
        assert_eq!(json["operations"][0]["type"], "payment");
        assert_eq!(json["operations"][0]["amount"], "10.5");
        assert_eq!(json["sequence"], 7);
    }

    #[test]
    fn signature_verifies_against_payload() {
        let keys = keypair_from_seed(&[5u8; 32]);
        let tx = payment_tx(1);
        let payload = tx.signing_payload(NetworkId::Testnet).unwrap();
        let signed = tx.sign(&keys, NetworkId::Testnet).unwrap();

        assert_eq!(signed.signatures.len(), 1);
        let mut sig_bytes = [0u8; 64];
        hex::decode_to_slice(&signed.signatures[0], &mut sig_bytes).unwrap();
        assert!(verify_signature(
            &payload,
            &Signature(sig_bytes),
            &keys.public
        ));
    }

    #[test]
    fn networks_produce_different_payloads() {
        let tx = payment_tx(1);
        let testnet = tx.signing_payload(NetworkId::Testnet).unwrap();
        let public = tx.signing_payload(NetworkId::Public).unwrap();
        assert_ne!(testnet, public);
    }

    #[test]
    fn sequence_changes_the_payload() {
        let a = payment_tx(1).signing_payload(NetworkId::Testnet).unwrap();
        let b = payment_tx(2).signing_payload(NetworkId::Testnet).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn envelope_roundtrips_through_json() {
        let keys = keypair_from_seed(&[5u8; 32]);
        let signed = payment_tx(3).sign(&keys, NetworkId::Testnet).unwrap();
        let json = serde_json::to_string(&signed).unwrap();
        let back: SignedTransaction = serde_json::from_str(&json).unwrap();
        assert_eq!(back, signed);
    }
}

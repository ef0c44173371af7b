//! Ledger network identifier.

use serde::{Deserialize, Serialize};

/// Which ledger network the client targets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkId {
    /// The production settlement network.
    Public,
    /// The public test network.
    #[default]
    Testnet,
}

impl NetworkId {
    /// Default horizon endpoint for this network.
    pub fn horizon_url(&self) -> &'static str {
        match self {
            Self::Public => "https://horizon.stellar.org",
            Self::Testnet => "https://horizon-testnet.stellar.org",
        }
    }

    /// Network passphrase mixed into every signing payload so transactions
    /// signed for one network are invalid on the other.
    pub fn passphrase(&self) -> &'static str {
        match self {
            Self::Public => "Public Global Stellar Network ; September 2015",
            Self::Testnet => "Test SDF Network ; September 2015",
        }
    }

    /// Human-readable name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Testnet => "testnet",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn testnet_is_default() {
        assert_eq!(NetworkId::default(), NetworkId::Testnet);
    }

    #[test]
    fn passphrases_differ_per_network() {
        assert_ne!(
            NetworkId::Public.passphrase(),
            NetworkId::Testnet.passphrase()
        );
    }

    #[test]
    fn serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&NetworkId::Testnet).unwrap(),
            "\"testnet\""
        );
        let back: NetworkId = serde_json::from_str("\"public\"").unwrap();
        assert_eq!(back, NetworkId::Public);
    }
}

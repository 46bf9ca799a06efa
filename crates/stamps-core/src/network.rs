use bitcoin::Network;

/// Supported Bitcoin networks. Trimmed from the wallet's original
/// `BtcNetwork` to drop the RPC-endpoint bookkeeping: this core performs
/// no network I/O and only needs the `bitcoin::Network` mapping for
/// change-address parsing in the assembler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BtcNetwork {
    Mainnet,
    Testnet,
    Signet,
}

impl BtcNetwork {
    /// Convert to the `bitcoin` crate's `Network` type.
    pub fn to_bitcoin_network(self) -> Network {
        match self {
            BtcNetwork::Mainnet => Network::Bitcoin,
            BtcNetwork::Testnet => Network::Testnet,
            BtcNetwork::Signet => Network::Signet,
        }
    }
}

impl std::fmt::Display for BtcNetwork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BtcNetwork::Mainnet => write!(f, "mainnet"),
            BtcNetwork::Testnet => write!(f, "testnet"),
            BtcNetwork::Signet => write!(f, "signet"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mainnet_converts_to_bitcoin_network() {
        assert_eq!(BtcNetwork::Mainnet.to_bitcoin_network(), Network::Bitcoin);
    }

    #[test]
    fn testnet_converts_to_bitcoin_network() {
        assert_eq!(BtcNetwork::Testnet.to_bitcoin_network(), Network::Testnet);
    }

    #[test]
    fn signet_converts_to_bitcoin_network() {
        assert_eq!(BtcNetwork::Signet.to_bitcoin_network(), Network::Signet);
    }

    #[test]
    fn display_names() {
        assert_eq!(BtcNetwork::Mainnet.to_string(), "mainnet");
        assert_eq!(BtcNetwork::Testnet.to_string(), "testnet");
        assert_eq!(BtcNetwork::Signet.to_string(), "signet");
    }
}

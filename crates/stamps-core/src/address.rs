//! Address parsing for the assembler's change output.
//!
//! No key derivation here: generating addresses from key material is
//! wallet-management territory and out of scope for this core. The only
//! operation needed is turning a caller-supplied `from_address` string
//! into a scriptPubKey for the network in question.

use bitcoin::address::{Address, NetworkUnchecked};
use bitcoin::ScriptBuf;

use crate::error::StampError;
use crate::network::BtcNetwork;

/// Parses `address` and returns its scriptPubKey, rejecting addresses
/// not valid for `network`.
pub fn address_to_script(address: &str, network: BtcNetwork) -> Result<ScriptBuf, StampError> {
    let parsed = address
        .parse::<Address<NetworkUnchecked>>()
        .map_err(|e| StampError::InvalidInput(format!("invalid address: {e}")))?;

    let checked = parsed
        .require_network(network.to_bitcoin_network())
        .map_err(|_| {
            StampError::InvalidInput(format!(
                "address {address} is not valid for {network}"
            ))
        })?;

    Ok(checked.script_pubkey())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_mainnet_p2wpkh_address() {
        let script =
            address_to_script("bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4", BtcNetwork::Mainnet)
                .unwrap();
        assert!(script.is_p2wpkh());
    }

    #[test]
    fn parses_known_mainnet_p2pkh_address() {
        let script =
            address_to_script("1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa", BtcNetwork::Mainnet).unwrap();
        assert!(script.is_p2pkh());
    }

    #[test]
    fn rejects_mismatched_network() {
        let result =
            address_to_script("bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4", BtcNetwork::Testnet);
        assert!(result.is_err());
    }

    #[test]
    fn rejects_garbage_address() {
        let result = address_to_script("notanaddress!!!", BtcNetwork::Mainnet);
        assert!(result.is_err());
    }
}

//! Transaction assembler.
//!
//! Stitches a selector result and an encoder's output list into an
//! unsigned `bitcoin::Transaction`: same input-building loop, same
//! version-2/RBF-sequence defaults, same change-vs-dust decision wallets
//! commonly use — this core simply never signs, since key management is
//! out of scope.

use bitcoin::absolute::LockTime;
use bitcoin::script::ScriptBuf;
use bitcoin::transaction::Version;
use bitcoin::{Amount, OutPoint, Sequence, Transaction, TxIn, TxOut, Txid, Witness};

use crate::address::address_to_script;
use crate::error::StampError;
use crate::fee;
use crate::model::{TransactionOutput, Utxo};
use crate::network::BtcNetwork;
use crate::selector::SelectionSuccess;

/// Default input sequence: RBF-signalling, one less than the
/// locktime-disabling maximum (`0xFFFFFFFF`).
pub const DEFAULT_SEQUENCE: u32 = 0xFFFFFFFD;

/// Assembles an unsigned transaction from a successful selection and the
/// encoder's output list, appending a change output at `from_address`
/// when `selection.change` clears the dust threshold for its script
/// kind.
pub fn assemble_transaction(
    selection: &SelectionSuccess,
    encoder_outputs: &[TransactionOutput],
    from_address: &str,
    network: BtcNetwork,
    fee_rate: u64,
) -> Result<Transaction, StampError> {
    if selection.inputs.is_empty() {
        return Err(StampError::InvalidInput(
            "selection has no inputs to assemble".into(),
        ));
    }

    let inputs = build_inputs(&selection.inputs)?;
    let mut outputs: Vec<TxOut> = encoder_outputs
        .iter()
        .map(|o| TxOut {
            value: Amount::from_sat(o.value),
            script_pubkey: o.script.clone(),
        })
        .collect();

    if selection.change > 0 {
        let change_script = address_to_script(from_address, network)?;
        let change_kind = crate::model::classify(&change_script);
        let dust = fee::dust_threshold(change_kind, fee_rate);
        if selection.change > dust {
            outputs.push(TxOut {
                value: Amount::from_sat(selection.change),
                script_pubkey: change_script,
            });
        }
        // Otherwise the caller's `finalize_selection` has already folded
        // the dust change into `selection.fee`; nothing to append here.
    }

    Ok(Transaction {
        version: Version::TWO,
        lock_time: LockTime::ZERO,
        input: inputs,
        output: outputs,
    })
}

fn build_inputs(utxos: &[Utxo]) -> Result<Vec<TxIn>, StampError> {
    utxos
        .iter()
        .map(|utxo| {
            let txid: Txid = utxo
                .txid
                .parse()
                .map_err(|e| StampError::InvalidInput(format!("invalid txid: {e}")))?;
            Ok(TxIn {
                previous_output: OutPoint::new(txid, utxo.vout),
                script_sig: ScriptBuf::new(),
                sequence: Sequence(DEFAULT_SEQUENCE),
                witness: Witness::default(),
            })
        })
        .collect()
}

/// The RC4 key material for a Stamp issuance: the hex txid of the first
/// assembled input, exactly as the caller's selector chose it.
pub fn rc4_key_from_first_input(selection: &SelectionSuccess) -> Result<&str, StampError> {
    selection
        .inputs
        .first()
        .map(|u| u.txid.as_str())
        .ok_or_else(|| StampError::InvalidInput("selection has no inputs".into()))
}

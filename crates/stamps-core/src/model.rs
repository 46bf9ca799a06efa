use bitcoin::ScriptBuf;

use crate::error::StampError;

/// Script kinds the fee engine and output-group selector distinguish.
///
/// `OpReturn` is never spendable and carries no dust threshold; `Unknown`
/// covers scripts the classifier cannot place (bare multisig, custom
/// scripts) and is treated conservatively wherever size matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptType {
    P2pkh,
    P2wpkh,
    P2sh,
    P2wsh,
    P2tr,
    OpReturn,
    Unknown,
}

/// Classify a scriptPubKey by its byte shape.
///
/// Uses `bitcoin::ScriptBuf`'s own predicates rather than re-deriving the
/// opcode patterns, so classification stays in lockstep with consensus
/// rules as the `bitcoin` crate updates them.
pub fn classify(script: &ScriptBuf) -> ScriptType {
    if script.is_op_return() {
        ScriptType::OpReturn
    } else if script.is_p2pkh() {
        ScriptType::P2pkh
    } else if script.is_p2wpkh() {
        ScriptType::P2wpkh
    } else if script.is_p2sh() {
        ScriptType::P2sh
    } else if script.is_p2wsh() {
        ScriptType::P2wsh
    } else if script.is_p2tr() {
        ScriptType::P2tr
    } else {
        ScriptType::Unknown
    }
}

/// An unspent transaction output available to a selector.
///
/// Identity is `(txid, vout)`; the core treats UTXOs as owned values and
/// never mutates or marks them spent — that bookkeeping belongs to the
/// caller's UTXO provider.
#[derive(Debug, Clone)]
pub struct Utxo {
    /// 64-character hex txid, display (big-endian) order.
    pub txid: String,
    pub vout: u32,
    /// Value in satoshis.
    pub value: u64,
    pub script_pubkey: ScriptBuf,
    pub address: Option<String>,
    pub confirmations: u32,
    /// Lazily derived from `script_pubkey` if not supplied by the caller.
    pub script_type: Option<ScriptType>,
}

impl Utxo {
    pub fn new(txid: impl Into<String>, vout: u32, value: u64, script_pubkey: ScriptBuf) -> Self {
        Self {
            txid: txid.into(),
            vout,
            value,
            script_pubkey,
            address: None,
            confirmations: 0,
            script_type: None,
        }
    }

    /// The script type, classifying `script_pubkey` if not already known.
    pub fn script_type(&self) -> ScriptType {
        self.script_type.unwrap_or_else(|| classify(&self.script_pubkey))
    }
}

/// A transaction output produced by an encoder or the assembler.
#[derive(Debug, Clone)]
pub struct TransactionOutput {
    pub script: ScriptBuf,
    pub value: u64,
}

impl TransactionOutput {
    /// Builds an output, rejecting the invariant violation of a nonzero
    /// value on an unspendable `OP_RETURN` carrying 0 (legal) or a
    /// zero-value non-`OP_RETURN` output (never legal).
    pub fn new(script: ScriptBuf, value: u64) -> Result<Self, StampError> {
        if value == 0 && !script.is_op_return() {
            return Err(StampError::InvalidInput(
                "zero-value output must carry an OP_RETURN script".into(),
            ));
        }
        Ok(Self { script, value })
    }

    pub fn op_return(script: ScriptBuf) -> Self {
        Self { script, value: 0 }
    }
}

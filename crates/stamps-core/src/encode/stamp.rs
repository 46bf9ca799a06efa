//! Bitcoin Stamp encoder.
//!
//! Emits the Counterparty issuance OP_RETURN followed by fake-P2WSH data
//! chunks carrying the raw payload. No compression, no optimization: the
//! payload goes on-chain byte-for-byte behind a 2-byte length header.

use crate::asset::AssetIdentifier;
use crate::encode::counterparty;
use crate::encode::p2wsh;
use crate::error::StampError;
use crate::model::TransactionOutput;

/// Hard ceiling on a Stamp payload, configurable by the caller via
/// `max_payload_bytes`; defaults to 100 000 bytes.
pub const DEFAULT_MAX_PAYLOAD_BYTES: usize = 100_000;

/// The dust value (satoshis) each fake-P2WSH chunk output carries, absent
/// caller override.
pub const DEFAULT_CHUNK_DUST_VALUE: u64 = 330;

/// Caller-supplied parameters for a single Stamp issuance.
///
/// `title`, `description`, `creator`, and `filename` are indexer-facing
/// metadata: Counterparty's on-chain issuance description is always the
/// literal `"stamp:"` string, so none of these four fields reach the
/// produced outputs. They exist so a caller building an indexer record
/// alongside the transaction has one place to carry them. `is_locked`
/// is accepted for the same reason — issuance locking is a follow-up
/// transaction this encoder does not construct.
pub struct StampOptions {
    /// The raw payload bytes to embed. Must be non-empty.
    pub payload: Vec<u8>,
    /// Asset to issue under. Must resolve to a numeric id: named assets
    /// are rejected, since minting one would burn protocol tokens this
    /// core has no way to account for.
    pub asset: AssetIdentifier,
    /// Quantity of the asset to issue. Defaults to 1 at the call site if
    /// the caller has no preference.
    pub supply: u64,
    /// First selected input's txid, as the 64-character hex string used
    /// literally as the RC4 key.
    pub rc4_key_txid_hex: String,
    /// Ceiling on `payload.len()`, unless `skip_validation` is set.
    pub max_payload_bytes: usize,
    /// Skips the payload-size ceiling check when `true`.
    pub skip_validation: bool,
    /// Value each fake-P2WSH chunk output carries.
    pub chunk_dust_value: u64,
    /// Indexer-facing title. Not encoded on-chain.
    pub title: Option<String>,
    /// Indexer-facing description. Not encoded on-chain — the
    /// Counterparty issuance description is always `"stamp:"`.
    pub description: Option<String>,
    /// Indexer-facing creator attribution. Not encoded on-chain.
    pub creator: Option<String>,
    /// Indexer-facing original filename. Not encoded on-chain.
    pub filename: Option<String>,
    /// Whether the asset should be locked against further issuance.
    /// Carried through for indexers; locking itself is a separate
    /// transaction outside this encoder's scope.
    pub is_locked: bool,
}

impl StampOptions {
    pub fn new(payload: Vec<u8>, asset: AssetIdentifier, rc4_key_txid_hex: String) -> Self {
        Self {
            payload,
            asset,
            supply: 1,
            rc4_key_txid_hex,
            max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
            skip_validation: false,
            chunk_dust_value: DEFAULT_CHUNK_DUST_VALUE,
            title: None,
            description: None,
            creator: None,
            filename: None,
            is_locked: true,
        }
    }
}

/// Encodes a Stamp issuance, returning the ordered output list: the
/// Counterparty OP_RETURN first, then the fake-P2WSH chunks in payload
/// order.
pub fn encode_stamp(options: &StampOptions) -> Result<Vec<TransactionOutput>, StampError> {
    if options.payload.is_empty() {
        return Err(StampError::InvalidInput(
            "stamp payload must not be empty".into(),
        ));
    }
    if !options.skip_validation && options.payload.len() > options.max_payload_bytes {
        return Err(StampError::SizeExceeded {
            limit: options.max_payload_bytes,
            actual: options.payload.len(),
            context: "stamp payload".into(),
        });
    }
    if options.asset.is_named() {
        return Err(StampError::InvalidInput(
            "stamp issuance requires a numeric asset id, not a named asset".into(),
        ));
    }

    let asset_id = options.asset.numeric_id_for_issuance()?;
    let issuance_script = counterparty::build_issuance_output(
        asset_id,
        options.supply,
        &options.rc4_key_txid_hex,
    )?;

    let mut outputs = Vec::with_capacity(1 + options.payload.len() / 32 + 2);
    outputs.push(TransactionOutput::op_return(issuance_script));

    let length_byte = (options.payload.len() % 256) as u8;
    let mut prefixed = Vec::with_capacity(2 + options.payload.len());
    prefixed.push(0x00);
    prefixed.push(length_byte);
    prefixed.extend_from_slice(&options.payload);

    for chunk in p2wsh::chunk(&prefixed) {
        let script = p2wsh::fake_p2wsh_script(&chunk);
        outputs.push(TransactionOutput::new(script, options.chunk_dust_value)?);
    }

    Ok(outputs)
}

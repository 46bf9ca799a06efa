//! Counterparty asset identifiers (CPIDs).
//!
//! Accepts the three shapes the Counterparty protocol recognizes: a
//! numeric asset (`A<decimal>`), a named asset (`[B-Z][A-Z0-9]{0,12}`),
//! and a sub-asset (`A<decimal>.<1-13 A-Z0-9>`). Stamp issuance only ever
//! encodes the numeric form; named assets are parsed and validated here
//! but rejected by the Stamp encoder because minting one would burn
//! protocol tokens the core has no way to account for.

use sha2::{Digest, Sha256};

use crate::error::StampError;

const MAX_NUMERIC_ASSET_ID: u64 = u64::MAX; // inclusive upper bound, [1, 2^64 - 1]

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetIdentifier {
    /// `A<decimal>`, numeric id in `[1, 2^64 - 1]`.
    Numeric(u64),
    /// `[B-Z][A-Z0-9]{0,12}`, a named asset. Valid for general use, but
    /// rejected by the Stamp issuance flow.
    Named(String),
    /// `A<decimal>.<sub>`; `parent` is the numeric id that encoding uses,
    /// `sub` is the sub-asset suffix.
    SubAsset { parent: u64, sub: String },
}

impl AssetIdentifier {
    /// Parses any of the three CPID shapes, normalizing input to
    /// uppercase before matching (per the grammar's case-insensitivity).
    pub fn parse(raw: &str) -> Result<Self, StampError> {
        let upper = raw.to_ascii_uppercase();
        if upper.is_empty() {
            return Err(StampError::InvalidInput("empty asset identifier".into()));
        }

        if let Some(rest) = upper.strip_prefix('A') {
            if let Some((num_part, sub_part)) = rest.split_once('.') {
                let parent = parse_numeric_id(num_part)?;
                validate_sub_asset_suffix(sub_part)?;
                return Ok(AssetIdentifier::SubAsset {
                    parent,
                    sub: sub_part.to_string(),
                });
            }
            if !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()) {
                let id = parse_numeric_id(rest)?;
                return Ok(AssetIdentifier::Numeric(id));
            }
        }

        validate_named_asset(&upper)?;
        Ok(AssetIdentifier::Named(upper))
    }

    /// The numeric id an on-chain Counterparty issuance message encodes
    /// for this asset.
    ///
    /// Sub-assets use only the parent's numeric id — a documented
    /// simplification: full sub-asset compatibility
    /// would require extending the wire layout and is out of scope here.
    pub fn numeric_id_for_issuance(&self) -> Result<u64, StampError> {
        match self {
            AssetIdentifier::Numeric(id) => Ok(*id),
            AssetIdentifier::SubAsset { parent, .. } => Ok(*parent),
            AssetIdentifier::Named(name) => Ok(hash_to_numeric_id(name)),
        }
    }

    /// `true` for named assets, which the Stamp issuance flow rejects.
    pub fn is_named(&self) -> bool {
        matches!(self, AssetIdentifier::Named(_))
    }
}

fn parse_numeric_id(digits: &str) -> Result<u64, StampError> {
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(StampError::InvalidInput(format!(
            "invalid numeric asset id: {digits}"
        )));
    }
    let id: u128 = digits
        .parse()
        .map_err(|_| StampError::InvalidInput(format!("asset id overflow: {digits}")))?;
    if id == 0 || id > MAX_NUMERIC_ASSET_ID as u128 {
        return Err(StampError::InvalidInput(format!(
            "numeric asset id {id} out of range [1, 2^64-1]"
        )));
    }
    Ok(id as u64)
}

fn validate_sub_asset_suffix(sub: &str) -> Result<(), StampError> {
    if sub.is_empty() || sub.len() > 13 {
        return Err(StampError::InvalidInput(format!(
            "sub-asset suffix must be 1-13 characters, got {}",
            sub.len()
        )));
    }
    if !sub.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(StampError::InvalidInput(
            "sub-asset suffix must be A-Z0-9".into(),
        ));
    }
    Ok(())
}

fn validate_named_asset(name: &str) -> Result<(), StampError> {
    if name.len() > 13 {
        return Err(StampError::InvalidInput(format!(
            "named asset must be at most 13 characters, got {}",
            name.len()
        )));
    }
    let mut chars = name.chars();
    let first = chars
        .next()
        .ok_or_else(|| StampError::InvalidInput("empty asset identifier".into()))?;
    if !('B'..='Z').contains(&first) {
        return Err(StampError::InvalidInput(format!(
            "named asset must start with B-Z, got '{first}'"
        )));
    }
    if !chars.all(|c| c.is_ascii_alphanumeric()) {
        return Err(StampError::InvalidInput(
            "named asset must be A-Z0-9 after the first character".into(),
        ));
    }
    Ok(())
}

/// Test-only fallback for non-numeric text: production callers always
/// supply a numeric id. Hashes via SHA-256 and takes the first 8
/// big-endian bytes modulo 2^64.
fn hash_to_numeric_id(text: &str) -> u64 {
    let digest = Sha256::digest(text.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(bytes)
}

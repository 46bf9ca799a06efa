//! SRC-20 encoder.
//!
//! Serializes a tagged SRC-20 operation to canonical JSON, frames it
//! behind a `stamp:` prefix and a 2-byte length header, then splits the
//! framed buffer across standard P2WSH outputs via the shared chunking
//! primitive.

use std::str::FromStr;

use bigdecimal::BigDecimal;
use serde::Serialize;

use crate::encode::p2wsh;
use crate::error::StampError;
use crate::model::TransactionOutput;

/// Minimum value (satoshis) every SRC-20 P2WSH chunk output must carry,
/// per protocol convention.
pub const SRC20_MIN_OUTPUT_VALUE: u64 = 500_000;

/// Ticker length bounds: 1-5 characters.
const TICK_MIN_LEN: usize = 1;
const TICK_MAX_LEN: usize = 5;

/// A tagged SRC-20 operation. Numeric fields are caller-supplied decimal
/// strings (arbitrary precision) rather than floats, so values never pass
/// through an IEEE-754 round trip before being normalized.
pub enum Src20Operation {
    Deploy {
        tick: String,
        max: String,
        lim: String,
        dec: u8,
    },
    Mint {
        tick: String,
        amt: String,
    },
    Transfer {
        tick: String,
        amt: String,
    },
}

/// Canonical DEPLOY JSON shape: `{"p","op","tick","max","lim","dec"}`, in
/// this exact field order.
#[derive(Serialize)]
struct DeployJson<'a> {
    p: &'static str,
    op: &'static str,
    tick: &'a str,
    max: String,
    lim: String,
    dec: u8,
}

/// Canonical MINT/TRANSFER JSON shape: `{"p","op","tick","amt"}`.
#[derive(Serialize)]
struct AmountJson<'a> {
    p: &'static str,
    op: &'static str,
    tick: &'a str,
    amt: String,
}

fn validate_tick(tick: &str) -> Result<String, StampError> {
    let upper = tick.to_ascii_uppercase();
    if upper.len() < TICK_MIN_LEN || upper.len() > TICK_MAX_LEN {
        return Err(StampError::InvalidInput(format!(
            "tick must be {}-{} characters, got {}",
            TICK_MIN_LEN,
            TICK_MAX_LEN,
            upper.len()
        )));
    }
    if !upper.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(StampError::InvalidInput(
            "tick must be alphanumeric".into(),
        ));
    }
    Ok(upper)
}

/// Normalizes a caller-supplied decimal string: parses as an
/// arbitrary-precision `BigDecimal`, rejects negatives, and trims
/// trailing fractional zeros (a pure-integer value carries no decimal
/// point).
fn normalize_decimal(raw: &str, field: &str) -> Result<String, StampError> {
    let value = BigDecimal::from_str(raw)
        .map_err(|_| StampError::InvalidInput(format!("{field} is not a valid decimal: {raw}")))?;
    if value < BigDecimal::from(0) {
        return Err(StampError::InvalidInput(format!(
            "{field} must be non-negative, got {raw}"
        )));
    }
    Ok(value.normalized().to_string())
}

/// Validates the operation and serializes it to the canonical JSON
/// representation the protocol expects.
fn to_canonical_json(operation: &Src20Operation) -> Result<(String, String), StampError> {
    match operation {
        Src20Operation::Deploy { tick, max, lim, dec } => {
            let tick = validate_tick(tick)?;
            let max = normalize_decimal(max, "max")?;
            let lim = normalize_decimal(lim, "lim")?;
            if *dec > 18 {
                return Err(StampError::InvalidInput(format!(
                    "dec must be 0-18, got {dec}"
                )));
            }
            let payload = DeployJson {
                p: "SRC-20",
                op: "DEPLOY",
                tick: &tick,
                max,
                lim,
                dec: *dec,
            };
            let json = serde_json::to_string(&payload)
                .map_err(|e| StampError::EncodingError(e.to_string()))?;
            Ok((tick, json))
        }
        Src20Operation::Mint { tick, amt } => {
            let tick = validate_tick(tick)?;
            let amt = normalize_decimal(amt, "amt")?;
            if amt == "0" {
                return Err(StampError::InvalidInput("MINT amt must not be 0".into()));
            }
            let payload = AmountJson {
                p: "SRC-20",
                op: "MINT",
                tick: &tick,
                amt,
            };
            let json = serde_json::to_string(&payload)
                .map_err(|e| StampError::EncodingError(e.to_string()))?;
            Ok((tick, json))
        }
        Src20Operation::Transfer { tick, amt } => {
            let tick = validate_tick(tick)?;
            let amt = normalize_decimal(amt, "amt")?;
            if amt == "0" {
                return Err(StampError::InvalidInput("TRANSFER amt must not be 0".into()));
            }
            let payload = AmountJson {
                p: "SRC-20",
                op: "TRANSFER",
                tick: &tick,
                amt,
            };
            let json = serde_json::to_string(&payload)
                .map_err(|e| StampError::EncodingError(e.to_string()))?;
            Ok((tick, json))
        }
    }
}

/// Encodes an SRC-20 operation, returning the ordered list of standard
/// P2WSH chunk outputs, each carrying at least `SRC20_MIN_OUTPUT_VALUE`.
pub fn encode_src20(
    operation: &Src20Operation,
) -> Result<Vec<TransactionOutput>, StampError> {
    let (_tick, json) = to_canonical_json(operation)?;

    let mut payload = Vec::with_capacity(6 + json.len());
    payload.extend_from_slice(b"stamp:");
    payload.extend_from_slice(json.as_bytes());

    let length = u16::try_from(payload.len())
        .map_err(|_| StampError::SizeExceeded {
            limit: u16::MAX as usize,
            actual: payload.len(),
            context: "SRC-20 framed payload".into(),
        })?;

    let mut framed = Vec::with_capacity(2 + payload.len());
    framed.extend_from_slice(&length.to_be_bytes());
    framed.extend_from_slice(&payload);

    p2wsh::chunk(&framed)
        .into_iter()
        .map(|chunk| {
            let witness_script = p2wsh::src20_witness_script(&chunk);
            let output_script = p2wsh::standard_p2wsh_script(&witness_script);
            TransactionOutput::new(output_script, SRC20_MIN_OUTPUT_VALUE)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deploy_json_has_fixed_field_order() {
        let operation = Src20Operation::Deploy {
            tick: "kevin".into(),
            max: "21000000".into(),
            lim: "1000".into(),
            dec: 18,
        };
        let (tick, json) = to_canonical_json(&operation).unwrap();
        assert_eq!(tick, "KEVIN");
        assert_eq!(
            json,
            r#"{"p":"SRC-20","op":"DEPLOY","tick":"KEVIN","max":"21000000","lim":"1000","dec":18}"#
        );
    }

    #[test]
    fn mint_json_has_fixed_field_order() {
        let operation = Src20Operation::Mint {
            tick: "kevin".into(),
            amt: "1000".into(),
        };
        let (_, json) = to_canonical_json(&operation).unwrap();
        assert_eq!(
            json,
            r#"{"p":"SRC-20","op":"MINT","tick":"KEVIN","amt":"1000"}"#
        );
    }

    #[test]
    fn transfer_json_has_fixed_field_order() {
        let operation = Src20Operation::Transfer {
            tick: "kevin".into(),
            amt: "500".into(),
        };
        let (_, json) = to_canonical_json(&operation).unwrap();
        assert_eq!(
            json,
            r#"{"p":"SRC-20","op":"TRANSFER","tick":"KEVIN","amt":"500"}"#
        );
    }

    #[test]
    fn normalize_decimal_trims_trailing_zeros() {
        assert_eq!(normalize_decimal("100.50000", "amt").unwrap(), "100.5");
        assert_eq!(normalize_decimal("100.00000", "amt").unwrap(), "100");
    }

    #[test]
    fn normalize_decimal_rejects_negative() {
        assert!(normalize_decimal("-5", "amt").is_err());
    }

    #[test]
    fn normalize_decimal_rejects_garbage() {
        assert!(normalize_decimal("not-a-number", "amt").is_err());
    }

    #[test]
    fn rejects_mint_with_zero_amount() {
        let operation = Src20Operation::Mint {
            tick: "kevin".into(),
            amt: "0".into(),
        };
        assert!(matches!(
            to_canonical_json(&operation),
            Err(StampError::InvalidInput(_))
        ));
    }

    #[test]
    fn rejects_transfer_with_zero_amount() {
        let operation = Src20Operation::Transfer {
            tick: "kevin".into(),
            amt: "0.0".into(),
        };
        assert!(matches!(
            to_canonical_json(&operation),
            Err(StampError::InvalidInput(_))
        ));
    }

    #[test]
    fn rejects_tick_too_long() {
        let operation = Src20Operation::Mint {
            tick: "toolong".into(),
            amt: "1".into(),
        };
        assert!(to_canonical_json(&operation).is_err());
    }

    #[test]
    fn rejects_dec_above_18() {
        let operation = Src20Operation::Deploy {
            tick: "abcde".into(),
            max: "1000".into(),
            lim: "10".into(),
            dec: 19,
        };
        assert!(to_canonical_json(&operation).is_err());
    }

    #[test]
    fn encode_src20_outputs_carry_minimum_value() {
        let operation = Src20Operation::Mint {
            tick: "kevin".into(),
            amt: "1000".into(),
        };
        let outputs = encode_src20(&operation).unwrap();
        assert!(!outputs.is_empty());
        for output in &outputs {
            assert_eq!(output.value, SRC20_MIN_OUTPUT_VALUE);
        }
    }

    #[test]
    fn encode_src20_framing_has_two_byte_length_header() {
        let operation = Src20Operation::Mint {
            tick: "kevin".into(),
            amt: "1000".into(),
        };
        let (_, json) = to_canonical_json(&operation).unwrap();
        let expected_payload_len = 6 + json.len(); // "stamp:" + json
        let outputs = encode_src20(&operation).unwrap();
        // Reconstruct the framed buffer from the witness scripts' chunks
        // is indirect (they're hashed); instead check chunk count matches
        // the expected framed length, accounting for zero-padding.
        let framed_len = 2 + expected_payload_len;
        let expected_chunks = framed_len.div_ceil(32);
        assert_eq!(outputs.len(), expected_chunks);
    }

    #[test]
    fn deploy_scenario_matches_spec_example_shape() {
        let operation = Src20Operation::Deploy {
            tick: "kevin".into(),
            max: "21000000".into(),
            lim: "1000".into(),
            dec: 18,
        };
        let outputs = encode_src20(&operation).unwrap();
        assert!(!outputs.is_empty());
    }
}

//! Virtual-size, fee, dust-threshold, RBF-bump, and CPFP calculations.
//!
//! All figures are per-component averages from a fixed virtual-size
//! table, not a byte-for-byte weight simulation of a signed
//! transaction — the core never signs, so exact witness sizes are
//! estimates keyed by script kind.

use crate::model::ScriptType;

/// Fixed transaction overhead: version (4) + input count (1-3) +
/// output count (1-3) + locktime (4), segwit marker/flag folded in.
pub const TX_OVERHEAD_VBYTES: u64 = 10;

/// Non-witness ("base") input vbytes, keyed by the script kind being spent.
pub fn input_base_vbytes(kind: ScriptType) -> u64 {
    match kind {
        ScriptType::P2pkh => 148,
        ScriptType::P2wpkh => 41,
        ScriptType::P2sh => 91,
        ScriptType::P2wsh => 41,
        ScriptType::P2tr => 57,
        ScriptType::OpReturn | ScriptType::Unknown => 91,
    }
}

/// Witness vbytes (already divided by the 1/4 weight discount) for
/// spending the given script kind. Zero for legacy (non-segwit) kinds.
pub fn input_witness_vbytes(kind: ScriptType) -> u64 {
    match kind {
        ScriptType::P2pkh => 0,
        ScriptType::P2wpkh => 27,
        ScriptType::P2sh => 27, // wrapped segwit: treat as P2WPKH-in-P2SH by default
        ScriptType::P2wsh => 27,
        ScriptType::P2tr => 16,
        ScriptType::OpReturn | ScriptType::Unknown => 0,
    }
}

/// Total estimated vbytes to spend one input of the given kind.
pub fn input_vsize(kind: ScriptType) -> u64 {
    input_base_vbytes(kind) + input_witness_vbytes(kind)
}

/// Output vbytes for the given script kind. For `OpReturn`, `script_len`
/// is the full output script length (`8 + 1 + script_len`).
pub fn output_vsize(kind: ScriptType, script_len: usize) -> u64 {
    match kind {
        ScriptType::P2pkh => 34,
        ScriptType::P2wpkh => 31,
        ScriptType::P2sh => 32,
        ScriptType::P2wsh => 43,
        ScriptType::P2tr => 43,
        ScriptType::OpReturn => 8 + 1 + script_len as u64,
        ScriptType::Unknown => 8 + script_len as u64,
    }
}

/// Estimated transaction virtual size given the input kinds and output
/// (kind, script_len) pairs. `vsize = overhead + Σ input_vsize + Σ output_vsize`.
pub fn estimate_vsize(inputs: &[ScriptType], outputs: &[(ScriptType, usize)]) -> u64 {
    let input_total: u64 = inputs.iter().map(|k| input_vsize(*k)).sum();
    let output_total: u64 = outputs.iter().map(|(k, len)| output_vsize(*k, *len)).sum();
    TX_OVERHEAD_VBYTES + input_total + output_total
}

/// `fee = ceil(vsize * fee_rate)`, fee_rate in sat/vbyte.
pub fn calculate_fee(vsize: u64, fee_rate_sat_vbyte: u64) -> u64 {
    vsize.saturating_mul(fee_rate_sat_vbyte)
}

/// Per-kind base dust value, satoshis.
pub fn base_dust(kind: ScriptType) -> u64 {
    match kind {
        ScriptType::P2pkh => 546,
        ScriptType::P2wpkh => 294,
        ScriptType::P2sh => 540,
        ScriptType::P2wsh => 330,
        ScriptType::P2tr => 330,
        ScriptType::OpReturn => 0,
        ScriptType::Unknown => 546,
    }
}

/// Hard cap on any dust threshold regardless of fee rate, satoshis.
pub const DUST_HARD_CAP: u64 = 5_000;

/// Dynamic dust threshold for an output of `kind`:
/// `max(base_dust, (output_size + spend_input_vsize) * relay_fee_rate)`,
/// capped at `DUST_HARD_CAP`.
pub fn dust_threshold(kind: ScriptType, relay_fee_rate_sat_vbyte: u64) -> u64 {
    let spend_cost = (output_vsize(kind, 0) + input_vsize(kind)) * relay_fee_rate_sat_vbyte;
    base_dust(kind).max(spend_cost).min(DUST_HARD_CAP)
}

/// Priority tiers for an RBF fee bump: nearer confirmation targets get a
/// higher target fee rate multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RbfPriority {
    /// Next block.
    High,
    /// Within a few blocks.
    Medium,
    /// No particular urgency, but still above the floor required to
    /// replace the original transaction.
    Low,
}

impl RbfPriority {
    fn multiplier(self) -> f64 {
        match self {
            RbfPriority::High => 1.5,
            RbfPriority::Medium => 1.2,
            RbfPriority::Low => 1.05,
        }
    }
}

/// Computes a replacement fee for an RBF bump.
///
/// `max(original_fee + vsize, vsize * target_fee_rate)`, scaled by the
/// priority multiplier, plus a fixed 5% buffer.
pub fn rbf_bump_fee(
    original_fee: u64,
    vsize: u64,
    target_fee_rate_sat_vbyte: u64,
    priority: RbfPriority,
) -> u64 {
    let floor = original_fee + vsize; // BIP 125 minimum: +1 sat/vbyte over original
    let target = vsize.saturating_mul(target_fee_rate_sat_vbyte);
    let base = floor.max(target);
    let scaled = (base as f64) * priority.multiplier();
    (scaled * 1.05).ceil() as u64
}

/// Computes the child transaction's fee for a CPFP bump:
/// `max((parent_vsize + child_vsize) * target_fee_rate - parent_fee, child_vsize)`.
pub fn cpfp_child_fee(
    parent_vsize: u64,
    parent_fee: u64,
    child_vsize: u64,
    target_fee_rate_sat_vbyte: u64,
) -> u64 {
    let combined_target = (parent_vsize + child_vsize).saturating_mul(target_fee_rate_sat_vbyte);
    combined_target.saturating_sub(parent_fee).max(child_vsize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_vsize_matches_table() {
        assert_eq!(input_vsize(ScriptType::P2pkh), 148);
        assert_eq!(input_vsize(ScriptType::P2wpkh), 68);
        assert_eq!(input_vsize(ScriptType::P2tr), 73);
    }

    #[test]
    fn estimate_vsize_matches_scenario_4() {
        // 1 P2wpkh input, 2 P2wsh outputs (recipient-shaped stamp chunk)
        // + a P2wpkh change output.
        let inputs = [ScriptType::P2wpkh];
        let outputs = [
            (ScriptType::P2wsh, 34),
            (ScriptType::P2wsh, 34),
            (ScriptType::P2wpkh, 0),
        ];
        let vsize = estimate_vsize(&inputs, &outputs);
        assert_eq!(vsize, 10 + 68 + 43 + 43 + 31);
    }

    #[test]
    fn calculate_fee_rounds_up_via_saturating_mul() {
        assert_eq!(calculate_fee(141, 1), 141);
        assert_eq!(calculate_fee(100, 15), 1500);
    }

    #[test]
    fn dust_threshold_never_exceeds_hard_cap() {
        let dust = dust_threshold(ScriptType::P2pkh, 100_000);
        assert_eq!(dust, DUST_HARD_CAP);
    }

    #[test]
    fn dust_threshold_defaults_to_base_at_low_fee_rate() {
        assert_eq!(dust_threshold(ScriptType::P2wsh, 1), base_dust(ScriptType::P2wsh));
    }

    #[test]
    fn rbf_bump_respects_floor_over_low_target_rate() {
        let bumped = rbf_bump_fee(1000, 200, 1, RbfPriority::Low);
        // floor = 1000 + 200 = 1200; target = 200; base = 1200.
        // scaled = 1200 * 1.05 * 1.05 = 1323.0
        assert_eq!(bumped, 1323);
    }

    #[test]
    fn rbf_bump_uses_target_rate_when_higher() {
        let bumped = rbf_bump_fee(100, 200, 50, RbfPriority::High);
        // floor = 300; target = 10000; base = 10000; scaled = 10000*1.5*1.05=15750
        assert_eq!(bumped, 15750);
    }

    #[test]
    fn rbf_bump_priority_ordering() {
        let low = rbf_bump_fee(1000, 500, 10, RbfPriority::Low);
        let medium = rbf_bump_fee(1000, 500, 10, RbfPriority::Medium);
        let high = rbf_bump_fee(1000, 500, 10, RbfPriority::High);
        assert!(low < medium);
        assert!(medium < high);
    }

    #[test]
    fn cpfp_fee_covers_both_transactions() {
        let child_fee = cpfp_child_fee(200, 50, 150, 20);
        // combined target = 350*20=7000; 7000-50=6950, max(6950,150)=6950
        assert_eq!(child_fee, 6950);
    }

    #[test]
    fn cpfp_fee_floors_at_child_vsize() {
        // Parent already overpaid: target fee below its own fee.
        let child_fee = cpfp_child_fee(200, 100_000, 150, 1);
        assert_eq!(child_fee, 150);
    }
}

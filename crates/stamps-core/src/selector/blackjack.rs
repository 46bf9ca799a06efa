//! Blackjack selector: seeks an exact-ish match so the transaction needs
//! no change output, preferring the smallest input combinations.
//!
//! Tries every single UTXO, then every pair, accepting the first whose
//! sum lands in `[target + fee, target + fee + tolerance]`. Bounded to
//! pairs (not full subset search) since single/pair combinations cover
//! the overwhelming majority of real wallets' change-avoidance hits;
//! branch-and-bound below covers the deeper search.

use crate::model::{ScriptType, Utxo};

use super::{finalize_selection, FailureReason, SelectionOptions, SelectionResult};

/// Absolute tolerance (satoshis) above `target + fee` blackjack will
/// still accept without emitting a change output.
const TOLERANCE: u64 = 1_000;

fn fee_for(count: usize, fee_rate: u64, output_kinds: &[(ScriptType, usize)]) -> u64 {
    let kinds = vec![ScriptType::P2wpkh; count];
    let vsize = crate::fee::estimate_vsize(&kinds, output_kinds);
    crate::fee::calculate_fee(vsize, fee_rate)
}

/// `output_kinds` is the encoder's real non-change output list, folded
/// into the fee each candidate sum is measured against.
pub fn select(
    eligible: &[Utxo],
    options: &SelectionOptions,
    output_kinds: &[(ScriptType, usize)],
) -> SelectionResult {
    let mut sorted: Vec<Utxo> = eligible.to_vec();
    sorted.sort_by(|a, b| a.value.cmp(&b.value));

    // Single-UTXO pass.
    for utxo in &sorted {
        let fee = fee_for(1, options.fee_rate, output_kinds);
        let lower = options.target_value + fee;
        let upper = lower + TOLERANCE;
        if utxo.value >= lower && utxo.value <= upper {
            return finalize_selection(vec![utxo.clone()], options, output_kinds, ScriptType::P2wpkh);
        }
    }

    // Pair pass.
    if options.max_inputs >= 2 {
        for i in 0..sorted.len() {
            for j in (i + 1)..sorted.len() {
                let sum = sorted[i].value + sorted[j].value;
                let fee = fee_for(2, options.fee_rate, output_kinds);
                let lower = options.target_value + fee;
                let upper = lower + TOLERANCE;
                if sum >= lower && sum <= upper {
                    return finalize_selection(
                        vec![sorted[i].clone(), sorted[j].clone()],
                        options,
                        output_kinds,
                        ScriptType::P2wpkh,
                    );
                }
            }
        }
    }

    SelectionResult::failure(
        FailureReason::NoSolutionFound,
        "no single or pair combination within blackjack tolerance",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitcoin::ScriptBuf;

    fn p2wpkh_script() -> ScriptBuf {
        ScriptBuf::from_hex(&format!("0014{}", "ab".repeat(20))).unwrap()
    }

    fn utxo(txid: &str, value: u64) -> Utxo {
        let mut u = Utxo::new(txid, 0, value, p2wpkh_script());
        u.confirmations = 6;
        u
    }

    fn options(target: u64) -> SelectionOptions {
        SelectionOptions {
            target_value: target,
            fee_rate: 1,
            dust_threshold: 1_000,
            max_inputs: 10,
            min_confirmations: 0,
            consolidate: false,
        }
    }

    #[test]
    fn finds_exact_single_match() {
        let fee = fee_for(1, 1, &[]);
        let utxos = vec![utxo(&"a".repeat(64), 50_000 + fee)];
        let result = select(&utxos, &options(50_000), &[]);
        match result {
            SelectionResult::Success(s) => {
                assert_eq!(s.input_count, 1);
                assert_eq!(s.change, 0);
            }
            SelectionResult::Failure(f) => panic!("unexpected failure: {}", f.message),
        }
    }

    #[test]
    fn finds_pair_match_when_no_single_fits() {
        let fee = fee_for(2, 1, &[]);
        let utxos = vec![
            utxo(&"a".repeat(64), 20_000),
            utxo(&"b".repeat(64), 30_000 + fee),
        ];
        let result = select(&utxos, &options(50_000), &[]);
        match result {
            SelectionResult::Success(s) => assert_eq!(s.input_count, 2),
            SelectionResult::Failure(f) => panic!("unexpected failure: {}", f.message),
        }
    }

    #[test]
    fn fails_when_nothing_within_tolerance() {
        let utxos = vec![utxo(&"a".repeat(64), 1_000_000)];
        let result = select(&utxos, &options(50_000), &[]);
        assert!(matches!(result, SelectionResult::Failure(_)));
    }

    #[test]
    fn accounts_for_real_output_kinds_in_fee() {
        let stamp_outputs = [(ScriptType::OpReturn, 31), (ScriptType::P2wsh, 34)];
        assert!(fee_for(1, 1, &stamp_outputs) > fee_for(1, 1, &[]));
    }
}

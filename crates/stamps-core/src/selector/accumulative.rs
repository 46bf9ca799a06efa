//! Accumulative selector: sort by value, add until the target is
//! covered, stop. The simplest strategy, preferred for small UTXO sets.
//!
//! Largest-first greedy accumulation, re-checking the running fee as
//! inputs are added, with an oldest-first ordering available via the
//! `fifo` flag for callers who'd rather spend aging UTXOs first.
//! `SelectionOptions::consolidate` makes the strategy keep absorbing
//! eligible UTXOs past the point the target is already covered, up to
//! `max_inputs`, trading a larger transaction for a smaller wallet UTXO
//! set afterward.

use crate::model::{ScriptType, Utxo};

use super::{finalize_selection, FailureReason, SelectionOptions, SelectionResult};

/// Runs the accumulative strategy. `fifo` sorts ascending by
/// confirmations instead of descending by value. `output_kinds` is the
/// encoder's real non-change output list, fed into every fee estimate so
/// the running "have we covered target plus fee" check reflects what the
/// transaction is actually paying for.
pub fn select(
    eligible: &[Utxo],
    options: &SelectionOptions,
    fifo: bool,
    output_kinds: &[(ScriptType, usize)],
) -> SelectionResult {
    let mut sorted: Vec<Utxo> = eligible.to_vec();
    if fifo {
        sorted.sort_by(|a, b| a.confirmations.cmp(&b.confirmations));
    } else {
        sorted.sort_by(|a, b| b.value.cmp(&a.value));
    }

    let total_eligible: u64 = sorted.iter().map(|u| u.value).sum();
    if total_eligible < options.target_value {
        return SelectionResult::failure(
            FailureReason::InsufficientFunds,
            format!(
                "eligible UTXOs sum to {} sat, target is {} sat",
                total_eligible, options.target_value
            ),
        );
    }

    let mut chosen: Vec<Utxo> = Vec::new();
    let mut covered = false;
    for utxo in sorted {
        if chosen.len() >= options.max_inputs {
            break;
        }
        chosen.push(utxo);

        let input_kinds: Vec<ScriptType> = chosen.iter().map(|u| u.script_type()).collect();
        let vsize = crate::fee::estimate_vsize(&input_kinds, output_kinds);
        let fee = crate::fee::calculate_fee(vsize, options.fee_rate);
        let total: u64 = chosen.iter().map(|u| u.value).sum();
        if total >= options.target_value + fee {
            if !options.consolidate {
                return finalize_selection(chosen, options, output_kinds, ScriptType::P2wpkh);
            }
            // Target is already covered; `consolidate` keeps sweeping in
            // the remaining eligible UTXOs up to max_inputs, shrinking
            // the wallet's UTXO set at the cost of a larger transaction.
            covered = true;
        }
    }

    if covered {
        return finalize_selection(chosen, options, output_kinds, ScriptType::P2wpkh);
    }

    SelectionResult::failure(
        FailureReason::InsufficientFunds,
        "accumulative selection could not cover target plus fee within max_inputs",
    )
}

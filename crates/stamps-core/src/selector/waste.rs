//! Waste-optimized selector and the shared waste metric.
//!
//! `waste = change_output_cost + excess_over_target + sum(per_input_cost)`.
//! The metric is exposed standalone so
//! branch-and-bound can rank candidates during its own search, and the
//! `WasteOptimized` selector reuses it to pick among several other
//! selectors' results.

use crate::fee;
use crate::model::{ScriptType, Utxo};

use super::{accumulative, blackjack, branch_and_bound, FailureReason, SelectionOptions, SelectionResult};

/// `change_output_cost` assumes a P2WPKH change output, the core's
/// default change script kind absent caller override.
const CHANGE_OUTPUT_KIND: ScriptType = ScriptType::P2wpkh;

/// Computes the waste metric for a candidate input set.
///
/// `fee` is the fee actually charged for this candidate; `change` is its
/// resulting change value (0 if absorbed or changeless); `target` is the
/// caller's target value, used to derive the excess paid over it.
pub fn waste(inputs: &[Utxo], fee_rate: u64, change: u64, fee: u64, target: u64) -> i64 {
    let change_output_cost = if change > 0 {
        fee::output_vsize(CHANGE_OUTPUT_KIND, 0) * fee_rate
    } else {
        0
    };

    let total_value: u64 = inputs.iter().map(|u| u.value).sum();
    let excess_over_target = total_value.saturating_sub(target).saturating_sub(fee);

    let input_cost: u64 = inputs
        .iter()
        .map(|u| fee::input_vsize(u.script_type()) * fee_rate)
        .sum();

    (change_output_cost + excess_over_target + input_cost) as i64
}

/// Runs accumulative, blackjack, and branch-and-bound, returning the
/// lowest-waste `Success` among them. Ignores the `Knapsack` and
/// `OutputGroup` strategies for this pass: the former's randomness and
/// the latter's privacy framing are not wastage-comparable on the same
/// footing as the deterministic strategies.
pub fn select(
    eligible: &[Utxo],
    options: &SelectionOptions,
    output_kinds: &[(ScriptType, usize)],
) -> SelectionResult {
    let candidates = [
        accumulative::select(eligible, options, false, output_kinds),
        blackjack::select(eligible, options, output_kinds),
        branch_and_bound::select(eligible, options, output_kinds),
    ];

    let best = candidates
        .into_iter()
        .filter_map(|result| match result {
            SelectionResult::Success(success) => Some(success),
            SelectionResult::Failure(_) => None,
        })
        .min_by_key(|success| success.waste_metric);

    match best {
        Some(success) => SelectionResult::Success(success),
        None => SelectionResult::failure(
            FailureReason::SelectionFailed,
            "no underlying selector produced a usable result",
        ),
    }
}

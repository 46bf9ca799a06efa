//! Knapsack selector: Bitcoin Core's historical randomized strategy.
//! Runs N independent trials, each including every eligible UTXO with a
//! fixed probability, and keeps the lowest-waste feasible trial.
//!
//! Uses `rng_utils::random::random_unit_interval` for the per-UTXO
//! inclusion draw, keeping the core's only source of randomness behind
//! the same OsRng-backed helper the rest of the workspace uses rather
//! than reaching for a second RNG dependency.

use rng_utils::random::random_unit_interval;

use crate::model::{ScriptType, Utxo};

use super::{finalize_selection, waste::waste, FailureReason, SelectionOptions, SelectionResult};

/// Independent trials to run per call.
const TRIALS: usize = 1_000;

/// Fixed per-UTXO inclusion probability, matching Bitcoin Core's
/// `CoinSelection`'s approach of simply flipping a coin per output.
const INCLUSION_PROBABILITY: f64 = 0.5;

/// `output_kinds` is the encoder's real non-change output list, folded
/// into every trial's fee estimate and the winning trial's final
/// accounting.
pub fn select(
    eligible: &[Utxo],
    options: &SelectionOptions,
    output_kinds: &[(ScriptType, usize)],
) -> SelectionResult {
    let mut best: Option<(Vec<Utxo>, u64, i64)> = None;

    for _ in 0..TRIALS {
        let trial: Vec<Utxo> = eligible
            .iter()
            .filter(|_| random_unit_interval() < INCLUSION_PROBABILITY)
            .cloned()
            .collect();
        if trial.is_empty() || trial.len() > options.max_inputs {
            continue;
        }

        let input_kinds: Vec<ScriptType> = trial.iter().map(|u| u.script_type()).collect();
        let vsize = crate::fee::estimate_vsize(&input_kinds, output_kinds);
        let fee = crate::fee::calculate_fee(vsize, options.fee_rate);
        let total: u64 = trial.iter().map(|u| u.value).sum();
        if total < options.target_value + fee {
            continue;
        }

        let change = total.saturating_sub(options.target_value + fee);
        let w = waste(&trial, options.fee_rate, change, fee, options.target_value);

        let better = match &best {
            None => true,
            Some((_, _, best_waste)) => w < *best_waste,
        };
        if better {
            best = Some((trial, total, w));
        }
    }

    match best {
        Some((trial, _, _)) => finalize_selection(trial, options, output_kinds, ScriptType::P2wpkh),
        None => SelectionResult::failure(
            FailureReason::NoSolutionFound,
            "no knapsack trial produced a feasible combination",
        ),
    }
}

//! Branch-and-bound selector: bounded depth-first search over the
//! value-sorted UTXO set for a changeless solution within a waste
//! budget, backtracking once the partial sum exceeds the upper bound.
//!
//! Mirrors Bitcoin Core's `SelectCoinsBnB`: search the UTXO set
//! descending by value, explore "include" before "exclude" at each
//! depth, and prune whenever the running sum overshoots
//! `target + fee + cost_of_change`. Ties break on fewer inputs, then
//! lower waste.

use crate::model::{ScriptType, Utxo};

use super::{finalize_selection, waste::waste, FailureReason, SelectionOptions, SelectionResult};

/// Upper bound on nodes visited, a backstop against pathological inputs
/// rather than a tuning knob callers are expected to touch.
const MAX_NODES: usize = 100_000;

struct SearchState<'a> {
    sorted: &'a [Utxo],
    target_plus_fee: u64,
    cost_of_change: u64,
    best: Option<(Vec<usize>, u64, i64)>, // indices, sum, waste
    nodes_visited: usize,
}

fn search(state: &mut SearchState, index: usize, current: &mut Vec<usize>, current_sum: u64, fee_rate: u64, target: u64) {
    state.nodes_visited += 1;
    if state.nodes_visited > MAX_NODES {
        return;
    }

    if current_sum > state.target_plus_fee + state.cost_of_change {
        return; // overshoot past the acceptable band, prune this branch
    }

    if current_sum >= state.target_plus_fee {
        let selected: Vec<Utxo> = current.iter().map(|&i| state.sorted[i].clone()).collect();
        let w = waste(&selected, fee_rate, 0, state.target_plus_fee.saturating_sub(target), target);
        let better = match &state.best {
            None => true,
            Some((best_indices, _, best_waste)) => {
                current.len() < best_indices.len()
                    || (current.len() == best_indices.len() && w < *best_waste)
            }
        };
        if better {
            state.best = Some((current.clone(), current_sum, w));
        }
        return; // do not extend past a valid match, per Core's BnB
    }

    if index >= state.sorted.len() {
        return;
    }

    // Include branch first.
    current.push(index);
    search(state, index + 1, current, current_sum + state.sorted[index].value, fee_rate, target);
    current.pop();

    // Exclude branch.
    search(state, index + 1, current, current_sum, fee_rate, target);
}

/// `output_kinds` is the encoder's real non-change output list, folded
/// into the per-input fee approximation the search bounds itself against
/// and into the winning candidate's final accounting.
pub fn select(
    eligible: &[Utxo],
    options: &SelectionOptions,
    output_kinds: &[(ScriptType, usize)],
) -> SelectionResult {
    let mut sorted: Vec<Utxo> = eligible.to_vec();
    sorted.sort_by(|a, b| b.value.cmp(&a.value));
    let sorted = if sorted.len() > options.max_inputs {
        sorted[..options.max_inputs.max(1).min(sorted.len())].to_vec()
    } else {
        sorted
    };

    let no_change_kinds = vec![ScriptType::P2wpkh; sorted.len().max(1)];
    let vsize = crate::fee::estimate_vsize(&no_change_kinds[..1], output_kinds);
    let per_input_fee = crate::fee::calculate_fee(vsize, options.fee_rate);
    let fee = per_input_fee; // approximate: refined per-candidate by finalize_selection
    let target_plus_fee = options.target_value + fee;
    let cost_of_change = crate::fee::dust_threshold(ScriptType::P2wpkh, options.fee_rate);

    let mut state = SearchState {
        sorted: &sorted,
        target_plus_fee,
        cost_of_change,
        best: None,
        nodes_visited: 0,
    };
    let mut current = Vec::new();
    search(&mut state, 0, &mut current, 0, options.fee_rate, options.target_value);

    match state.best {
        Some((indices, _, _)) => {
            let chosen: Vec<Utxo> = indices.iter().map(|&i| sorted[i].clone()).collect();
            finalize_selection(chosen, options, output_kinds, ScriptType::P2wpkh)
        }
        None => SelectionResult::failure(
            FailureReason::NoSolutionFound,
            "branch-and-bound exhausted its search space without a changeless match",
        ),
    }
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
    fn finds_changeless_exact_match() {
        let utxos = vec![
            utxo(&"a".repeat(64), 25_000),
            utxo(&"b".repeat(64), 25_200),
            utxo(&"c".repeat(64), 9_000),
        ];
        let result = select(&utxos, &options(50_000), &[]);
        match result {
            SelectionResult::Success(s) => assert_eq!(s.change, 0),
            SelectionResult::Failure(f) => panic!("unexpected failure: {}", f.message),
        }
    }

    #[test]
    fn prefers_fewer_inputs_on_tie() {
        let utxos = vec![
            utxo(&"a".repeat(64), 50_100),
            utxo(&"b".repeat(64), 25_050),
            utxo(&"c".repeat(64), 25_050),
        ];
        let result = select(&utxos, &options(50_000), &[]);
        match result {
            SelectionResult::Success(s) => assert_eq!(s.input_count, 1),
            SelectionResult::Failure(f) => panic!("unexpected failure: {}", f.message),
        }
    }

    #[test]
    fn fails_when_no_changeless_combination_exists() {
        let utxos = vec![utxo(&"a".repeat(64), 1_000_000)];
        let result = select(&utxos, &options(50_000), &[]);
        assert!(matches!(result, SelectionResult::Failure(_)));
    }
}

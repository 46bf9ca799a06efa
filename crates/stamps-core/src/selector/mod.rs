//! UTXO selector engine.
//!
//! Six selection strategies share one entry point, one options struct,
//! and one result shape. Each strategy is a pure function over a UTXO
//! slice and `SelectionOptions`; none mutate or mark UTXOs spent.

pub mod accumulative;
pub mod blackjack;
pub mod branch_and_bound;
pub mod knapsack;
pub mod output_group;
pub mod waste;

use std::collections::HashMap;

use crate::fee;
use crate::model::Utxo;

/// Which selection strategy to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector {
    Accumulative,
    AccumulativeFifo,
    Blackjack,
    BranchAndBound,
    Knapsack,
    WasteOptimized,
    OutputGroup,
}

/// Caller-supplied parameters shared by every selector.
#[derive(Debug, Clone)]
pub struct SelectionOptions {
    pub target_value: u64,
    /// Satoshis per virtual byte.
    pub fee_rate: u64,
    pub dust_threshold: u64,
    pub max_inputs: usize,
    pub min_confirmations: u32,
    /// When `true`, the accumulative strategy keeps absorbing eligible
    /// UTXOs past the point the target is already covered (up to
    /// `max_inputs`), trading a larger transaction for a smaller wallet
    /// UTXO set. Other strategies ignore this flag.
    pub consolidate: bool,
}

impl SelectionOptions {
    pub fn validate(&self) -> Result<(), FailureReason> {
        if self.fee_rate < 1 || self.max_inputs < 1 {
            return Err(FailureReason::InvalidOptions);
        }
        Ok(())
    }
}

/// Failure reason codes, one per class of selection outcome a caller
/// needs to distinguish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    NoUtxosAvailable,
    InsufficientFunds,
    NoSolutionFound,
    InvalidOptions,
    SelectionFailed,
}

impl FailureReason {
    pub fn code(self) -> &'static str {
        match self {
            FailureReason::NoUtxosAvailable => "NO_UTXOS_AVAILABLE",
            FailureReason::InsufficientFunds => "INSUFFICIENT_FUNDS",
            FailureReason::NoSolutionFound => "NO_SOLUTION_FOUND",
            FailureReason::InvalidOptions => "INVALID_OPTIONS",
            FailureReason::SelectionFailed => "SELECTION_FAILED",
        }
    }
}

/// A successful selection: the chosen inputs plus the bookkeeping a
/// caller needs to build and broadcast the resulting transaction.
#[derive(Debug, Clone)]
pub struct SelectionSuccess {
    pub inputs: Vec<Utxo>,
    pub total_value: u64,
    pub change: u64,
    pub fee: u64,
    pub waste_metric: i64,
    pub input_count: usize,
    pub output_count: usize,
    pub estimated_vsize: u64,
    pub effective_fee_rate: f64,
}

/// A failed selection attempt.
#[derive(Debug, Clone)]
pub struct SelectionFailure {
    pub reason: FailureReason,
    pub message: String,
    pub details: HashMap<String, String>,
}

/// Tagged result every selector returns.
#[derive(Debug, Clone)]
pub enum SelectionResult {
    Success(SelectionSuccess),
    Failure(SelectionFailure),
}

impl SelectionResult {
    pub fn failure(reason: FailureReason, message: impl Into<String>) -> Self {
        SelectionResult::Failure(SelectionFailure {
            reason,
            message: message.into(),
            details: HashMap::new(),
        })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SelectionResult::Success(_))
    }
}

/// Filters out UTXOs below `dust_threshold` or with too few
/// confirmations, per the common rules every selector applies up front.
pub fn filter_eligible(utxos: &[Utxo], options: &SelectionOptions) -> Vec<Utxo> {
    utxos
        .iter()
        .filter(|u| u.value >= options.dust_threshold && u.confirmations >= options.min_confirmations)
        .cloned()
        .collect()
}

/// Builds a `Success` result from a chosen input set, computing change,
/// fee-absorption of dust change, and the waste metric.
///
/// `output_kinds` are the encoder's non-change outputs (kind, script_len)
/// used to estimate vsize; `change_kind` is the script kind a change
/// output at `from_address` would take.
pub fn finalize_selection(
    inputs: Vec<Utxo>,
    options: &SelectionOptions,
    output_kinds: &[(crate::model::ScriptType, usize)],
    change_kind: crate::model::ScriptType,
) -> SelectionResult {
    let total_value: u64 = inputs.iter().map(|u| u.value).sum();
    let input_kinds: Vec<crate::model::ScriptType> =
        inputs.iter().map(|u| u.script_type()).collect();

    // First estimate without a change output to learn the no-change fee.
    let vsize_no_change = fee::estimate_vsize(&input_kinds, output_kinds);
    let fee_no_change = fee::calculate_fee(vsize_no_change, options.fee_rate);

    if total_value < options.target_value + fee_no_change {
        return SelectionResult::failure(
            FailureReason::InsufficientFunds,
            format!(
                "need {} sat, have {} sat",
                options.target_value + fee_no_change,
                total_value
            ),
        );
    }

    let raw_change = total_value - options.target_value - fee_no_change;
    let change_dust = fee::dust_threshold(change_kind, options.fee_rate);

    let (change, output_count, vsize, computed_fee) = if raw_change == 0 {
        (0, output_kinds.len(), vsize_no_change, fee_no_change)
    } else if raw_change < change_dust {
        // Absorb dust change into the fee rather than emit an
        // uneconomical output.
        (0, output_kinds.len(), vsize_no_change, fee_no_change + raw_change)
    } else {
        let mut outputs_with_change = output_kinds.to_vec();
        outputs_with_change.push((change_kind, 0));
        let vsize_with_change = fee::estimate_vsize(&input_kinds, &outputs_with_change);
        let fee_with_change = fee::calculate_fee(vsize_with_change, options.fee_rate);
        let change = total_value.saturating_sub(options.target_value + fee_with_change);
        (change, outputs_with_change.len(), vsize_with_change, fee_with_change)
    };

    let waste = waste::waste(&inputs, options.fee_rate, change, computed_fee, options.target_value);
    let effective_fee_rate = if vsize == 0 {
        0.0
    } else {
        computed_fee as f64 / vsize as f64
    };

    SelectionResult::Success(SelectionSuccess {
        input_count: inputs.len(),
        inputs,
        total_value,
        change,
        fee: computed_fee,
        waste_metric: waste,
        output_count,
        estimated_vsize: vsize,
        effective_fee_rate,
    })
}

/// Dispatches to the requested selector implementation.
///
/// `output_kinds` is the encoder's non-change output list — (script kind,
/// script length) per Stamp/SRC-20 output the transaction is actually
/// paying for (the OP_RETURN issuance plus fake-P2WSH chunks, or the
/// SRC-20 P2WSH chunks). It feeds every strategy's vsize/fee estimate, so
/// an empty slice only belongs here when a caller genuinely has no
/// outputs yet (e.g. exploratory fee quoting).
pub fn select(
    utxos: &[Utxo],
    options: &SelectionOptions,
    selector: Selector,
    output_kinds: &[(crate::model::ScriptType, usize)],
) -> SelectionResult {
    if let Err(reason) = options.validate() {
        return SelectionResult::failure(reason, "invalid selection options");
    }

    let eligible = filter_eligible(utxos, options);
    if eligible.is_empty() {
        return SelectionResult::failure(FailureReason::NoUtxosAvailable, "no eligible UTXOs");
    }

    match selector {
        Selector::Accumulative => accumulative::select(&eligible, options, false, output_kinds),
        Selector::AccumulativeFifo => accumulative::select(&eligible, options, true, output_kinds),
        Selector::Blackjack => blackjack::select(&eligible, options, output_kinds),
        Selector::BranchAndBound => branch_and_bound::select(&eligible, options, output_kinds),
        Selector::Knapsack => knapsack::select(&eligible, options, output_kinds),
        Selector::WasteOptimized => waste::select(&eligible, options, output_kinds),
        Selector::OutputGroup => output_group::select(&eligible, options, output_kinds),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitcoin::ScriptBuf;

    fn p2wpkh_script() -> ScriptBuf {
        ScriptBuf::from_hex(&format!("0014{}", "ab".repeat(20))).unwrap()
    }

    fn utxo(value: u64, confirmations: u32) -> Utxo {
        let mut u = Utxo::new("a".repeat(64), 0, value, p2wpkh_script());
        u.confirmations = confirmations;
        u
    }

    fn default_options() -> SelectionOptions {
        SelectionOptions {
            target_value: 50_000,
            fee_rate: 1,
            dust_threshold: 1_000,
            max_inputs: 10,
            min_confirmations: 0,
            consolidate: false,
        }
    }

    #[test]
    fn filter_eligible_drops_dust_and_unconfirmed() {
        let utxos = vec![utxo(500, 1), utxo(10_000, 0), utxo(20_000, 6)];
        let mut options = default_options();
        options.min_confirmations = 1;
        let eligible = filter_eligible(&utxos, &options);
        assert_eq!(eligible.len(), 1);
        assert_eq!(eligible[0].value, 20_000);
    }

    #[test]
    fn select_rejects_invalid_fee_rate() {
        let utxos = vec![utxo(100_000, 6)];
        let mut options = default_options();
        options.fee_rate = 0;
        let result = select(&utxos, &options, Selector::Accumulative, &[]);
        match result {
            SelectionResult::Failure(f) => assert_eq!(f.reason, FailureReason::InvalidOptions),
            _ => panic!("expected failure"),
        }
    }

    #[test]
    fn select_rejects_empty_eligible_set() {
        let result = select(&[], &default_options(), Selector::Accumulative, &[]);
        match result {
            SelectionResult::Failure(f) => assert_eq!(f.reason, FailureReason::NoUtxosAvailable),
            _ => panic!("expected failure"),
        }
    }

    #[test]
    fn select_accounts_for_real_output_kinds_in_fee_and_vsize() {
        // The same UTXO set and target, once with no declared outputs and
        // once with a Stamp-shaped output list (1 OP_RETURN + 3 fake-P2WSH
        // chunks): the latter must estimate a larger vsize and charge a
        // larger fee, since it is paying for those outputs too.
        let utxos = vec![utxo(200_000, 6)];
        let options = default_options();

        let bare = select(&utxos, &options, Selector::Accumulative, &[]);
        let stamp_outputs = [
            (crate::model::ScriptType::OpReturn, 31),
            (crate::model::ScriptType::P2wsh, 34),
            (crate::model::ScriptType::P2wsh, 34),
            (crate::model::ScriptType::P2wsh, 34),
        ];
        let with_outputs = select(&utxos, &options, Selector::Accumulative, &stamp_outputs);

        match (bare, with_outputs) {
            (SelectionResult::Success(bare), SelectionResult::Success(with_outputs)) => {
                assert!(with_outputs.estimated_vsize > bare.estimated_vsize);
                assert!(with_outputs.fee > bare.fee);
            }
            _ => panic!("expected both selections to succeed"),
        }
    }

    #[test]
    fn finalize_selection_absorbs_dust_change_into_fee() {
        // Rig a selection whose raw change is just under the P2WPKH dust
        // threshold so finalize_selection folds it into the fee.
        let inputs = vec![utxo(51_000, 6)];
        let options = SelectionOptions {
            target_value: 50_000,
            fee_rate: 1,
            dust_threshold: 1_000,
            max_inputs: 10,
            min_confirmations: 0,
            consolidate: false,
        };
        let result = finalize_selection(inputs, &options, &[], crate::model::ScriptType::P2wpkh);
        match result {
            SelectionResult::Success(success) => assert_eq!(success.change, 0),
            SelectionResult::Failure(f) => panic!("unexpected failure: {}", f.message),
        }
    }
}

//! Output-group selector: groups UTXOs by `(script_type,
//! coarse_value_bucket, origin_txid)` and spends whole groups where the
//! chosen privacy level allows, falling back to an ordinary selector
//! when grouping alone cannot reach the target.

use std::collections::BTreeMap;

use crate::model::{ScriptType, Utxo};

use super::{accumulative, finalize_selection, FailureReason, SelectionOptions, SelectionResult};

/// How strictly group boundaries are respected while filling the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrivacyLevel {
    /// Only whole groups may be added.
    High,
    /// Whole groups preferred; partial addition permitted to reach target.
    Medium,
    /// Sort groups by effective value per UTXO and fill greedily,
    /// ignoring group boundaries.
    Low,
}

/// Grouping key: script kind, a coarse log2 value bucket, and the UTXO's
/// origin transaction (its own txid — the closest proxy this core has
/// to "which transaction paid me this output" without external context).
type GroupKey = (ScriptKindKey, u32, String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum ScriptKindKey {
    P2pkh,
    P2wpkh,
    P2sh,
    P2wsh,
    P2tr,
    OpReturn,
    Unknown,
}

fn script_kind_key(kind: ScriptType) -> ScriptKindKey {
    match kind {
        ScriptType::P2pkh => ScriptKindKey::P2pkh,
        ScriptType::P2wpkh => ScriptKindKey::P2wpkh,
        ScriptType::P2sh => ScriptKindKey::P2sh,
        ScriptType::P2wsh => ScriptKindKey::P2wsh,
        ScriptType::P2tr => ScriptKindKey::P2tr,
        ScriptType::OpReturn => ScriptKindKey::OpReturn,
        ScriptType::Unknown => ScriptKindKey::Unknown,
    }
}

fn value_bucket(value: u64) -> u32 {
    if value == 0 {
        0
    } else {
        63 - value.leading_zeros()
    }
}

fn group_key(utxo: &Utxo) -> GroupKey {
    (script_kind_key(utxo.script_type()), value_bucket(utxo.value), utxo.txid.clone())
}

fn effective_value(utxo: &Utxo, fee_rate: u64) -> i64 {
    utxo.value as i64 - (crate::fee::input_vsize(utxo.script_type()) * fee_rate) as i64
}

fn group_utxos(eligible: &[Utxo]) -> Vec<Vec<Utxo>> {
    let mut groups: BTreeMap<GroupKey, Vec<Utxo>> = BTreeMap::new();
    for utxo in eligible {
        groups.entry(group_key(utxo)).or_default().push(utxo.clone());
    }
    groups.into_values().collect()
}

fn select_high(
    groups: &[Vec<Utxo>],
    options: &SelectionOptions,
    output_kinds: &[(ScriptType, usize)],
) -> SelectionResult {
    let mut sorted_groups = groups.to_vec();
    sorted_groups.sort_by_key(|g| std::cmp::Reverse(g.iter().map(|u| u.value).sum::<u64>()));

    let mut chosen: Vec<Utxo> = Vec::new();
    for group in sorted_groups {
        if chosen.len() + group.len() > options.max_inputs {
            continue;
        }
        chosen.extend(group);
        let total: u64 = chosen.iter().map(|u| u.value).sum();
        let kinds: Vec<ScriptType> = chosen.iter().map(|u| u.script_type()).collect();
        let fee = crate::fee::calculate_fee(
            crate::fee::estimate_vsize(&kinds, output_kinds),
            options.fee_rate,
        );
        if total >= options.target_value + fee {
            return finalize_selection(chosen, options, output_kinds, ScriptType::P2wpkh);
        }
    }
    SelectionResult::failure(
        FailureReason::NoSolutionFound,
        "no combination of whole groups reaches the target at the High privacy level",
    )
}

fn select_medium(
    groups: &[Vec<Utxo>],
    options: &SelectionOptions,
    output_kinds: &[(ScriptType, usize)],
) -> SelectionResult {
    match select_high(groups, options, output_kinds) {
        success @ SelectionResult::Success(_) => success,
        SelectionResult::Failure(_) => {
            // Fall through to per-UTXO accumulation across the flattened
            // set so a partial group can close the gap.
            let flattened: Vec<Utxo> = groups.iter().flatten().cloned().collect();
            accumulative::select(&flattened, options, false, output_kinds)
        }
    }
}

fn select_low(
    eligible: &[Utxo],
    options: &SelectionOptions,
    output_kinds: &[(ScriptType, usize)],
) -> SelectionResult {
    let mut sorted: Vec<Utxo> = eligible.to_vec();
    sorted.sort_by_key(|u| std::cmp::Reverse(effective_value(u, options.fee_rate)));

    let mut chosen: Vec<Utxo> = Vec::new();
    for utxo in sorted {
        if chosen.len() >= options.max_inputs {
            break;
        }
        chosen.push(utxo);
        let total: u64 = chosen.iter().map(|u| u.value).sum();
        let kinds: Vec<ScriptType> = chosen.iter().map(|u| u.script_type()).collect();
        let fee = crate::fee::calculate_fee(
            crate::fee::estimate_vsize(&kinds, output_kinds),
            options.fee_rate,
        );
        if total >= options.target_value + fee {
            return finalize_selection(chosen, options, output_kinds, ScriptType::P2wpkh);
        }
    }
    SelectionResult::failure(
        FailureReason::InsufficientFunds,
        "effective-value-ordered fill could not reach the target",
    )
}

/// Runs the grouping selector at the given privacy level, falling back
/// to the plain accumulative selector if grouping cannot meet the
/// target at all. `output_kinds` is the encoder's real non-change output
/// list, threaded into every fee/vsize estimate along the way.
pub fn select_with_privacy(
    eligible: &[Utxo],
    options: &SelectionOptions,
    privacy: PrivacyLevel,
    output_kinds: &[(ScriptType, usize)],
) -> SelectionResult {
    let groups = group_utxos(eligible);
    let grouped_result = match privacy {
        PrivacyLevel::High => select_high(&groups, options, output_kinds),
        PrivacyLevel::Medium => select_medium(&groups, options, output_kinds),
        PrivacyLevel::Low => select_low(eligible, options, output_kinds),
    };

    if grouped_result.is_success() {
        return grouped_result;
    }
    accumulative::select(eligible, options, false, output_kinds)
}

/// Entry point used by the shared `select()` dispatcher; defaults to the
/// Medium privacy level, balancing grouping discipline against the
/// likelihood of actually reaching the target.
pub fn select(
    eligible: &[Utxo],
    options: &SelectionOptions,
    output_kinds: &[(ScriptType, usize)],
) -> SelectionResult {
    select_with_privacy(eligible, options, PrivacyLevel::Medium, output_kinds)
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
    fn value_bucket_groups_similar_magnitudes_together() {
        assert_eq!(value_bucket(1_000), value_bucket(1_500));
        assert_ne!(value_bucket(1_000), value_bucket(100_000));
    }

    #[test]
    fn groups_by_txid_keep_same_origin_together() {
        let txid = "a".repeat(64);
        let utxos = vec![utxo(&txid, 10_000), utxo(&txid, 12_000)];
        let groups = group_utxos(&utxos);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 2);
    }

    #[test]
    fn high_privacy_succeeds_when_a_single_group_covers_target() {
        let txid = "a".repeat(64);
        let utxos = vec![utxo(&txid, 40_000), utxo(&txid, 40_000)];
        let result = select_with_privacy(&utxos, &options(50_000), PrivacyLevel::High, &[]);
        assert!(result.is_success());
    }

    #[test]
    fn medium_privacy_falls_back_to_partial_fill() {
        let utxos = vec![
            utxo(&"a".repeat(64), 10_000),
            utxo(&"b".repeat(64), 10_000),
            utxo(&"c".repeat(64), 40_000),
        ];
        let result = select_with_privacy(&utxos, &options(50_000), PrivacyLevel::Medium, &[]);
        assert!(result.is_success());
    }

    #[test]
    fn low_privacy_sorts_by_effective_value() {
        let utxos = vec![
            utxo(&"a".repeat(64), 20_000),
            utxo(&"b".repeat(64), 60_000),
        ];
        let result = select_low(&utxos, &options(50_000), &[]);
        assert!(result.is_success());
    }
}

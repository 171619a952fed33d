// ─────────────────────────────────────────────────────────────────────
// Resonant Addressing Kernel — Ablation Attribution
// ─────────────────────────────────────────────────────────────────────
//! Runs a base program and each of its ablations through the same
//! addressing scenario with the same seed. A token kind is causally
//! necessary when the base passes and removing that kind makes the run
//! fail.

use serde::{Deserialize, Serialize};

use resonant_program::{ablate_program, make_ablations, Ablation, WaveProgram};
use resonant_types::{AddressingMetrics, AddressingThresholds, ResonantError, ResonantResult};

use crate::scenario::Experiment;

/// One ablated run compared against the base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AblationEntry {
    pub ablation: Ablation,
    pub metrics: AddressingMetrics,
    pub pass: bool,
    /// Ablated minus base selectivity.
    pub selectivity_delta: f64,
    pub causally_necessary: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AblationReport {
    pub node_index: usize,
    pub seed: u64,
    pub thresholds: AddressingThresholds,
    pub base: AddressingMetrics,
    pub base_pass: bool,
    pub entries: Vec<AblationEntry>,
}

impl AblationReport {
    /// Labels of the ablations that broke a passing base.
    pub fn necessary_labels(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.causally_necessary)
            .map(|e| e.ablation.label.as_str())
            .collect()
    }

    pub fn entry(&self, label: &str) -> Option<&AblationEntry> {
        self.entries.iter().find(|e| e.ablation.label == label)
    }

    pub fn to_json(&self) -> ResonantResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ResonantError::Bundle(format!("report serialization failed: {e}")))
    }
}

/// Score `base` and every ablation in `ablations` on node `node_index`.
pub fn run_ablations(
    experiment: &Experiment,
    base: &WaveProgram,
    ablations: &[Ablation],
    node_index: usize,
    seed: u64,
    thresholds: &AddressingThresholds,
) -> ResonantResult<AblationReport> {
    let base_metrics = experiment.evaluate_addressing(base, node_index, seed)?;
    let base_pass = base_metrics.passes(thresholds);

    let mut entries = Vec::with_capacity(ablations.len());
    for ablation in ablations {
        let program = ablate_program(base, ablation);
        let metrics = experiment.evaluate_addressing(&program, node_index, seed)?;
        let pass = metrics.passes(thresholds);
        let entry = AblationEntry {
            ablation: ablation.clone(),
            metrics,
            pass,
            selectivity_delta: metrics.selectivity - base_metrics.selectivity,
            causally_necessary: base_pass && !pass,
        };
        log::debug!(
            "ablation {} selectivity={:.4} delta={:+.4} necessary={}",
            entry.ablation.label,
            metrics.selectivity,
            entry.selectivity_delta,
            entry.causally_necessary
        );
        entries.push(entry);
    }

    let report = AblationReport {
        node_index,
        seed,
        thresholds: *thresholds,
        base: base_metrics,
        base_pass,
        entries,
    };
    log::info!(
        "ablation battery node={node_index} base_pass={base_pass} necessary={:?}",
        report.necessary_labels()
    );
    Ok(report)
}

/// Leave-one-out battery over every token kind.
pub fn run_ablation_battery(
    experiment: &Experiment,
    base: &WaveProgram,
    node_index: usize,
    seed: u64,
    thresholds: &AddressingThresholds,
) -> ResonantResult<AblationReport> {
    run_ablations(
        experiment,
        base,
        &make_ablations(),
        node_index,
        seed,
        thresholds,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use resonant_physics::{ADDRESSING_DRIVE_HZ, ADDRESSING_NODE};
    use resonant_program::{compile_intent, Intent, TokenKind};

    fn canonical_program() -> WaveProgram {
        compile_intent(&Intent::a2(ADDRESSING_NODE, ADDRESSING_DRIVE_HZ, 1337)).program
    }

    #[test]
    fn test_omega_is_necessary_amp_is_not() {
        let report = run_ablation_battery(
            &Experiment::canonical(),
            &canonical_program(),
            ADDRESSING_NODE,
            1337,
            &AddressingThresholds::default(),
        )
        .unwrap();
        assert!(report.base_pass);
        assert_eq!(report.entries.len(), TokenKind::ALL.len());

        let omega = report.entry("drop_ω").unwrap();
        assert!(omega.causally_necessary);
        assert!(omega.selectivity_delta < 0.0);

        // Default amplitude is 1, the same value the compiler emits.
        let amp = report.entry("drop_A").unwrap();
        assert!(!amp.causally_necessary);
        assert!(amp.pass);
        assert!(report.necessary_labels().contains(&"drop_ω"));

        let json = report.to_json().unwrap();
        assert!(json.contains("\"causallyNecessary\": true"));
    }

    #[test]
    fn test_failing_base_marks_nothing_necessary() {
        let strict = AddressingThresholds {
            selectivity_min: 1e9,
            crosstalk_max: 0.25,
        };
        let report = run_ablation_battery(
            &Experiment::canonical(),
            &canonical_program(),
            ADDRESSING_NODE,
            1337,
            &strict,
        )
        .unwrap();
        assert!(!report.base_pass);
        assert!(report.necessary_labels().is_empty());
    }

    #[test]
    fn test_custom_ablation_list() {
        let report = run_ablations(
            &Experiment::canonical(),
            &canonical_program(),
            &[Ablation::drop_gate_env(), Ablation::drop_time_windows()],
            ADDRESSING_NODE,
            1337,
            &AddressingThresholds::default(),
        )
        .unwrap();
        assert_eq!(report.entries.len(), 2);
        // The canonical program has gate 1 and no windows; neither removal matters.
        for entry in &report.entries {
            assert_eq!(entry.metrics, report.base);
            assert!(!entry.causally_necessary);
        }
    }

    #[test]
    fn test_bad_node_propagates() {
        let err = run_ablation_battery(
            &Experiment::canonical(),
            &canonical_program(),
            99,
            1,
            &AddressingThresholds::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ResonantError::Validation(_)));
    }
}

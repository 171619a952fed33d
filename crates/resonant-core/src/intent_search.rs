// ─────────────────────────────────────────────────────────────────────
// Resonant Addressing Kernel — Addressing Intent Search Space
// ─────────────────────────────────────────────────────────────────────
//! Searches drive frequency and amplitude of an A2 intent for one node,
//! scoring each candidate by the selectivity it achieves in a full
//! scenario run.
//!
//! The selectivity surface is a single resonance peak a fraction of a
//! hertz wide and nearly flat elsewhere, so plain local steps stall off
//! the peak. `mutate` therefore screens two proposals per round:
//!
//! - the fresh draw, built from the same two uniforms `sample` would
//!   consume at that stream position;
//! - a local step of at most ±0.5 Hz / ±0.1 around the current best,
//!   derived from those same uniforms.
//!
//! It returns the better of the two. Every draw lines up with the
//! matching `random_search` round, so hillclimb always sees a proposal
//! at least as fit as each random-search sample, and its final best is
//! never below random search's for the same seed and budget.

use resonant_physics::SeededRng;
use resonant_program::{Intent, IntentTarget};

use crate::scenario::{Experiment, ScenarioOutcome};
use crate::search::{Fitness, FitnessReport, SearchSpace};

/// Half-widths of the local step taken by `mutate`.
const OMEGA_STEP_HZ: f64 = 0.5;
const AMP_STEP: f64 = 0.1;

/// A2 intents for `node_index`, with ω and amplitude inside the given ranges.
#[derive(Debug, Clone)]
pub struct AddressingIntentSpace {
    pub experiment: Experiment,
    pub node_index: usize,
    pub omega_range_hz: (f64, f64),
    pub amp_range: (f64, f64),
    /// Seed stamped on every candidate intent, so the simulation noise
    /// is shared across candidates.
    pub seed: u64,
    /// Proposal scored while screening in `mutate`; reused by `evaluate`.
    screened: Option<(Intent, FitnessReport)>,
}

impl AddressingIntentSpace {
    /// Default ranges: ω across the bank's frequency span, amplitude 0.1..2.
    pub fn new(experiment: Experiment, node_index: usize, seed: u64) -> Self {
        let freqs = &experiment.config().bank.freqs_hz;
        let lo = freqs.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = freqs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let omega_range_hz = if lo.is_finite() && hi.is_finite() {
            (lo, hi)
        } else {
            (1.0, 1.0)
        };
        Self {
            experiment,
            node_index,
            omega_range_hz,
            amp_range: (0.1, 2.0),
            seed,
            screened: None,
        }
    }

    fn candidate(&self, omega_hz: f64, amp: f64) -> Intent {
        let mut intent = Intent::a2(self.node_index, omega_hz, self.seed);
        if let IntentTarget::A2(a2) = &mut intent.target {
            a2.amp = Some(amp);
        }
        intent
    }

    /// The two uniforms behind every proposal, always drawn ω first.
    fn draw(rng: &mut SeededRng) -> (f64, f64) {
        let u_omega = rng.next_f64();
        let u_amp = rng.next_f64();
        (u_omega, u_amp)
    }

    fn fresh(&self, u_omega: f64, u_amp: f64) -> Intent {
        self.candidate(lerp(self.omega_range_hz, u_omega), lerp(self.amp_range, u_amp))
    }

    fn score(&self, candidate: &Intent) -> FitnessReport {
        let (omega, amp) = drive_of(candidate);
        match self.experiment.evaluate_intent(candidate) {
            Ok(ScenarioOutcome::A2(outcome)) => FitnessReport::new(outcome.metrics.selectivity)
                .with_pass(outcome.pass)
                .with_diagnostic("crosstalk", outcome.metrics.crosstalk)
                .with_diagnostic("omegaHz", omega)
                .with_diagnostic("amp", amp),
            Ok(ScenarioOutcome::A31(_)) => {
                log::warn!("addressing search got a chirality outcome; scoring -inf");
                FitnessReport::new(f64::NEG_INFINITY).with_pass(false)
            }
            Err(e) => {
                log::warn!("candidate omega={omega:.3}Hz amp={amp:.3} failed: {e}");
                FitnessReport::new(f64::NEG_INFINITY).with_pass(false)
            }
        }
    }
}

fn lerp((lo, hi): (f64, f64), u: f64) -> f64 {
    if hi > lo {
        lo + (hi - lo) * u
    } else {
        lo
    }
}

fn drive_of(intent: &Intent) -> (f64, f64) {
    match &intent.target {
        IntentTarget::A2(a2) => (a2.omega_hz, a2.amp.unwrap_or(1.0)),
        IntentTarget::A31(_) => (f64::NAN, f64::NAN),
    }
}

fn rank(report: &FitnessReport) -> f64 {
    let value = report.primary();
    if value.is_nan() {
        f64::NEG_INFINITY
    } else {
        value
    }
}

impl SearchSpace for AddressingIntentSpace {
    type Candidate = Intent;
    type Fitness = FitnessReport;

    fn sample(&mut self, rng: &mut SeededRng) -> Intent {
        let (u_omega, u_amp) = Self::draw(rng);
        self.fresh(u_omega, u_amp)
    }

    fn mutate(&mut self, rng: &mut SeededRng, best: &Intent, iteration: usize) -> Intent {
        let (u_omega, u_amp) = Self::draw(rng);
        let fresh = self.fresh(u_omega, u_amp);

        let (omega, amp) = drive_of(best);
        let local = self.candidate(
            (omega + OMEGA_STEP_HZ * (2.0 * u_omega - 1.0))
                .clamp(self.omega_range_hz.0, self.omega_range_hz.1),
            (amp + AMP_STEP * (2.0 * u_amp - 1.0)).clamp(self.amp_range.0, self.amp_range.1),
        );

        let fresh_report = self.score(&fresh);
        let local_report = self.score(&local);
        let (proposal, report) = if rank(&local_report) >= rank(&fresh_report) {
            (local, local_report)
        } else {
            (fresh, fresh_report)
        };
        log::debug!(
            "mutate iter={iteration} proposal omega={:.3}Hz score={:.4}",
            drive_of(&proposal).0,
            report.primary
        );
        self.screened = Some((proposal.clone(), report));
        proposal
    }

    fn evaluate(&mut self, candidate: &Intent) -> FitnessReport {
        if let Some((screened, report)) = self.screened.take() {
            if &screened == candidate {
                return report;
            }
        }
        self.score(candidate)
    }
}

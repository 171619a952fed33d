// ─────────────────────────────────────────────────────────────────────
// Resonant Addressing Kernel — Scenario Evaluators
// ─────────────────────────────────────────────────────────────────────
//! Closes the loop program → drive → bank → metrics for both compile
//! targets. Both evaluators reuse the same fixed-step harness; the
//! oscillator bank and PRNG stream live in a per-run state value that
//! is built fresh, lent to the harness, and dropped afterwards.
//!
//! Per tick the drive applied to the bank is `gate01 · u(t)`, and the
//! noise scale is the program's env `noiseStd` override if present,
//! otherwise `ExperimentConfig::noise_std`.

use serde::{Deserialize, Serialize};

use resonant_physics::{
    addressing_metrics, drift_ratio, make_oscillator_bank, run_sim, step_oscillators,
    OscillatorBank, PairLock, SeededRng,
};
use resonant_program::compiler::CHIRAL_PAIR_MODE;
use resonant_program::{
    apply_program_at_time, compile_intent, Intent, IntentTarget, Thresholds, WaveProgram,
};
use resonant_types::{
    AddressingMetrics, AddressingThresholds, ChiralityMetrics, ChiralityThresholds,
    ExperimentConfig, ResonantError, ResonantResult, SimConfig,
};

/// Addressing run result with its verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressingOutcome {
    pub node_index: usize,
    pub metrics: AddressingMetrics,
    pub thresholds: AddressingThresholds,
    pub pass: bool,
}

/// Chirality pair run result with its verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChiralityOutcome {
    pub a: usize,
    pub b: usize,
    pub metrics: ChiralityMetrics,
    pub thresholds: ChiralityThresholds,
    pub pass: bool,
}

/// Outcome of evaluating a compiled intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "target")]
pub enum ScenarioOutcome {
    A2(AddressingOutcome),
    A31(ChiralityOutcome),
}

impl ScenarioOutcome {
    pub fn passed(&self) -> bool {
        match self {
            ScenarioOutcome::A2(o) => o.pass,
            ScenarioOutcome::A31(o) => o.pass,
        }
    }
}

/// Everything one run mutates.
struct RunState {
    bank: OscillatorBank,
    rng: SeededRng,
    pair: Option<PairProbe>,
}

/// Pair statistics collected after the warmup window.
struct PairProbe {
    a: usize,
    b: usize,
    warmup_steps: usize,
    lock: PairLock,
}

/// Experiment evaluator bound to one bank/clock configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Experiment {
    config: ExperimentConfig,
}

impl Experiment {
    pub fn new(config: ExperimentConfig) -> ResonantResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Eight nodes at 3–10 Hz, ζ=0.04, T=12 s at dt=1/240 s, noise 0.001.
    pub fn canonical() -> Self {
        Self {
            config: ExperimentConfig::default(),
        }
    }

    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    pub fn bank_len(&self) -> usize {
        self.config.bank.freqs_hz.len()
    }

    fn check_node(&self, what: &str, index: usize) -> ResonantResult<()> {
        if index >= self.bank_len() {
            return Err(ResonantError::Validation(format!(
                "{what}={index} out of range for bank of {}",
                self.bank_len()
            )));
        }
        Ok(())
    }

    fn sim_config(&self, seed: u64) -> SimConfig {
        SimConfig {
            seed,
            ..self.config.sim
        }
    }

    /// Drive a fresh bank with `program` and hand back the final run state.
    fn run(
        &self,
        program: &WaveProgram,
        seed: u64,
        pair: Option<PairProbe>,
    ) -> ResonantResult<RunState> {
        let sim = self.sim_config(seed);
        let mut state = RunState {
            bank: make_oscillator_bank(&self.config.bank)?,
            rng: SeededRng::new(sim.seed),
            pair,
        };
        let default_noise = self.config.noise_std;
        let dt = sim.dt;

        let out = run_sim(
            &sim,
            &mut state,
            |run, i, t| {
                let eval = apply_program_at_time(program, t);
                let noise_std = eval.state.noise_std.unwrap_or(default_noise);
                let drive = eval.state.gate01 * eval.u;
                step_oscillators(&mut run.bank, dt, drive, noise_std, &mut run.rng);
                if let Some(probe) = run.pair.as_mut() {
                    if i >= probe.warmup_steps {
                        let xa = run.bank.oscillators[probe.a].x;
                        let xb = run.bank.oscillators[probe.b].x;
                        probe.lock.push(xa, xb);
                    }
                }
            },
            |run| run.bank.is_finite(),
        );

        if !out.metrics {
            return Err(ResonantError::Numerical(format!(
                "bank diverged within {:.3}s (dt={dt})",
                out.elapsed
            )));
        }
        log::debug!(
            "run seed={seed} T={:.3}s energies={:?}",
            out.elapsed,
            state.bank.energies()
        );
        Ok(state)
    }

    /// Selectivity/crosstalk of node `node_index` under `program`.
    ///
    /// The program itself never names a node; the index is supplied here.
    pub fn evaluate_addressing(
        &self,
        program: &WaveProgram,
        node_index: usize,
        seed: u64,
    ) -> ResonantResult<AddressingMetrics> {
        self.check_node("nodeIndex", node_index)?;
        let state = self.run(program, seed, None)?;
        addressing_metrics(&state.bank.energies(), node_index)
    }

    /// Chirality lock metrics for the pair encoded in the program's
    /// `chiral_pair` mode token.
    ///
    /// Node i is read out as χᵢ·xᵢ. The program's parity token carries
    /// χa·χb, so the readout correlation is `p·corr(xa, xb)`:
    /// `match_lock` is that value clamped into [0, 1], and
    /// `mismatch_lock` is the same for the opposite hypothesis `−p`.
    ///
    /// The two locks come from one correlation with opposite signs, so at
    /// most one of them is non-zero. Any `match_lock` above zero implies
    /// `mismatch_lock == 0`, and `mismatch_lock_max` only bites together
    /// with a failing `match_lock_min`.
    pub fn evaluate_chirality(
        &self,
        program: &WaveProgram,
        seed: u64,
    ) -> ResonantResult<(usize, usize, ChiralityMetrics)> {
        let resolved = apply_program_at_time(program, 0.0).state;
        if resolved.mode != CHIRAL_PAIR_MODE {
            return Err(ResonantError::Validation(format!(
                "chirality test needs mode '{CHIRAL_PAIR_MODE}', got '{}'",
                resolved.mode
            )));
        }
        let a = pair_index(&resolved.mode_params, "a")?;
        let b = pair_index(&resolved.mode_params, "b")?;
        self.check_node("a", a)?;
        self.check_node("b", b)?;
        if a == b {
            return Err(ResonantError::Validation(format!(
                "chirality pair must name two nodes, got a=b={a}"
            )));
        }

        let probe = PairProbe {
            a,
            b,
            warmup_steps: (self.config.sim.steps as f64 * self.config.warmup_fraction) as usize,
            lock: PairLock::default(),
        };
        let state = self.run(program, seed, Some(probe))?;
        let lock = state.pair.map(|p| p.lock).unwrap_or_default();

        let sign = resolved.parity.sign();
        let energies = state.bank.energies();
        let metrics = ChiralityMetrics {
            match_lock: lock.lock(sign),
            mismatch_lock: lock.lock(-sign),
            drift_ratio: drift_ratio(energies[a], energies[b]),
        };
        Ok((a, b, metrics))
    }

    /// Compile `intent` and run the scenario its target calls for,
    /// seeded from `intent.seed`.
    pub fn evaluate_intent(&self, intent: &Intent) -> ResonantResult<ScenarioOutcome> {
        let compiled = compile_intent(intent);
        match (&intent.target, compiled.thresholds) {
            (IntentTarget::A2(a2), Thresholds::A2(thresholds)) => {
                let metrics =
                    self.evaluate_addressing(&compiled.program, a2.node_index, intent.seed)?;
                Ok(ScenarioOutcome::A2(AddressingOutcome {
                    node_index: a2.node_index,
                    metrics,
                    thresholds,
                    pass: metrics.passes(&thresholds),
                }))
            }
            (IntentTarget::A31(_), Thresholds::A31(thresholds)) => {
                let (a, b, metrics) = self.evaluate_chirality(&compiled.program, intent.seed)?;
                Ok(ScenarioOutcome::A31(ChiralityOutcome {
                    a,
                    b,
                    metrics,
                    thresholds,
                    pass: metrics.passes(&thresholds),
                }))
            }
            (_, thresholds) => Err(ResonantError::Validation(format!(
                "compiler returned {:?} thresholds for a {:?} intent",
                thresholds.target(),
                intent.compile_target()
            ))),
        }
    }
}

fn pair_index(
    params: &std::collections::BTreeMap<String, f64>,
    key: &str,
) -> ResonantResult<usize> {
    let value = *params.get(key).ok_or_else(|| {
        ResonantError::Validation(format!("chiral_pair mode is missing param '{key}'"))
    })?;
    if !value.is_finite() || value < 0.0 || value.fract() != 0.0 {
        return Err(ResonantError::Validation(format!(
            "chiral_pair param '{key}' must be a node index, got {value}"
        )));
    }
    Ok(value as usize)
}

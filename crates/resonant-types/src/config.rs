// ─────────────────────────────────────────────────────────────────────
// Resonant Addressing Kernel — Configuration
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

use crate::error::{ResonantError, ResonantResult};

/// Oscillator bank parameters.
///
/// One oscillator per natural frequency; damping ratio and input gain
/// are shared across the whole bank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BankConfig {
    /// Natural frequencies in Hz, one per node.
    /// Default: 3, 4, ..., 10 Hz (eight nodes, 1 Hz spacing).
    pub freqs_hz: Vec<f64>,

    /// Shared damping ratio ζ.
    /// Default: 0.04.
    pub zeta: f64,

    /// Shared input gain applied to the scalar drive.
    /// Default: 1.0.
    pub gain: f64,
}

impl Default for BankConfig {
    fn default() -> Self {
        Self {
            freqs_hz: (3..=10).map(f64::from).collect(),
            zeta: 0.04,
            gain: 1.0,
        }
    }
}

impl BankConfig {
    /// Validate bank parameters.
    ///
    /// An empty frequency list is a configuration error, not a
    /// degenerate-but-valid bank.
    pub fn validate(&self) -> ResonantResult<()> {
        if self.freqs_hz.is_empty() {
            return Err(ResonantError::Config(
                "freqs_hz must contain at least one frequency".to_string(),
            ));
        }
        if let Some((i, f)) = self
            .freqs_hz
            .iter()
            .enumerate()
            .find(|(_, f)| !f.is_finite() || **f <= 0.0)
        {
            return Err(ResonantError::Config(format!(
                "freqs_hz[{i}] must be finite and > 0, got {f}"
            )));
        }
        if !self.zeta.is_finite() || self.zeta < 0.0 {
            return Err(ResonantError::Config(format!(
                "zeta must be finite and >= 0, got {}",
                self.zeta
            )));
        }
        if !self.gain.is_finite() {
            return Err(ResonantError::Config(format!(
                "gain must be finite, got {}",
                self.gain
            )));
        }
        Ok(())
    }

    /// Load from JSON string.
    pub fn from_json(json: &str) -> ResonantResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| ResonantError::Config(format!("JSON parse error: {e}")))
    }
}

/// Fixed-step clock parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Step size in seconds.
    /// Default: 1/240 s (≈24× oversampling of a 10 Hz oscillator).
    pub dt: f64,

    /// Number of steps.
    /// Default: 2880 (T = 12 s at the default dt).
    pub steps: usize,

    /// Seed for the run's PRNG stream.
    /// Default: 1337.
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            dt: 1.0 / 240.0,
            steps: 2880,
            seed: 1337,
        }
    }
}

impl SimConfig {
    /// Build a config covering `duration_s` seconds at step size `dt`.
    pub fn for_duration(duration_s: f64, dt: f64, seed: u64) -> Self {
        Self {
            dt,
            steps: (duration_s / dt).round().max(0.0) as usize,
            seed,
        }
    }

    /// Elapsed simulated time T = dt·steps.
    pub fn elapsed(&self) -> f64 {
        self.dt * self.steps as f64
    }

    pub fn validate(&self) -> ResonantResult<()> {
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(ResonantError::Config(format!(
                "dt must be finite and > 0, got {}",
                self.dt
            )));
        }
        Ok(())
    }
}

/// Everything an evaluator needs besides the program itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    pub bank: BankConfig,
    pub sim: SimConfig,

    /// Per-step noise scale used unless the program overrides it.
    /// Default: 0.001.
    pub noise_std: f64,

    /// Fraction of the run discarded before pair statistics accumulate.
    /// Default: 0.5.
    pub warmup_fraction: f64,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            bank: BankConfig::default(),
            sim: SimConfig::default(),
            noise_std: 0.001,
            warmup_fraction: 0.5,
        }
    }
}

impl ExperimentConfig {
    pub fn validate(&self) -> ResonantResult<()> {
        self.bank.validate()?;
        self.sim.validate()?;
        if !self.noise_std.is_finite() || self.noise_std < 0.0 {
            return Err(ResonantError::Config(format!(
                "noise_std must be finite and >= 0, got {}",
                self.noise_std
            )));
        }
        if !(0.0..1.0).contains(&self.warmup_fraction) {
            return Err(ResonantError::Config(format!(
                "warmup_fraction must be in [0, 1), got {}",
                self.warmup_fraction
            )));
        }
        Ok(())
    }

    /// Load from JSON string and validate.
    pub fn from_json(json: &str) -> ResonantResult<Self> {
        let cfg: Self = serde_json::from_str(json)
            .map_err(|e| ResonantError::Config(format!("JSON parse error: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }
}

/// Search run parameters. Sampling, mutation and evaluation are
/// supplied separately by the search space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Default: 1337.
    pub seed: u64,
    /// Evaluation budget. Zero is valid and yields an empty trace.
    /// Default: 32.
    pub iters: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            seed: 1337,
            iters: 32,
        }
    }
}

impl SearchConfig {
    pub fn new(seed: u64, iters: usize) -> Self {
        Self { seed, iters }
    }

    /// Every seed and budget is accepted, including `iters = 0`, which
    /// yields an empty search result.
    pub fn validate(&self) -> ResonantResult<()> {
        Ok(())
    }

    pub fn from_json(json: &str) -> ResonantResult<Self> {
        let cfg: Self = serde_json::from_str(json)
            .map_err(|e| ResonantError::Config(format!("JSON parse error: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bank_spans_three_to_ten_hz() {
        let bank = BankConfig::default();
        assert_eq!(bank.freqs_hz.len(), 8);
        assert_eq!(bank.freqs_hz[0], 3.0);
        assert_eq!(bank.freqs_hz[7], 10.0);
        assert!(bank.validate().is_ok());
    }

    #[test]
    fn test_empty_bank_rejected() {
        let bank = BankConfig {
            freqs_hz: vec![],
            ..Default::default()
        };
        assert!(matches!(bank.validate(), Err(ResonantError::Config(_))));
    }

    #[test]
    fn test_non_positive_frequency_rejected() {
        let bank = BankConfig {
            freqs_hz: vec![3.0, 0.0],
            ..Default::default()
        };
        let err = bank.validate().unwrap_err().to_string();
        assert!(err.contains("freqs_hz[1]"), "{err}");
    }

    #[test]
    fn test_negative_zeta_rejected() {
        let bank = BankConfig {
            zeta: -0.1,
            ..Default::default()
        };
        assert!(bank.validate().is_err());
    }

    #[test]
    fn test_sim_elapsed() {
        let sim = SimConfig::default();
        assert!((sim.elapsed() - 12.0).abs() < 1e-9);
        let sim = SimConfig::for_duration(12.0, 1.0 / 240.0, 7);
        assert_eq!(sim.steps, 2880);
        assert_eq!(sim.seed, 7);
    }

    #[test]
    fn test_sim_zero_dt_rejected() {
        let sim = SimConfig {
            dt: 0.0,
            ..Default::default()
        };
        assert!(sim.validate().is_err());
    }

    #[test]
    fn test_experiment_from_json_partial() {
        let cfg = ExperimentConfig::from_json(r#"{"noise_std": 0.01, "sim": {"steps": 10}}"#)
            .unwrap();
        assert_eq!(cfg.noise_std, 0.01);
        assert_eq!(cfg.sim.steps, 10);
        assert_eq!(cfg.sim.seed, 1337);
        assert_eq!(cfg.bank, BankConfig::default());
    }

    #[test]
    fn test_experiment_from_json_invalid() {
        assert!(ExperimentConfig::from_json("{not json").is_err());
        assert!(ExperimentConfig::from_json(r#"{"warmup_fraction": 1.5}"#).is_err());
        assert!(ExperimentConfig::from_json(r#"{"bank": {"freqs_hz": []}}"#).is_err());
    }

    #[test]
    fn test_search_config_from_json() {
        let cfg = SearchConfig::from_json(r#"{"iters": 0}"#).unwrap();
        assert_eq!(cfg.iters, 0);
        assert_eq!(cfg.seed, 1337);
        assert!(SearchConfig::from_json(r#"{"iters": -1}"#).is_err());
    }

    #[test]
    fn test_search_config_validate() {
        assert!(SearchConfig::default().validate().is_ok());
        assert!(SearchConfig::new(0, 0).validate().is_ok());
        assert!(SearchConfig::new(u64::MAX, 1).validate().is_ok());
    }
}

// ─────────────────────────────────────────────────────────────────────
// Resonant Addressing Kernel — Metrics Engine
// ─────────────────────────────────────────────────────────────────────
//! Selectivity and crosstalk from final bank energies, plus the pair
//! statistics behind the chirality test.
//!
//!   selectivity = E_target / max(max(E_others), ε)
//!   crosstalk   = mean(E_others) / max(E_target, ε)
//!
//! Pass region: selectivity > selectivity_min AND crosstalk < crosstalk_max.

use resonant_types::{clamp_unit, AddressingMetrics, ResonantError, ResonantResult};

/// Floor applied to denominators so a silent bank never yields NaN/∞.
pub const ENERGY_EPS: f64 = 1e-12;

/// Target energy over the strongest competitor.
pub fn selectivity(target: f64, others: &[f64]) -> f64 {
    let strongest = others.iter().copied().fold(0.0, f64::max);
    target / strongest.max(ENERGY_EPS)
}

/// Mean competitor energy over the target. Zero when there are no others.
pub fn crosstalk(target: f64, others: &[f64]) -> f64 {
    if others.is_empty() {
        return 0.0;
    }
    let mean = others.iter().sum::<f64>() / others.len() as f64;
    mean / target.max(ENERGY_EPS)
}

/// Split bank energies into the target and everything else.
pub fn split_target(energies: &[f64], index: usize) -> ResonantResult<(f64, Vec<f64>)> {
    let target = *energies.get(index).ok_or_else(|| {
        ResonantError::Validation(format!(
            "target index {index} out of range for bank of {}",
            energies.len()
        ))
    })?;
    let others = energies
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != index)
        .map(|(_, &e)| e)
        .collect();
    Ok((target, others))
}

/// Both addressing metrics for node `index`.
pub fn addressing_metrics(energies: &[f64], index: usize) -> ResonantResult<AddressingMetrics> {
    let (target, others) = split_target(energies, index)?;
    Ok(AddressingMetrics {
        selectivity: selectivity(target, &others),
        crosstalk: crosstalk(target, &others),
    })
}

/// Relative energy imbalance |ea − eb| / (ea + eb), in [0, 1].
pub fn drift_ratio(ea: f64, eb: f64) -> f64 {
    (ea - eb).abs() / (ea + eb).max(ENERGY_EPS)
}

/// Running second moments of two displacement traces.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PairLock {
    sum_ab: f64,
    sum_aa: f64,
    sum_bb: f64,
    samples: usize,
}

impl PairLock {
    pub fn push(&mut self, xa: f64, xb: f64) {
        self.sum_ab += xa * xb;
        self.sum_aa += xa * xa;
        self.sum_bb += xb * xb;
        self.samples += 1;
    }

    pub fn samples(&self) -> usize {
        self.samples
    }

    /// Normalized zero-lag correlation in [-1, 1].
    pub fn correlation(&self) -> f64 {
        let norm = (self.sum_aa * self.sum_bb).sqrt();
        if norm < ENERGY_EPS {
            return 0.0;
        }
        (self.sum_ab / norm).clamp(-1.0, 1.0)
    }

    /// Lock after applying the readout sign χa·χb, clamped into [0, 1].
    ///
    /// Anti-correlated readouts count as no lock at all.
    pub fn lock(&self, readout_sign: f64) -> f64 {
        clamp_unit(readout_sign * self.correlation())
    }
}

// ─────────────────────────────────────────────────────────────────────
// Resonant Addressing Kernel — Score and Threshold Types
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

/// Clamp a value to [0, 1], mapping NaN to 0 and Inf to the nearest bound.
#[inline]
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        log::warn!("clamp_unit: NaN detected, clamping to 0.0");
        return 0.0;
    }
    if value.is_infinite() {
        let boundary = if value > 0.0 { 1.0 } else { 0.0 };
        log::warn!("clamp_unit: Inf detected, clamping to {boundary:.1}");
        return boundary;
    }
    value.clamp(0.0, 1.0)
}

/// Acceptance thresholds for single-node addressing (target A2).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AddressingThresholds {
    /// Selectivity must be strictly above this.
    pub selectivity_min: f64,
    /// Crosstalk must be strictly below this.
    pub crosstalk_max: f64,
}

impl Default for AddressingThresholds {
    fn default() -> Self {
        Self {
            selectivity_min: 5.0,
            crosstalk_max: 0.25,
        }
    }
}

/// Acceptance thresholds for the pairwise chirality test (target A31).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChiralityThresholds {
    pub match_lock_min: f64,
    pub mismatch_lock_max: f64,
    pub drift_ratio_max: f64,
}

impl Default for ChiralityThresholds {
    fn default() -> Self {
        Self {
            match_lock_min: 0.8,
            mismatch_lock_max: 0.2,
            drift_ratio_max: 0.25,
        }
    }
}

/// Selectivity/crosstalk pair extracted from final bank energies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AddressingMetrics {
    /// Target energy over the strongest competitor. Larger is cleaner.
    pub selectivity: f64,
    /// Mean competitor energy over the target. Smaller is less leakage.
    pub crosstalk: f64,
}

impl AddressingMetrics {
    /// Canonical pass region: selectivity > min AND crosstalk < max.
    pub fn passes(&self, thresholds: &AddressingThresholds) -> bool {
        self.selectivity > thresholds.selectivity_min && self.crosstalk < thresholds.crosstalk_max
    }
}

/// Readout lock of a chiral pair under its claimed and flipped parity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChiralityMetrics {
    /// Lock under the claimed parity, in [0, 1].
    pub match_lock: f64,
    /// Lock under the flipped parity, in [0, 1].
    pub mismatch_lock: f64,
    /// Relative energy imbalance of the pair at the end of the run.
    pub drift_ratio: f64,
}

impl ChiralityMetrics {
    pub fn passes(&self, thresholds: &ChiralityThresholds) -> bool {
        self.match_lock >= thresholds.match_lock_min
            && self.mismatch_lock <= thresholds.mismatch_lock_max
            && self.drift_ratio <= thresholds.drift_ratio_max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_nan() {
        assert_eq!(clamp_unit(f64::NAN), 0.0);
    }

    #[test]
    fn test_clamp_infinities() {
        assert_eq!(clamp_unit(f64::INFINITY), 1.0);
        assert_eq!(clamp_unit(f64::NEG_INFINITY), 0.0);
    }

    #[test]
    fn test_clamp_out_of_range() {
        assert_eq!(clamp_unit(1.7), 1.0);
        assert_eq!(clamp_unit(-0.3), 0.0);
        assert_eq!(clamp_unit(0.75), 0.75);
    }

    #[test]
    fn test_addressing_pass_region_is_strict() {
        let t = AddressingThresholds::default();
        let pass = AddressingMetrics {
            selectivity: 5.1,
            crosstalk: 0.2,
        };
        assert!(pass.passes(&t));
        let edge = AddressingMetrics {
            selectivity: 5.0,
            crosstalk: 0.2,
        };
        assert!(!edge.passes(&t));
        let leaky = AddressingMetrics {
            selectivity: 9.0,
            crosstalk: 0.25,
        };
        assert!(!leaky.passes(&t));
    }

    #[test]
    fn test_chirality_pass_region() {
        let t = ChiralityThresholds::default();
        let m = ChiralityMetrics {
            match_lock: 0.95,
            mismatch_lock: 0.0,
            drift_ratio: 0.01,
        };
        assert!(m.passes(&t));
        let drifting = ChiralityMetrics {
            drift_ratio: 0.5,
            ..m
        };
        assert!(!drifting.passes(&t));
    }

    #[test]
    fn test_thresholds_reject_foreign_fields() {
        let json = r#"{"selectivity_min": 5.0, "crosstalk_max": 0.25, "drift_ratio_max": 1.0}"#;
        assert!(serde_json::from_str::<AddressingThresholds>(json).is_err());
    }
}

// ─────────────────────────────────────────────────────────────────────
// Resonant Addressing Kernel — Oscillator Physics
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Oscillator physics for resonant addressing: the seeded PRNG stream,
//! the damped oscillator bank, the fixed-step simulation clock and the
//! selectivity/crosstalk metrics computed from final energies.
//!
//! # Reproducibility
//!
//! There is no process-wide generator. Every run owns exactly one
//! [`SeededRng`] and passes it by `&mut` to each consumer, so two runs
//! with the same seed draw the same numbers in the same order.

pub mod harness;
pub mod metrics;
pub mod oscillator;
pub mod params;
pub mod rng;

pub use harness::{run_sim, SimOutput};
pub use metrics::{
    addressing_metrics, crosstalk, drift_ratio, selectivity, split_target, PairLock, ENERGY_EPS,
};
pub use oscillator::{
    make_oscillator_bank, osc_energy, step_oscillators, Oscillator, OscillatorBank,
};
pub use params::{ADDRESSING_DRIVE_HZ, ADDRESSING_FREQS_HZ, ADDRESSING_NODE};
pub use rng::SeededRng;

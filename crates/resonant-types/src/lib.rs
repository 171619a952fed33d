// ─────────────────────────────────────────────────────────────────────
// Resonant Addressing Kernel — Types
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Type definitions, configuration, and error hierarchy shared by the
//! oscillator physics, the wave-program compiler and the search engine.

pub mod config;
pub mod error;
pub mod score;

pub use config::{BankConfig, ExperimentConfig, SearchConfig, SimConfig};
pub use error::{ResonantError, ResonantResult};
pub use score::{
    clamp_unit, AddressingMetrics, AddressingThresholds, ChiralityMetrics, ChiralityThresholds,
};

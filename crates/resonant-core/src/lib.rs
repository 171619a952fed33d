// ─────────────────────────────────────────────────────────────────────
// Resonant Addressing Kernel — Core
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Closed-loop evaluation of wave programs against an oscillator bank.
//!
//! Architecture:
//!   - scenario: program → drive → bank → metrics → verdict
//!   - search: seeded random search and greedy hillclimb
//!   - intent_search: A2 intent space scored by selectivity
//!   - attribution: ablation battery with causal-necessity labels

pub mod attribution;
pub mod intent_search;
pub mod scenario;
pub mod search;

pub use attribution::{run_ablation_battery, run_ablations, AblationEntry, AblationReport};
pub use intent_search::AddressingIntentSpace;
pub use scenario::{AddressingOutcome, ChiralityOutcome, Experiment, ScenarioOutcome};
pub use search::{
    hillclimb, random_search, Fitness, FitnessReport, FnSearchSpace, SearchResult, SearchSpace,
};

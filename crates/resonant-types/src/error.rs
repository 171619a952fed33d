// ─────────────────────────────────────────────────────────────────────
// Resonant Addressing Kernel — Error Hierarchy
// ─────────────────────────────────────────────────────────────────────

use thiserror::Error;

/// Root error type for all kernel failures.
///
/// Only caller misconfiguration and malformed external input surface
/// here. The interpreter, metrics and ablation paths are infallible.
#[derive(Error, Debug)]
pub enum ResonantError {
    /// Invalid bank, simulation, experiment or search configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Input that violates an evaluator precondition (node index, target).
    #[error("validation error: {0}")]
    Validation(String),

    /// Numerical error (NaN/Inf in computation).
    #[error("numerical error: {0}")]
    Numerical(String),

    /// Compile bundle could not be encoded or decoded.
    #[error("bundle error: {0}")]
    Bundle(String),
}

pub type ResonantResult<T> = Result<T, ResonantError>;

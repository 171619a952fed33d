// ─────────────────────────────────────────────────────────────────────
// Resonant Addressing Kernel — Fixed-Step Simulation Harness
// ─────────────────────────────────────────────────────────────────────
//! Generic fixed-step clock. The harness knows nothing about
//! oscillators: the caller owns the model state and lends it in by
//! `&mut` for the duration of the run.

use resonant_types::SimConfig;

/// Result of one harness run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimOutput<M> {
    /// Whatever `finalize` returned.
    pub metrics: M,
    /// Simulated time covered, dt·steps.
    pub elapsed: f64,
}

/// Call `step_fn(state, i, i·dt)` for i in [0, steps), then
/// `finalize(state)` exactly once.
///
/// Time is computed as `i·dt` rather than accumulated, so no rounding
/// drift builds up over long runs.
pub fn run_sim<S, M, F, G>(
    cfg: &SimConfig,
    state: &mut S,
    mut step_fn: F,
    finalize: G,
) -> SimOutput<M>
where
    F: FnMut(&mut S, usize, f64),
    G: FnOnce(&S) -> M,
{
    for i in 0..cfg.steps {
        step_fn(state, i, i as f64 * cfg.dt);
    }
    SimOutput {
        metrics: finalize(state),
        elapsed: cfg.elapsed(),
    }
}

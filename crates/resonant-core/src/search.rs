// ─────────────────────────────────────────────────────────────────────
// Resonant Addressing Kernel — Seeded Search Engine
// ─────────────────────────────────────────────────────────────────────
//! Random search and greedy hillclimbing over an abstract candidate
//! space, using any evaluator as the fitness oracle.
//!
//! Both strategies own one [`SeededRng`] per run, created from
//! `SearchConfig::seed`, and draw from it in a fixed order:
//!
//! - random search: `sample`, `evaluate`, repeated `iters` times;
//! - hillclimb: `sample`, `evaluate`, then `mutate`, `evaluate` for
//!   rounds 1..iters, accepting iff the new fitness is ≥ the best.
//!
//! Both spend exactly `iters` evaluations and record the running best
//! after each one, so `trace_best_scalar` is non-decreasing and has
//! length `iters`. `iters = 0` returns an empty result without touching
//! the space or the stream.

use std::collections::BTreeMap;
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

use resonant_physics::SeededRng;
use resonant_types::SearchConfig;

/// Anything that exposes one comparable scalar.
pub trait Fitness {
    /// Comparison key; larger is better.
    fn primary(&self) -> f64;

    /// Optional acceptance verdict carried alongside the scalar.
    fn passed(&self) -> Option<bool> {
        None
    }
}

impl Fitness for f64 {
    fn primary(&self) -> f64 {
        *self
    }
}

/// Structured fitness: primary scalar, optional verdict, free-form
/// diagnostics. Accepts `"score"` as an alias for `"primary"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitnessReport {
    #[serde(alias = "score")]
    pub primary: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pass: Option<bool>,
    #[serde(default)]
    pub diagnostics: BTreeMap<String, f64>,
}

impl FitnessReport {
    pub fn new(primary: f64) -> Self {
        Self {
            primary,
            pass: None,
            diagnostics: BTreeMap::new(),
        }
    }

    pub fn with_pass(mut self, pass: bool) -> Self {
        self.pass = Some(pass);
        self
    }

    pub fn with_diagnostic(mut self, key: impl Into<String>, value: f64) -> Self {
        self.diagnostics.insert(key.into(), value);
        self
    }
}

impl Fitness for FitnessReport {
    fn primary(&self) -> f64 {
        self.primary
    }

    fn passed(&self) -> Option<bool> {
        self.pass
    }
}

/// Candidate space explored by the search strategies.
pub trait SearchSpace {
    type Candidate: Clone;
    type Fitness: Fitness + Clone;

    /// Draw a fresh candidate.
    fn sample(&mut self, rng: &mut SeededRng) -> Self::Candidate;

    /// Propose a neighbour of the current best. `iteration` counts from 1.
    fn mutate(
        &mut self,
        rng: &mut SeededRng,
        best: &Self::Candidate,
        iteration: usize,
    ) -> Self::Candidate;

    fn evaluate(&mut self, candidate: &Self::Candidate) -> Self::Fitness;
}

/// Closure-backed [`SearchSpace`].
pub struct FnSearchSpace<C, F, S, M, E> {
    sample: S,
    mutate: M,
    evaluate: E,
    _marker: PhantomData<fn() -> (C, F)>,
}

impl<C, F, S, M, E> FnSearchSpace<C, F, S, M, E>
where
    S: FnMut(&mut SeededRng) -> C,
    M: FnMut(&mut SeededRng, &C, usize) -> C,
    E: FnMut(&C) -> F,
{
    pub fn new(sample: S, mutate: M, evaluate: E) -> Self {
        Self {
            sample,
            mutate,
            evaluate,
            _marker: PhantomData,
        }
    }
}

impl<C, F, S, M, E> SearchSpace for FnSearchSpace<C, F, S, M, E>
where
    C: Clone,
    F: Fitness + Clone,
    S: FnMut(&mut SeededRng) -> C,
    M: FnMut(&mut SeededRng, &C, usize) -> C,
    E: FnMut(&C) -> F,
{
    type Candidate = C;
    type Fitness = F;

    fn sample(&mut self, rng: &mut SeededRng) -> C {
        (self.sample)(rng)
    }

    fn mutate(&mut self, rng: &mut SeededRng, best: &C, iteration: usize) -> C {
        (self.mutate)(rng, best, iteration)
    }

    fn evaluate(&mut self, candidate: &C) -> F {
        (self.evaluate)(candidate)
    }
}

/// Result of one search run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult<C, F> {
    pub best_candidate: Option<C>,
    pub best_fitness: Option<F>,
    /// Primary scalar of `best_fitness`, or −∞ when nothing was evaluated.
    pub best_scalar: f64,
    /// Running best after each evaluation; non-decreasing.
    pub trace_best_scalar: Vec<f64>,
    pub evaluations: usize,
}

impl<C, F> SearchResult<C, F> {
    fn empty(capacity: usize) -> Self {
        Self {
            best_candidate: None,
            best_fitness: None,
            best_scalar: f64::NEG_INFINITY,
            trace_best_scalar: Vec::with_capacity(capacity),
            evaluations: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.evaluations == 0
    }

    fn record(&mut self) {
        self.evaluations += 1;
        self.trace_best_scalar.push(self.best_scalar);
    }

    fn accept(&mut self, candidate: C, fitness: F, scalar: f64) {
        self.best_candidate = Some(candidate);
        self.best_fitness = Some(fitness);
        self.best_scalar = scalar;
    }
}

/// Comparison key with NaN mapped to −∞ so it can never win.
fn comparable<F: Fitness>(fitness: &F) -> f64 {
    let value = fitness.primary();
    if value.is_nan() {
        log::warn!("search: NaN fitness treated as -inf");
        return f64::NEG_INFINITY;
    }
    value
}

/// Independent draws: keep the best of `iters` sampled candidates.
pub fn random_search<S: SearchSpace>(
    cfg: &SearchConfig,
    space: &mut S,
) -> SearchResult<S::Candidate, S::Fitness> {
    let mut rng = SeededRng::new(cfg.seed);
    let mut result = SearchResult::empty(cfg.iters);

    for _ in 0..cfg.iters {
        let candidate = space.sample(&mut rng);
        let fitness = space.evaluate(&candidate);
        let scalar = comparable(&fitness);
        if result.best_candidate.is_none() || scalar > result.best_scalar {
            result.accept(candidate, fitness, scalar);
        }
        result.record();
    }

    log::info!(
        "random_search seed={} iters={} best={:.6}",
        cfg.seed,
        cfg.iters,
        result.best_scalar
    );
    result
}

/// Greedy ratchet: mutate the current best, keep the proposal iff its
/// fitness is at least as good. No temperature, no restarts.
pub fn hillclimb<S: SearchSpace>(
    cfg: &SearchConfig,
    space: &mut S,
) -> SearchResult<S::Candidate, S::Fitness> {
    let mut result = SearchResult::empty(cfg.iters);
    if cfg.iters == 0 {
        return result;
    }
    let mut rng = SeededRng::new(cfg.seed);

    let start = space.sample(&mut rng);
    let fitness = space.evaluate(&start);
    let scalar = comparable(&fitness);
    result.accept(start, fitness, scalar);
    result.record();

    for i in 1..cfg.iters {
        let proposal = match result.best_candidate.as_ref() {
            Some(best) => space.mutate(&mut rng, best, i),
            None => break,
        };
        let fitness = space.evaluate(&proposal);
        let scalar = comparable(&fitness);
        if scalar >= result.best_scalar {
            log::debug!(
                "hillclimb iter={i} accepted {scalar:.6} >= {:.6}",
                result.best_scalar
            );
            result.accept(proposal, fitness, scalar);
        }
        result.record();
    }

    log::info!(
        "hillclimb seed={} iters={} best={:.6}",
        cfg.seed,
        cfg.iters,
        result.best_scalar
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Integers 0..=7 with a single peak at 5; mutation steps ±1.
    fn ladder() -> impl SearchSpace<Candidate = i64, Fitness = f64> {
        FnSearchSpace::new(
            |rng: &mut SeededRng| rng.next_index(8) as i64,
            |rng: &mut SeededRng, best: &i64, _i: usize| {
                let step = if rng.next_bool() { 1 } else { -1 };
                (best + step).clamp(0, 7)
            },
            |x: &i64| -((x - 5) as f64).powi(2),
        )
    }

    fn non_decreasing(trace: &[f64]) -> bool {
        trace.windows(2).all(|w| w[1] >= w[0])
    }

    #[test]
    fn test_zero_iters_is_empty() {
        let cfg = SearchConfig::new(1, 0);
        let calls = std::cell::Cell::new(0);
        let mut space = FnSearchSpace::new(
            |_: &mut SeededRng| {
                calls.set(calls.get() + 1);
                0.0f64
            },
            |_: &mut SeededRng, b: &f64, _: usize| *b,
            |x: &f64| *x,
        );
        for result in [random_search(&cfg, &mut space), hillclimb(&cfg, &mut space)] {
            assert!(result.is_empty());
            assert!(result.trace_best_scalar.is_empty());
            assert_eq!(result.best_candidate, None);
            assert_eq!(result.best_scalar, f64::NEG_INFINITY);
        }
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_hillclimb_deterministic() {
        let cfg = SearchConfig::new(1337, 40);
        let a = hillclimb(&cfg, &mut ladder());
        let b = hillclimb(&cfg, &mut ladder());
        assert_eq!(a.best_candidate, b.best_candidate);
        assert_eq!(a.trace_best_scalar, b.trace_best_scalar);
    }

    #[test]
    fn test_random_search_deterministic() {
        let cfg = SearchConfig::new(99, 16);
        let a = random_search(&cfg, &mut ladder());
        let b = random_search(&cfg, &mut ladder());
        assert_eq!(a, b);
    }

    #[test]
    fn test_traces_non_decreasing_with_full_length() {
        for seed in [1, 2, 3, 1337] {
            let cfg = SearchConfig::new(seed, 25);
            let hc = hillclimb(&cfg, &mut ladder());
            let rs = random_search(&cfg, &mut ladder());
            assert_eq!(hc.trace_best_scalar.len(), 25);
            assert_eq!(rs.trace_best_scalar.len(), 25);
            assert_eq!(hc.evaluations, 25);
            assert!(non_decreasing(&hc.trace_best_scalar));
            assert!(non_decreasing(&rs.trace_best_scalar));
            assert_eq!(*hc.trace_best_scalar.last().unwrap(), hc.best_scalar);
        }
    }

    #[test]
    fn test_hillclimb_at_least_random_search() {
        for seed in [1, 7, 42, 1337] {
            let cfg = SearchConfig::new(seed, 40);
            let hc = hillclimb(&cfg, &mut ladder());
            let rs = random_search(&cfg, &mut ladder());
            assert_eq!(hc.best_candidate, Some(5), "seed={seed}");
            assert!(hc.best_scalar >= rs.best_scalar, "seed={seed}");
        }
    }

    #[test]
    fn test_hillclimb_mutates_current_best_with_iteration_index() {
        let seen = std::cell::RefCell::new(Vec::new());
        let mut space = FnSearchSpace::new(
            |_: &mut SeededRng| 0.0f64,
            |_: &mut SeededRng, best: &f64, i: usize| {
                seen.borrow_mut().push((*best, i));
                best + 1.0
            },
            |x: &f64| *x,
        );
        let result = hillclimb(&SearchConfig::new(0, 4), &mut space);
        assert_eq!(*seen.borrow(), vec![(0.0, 1), (1.0, 2), (2.0, 3)]);
        assert_eq!(result.best_candidate, Some(3.0));
    }

    #[test]
    fn test_hillclimb_accepts_ties() {
        let mut space = FnSearchSpace::new(
            |_: &mut SeededRng| 0u32,
            |_: &mut SeededRng, best: &u32, _: usize| best + 1,
            |_: &u32| 1.0f64,
        );
        let result = hillclimb(&SearchConfig::new(0, 5), &mut space);
        assert_eq!(result.best_candidate, Some(4));
    }

    #[test]
    fn test_nan_fitness_never_wins() {
        let mut space = FnSearchSpace::new(
            |rng: &mut SeededRng| rng.next_index(4),
            |_: &mut SeededRng, best: &usize, _: usize| *best,
            |x: &usize| if *x == 0 { f64::NAN } else { *x as f64 },
        );
        let result = random_search(&SearchConfig::new(5, 30), &mut space);
        assert_eq!(result.best_candidate, Some(3));
        assert!(non_decreasing(&result.trace_best_scalar));
    }

    #[test]
    fn test_fitness_report_score_alias() {
        let report: FitnessReport =
            serde_json::from_str(r#"{"score": 2.5, "pass": true, "diagnostics": {"x": 1.0}}"#)
                .unwrap();
        assert_eq!(report.primary(), 2.5);
        assert_eq!(report.passed(), Some(true));
        let report: FitnessReport = serde_json::from_str(r#"{"primary": 1.0}"#).unwrap();
        assert_eq!(report.passed(), None);
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn test_structured_fitness_search() {
        let mut space = FnSearchSpace::new(
            |rng: &mut SeededRng| rng.uniform(0.0, 1.0),
            |rng: &mut SeededRng, best: &f64, _: usize| {
                (best + 0.1 * rng.next_normal()).clamp(0.0, 1.0)
            },
            |x: &f64| FitnessReport::new(*x).with_pass(*x > 0.5).with_diagnostic("x", *x),
        );
        let result = hillclimb(&SearchConfig::new(3, 20), &mut space);
        let best = result.best_fitness.unwrap();
        assert_eq!(best.primary, result.best_scalar);
        assert_eq!(best.diagnostics["x"], best.primary);
    }
}

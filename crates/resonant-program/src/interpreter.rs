// ─────────────────────────────────────────────────────────────────────
// Resonant Addressing Kernel — Program Interpreter
// ─────────────────────────────────────────────────────────────────────
//! Resolves a [`WaveProgram`] at time t into a [`ProgramState`] and the
//! scalar drive
//!
//!   u(t) = active ? amp·sin(2π·ω·t + φ) : 0
//!
//! Resolution is a left fold over the tokens:
//! - each kind overwrites only the fields it owns (last token wins);
//! - env tokens patch only the sub-fields they carry;
//! - τ windows are OR'd, and a program without windows is always active.
//!
//! The fold keeps no state between calls, so one program can be
//! evaluated from any number of simulation runs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use resonant_types::clamp_unit;

use crate::token::{EnvPatch, Parity, Token, WaveProgram};

/// Mode used when no `m` token is present.
pub const DEFAULT_MODE: &str = "plane";

/// Fully resolved program state at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramState {
    pub omega_hz: f64,
    pub amp: f64,
    pub phase_rad: f64,
    pub parity: Parity,
    pub mode: String,
    pub mode_params: BTreeMap<String, f64>,
    /// Always within [0, 1].
    pub gate01: f64,
    pub noise_std: Option<f64>,
    pub drift: Option<f64>,
    /// Derived from the τ windows; never read from the defaults.
    pub active: bool,
}

impl Default for ProgramState {
    fn default() -> Self {
        Self {
            omega_hz: 1.0,
            amp: 1.0,
            phase_rad: 0.0,
            parity: Parity::Positive,
            mode: DEFAULT_MODE.to_string(),
            mode_params: BTreeMap::new(),
            gate01: 1.0,
            noise_std: None,
            drift: None,
            active: true,
        }
    }
}

/// Interpreter output: drive value plus the state that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramEval {
    pub u: f64,
    pub state: ProgramState,
}

/// Evaluate `program` at `t` from the built-in defaults.
pub fn apply_program_at_time(program: &WaveProgram, t: f64) -> ProgramEval {
    apply_program_with_defaults(program, t, &ProgramState::default())
}

/// Evaluate `program` at `t` starting from caller-supplied defaults.
///
/// `defaults.active` is ignored; activity comes from the τ windows only.
pub fn apply_program_with_defaults(
    program: &WaveProgram,
    t: f64,
    defaults: &ProgramState,
) -> ProgramEval {
    let mut acc = Resolution {
        state: ProgramState {
            gate01: clamp_unit(defaults.gate01),
            ..defaults.clone()
        },
        saw_window: false,
        in_window: false,
    };
    for token in &program.tokens {
        acc.apply(token, t);
    }
    let state = acc.finish();

    let u = if state.active {
        state.amp * (std::f64::consts::TAU * state.omega_hz * t + state.phase_rad).sin()
    } else {
        0.0
    };
    ProgramEval { u, state }
}

/// Fold accumulator.
struct Resolution {
    state: ProgramState,
    saw_window: bool,
    in_window: bool,
}

impl Resolution {
    fn apply(&mut self, token: &Token, t: f64) {
        match token {
            Token::Omega { hz } => self.state.omega_hz = *hz,
            Token::Amp { value } => self.state.amp = *value,
            Token::Phase { rad } => self.state.phase_rad = *rad,
            Token::Parity { value } => self.state.parity = *value,
            Token::Mode { mode, params } => {
                self.state.mode = mode.clone();
                self.state.mode_params = params.clone();
            }
            Token::Window { t0, t1 } => {
                self.saw_window = true;
                self.in_window |= *t0 <= t && t < *t1;
            }
            Token::Env(patch) => self.patch_env(patch),
        }
    }

    fn patch_env(&mut self, patch: &EnvPatch) {
        if let Some(noise_std) = patch.noise_std {
            self.state.noise_std = Some(noise_std);
        }
        if let Some(drift) = patch.drift {
            self.state.drift = Some(drift);
        }
        if let Some(gate) = patch.gate01 {
            if !(0.0..=1.0).contains(&gate) {
                log::debug!("env gate01={gate} clamped into [0, 1]");
            }
            self.state.gate01 = clamp_unit(gate);
        }
    }

    fn finish(mut self) -> ProgramState {
        self.state.active = !self.saw_window || self.in_window;
        self.state
    }
}

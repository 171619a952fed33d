// ─────────────────────────────────────────────────────────────────────
// Resonant Addressing Kernel — Intent Compiler
// ─────────────────────────────────────────────────────────────────────
//! Compiles a declarative [`Intent`] into a [`WaveProgram`], the
//! acceptance thresholds for its target, and provenance metadata.
//!
//! Two compiles of the same intent differ only in `meta.created_utc`;
//! the bundle JSON is byte-identical once that field is normalized.
//! Map-valued fields are `BTreeMap`s so key order never varies.
//!
//! Node indices are not checked here. Whether `nodeIndex` or `a`/`b`
//! exist in a bank is the evaluator's precondition.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use resonant_types::{AddressingThresholds, ChiralityThresholds, ResonantError, ResonantResult};

use crate::token::{EnvPatch, Parity, Token, WaveProgram};

pub const COMPILER_VERSION: &str = "v0";

/// Value written over `created_utc` before bundles are diffed or cached.
pub const CREATED_UTC_SENTINEL: &str = "1970-01-01T00:00:00Z";

/// Drive frequency (Hz) emitted for the chirality pair test.
pub const PAIR_DRIVE_HZ: f64 = 5.0;

/// Mode name emitted for the chirality pair test.
pub const CHIRAL_PAIR_MODE: &str = "chiral_pair";

/// Compile target discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompileTarget {
    A2,
    A31,
}

/// Drive a single node of the bank (target A2).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressingIntent {
    /// Experiment context only; never emitted into the program.
    pub node_index: usize,
    pub omega_hz: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amp: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gate: Option<f64>,
}

/// Pairwise chirality-match test between nodes `a` and `b` (target A31).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChiralityIntent {
    pub a: usize,
    pub b: usize,
    pub chirality_a: Parity,
    pub chirality_b: Parity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gate: Option<f64>,
}

/// Target-specific part of an intent, tagged by `"target"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "target")]
pub enum IntentTarget {
    A2(AddressingIntent),
    A31(ChiralityIntent),
}

/// High-level experiment description consumed by the compiler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    #[serde(flatten)]
    pub target: IntentTarget,
    pub seed: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Intent {
    pub fn a2(node_index: usize, omega_hz: f64, seed: u64) -> Self {
        Self {
            target: IntentTarget::A2(AddressingIntent {
                node_index,
                omega_hz,
                amp: None,
                phase: None,
                gate: None,
            }),
            seed,
            note: None,
        }
    }

    pub fn a31(a: usize, b: usize, chirality_a: Parity, chirality_b: Parity, seed: u64) -> Self {
        Self {
            target: IntentTarget::A31(ChiralityIntent {
                a,
                b,
                chirality_a,
                chirality_b,
                gate: None,
            }),
            seed,
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn compile_target(&self) -> CompileTarget {
        match self.target {
            IntentTarget::A2(_) => CompileTarget::A2,
            IntentTarget::A31(_) => CompileTarget::A31,
        }
    }

    /// Load from JSON string.
    pub fn from_json(json: &str) -> ResonantResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| ResonantError::Validation(format!("intent JSON parse error: {e}")))
    }
}

/// Thresholds in the shape owned by the compile target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Thresholds {
    A2(AddressingThresholds),
    A31(ChiralityThresholds),
}

impl Thresholds {
    pub fn target(&self) -> CompileTarget {
        match self {
            Thresholds::A2(_) => CompileTarget::A2,
            Thresholds::A31(_) => CompileTarget::A31,
        }
    }
}

/// Provenance carried alongside every compiled program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompileMeta {
    pub target: CompileTarget,
    pub seed: u64,
    pub created_utc: String,
    pub compiler_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Compiler output; serializes directly as the bundle JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompileOutputs {
    pub program: WaveProgram,
    pub thresholds: Thresholds,
    pub meta: CompileMeta,
}

/// Compile `intent`, stamping the current UTC time.
pub fn compile_intent(intent: &Intent) -> CompileOutputs {
    compile_intent_at(intent, Utc::now())
}

/// Compile `intent` with an explicit creation time.
pub fn compile_intent_at(intent: &Intent, created: DateTime<Utc>) -> CompileOutputs {
    let (program, thresholds) = match &intent.target {
        IntentTarget::A2(a2) => (
            compile_addressing(a2),
            Thresholds::A2(AddressingThresholds::default()),
        ),
        IntentTarget::A31(a31) => (
            compile_chirality(a31),
            Thresholds::A31(ChiralityThresholds::default()),
        ),
    };
    CompileOutputs {
        program,
        thresholds,
        meta: CompileMeta {
            target: intent.compile_target(),
            seed: intent.seed,
            created_utc: created.to_rfc3339_opts(SecondsFormat::Secs, true),
            compiler_version: COMPILER_VERSION.to_string(),
            note: intent.note.clone(),
        },
    }
}

fn compile_addressing(intent: &AddressingIntent) -> WaveProgram {
    WaveProgram::named(
        "a2_addressing",
        vec![
            Token::Omega {
                hz: intent.omega_hz,
            },
            Token::Amp {
                value: intent.amp.unwrap_or(1.0),
            },
            Token::Phase {
                rad: intent.phase.unwrap_or(0.0),
            },
            Token::Env(EnvPatch::gate(intent.gate.unwrap_or(1.0))),
        ],
    )
}

fn compile_chirality(intent: &ChiralityIntent) -> WaveProgram {
    let mut params = BTreeMap::new();
    params.insert("a".to_string(), intent.a as f64);
    params.insert("b".to_string(), intent.b as f64);
    WaveProgram::named(
        "a31_chirality",
        vec![
            Token::Omega { hz: PAIR_DRIVE_HZ },
            Token::Amp { value: 1.0 },
            Token::Phase { rad: 0.0 },
            Token::Parity {
                value: intent.chirality_a.times(intent.chirality_b),
            },
            Token::Mode {
                mode: CHIRAL_PAIR_MODE.to_string(),
                params,
            },
            Token::Env(EnvPatch::gate(intent.gate.unwrap_or(1.0))),
        ],
    )
}

/// Serialize as `{program:{tokens:[...]}, thresholds, meta}`.
pub fn to_compile_bundle_json(out: &CompileOutputs) -> ResonantResult<String> {
    serde_json::to_string(out).map_err(|e| ResonantError::Bundle(format!("encode failed: {e}")))
}

/// Copy of `out` with `created_utc` replaced by [`CREATED_UTC_SENTINEL`].
pub fn normalize_created_utc(out: &CompileOutputs) -> CompileOutputs {
    let mut normalized = out.clone();
    normalized.meta.created_utc = CREATED_UTC_SENTINEL.to_string();
    normalized
}

/// Parse a bundle produced by [`to_compile_bundle_json`].
///
/// The threshold shape must agree with `meta.target`.
pub fn from_compile_bundle_json(json: &str) -> ResonantResult<CompileOutputs> {
    let out: CompileOutputs = serde_json::from_str(json)
        .map_err(|e| ResonantError::Bundle(format!("decode failed: {e}")))?;
    if out.thresholds.target() != out.meta.target {
        return Err(ResonantError::Bundle(format!(
            "thresholds shape {:?} does not match meta.target {:?}",
            out.thresholds.target(),
            out.meta.target
        )));
    }
    Ok(out)
}

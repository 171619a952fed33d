// ─────────────────────────────────────────────────────────────────────
// Resonant Addressing Kernel — Wave Programs
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Wave token programs and everything that produces or transforms them.
//!
//! Architecture:
//!   - token: closed set of seven token kinds + ordered program
//!   - interpreter: pure fold resolving a program at time t → drive u(t)
//!   - compiler: Intent → {program, thresholds, meta} + bundle JSON
//!   - ablation: leave-one-out feature removal for causal attribution

pub mod ablation;
pub mod compiler;
pub mod interpreter;
pub mod token;

pub use ablation::{ablate_program, make_ablations, Ablation};
pub use compiler::{
    compile_intent, compile_intent_at, from_compile_bundle_json, normalize_created_utc,
    to_compile_bundle_json, AddressingIntent, ChiralityIntent, CompileMeta, CompileOutputs,
    CompileTarget, Intent, IntentTarget, Thresholds, COMPILER_VERSION, CREATED_UTC_SENTINEL,
};
pub use interpreter::{
    apply_program_at_time, apply_program_with_defaults, ProgramEval, ProgramState,
};
pub use token::{EnvPatch, Parity, Token, TokenKind, WaveProgram};

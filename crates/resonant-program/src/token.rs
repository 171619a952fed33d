// ─────────────────────────────────────────────────────────────────────
// Resonant Addressing Kernel — Wave Token Model
// ─────────────────────────────────────────────────────────────────────
//! The closed set of seven token kinds and the ordered program that
//! carries them.
//!
//! JSON form: `{"k": "<symbol>", ...fields}`, e.g. `{"k":"ω","hz":7.0}`.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Sign carried by `p` tokens and by chirality fields. JSON `1` / `-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum Parity {
    Positive,
    Negative,
}

impl Parity {
    pub fn sign(self) -> f64 {
        match self {
            Parity::Positive => 1.0,
            Parity::Negative => -1.0,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Parity::Positive => Parity::Negative,
            Parity::Negative => Parity::Positive,
        }
    }

    /// Product of two signs.
    pub fn times(self, other: Parity) -> Parity {
        if self == other {
            Parity::Positive
        } else {
            Parity::Negative
        }
    }
}

impl From<Parity> for i8 {
    fn from(p: Parity) -> i8 {
        match p {
            Parity::Positive => 1,
            Parity::Negative => -1,
        }
    }
}

impl TryFrom<i8> for Parity {
    type Error = String;

    fn try_from(v: i8) -> Result<Self, Self::Error> {
        match v {
            1 => Ok(Parity::Positive),
            -1 => Ok(Parity::Negative),
            other => Err(format!("parity must be 1 or -1, got {other}")),
        }
    }
}

/// Partial environment override. Only the provided fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub noise_std: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drift: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gate01: Option<f64>,
}

impl EnvPatch {
    pub fn gate(gate01: f64) -> Self {
        Self {
            gate01: Some(gate01),
            ..Default::default()
        }
    }
}

/// One wave-program token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "k")]
pub enum Token {
    /// Drive frequency (Hz).
    #[serde(rename = "ω")]
    Omega { hz: f64 },
    /// Drive amplitude.
    #[serde(rename = "A")]
    Amp { value: f64 },
    /// Drive phase offset (rad).
    #[serde(rename = "φ")]
    Phase { rad: f64 },
    #[serde(rename = "p")]
    Parity { value: Parity },
    /// Named mode with free numeric parameters.
    #[serde(rename = "m")]
    Mode {
        mode: String,
        #[serde(default)]
        params: BTreeMap<String, f64>,
    },
    /// Activity window `[t0, t1)`.
    #[serde(rename = "τ")]
    Window { t0: f64, t1: f64 },
    #[serde(rename = "env")]
    Env(EnvPatch),
}

impl Token {
    pub fn kind(&self) -> TokenKind {
        match self {
            Token::Omega { .. } => TokenKind::Omega,
            Token::Amp { .. } => TokenKind::Amp,
            Token::Phase { .. } => TokenKind::Phase,
            Token::Parity { .. } => TokenKind::Parity,
            Token::Mode { .. } => TokenKind::Mode,
            Token::Window { .. } => TokenKind::Window,
            Token::Env(_) => TokenKind::Env,
        }
    }

    /// True for env tokens that override the gate.
    pub fn carries_gate(&self) -> bool {
        matches!(self, Token::Env(EnvPatch { gate01: Some(_), .. }))
    }
}

/// Fieldless mirror of [`Token`] used by ablations and counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TokenKind {
    #[serde(rename = "ω")]
    Omega,
    #[serde(rename = "A")]
    Amp,
    #[serde(rename = "φ")]
    Phase,
    #[serde(rename = "p")]
    Parity,
    #[serde(rename = "m")]
    Mode,
    #[serde(rename = "τ")]
    Window,
    #[serde(rename = "env")]
    Env,
}

impl TokenKind {
    pub const ALL: [TokenKind; 7] = [
        TokenKind::Omega,
        TokenKind::Amp,
        TokenKind::Phase,
        TokenKind::Parity,
        TokenKind::Mode,
        TokenKind::Window,
        TokenKind::Env,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            TokenKind::Omega => "ω",
            TokenKind::Amp => "A",
            TokenKind::Phase => "φ",
            TokenKind::Parity => "p",
            TokenKind::Mode => "m",
            TokenKind::Window => "τ",
            TokenKind::Env => "env",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.symbol() == symbol)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Ordered token sequence. Order matters: later tokens of a kind
/// override earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WaveProgram {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub tokens: Vec<Token>,
}

impl WaveProgram {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { name: None, tokens }
    }

    pub fn named(name: impl Into<String>, tokens: Vec<Token>) -> Self {
        Self {
            name: Some(name.into()),
            tokens,
        }
    }

    pub fn count_kind(&self, kind: TokenKind) -> usize {
        self.tokens.iter().filter(|t| t.kind() == kind).count()
    }

    /// Distinct kinds present, in `TokenKind` order.
    pub fn kinds(&self) -> Vec<TokenKind> {
        TokenKind::ALL
            .into_iter()
            .filter(|&k| self.count_kind(k) > 0)
            .collect()
    }

    pub fn has_windows(&self) -> bool {
        self.count_kind(TokenKind::Window) > 0
    }
}

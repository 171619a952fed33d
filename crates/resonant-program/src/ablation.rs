// ─────────────────────────────────────────────────────────────────────
// Resonant Addressing Kernel — Ablation Generator
// ─────────────────────────────────────────────────────────────────────
//! Declarative feature removal for causal attribution. An ablation
//! never touches its source program; it returns a filtered copy.

use serde::{Deserialize, Serialize};

use crate::token::{Token, TokenKind, WaveProgram};

/// What to remove from a program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ablation {
    pub label: String,
    /// Drop every token of this kind.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drop_token_kind: Option<TokenKind>,
    /// Drop env tokens that carry a gate override.
    #[serde(default)]
    pub drop_gate_env: bool,
    /// Drop every τ window.
    #[serde(default)]
    pub drop_time_windows: bool,
}

impl Ablation {
    pub fn drop_kind(kind: TokenKind) -> Self {
        Self {
            label: format!("drop_{}", kind.symbol()),
            drop_token_kind: Some(kind),
            drop_gate_env: false,
            drop_time_windows: false,
        }
    }

    pub fn drop_gate_env() -> Self {
        Self {
            label: "drop_gate_env".to_string(),
            drop_token_kind: None,
            drop_gate_env: true,
            drop_time_windows: false,
        }
    }

    pub fn drop_time_windows() -> Self {
        Self {
            label: "drop_time_windows".to_string(),
            drop_token_kind: None,
            drop_gate_env: false,
            drop_time_windows: true,
        }
    }

    fn removes(&self, token: &Token) -> bool {
        self.drop_token_kind == Some(token.kind())
            || (self.drop_gate_env && token.carries_gate())
            || (self.drop_time_windows && token.kind() == TokenKind::Window)
    }
}

/// Filtered copy of `program`; surviving tokens keep their order.
pub fn ablate_program(program: &WaveProgram, ablation: &Ablation) -> WaveProgram {
    let name = match &program.name {
        Some(name) => format!("{name}+{}", ablation.label),
        None => ablation.label.clone(),
    };
    WaveProgram {
        name: Some(name),
        tokens: program
            .tokens
            .iter()
            .filter(|t| !ablation.removes(t))
            .cloned()
            .collect(),
    }
}

/// Leave-one-out battery: one single-kind ablation per token kind.
pub fn make_ablations() -> Vec<Ablation> {
    TokenKind::ALL.into_iter().map(Ablation::drop_kind).collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::token::{EnvPatch, Parity};

    fn base() -> WaveProgram {
        WaveProgram::named(
            "base",
            vec![
                Token::Omega { hz: 7.0 },
                Token::Amp { value: 1.0 },
                Token::Window { t0: 0.0, t1: 6.0 },
                Token::Env(EnvPatch {
                    noise_std: Some(0.001),
                    ..Default::default()
                }),
                Token::Omega { hz: 7.5 },
                Token::Env(EnvPatch::gate(0.5)),
                Token::Parity {
                    value: Parity::Positive,
                },
            ],
        )
    }

    #[test]
    fn test_drop_omega_removes_exactly_omega() {
        let src = base();
        let ablated = ablate_program(&src, &Ablation::drop_kind(TokenKind::Omega));
        assert_eq!(ablated.count_kind(TokenKind::Omega), 0);
        let expected: Vec<Token> = src
            .tokens
            .iter()
            .filter(|t| t.kind() != TokenKind::Omega)
            .cloned()
            .collect();
        assert_eq!(ablated.tokens, expected);
        let json_a = serde_json::to_string(&ablated.tokens).unwrap();
        let json_b = serde_json::to_string(&expected).unwrap();
        assert_eq!(json_a, json_b);
    }

    #[test]
    fn test_source_untouched() {
        let src = base();
        let before = src.clone();
        for ablation in make_ablations() {
            let _ = ablate_program(&src, &ablation);
        }
        assert_eq!(src, before);
    }

    #[test]
    fn test_drop_gate_env_keeps_other_env() {
        let ablated = ablate_program(&base(), &Ablation::drop_gate_env());
        assert_eq!(ablated.count_kind(TokenKind::Env), 1);
        assert!(!ablated.tokens.iter().any(Token::carries_gate));
    }

    #[test]
    fn test_drop_time_windows() {
        let ablated = ablate_program(&base(), &Ablation::drop_time_windows());
        assert!(!ablated.has_windows());
        assert_eq!(ablated.tokens.len(), base().tokens.len() - 1);
    }

    #[test]
    fn test_battery_covers_every_kind_once() {
        let battery = make_ablations();
        assert_eq!(battery.len(), TokenKind::ALL.len());
        for (ablation, kind) in battery.iter().zip(TokenKind::ALL) {
            assert_eq!(ablation.drop_token_kind, Some(kind));
            assert_eq!(ablation.label, format!("drop_{kind}"));
            assert!(!ablation.drop_gate_env && !ablation.drop_time_windows);
        }
    }

    #[test]
    fn test_ablated_name() {
        let ablated = ablate_program(&base(), &Ablation::drop_kind(TokenKind::Amp));
        assert_eq!(ablated.name.as_deref(), Some("base+drop_A"));
        let anon = WaveProgram::new(vec![Token::Mode {
            mode: "plane".into(),
            params: BTreeMap::new(),
        }]);
        let ablated = ablate_program(&anon, &Ablation::drop_kind(TokenKind::Mode));
        assert_eq!(ablated.name.as_deref(), Some("drop_m"));
        assert!(ablated.tokens.is_empty());
    }

    #[test]
    fn test_ablation_json() {
        let json = serde_json::to_string(&Ablation::drop_kind(TokenKind::Window)).unwrap();
        assert_eq!(
            json,
            r#"{"label":"drop_τ","dropTokenKind":"τ","dropGateEnv":false,"dropTimeWindows":false}"#
        );
        let parsed: Ablation = serde_json::from_str(r#"{"label":"x","dropGateEnv":true}"#).unwrap();
        assert!(parsed.drop_gate_env);
        assert_eq!(parsed.drop_token_kind, None);
    }
}

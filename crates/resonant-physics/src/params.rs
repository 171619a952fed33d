// ─────────────────────────────────────────────────────────────────────
// Resonant Addressing Kernel — Canonical Parameters
// ─────────────────────────────────────────────────────────────────────
//! Canonical addressing scenario: eight nodes at 3–10 Hz with 1 Hz
//! spacing, with node 4 (7 Hz) as the target.

/// Natural frequencies (Hz) of the canonical eight-node bank.
pub const ADDRESSING_FREQS_HZ: [f64; 8] = [3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];

/// Target node of the canonical addressing scenario.
pub const ADDRESSING_NODE: usize = 4;

/// Drive frequency that resonates with [`ADDRESSING_NODE`].
pub const ADDRESSING_DRIVE_HZ: f64 = ADDRESSING_FREQS_HZ[ADDRESSING_NODE];

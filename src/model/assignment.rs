//! Result DTOs for the identity path (encode → resolve) and the
//! confidence path (score).
//!
//! All of these are computed fresh per call, never mutated, never persisted.

use serde::{Deserialize, Serialize};

use super::Trigram;

// ============================================================================
// PatternCode — output of the encoder
// ============================================================================

/// The encoded form of an 8-answer vector.
///
/// `decimal_id` is the authoritative value: the answer vector read as a
/// big-endian unsigned byte (0..=255). `pattern_id` is a cosmetic
/// zero-padded 3-digit octal rendering of that same integer, kept for
/// display parity with the quiz UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternCode {
    /// 3 octal digits, e.g. `"252"` for decimal 170.
    pub pattern_id: String,
    /// 0..=255.
    pub decimal_id: u16,
    /// True when the input was invalid and the fail-closed default
    /// (`"000"` / 0) was substituted. Lets callers distinguish a genuine
    /// all-zero answer vector from a defaulted one.
    pub was_defaulted: bool,
}

impl PatternCode {
    /// The fail-closed default returned for any invalid answer vector.
    pub fn defaulted() -> Self {
        Self {
            pattern_id: "000".to_string(),
            decimal_id: 0,
            was_defaulted: true,
        }
    }
}

// ============================================================================
// HexagramAssignment — output of the resolver
// ============================================================================

/// A resolved hexagram identity for one decimal id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HexagramAssignment {
    /// 1..=64.
    pub hexagram_id: u8,
    /// Traditional hexagram name from the reference table.
    pub hexagram_name: String,
    /// Palace name from the reference table.
    pub palace: String,
    /// 0..=7, position within the palace's ordered hexagram list.
    pub palace_position: u8,
    /// 0..=7, `decimal_id / 64`. Statistical grouping only, never identity.
    pub pattern_group: u8,
    /// 0..=63, `decimal_id % 8` folded into the hexagram's 8-wide block.
    pub sub_pattern: u8,
}

// ============================================================================
// ConfidenceResult — output of the scorer
// ============================================================================

/// Categorical confidence label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

/// Scored trigram pair plus confidence annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceResult {
    /// Combined confidence score in [0, 1].
    pub score: f64,
    pub level: ConfidenceLevel,
    pub upper_trigram: Trigram,
    pub lower_trigram: Trigram,
    /// True when upper == lower (a "pure" hexagram).
    pub is_pure: bool,
    /// Normalized probability per trigram, canonical order. Sums to 1.
    pub probabilities: [f64; 8],
    /// Σ pᵢ² over the normalized distribution.
    pub herfindahl: f64,
    /// −Σ pᵢ·ln pᵢ over the normalized distribution.
    pub entropy: f64,
}

impl ConfidenceResult {
    /// Hexagram number for this trigram pair: `(upper - 1) * 8 + lower`.
    pub fn hexagram_id(&self) -> u8 {
        hexagram_for_pair(self.upper_trigram, self.lower_trigram)
    }
}

/// Map an (upper, lower) trigram pair onto its hexagram number, 1..=64.
pub fn hexagram_for_pair(upper: Trigram, lower: Trigram) -> u8 {
    (upper.id() - 1) * 8 + lower.id()
}

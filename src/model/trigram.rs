//! The eight trigrams and the fixed-size energy vector keyed by them.
//!
//! The quiz measures eight personality dimensions, one per trigram. Keeping
//! the trigram set as a closed enum (instead of string-keyed maps) catches
//! typos and missing-key bugs at compile time.

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Trigram
// ============================================================================

/// One of the eight three-line base symbols.
///
/// | Variant | Glyph | Id | Quiz dimension |
/// |---------|-------|----|----------------|
/// | Qian    | 乾    | 1  | 創造性 (creativity) |
/// | Dui     | 兌    | 2  | 調和性 (harmony) |
/// | Li      | 離    | 3  | 表現性 (expression) |
/// | Zhen    | 震    | 4  | 行動性 (action) |
/// | Xun     | 巽    | 5  | 適応性 (adaptability) |
/// | Kan     | 坎    | 6  | 探求性 (inquiry) |
/// | Gen     | 艮    | 7  | 安定性 (stability) |
/// | Kun     | 坤    | 8  | 受容性 (receptivity) |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trigram {
    Qian,
    Dui,
    Li,
    Zhen,
    Xun,
    Kan,
    Gen,
    Kun,
}

/// All eight trigrams in canonical (id) order.
pub const TRIGRAMS: [Trigram; 8] = [
    Trigram::Qian,
    Trigram::Dui,
    Trigram::Li,
    Trigram::Zhen,
    Trigram::Xun,
    Trigram::Kan,
    Trigram::Gen,
    Trigram::Kun,
];

impl Trigram {
    /// Traditional 1-based trigram id.
    pub fn id(self) -> u8 {
        self as u8 + 1
    }

    /// 0-based index into energy vectors.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Traditional glyph.
    pub fn glyph(self) -> &'static str {
        match self {
            Trigram::Qian => "乾",
            Trigram::Dui => "兌",
            Trigram::Li => "離",
            Trigram::Zhen => "震",
            Trigram::Xun => "巽",
            Trigram::Kan => "坎",
            Trigram::Gen => "艮",
            Trigram::Kun => "坤",
        }
    }

    /// The quiz dimension this trigram measures.
    pub fn dimension(self) -> &'static str {
        match self {
            Trigram::Qian => "創造性",
            Trigram::Dui => "調和性",
            Trigram::Li => "表現性",
            Trigram::Zhen => "行動性",
            Trigram::Xun => "適応性",
            Trigram::Kan => "探求性",
            Trigram::Gen => "安定性",
            Trigram::Kun => "受容性",
        }
    }

    /// Look up a trigram from its traditional 1-based id.
    pub fn from_id(id: u8) -> Option<Trigram> {
        TRIGRAMS.get(id.checked_sub(1)? as usize).copied()
    }

    /// Look up a trigram from its glyph.
    pub fn from_glyph(glyph: &str) -> Option<Trigram> {
        TRIGRAMS.iter().copied().find(|t| t.glyph() == glyph)
    }
}

impl fmt::Display for Trigram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.glyph())
    }
}

// ============================================================================
// TrigramEnergies
// ============================================================================

/// Raw, pre-normalization energy per trigram.
///
/// A fixed-size array indexed by `Trigram`, so every trigram always has a
/// value and no stray keys can exist. Energies must be non-negative; the
/// scorer treats them as unbounded magnitudes, not probabilities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrigramEnergies([f64; 8]);

impl TrigramEnergies {
    /// All-zero energies.
    pub fn zero() -> Self {
        Self([0.0; 8])
    }

    /// Build from a raw array in canonical trigram order (乾 first, 坤 last).
    pub fn from_array(values: [f64; 8]) -> Self {
        Self(values)
    }

    /// Build from (trigram, energy) pairs. Missing trigrams default to 0.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (Trigram, f64)>,
    {
        let mut out = Self::zero();
        for (t, e) in pairs {
            out.0[t.index()] = e;
        }
        out
    }

    pub fn get(&self, trigram: Trigram) -> f64 {
        self.0[trigram.index()]
    }

    pub fn set(&mut self, trigram: Trigram, energy: f64) {
        self.0[trigram.index()] = energy;
    }

    /// Canonical-order view of the raw values.
    pub fn as_array(&self) -> &[f64; 8] {
        &self.0
    }

    /// Iterate `(trigram, energy)` in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Trigram, f64)> + '_ {
        TRIGRAMS.iter().map(move |&t| (t, self.0[t.index()]))
    }
}

impl From<[f64; 8]> for TrigramEnergies {
    fn from(values: [f64; 8]) -> Self {
        Self(values)
    }
}

// ============================================================================
// Tests
// ============================================================================

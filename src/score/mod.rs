//! # Scoring / Confidence Scorer
//!
//! Converts a raw per-trigram energy distribution into a normalized
//! probability distribution, concentration metrics, a selected upper/lower
//! trigram pair, and a categorical confidence label.
//!
//! ## Pipeline
//!
//! ```text
//! energies ──normalize(mode)──▶ p[8] ──metrics──▶ {herfindahl, entropy, gap, ratio}
//!                                 │                        │
//!                                 ▼                        ▼
//!                          trigram pair draw        confidence score → level
//! ```
//!
//! Two normalization modes exist because the quiz shipped with competing
//! experiments; both are kept behind [`NormalizationMode`] rather than as
//! parallel implementations.
//!
//! ## Pure hexagrams
//!
//! A strongly concentrated distribution legitimately produces a repeated
//! (upper == lower) trigram pair more often. The repeat probability `alpha`
//! scales with the Herfindahl index and is clamped to a configured band —
//! see [`ScorerConfig::alpha`].
//!
//! Randomness is injected: production callers pass any `rand::Rng`, tests
//! pass a seeded `StdRng`. The [`score_deterministic`] variant uses argmax
//! selection and no RNG at all.

pub mod config;

pub use config::ScorerConfig;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::model::{ConfidenceLevel, ConfidenceResult, Trigram, TrigramEnergies, TRIGRAMS};

// ============================================================================
// Normalization
// ============================================================================

/// Which normalization the caller wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizationMode {
    /// Temperature-scaled softmax, numerically stable (max subtracted).
    Softmax,
    /// Population z-score, ReLU with a small positive floor, L1-normalized.
    ZScoreRelu,
}

/// Normalize raw energies into a probability distribution.
///
/// Guarantees: every element ≥ 0, sum = 1 (within float tolerance). Flat
/// input (variance below `flat_variance_epsilon`) returns the uniform
/// distribution in both modes. Non-finite energies are treated as 0.
pub fn normalize(
    energies: &TrigramEnergies,
    mode: NormalizationMode,
    cfg: &ScorerConfig,
) -> [f64; 8] {
    let mut e = *energies.as_array();
    for v in &mut e {
        if !v.is_finite() {
            warn!(energy = *v, "non-finite energy treated as 0");
            *v = 0.0;
        }
    }

    let mean = e.iter().sum::<f64>() / 8.0;
    let variance = e.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / 8.0;
    if variance < cfg.flat_variance_epsilon {
        return [1.0 / 8.0; 8];
    }

    match mode {
        NormalizationMode::Softmax => {
            let max = e.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let mut p = e.map(|v| ((v - max) / cfg.temperature).exp());
            let sum: f64 = p.iter().sum();
            for v in &mut p {
                *v /= sum;
            }
            p
        }
        NormalizationMode::ZScoreRelu => {
            let std = variance.sqrt();
            let mut p = e.map(|v| ((v - mean) / std).max(cfg.zscore_floor));
            let sum: f64 = p.iter().sum();
            for v in &mut p {
                *v /= sum;
            }
            p
        }
    }
}

// ============================================================================
// Concentration metrics
// ============================================================================

/// Concentration measures over a normalized distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConcentrationMetrics {
    /// Σ pᵢ², in [1/8, 1].
    pub herfindahl: f64,
    /// −Σ pᵢ·ln pᵢ (0·ln 0 = 0), in [0, ln 8].
    pub entropy: f64,
    pub top1: f64,
    pub top2: f64,
    /// top1 − top2.
    pub gap: f64,
    /// top1 / (top1 + top2).
    pub top_ratio: f64,
}

/// Compute concentration metrics for a normalized distribution.
pub fn concentration(p: &[f64; 8]) -> ConcentrationMetrics {
    let herfindahl = p.iter().map(|v| v * v).sum();
    let entropy = -p
        .iter()
        .filter(|&&v| v > 0.0)
        .map(|&v| v * v.ln())
        .sum::<f64>();

    let mut sorted = *p;
    sorted.sort_by(|a, b| b.partial_cmp(a).expect("probabilities are finite"));
    let (top1, top2) = (sorted[0], sorted[1]);

    ConcentrationMetrics {
        herfindahl,
        entropy,
        top1,
        top2,
        gap: top1 - top2,
        top_ratio: top1 / (top1 + top2),
    }
}

/// Combined confidence score in [0, 1].
///
/// Monotonically increasing in gap, concentration, and top ratio. Each
/// component is rescaled to [0, 1] from its theoretical range before the
/// weighted combination.
pub fn confidence_score(m: &ConcentrationMetrics, cfg: &ScorerConfig) -> f64 {
    let gap_norm = m.gap.clamp(0.0, 1.0);
    let conc_norm = ((m.herfindahl - 0.125) / 0.875).clamp(0.0, 1.0);
    let ratio_norm = ((m.top_ratio - 0.5) / 0.5).clamp(0.0, 1.0);

    (cfg.weight_gap * gap_norm
        + cfg.weight_concentration * conc_norm
        + cfg.weight_top_ratio * ratio_norm)
        .clamp(0.0, 1.0)
}

fn level_for(score: f64, cfg: &ScorerConfig) -> ConfidenceLevel {
    if score >= cfg.high_threshold {
        ConfidenceLevel::High
    } else if score >= cfg.medium_threshold {
        ConfidenceLevel::Medium
    } else {
        ConfidenceLevel::Low
    }
}

// ============================================================================
// Trigram pair selection
// ============================================================================

/// Weighted draw over the full distribution.
fn draw(p: &[f64; 8], rng: &mut impl Rng) -> Trigram {
    let r: f64 = rng.gen_range(0.0..1.0);
    let mut acc = 0.0;
    for (i, &v) in p.iter().enumerate() {
        acc += v;
        if r < acc {
            return TRIGRAMS[i];
        }
    }
    // Float round-off can leave acc marginally below 1.
    TRIGRAMS[7]
}

/// Weighted draw over the 7 trigrams other than `excluded`, renormalized.
fn draw_excluding(p: &[f64; 8], excluded: Trigram, rng: &mut impl Rng) -> Trigram {
    let total: f64 = p
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != excluded.index())
        .map(|(_, v)| v)
        .sum();
    if total <= 0.0 {
        // Degenerate: all mass on the excluded trigram. Uniform fallback.
        let others: Vec<Trigram> = TRIGRAMS.iter().copied().filter(|t| *t != excluded).collect();
        return others[rng.gen_range(0..others.len())];
    }

    let r: f64 = rng.gen_range(0.0..1.0) * total;
    let mut acc = 0.0;
    let mut last = TRIGRAMS[7];
    for (i, &v) in p.iter().enumerate() {
        if i == excluded.index() {
            continue;
        }
        acc += v;
        last = TRIGRAMS[i];
        if r < acc {
            return TRIGRAMS[i];
        }
    }
    last
}

fn argmax(p: &[f64; 8]) -> Trigram {
    let mut best = 0;
    for i in 1..8 {
        if p[i] > p[best] {
            best = i;
        }
    }
    TRIGRAMS[best]
}

fn argmax_excluding(p: &[f64; 8], excluded: Trigram) -> Trigram {
    let mut best: Option<usize> = None;
    for i in 0..8 {
        if i == excluded.index() {
            continue;
        }
        if best.is_none_or(|b| p[i] > p[b]) {
            best = Some(i);
        }
    }
    TRIGRAMS[best.expect("7 candidates remain")]
}

// ============================================================================
// Entry points
// ============================================================================

/// Score an energy distribution with injected randomness.
///
/// The upper trigram is a weighted draw over the normalized distribution.
/// With probability `alpha` (concentration-derived, see module docs) the
/// lower trigram repeats the upper one; otherwise it is a weighted draw over
/// the remaining seven, renormalized.
pub fn score(
    energies: &TrigramEnergies,
    mode: NormalizationMode,
    cfg: &ScorerConfig,
    rng: &mut impl Rng,
) -> ConfidenceResult {
    let p = normalize(energies, mode, cfg);
    let m = concentration(&p);

    let upper = draw(&p, rng);
    let is_pure = rng.gen_range(0.0..1.0) < cfg.alpha(m.herfindahl);
    let lower = if is_pure {
        upper
    } else {
        draw_excluding(&p, upper, rng)
    };

    let score = confidence_score(&m, cfg);
    ConfidenceResult {
        score,
        level: level_for(score, cfg),
        upper_trigram: upper,
        lower_trigram: lower,
        is_pure: upper == lower,
        probabilities: p,
        herfindahl: m.herfindahl,
        entropy: m.entropy,
    }
}

/// Deterministic variant: argmax selection, no RNG.
///
/// The pair repeats (pure hexagram) only when the concentration saturates
/// the alpha band, i.e. `herfindahl * alpha_k >= alpha_max`; otherwise the
/// lower trigram is the second argmax.
pub fn score_deterministic(
    energies: &TrigramEnergies,
    mode: NormalizationMode,
    cfg: &ScorerConfig,
) -> ConfidenceResult {
    let p = normalize(energies, mode, cfg);
    let m = concentration(&p);

    let upper = argmax(&p);
    let is_pure = m.herfindahl * cfg.alpha_k >= cfg.alpha_max;
    let lower = if is_pure {
        upper
    } else {
        argmax_excluding(&p, upper)
    };

    let score = confidence_score(&m, cfg);
    ConfidenceResult {
        score,
        level: level_for(score, cfg),
        upper_trigram: upper,
        lower_trigram: lower,
        is_pure: upper == lower,
        probabilities: p,
        herfindahl: m.herfindahl,
        entropy: m.entropy,
    }
}

// ============================================================================
// Tests
// ============================================================================

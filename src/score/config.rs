//! Scorer tunables.
//!
//! Every constant the scoring experiments disagreed on lives here, so a
//! caller (or a tuning harness) can override any of them without touching
//! engine code. Deserializes from JSON with per-field defaults.

use serde::{Deserialize, Serialize};

/// Configuration for the confidence scorer.
///
/// Defaults reproduce the production quiz behavior; all values are
/// caller-overridable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScorerConfig {
    /// Softmax temperature. Higher = flatter distribution.
    pub temperature: f64,

    /// Population variance below which an energy vector counts as flat and
    /// normalization short-circuits to the uniform distribution.
    pub flat_variance_epsilon: f64,

    /// Minimum probability mass per trigram after z-score + ReLU, before
    /// L1 normalization. Keeps every trigram drawable.
    pub zscore_floor: f64,

    /// Scale factor from Herfindahl concentration to pure-hexagram
    /// probability: `alpha = clamp(herfindahl * alpha_k, alpha_min, alpha_max)`.
    pub alpha_k: f64,
    pub alpha_min: f64,
    pub alpha_max: f64,

    /// Weights for the confidence combination. Applied to, respectively,
    /// the top-two gap, the normalized Herfindahl index, and the normalized
    /// top-two ratio. Should sum to 1 for a [0,1] score.
    pub weight_gap: f64,
    pub weight_concentration: f64,
    pub weight_top_ratio: f64,

    /// Confidence level thresholds: HIGH at or above `high_threshold`,
    /// MEDIUM at or above `medium_threshold`, LOW otherwise.
    pub high_threshold: f64,
    pub medium_threshold: f64,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            temperature: 1.2,
            flat_variance_epsilon: 1e-9,
            zscore_floor: 1e-6,
            alpha_k: 0.8,
            alpha_min: 0.12,
            alpha_max: 0.25,
            weight_gap: 0.4,
            weight_concentration: 0.3,
            weight_top_ratio: 0.3,
            high_threshold: 0.75,
            medium_threshold: 0.45,
        }
    }
}

impl ScorerConfig {
    /// Pure-hexagram probability for a given concentration.
    pub fn alpha(&self, herfindahl: f64) -> f64 {
        (herfindahl * self.alpha_k).clamp(self.alpha_min, self.alpha_max)
    }
}

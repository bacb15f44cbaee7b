//! # haqei-engine — Deterministic I-Ching Pattern Mapping
//!
//! The pure core of the HAQEI quiz: answer vectors in, hexagram identities
//! and confidence annotations out. No DOM, no browser, no UI — the quiz
//! application is an external caller.
//!
//! ## Design Principles
//!
//! 1. **Pure functions**: encode, resolve, and score are side-effect-free
//!    and deterministic (randomness is injected, never ambient)
//! 2. **Explicit dependencies**: the reference table and RNG are parameters,
//!    never module-level globals
//! 3. **Fail fast on data, fail closed on input**: a broken table refuses to
//!    load; a broken answer vector degrades to a documented safe default
//! 4. **One scorer, mode-selected**: the normalization experiments live
//!    behind an enum, not parallel implementations
//!
//! ## Quick Start
//!
//! ```rust
//! use haqei_engine::{Analyzer, Answer, NormalizationMode, OsKind, TrigramEnergies};
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! # fn example() -> haqei_engine::Result<()> {
//! let analyzer = Analyzer::with_bundled_table();
//!
//! // Identity path: 8 answers → pattern code → hexagram
//! let answers: Vec<Answer> = vec![true, false, true, false, true, false, true, false]
//!     .into_iter()
//!     .map(Answer::from)
//!     .collect();
//! let (code, assignment) = analyzer.resolve_answers(&answers)?;
//! assert_eq!(code.decimal_id, 170);
//! assert_eq!(assignment.hexagram_id, 22);
//!
//! // Confidence path: 8 trigram energies → pair + confidence
//! let energies = TrigramEnergies::from_array([100.0, 5.0, 3.0, 2.0, 1.0, 1.0, 0.5, 0.5]);
//! let mut rng = StdRng::seed_from_u64(7);
//! let reading = analyzer.evaluate(
//!     OsKind::Engine,
//!     &answers,
//!     &energies,
//!     NormalizationMode::Softmax,
//!     &mut rng,
//! )?;
//! println!("{}: {:?}", reading.assignment.hexagram_name, reading.confidence.level);
//! # Ok(())
//! # }
//! ```
//!
//! ## Two independent paths
//!
//! | Path | Input | Output |
//! |------|-------|--------|
//! | Identity | 8-answer vector | `PatternCode` + `HexagramAssignment` |
//! | Confidence | 8 trigram energies | `ConfidenceResult` |
//!
//! The caller combines both into its Triple OS display payload; [`Reading`]
//! is the convenience combination this crate offers for that.

// ============================================================================
// Modules
// ============================================================================

pub mod encode;
pub mod model;
pub mod resolve;
pub mod score;

// ============================================================================
// Re-exports: Model (the DTOs)
// ============================================================================

pub use model::{
    hexagram_for_pair, ConfidenceLevel, ConfidenceResult, HexagramAssignment, HexagramRef, Palace,
    PatternCode, ReferenceTable, Trigram, TrigramEnergies, TRIGRAMS,
};

// ============================================================================
// Re-exports: Operations
// ============================================================================

pub use encode::{encode, encode_bits, pattern_id_to_decimal, try_encode, Answer, ANSWER_COUNT};
pub use resolve::{resolve, MAX_DECIMAL_ID};
pub use score::{
    concentration, confidence_score, normalize, score, score_deterministic, ConcentrationMetrics,
    NormalizationMode, ScorerConfig,
};

use std::sync::Arc;

use rand::Rng;
use serde::{Deserialize, Serialize};

// ============================================================================
// Triple OS
// ============================================================================

/// Which of the three OS slots a reading fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OsKind {
    /// Core drive — what the person runs on.
    Engine,
    /// Social presentation — what others interact with.
    Interface,
    /// Stress response — what takes over under pressure.
    SafeMode,
}

/// One combined result: identity path plus confidence path for one OS slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub os: OsKind,
    pub pattern: PatternCode,
    pub assignment: HexagramAssignment,
    pub confidence: ConfidenceResult,
}

// ============================================================================
// Top-level Analyzer handle
// ============================================================================

/// The primary entry point. An `Analyzer` wraps the immutable reference
/// table and the scorer configuration, and exposes the engine operations.
///
/// Cheap to clone (the table is behind `Arc`); safe to share across threads.
#[derive(Debug, Clone)]
pub struct Analyzer {
    table: Arc<ReferenceTable>,
    config: ScorerConfig,
}

impl Analyzer {
    /// Create an Analyzer over an already-loaded table.
    pub fn new(table: Arc<ReferenceTable>) -> Self {
        Self {
            table,
            config: ScorerConfig::default(),
        }
    }

    /// Create an Analyzer over the compiled-in canonical table.
    #[cfg(feature = "bundled-table")]
    pub fn with_bundled_table() -> Self {
        Self::new(Arc::new(ReferenceTable::bundled()))
    }

    /// Replace the scorer configuration.
    pub fn with_config(mut self, config: ScorerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn table(&self) -> &ReferenceTable {
        &self.table
    }

    pub fn config(&self) -> &ScorerConfig {
        &self.config
    }

    /// Identity path: encode an answer vector (fail-closed) and resolve it.
    pub fn resolve_answers(&self, answers: &[Answer]) -> Result<(PatternCode, HexagramAssignment)> {
        let code = encode::encode(answers);
        let assignment = resolve::resolve(code.decimal_id, &self.table)?;
        Ok((code, assignment))
    }

    /// Confidence path with injected randomness.
    pub fn score(
        &self,
        energies: &TrigramEnergies,
        mode: NormalizationMode,
        rng: &mut impl Rng,
    ) -> ConfidenceResult {
        score::score(energies, mode, &self.config, rng)
    }

    /// Confidence path, deterministic (argmax) variant.
    pub fn score_deterministic(
        &self,
        energies: &TrigramEnergies,
        mode: NormalizationMode,
    ) -> ConfidenceResult {
        score::score_deterministic(energies, mode, &self.config)
    }

    /// Run both paths and combine them into one [`Reading`] for an OS slot.
    pub fn evaluate(
        &self,
        os: OsKind,
        answers: &[Answer],
        energies: &TrigramEnergies,
        mode: NormalizationMode,
        rng: &mut impl Rng,
    ) -> Result<Reading> {
        let (pattern, assignment) = self.resolve_answers(answers)?;
        let confidence = self.score(energies, mode, rng);
        Ok(Reading {
            os,
            pattern,
            assignment,
            confidence,
        })
    }
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed or incomplete reference table at load time. Fatal: the
    /// engine cannot serve any request from a broken table.
    #[error("Config error: {0}")]
    Config(String),

    /// Malformed per-request input (answer vector, pattern id, decimal id).
    /// Recoverable; the fail-closed encoder absorbs this into a default.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An in-range hexagram id missing from an otherwise-valid table.
    /// Indicates a table/engine version mismatch; never defaulted.
    #[error("Lookup error: {0}")]
    Lookup(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

//! # Engine Data Model
//!
//! Clean DTOs that cross every boundary: table ↔ encoder ↔ resolver ↔ scorer ↔ caller.
//!
//! Design rule: this module is pure data — no I/O beyond the one-time table
//! load, no state, no randomness.

pub mod assignment;
pub mod table;
pub mod trigram;

pub use assignment::{
    hexagram_for_pair, ConfidenceLevel, ConfidenceResult, HexagramAssignment, PatternCode,
};
pub use table::{HexagramRef, Palace, ReferenceTable, HEXAGRAM_COUNT, PALACE_COUNT};
pub use trigram::{Trigram, TrigramEnergies, TRIGRAMS};

//! # Eight-Palaces Reference Table
//!
//! The static table that groups the 64 hexagrams into 8 palaces of 8.
//! Loaded once from JSON, validated eagerly, then shared read-only —
//! there is no mutation API.
//!
//! ## Schema
//!
//! ```json
//! {
//!   "palaces": [
//!     {
//!       "name": "乾宮",
//!       "hexagrams": [
//!         { "number": 1, "name": "乾為天", "keywords": ["創造", "剛健"] },
//!         ...
//!       ]
//!     },
//!     ...
//!   ]
//! }
//! ```
//!
//! ## Invariant
//!
//! Exactly 8 palaces × 8 hexagrams, and the hexagram numbers form a
//! permutation of 1..=64. Any violation is a fatal `Error::Config` at
//! load time — the engine never serves requests from a broken table.

use std::path::Path;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::info;

use crate::{Error, Result};

/// Number of palaces in the table.
pub const PALACE_COUNT: usize = 8;

/// Number of hexagrams per palace.
pub const HEXAGRAMS_PER_PALACE: usize = 8;

/// Total hexagrams (must be a permutation of 1..=64).
pub const HEXAGRAM_COUNT: usize = PALACE_COUNT * HEXAGRAMS_PER_PALACE;

// ============================================================================
// DTOs
// ============================================================================

/// One hexagram entry in a palace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HexagramRef {
    /// Traditional hexagram number, 1..=64.
    pub number: u8,
    /// Traditional name, e.g. "乾為天".
    pub name: String,
    /// Short keyword hints used by the quiz UI.
    #[serde(default)]
    pub keywords: SmallVec<[String; 4]>,
}

/// One palace: a named, ordered run of 8 hexagrams.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palace {
    pub name: String,
    pub hexagrams: Vec<HexagramRef>,
}

// ============================================================================
// ReferenceTable
// ============================================================================

/// Validated, immutable eight-palaces table with an O(1) reverse index.
///
/// Construct via [`ReferenceTable::from_json_str`], [`from_path`], or the
/// compiled-in [`bundled`] table. Wrap in `Arc` to share across threads;
/// every engine operation only reads it.
///
/// [`from_path`]: ReferenceTable::from_path
/// [`bundled`]: ReferenceTable::bundled
#[derive(Debug, Clone)]
pub struct ReferenceTable {
    palaces: Vec<Palace>,
    /// hexagram number → (palace index, position within palace)
    index: HashMap<u8, (usize, usize)>,
}

#[derive(Deserialize)]
struct TableDoc {
    palaces: Vec<Palace>,
}

impl ReferenceTable {
    /// Parse and validate a table from a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let doc: TableDoc = serde_json::from_str(json)?;
        Self::from_palaces(doc.palaces)
    }

    /// Load a table from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&json)
    }

    /// The canonical eight-palaces arrangement, compiled into the binary.
    ///
    /// Validated by test; a broken bundled table is a build defect, so this
    /// constructor does not surface `Result`.
    #[cfg(feature = "bundled-table")]
    pub fn bundled() -> Self {
        static JSON: &str = include_str!("../../data/eight_palaces.json");
        Self::from_json_str(JSON).expect("bundled eight-palaces table is valid")
    }

    /// Validate palace structure and build the reverse index.
    fn from_palaces(palaces: Vec<Palace>) -> Result<Self> {
        if palaces.len() != PALACE_COUNT {
            return Err(Error::Config(format!(
                "expected {PALACE_COUNT} palaces, got {}",
                palaces.len()
            )));
        }

        let mut index = HashMap::with_capacity(HEXAGRAM_COUNT);
        for (pi, palace) in palaces.iter().enumerate() {
            if palace.hexagrams.len() != HEXAGRAMS_PER_PALACE {
                return Err(Error::Config(format!(
                    "palace '{}' has {} hexagrams, expected {HEXAGRAMS_PER_PALACE}",
                    palace.name,
                    palace.hexagrams.len()
                )));
            }
            for (pos, hex) in palace.hexagrams.iter().enumerate() {
                if !(1..=HEXAGRAM_COUNT as u8).contains(&hex.number) {
                    return Err(Error::Config(format!(
                        "hexagram number {} out of range 1..=64 in palace '{}'",
                        hex.number, palace.name
                    )));
                }
                if index.insert(hex.number, (pi, pos)).is_some() {
                    return Err(Error::Config(format!(
                        "hexagram number {} appears more than once",
                        hex.number
                    )));
                }
            }
        }
        // 64 slots, all in 1..=64, no duplicates ⇒ permutation of 1..=64.
        debug_assert_eq!(index.len(), HEXAGRAM_COUNT);

        info!(palaces = palaces.len(), "reference table loaded");
        Ok(Self { palaces, index })
    }

    /// All palaces in table order.
    pub fn palaces(&self) -> &[Palace] {
        &self.palaces
    }

    /// Locate a hexagram: `(palace, position)` or `None` if absent.
    pub fn locate(&self, hexagram_id: u8) -> Option<(&Palace, usize)> {
        let &(pi, pos) = self.index.get(&hexagram_id)?;
        Some((&self.palaces[pi], pos))
    }

    /// Full entry for a hexagram number.
    pub fn hexagram(&self, hexagram_id: u8) -> Option<&HexagramRef> {
        let (palace, pos) = self.locate(hexagram_id)?;
        Some(&palace.hexagrams[pos])
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn synthetic_table_json() -> String {
        // 8 palaces of 8, numbers 1..=64 in block order.
        let palaces: Vec<String> = (0..8)
            .map(|p| {
                let hexes: Vec<String> = (0..8)
                    .map(|h| {
                        let n = p * 8 + h + 1;
                        format!(r#"{{"number":{n},"name":"hex{n}","keywords":[]}}"#)
                    })
                    .collect();
                format!(r#"{{"name":"palace{p}","hexagrams":[{}]}}"#, hexes.join(","))
            })
            .collect();
        format!(r#"{{"palaces":[{}]}}"#, palaces.join(","))
    }

    #[test]
    fn valid_table_loads_and_indexes() {
        let table = ReferenceTable::from_json_str(&synthetic_table_json()).unwrap();
        assert_eq!(table.palaces().len(), 8);
        let (palace, pos) = table.locate(10).unwrap();
        assert_eq!(palace.name, "palace1");
        assert_eq!(pos, 1);
        assert_eq!(table.hexagram(10).unwrap().name, "hex10");
    }

    #[test]
    fn wrong_palace_count_is_config_error() {
        let json = r#"{"palaces":[{"name":"only","hexagrams":[]}]}"#;
        let err = ReferenceTable::from_json_str(json).unwrap_err();
        assert!(matches!(err, Error::Config(_)), "got {err:?}");
    }

    #[test]
    fn duplicate_hexagram_number_is_config_error() {
        let json = synthetic_table_json().replace(r#""number":64"#, r#""number":1"#);
        let err = ReferenceTable::from_json_str(&json).unwrap_err();
        assert!(matches!(err, Error::Config(_)), "got {err:?}");
    }

    #[test]
    fn out_of_range_number_is_config_error() {
        let json = synthetic_table_json().replace(r#""number":64"#, r#""number":65"#);
        let err = ReferenceTable::from_json_str(&json).unwrap_err();
        assert!(matches!(err, Error::Config(_)), "got {err:?}");
    }

    #[test]
    fn malformed_json_is_json_error() {
        let err = ReferenceTable::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, Error::Json(_)), "got {err:?}");
    }

    #[cfg(feature = "bundled-table")]
    #[test]
    fn bundled_table_is_a_permutation_of_1_to_64() {
        let table = ReferenceTable::bundled();
        for n in 1..=64u8 {
            assert!(table.locate(n).is_some(), "hexagram {n} missing");
        }
        assert_eq!(table.palaces()[0].name, "乾宮");
        assert_eq!(table.hexagram(1).unwrap().name, "乾為天");
    }
}

//! # Hexagram Resolver
//!
//! Maps a decimal id (0..=511) onto a hexagram identity via the reference
//! table. The 512 ids split into 64 contiguous blocks of 8; the block picks
//! the hexagram, the offset within the block is the sub-pattern.
//!
//! Pure, deterministic, total over the documented input range. A table miss
//! for an in-range hexagram id indicates a table/engine version mismatch and
//! is surfaced as a hard `Error::Lookup`, never defaulted — masking it would
//! hide data corruption.

use tracing::error;

use crate::model::{HexagramAssignment, ReferenceTable};
use crate::{Error, Result};

/// Upper bound (inclusive) of the resolver's input domain.
pub const MAX_DECIMAL_ID: u16 = 511;

/// Resolve a decimal id to its hexagram assignment.
///
/// - `hexagram_id = decimal_id / 8 + 1`, clamped to 1..=64
/// - `sub_pattern = decimal_id % 8`
/// - `pattern_group = decimal_id / 64` (reporting only)
pub fn resolve(decimal_id: u16, table: &ReferenceTable) -> Result<HexagramAssignment> {
    if decimal_id > MAX_DECIMAL_ID {
        return Err(Error::InvalidInput(format!(
            "decimal id {decimal_id} outside 0..={MAX_DECIMAL_ID}"
        )));
    }

    let hexagram_id = (decimal_id / 8 + 1).clamp(1, 64) as u8;
    let sub_pattern = (decimal_id % 8) as u8;
    let pattern_group = (decimal_id / 64) as u8;

    let (palace, palace_position) = table.locate(hexagram_id).ok_or_else(|| {
        error!(hexagram_id, "hexagram missing from reference table");
        Error::Lookup(format!(
            "hexagram {hexagram_id} not present in reference table"
        ))
    })?;
    let hexagram = &palace.hexagrams[palace_position];

    Ok(HexagramAssignment {
        hexagram_id,
        hexagram_name: hexagram.name.clone(),
        palace: palace.name.clone(),
        palace_position: palace_position as u8,
        pattern_group,
        sub_pattern,
    })
}

// ============================================================================
// Tests
// ============================================================================

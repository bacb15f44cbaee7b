//! # Pattern ID Encoder
//!
//! Converts an 8-element answer vector into a `PatternCode`: the vector read
//! as a big-endian unsigned byte (`decimal_id`, 0..=255) plus a zero-padded
//! 3-digit octal rendering (`pattern_id`, display only).
//!
//! ## Fail-closed policy
//!
//! This is a self-reflection tool: a safe deterministic fallback beats a
//! crash in the caller's critical path. [`encode`] therefore absorbs invalid
//! input (wrong length, non-coercible values) into the documented default
//! `{"000", 0, was_defaulted: true}` instead of propagating an error.
//! Callers that want the strict behavior use [`try_encode`].

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::model::PatternCode;
use crate::{Error, Result};

/// Required answer vector length.
pub const ANSWER_COUNT: usize = 8;

// ============================================================================
// Answer — loosely-typed input element
// ============================================================================

/// One raw answer as the quiz front end delivers it.
///
/// The front end historically sent booleans, 0/1 integers, and 0.0/1.0
/// floats interchangeably. Coercion is strict beyond that set: `2`, `0.5`,
/// and `Null` are invalid, not truthy-guessed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Bool(bool),
    Int(i64),
    Float(f64),
    Null,
}

impl Answer {
    /// Coerce to a bit, or `None` if not coercible.
    pub fn as_bit(self) -> Option<u8> {
        match self {
            Answer::Bool(b) => Some(b as u8),
            Answer::Int(0) => Some(0),
            Answer::Int(1) => Some(1),
            Answer::Float(f) if f == 0.0 => Some(0),
            Answer::Float(f) if f == 1.0 => Some(1),
            _ => None,
        }
    }
}

impl From<bool> for Answer {
    fn from(b: bool) -> Self {
        Answer::Bool(b)
    }
}

impl From<i64> for Answer {
    fn from(i: i64) -> Self {
        Answer::Int(i)
    }
}

// ============================================================================
// Encoding
// ============================================================================

/// Strict encoder: `Error::InvalidInput` on any malformed vector.
pub fn try_encode(answers: &[Answer]) -> Result<PatternCode> {
    if answers.len() != ANSWER_COUNT {
        return Err(Error::InvalidInput(format!(
            "answer vector has {} elements, expected {ANSWER_COUNT}",
            answers.len()
        )));
    }

    let mut decimal_id: u16 = 0;
    for (i, answer) in answers.iter().enumerate() {
        let bit = answer.as_bit().ok_or_else(|| {
            Error::InvalidInput(format!("answer[{i}] = {answer:?} is not coercible to 0/1"))
        })?;
        // Big-endian: answers[0] is the most significant bit.
        decimal_id = (decimal_id << 1) | bit as u16;
    }

    Ok(PatternCode {
        pattern_id: render_pattern_id(decimal_id),
        decimal_id,
        was_defaulted: false,
    })
}

/// Fail-closed encoder: invalid input yields `PatternCode::defaulted()`.
pub fn encode(answers: &[Answer]) -> PatternCode {
    match try_encode(answers) {
        Ok(code) => code,
        Err(err) => {
            warn!(%err, "invalid answer vector, substituting fail-closed default");
            PatternCode::defaulted()
        }
    }
}

/// Convenience for callers that already hold clean bits.
pub fn encode_bits(bits: &[bool; ANSWER_COUNT]) -> PatternCode {
    let answers: Vec<Answer> = bits.iter().map(|&b| Answer::Bool(b)).collect();
    // Cannot fail: 8 booleans are always coercible.
    try_encode(&answers).expect("8 booleans always encode")
}

/// Zero-padded 3-digit octal rendering of a decimal id.
///
/// 255 = 0o377, so 3 digits always suffice for the encoder's range.
pub fn render_pattern_id(decimal_id: u16) -> String {
    format!("{decimal_id:03o}")
}

/// Parse a 3-digit octal pattern id back to its decimal id.
pub fn pattern_id_to_decimal(pattern_id: &str) -> Result<u16> {
    if pattern_id.len() != 3 || !pattern_id.bytes().all(|b| (b'0'..=b'7').contains(&b)) {
        return Err(Error::InvalidInput(format!(
            "pattern id '{pattern_id}' is not 3 octal digits"
        )));
    }
    // Safe: validated as octal digits above.
    Ok(u16::from_str_radix(pattern_id, 8).expect("validated octal"))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn bits(v: [u8; 8]) -> Vec<Answer> {
        v.iter().map(|&b| Answer::Int(b as i64)).collect()
    }

    #[test]
    fn all_zeros_is_pattern_000() {
        let code = encode(&bits([0; 8]));
        assert_eq!(code.pattern_id, "000");
        assert_eq!(code.decimal_id, 0);
        assert!(!code.was_defaulted);
    }

    #[test]
    fn all_ones_is_255() {
        let code = encode(&bits([1; 8]));
        assert_eq!(code.decimal_id, 255);
        assert_eq!(code.pattern_id, "377");
        assert!(!code.was_defaulted);
    }

    #[test]
    fn alternating_is_170() {
        let code = encode(&bits([1, 0, 1, 0, 1, 0, 1, 0]));
        assert_eq!(code.decimal_id, 170);
        assert_eq!(code.pattern_id, "252");
    }

    #[test]
    fn first_answer_is_most_significant() {
        let code = encode(&bits([1, 0, 0, 0, 0, 0, 0, 0]));
        assert_eq!(code.decimal_id, 128);
    }

    #[test]
    fn short_vector_fails_closed() {
        let code = encode(&[Answer::Int(1), Answer::Int(1), Answer::Int(1)]);
        assert_eq!(code, PatternCode::defaulted());
        assert!(code.was_defaulted);
    }

    #[test]
    fn non_coercible_value_fails_closed() {
        let mut answers = bits([0; 8]);
        answers[3] = Answer::Int(2);
        assert_eq!(encode(&answers), PatternCode::defaulted());

        answers[3] = Answer::Float(0.5);
        assert_eq!(encode(&answers), PatternCode::defaulted());

        answers[3] = Answer::Null;
        assert_eq!(encode(&answers), PatternCode::defaulted());
    }

    #[test]
    fn strict_encoder_surfaces_the_error() {
        let err = try_encode(&[Answer::Int(1), Answer::Int(1), Answer::Int(1)]).unwrap_err();
        assert!(matches!(err, crate::Error::InvalidInput(_)), "got {err:?}");
    }

    #[test]
    fn mixed_coercible_types_encode_identically() {
        let a = encode(&[
            Answer::Bool(true),
            Answer::Int(0),
            Answer::Float(1.0),
            Answer::Bool(false),
            Answer::Int(1),
            Answer::Float(0.0),
            Answer::Bool(true),
            Answer::Int(0),
        ]);
        let b = encode(&bits([1, 0, 1, 0, 1, 0, 1, 0]));
        assert_eq!(a, b);
    }

    #[test]
    fn pattern_id_round_trips() {
        for d in 0..=255u16 {
            assert_eq!(pattern_id_to_decimal(&render_pattern_id(d)).unwrap(), d);
        }
    }

    #[test]
    fn pattern_id_parser_rejects_garbage() {
        assert!(pattern_id_to_decimal("38a").is_err());
        assert!(pattern_id_to_decimal("0000").is_err());
        assert!(pattern_id_to_decimal("").is_err());
    }
}

//! Property-based tests over the whole engine.

use haqei_engine::{
    encode, pattern_id_to_decimal, resolve, try_encode, Answer, NormalizationMode, PatternCode,
    ReferenceTable, ScorerConfig, TrigramEnergies,
};
use proptest::prelude::*;

fn table() -> ReferenceTable {
    ReferenceTable::bundled()
}

// ============================================================================
// Bijection: 512 decimal ids ↔ 64 hexagrams × 8 sub-patterns
// ============================================================================

#[test]
fn every_hexagram_owns_exactly_eight_decimal_ids() {
    let table = table();
    let mut counts = [0u32; 65];
    for decimal_id in 0..=511u16 {
        let a = resolve(decimal_id, &table).unwrap();
        counts[a.hexagram_id as usize] += 1;
    }
    assert_eq!(counts[0], 0);
    for (hex, &count) in counts.iter().enumerate().skip(1) {
        assert_eq!(count, 8, "hexagram {hex}");
    }
}

proptest! {
    // ========================================================================
    // Round-trip: octal pattern id ↔ decimal id ↔ answer bits
    // ========================================================================

    #[test]
    fn pattern_id_round_trips_through_octal(bits in prop::array::uniform8(0u8..=1)) {
        let answers: Vec<Answer> = bits.iter().map(|&b| Answer::Int(b as i64)).collect();
        let code = try_encode(&answers).unwrap();

        let expected: u16 = bits.iter().fold(0, |acc, &b| (acc << 1) | b as u16);
        prop_assert_eq!(code.decimal_id, expected);
        prop_assert_eq!(pattern_id_to_decimal(&code.pattern_id).unwrap(), expected);
    }

    #[test]
    fn encode_resolve_is_deterministic(bits in prop::array::uniform8(0u8..=1)) {
        let table = table();
        let answers: Vec<Answer> = bits.iter().map(|&b| Answer::Int(b as i64)).collect();
        let a = resolve(encode(&answers).decimal_id, &table).unwrap();
        let b = resolve(encode(&answers).decimal_id, &table).unwrap();
        prop_assert_eq!(a, b);
    }

    // ========================================================================
    // Fail-closed: any wrong-length vector defaults, never panics
    // ========================================================================

    #[test]
    fn wrong_length_vectors_fail_closed(len in 0usize..20, bit in 0u8..=1) {
        prop_assume!(len != 8);
        let answers = vec![Answer::Int(bit as i64); len];
        prop_assert_eq!(encode(&answers), PatternCode::defaulted());
    }

    #[test]
    fn out_of_range_values_fail_closed(
        bits in prop::array::uniform8(0u8..=1),
        pos in 0usize..8,
        bad in prop_oneof![
            (2i64..100).prop_map(Answer::Int),
            (-100i64..0).prop_map(Answer::Int),
            (0.01f64..0.99).prop_map(Answer::Float),
            Just(Answer::Null),
        ],
    ) {
        let mut answers: Vec<Answer> =
            bits.iter().map(|&b| Answer::Int(b as i64)).collect();
        answers[pos] = bad;
        prop_assert_eq!(encode(&answers), PatternCode::defaulted());
    }

    // ========================================================================
    // Normalization invariant: Σp = 1, p ≥ 0, both modes, any energies
    // ========================================================================

    #[test]
    fn normalization_always_yields_a_distribution(
        energies in prop::array::uniform8(0.0f64..1000.0),
    ) {
        let cfg = ScorerConfig::default();
        let e = TrigramEnergies::from_array(energies);
        for mode in [NormalizationMode::Softmax, NormalizationMode::ZScoreRelu] {
            let p = haqei_engine::normalize(&e, mode, &cfg);
            let sum: f64 = p.iter().sum();
            prop_assert!((sum - 1.0).abs() < 1e-9, "{:?}: sum {}", mode, sum);
            prop_assert!(p.iter().all(|&v| v >= 0.0), "{:?}", mode);
        }
    }

    // ========================================================================
    // Softmax scale behavior: scaling energies and temperature together
    // leaves the distribution unchanged
    // ========================================================================

    #[test]
    fn softmax_joint_scaling_is_invariant(
        energies in prop::array::uniform8(0.0f64..100.0),
        factor in 0.1f64..10.0,
    ) {
        let cfg = ScorerConfig::default();
        let scaled_cfg = ScorerConfig {
            temperature: cfg.temperature * factor,
            ..cfg
        };
        let e = TrigramEnergies::from_array(energies);
        let scaled = TrigramEnergies::from_array(energies.map(|v| v * factor));

        let pa = haqei_engine::normalize(&e, NormalizationMode::Softmax, &cfg);
        let pb = haqei_engine::normalize(&scaled, NormalizationMode::Softmax, &scaled_cfg);
        for i in 0..8 {
            prop_assert!((pa[i] - pb[i]).abs() < 1e-6, "index {}: {} vs {}", i, pa[i], pb[i]);
        }
    }

    // ========================================================================
    // Confidence score stays in [0, 1] for any input
    // ========================================================================

    #[test]
    fn confidence_score_is_clipped(
        energies in prop::array::uniform8(0.0f64..1000.0),
    ) {
        let cfg = ScorerConfig::default();
        let e = TrigramEnergies::from_array(energies);
        for mode in [NormalizationMode::Softmax, NormalizationMode::ZScoreRelu] {
            let r = haqei_engine::score_deterministic(&e, mode, &cfg);
            prop_assert!((0.0..=1.0).contains(&r.score), "{:?}: {}", mode, r.score);
        }
    }
}

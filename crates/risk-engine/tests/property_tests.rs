//! Property-based tests for risk aggregation

use proptest::prelude::*;
use risk_engine::RiskEngine;
use shared_types::{Clause, RiskLevel};

fn label_token() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Anger".to_string()),
        Just("Fear".to_string()),
        Just("Sadness".to_string()),
        Just("Surprise".to_string()),
        Just("Joy".to_string()),
        Just("Neutral".to_string()),
        Just("Love".to_string()),
        "[a-z]{1,8}",
    ]
}

fn label() -> impl Strategy<Value = String> {
    (
        prop::collection::vec(label_token(), 0..4),
        prop_oneof![Just(", "), Just(";"), Just(" | "), Just(" ")],
    )
        .prop_map(|(tokens, sep)| tokens.join(sep))
}

fn clauses() -> impl Strategy<Value = Vec<Clause>> {
    prop::collection::vec(
        (label(), 0.0f64..1.0).prop_map(|(l, score)| Clause::new("clause text", l, score)),
        0..40,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn always_four_buckets_in_canonical_order(input in clauses()) {
        let buckets = RiskEngine::new().aggregate(&input);
        prop_assert_eq!(buckets.len(), 4);
        let order: Vec<RiskLevel> = buckets.iter().map(|b| b.risk_level).collect();
        prop_assert_eq!(order, RiskLevel::ALL.to_vec());
    }

    #[test]
    fn every_clause_contributes_at_least_once(input in clauses()) {
        let buckets = RiskEngine::new().aggregate(&input);
        let total: usize = buckets.iter().map(|b| b.count).sum();
        prop_assert!(total >= input.len());
    }

    #[test]
    fn total_equals_token_count(input in clauses()) {
        let engine = RiskEngine::new();
        let expected: usize = input
            .iter()
            .map(|c| engine.levels_for_label(&c.risk_level).len())
            .sum();
        let total: usize = engine.aggregate(&input).iter().map(|b| b.count).sum();
        prop_assert_eq!(total, expected);
    }

    #[test]
    fn aggregation_is_case_insensitive(input in clauses()) {
        let engine = RiskEngine::new();
        let upper: Vec<Clause> = input
            .iter()
            .cloned()
            .map(|mut c| { c.risk_level = c.risk_level.to_uppercase(); c })
            .collect();
        prop_assert_eq!(engine.aggregate(&input), engine.aggregate(&upper));
    }
}

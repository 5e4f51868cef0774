//! Risk aggregation for classified clauses
//!
//! Reduces the classifier's clause list into exactly four [`RiskBucket`]s
//! (High, Medium, Low, No Risk) in canonical order for stable chart rendering.
//!
//! ## Label policy
//!
//! A clause's `riskLevel` is treated as a delimiter-separated list of
//! emotion-style keywords. The label is lowercased and split on runs of
//! whitespace, `,`, `;` and `|`. Every token increments one bucket (see
//! [`patterns`]), so a single clause can count toward several buckets and the
//! bucket total is at least the number of clauses. A clause with an empty
//! label counts once as No Risk.

pub mod patterns;

use lazy_static::lazy_static;
use regex::Regex;
use shared_types::{Clause, RiskBucket, RiskLevel};

lazy_static! {
    static ref LABEL_DELIMITERS: Regex = Regex::new(r"[\s,;|]+").unwrap();
}

/// RiskEngine entry point
#[derive(Debug, Clone, Copy)]
pub struct RiskEngine;

impl RiskEngine {
    pub fn new() -> Self {
        Self
    }

    /// Tiers one clause contributes to, one entry per label token.
    pub fn levels_for_label(&self, label: &str) -> Vec<RiskLevel> {
        let lowered = label.to_lowercase();
        let levels: Vec<RiskLevel> = LABEL_DELIMITERS
            .split(&lowered)
            .filter(|token| !token.is_empty())
            .map(patterns::level_for_token)
            .collect();

        if levels.is_empty() {
            vec![RiskLevel::None]
        } else {
            levels
        }
    }

    /// Count clauses into the four canonical buckets.
    pub fn aggregate(&self, clauses: &[Clause]) -> Vec<RiskBucket> {
        let mut buckets: Vec<RiskBucket> =
            RiskLevel::ALL.iter().map(|l| RiskBucket::empty(*l)).collect();

        for clause in clauses {
            for level in self.levels_for_label(&clause.risk_level) {
                buckets[level.index()].count += 1;
            }
        }

        buckets
    }

    /// Most severe tier with a non-zero count; `RiskLevel::None` when empty.
    pub fn overall_risk(&self, buckets: &[RiskBucket]) -> RiskLevel {
        buckets
            .iter()
            .filter(|b| b.count > 0)
            .map(|b| b.risk_level)
            .min()
            .unwrap_or(RiskLevel::None)
    }
}

impl Default for RiskEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn counts(buckets: &[RiskBucket]) -> Vec<usize> {
        buckets.iter().map(|b| b.count).collect()
    }

    #[test]
    fn test_empty_input_yields_four_zero_buckets() {
        let buckets = RiskEngine::new().aggregate(&[]);
        assert_eq!(counts(&buckets), vec![0, 0, 0, 0]);
        assert_eq!(
            buckets.iter().map(|b| b.risk_level).collect::<Vec<_>>(),
            RiskLevel::ALL.to_vec()
        );
    }

    #[test]
    fn test_single_labels() {
        let clauses = vec![
            Clause::new("a", "Anger", 0.9),
            Clause::new("b", "Fear", 0.8),
            Clause::new("c", "Sadness", 0.7),
            Clause::new("d", "Joy", 0.6),
            Clause::new("e", "Love", 0.5),
        ];
        let buckets = RiskEngine::new().aggregate(&clauses);
        assert_eq!(counts(&buckets), vec![2, 1, 1, 1]);
    }

    #[test]
    fn test_multi_keyword_label_counts_each_token() {
        let clauses = vec![Clause::new("a", "anger, surprise | neutral", 0.9)];
        let buckets = RiskEngine::new().aggregate(&clauses);
        assert_eq!(counts(&buckets), vec![1, 1, 1, 0]);
    }

    #[test]
    fn test_empty_label_counts_as_no_risk_once() {
        let clauses = vec![Clause::new("a", "", 0.1), Clause::new("b", " ,; ", 0.1)];
        let buckets = RiskEngine::new().aggregate(&clauses);
        assert_eq!(counts(&buckets), vec![0, 0, 0, 2]);
    }

    #[test]
    fn test_stray_delimiters_are_ignored() {
        let levels = RiskEngine::new().levels_for_label(",fear;;joy,");
        assert_eq!(levels, vec![RiskLevel::High, RiskLevel::Low]);
    }

    #[test]
    fn test_colors_are_fixed() {
        let buckets = RiskEngine::new().aggregate(&[]);
        let colors: Vec<&str> = buckets.iter().map(|b| b.color.as_str()).collect();
        assert_eq!(colors, vec!["#ef4444", "#f59e0b", "#0ea5e9", "#22c55e"]);
    }

    #[test]
    fn test_overall_risk() {
        let engine = RiskEngine::new();
        assert_eq!(engine.overall_risk(&engine.aggregate(&[])), RiskLevel::None);

        let buckets = engine.aggregate(&[Clause::new("a", "joy surprise", 0.4)]);
        assert_eq!(engine.overall_risk(&buckets), RiskLevel::Medium);
    }
}

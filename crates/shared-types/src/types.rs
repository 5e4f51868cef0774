use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::risk::RiskBucket;

/// A classified excerpt of the analyzed document.
///
/// The ML service sends `{clause, riskLevel, score}`; the aliases below accept
/// that shape while the serialized form uses the field names the client reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clause {
    #[serde(alias = "clause")]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Free-form label, e.g. `"Fear"` or `"anger, sadness"`
    #[serde(default)]
    pub risk_level: String,
    #[serde(default, alias = "note", skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default, alias = "score")]
    pub confidence: f64,
}

impl Clause {
    pub fn new(text: impl Into<String>, risk_level: impl Into<String>, confidence: f64) -> Self {
        Self {
            text: text.into(),
            category: None,
            risk_level: risk_level.into(),
            explanation: None,
            confidence,
        }
        .normalized()
    }

    /// Clamp the confidence into `[0, 1]`; NaN becomes 0.
    pub fn normalized(mut self) -> Self {
        self.confidence = if self.confidence.is_nan() {
            0.0
        } else {
            self.confidence.clamp(0.0, 1.0)
        };
        self
    }
}

/// Named entity as reported by the NER service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(default)]
    pub entity_group: String,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub word: String,
    #[serde(default)]
    pub start: usize,
    #[serde(default)]
    pub end: usize,
}

/// The unit held by the result store. Summary, clauses and buckets always
/// come from the same analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub summary: String,
    pub clauses: Vec<Clause>,
    pub risk_buckets: Vec<RiskBucket>,
    pub analyzed_at: DateTime<Utc>,
}

impl AnalysisReport {
    pub fn new(summary: String, clauses: Vec<Clause>, risk_buckets: Vec<RiskBucket>) -> Self {
        Self {
            summary,
            clauses,
            risk_buckets,
            analyzed_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_clause_accepts_ml_service_shape() {
        let clause: Clause = serde_json::from_value(json!({
            "clause": "The tenant shall pay all legal fees.",
            "riskLevel": "Fear",
            "score": 0.87
        }))
        .unwrap();

        assert_eq!(clause.text, "The tenant shall pay all legal fees.");
        assert_eq!(clause.risk_level, "Fear");
        assert_eq!(clause.confidence, 0.87);
        assert_eq!(clause.category, None);
    }

    #[test]
    fn test_clause_missing_label_defaults_to_empty() {
        let clause: Clause = serde_json::from_value(json!({"text": "Whereas"})).unwrap();
        assert_eq!(clause.risk_level, "");
        assert_eq!(clause.confidence, 0.0);
    }

    #[test]
    fn test_clause_serializes_client_field_names() {
        let clause = Clause::new("Late fees apply.", "Sadness", 0.5);
        let value = serde_json::to_value(&clause).unwrap();

        assert_eq!(
            value,
            json!({"text": "Late fees apply.", "riskLevel": "Sadness", "confidence": 0.5})
        );
    }

    #[test]
    fn test_confidence_is_clamped() {
        assert_eq!(Clause::new("a", "joy", 1.7).confidence, 1.0);
        assert_eq!(Clause::new("a", "joy", -0.2).confidence, 0.0);
        assert_eq!(Clause::new("a", "joy", f64::NAN).confidence, 0.0);
    }

    #[test]
    fn test_entity_passthrough() {
        let entity: Entity = serde_json::from_value(json!({
            "entity_group": "ORG",
            "score": 0.99,
            "word": "Acme Corp",
            "start": 10,
            "end": 19
        }))
        .unwrap();
        assert_eq!(entity.entity_group, "ORG");
        assert_eq!(entity.end - entity.start, 9);
    }
}

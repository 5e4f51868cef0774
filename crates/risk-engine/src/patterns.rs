//! Label keywords and their risk tiers
//!
//! The clause classifier emits emotion-style labels ("Anger", "Fear",
//! "Sadness", ...). Each keyword below is matched as a substring of a
//! lowercased label token, checked in tier order, so "fearful" is High.

use shared_types::RiskLevel;

/// Keywords that mark a token as high risk
pub const HIGH_RISK_KEYWORDS: &[&str] = &["anger", "fear"];

/// Keywords that mark a token as medium risk
pub const MEDIUM_RISK_KEYWORDS: &[&str] = &["sad", "surprise"];

/// Keywords that mark a token as low risk
pub const LOW_RISK_KEYWORDS: &[&str] = &["joy", "neutral"];

/// Tiers checked in order; first hit wins. Unmatched tokens are `RiskLevel::None`.
pub const TIERS: &[(RiskLevel, &[&str])] = &[
    (RiskLevel::High, HIGH_RISK_KEYWORDS),
    (RiskLevel::Medium, MEDIUM_RISK_KEYWORDS),
    (RiskLevel::Low, LOW_RISK_KEYWORDS),
];

/// Map a single lowercased label token to its tier.
pub fn level_for_token(token: &str) -> RiskLevel {
    TIERS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| token.contains(kw)))
        .map(|(level, _)| *level)
        .unwrap_or(RiskLevel::None)
}

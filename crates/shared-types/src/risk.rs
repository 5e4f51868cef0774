use serde::{Deserialize, Serialize};

/// The four canonical severity tiers, in chart order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    #[serde(rename = "High Risk")]
    High,
    #[serde(rename = "Medium Risk")]
    Medium,
    #[serde(rename = "Low Risk")]
    Low,
    #[serde(rename = "No Risk")]
    None,
}

impl RiskLevel {
    /// Canonical order used for every bucket list.
    pub const ALL: [RiskLevel; 4] = [
        RiskLevel::High,
        RiskLevel::Medium,
        RiskLevel::Low,
        RiskLevel::None,
    ];

    pub fn label(self) -> &'static str {
        match self {
            RiskLevel::High => "High Risk",
            RiskLevel::Medium => "Medium Risk",
            RiskLevel::Low => "Low Risk",
            RiskLevel::None => "No Risk",
        }
    }

    /// Display color for charts
    pub fn color(self) -> &'static str {
        match self {
            RiskLevel::High => "#ef4444",
            RiskLevel::Medium => "#f59e0b",
            RiskLevel::Low => "#0ea5e9",
            RiskLevel::None => "#22c55e",
        }
    }

    /// Position in [`RiskLevel::ALL`]
    pub fn index(self) -> usize {
        match self {
            RiskLevel::High => 0,
            RiskLevel::Medium => 1,
            RiskLevel::Low => 2,
            RiskLevel::None => 3,
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One slice of the risk chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskBucket {
    pub risk_level: RiskLevel,
    pub count: usize,
    pub color: String,
}

impl RiskBucket {
    pub fn empty(level: RiskLevel) -> Self {
        Self {
            risk_level: level,
            count: 0,
            color: level.color().to_string(),
        }
    }
}

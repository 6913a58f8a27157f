use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Litigation and enforcement exposure.
///
/// Used both as the editorial tier of a catalog entry and as the level of a
/// batch assessment. Ordered from `Low` to `High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegalRisk {
    Low,
    Medium,
    High,
}

impl LegalRisk {
    pub const fn as_str(self) -> &'static str {
        match self {
            LegalRisk::Low => "low",
            LegalRisk::Medium => "medium",
            LegalRisk::High => "high",
        }
    }
}

impl fmt::Display for LegalRisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LegalRisk {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(LegalRisk::Low),
            "medium" => Ok(LegalRisk::Medium),
            "high" => Ok(LegalRisk::High),
            other => Err(format!(
                "invalid legal risk: {other} (expected low|medium|high)"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalRiskAssessment {
    pub level: LegalRisk,
    pub description: String,
    pub fine_estimate: String,
    pub high_risk_count: usize,
}

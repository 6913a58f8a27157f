use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity of an accessibility defect.
///
/// Variants are declared from most to least severe, so the derived `Ord`
/// sorts `Critical` first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Critical,
    Serious,
    Moderate,
    Minor,
}

impl Impact {
    pub const ALL: [Impact; 4] = [
        Impact::Critical,
        Impact::Serious,
        Impact::Moderate,
        Impact::Minor,
    ];

    /// Lower rank means more severe.
    pub const fn rank(self) -> u8 {
        match self {
            Impact::Critical => 0,
            Impact::Serious => 1,
            Impact::Moderate => 2,
            Impact::Minor => 3,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Impact::Critical => "critical",
            Impact::Serious => "serious",
            Impact::Moderate => "moderate",
            Impact::Minor => "minor",
        }
    }
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Impact {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "critical" => Ok(Impact::Critical),
            "serious" => Ok(Impact::Serious),
            "moderate" => Ok(Impact::Moderate),
            "minor" => Ok(Impact::Minor),
            other => Err(format!(
                "invalid impact: {other} (expected critical|serious|moderate|minor)"
            )),
        }
    }
}

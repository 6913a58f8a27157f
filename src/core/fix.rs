use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::{Effort, Impact, LegalRisk};

/// One knowledge-base record, keyed by the scanner's issue identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixEntry {
    pub id: String,
    pub title: String,
    pub description: String,
    pub impact: Impact,
    /// Applicable standard clauses, in citation order.
    #[serde(default)]
    pub standards: Vec<String>,
    pub legal_risk: LegalRisk,
    pub effort: Effort,
    /// Curated ranking weight in `1..=100`; higher means fix sooner.
    pub priority: u8,
    #[serde(default)]
    pub guidance: FixGuidance,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<Reference>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixGuidance {
    #[serde(default)]
    pub instructions: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub platforms: BTreeMap<String, String>,
}

impl FixGuidance {
    /// Platform-specific instructions. Names are compared case-insensitively
    /// and must match a key exactly otherwise.
    pub fn platform(&self, name: &str) -> Option<&str> {
        self.platforms
            .iter()
            .find(|(key, _)| same_platform(key, name))
            .map(|(_, text)| text.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub title: String,
    pub url: String,
}

pub fn same_platform(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

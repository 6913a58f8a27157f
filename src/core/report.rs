use crate::core::{DetectedIssue, FixEntry, LegalRiskAssessment};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSummary {
    pub issue_count: usize,
    pub instance_count: u64,
    pub estimated_minutes: u32,
    pub estimated_time: String,
    pub legal_risk: LegalRiskAssessment,
    pub unmatched_issues: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanItem {
    #[serde(flatten)]
    pub issue: DetectedIssue,
    pub priority: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fix: Option<FixEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform_fix: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemediationReport {
    pub schema_version: String,
    pub tool_version: String,
    pub generated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    pub summary: PlanSummary,
    pub items: Vec<PlanItem>,
}

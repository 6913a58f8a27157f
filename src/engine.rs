use std::sync::Arc;

use anyhow::{Context, Result};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::catalog::Catalog;
use crate::core::{PlanItem, PlanSummary, RemediationReport, ScanResult};
use crate::plan;

pub const SCHEMA_VERSION: &str = "1.0";

#[derive(Clone)]
pub struct Engine {
    catalog: Arc<Catalog>,
}

#[derive(Debug, Clone)]
pub struct PlanRequest {
    pub scan: ScanResult,
    /// Overrides the platform recorded in the scan.
    pub platform: Option<String>,
}

impl Engine {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn plan(&self, req: PlanRequest) -> Result<RemediationReport> {
        let generated_at = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .context("failed to format report timestamp")?;
        Ok(self.plan_at(req, generated_at))
    }

    /// Builds the report with a caller-supplied timestamp.
    pub fn plan_at(&self, req: PlanRequest, generated_at: String) -> RemediationReport {
        let PlanRequest { scan, platform } = req;
        let platform = platform
            .filter(|p| !p.trim().is_empty())
            .or(scan.platform.clone());
        let catalog = self.catalog.as_ref();
        let issues = &scan.issues;

        let unmatched_issues: Vec<String> = issues
            .iter()
            .filter(|issue| catalog.lookup_fix(&issue.id).is_none())
            .map(|issue| issue.id.clone())
            .collect();
        for id in &unmatched_issues {
            tracing::warn!(issue_id = %id, "issue has no catalog entry, no fix guidance available");
        }

        let estimated_minutes = plan::estimate_remediation_minutes(catalog, issues);
        let legal_risk = plan::classify_legal_risk(catalog, issues);
        tracing::debug!(
            issues = issues.len(),
            estimated_minutes,
            level = %legal_risk.level,
            "plan aggregated"
        );

        let items = plan::prioritize_issues(catalog, issues)
            .into_iter()
            .map(|issue| {
                let priority = plan::priority_of(catalog, &issue);
                let fix = catalog.lookup_fix(&issue.id).cloned();
                let platform_fix = platform
                    .as_deref()
                    .and_then(|p| catalog.lookup_platform_fix(&issue.id, p))
                    .map(ToOwned::to_owned);
                PlanItem {
                    issue,
                    priority,
                    fix,
                    platform_fix,
                }
            })
            .collect();

        RemediationReport {
            schema_version: SCHEMA_VERSION.to_string(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            generated_at,
            url: scan.url,
            platform,
            summary: PlanSummary {
                issue_count: issues.len(),
                instance_count: issues.iter().map(|i| u64::from(i.count)).sum(),
                estimated_minutes,
                estimated_time: plan::format_duration(estimated_minutes),
                legal_risk,
                unmatched_issues,
            },
            items,
        }
    }
}

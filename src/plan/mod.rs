//! Batch aggregation over detected issues: total effort, legal risk and
//! display order.
//!
//! Every function reads the catalog and never the issue's own data when a
//! catalog entry exists; issues without an entry go through the catalog's
//! [`UnknownIssuePolicy`](crate::catalog::UnknownIssuePolicy).

use std::cmp::{Ordering, Reverse};

use crate::catalog::Catalog;
use crate::core::{IssueLike, LegalRisk, LegalRiskAssessment};

/// Upper bound on the instance multiplier for per-instance effort.
// Product decision, not an engineering constant.
pub const PER_INSTANCE_CAP: u32 = 10;

/// Number of high-risk issues at which the batch is rated `high`.
pub const HIGH_RISK_THRESHOLD: usize = 3;
/// Number of high-risk issues at which the batch is rated `medium`.
pub const MEDIUM_RISK_THRESHOLD: usize = 1;

const HOUR_MINUTES: u32 = 60;
const WORKDAY_MINUTES: u32 = 8 * HOUR_MINUTES;

/// Total effort for a batch in minutes, summing each issue's lower bound.
pub fn estimate_remediation_minutes<T: IssueLike>(catalog: &Catalog, issues: &[T]) -> u32 {
    issues.iter().fold(0u32, |total, issue| {
        let minutes = match catalog.lookup_fix(issue.id()) {
            Some(entry) => entry.effort.minutes_for(issue.count(), PER_INSTANCE_CAP),
            None => catalog.unknown_policy().effort_minutes,
        };
        total.saturating_add(minutes)
    })
}

/// Total effort for a batch as a human-scale duration string.
pub fn estimate_remediation_time<T: IssueLike>(catalog: &Catalog, issues: &[T]) -> String {
    format_duration(estimate_remediation_minutes(catalog, issues))
}

/// `"N minutes"` below an hour, hours to one decimal below a workday, and
/// whole 8-hour days (rounded up) beyond that.
pub fn format_duration(minutes: u32) -> String {
    if minutes < HOUR_MINUTES {
        return format!("{minutes} minutes");
    }
    if minutes < WORKDAY_MINUTES {
        let tenths = (minutes * 10 + HOUR_MINUTES / 2) / HOUR_MINUTES;
        return if tenths % 10 == 0 {
            format!("{} hours", tenths / 10)
        } else {
            format!("{}.{} hours", tenths / 10, tenths % 10)
        };
    }
    format!("{} days", minutes.div_ceil(WORKDAY_MINUTES))
}

fn is_high_risk<T: IssueLike>(catalog: &Catalog, issue: &T) -> bool {
    match catalog.lookup_fix(issue.id()) {
        Some(entry) => entry.legal_risk == LegalRisk::High,
        None => issue.impact() == catalog.unknown_policy().high_risk_impact,
    }
}

/// Legal exposure of a batch, stepped on the number of high-risk issues.
pub fn classify_legal_risk<T: IssueLike>(catalog: &Catalog, issues: &[T]) -> LegalRiskAssessment {
    let high_risk_count = issues
        .iter()
        .filter(|issue| is_high_risk(catalog, *issue))
        .count();
    assessment_for(high_risk_count)
}

/// Step function over the number of high-risk issues.
pub fn assessment_for(high_risk_count: usize) -> LegalRiskAssessment {
    let (level, description, fine_estimate) = if high_risk_count >= HIGH_RISK_THRESHOLD {
        (
            LegalRisk::High,
            "Several high-risk barriers block core tasks for disabled users. Sites in this state are the typical target of complaints and enforcement action.",
            "€20,000 - €100,000",
        )
    } else if high_risk_count >= MEDIUM_RISK_THRESHOLD {
        (
            LegalRisk::Medium,
            "At least one high-risk barrier was found. Fixing it promptly removes the most likely grounds for a complaint.",
            "€5,000 - €20,000",
        )
    } else {
        (
            LegalRisk::Low,
            "No high-risk barriers were found. Remaining issues affect usability but are unlikely to trigger enforcement on their own.",
            "< €5,000",
        )
    };
    LegalRiskAssessment {
        level,
        description: description.to_string(),
        fine_estimate: fine_estimate.to_string(),
        high_risk_count,
    }
}

/// Catalog priority for an issue, falling back to the unknown-issue policy.
pub fn priority_of<T: IssueLike>(catalog: &Catalog, issue: &T) -> u8 {
    catalog
        .lookup_fix(issue.id())
        .map(|entry| entry.priority)
        .unwrap_or(catalog.unknown_policy().priority)
}

/// Orders a batch by catalog priority (desc), impact (most severe first)
/// and instance count (desc). The sort is stable and the input is left
/// untouched.
pub fn prioritize_issues<T: IssueLike + Clone>(catalog: &Catalog, issues: &[T]) -> Vec<T> {
    let mut keyed: Vec<(u8, &T)> = issues
        .iter()
        .map(|issue| (priority_of(catalog, issue), issue))
        .collect();
    keyed.sort_by(|(pa, a), (pb, b)| compare(*pa, *a, *pb, *b));
    keyed.into_iter().map(|(_, issue)| issue.clone()).collect()
}

fn compare<T: IssueLike>(pa: u8, a: &T, pb: u8, b: &T) -> Ordering {
    let key = |p: u8, issue: &T| (Reverse(p), issue.impact().rank(), Reverse(issue.count()));
    key(pa, a).cmp(&key(pb, b))
}

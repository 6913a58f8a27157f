use std::fmt::Write as _;

use crate::core::{PlanItem, RemediationReport};

pub fn format_report(report: &RemediationReport) -> String {
    let mut out = String::new();
    let summary = &report.summary;

    let _ = writeln!(out, "# Accessibility remediation plan");
    let _ = writeln!(out);
    if let Some(url) = &report.url {
        let _ = writeln!(out, "- Site: {url}");
    }
    if let Some(platform) = &report.platform {
        let _ = writeln!(out, "- Platform: {platform}");
    }
    let _ = writeln!(out, "- Generated: {}", report.generated_at);
    let _ = writeln!(
        out,
        "- Issues: {} ({} instances)",
        summary.issue_count, summary.instance_count
    );
    let _ = writeln!(out, "- Estimated effort: {}", summary.estimated_time);
    let _ = writeln!(
        out,
        "- Legal risk: **{}** (estimated fines {})",
        summary.legal_risk.level, summary.legal_risk.fine_estimate
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "> {}", summary.legal_risk.description);

    let _ = writeln!(out);
    let _ = writeln!(out, "## Issues ({})", report.items.len());
    if report.items.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "_No issues were reported._");
    }

    for (n, item) in report.items.iter().enumerate() {
        write_item(&mut out, n + 1, item, report.platform.as_deref());
    }

    out
}

fn write_item(out: &mut String, n: usize, item: &PlanItem, platform: Option<&str>) {
    let issue = &item.issue;
    let _ = writeln!(out);
    let Some(fix) = &item.fix else {
        let title = if issue.description.is_empty() {
            issue.id.as_str()
        } else {
            issue.description.as_str()
        };
        let _ = writeln!(out, "### {n}. {title}");
        let _ = writeln!(
            out,
            "- id: `{}` | impact: {} | instances: {}",
            issue.id, issue.impact, issue.count
        );
        let _ = writeln!(out);
        let _ = writeln!(out, "_No fix guidance available for this issue._");
        return;
    };

    let _ = writeln!(out, "### {n}. {}", fix.title);
    let _ = writeln!(
        out,
        "- id: `{}` | impact: {} | instances: {} | priority: {}",
        issue.id, issue.impact, issue.count, item.priority
    );
    let _ = writeln!(
        out,
        "- Legal risk: {} | Effort: {}",
        fix.legal_risk, fix.effort
    );
    if !fix.standards.is_empty() {
        let _ = writeln!(out, "- Standards: {}", fix.standards.join(", "));
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", fix.description);
    let _ = writeln!(out);
    let _ = writeln!(out, "#### How to fix");
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", fix.guidance.instructions);
    if let Some(code) = &fix.guidance.code {
        let _ = writeln!(out);
        write_fenced_code_block(out, "", "html", code.trim_end());
    }
    if let (Some(platform), Some(text)) = (platform, &item.platform_fix) {
        let _ = writeln!(out);
        let _ = writeln!(out, "#### On {platform}");
        let _ = writeln!(out);
        let _ = writeln!(out, "{text}");
    }
    if !fix.references.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "#### References");
        let _ = writeln!(out);
        for r in &fix.references {
            let _ = writeln!(out, "- [{}]({})", r.title, r.url);
        }
    }
}

fn write_fenced_code_block(out: &mut String, indent: &str, lang: &str, content: &str) {
    let _ = writeln!(out, "{indent}```{lang}");
    for line in content.lines() {
        let _ = writeln!(out, "{indent}{line}");
    }
    let _ = writeln!(out, "{indent}```");
}

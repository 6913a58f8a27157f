use anyhow::Error;
use std::io::{self, Write};
use unicode_width::UnicodeWidthChar;

use crate::catalog::Catalog;
use crate::core::{FixEntry, Impact, LegalRisk, RemediationReport};

#[derive(Debug, Clone)]
pub struct UiConfig {
    pub color: bool,
    pub max_table_rows: usize,
    pub quiet: bool,
    pub verbose: bool,
}

pub fn eprintln_error(err: &Error) {
    let _ = write_error(&mut io::stderr().lock(), err);
}

pub fn write_error(out: &mut impl Write, err: &Error) -> io::Result<()> {
    writeln!(out, "error:")?;
    writeln!(out, "  {err}")?;

    let mut causes = err.chain().skip(1).peekable();
    if causes.peek().is_some() {
        writeln!(out, "caused by:")?;
        for cause in causes {
            writeln!(out, "  - {cause}")?;
        }
    }

    writeln!(out, "next:")?;
    writeln!(out, "  - re-run with `--verbose` to see debug logs")?;
    writeln!(
        out,
        "  - see `a11yplan --help` for available commands and options"
    )
}

pub fn print_plan(report: &RemediationReport, cfg: &UiConfig, top_n: usize) {
    if cfg.quiet {
        return;
    }
    let mut out = io::stdout().lock();
    write_plan(&mut out, report, cfg, top_n);
}

pub fn write_plan(out: &mut dyn Write, report: &RemediationReport, cfg: &UiConfig, top_n: usize) {
    let summary = &report.summary;
    let _ = writeln!(
        out,
        "Summary: {} issues ({} instances)  estimated time={}  legal risk={} ({})",
        summary.issue_count,
        summary.instance_count,
        summary.estimated_time,
        format_legal_risk(summary.legal_risk.level, cfg.color),
        summary.legal_risk.fine_estimate
    );
    let _ = writeln!(out, "- {}", summary.legal_risk.description);
    if let Some(url) = &report.url {
        let _ = writeln!(out, "- Site: {url}");
    }
    if let Some(platform) = &report.platform {
        let _ = writeln!(out, "- Platform: {platform}");
    }
    if !summary.unmatched_issues.is_empty() {
        let _ = writeln!(
            out,
            "- No fix guidance for: {}",
            summary.unmatched_issues.join(", ")
        );
    }

    let total = report.items.len();
    let rows = cfg.max_table_rows.min(top_n).min(total);

    let _ = writeln!(out);
    if total > rows {
        let _ = writeln!(out, "Prioritized issues ({rows} of {total} shown):");
    } else {
        let _ = writeln!(out, "Prioritized issues ({rows} shown):");
    }

    let prio_w = 4;
    let impact_w = "critical".len();
    let count_w = 5;
    let _ = writeln!(
        out,
        "{}  {}  {}  ISSUE",
        pad_start_display("PRIO", prio_w),
        pad_end_display("IMPACT", impact_w),
        pad_start_display("COUNT", count_w)
    );
    for item in report.items.iter().take(rows) {
        let title = item
            .fix
            .as_ref()
            .map(|f| format!("{} ({})", f.title, item.issue.id))
            .unwrap_or_else(|| {
                if item.issue.description.is_empty() {
                    item.issue.id.clone()
                } else {
                    format!("{} ({})", item.issue.description, item.issue.id)
                }
            });
        let _ = writeln!(
            out,
            "{}  {}  {}  {}",
            pad_start_display(&item.priority.to_string(), prio_w),
            pad_end_ansi(&format_impact(item.issue.impact, cfg.color), impact_w),
            pad_start_display(&item.issue.count.to_string(), count_w),
            title
        );
    }
    if total > rows {
        let _ = writeln!(out, "...({} more)", total - rows);
    }

    let platform_fixes: Vec<_> = report
        .items
        .iter()
        .take(rows)
        .filter_map(|i| i.platform_fix.as_deref().map(|f| (i.issue.id.as_str(), f)))
        .collect();
    if let (Some(platform), false) = (&report.platform, platform_fixes.is_empty()) {
        let _ = writeln!(out);
        let _ = writeln!(out, "{platform} instructions:");
        for (id, fix) in platform_fixes {
            let _ = writeln!(out, "- {id}: {fix}");
        }
    }
}

pub fn print_lookup(entry: &FixEntry, platform_fix: Option<(&str, &str)>, cfg: &UiConfig) {
    if cfg.quiet {
        return;
    }
    let mut out = io::stdout().lock();
    write_lookup(&mut out, entry, platform_fix, cfg);
}

pub fn write_lookup(
    out: &mut dyn Write,
    entry: &FixEntry,
    platform_fix: Option<(&str, &str)>,
    cfg: &UiConfig,
) {
    let _ = writeln!(out, "{} ({})", entry.title, entry.id);
    let _ = writeln!(
        out,
        "impact={}  legal risk={}  priority={}  effort={}",
        format_impact(entry.impact, cfg.color),
        format_legal_risk(entry.legal_risk, cfg.color),
        entry.priority,
        entry.effort
    );
    if !entry.standards.is_empty() {
        let _ = writeln!(out, "standards: {}", entry.standards.join(", "));
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", entry.description);
    let _ = writeln!(out);
    let _ = writeln!(out, "How to fix:");
    let _ = writeln!(out, "  {}", entry.guidance.instructions);
    if let Some(code) = &entry.guidance.code {
        let _ = writeln!(out);
        for line in code.trim_end().lines() {
            let _ = writeln!(out, "    {line}");
        }
    }
    if let Some((platform, text)) = platform_fix {
        let _ = writeln!(out);
        let _ = writeln!(out, "On {platform}:");
        let _ = writeln!(out, "  {text}");
    } else if cfg.verbose && !entry.guidance.platforms.is_empty() {
        let names: Vec<&str> = entry.guidance.platforms.keys().map(String::as_str).collect();
        let _ = writeln!(out);
        let _ = writeln!(out, "Platform guides: {}", names.join(", "));
    }
    if !entry.references.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "References:");
        for r in &entry.references {
            let _ = writeln!(out, "- {}: {}", r.title, r.url);
        }
    }
}

pub fn print_catalog(catalog: &Catalog, cfg: &UiConfig) {
    if cfg.quiet {
        return;
    }
    let mut out = io::stdout().lock();

    let id_w = catalog
        .entries()
        .iter()
        .map(|e| visible_width_ansi(&e.id))
        .max()
        .unwrap_or(0)
        .max("ID".len());
    let impact_w = "critical".len();
    let risk_w = "medium".len();

    let _ = writeln!(
        out,
        "{}  PRIO  {}  {}  EFFORT",
        pad_end_display("ID", id_w),
        pad_end_display("IMPACT", impact_w),
        pad_end_display("RISK", risk_w)
    );
    let mut entries: Vec<&FixEntry> = catalog.entries().iter().collect();
    entries.sort_by_key(|e| (std::cmp::Reverse(e.priority), e.id.as_str()));
    for e in entries {
        let _ = writeln!(
            out,
            "{}  {}  {}  {}  {}",
            pad_end_display(&e.id, id_w),
            pad_start_display(&e.priority.to_string(), 4),
            pad_end_ansi(&format_impact(e.impact, cfg.color), impact_w),
            pad_end_ansi(&format_legal_risk(e.legal_risk, cfg.color), risk_w),
            e.effort
        );
    }
}

fn format_impact(impact: Impact, color: bool) -> String {
    let s = impact.as_str();
    if !color {
        return s.to_string();
    }

    let code = match impact {
        Impact::Critical => "31",
        Impact::Serious => "33",
        Impact::Moderate => "36",
        Impact::Minor => "90",
    };
    format!("\x1b[{code}m{s}\x1b[0m")
}

fn format_legal_risk(risk: LegalRisk, color: bool) -> String {
    let s = risk.as_str();
    if !color {
        return s.to_string();
    }

    let code = match risk {
        LegalRisk::High => "31",
        LegalRisk::Medium => "33",
        LegalRisk::Low => "32",
    };
    format!("\x1b[{code}m{s}\x1b[0m")
}

fn pad_end_ansi(s: &str, width: usize) -> String {
    let w = visible_width_ansi(s);
    if w >= width {
        return s.to_string();
    }
    format!("{s}{}", " ".repeat(width - w))
}

fn pad_end_display(s: &str, width: usize) -> String {
    pad_end_ansi(s, width)
}

fn pad_start_display(s: &str, width: usize) -> String {
    let w = visible_width_ansi(s);
    if w >= width {
        return s.to_string();
    }
    format!("{}{}", " ".repeat(width - w), s)
}

fn visible_width_ansi(s: &str) -> usize {
    let mut width: usize = 0;
    let mut chars = s.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\x1b' && chars.peek() == Some(&'[') {
            let _ = chars.next();
            for ch2 in chars.by_ref() {
                if ch2 == 'm' {
                    break;
                }
            }
            continue;
        }
        width = width.saturating_add(UnicodeWidthChar::width(ch).unwrap_or(0));
    }
    width
}

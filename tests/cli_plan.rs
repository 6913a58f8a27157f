use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::sync::atomic::{AtomicU64, Ordering};

fn a11yplan_cmd(home: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_a11yplan"));
    cmd.env("HOME", home);
    cmd.env_remove("A11YPLAN_CONFIG");
    cmd.env_remove("A11YPLAN_UI_COLOR");
    cmd.env_remove("A11YPLAN_UI_MAX_TABLE_ROWS");
    cmd.env_remove("A11YPLAN_CATALOG_PATH");
    cmd.env_remove("A11YPLAN_PLAN_DEFAULT_PLATFORM");
    cmd.env_remove("RUST_LOG");
    cmd
}

fn run(home: &Path, args: &[&str]) -> Output {
    a11yplan_cmd(home).args(args).output().expect("run a11yplan")
}

fn make_temp_home() -> PathBuf {
    static HOME_SEQ: AtomicU64 = AtomicU64::new(0);

    let temp = std::env::temp_dir();
    let seq = HOME_SEQ.fetch_add(1, Ordering::Relaxed);
    let uniq = format!("a11yplan-cli-test-{}-{seq}", std::process::id());
    let home = temp.join(uniq);
    let _ = std::fs::remove_dir_all(&home);
    std::fs::create_dir_all(&home).expect("create home");
    home
}

fn fixture(name: &str) -> String {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
        .display()
        .to_string()
}

fn write_file(path: &Path, bytes: &[u8]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("mkdirs");
    }
    std::fs::write(path, bytes).expect("write");
}

#[test]
fn plan_json_is_prioritized_and_summarized() {
    let home = make_temp_home();
    let scan = fixture("scan_shopify.json");
    let out = run(&home, &["plan", &scan, "--json"]);
    assert!(
        out.status.success(),
        "stderr={}",
        String::from_utf8_lossy(&out.stderr)
    );

    let v: serde_json::Value = serde_json::from_slice(&out.stdout).expect("parse json");
    let summary = v.get("summary").expect("summary");
    assert_eq!(summary["issue_count"], 4);
    assert_eq!(summary["instance_count"], 30);
    assert_eq!(summary["estimated_minutes"], 45);
    assert_eq!(summary["estimated_time"], "45 minutes");
    assert_eq!(summary["legal_risk"]["level"], "medium");
    assert_eq!(summary["legal_risk"]["fine_estimate"], "€5,000 - €20,000");
    assert_eq!(summary["unmatched_issues"][0], "carousel-autoplay");

    let ids: Vec<&str> = v["items"]
        .as_array()
        .expect("items array")
        .iter()
        .map(|i| i["id"].as_str().expect("id"))
        .collect();
    assert_eq!(
        ids,
        vec!["image-alt", "label", "color-contrast", "carousel-autoplay"]
    );

    assert_eq!(v["platform"], "Shopify");
    assert!(v["items"][0]["platform_fix"].is_string());
    assert_eq!(v["items"][0]["fix"]["effort"], "2-5 minutes per image");
    assert!(v["items"][3].get("fix").is_none());

    let _ = std::fs::remove_dir_all(&home);
}

#[test]
fn plan_reads_bare_array_from_stdin() {
    let home = make_temp_home();
    let scan = std::fs::read(fixture("scan_array.json")).expect("read fixture");

    let mut child = a11yplan_cmd(&home)
        .args(["plan", "-", "--json", "--platform", "WORDPRESS"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn a11yplan");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(&scan)
        .expect("write stdin");
    let out = child.wait_with_output().expect("wait");
    assert!(
        out.status.success(),
        "stderr={}",
        String::from_utf8_lossy(&out.stderr)
    );

    let v: serde_json::Value = serde_json::from_slice(&out.stdout).expect("parse json");
    assert_eq!(v["summary"]["estimated_time"], "15 minutes");
    assert_eq!(v["items"][0]["id"], "meta-viewport");
    assert_eq!(v["platform"], "WORDPRESS");
    let platform_fix = v["items"][0]["platform_fix"].as_str().expect("platform fix");
    assert!(platform_fix.contains("header.php"), "{platform_fix}");

    let _ = std::fs::remove_dir_all(&home);
}

#[test]
fn plan_text_output_shows_summary_and_platform_steps() {
    let home = make_temp_home();
    let scan = fixture("scan_shopify.json");
    let out = run(&home, &["plan", &scan]);
    assert!(out.status.success());

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(
        stdout.contains("Summary: 4 issues (30 instances)  estimated time=45 minutes"),
        "stdout={stdout}"
    );
    assert!(stdout.contains("legal risk=medium"), "stdout={stdout}");
    assert!(
        !stdout.contains('\x1b'),
        "non-tty output must not be colored: stdout={stdout}"
    );
    assert!(stdout.contains("Shopify instructions:"), "stdout={stdout}");

    let _ = std::fs::remove_dir_all(&home);
}

#[test]
fn plan_markdown_renders_sections() {
    let home = make_temp_home();
    let scan = fixture("scan_shopify.json");
    let out = run(&home, &["plan", &scan, "--markdown"]);
    assert!(out.status.success());

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("# Accessibility remediation plan"), "stdout={stdout}");
    assert!(stdout.contains("## Issues (4)"), "stdout={stdout}");
    assert!(
        stdout.contains("### 1. Images must have alternative text"),
        "stdout={stdout}"
    );
    assert!(stdout.contains("#### On Shopify"), "stdout={stdout}");
    assert!(
        stdout.contains("### 4. Carousel starts moving on its own"),
        "stdout={stdout}"
    );

    let _ = std::fs::remove_dir_all(&home);
}

#[test]
fn plan_json_and_markdown_conflict_exits_2() {
    let home = make_temp_home();
    let scan = fixture("scan_shopify.json");
    let out = run(&home, &["plan", &scan, "--json", "--markdown"]);
    assert_eq!(out.status.code(), Some(2));
    let _ = std::fs::remove_dir_all(&home);
}

#[test]
fn plan_missing_scan_file_exits_2() {
    let home = make_temp_home();
    let missing = home.join("nope.json");
    let out = run(&home, &["plan", missing.to_str().expect("utf8 path")]);
    assert_eq!(out.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("failed to read scan result"), "stderr={stderr}");
    let _ = std::fs::remove_dir_all(&home);
}

#[test]
fn plan_invalid_scan_json_exits_2() {
    let home = make_temp_home();
    let scan = home.join("scan.json");
    write_file(&scan, br#"[{"id": "image-alt", "impact": "dreadful", "count": 1}]"#);
    let out = run(&home, &["plan", scan.to_str().expect("utf8 path")]);
    assert_eq!(out.status.code(), Some(2));
    let _ = std::fs::remove_dir_all(&home);
}

#[test]
fn broken_catalog_exits_20() {
    let home = make_temp_home();
    let catalog = home.join("catalog.toml");
    write_file(
        &catalog,
        br#"
[[fix]]
id = "image-alt"
title = "Images"
description = "Images"
impact = "critical"
legal_risk = "high"
effort = "it depends"
priority = 95
"#,
    );
    let scan = fixture("scan_shopify.json");
    let out = run(
        &home,
        &["--catalog", catalog.to_str().expect("utf8 path"), "plan", &scan],
    );
    assert_eq!(out.status.code(), Some(20));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("catalog"), "stderr={stderr}");

    let out = run(
        &home,
        &["catalog", "validate", catalog.to_str().expect("utf8 path")],
    );
    assert_eq!(out.status.code(), Some(20));

    let _ = std::fs::remove_dir_all(&home);
}

#[test]
fn custom_catalog_replaces_builtin() {
    let home = make_temp_home();
    let catalog = home.join("catalog.toml");
    write_file(
        &catalog,
        br#"
[[fix]]
id = "carousel-autoplay"
title = "Carousels must not autoplay"
description = "Moving content distracts and cannot be paused."
impact = "moderate"
legal_risk = "low"
effort = "1 hour"
priority = 99

[fix.guidance]
instructions = "Add a pause button and disable autoplay."
"#,
    );
    let scan = fixture("scan_shopify.json");
    let out = run(
        &home,
        &[
            "--catalog",
            catalog.to_str().expect("utf8 path"),
            "plan",
            &scan,
            "--json",
        ],
    );
    assert!(
        out.status.success(),
        "stderr={}",
        String::from_utf8_lossy(&out.stderr)
    );
    let v: serde_json::Value = serde_json::from_slice(&out.stdout).expect("parse json");
    assert_eq!(v["items"][0]["id"], "carousel-autoplay");
    assert_eq!(v["summary"]["estimated_time"], "1 hours");
    // image-alt and label are now uncatalogued critical findings.
    assert_eq!(v["summary"]["legal_risk"]["level"], "medium");
    assert_eq!(v["summary"]["legal_risk"]["high_risk_count"], 2);

    let _ = std::fs::remove_dir_all(&home);
}

#[test]
fn lookup_matches_platform_case_insensitively() {
    let home = make_temp_home();
    let upper = run(&home, &["lookup", "image-alt", "--platform", "SHOPIFY", "--json"]);
    let proper = run(&home, &["lookup", "image-alt", "--platform", "Shopify", "--json"]);
    assert!(upper.status.success());
    assert!(proper.status.success());

    let upper: serde_json::Value = serde_json::from_slice(&upper.stdout).expect("parse json");
    let proper: serde_json::Value = serde_json::from_slice(&proper.stdout).expect("parse json");
    assert!(upper["platform_fix"].is_string());
    assert_eq!(upper["platform_fix"], proper["platform_fix"]);
    assert_eq!(upper["id"], "image-alt");

    let _ = std::fs::remove_dir_all(&home);
}

#[test]
fn lookup_does_not_match_partial_platform_names() {
    let home = make_temp_home();
    let out = run(
        &home,
        &["lookup", "image-alt", "--platform", "shopify plus", "--json"],
    );
    assert!(out.status.success());
    let v: serde_json::Value = serde_json::from_slice(&out.stdout).expect("parse json");
    assert!(v.get("platform_fix").is_none(), "{v}");
    assert_eq!(v["platform"], "shopify plus");
    let _ = std::fs::remove_dir_all(&home);
}

#[test]
fn lookup_unknown_issue_exits_2() {
    let home = make_temp_home();
    let out = run(&home, &["lookup", "no-such-rule"]);
    assert_eq!(out.status.code(), Some(2));
    let _ = std::fs::remove_dir_all(&home);
}

#[test]
fn catalog_list_and_validate_builtin() {
    let home = make_temp_home();

    let out = run(&home, &["catalog", "list", "--json"]);
    assert!(out.status.success());
    let v: serde_json::Value = serde_json::from_slice(&out.stdout).expect("parse json");
    let entries = v.as_array().expect("entries array");
    assert!(entries.iter().any(|e| e["id"] == "color-contrast"));

    let out = run(&home, &["catalog", "validate"]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.starts_with("ok: built-in catalog"), "stdout={stdout}");

    let _ = std::fs::remove_dir_all(&home);
}

#[test]
fn help_describes_every_subcommand() {
    let home = make_temp_home();
    let out = run(&home, &["--help"]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Print a shell completion script"), "stdout={stdout}");
    assert!(stdout.contains("Show the effective configuration"), "stdout={stdout}");
    let _ = std::fs::remove_dir_all(&home);
}

#[test]
fn errors_point_at_verbose_logs() {
    let home = make_temp_home();
    let out = run(&home, &["lookup", "no-such-rule"]);
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("to see debug logs"), "stderr={stderr}");
    let _ = std::fs::remove_dir_all(&home);
}

#[test]
fn completion_unknown_shell_exits_2() {
    let home = make_temp_home();
    let out = run(&home, &["completion", "nope"]);
    assert_eq!(out.status.code(), Some(2));
    let out = run(&home, &["completion", "bash"]);
    assert!(out.status.success());
    let _ = std::fs::remove_dir_all(&home);
}

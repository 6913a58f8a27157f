use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};

use crate::catalog::Catalog;
use crate::config::EffectiveConfig;
use crate::core::ScanResult;
use crate::engine::{Engine, PlanRequest};
use crate::ui::UiConfig;

mod markdown;

#[derive(Debug, Parser)]
#[command(
    name = "a11yplan",
    version,
    about = "Turn accessibility scan results into a prioritized remediation plan"
)]
pub struct Cli {
    #[arg(long, global = true)]
    pub json: bool,
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,
    #[arg(long, global = true)]
    pub verbose: bool,
    #[arg(long, global = true)]
    pub quiet: bool,
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Use this catalog instead of the built-in one
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Build a remediation plan from a scan result (JSON file or `-` for stdin)
    Plan(PlanArgs),
    /// Show the fix guidance for one issue id
    Lookup(LookupArgs),
    /// Inspect the fix catalog
    Catalog(CatalogArgs),
    /// Print a shell completion script
    Completion(CompletionArgs),
    /// Show the effective configuration
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
pub struct PlanArgs {
    pub scan: PathBuf,
    #[arg(long)]
    pub platform: Option<String>,
    #[arg(long)]
    pub markdown: bool,
    #[arg(long, default_value_t = 10)]
    pub top: usize,
}

#[derive(Debug, Args)]
pub struct LookupArgs {
    pub issue_id: String,
    #[arg(long)]
    pub platform: Option<String>,
}

#[derive(Debug, Args)]
pub struct CatalogArgs {
    #[command(subcommand)]
    pub command: CatalogCommand,
}

#[derive(Debug, Subcommand)]
pub enum CatalogCommand {
    List,
    Validate { path: Option<PathBuf> },
}

#[derive(Debug, Args)]
pub struct CompletionArgs {
    pub shell: String,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[arg(long)]
    pub show: bool,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    crate::logging::init(cli.verbose, cli.quiet);

    let stdout_is_tty = io::stdout().is_terminal();
    let home_dir = crate::config::home_dir().map_err(crate::exit::invalid_args_err)?;

    let env_config_path = std::env::var_os("A11YPLAN_CONFIG").map(PathBuf::from);
    let cfg = crate::config::load(
        cli.config.as_deref().or(env_config_path.as_deref()),
        &home_dir,
    )
    .map_err(crate::exit::invalid_args_err)?;

    let ui_cfg = UiConfig {
        color: stdout_is_tty && cfg.ui.color && !cli.no_color,
        max_table_rows: cfg.ui.max_table_rows,
        quiet: cli.quiet,
        verbose: cli.verbose,
    };

    match cli.command {
        Commands::Plan(args) => {
            if cli.json && args.markdown {
                return Err(crate::exit::invalid_args(
                    "plan: --json and --markdown are mutually exclusive",
                ));
            }
            let scan = read_scan(&args.scan).map_err(crate::exit::invalid_args_err)?;
            let engine = Engine::new(Arc::new(load_catalog(cli.catalog.as_deref(), &cfg)?));
            let report = engine.plan(PlanRequest {
                scan,
                platform: args.platform.or_else(|| cfg.plan.default_platform.clone()),
            })?;
            if cli.json {
                write_json(&report)?;
            } else if args.markdown {
                write_stdout(&markdown::format_report(&report))?;
            } else {
                crate::ui::print_plan(&report, &ui_cfg, args.top);
            }
        }
        Commands::Lookup(args) => {
            let catalog = load_catalog(cli.catalog.as_deref(), &cfg)?;
            let Some(entry) = catalog.lookup_fix(&args.issue_id) else {
                return Err(crate::exit::invalid_args(format!(
                    "no catalog entry for issue id: {}",
                    args.issue_id
                )));
            };
            let platform = args.platform.or_else(|| cfg.plan.default_platform.clone());
            let platform_fix = platform.as_deref().and_then(|p| {
                catalog
                    .lookup_platform_fix(&args.issue_id, p)
                    .map(|text| (p, text))
            });
            if cli.json {
                write_json(&LookupOutput {
                    entry,
                    platform: platform.as_deref(),
                    platform_fix: platform_fix.map(|(_, text)| text),
                })?;
            } else {
                crate::ui::print_lookup(entry, platform_fix, &ui_cfg);
            }
        }
        Commands::Catalog(args) => match args.command {
            CatalogCommand::List => {
                let catalog = load_catalog(cli.catalog.as_deref(), &cfg)?;
                if cli.json {
                    write_json(&catalog.entries())?;
                } else {
                    crate::ui::print_catalog(&catalog, &ui_cfg);
                }
            }
            CatalogCommand::Validate { path } => {
                let path = path.or(cli.catalog);
                let catalog = load_catalog(path.as_deref(), &cfg)?;
                if !ui_cfg.quiet {
                    let source = path
                        .as_deref()
                        .or(cfg.catalog.path.as_deref())
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "built-in catalog".to_string());
                    println!("ok: {source} ({} entries)", catalog.len());
                }
            }
        },
        Commands::Completion(args) => {
            let shell = parse_shell(&args.shell)?;
            let mut cmd = Cli::command();
            let mut out = io::stdout().lock();
            clap_complete::generate(shell, &mut cmd, "a11yplan", &mut out);
        }
        Commands::Config(args) => {
            if args.show {
                if cli.json {
                    write_json(&cfg)?;
                } else {
                    println!("{}", toml::to_string_pretty(&cfg)?);
                }
            } else if !ui_cfg.quiet {
                eprintln!("config: use `a11yplan config --show`");
            }
        }
    }

    Ok(())
}

#[derive(serde::Serialize)]
struct LookupOutput<'a> {
    #[serde(flatten)]
    entry: &'a crate::core::FixEntry,
    #[serde(skip_serializing_if = "Option::is_none")]
    platform: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    platform_fix: Option<&'a str>,
}

/// `--catalog` beats the configured path, which beats the built-in catalog.
fn load_catalog(flag: Option<&Path>, cfg: &EffectiveConfig) -> Result<Catalog> {
    match flag.or(cfg.catalog.path.as_deref()) {
        Some(path) => Catalog::load(path)
            .with_context(|| format!("catalog: {}", path.display()))
            .map_err(crate::exit::catalog_err),
        None => Catalog::builtin()
            .context("built-in catalog")
            .map_err(crate::exit::catalog_err),
    }
}

fn read_scan(path: &Path) -> Result<ScanResult> {
    let s = if path == Path::new("-") {
        let mut s = String::new();
        io::stdin()
            .read_to_string(&mut s)
            .context("failed to read scan result from stdin")?;
        s
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scan result: {}", path.display()))?
    };
    let scan: ScanResult = serde_json::from_str(&s)
        .with_context(|| format!("failed to parse scan result (JSON): {}", path.display()))?;
    tracing::debug!(issues = scan.issues.len(), "scan result loaded");
    Ok(scan)
}

fn write_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    let mut buf = serde_json::to_vec_pretty(value)?;
    buf.push(b'\n');
    write_stdout_bytes(&buf)
}

fn write_stdout(s: &str) -> Result<()> {
    write_stdout_bytes(s.as_bytes())
}

fn write_stdout_bytes(buf: &[u8]) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    match stdout.write_all(buf) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        Err(err) => Err(err.into()),
    }
}

fn parse_shell(s: &str) -> Result<clap_complete::Shell> {
    let s = s.trim().to_ascii_lowercase();
    match s.as_str() {
        "bash" => Ok(clap_complete::Shell::Bash),
        "zsh" => Ok(clap_complete::Shell::Zsh),
        "fish" => Ok(clap_complete::Shell::Fish),
        other => Err(crate::exit::invalid_args(format!(
            "unsupported shell: {other} (expected bash|zsh|fish)"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_shell_is_case_insensitive() {
        assert!(matches!(parse_shell("ZSH"), Ok(clap_complete::Shell::Zsh)));
        let err = parse_shell("powershell").expect_err("unsupported");
        assert_eq!(crate::exit::exit_code(&err), 2);
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn catalog_flag_beats_config() {
        let cfg = EffectiveConfig {
            catalog: crate::config::CatalogConfig {
                path: Some(PathBuf::from("/nonexistent/configured.toml")),
            },
            ..EffectiveConfig::default()
        };
        let err = load_catalog(Some(Path::new("/nonexistent/flag.toml")), &cfg)
            .expect_err("missing file");
        assert_eq!(crate::exit::exit_code(&err), 20);
        assert!(err.to_string().contains("flag.toml"), "{err}");
    }
}

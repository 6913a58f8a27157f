use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct EffectiveConfig {
    pub ui: UiConfig,
    pub catalog: CatalogConfig,
    pub plan: PlanConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_path: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UiConfig {
    pub color: bool,
    pub max_table_rows: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CatalogConfig {
    /// Replaces the built-in catalog when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PlanConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_platform: Option<String>,
}

impl Default for EffectiveConfig {
    fn default() -> Self {
        Self {
            ui: UiConfig {
                color: true,
                max_table_rows: 20,
            },
            catalog: CatalogConfig::default(),
            plan: PlanConfig::default(),
            config_path: None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    ui: Option<RawUiConfig>,
    catalog: Option<RawCatalogConfig>,
    plan: Option<RawPlanConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawUiConfig {
    color: Option<bool>,
    max_table_rows: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCatalogConfig {
    path: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPlanConfig {
    default_platform: Option<String>,
}

pub fn home_dir() -> Result<PathBuf> {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("HOME is not set"))
}

pub fn default_config_path(home_dir: &Path) -> PathBuf {
    home_dir.join(".config/a11yplan/config.toml")
}

/// Defaults, then the TOML file, then `A11YPLAN_*` environment variables.
pub fn load(config_path: Option<&Path>, home_dir: &Path) -> Result<EffectiveConfig> {
    let mut cfg = EffectiveConfig::default();

    let explicit = config_path.is_some();
    let path = config_path
        .map(ToOwned::to_owned)
        .unwrap_or_else(|| default_config_path(home_dir));

    if path.exists() {
        let s = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let raw: RawConfig = toml::from_str(&s)
            .with_context(|| format!("failed to parse config file (TOML): {}", path.display()))?;
        apply_raw_config(&mut cfg, raw, path.parent());
        cfg.config_path = Some(path.display().to_string());
        tracing::debug!(path = %path.display(), "config loaded");
    } else if explicit {
        return Err(anyhow!("config file not found: {}", path.display()));
    }

    apply_env_overrides(&mut cfg)?;

    Ok(cfg)
}

fn apply_raw_config(cfg: &mut EffectiveConfig, raw: RawConfig, base_dir: Option<&Path>) {
    if let Some(ui) = raw.ui {
        if let Some(color) = ui.color {
            cfg.ui.color = color;
        }
        if let Some(max_table_rows) = ui.max_table_rows {
            cfg.ui.max_table_rows = max_table_rows;
        }
    }

    if let Some(catalog) = raw.catalog {
        if let Some(path) = catalog.path {
            // Relative catalog paths are resolved against the config file.
            cfg.catalog.path = Some(match base_dir {
                Some(dir) if path.is_relative() => dir.join(path),
                _ => path,
            });
        }
    }

    if let Some(plan) = raw.plan {
        if let Some(default_platform) = plan.default_platform {
            cfg.plan.default_platform = non_empty(&default_platform);
        }
    }
}

fn apply_env_overrides(cfg: &mut EffectiveConfig) -> Result<()> {
    if let Ok(v) = std::env::var("A11YPLAN_UI_COLOR") {
        cfg.ui.color = parse_bool(&v).with_context(|| "A11YPLAN_UI_COLOR")?;
    }
    if let Ok(v) = std::env::var("A11YPLAN_UI_MAX_TABLE_ROWS") {
        cfg.ui.max_table_rows = v
            .trim()
            .parse::<usize>()
            .with_context(|| "A11YPLAN_UI_MAX_TABLE_ROWS")?;
    }
    if let Ok(v) = std::env::var("A11YPLAN_CATALOG_PATH") {
        if let Some(path) = non_empty(&v) {
            cfg.catalog.path = Some(PathBuf::from(path));
        }
    }
    if let Ok(v) = std::env::var("A11YPLAN_PLAN_DEFAULT_PLATFORM") {
        if let Some(platform) = non_empty(&v) {
            cfg.plan.default_platform = Some(platform);
        }
    }

    Ok(())
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

fn parse_bool(s: &str) -> Result<bool> {
    let s = s.trim().to_ascii_lowercase();
    match s.as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(anyhow!(
            "invalid boolean: {s} (expected true|false|1|0|yes|no|on|off)"
        )),
    }
}

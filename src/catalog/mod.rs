//! Fix knowledge base.
//!
//! A [`Catalog`] is loaded once (from the embedded TOML or a user-supplied
//! file), validated, and then shared read-only. Lookups never fail: an
//! unknown issue id or platform is `None`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::{FixEntry, Impact, same_platform};

pub const BUILTIN_CATALOG: &str = include_str!("builtin.toml");

/// Defaults applied to issues that have no catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UnknownIssuePolicy {
    pub priority: u8,
    pub effort_minutes: u32,
    /// Uncatalogued issues at this impact count as high legal risk.
    pub high_risk_impact: Impact,
}

impl Default for UnknownIssuePolicy {
    fn default() -> Self {
        Self {
            priority: 50,
            effort_minutes: 0,
            high_risk_impact: Impact::Critical,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse catalog TOML")]
    Parse(#[from] toml::de::Error),
    #[error("catalog entry #{index} has an empty id")]
    EmptyId { index: usize },
    #[error("duplicate catalog id: {0}")]
    DuplicateId(String),
    #[error("catalog entry {id}: priority {priority} is outside 1..=100")]
    PriorityOutOfRange { id: String, priority: u8 },
    #[error("catalog entry {id}: platform {platform:?} is listed more than once")]
    DuplicatePlatform { id: String, platform: String },
}

#[derive(Debug, Deserialize)]
struct RawCatalog {
    #[serde(default, rename = "fix")]
    fixes: Vec<FixEntry>,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<FixEntry>,
    index: HashMap<String, usize>,
    unknown: UnknownIssuePolicy,
}

impl Catalog {
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_toml_str(BUILTIN_CATALOG)
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let s = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_toml_str(&s)?;
        tracing::debug!(path = %path.display(), entries = catalog.len(), "catalog loaded");
        Ok(catalog)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, CatalogError> {
        let raw: RawCatalog = toml::from_str(s)?;
        Self::from_entries(raw.fixes)
    }

    pub fn from_entries(entries: Vec<FixEntry>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            validate_entry(i, entry)?;
            if index.insert(entry.id.clone(), i).is_some() {
                return Err(CatalogError::DuplicateId(entry.id.clone()));
            }
        }
        Ok(Self {
            entries,
            index,
            unknown: UnknownIssuePolicy::default(),
        })
    }

    pub fn with_unknown_policy(mut self, policy: UnknownIssuePolicy) -> Self {
        self.unknown = policy;
        self
    }

    pub fn unknown_policy(&self) -> &UnknownIssuePolicy {
        &self.unknown
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in the order they were authored.
    pub fn entries(&self) -> &[FixEntry] {
        &self.entries
    }

    /// Exact-match lookup by issue id.
    pub fn lookup_fix(&self, issue_id: &str) -> Option<&FixEntry> {
        self.index.get(issue_id).map(|&i| &self.entries[i])
    }

    /// Platform-specific instructions for an issue, matched case-insensitively
    /// against the entry's platform keys. No partial matching.
    pub fn lookup_platform_fix(&self, issue_id: &str, platform: &str) -> Option<&str> {
        let entry = self.lookup_fix(issue_id)?;
        let found = entry.guidance.platform(platform);
        if found.is_none() {
            tracing::debug!(issue_id, platform, "no platform-specific fix");
        }
        found
    }
}

fn validate_entry(index: usize, entry: &FixEntry) -> Result<(), CatalogError> {
    if entry.id.trim().is_empty() {
        return Err(CatalogError::EmptyId { index });
    }
    if !(1..=100).contains(&entry.priority) {
        return Err(CatalogError::PriorityOutOfRange {
            id: entry.id.clone(),
            priority: entry.priority,
        });
    }
    let platforms: Vec<&String> = entry.guidance.platforms.keys().collect();
    for (i, a) in platforms.iter().enumerate() {
        if platforms[i + 1..].iter().any(|b| same_platform(a, b)) {
            return Err(CatalogError::DuplicatePlatform {
                id: entry.id.clone(),
                platform: (*a).clone(),
            });
        }
    }
    Ok(())
}

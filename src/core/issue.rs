use serde::{Deserialize, Serialize};

use crate::core::Impact;

/// The fields the aggregation functions read from a finding.
///
/// Implemented by [`DetectedIssue`]; callers can implement it for their own
/// richer issue types and get them back, reordered, from
/// [`crate::plan::prioritize_issues`].
pub trait IssueLike {
    fn id(&self) -> &str;
    fn impact(&self) -> Impact;
    fn count(&self) -> u32;
}

/// A finding reported by the external scanner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedIssue {
    pub id: String,
    pub impact: Impact,
    #[serde(default)]
    pub description: String,
    pub count: u32,
}

impl DetectedIssue {
    pub fn new(id: impl Into<String>, impact: Impact, count: u32) -> Self {
        Self {
            id: id.into(),
            impact,
            description: String::new(),
            count,
        }
    }
}

impl IssueLike for DetectedIssue {
    fn id(&self) -> &str {
        &self.id
    }

    fn impact(&self) -> Impact {
        self.impact
    }

    fn count(&self) -> u32 {
        self.count
    }
}

impl<T: IssueLike + ?Sized> IssueLike for &T {
    fn id(&self) -> &str {
        (**self).id()
    }

    fn impact(&self) -> Impact {
        (**self).impact()
    }

    fn count(&self) -> u32 {
        (**self).count()
    }
}

/// A scanner result file: either an envelope with metadata or a bare array
/// of issues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    pub issues: Vec<DetectedIssue>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawScanResult {
    Envelope {
        #[serde(default)]
        url: Option<String>,
        #[serde(default)]
        platform: Option<String>,
        issues: Vec<DetectedIssue>,
    },
    Issues(Vec<DetectedIssue>),
}

impl<'de> Deserialize<'de> for ScanResult {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(match RawScanResult::deserialize(deserializer)? {
            RawScanResult::Envelope {
                url,
                platform,
                issues,
            } => ScanResult {
                url,
                platform,
                issues,
            },
            RawScanResult::Issues(issues) => ScanResult {
                url: None,
                platform: None,
                issues,
            },
        })
    }
}

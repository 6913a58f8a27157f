use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Estimated effort to fix one class of defect, in minutes.
///
/// Catalog authors write effort as text (`"15-30 minutes"`,
/// `"2-5 minutes per image"`). The text is parsed once, when the catalog is
/// loaded, and serialized back through [`fmt::Display`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Effort {
    /// One-off cost regardless of how many instances were found.
    Fixed { min: u32, max: u32 },
    /// Cost per instance, e.g. per image or per form field.
    PerInstance { min: u32, max: u32, unit: String },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EffortError {
    #[error("effort has no duration: {0:?}")]
    MissingDuration(String),
    #[error("effort duration out of range: {0:?}")]
    OutOfRange(String),
    #[error("effort range is inverted: {0:?}")]
    InvertedRange(String),
    #[error("effort durations must be whole numbers: {0:?}")]
    Fractional(String),
    #[error("per-instance effort names no unit: {0:?}")]
    MissingUnit(String),
}

impl Effort {
    pub const fn fixed(min: u32, max: u32) -> Self {
        Effort::Fixed { min, max }
    }

    pub fn per_instance(min: u32, max: u32, unit: impl Into<String>) -> Self {
        Effort::PerInstance {
            min,
            max,
            unit: unit.into(),
        }
    }

    /// Lower bound in minutes. Aggregation always works from the lower bound.
    pub const fn min_minutes(&self) -> u32 {
        match self {
            Effort::Fixed { min, .. } | Effort::PerInstance { min, .. } => *min,
        }
    }

    pub const fn max_minutes(&self) -> u32 {
        match self {
            Effort::Fixed { max, .. } | Effort::PerInstance { max, .. } => *max,
        }
    }

    pub const fn is_per_instance(&self) -> bool {
        matches!(self, Effort::PerInstance { .. })
    }

    /// Minutes contributed by `count` instances, with the multiplier capped
    /// at `cap` for per-instance effort.
    pub fn minutes_for(&self, count: u32, cap: u32) -> u32 {
        match self {
            Effort::Fixed { min, .. } => *min,
            Effort::PerInstance { min, .. } => min.saturating_mul(count.min(cap)),
        }
    }
}

impl fmt::Display for Effort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (min, max) = (self.min_minutes(), self.max_minutes());
        if min == max {
            write!(f, "{min}")?;
        } else {
            write!(f, "{min}-{max}")?;
        }
        f.write_str(if max == 1 { " minute" } else { " minutes" })?;
        if let Effort::PerInstance { unit, .. } = self {
            write!(f, " per {unit}")?;
        }
        Ok(())
    }
}

impl FromStr for Effort {
    type Err = EffortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let start = text
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(|| EffortError::MissingDuration(text.to_string()))?;

        let (min, mut rest) = take_number(&text[start..])?;
        let mut max = min;

        let after_min = rest.trim_start();
        if let Some(after_dash) = after_min
            .strip_prefix('-')
            .or_else(|| after_min.strip_prefix('–'))
        {
            let after_dash = after_dash.trim_start();
            if after_dash.starts_with(|c: char| c.is_ascii_digit()) {
                let (n, tail) = take_number(after_dash)?;
                max = n;
                rest = tail;
            }
        }

        let scale = if rest
            .split(|c: char| !c.is_alphanumeric())
            .find(|w| !w.is_empty())
            .is_some_and(is_hour_word)
        {
            60
        } else {
            1
        };

        let min = min
            .checked_mul(scale)
            .ok_or_else(|| EffortError::OutOfRange(text.to_string()))?;
        let max = max
            .checked_mul(scale)
            .ok_or_else(|| EffortError::OutOfRange(text.to_string()))?;
        if max < min {
            return Err(EffortError::InvertedRange(text.to_string()));
        }

        match find_per(text) {
            Some(after) => {
                let unit = unit_after_per(after);
                if unit.is_empty() {
                    return Err(EffortError::MissingUnit(text.to_string()));
                }
                Ok(Effort::PerInstance { min, max, unit })
            }
            None => Ok(Effort::Fixed { min, max }),
        }
    }
}

impl TryFrom<String> for Effort {
    type Error = EffortError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Effort> for String {
    fn from(value: Effort) -> Self {
        value.to_string()
    }
}

fn take_number(s: &str) -> Result<(u32, &str), EffortError> {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let n = s[..end]
        .parse::<u32>()
        .map_err(|_| EffortError::OutOfRange(s.to_string()))?;
    let tail = &s[end..];
    let mut chars = tail.chars();
    if matches!(chars.next(), Some('.' | ',')) && chars.next().is_some_and(|c| c.is_ascii_digit()) {
        return Err(EffortError::Fractional(s.to_string()));
    }
    Ok((n, tail))
}

/// Text following the first standalone `per` (case-insensitive), where
/// standalone means not flanked by letters or digits.
fn find_per(text: &str) -> Option<&str> {
    // ASCII lowercasing keeps byte offsets valid for `text`.
    let lower = text.to_ascii_lowercase();
    lower.match_indices("per").find_map(|(i, m)| {
        let (before, after) = (&text[..i], &text[i + m.len()..]);
        let bounded = before.chars().next_back().is_none_or(|c| !c.is_alphanumeric())
            && after.chars().next().is_none_or(|c| !c.is_alphanumeric());
        bounded.then_some(after)
    })
}

/// Unit phrase after `per`: leading punctuation skipped, cut at the first
/// character that cannot belong to a noun phrase.
fn unit_after_per(after: &str) -> String {
    let start = after.trim_start_matches(|c: char| !c.is_alphanumeric());
    let end = start
        .find(|c: char| !(c.is_alphanumeric() || c == ' ' || c == '-'))
        .unwrap_or(start.len());
    start[..end].split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_hour_word(word: &str) -> bool {
    matches!(
        word.to_ascii_lowercase().as_str(),
        "h" | "hr" | "hrs" | "hour" | "hours"
    )
}

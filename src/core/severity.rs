use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity shared by vulnerability entries and audit checks.
///
/// Older Polaris reports use `danger`/`warning`. Those levels are kept as
/// their own variants so a legacy check is written back as it was read;
/// [`Severity::canonical`] maps them onto `CRITICAL`/`MEDIUM`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    #[default]
    Unknown,
    Danger,
    Warning,
}

impl Severity {
    pub const fn as_str(self) -> &'static str {
        match self {
            Severity::Critical => "CRITICAL",
            Severity::High => "HIGH",
            Severity::Medium => "MEDIUM",
            Severity::Low => "LOW",
            Severity::Unknown => "UNKNOWN",
            Severity::Danger => "danger",
            Severity::Warning => "warning",
        }
    }

    pub const fn canonical(self) -> Self {
        match self {
            Severity::Danger => Severity::Critical,
            Severity::Warning => Severity::Medium,
            other => other,
        }
    }

    /// Whether a failing check of this severity counts towards `dangerCount`.
    pub const fn is_danger(self) -> bool {
        matches!(self.canonical(), Severity::Critical | Severity::High)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CRITICAL" => Ok(Severity::Critical),
            "HIGH" => Ok(Severity::High),
            "MEDIUM" => Ok(Severity::Medium),
            "LOW" => Ok(Severity::Low),
            "UNKNOWN" => Ok(Severity::Unknown),
            "DANGER" => Ok(Severity::Danger),
            "WARNING" => Ok(Severity::Warning),
            other => Err(format!(
                "invalid severity: {other} (expected CRITICAL|HIGH|MEDIUM|LOW|UNKNOWN)"
            )),
        }
    }
}

impl Serialize for Severity {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

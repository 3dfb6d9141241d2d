use serde::{Deserialize, Serialize};

use crate::core::{Check, Severity, Vulnerability};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VulnerabilitySummary {
    pub critical_count: u32,
    pub high_count: u32,
    pub medium_count: u32,
    pub low_count: u32,
    pub unknown_count: u32,
}

impl VulnerabilitySummary {
    pub fn from_vulnerabilities<'a>(vulns: impl IntoIterator<Item = &'a Vulnerability>) -> Self {
        let mut summary = Self::default();
        for v in vulns {
            match v.severity.canonical() {
                Severity::Critical | Severity::Danger => summary.critical_count += 1,
                Severity::High => summary.high_count += 1,
                Severity::Medium | Severity::Warning => summary.medium_count += 1,
                Severity::Low => summary.low_count += 1,
                Severity::Unknown => summary.unknown_count += 1,
            }
        }
        summary
    }

    pub fn total(&self) -> u32 {
        self.critical_count + self.high_count + self.medium_count + self.low_count + self.unknown_count
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigAuditSummary {
    pub pass_count: u32,
    pub danger_count: u32,
    pub warning_count: u32,
}

impl ConfigAuditSummary {
    /// Passing checks count as passes; failing ones are split into danger
    /// (critical/high) and warning (everything else).
    pub fn from_checks<'a>(checks: impl IntoIterator<Item = &'a Check>) -> Self {
        let mut summary = Self::default();
        for check in checks {
            if check.success {
                summary.pass_count += 1;
            } else if check.severity.is_danger() {
                summary.danger_count += 1;
            } else {
                summary.warning_count += 1;
            }
        }
        summary
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CISKubeBenchSummary {
    pub pass_count: u32,
    pub info_count: u32,
    pub warn_count: u32,
    pub fail_count: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KubeHunterSummary {
    pub high_count: u32,
    pub medium_count: u32,
    pub low_count: u32,
    pub unknown_count: u32,
}

use serde::{Deserialize, Serialize};

use crate::core::Severity;

/// A single vulnerable package found in a scanned artifact.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vulnerability {
    #[serde(rename = "vulnerabilityID")]
    pub vulnerability_id: String,
    pub resource: String,
    pub installed_version: String,
    #[serde(default)]
    pub fixed_version: String,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_link: Option<String>,
    /// Reference links in the order the scanner listed them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<String>>,
    /// CVSS score. `None` means the scanner had no score, not a score of zero.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl Vulnerability {
    pub fn new(
        vulnerability_id: impl Into<String>,
        resource: impl Into<String>,
        installed_version: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            vulnerability_id: vulnerability_id.into(),
            resource: resource.into(),
            installed_version: installed_version.into(),
            severity,
            ..Self::default()
        }
    }
}

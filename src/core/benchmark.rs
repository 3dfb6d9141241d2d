//! Payload entries of cluster-level benchmark reports: kube-bench CIS
//! sections and kube-hunter findings. Field names follow the tools' own
//! snake_case output.

use serde::{Deserialize, Serialize};

use crate::core::Severity;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CISKubeBenchResult {
    pub test_number: String,
    pub test_desc: String,
    #[serde(default)]
    pub remediation: String,
    pub status: String,
    #[serde(default)]
    pub scored: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CISKubeBenchTests {
    pub section: String,
    pub desc: String,
    pub pass: u32,
    pub fail: u32,
    pub warn: u32,
    pub info: u32,
    #[serde(default)]
    pub results: Option<Vec<CISKubeBenchResult>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CISKubeBenchSection {
    pub id: String,
    pub version: String,
    pub text: String,
    pub node_type: String,
    pub total_pass: u32,
    pub total_fail: u32,
    pub total_warn: u32,
    pub total_info: u32,
    #[serde(default)]
    pub tests: Option<Vec<CISKubeBenchTests>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KubeHunterVulnerability {
    #[serde(default)]
    pub location: String,
    #[serde(rename = "vid")]
    pub id: String,
    pub category: String,
    pub severity: Severity,
    pub vulnerability: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub evidence: String,
    #[serde(default)]
    pub avd_reference: String,
}

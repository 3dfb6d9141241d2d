use std::fmt;

use serde::Serialize;

use crate::core::{
    CISKubeBenchReport, ConfigAuditReport, GroupVersionKind, KubeHunterReport, ObjectMeta,
    Scanner, TypeMeta, VulnerabilityReport,
};
use crate::error::MatchError;

pub const API_GROUP: &str = "aquasecurity.github.io";
pub const API_VERSION: &str = "v1alpha1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportKind {
    Vulnerability,
    ClusterVulnerability,
    ConfigAudit,
    ClusterConfigAudit,
    CISKubeBench,
    KubeHunter,
}

/// Fixed identifying strings of a report kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindDescriptor {
    pub kind: &'static str,
    pub list_kind: &'static str,
    pub crd_name: &'static str,
    pub namespaced: bool,
}

impl ReportKind {
    pub const ALL: [ReportKind; 6] = [
        ReportKind::Vulnerability,
        ReportKind::ClusterVulnerability,
        ReportKind::ConfigAudit,
        ReportKind::ClusterConfigAudit,
        ReportKind::CISKubeBench,
        ReportKind::KubeHunter,
    ];

    pub const fn descriptor(self) -> KindDescriptor {
        match self {
            ReportKind::Vulnerability => KindDescriptor {
                kind: "VulnerabilityReport",
                list_kind: "VulnerabilityReportList",
                crd_name: "vulnerabilityreports.aquasecurity.github.io",
                namespaced: true,
            },
            ReportKind::ClusterVulnerability => KindDescriptor {
                kind: "ClusterVulnerabilityReport",
                list_kind: "ClusterVulnerabilityReportList",
                crd_name: "clustervulnerabilityreports.aquasecurity.github.io",
                namespaced: false,
            },
            ReportKind::ConfigAudit => KindDescriptor {
                kind: "ConfigAuditReport",
                list_kind: "ConfigAuditReportList",
                crd_name: "configauditreports.aquasecurity.github.io",
                namespaced: true,
            },
            ReportKind::ClusterConfigAudit => KindDescriptor {
                kind: "ClusterConfigAuditReport",
                list_kind: "ClusterConfigAuditReportList",
                crd_name: "clusterconfigauditreports.aquasecurity.github.io",
                namespaced: false,
            },
            ReportKind::CISKubeBench => KindDescriptor {
                kind: "CISKubeBenchReport",
                list_kind: "CISKubeBenchReportList",
                crd_name: "ciskubebenchreports.aquasecurity.github.io",
                namespaced: false,
            },
            ReportKind::KubeHunter => KindDescriptor {
                kind: "KubeHunterReport",
                list_kind: "KubeHunterReportList",
                crd_name: "kubehunterreports.aquasecurity.github.io",
                namespaced: false,
            },
        }
    }

    pub const fn as_str(self) -> &'static str {
        self.descriptor().kind
    }

    pub fn gvk(self) -> GroupVersionKind {
        GroupVersionKind::new(API_GROUP, API_VERSION, self.as_str())
    }

    pub fn type_meta(self) -> TypeMeta {
        TypeMeta::new(self.gvk().api_version(), self.as_str())
    }

    pub fn list_type_meta(self) -> TypeMeta {
        TypeMeta::new(self.gvk().api_version(), self.descriptor().list_kind)
    }

    pub fn from_kind(kind: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == kind)
    }

    /// Kinds whose payload carries a `vulnerabilities` sequence.
    pub const fn has_vulnerabilities(self) -> bool {
        matches!(
            self,
            ReportKind::Vulnerability | ReportKind::ClusterVulnerability | ReportKind::KubeHunter
        )
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A report of any kind, tagged by the kind it was stored as.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnyReport {
    Vulnerability(VulnerabilityReport),
    ClusterVulnerability(VulnerabilityReport),
    ConfigAudit(ConfigAuditReport),
    ClusterConfigAudit(ConfigAuditReport),
    CISKubeBench(CISKubeBenchReport),
    KubeHunter(KubeHunterReport),
}

impl AnyReport {
    pub fn kind(&self) -> ReportKind {
        match self {
            AnyReport::Vulnerability(_) => ReportKind::Vulnerability,
            AnyReport::ClusterVulnerability(_) => ReportKind::ClusterVulnerability,
            AnyReport::ConfigAudit(_) => ReportKind::ConfigAudit,
            AnyReport::ClusterConfigAudit(_) => ReportKind::ClusterConfigAudit,
            AnyReport::CISKubeBench(_) => ReportKind::CISKubeBench,
            AnyReport::KubeHunter(_) => ReportKind::KubeHunter,
        }
    }

    pub fn metadata(&self) -> &ObjectMeta {
        match self {
            AnyReport::Vulnerability(r) | AnyReport::ClusterVulnerability(r) => &r.metadata,
            AnyReport::ConfigAudit(r) | AnyReport::ClusterConfigAudit(r) => &r.metadata,
            AnyReport::CISKubeBench(r) => &r.metadata,
            AnyReport::KubeHunter(r) => &r.metadata,
        }
    }

    pub fn scanner(&self) -> &Scanner {
        match self {
            AnyReport::Vulnerability(r) | AnyReport::ClusterVulnerability(r) => &r.report.scanner,
            AnyReport::ConfigAudit(r) | AnyReport::ClusterConfigAudit(r) => &r.report.scanner,
            AnyReport::CISKubeBench(r) => &r.report.scanner,
            AnyReport::KubeHunter(r) => &r.report.scanner,
        }
    }

    /// Decodes a stored report, choosing the payload type from its `kind`.
    pub fn from_json(value: serde_json::Value) -> Result<Self, MatchError> {
        let kind_str = value
            .get("kind")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default()
            .to_string();
        let Some(kind) = ReportKind::from_kind(&kind_str) else {
            return Err(MatchError::UnknownReportKind { kind: kind_str });
        };
        let report = match kind {
            ReportKind::Vulnerability => AnyReport::Vulnerability(serde_json::from_value(value)?),
            ReportKind::ClusterVulnerability => {
                AnyReport::ClusterVulnerability(serde_json::from_value(value)?)
            }
            ReportKind::ConfigAudit => AnyReport::ConfigAudit(serde_json::from_value(value)?),
            ReportKind::ClusterConfigAudit => {
                AnyReport::ClusterConfigAudit(serde_json::from_value(value)?)
            }
            ReportKind::CISKubeBench => AnyReport::CISKubeBench(serde_json::from_value(value)?),
            ReportKind::KubeHunter => AnyReport::KubeHunter(serde_json::from_value(value)?),
        };
        Ok(report)
    }

    pub fn to_json(&self) -> Result<serde_json::Value, MatchError> {
        Ok(serde_json::to_value(self)?)
    }
}

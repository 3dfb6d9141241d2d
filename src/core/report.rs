use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::core::{
    Artifact, CISKubeBenchSection, CISKubeBenchSummary, Check, ConfigAuditSummary,
    GroupVersionKind, KubeHunterSummary, KubeHunterVulnerability, ListMeta, ObjectMeta, Owner,
    OwnerReference, Registry, Scanner, TypeMeta, Vulnerability, VulnerabilitySummary,
};

pub const LABEL_CONTAINER_NAME: &str = "starboard.container.name";
pub const LABEL_RESOURCE_KIND: &str = "starboard.resource.kind";
pub const LABEL_RESOURCE_NAME: &str = "starboard.resource.name";
pub const LABEL_RESOURCE_NAMESPACE: &str = "starboard.resource.namespace";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VulnerabilityReportData {
    #[serde(with = "time::serde::rfc3339")]
    pub update_timestamp: OffsetDateTime,
    pub scanner: Scanner,
    #[serde(default)]
    pub registry: Registry,
    #[serde(default)]
    pub artifact: Artifact,
    pub summary: VulnerabilitySummary,
    #[serde(default)]
    pub vulnerabilities: Option<Vec<Vulnerability>>,
}

impl VulnerabilityReportData {
    pub fn new(update_timestamp: OffsetDateTime, scanner: Scanner) -> Self {
        Self {
            update_timestamp,
            scanner,
            registry: Registry::default(),
            artifact: Artifact::default(),
            summary: VulnerabilitySummary::default(),
            vulnerabilities: None,
        }
    }

    /// Replaces the findings and recomputes the summary from them.
    pub fn with_vulnerabilities(mut self, vulnerabilities: Vec<Vulnerability>) -> Self {
        self.summary = VulnerabilitySummary::from_vulnerabilities(&vulnerabilities);
        self.vulnerabilities = Some(vulnerabilities);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigAuditReportData {
    #[serde(with = "time::serde::rfc3339")]
    pub update_timestamp: OffsetDateTime,
    pub scanner: Scanner,
    pub summary: ConfigAuditSummary,
    #[serde(default)]
    pub checks: Option<Vec<Check>>,
    /// Deprecated: kept so older records still read. Use `checks` with a
    /// scope instead.
    #[serde(default)]
    pub pod_checks: Option<Vec<Check>>,
    /// Deprecated: kept so older records still read. Use `checks` with a
    /// container scope instead.
    #[serde(default)]
    pub container_checks: Option<BTreeMap<String, Option<Vec<Check>>>>,
}

impl ConfigAuditReportData {
    pub fn new(update_timestamp: OffsetDateTime, scanner: Scanner) -> Self {
        Self {
            update_timestamp,
            scanner,
            summary: ConfigAuditSummary::default(),
            checks: None,
            pod_checks: None,
            container_checks: None,
        }
    }

    /// Replaces the checks and recomputes the summary from them.
    pub fn with_checks(mut self, checks: Vec<Check>) -> Self {
        self.summary = ConfigAuditSummary::from_checks(&checks);
        self.checks = Some(checks);
        self
    }

    /// Every check in the payload, legacy pod and container checks included.
    pub fn all_checks(&self) -> impl Iterator<Item = &Check> {
        let legacy_containers = self
            .container_checks
            .iter()
            .flat_map(|m| m.values())
            .flatten()
            .flatten();
        self.checks
            .iter()
            .flatten()
            .chain(self.pod_checks.iter().flatten())
            .chain(legacy_containers)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CISKubeBenchReportData {
    #[serde(with = "time::serde::rfc3339")]
    pub update_timestamp: OffsetDateTime,
    pub scanner: Scanner,
    pub summary: CISKubeBenchSummary,
    #[serde(default)]
    pub sections: Option<Vec<CISKubeBenchSection>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KubeHunterReportData {
    #[serde(with = "time::serde::rfc3339")]
    pub update_timestamp: OffsetDateTime,
    pub scanner: Scanner,
    pub summary: KubeHunterSummary,
    #[serde(default)]
    pub vulnerabilities: Option<Vec<KubeHunterVulnerability>>,
}

/// A stored report: identity metadata plus the payload it owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRecord<D> {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    #[serde(default)]
    pub metadata: ObjectMeta,
    pub report: D,
}

pub type VulnerabilityReport = ReportRecord<VulnerabilityReportData>;
pub type ClusterVulnerabilityReport = ReportRecord<VulnerabilityReportData>;
pub type ConfigAuditReport = ReportRecord<ConfigAuditReportData>;
pub type ClusterConfigAuditReport = ReportRecord<ConfigAuditReportData>;
pub type CISKubeBenchReport = ReportRecord<CISKubeBenchReportData>;
pub type KubeHunterReport = ReportRecord<KubeHunterReportData>;

impl<D> ReportRecord<D> {
    pub fn new(type_meta: TypeMeta, metadata: ObjectMeta, report: D) -> Self {
        Self {
            type_meta,
            metadata,
            report,
        }
    }

    /// Labels the record with its owner and points a controller reference at
    /// it. Existing labels are kept; owner references are replaced.
    pub fn owned_by(mut self, owner: &Owner, gvk: &GroupVersionKind) -> Self {
        self.metadata.set_label(LABEL_RESOURCE_KIND, gvk.kind.as_str());
        self.metadata.set_label(LABEL_RESOURCE_NAME, owner.name());
        self.metadata
            .set_label(LABEL_RESOURCE_NAMESPACE, owner.namespace());
        self.metadata.owner_references = Some(vec![OwnerReference::controlled_by(owner, gvk)]);
        self
    }

    pub fn with_container(mut self, container_name: impl Into<String>) -> Self {
        self.metadata
            .set_label(LABEL_CONTAINER_NAME, container_name.into());
        self
    }

    pub fn container_name(&self) -> Option<&str> {
        self.metadata.label(LABEL_CONTAINER_NAME)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportList<R> {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    #[serde(default)]
    pub metadata: ListMeta,
    #[serde(default)]
    pub items: Option<Vec<R>>,
}

impl<R> ReportList<R> {
    pub fn new(type_meta: TypeMeta, items: Vec<R>) -> Self {
        Self {
            type_meta,
            metadata: ListMeta::default(),
            items: Some(items),
        }
    }
}

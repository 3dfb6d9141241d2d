mod benchmark;
mod check;
mod kind;
mod meta;
mod report;
mod scanner;
mod severity;
mod summary;
mod vulnerability;

pub use benchmark::{
    CISKubeBenchResult, CISKubeBenchSection, CISKubeBenchTests, KubeHunterVulnerability,
};
pub use check::{Check, CheckScope};
pub use kind::{API_GROUP, API_VERSION, AnyReport, KindDescriptor, ReportKind};
pub use meta::{GroupVersionKind, ListMeta, ObjectMeta, Owner, OwnerReference, TypeMeta};
pub use report::{
    CISKubeBenchReport, CISKubeBenchReportData, ClusterConfigAuditReport,
    ClusterVulnerabilityReport, ConfigAuditReport, ConfigAuditReportData, KubeHunterReport,
    KubeHunterReportData, LABEL_CONTAINER_NAME, LABEL_RESOURCE_KIND, LABEL_RESOURCE_NAME,
    LABEL_RESOURCE_NAMESPACE, ReportList, ReportRecord, VulnerabilityReport,
    VulnerabilityReportData,
};
pub use scanner::{Artifact, Registry, Scanner};
pub use severity::Severity;
pub use summary::{CISKubeBenchSummary, ConfigAuditSummary, KubeHunterSummary, VulnerabilitySummary};
pub use vulnerability::Vulnerability;

//! Deep, storage-independent copies of report values.
//!
//! Every report type implements [`Snapshot`]. Containers recurse element by
//! element and always allocate fresh storage, so a snapshot never shares a
//! buffer with its source. `Option` carries the nil/empty distinction: `None`
//! stays `None`, and `Some` of an empty collection stays `Some` and empty.
//!
//! Records with nested collections are declared once with `snapshot_record!`,
//! which lists each field with its type. The declaration produces both the
//! copy routine and the record's [`Schema`].

use std::collections::BTreeMap;

use time::OffsetDateTime;

use crate::core::{
    AnyReport, Artifact, CISKubeBenchReportData, CISKubeBenchResult, CISKubeBenchSection,
    CISKubeBenchSummary, CISKubeBenchTests, Check, CheckScope, ConfigAuditReportData,
    ConfigAuditSummary, GroupVersionKind, KubeHunterReportData, KubeHunterSummary,
    KubeHunterVulnerability, ListMeta, ObjectMeta, Owner, OwnerReference, Registry, ReportList,
    ReportRecord, Scanner, Severity, TypeMeta, Vulnerability, VulnerabilityReportData,
    VulnerabilitySummary,
};

/// How a field is copied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Copied whole. Includes records made only of scalars.
    Scalar,
    /// May be absent; absence is preserved.
    Optional,
    /// Ordered; copied element by element into a fresh sequence.
    Sequence,
    /// Keyed; copied entry by entry into a fresh map.
    Mapping,
    /// Nested record with its own schema.
    Record,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

pub trait Snapshot: Sized {
    const KIND: FieldKind;

    fn snapshot(&self) -> Self;
}

/// Field layout of a record type, in declaration order.
pub trait Schema: Snapshot {
    const FIELDS: &'static [FieldSpec];

    fn field(name: &str) -> Option<FieldSpec> {
        Self::FIELDS.iter().copied().find(|f| f.name == name)
    }
}

pub fn snapshot<T: Snapshot>(value: &T) -> T {
    value.snapshot()
}

impl<T: Snapshot> Snapshot for Option<T> {
    const KIND: FieldKind = FieldKind::Optional;

    fn snapshot(&self) -> Self {
        self.as_ref().map(Snapshot::snapshot)
    }
}

impl<T: Snapshot> Snapshot for Vec<T> {
    const KIND: FieldKind = FieldKind::Sequence;

    fn snapshot(&self) -> Self {
        let mut out = Vec::with_capacity(self.len());
        out.extend(self.iter().map(Snapshot::snapshot));
        out
    }
}

impl<K: Ord + Snapshot, V: Snapshot> Snapshot for BTreeMap<K, V> {
    const KIND: FieldKind = FieldKind::Mapping;

    fn snapshot(&self) -> Self {
        self.iter()
            .map(|(k, v)| (k.snapshot(), v.snapshot()))
            .collect()
    }
}

macro_rules! snapshot_by_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Snapshot for $ty {
                const KIND: FieldKind = FieldKind::Scalar;

                fn snapshot(&self) -> Self {
                    self.clone()
                }
            }
        )*
    };
}

snapshot_by_value!(
    String,
    bool,
    u32,
    u64,
    i64,
    f64,
    OffsetDateTime,
    Severity,
    Scanner,
    Registry,
    Artifact,
    CheckScope,
    VulnerabilitySummary,
    ConfigAuditSummary,
    CISKubeBenchSummary,
    KubeHunterSummary,
    CISKubeBenchResult,
    KubeHunterVulnerability,
    OwnerReference,
    GroupVersionKind,
    TypeMeta,
    ListMeta,
);

macro_rules! snapshot_record {
    ($ty:ty { $($field:ident: $fty:ty),* $(,)? }) => {
        impl Snapshot for $ty {
            const KIND: FieldKind = FieldKind::Record;

            fn snapshot(&self) -> Self {
                Self {
                    $($field: <$fty as Snapshot>::snapshot(&self.$field)),*
                }
            }
        }

        impl Schema for $ty {
            const FIELDS: &'static [FieldSpec] = &[
                $(FieldSpec {
                    name: stringify!($field),
                    kind: <$fty as Snapshot>::KIND,
                }),*
            ];
        }
    };
}

snapshot_record!(Check {
    id: String,
    message: String,
    remediation: Option<String>,
    success: bool,
    severity: Severity,
    category: String,
    scope: Option<CheckScope>,
});

snapshot_record!(Vulnerability {
    vulnerability_id: String,
    resource: String,
    installed_version: String,
    fixed_version: String,
    severity: Severity,
    title: Option<String>,
    primary_link: Option<String>,
    links: Option<Vec<String>>,
    score: Option<f64>,
});

snapshot_record!(CISKubeBenchTests {
    section: String,
    desc: String,
    pass: u32,
    fail: u32,
    warn: u32,
    info: u32,
    results: Option<Vec<CISKubeBenchResult>>,
});

snapshot_record!(CISKubeBenchSection {
    id: String,
    version: String,
    text: String,
    node_type: String,
    total_pass: u32,
    total_fail: u32,
    total_warn: u32,
    total_info: u32,
    tests: Option<Vec<CISKubeBenchTests>>,
});

snapshot_record!(VulnerabilityReportData {
    update_timestamp: OffsetDateTime,
    scanner: Scanner,
    registry: Registry,
    artifact: Artifact,
    summary: VulnerabilitySummary,
    vulnerabilities: Option<Vec<Vulnerability>>,
});

snapshot_record!(ConfigAuditReportData {
    update_timestamp: OffsetDateTime,
    scanner: Scanner,
    summary: ConfigAuditSummary,
    checks: Option<Vec<Check>>,
    pod_checks: Option<Vec<Check>>,
    container_checks: Option<BTreeMap<String, Option<Vec<Check>>>>,
});

snapshot_record!(CISKubeBenchReportData {
    update_timestamp: OffsetDateTime,
    scanner: Scanner,
    summary: CISKubeBenchSummary,
    sections: Option<Vec<CISKubeBenchSection>>,
});

snapshot_record!(KubeHunterReportData {
    update_timestamp: OffsetDateTime,
    scanner: Scanner,
    summary: KubeHunterSummary,
    vulnerabilities: Option<Vec<KubeHunterVulnerability>>,
});

snapshot_record!(ObjectMeta {
    name: String,
    namespace: String,
    uid: String,
    resource_version: String,
    labels: Option<BTreeMap<String, String>>,
    annotations: Option<BTreeMap<String, String>>,
    owner_references: Option<Vec<OwnerReference>>,
});

snapshot_record!(Owner {
    kind: String,
    metadata: ObjectMeta,
});

impl<D: Schema> Snapshot for ReportRecord<D> {
    const KIND: FieldKind = FieldKind::Record;

    fn snapshot(&self) -> Self {
        tracing::trace!(
            kind = %self.type_meta.kind,
            name = %self.metadata.name,
            "snapshot report record"
        );
        Self {
            type_meta: self.type_meta.snapshot(),
            metadata: self.metadata.snapshot(),
            report: self.report.snapshot(),
        }
    }
}

impl<D: Schema> Schema for ReportRecord<D> {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec {
            name: "type_meta",
            kind: FieldKind::Scalar,
        },
        FieldSpec {
            name: "metadata",
            kind: FieldKind::Record,
        },
        FieldSpec {
            name: "report",
            kind: FieldKind::Record,
        },
    ];
}

impl<R: Snapshot> Snapshot for ReportList<R> {
    const KIND: FieldKind = FieldKind::Record;

    fn snapshot(&self) -> Self {
        Self {
            type_meta: self.type_meta.snapshot(),
            metadata: self.metadata.snapshot(),
            items: self.items.snapshot(),
        }
    }
}

impl Snapshot for AnyReport {
    const KIND: FieldKind = FieldKind::Record;

    fn snapshot(&self) -> Self {
        match self {
            AnyReport::Vulnerability(r) => AnyReport::Vulnerability(r.snapshot()),
            AnyReport::ClusterVulnerability(r) => AnyReport::ClusterVulnerability(r.snapshot()),
            AnyReport::ConfigAudit(r) => AnyReport::ConfigAudit(r.snapshot()),
            AnyReport::ClusterConfigAudit(r) => AnyReport::ClusterConfigAudit(r.snapshot()),
            AnyReport::CISKubeBench(r) => AnyReport::CISKubeBench(r.snapshot()),
            AnyReport::KubeHunter(r) => AnyReport::KubeHunter(r.snapshot()),
        }
    }
}

use std::collections::BTreeMap;
use std::sync::OnceLock;

use tracing::debug;

use crate::core::{GroupVersionKind, Owner, ReportKind};
use crate::error::{MatchError, Result};

static GLOBAL: OnceLock<Scheme> = OnceLock::new();

/// Registry of the object kinds reports can be owned by.
#[derive(Debug, Clone, Default)]
pub struct Scheme {
    kinds: BTreeMap<String, GroupVersionKind>,
}

const CORE_KINDS: &[(&str, &str, &str)] = &[
    ("", "v1", "Pod"),
    ("", "v1", "ReplicationController"),
    ("", "v1", "Service"),
    ("", "v1", "ConfigMap"),
    ("", "v1", "Secret"),
    ("", "v1", "Node"),
    ("", "v1", "Namespace"),
    ("", "v1", "ServiceAccount"),
    ("apps", "v1", "ReplicaSet"),
    ("apps", "v1", "Deployment"),
    ("apps", "v1", "StatefulSet"),
    ("apps", "v1", "DaemonSet"),
    ("batch", "v1", "Job"),
    ("batch", "v1beta1", "CronJob"),
    ("rbac.authorization.k8s.io", "v1", "Role"),
    ("rbac.authorization.k8s.io", "v1", "RoleBinding"),
    ("rbac.authorization.k8s.io", "v1", "ClusterRole"),
    ("rbac.authorization.k8s.io", "v1", "ClusterRoleBinding"),
    ("networking.k8s.io", "v1", "NetworkPolicy"),
    ("networking.k8s.io", "v1", "Ingress"),
    ("policy", "v1beta1", "PodSecurityPolicy"),
];

impl Scheme {
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in workload, configuration and RBAC kinds plus every report kind.
    pub fn builtin() -> Self {
        let mut scheme = Self::new();
        for (group, version, kind) in CORE_KINDS {
            scheme.register(GroupVersionKind::new(*group, *version, *kind));
        }
        for kind in ReportKind::ALL {
            scheme.register(kind.gvk());
        }
        scheme
    }

    /// The process-wide scheme, built on first use and never changed after.
    pub fn global() -> &'static Scheme {
        GLOBAL.get_or_init(|| {
            let scheme = Scheme::builtin();
            debug!(kinds = scheme.len(), "initialized global scheme");
            scheme
        })
    }

    pub fn register(&mut self, gvk: GroupVersionKind) {
        self.kinds.insert(gvk.kind.clone(), gvk);
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    pub fn gvk_for(&self, owner: &Owner) -> Result<GroupVersionKind> {
        self.kinds
            .get(&owner.kind)
            .cloned()
            .ok_or_else(|| MatchError::UnresolvedOwnerKind {
                kind: owner.kind.clone(),
            })
    }
}

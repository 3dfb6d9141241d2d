//! Structural identity checks for report records.
//!
//! A [`ReportMatcher`] decides whether a report is the one an owner and a
//! scanner should have produced: owner labels, a single controller owner
//! reference, the scanner descriptor, and for vulnerability reports a
//! non-null finding list. Nothing else in the payload is inspected.

mod rules;

pub use rules::{FieldDiff, FieldRule, Policy};

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::core::{
    AnyReport, GroupVersionKind, LABEL_CONTAINER_NAME, LABEL_RESOURCE_KIND, LABEL_RESOURCE_NAME,
    LABEL_RESOURCE_NAMESPACE, Owner, OwnerReference, ReportKind, Scanner,
};
use crate::error::{MatchError, Result};
use crate::scanners::{self, ScannerKind};
use crate::scheme::Scheme;

const LABELS: &[&str] = &["metadata", "labels"];
const OWNER_REFERENCES: &[&str] = &["metadata", "ownerReferences"];
const SCANNER: &[&str] = &["report", "scanner"];
const VULNERABILITIES: &[&str] = &["report", "vulnerabilities"];

static DEFAULT_OWNER_REFERENCES: OnceLock<OwnerReferencePolicy> = OnceLock::new();

/// How strictly the owner-reference set is compared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OwnerReferencePolicy {
    /// The set is exactly the expected controller reference.
    #[default]
    Exact,
    /// The expected controller reference is in the set; others are tolerated.
    ContainsExpected,
}

impl OwnerReferencePolicy {
    /// The policy the convenience constructors start from: the installed one,
    /// or `Exact`.
    pub fn configured() -> Self {
        *DEFAULT_OWNER_REFERENCES.get_or_init(Self::default)
    }
}

/// Sets the process-wide owner-reference policy used by the convenience
/// constructors. Only the first call takes effect.
pub fn install_owner_reference_policy(policy: OwnerReferencePolicy) -> Result<()> {
    match DEFAULT_OWNER_REFERENCES.set(policy) {
        Ok(()) => {
            debug!(?policy, "installed owner reference policy");
            Ok(())
        }
        Err(_) => {
            warn!("owner reference policy already installed; keeping the existing one");
            Err(MatchError::PolicyInstalled)
        }
    }
}

/// What a report is expected to look like. Kinds that carry a finding list
/// always require it to be present.
#[derive(Debug, Clone, PartialEq)]
pub struct Expectation {
    pub kind: ReportKind,
    pub owner: Owner,
    pub scanner: Scanner,
    pub container_name: Option<String>,
    pub owner_references: OwnerReferencePolicy,
}

#[derive(Debug, Clone)]
pub struct ReportMatcher {
    expectation: Expectation,
}

impl ReportMatcher {
    pub fn new(expectation: Expectation) -> Self {
        Self { expectation }
    }

    /// Matches a vulnerability report for one container of `owner`, produced
    /// by Trivy.
    ///
    /// Not suitable for unit tests of report builders: the payload itself is
    /// only checked for a non-null vulnerability list.
    pub fn vulnerability_report_for_container(
        container_name: impl Into<String>,
        owner: &Owner,
    ) -> Self {
        Self::new(Expectation {
            kind: ReportKind::Vulnerability,
            owner: owner.clone(),
            scanner: scanners::descriptor(ScannerKind::Trivy).clone(),
            container_name: Some(container_name.into()),
            owner_references: OwnerReferencePolicy::configured(),
        })
    }

    /// Matches a config audit report of `owner`. Conftest reports carry the
    /// Conftest descriptor; every other scanner kind is checked against
    /// Polaris.
    pub fn config_audit_report_owned_by(owner: &Owner, scanner: ScannerKind) -> Self {
        let scanner = match scanner {
            ScannerKind::Conftest => ScannerKind::Conftest,
            _ => ScannerKind::Polaris,
        };
        Self::new(Expectation {
            kind: ReportKind::ConfigAudit,
            owner: owner.clone(),
            scanner: scanners::descriptor(scanner).clone(),
            container_name: None,
            owner_references: OwnerReferencePolicy::configured(),
        })
    }

    pub fn with_owner_reference_policy(mut self, policy: OwnerReferencePolicy) -> Self {
        self.expectation.owner_references = policy;
        self
    }

    pub fn expectation(&self) -> &Expectation {
        &self.expectation
    }

    /// Checks `candidate` using the process-wide scheme.
    pub fn matches(&self, candidate: &AnyReport) -> Result<MatchOutcome> {
        self.matches_in(Scheme::global(), candidate)
    }

    pub fn matches_in(&self, scheme: &Scheme, candidate: &AnyReport) -> Result<MatchOutcome> {
        let exp = &self.expectation;
        if candidate.kind() != exp.kind {
            return Err(MatchError::TypeMismatch {
                expected: exp.kind,
                actual: candidate.kind(),
            });
        }
        let gvk = scheme.gvk_for(&exp.owner)?;

        let rules = self.rules(&gvk)?;
        let document = candidate.to_json()?;
        let outcome = MatchOutcome::evaluate(subject(candidate), &rules, &document);
        debug!(
            kind = %exp.kind,
            owner = %exp.owner.name(),
            rules = rules.len(),
            mismatches = outcome.diffs.len(),
            "report match evaluated"
        );
        Ok(outcome)
    }

    /// The ordered rules a candidate is checked against, given the owner's
    /// resolved kind.
    pub fn rules(&self, gvk: &GroupVersionKind) -> Result<Vec<FieldRule>> {
        let exp = &self.expectation;

        let mut labels = Map::new();
        if let Some(container) = &exp.container_name {
            labels.insert(LABEL_CONTAINER_NAME.to_string(), Value::from(container.as_str()));
        }
        labels.insert(LABEL_RESOURCE_KIND.to_string(), Value::from(gvk.kind.as_str()));
        labels.insert(LABEL_RESOURCE_NAME.to_string(), Value::from(exp.owner.name()));
        labels.insert(
            LABEL_RESOURCE_NAMESPACE.to_string(),
            Value::from(exp.owner.namespace()),
        );

        let owner_ref = serde_json::to_value(OwnerReference::controlled_by(&exp.owner, gvk))?;
        let owner_policy = match exp.owner_references {
            OwnerReferencePolicy::Exact => Policy::ConsistOf,
            OwnerReferencePolicy::ContainsExpected => Policy::ContainsElements,
        };

        let mut rules = vec![
            FieldRule::new(LABELS, Policy::Subset, Value::Object(labels)),
            FieldRule::new(OWNER_REFERENCES, owner_policy, Value::Array(vec![owner_ref])),
            FieldRule::new(SCANNER, Policy::Equal, serde_json::to_value(&exp.scanner)?),
        ];
        if exp.kind.has_vulnerabilities() {
            rules.push(FieldRule::present(VULNERABILITIES));
        }
        Ok(rules)
    }
}

/// Verdict of one match, with both explanations rendered from the same
/// evaluated rules.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchOutcome {
    pub success: bool,
    pub diffs: Vec<FieldDiff>,
    pub failure_message: String,
    pub negated_failure_message: String,
}

impl MatchOutcome {
    /// Checks every rule in order against `document`. Failed rules become
    /// diffs; the rest are listed as held in the negated message.
    pub fn evaluate(subject: String, rules: &[FieldRule], document: &Value) -> Self {
        let mut diffs = Vec::new();
        let mut held = Vec::new();
        for rule in rules {
            match rule.check(document) {
                Some(diff) => diffs.push(diff),
                None => held.push(rule),
            }
        }

        let mut failure_message = format!(
            "Expected {subject} to match {} rules, but {} failed:",
            rules.len(),
            diffs.len()
        );
        for diff in &diffs {
            failure_message.push_str(&format!("\n  {diff}"));
        }

        let mut negated_failure_message = format!(
            "Expected {subject} not to match, but {} of {} rules held:",
            held.len(),
            rules.len()
        );
        for rule in &held {
            negated_failure_message.push_str(&format!("\n  {rule}"));
        }

        Self {
            success: diffs.is_empty(),
            diffs,
            failure_message,
            negated_failure_message,
        }
    }

    pub fn failure_message(&self) -> &str {
        &self.failure_message
    }

    pub fn negated_failure_message(&self) -> &str {
        &self.negated_failure_message
    }
}

fn subject(report: &AnyReport) -> String {
    let meta = report.metadata();
    if meta.namespace.is_empty() {
        format!("{} {}", report.kind(), meta.name)
    } else {
        format!("{} {}/{}", report.kind(), meta.namespace, meta.name)
    }
}

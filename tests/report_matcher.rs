use starboard_reports::core::{
    AnyReport, Check, ConfigAuditReport, ConfigAuditReportData, ObjectMeta, Owner,
    OwnerReference, ReportKind, Scanner, Severity, Vulnerability, VulnerabilityReport,
    VulnerabilityReportData,
};
use starboard_reports::matcher::{Expectation, OwnerReferencePolicy, Policy, ReportMatcher};
use starboard_reports::scanners::ScannerKind;
use starboard_reports::scheme::Scheme;
use starboard_reports::MatchError;
use time::macros::datetime;

fn trivy() -> Scanner {
    Scanner::new("Trivy", "Aqua Security", "0.19.2")
}

fn nginx_pod() -> Owner {
    Owner::new(
        "Pod",
        ObjectMeta::named("default", "nginx").with_uid("7c0ab6d4-1f6e-4bd5-9b5a-2d0a6f0e9b11"),
    )
}

fn nginx_replicaset() -> Owner {
    Owner::new(
        "ReplicaSet",
        ObjectMeta::named("default", "nginx-6d4cf56db6")
            .with_uid("0d8f6a0e-5d7c-4c8e-8c53-5c4f2f1f7e22"),
    )
}

fn vulnerability_report(owner: &Owner, scanner: Scanner) -> VulnerabilityReport {
    let gvk = Scheme::builtin().gvk_for(owner).expect("owner kind");
    let data = VulnerabilityReportData::new(datetime!(2021-07-01 12:00 UTC), scanner)
        .with_vulnerabilities(vec![Vulnerability::new(
            "CVE-2021-3450",
            "libssl1.1",
            "1.1.1d-0",
            Severity::High,
        )]);
    VulnerabilityReport::new(
        ReportKind::Vulnerability.type_meta(),
        ObjectMeta::named(owner.namespace(), format!("pod-{}-nginx", owner.name())),
        data,
    )
    .owned_by(owner, &gvk)
    .with_container("nginx")
}

fn config_audit_report(owner: &Owner, scanner: Scanner) -> ConfigAuditReport {
    let gvk = Scheme::builtin().gvk_for(owner).expect("owner kind");
    let data = ConfigAuditReportData::new(datetime!(2021-07-01 12:00 UTC), scanner)
        .with_checks(vec![Check::new("runAsRootAllowed", Severity::Critical, false)]);
    ConfigAuditReport::new(
        ReportKind::ConfigAudit.type_meta(),
        ObjectMeta::named(owner.namespace(), format!("replicaset-{}", owner.name())),
        data,
    )
    .owned_by(owner, &gvk)
}

#[test]
fn vulnerability_report_for_pod_container_matches() {
    let owner = nginx_pod();
    let report = AnyReport::Vulnerability(vulnerability_report(&owner, trivy()));

    let outcome = ReportMatcher::vulnerability_report_for_container("nginx", &owner)
        .matches(&report)
        .expect("match");

    assert!(outcome.success, "{}", outcome.failure_message());
    assert!(outcome.diffs.is_empty());
    assert!(
        outcome
            .negated_failure_message()
            .contains("4 of 4 rules held"),
        "{}",
        outcome.negated_failure_message()
    );
}

#[test]
fn wrong_scanner_version_is_a_negative_match_naming_the_field() {
    let owner = nginx_pod();
    let report = AnyReport::Vulnerability(vulnerability_report(
        &owner,
        Scanner::new("Trivy", "Aqua Security", "0.1.0"),
    ));

    let outcome = ReportMatcher::vulnerability_report_for_container("nginx", &owner)
        .matches(&report)
        .expect("match");

    assert!(!outcome.success);
    assert_eq!(outcome.diffs.len(), 1);
    assert_eq!(outcome.diffs[0].path, "report.scanner");
    assert_eq!(outcome.diffs[0].policy, Policy::Equal);
    let msg = outcome.failure_message();
    assert!(msg.contains("report.scanner: differs in version"), "{msg}");
    assert!(msg.contains("0.1.0"), "{msg}");
    assert!(
        outcome
            .negated_failure_message()
            .contains("3 of 4 rules held"),
        "{}",
        outcome.negated_failure_message()
    );
}

#[test]
fn config_audit_report_uses_conftest_descriptor_when_asked() {
    let owner = nginx_replicaset();
    let conftest = Scanner::new("Conftest", "Open Policy Agent", "v0.25.0");
    let report = AnyReport::ConfigAudit(config_audit_report(&owner, conftest));

    let with_conftest = ReportMatcher::config_audit_report_owned_by(&owner, ScannerKind::Conftest)
        .matches(&report)
        .expect("match");
    assert!(with_conftest.success, "{}", with_conftest.failure_message());

    let with_polaris = ReportMatcher::config_audit_report_owned_by(&owner, ScannerKind::Polaris)
        .matches(&report)
        .expect("match");
    assert!(!with_polaris.success);
    assert_eq!(with_polaris.diffs[0].path, "report.scanner");
}

#[test]
fn config_audit_report_defaults_to_polaris() {
    let owner = nginx_replicaset();
    let polaris = Scanner::new("Polaris", "Fairwinds Ops", "4.0");
    let report = AnyReport::ConfigAudit(config_audit_report(&owner, polaris));

    let outcome = ReportMatcher::config_audit_report_owned_by(&owner, ScannerKind::Trivy)
        .matches(&report)
        .expect("match");
    assert!(outcome.success, "{}", outcome.failure_message());
}

#[test]
fn config_audit_owner_reference_uses_resolved_api_version() {
    let owner = nginx_replicaset();
    let report = config_audit_report(&owner, Scanner::new("Polaris", "Fairwinds Ops", "4.0"));
    let refs = report.metadata.owner_references.as_deref().expect("refs");
    assert_eq!(refs[0].api_version, "apps/v1");
    assert_eq!(refs[0].kind, "ReplicaSet");
}

#[test]
fn wrong_report_kind_is_an_error_not_a_mismatch() {
    let owner = nginx_pod();
    let report = AnyReport::ConfigAudit(config_audit_report(
        &owner,
        Scanner::new("Polaris", "Fairwinds Ops", "4.0"),
    ));

    let err = ReportMatcher::vulnerability_report_for_container("nginx", &owner)
        .matches(&report)
        .unwrap_err();
    assert!(matches!(
        err,
        MatchError::TypeMismatch {
            expected: ReportKind::Vulnerability,
            actual: ReportKind::ConfigAudit,
        }
    ));
    assert_eq!(err.code(), "TYPE_MISMATCH");
}

#[test]
fn unregistered_owner_kind_is_an_error() {
    let pod = nginx_pod();
    let report = AnyReport::Vulnerability(vulnerability_report(&pod, trivy()));
    let widget = Owner::new("Widget", pod.metadata.clone());

    let err = ReportMatcher::vulnerability_report_for_container("nginx", &widget)
        .matches(&report)
        .unwrap_err();
    assert!(matches!(err, MatchError::UnresolvedOwnerKind { ref kind } if kind == "Widget"));
}

#[test]
fn custom_scheme_is_used_for_owner_resolution() {
    let pod = nginx_pod();
    let report = AnyReport::Vulnerability(vulnerability_report(&pod, trivy()));
    let matcher = ReportMatcher::vulnerability_report_for_container("nginx", &pod);

    let err = matcher.matches_in(&Scheme::new(), &report).unwrap_err();
    assert!(matches!(err, MatchError::UnresolvedOwnerKind { .. }));
}

#[test]
fn extra_labels_are_ignored_but_missing_ones_fail() {
    let owner = nginx_pod();
    let mut report = vulnerability_report(&owner, trivy());
    report.metadata.set_label("app", "nginx");
    report.metadata.set_label("pod-template-hash", "6d4cf56db6");

    let matcher = ReportMatcher::vulnerability_report_for_container("nginx", &owner);
    let outcome = matcher
        .matches(&AnyReport::Vulnerability(report.clone()))
        .expect("match");
    assert!(outcome.success, "{}", outcome.failure_message());

    report
        .metadata
        .labels
        .as_mut()
        .expect("labels")
        .remove("starboard.container.name");
    let outcome = matcher
        .matches(&AnyReport::Vulnerability(report))
        .expect("match");
    assert!(!outcome.success);
    assert_eq!(outcome.diffs[0].path, "metadata.labels");
    assert!(
        outcome.diffs[0]
            .reason
            .contains("missing key \"starboard.container.name\""),
        "{}",
        outcome.diffs[0].reason
    );
}

#[test]
fn extra_owner_reference_fails_unless_policy_allows_it() {
    let owner = nginx_pod();
    let mut report = vulnerability_report(&owner, trivy());
    report
        .metadata
        .owner_references
        .as_mut()
        .expect("refs")
        .push(OwnerReference {
            api_version: "v1".to_string(),
            kind: "ConfigMap".to_string(),
            name: "nginx-config".to_string(),
            uid: "3d4e5f60-0000-4000-8000-000000000009".to_string(),
            controller: None,
            block_owner_deletion: None,
        });
    let report = AnyReport::Vulnerability(report);

    let strict = ReportMatcher::vulnerability_report_for_container("nginx", &owner)
        .matches(&report)
        .expect("match");
    assert!(!strict.success);
    assert_eq!(strict.diffs[0].path, "metadata.ownerReferences");
    assert!(strict.diffs[0].reason.contains("unexpected elements"));

    let loose = ReportMatcher::vulnerability_report_for_container("nginx", &owner)
        .with_owner_reference_policy(OwnerReferencePolicy::ContainsExpected)
        .matches(&report)
        .expect("match");
    assert!(loose.success, "{}", loose.failure_message());
}

#[test]
fn owner_reference_must_not_block_owner_deletion() {
    let owner = nginx_pod();
    let mut report = vulnerability_report(&owner, trivy());
    report.metadata.owner_references.as_mut().expect("refs")[0].block_owner_deletion = Some(true);

    let outcome = ReportMatcher::vulnerability_report_for_container("nginx", &owner)
        .matches(&AnyReport::Vulnerability(report))
        .expect("match");
    assert!(!outcome.success);
    assert!(outcome.diffs[0].reason.contains("missing elements"));
}

#[test]
fn vulnerabilities_must_be_present_but_may_be_empty() {
    let owner = nginx_pod();
    let matcher = ReportMatcher::vulnerability_report_for_container("nginx", &owner);

    let mut report = vulnerability_report(&owner, trivy());
    report.report.vulnerabilities = Some(Vec::new());
    let outcome = matcher
        .matches(&AnyReport::Vulnerability(report.clone()))
        .expect("match");
    assert!(outcome.success, "{}", outcome.failure_message());

    report.report.vulnerabilities = None;
    let outcome = matcher
        .matches(&AnyReport::Vulnerability(report))
        .expect("match");
    assert!(!outcome.success);
    assert_eq!(outcome.diffs[0].path, "report.vulnerabilities");
    assert!(
        outcome
            .failure_message()
            .contains("report.vulnerabilities: is absent")
    );
}

#[test]
fn every_failed_rule_is_reported_in_order() {
    let owner = nginx_pod();
    let mut report = vulnerability_report(&owner, Scanner::new("Grype", "Anchore", "0.1"));
    report.metadata.labels = None;
    report.metadata.owner_references = None;
    report.report.vulnerabilities = None;

    let outcome = ReportMatcher::vulnerability_report_for_container("nginx", &owner)
        .matches(&AnyReport::Vulnerability(report))
        .expect("match");
    let paths: Vec<&str> = outcome.diffs.iter().map(|d| d.path.as_str()).collect();
    assert_eq!(
        paths,
        [
            "metadata.labels",
            "metadata.ownerReferences",
            "report.scanner",
            "report.vulnerabilities",
        ]
    );
    assert!(outcome.failure_message().contains("but 4 failed"));
    assert!(outcome.negated_failure_message().contains("0 of 4 rules held"));
}

#[test]
fn explicit_expectation_covers_cluster_scoped_owners() {
    let node = Owner::new(
        "Node",
        ObjectMeta::named("", "kind-control-plane").with_uid("5b1c7e2a-0000-4000-8000-00000000000a"),
    );
    let gvk = Scheme::builtin().gvk_for(&node).expect("node");
    let scanner = Scanner::new("Polaris", "Fairwinds Ops", "4.0");
    let report = ConfigAuditReport::new(
        ReportKind::ClusterConfigAudit.type_meta(),
        ObjectMeta::named("", "node-kind-control-plane"),
        ConfigAuditReportData::new(datetime!(2021-07-01 12:00 UTC), scanner.clone()),
    )
    .owned_by(&node, &gvk);

    let outcome = ReportMatcher::new(Expectation {
        kind: ReportKind::ClusterConfigAudit,
        owner: node,
        scanner,
        container_name: None,
        owner_references: OwnerReferencePolicy::Exact,
    })
    .matches(&AnyReport::ClusterConfigAudit(report))
    .expect("match");
    assert!(outcome.success, "{}", outcome.failure_message());
    assert!(
        outcome
            .failure_message()
            .starts_with("Expected ClusterConfigAuditReport node-kind-control-plane")
    );
}

#[test]
fn decoded_report_matches_like_the_built_one() {
    let owner = nginx_pod();
    let built = AnyReport::Vulnerability(vulnerability_report(&owner, trivy()));
    let decoded = AnyReport::from_json(built.to_json().expect("to json")).expect("from json");
    assert_eq!(decoded, built);

    let outcome = ReportMatcher::vulnerability_report_for_container("nginx", &owner)
        .matches(&decoded)
        .expect("match");
    assert!(outcome.success, "{}", outcome.failure_message());
}

#[test]
fn cluster_vulnerability_report_requires_findings_without_a_convenience_constructor() {
    let node = Owner::new(
        "Node",
        ObjectMeta::named("", "kind-control-plane").with_uid("5b1c7e2a-0000-4000-8000-00000000000a"),
    );
    let gvk = Scheme::builtin().gvk_for(&node).expect("node");
    let mut report = VulnerabilityReport::new(
        ReportKind::ClusterVulnerability.type_meta(),
        ObjectMeta::named("", "node-kind-control-plane"),
        VulnerabilityReportData::new(datetime!(2021-07-01 12:00 UTC), trivy()),
    )
    .owned_by(&node, &gvk);

    let matcher = ReportMatcher::new(Expectation {
        kind: ReportKind::ClusterVulnerability,
        owner: node,
        scanner: trivy(),
        container_name: None,
        owner_references: OwnerReferencePolicy::Exact,
    });

    let outcome = matcher
        .matches(&AnyReport::ClusterVulnerability(report.clone()))
        .expect("match");
    assert!(!outcome.success);
    let paths: Vec<&str> = outcome.diffs.iter().map(|d| d.path.as_str()).collect();
    assert_eq!(paths, ["report.vulnerabilities"]);

    report.report.vulnerabilities = Some(Vec::new());
    let outcome = matcher
        .matches(&AnyReport::ClusterVulnerability(report))
        .expect("match");
    assert!(outcome.success, "{}", outcome.failure_message());
}

#[test]
fn finding_list_rule_follows_the_report_kind() {
    let owner = nginx_pod();
    let gvk = Scheme::builtin().gvk_for(&owner).expect("pod");
    let expectation = |kind| Expectation {
        kind,
        owner: owner.clone(),
        scanner: trivy(),
        container_name: None,
        owner_references: OwnerReferencePolicy::Exact,
    };

    for kind in ReportKind::ALL {
        let rules = ReportMatcher::new(expectation(kind)).rules(&gvk).expect("rules");
        let has_presence_rule = rules.iter().any(|r| r.policy == Policy::Present);
        assert_eq!(has_presence_rule, kind.has_vulnerabilities(), "{kind}");
    }
}

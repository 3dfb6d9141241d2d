use std::path::Path;

use starboard_reports::config;
use starboard_reports::core::{
    AnyReport, ConfigAuditReport, ConfigAuditReportData, ObjectMeta, Owner, OwnerReference,
    ReportKind, Scanner,
};
use starboard_reports::matcher::OwnerReferencePolicy;
use starboard_reports::scanners::{self, ScannerKind, ScannerTable};
use starboard_reports::scheme::Scheme;
use starboard_reports::ReportMatcher;
use time::macros::datetime;

fn write_config(dir: &Path, body: &str) -> std::path::PathBuf {
    let path = dir.join("starboard.toml");
    std::fs::write(&path, body).expect("write config");
    path
}

#[test]
fn file_overrides_matcher_and_scanner_settings() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_config(
        dir.path(),
        r#"
[matcher]
allow_extra_owner_references = true

[scanners.polaris]
version = "4.2"

[scanners.conftest]
vendor = "Styra"
"#,
    );

    let cfg = config::load(Some(path.as_path())).expect("load");
    assert_eq!(cfg.config_path.as_deref(), Some(path.display().to_string().as_str()));
    assert_eq!(
        cfg.matcher.owner_reference_policy(),
        OwnerReferencePolicy::ContainsExpected
    );
    assert_eq!(
        cfg.scanners.get(ScannerKind::Polaris),
        &Scanner::new("Polaris", "Fairwinds Ops", "4.2")
    );
    assert_eq!(
        cfg.scanners.get(ScannerKind::Conftest),
        &Scanner::new("Conftest", "Styra", "v0.25.0")
    );
    assert_eq!(cfg.scanners.trivy, ScannerTable::default().trivy);
}

#[test]
fn missing_file_yields_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let cfg = config::load(Some(dir.path().join("absent.toml").as_path())).expect("load");

    assert!(cfg.config_path.is_none());
    assert!(!cfg.matcher.allow_extra_owner_references);
    assert_eq!(cfg.scanners, ScannerTable::default());
}

#[test]
fn malformed_file_is_an_error_naming_the_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_config(dir.path(), "[matcher\nallow_extra_owner_references = yes\n");

    let err = config::load(Some(path.as_path())).unwrap_err();
    let msg = format!("{err:#}");
    assert!(msg.contains("failed to parse config file"), "{msg}");
    assert!(msg.contains("starboard.toml"), "{msg}");
}

#[test]
fn unknown_scanner_section_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_config(dir.path(), "[scanners.grype]\nversion = \"0.1\"\n");

    assert!(config::load(Some(path.as_path())).is_err());
}

// The only test in this binary that touches the process-wide defaults.
#[test]
fn installed_config_drives_matcher_constructors() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_config(
        dir.path(),
        "[matcher]\nallow_extra_owner_references = true\n\n[scanners.polaris]\nversion = \"4.2\"\n",
    );
    let cfg = config::load(Some(path.as_path())).expect("load");

    cfg.install().expect("first install");
    assert_eq!(scanners::table(), &cfg.scanners);
    assert!(cfg.install().is_err());
    assert_eq!(
        OwnerReferencePolicy::configured(),
        OwnerReferencePolicy::ContainsExpected
    );

    let owner = Owner::new(
        "Deployment",
        ObjectMeta::named("default", "nginx").with_uid("9a0b1c2d-0000-4000-8000-00000000000b"),
    );
    let gvk = Scheme::builtin().gvk_for(&owner).expect("deployment kind");
    let mut report = ConfigAuditReport::new(
        ReportKind::ConfigAudit.type_meta(),
        ObjectMeta::named("default", "deployment-nginx"),
        ConfigAuditReportData::new(
            datetime!(2021-07-01 12:00 UTC),
            Scanner::new("Polaris", "Fairwinds Ops", "4.2"),
        ),
    )
    .owned_by(&owner, &gvk);
    report
        .metadata
        .owner_references
        .as_mut()
        .expect("refs")
        .push(OwnerReference {
            api_version: "v1".to_string(),
            kind: "ConfigMap".to_string(),
            name: "nginx-config".to_string(),
            uid: "3d4e5f60-0000-4000-8000-00000000000c".to_string(),
            controller: None,
            block_owner_deletion: None,
        });

    let matcher = ReportMatcher::config_audit_report_owned_by(&owner, ScannerKind::Polaris);
    assert_eq!(
        matcher.expectation().owner_references,
        OwnerReferencePolicy::ContainsExpected
    );
    let outcome = matcher
        .matches(&AnyReport::ConfigAudit(report))
        .expect("match");
    assert!(outcome.success, "{}", outcome.failure_message());
}

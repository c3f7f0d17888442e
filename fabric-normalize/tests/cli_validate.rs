use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join(path)
}

#[test]
fn validate_passes_for_valid_fabric() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("fabric-normalize"));
    cmd.arg("validate")
        .arg(fixture("fixtures/fabric_valid.yaml"))
        .env("NO_COLOR", "1")
        .assert()
        .success()
        .stdout(predicate::str::contains("result errors=0 warnings=0 status=pass"));
}

#[test]
fn validate_fails_and_lists_every_violation() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("fabric-normalize"));
    cmd.arg("validate")
        .arg(fixture("fixtures/fabric_invalid.yaml"))
        .env("NO_COLOR", "1")
        .assert()
        .failure()
        .stderr(predicate::str::contains("validate failed: 3 errors"))
        .stdout(predicate::str::contains("[access-interface-attach-groups]"))
        .stdout(predicate::str::contains("switch 'leaf9' is not defined"))
        .stdout(predicate::str::contains("bgp and ospf"));
}

#[test]
fn validate_json_reports_violations() {
    let output = Command::new(assert_cmd::cargo::cargo_bin!("fabric-normalize"))
        .arg("validate")
        .arg(fixture("fixtures/fabric_invalid.yaml"))
        .arg("--format")
        .arg("json")
        .output()
        .expect("run");
    assert!(!output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(report["status"], "checked");
    assert_eq!(report["passed"], false);
    assert_eq!(report["fabric"], "dc2");
    assert_eq!(report["violations"].as_array().map(Vec::len), Some(3));
}

#[test]
fn validate_config_disables_rules() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("fabric-normalize"));
    cmd.arg("validate")
        .arg(fixture("fixtures/fabric_invalid.yaml"))
        .arg("--config")
        .arg(fixture("fixtures/run_strict.toml"))
        .env("NO_COLOR", "1")
        .assert()
        .failure()
        .stderr(predicate::str::contains("validate failed: 1 errors"))
        .stdout(predicate::str::contains("leaf9").not());
}

#[test]
fn validate_reports_pipeline_failure() {
    let dir = tempdir().expect("tempdir");
    let input = dir.path().join("bad-type.yaml");
    fs::write(&input, "vxlan:\n  fabric:\n    name: dc1\n    type: LAN_CLASSIC\n").expect("write");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("fabric-normalize"));
    cmd.arg("validate")
        .arg(path_as_str(&input))
        .env("NO_COLOR", "1")
        .assert()
        .failure()
        .stdout(predicate::str::contains("FAILED"))
        .stdout(predicate::str::contains("LAN_CLASSIC"))
        .stderr(predicate::str::contains("normalization did not complete"));
}

#[test]
fn validate_uses_template_dir_from_config() {
    let dir = tempdir().expect("tempdir");
    let config = dir.path().join("run.toml");
    fs::write(&config, "template_dir = \"templates\"\n").expect("write config");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("fabric-normalize"));
    cmd.arg("validate")
        .arg(fixture("fixtures/fabric_valid.yaml"))
        .arg("--config")
        .arg(path_as_str(&config))
        .env("NO_COLOR", "1")
        .assert()
        .failure()
        .stdout(predicate::str::contains("template 'vrf_lite.tmpl' not found"));
}

fn path_as_str(path: &Path) -> &str {
    path.to_str().expect("utf-8 path")
}

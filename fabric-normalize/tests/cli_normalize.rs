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
fn normalize_prints_canonical_yaml() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("fabric-normalize"));
    cmd.arg("normalize")
        .arg(fixture("fixtures/fabric_valid.yaml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("interface Ethernet1/48"))
        .stdout(predicate::str::contains("vrf_lite_wan_border1"))
        .stdout(predicate::str::contains("owner: network-team"));
}

#[test]
fn normalize_writes_json_output() {
    let dir = tempdir().expect("tempdir");
    let out = dir.path().join("canonical.json");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("fabric-normalize"));
    cmd.arg("normalize")
        .arg(fixture("fixtures/fabric_deprecated.yaml"))
        .arg("--format")
        .arg("json")
        .arg("--output")
        .arg(path_as_str(&out))
        .assert()
        .success()
        .stderr(predicate::str::contains("deprecated"));

    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&out).expect("read")).expect("json");
    assert_eq!(written["vxlan"]["fabric"]["type"], "VXLAN_EVPN");
    assert_eq!(written["vxlan"]["overlay"]["vrfs"][0]["name"], "blue");
    assert!(written["vxlan"].get("overlay_services").is_none());
}

#[test]
fn normalize_refuses_to_overwrite_input() {
    let dir = tempdir().expect("tempdir");
    let input = dir.path().join("fabric.yaml");
    fs::copy(fixture("fixtures/fabric_valid.yaml"), &input).expect("copy");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("fabric-normalize"));
    cmd.arg("normalize")
        .arg(path_as_str(&input))
        .arg("--output")
        .arg(path_as_str(&input))
        .assert()
        .failure()
        .stderr(predicate::str::contains("refusing to overwrite"));
}

#[test]
fn changes_lists_what_normalization_added() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("fabric-normalize"));
    cmd.arg("normalize")
        .arg(fixture("fixtures/fabric_deprecated.yaml"))
        .arg("--changes")
        .env("NO_COLOR", "1")
        .assert()
        .success()
        .stdout(predicate::str::contains("+ vxlan.fabric"))
        .stdout(predicate::str::contains("- vxlan.overlay_services"));
}

#[test]
fn normalize_fails_without_fabric_type() {
    let dir = tempdir().expect("tempdir");
    let input = dir.path().join("untyped.yaml");
    fs::write(&input, "vxlan:\n  fabric:\n    name: dc1\n").expect("write");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("fabric-normalize"));
    cmd.arg("normalize")
        .arg(path_as_str(&input))
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing required data at 'vxlan.fabric.type'"));
}

fn path_as_str(path: &Path) -> &str {
    path.to_str().expect("utf-8 path")
}

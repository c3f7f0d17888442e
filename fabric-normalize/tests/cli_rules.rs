use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn rules_lists_every_registered_rule() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("fabric-normalize"));
    cmd.arg("rules")
        .env("NO_COLOR", "1")
        .assert()
        .success()
        .stdout(predicate::str::contains("access-interface-attach-groups severity=error"))
        .stdout(predicate::str::contains("global-exclusive-parameters"))
        .stdout(predicate::str::contains("overlay-cross-reference"))
        .stdout(predicate::str::contains("topology-switch-uniqueness"))
        .stdout(predicate::str::contains("vrf-lite-references"));
}

#[test]
fn rules_filters_by_fabric_type() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("fabric-normalize"));
    cmd.arg("rules")
        .arg("--fabric-type")
        .arg("isn")
        .arg("--format")
        .arg("json")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"id\": \"topology-switch-uniqueness\""))
        .stdout(predicate::str::contains("vrf-lite-references").not());
}

#[test]
fn rules_rejects_unknown_fabric_type() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("fabric-normalize"));
    cmd.arg("rules")
        .arg("--fabric-type")
        .arg("LAN_CLASSIC")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown fabric type"));
}

#![allow(deprecated)] // TODO: migrate Command::cargo_bin to cargo_bin_cmd!

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

/// Every invocation gets its own data directory so tests never share
/// state or audit history.
fn stratus(data_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("stratus").unwrap();
    cmd.env("STRATUS_DATA_DIR", data_dir);
    cmd
}

#[test]
fn test_cli_help() {
    let dir = tempfile::tempdir().unwrap();
    stratus(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("provision"))
        .stdout(predicate::str::contains("infra"))
        .stdout(predicate::str::contains("resource"))
        .stdout(predicate::str::contains("providers"))
        .stdout(predicate::str::contains("audit"));
}

#[test]
fn test_cli_version() {
    let dir = tempfile::tempdir().unwrap();
    stratus(dir.path())
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("stratus"));
}

#[test]
fn test_providers_list_names_every_provider() {
    let dir = tempfile::tempdir().unwrap();
    stratus(dir.path())
        .args(["providers", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("aws"))
        .stdout(predicate::str::contains("azure"))
        .stdout(predicate::str::contains("gcp"))
        .stdout(predicate::str::contains("oracle"))
        .stdout(predicate::str::contains("onprem"));
}

#[test]
fn test_providers_show_unknown_fails() {
    let dir = tempfile::tempdir().unwrap();
    stratus(dir.path())
        .args(["providers", "show", "digitalocean"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported provider"));
}

/// State written by one invocation is visible to the next.
#[test]
fn test_provision_then_list_across_invocations() {
    let dir = tempfile::tempdir().unwrap();

    stratus(dir.path())
        .args([
            "provision",
            "--provider",
            "onprem",
            "--name",
            "lab",
            "--vm",
            "cpu=4",
            "--vm",
            "ram_gb=16",
            "--vm",
            "disk_gb=80",
            "--vm",
            "nic=eth0",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("lab"))
        .stdout(predicate::str::contains("datacenter-1"));

    stratus(dir.path())
        .args(["infra", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("lab"))
        .stdout(predicate::str::contains("onprem"));
}

/// A failing spec names every missing field and persists nothing.
#[test]
fn test_provision_missing_fields_creates_nothing() {
    let dir = tempfile::tempdir().unwrap();

    stratus(dir.path())
        .args([
            "provision",
            "--provider",
            "aws",
            "--name",
            "web",
            "--vm",
            "instance_type=t3.micro",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ami").and(predicate::str::contains("vpc_id")));

    stratus(dir.path())
        .args(["infra", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No active infrastructure"));
}

/// Provision, start the machine in a second invocation, then find both
/// attempts in the audit trail.
#[test]
fn test_lifecycle_and_audit_across_invocations() {
    let dir = tempfile::tempdir().unwrap();

    let output = stratus(dir.path())
        .args([
            "provision",
            "--provider",
            "gcp",
            "--name",
            "api",
            "--vm",
            "machine_type=e2-small",
            "--requested-by",
            "alice",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let id = stdout
        .lines()
        .find(|line| line.trim_start().starts_with("ID:"))
        .and_then(|line| line.split_whitespace().last())
        .expect("provision output should print the infrastructure id");

    stratus(dir.path())
        .args(["resource", "start", id, "--kind", "vm"])
        .assert()
        .success()
        .stdout(predicate::str::contains("running"));

    stratus(dir.path())
        .args(["audit", "recent"])
        .assert()
        .success()
        .stdout(predicate::str::contains("create_infrastructure"))
        .stdout(predicate::str::contains("start"))
        .stdout(predicate::str::contains("alice"));
}

#[test]
fn test_audit_actions_lists_the_vocabulary() {
    let dir = tempfile::tempdir().unwrap();
    stratus(dir.path())
        .args(["audit", "actions"])
        .assert()
        .success()
        .stdout(predicate::str::contains("create_infrastructure"))
        .stdout(predicate::str::contains("resize"))
        .stdout(predicate::str::contains("remove_resource"));
}

#[test]
fn test_update_requires_at_least_one_spec_flag() {
    let dir = tempfile::tempdir().unwrap();
    stratus(dir.path())
        .args(["infra", "update", "infra-nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Nothing to update"));
}

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const BIN: &str = "dtsx-flatten";

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Command running inside `workspace` with no ambient configuration leaking in.
fn command(workspace: &Path) -> Command {
    let mut cmd = Command::cargo_bin(BIN).expect("binary should build");
    cmd.current_dir(workspace)
        .env_remove("DTSX_FLATTEN_OUTPUT_DIR")
        .env_remove("DTSX_FLATTEN_FORMAT")
        .env_remove("DTSX_FLATTEN_EXTENSION")
        .env_remove("DTSX_FLATTEN_LOG_DIR")
        .env_remove("DTSX_FLATTEN_LOG_CONSOLE")
        .env_remove("DTSX_FLATTEN_BATCH")
        .env_remove("RUST_LOG");
    cmd
}

fn packages_dir(workspace: &Path, fixtures: &[&str]) -> PathBuf {
    let dir = workspace.join("packages");
    fs::create_dir_all(dir.join("nested")).unwrap();
    for (index, name) in fixtures.iter().enumerate() {
        let target = if index % 2 == 0 {
            dir.join(name)
        } else {
            dir.join("nested").join(name)
        };
        fs::copy(fixture(name), target).unwrap();
    }
    fs::write(dir.join("notes.txt"), "not a package").unwrap();
    dir
}

#[test]
fn help_lists_every_command() {
    let temp = TempDir::new().unwrap();
    command(temp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("flatten"))
        .stdout(predicate::str::contains("inspect"))
        .stdout(predicate::str::contains("scan"));
}

#[test]
fn version_flag_prints_crate_version() {
    let temp = TempDir::new().unwrap();
    command(temp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(dtsx_flatten::VERSION));
}

#[test]
fn scan_lists_packages_sorted() {
    let temp = TempDir::new().unwrap();
    let dir = packages_dir(temp.path(), &["sales_load.dtsx", "truncated.dtsx"]);

    let output = command(temp.path())
        .args(["scan", dir.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<_> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with("nested/truncated.dtsx") || lines[0].ends_with("nested\\truncated.dtsx"));
    assert!(lines[1].ends_with("sales_load.dtsx"));
}

#[test]
fn scan_rejects_missing_directory() {
    let temp = TempDir::new().unwrap();
    command(temp.path())
        .args(["scan", "does-not-exist"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not a valid directory"));
}

#[test]
fn empty_extension_override_is_rejected() {
    let temp = TempDir::new().unwrap();
    let dir = packages_dir(temp.path(), &["sales_load.dtsx"]);
    fs::write(dir.join("trailing."), "").unwrap();

    for subcommand in ["scan", "flatten"] {
        command(temp.path())
            .args([subcommand, dir.to_str().unwrap(), "--extension", ""])
            .assert()
            .failure()
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::contains("discovery.extension cannot be empty"));
    }
}

#[test]
fn inspect_prints_tree_as_json() {
    let temp = TempDir::new().unwrap();
    let output = command(temp.path())
        .args(["inspect", fixture("sales_load.dtsx").to_str().unwrap()])
        .output()
        .unwrap();
    assert!(output.status.success());

    let tree: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let roots = tree.as_array().unwrap();
    assert_eq!(roots.len(), 4);
    assert_eq!(roots[0]["kind"], "generic");
    assert_eq!(roots[0]["children"][0]["kind"], "sql_task");
    assert_eq!(roots[1]["components"].as_array().unwrap().len(), 2);
    assert_eq!(roots[2]["package_name"], "Child.dtsx");
}

#[test]
fn inspect_rows_prints_flattened_rows() {
    let temp = TempDir::new().unwrap();
    let output = command(temp.path())
        .args(["inspect", "--rows", fixture("sales_load.dtsx").to_str().unwrap()])
        .output()
        .unwrap();
    assert!(output.status.success());

    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 6);
    assert_eq!(rows[1]["ParentExecutableID"], "Package\\Prepare");
    assert_eq!(rows[3]["Property_OpenRowset"], "[stg].[Sales]");
}

#[test]
fn inspect_reports_structural_failure() {
    let temp = TempDir::new().unwrap();
    command(temp.path())
        .args(["inspect", fixture("no_namespace.dtsx").to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("namespace"));
}

#[test]
fn flatten_writes_one_table_per_package() {
    let temp = TempDir::new().unwrap();
    let dir = packages_dir(temp.path(), &["sales_load.dtsx"]);
    let out = temp.path().join("tables");

    command(temp.path())
        .args(["flatten", dir.to_str().unwrap(), "--output", out.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "1 package(s): 1 exported, 0 failed, 6 row(s)",
        ));

    let csv = fs::read_to_string(out.join("sales_load.csv")).unwrap();
    assert_eq!(csv.lines().count(), 7);
    assert!(csv.starts_with("ExecutableID,ExecutableType,ExecutableName,Tag,ParentExecutableID"));
}

#[test]
fn flatten_isolates_failures_and_exits_non_zero() {
    let temp = TempDir::new().unwrap();
    let dir = packages_dir(
        temp.path(),
        &["sales_load.dtsx", "truncated.dtsx", "no_namespace.dtsx"],
    );
    let out = temp.path().join("tables");
    let report = temp.path().join("report.json");

    command(temp.path())
        .args([
            "flatten",
            dir.to_str().unwrap(),
            "--output",
            out.to_str().unwrap(),
            "--format",
            "json",
            "--report",
            report.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stdout(predicate::str::contains("3 package(s): 1 exported, 2 failed"))
        .stdout(predicate::str::contains("failed:"));

    assert!(out.join("sales_load.json").exists());
    assert!(!out.join("truncated.json").exists());
    assert!(!out.join("no_namespace.json").exists());

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(report).unwrap()).unwrap();
    assert_eq!(report["summary"]["failed"], 2);
    assert_eq!(report["documents"].as_array().unwrap().len(), 3);
}

#[test]
fn flatten_reads_workspace_config() {
    let temp = TempDir::new().unwrap();
    let dir = packages_dir(temp.path(), &["sales_load.dtsx"]);
    fs::write(
        temp.path().join("dtsx-flatten.toml"),
        "[output]\ndir = \"configured\"\nformat = \"json\"\n",
    )
    .unwrap();

    command(temp.path())
        .args(["flatten", dir.to_str().unwrap()])
        .assert()
        .success();

    assert!(temp.path().join("configured/sales_load.json").exists());
}

#[test]
fn flatten_rejects_missing_config_file() {
    let temp = TempDir::new().unwrap();
    command(temp.path())
        .args(["flatten", ".", "--config", "missing.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

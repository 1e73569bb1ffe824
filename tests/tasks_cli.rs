use assert_cmd::Command;
use predicates::{
    prelude::PredicateBooleanExt,
    str::{contains, is_match},
};

const TASK_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/tasks");
const MANIFEST: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/tasks.json");

fn taskdir() -> Command {
    Command::cargo_bin("taskdir").expect("taskdir binary build failed")
}

fn taskdir_with_fixture() -> Command {
    let mut cmd = taskdir();
    cmd.args(["--dir", TASK_DIR, "--manifest", MANIFEST]);
    cmd
}

#[test]
fn list_prints_derived_task_names() {
    taskdir_with_fixture()
        .args(["list"])
        .assert()
        .success()
        .stdout(
            contains("default")
                .and(contains("build:css"))
                .and(contains("clean"))
                .and(contains("deploy")),
        );
}

#[test]
fn list_shows_dependencies() {
    taskdir_with_fixture()
        .args(["list"])
        .assert()
        .success()
        .stdout(is_match(r"build\s+\[clean\]").expect("regex compile"));
}

#[test]
fn directory_named_after_its_file_collapses() {
    taskdir_with_fixture()
        .args(["list"])
        .assert()
        .success()
        .stdout(contains("deploy:deploy").not());
}

#[test]
fn run_executes_dependencies_first() {
    taskdir_with_fixture()
        .args(["run", "build"])
        .assert()
        .success()
        .stdout(is_match(r"(?s)\[clean\] workspace cleaned.*\[build\] task=build").expect("regex"));
}

#[test]
fn direct_subcommand_runs_task() {
    taskdir_with_fixture()
        .args(["deploy"])
        .assert()
        .success()
        .stdout(contains("[deploy] shipped"));
}

#[test]
fn no_subcommand_runs_default_task() {
    taskdir_with_fixture()
        .assert()
        .success()
        .stdout(contains("[default] ok"));
}

#[test]
fn unknown_task_fails_with_standard_error() {
    taskdir_with_fixture()
        .args(["run", "no-such-task"])
        .assert()
        .failure()
        .stderr(contains("'no-such-task' is not registered"));
}

#[test]
fn custom_separator_changes_names() {
    taskdir_with_fixture()
        .args(["--separator", ".", "list"])
        .assert()
        .success()
        .stdout(contains("build.css"));
}

#[test]
fn injected_settings_merge_local_overrides() {
    // local.json overrides the manifest's port 8080 with 9000.
    taskdir_with_fixture()
        .args(["run", "serve"])
        .assert()
        .success()
        .stdout(contains("[serve] port=9000"));
}

#[test]
fn bare_callable_task_runs() {
    taskdir_with_fixture()
        .args(["run", "build:css"])
        .assert()
        .success()
        .stdout(contains("[build:css] minified"));
}

//! End-to-end CLI integration tests
//!
//! These tests invoke the compiled binary as a subprocess inside a scratch
//! directory and check both the output and the resulting `version.json`.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Returns a Command configured to run our binary.
///
/// Note: `cargo_bin` is marked deprecated for edge cases involving custom
/// cargo build directories, but works correctly for standard project layouts.
#[allow(deprecated)]
fn cmd() -> Command {
    Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap()
}

/// A scratch project. Logs go inside it so tests never write elsewhere.
struct Project {
    dir: TempDir,
}

impl Project {
    fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    fn with_version(version: &str) -> Self {
        let project = Self::new();
        project.write_version(version);
        project
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn write_version(&self, version: &str) {
        fs::write(
            self.path().join("version.json"),
            format!("{{\n    \"version\": \"{version}\"\n}}\n"),
        )
        .unwrap();
    }

    fn stored_version(&self) -> String {
        let raw = fs::read_to_string(self.path().join("version.json")).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        json["version"].as_str().unwrap().to_string()
    }

    fn cmd(&self) -> Command {
        let mut cmd = cmd();
        cmd.env("VMARK_LOG_PATH", self.path().join("logs").join("vmark.jsonl"))
            .env_remove("RUST_LOG")
            .arg("-C")
            .arg(self.path());
        cmd
    }
}

fn git_installed() -> bool {
    std::process::Command::new("git")
        .arg("--version")
        .output()
        .is_ok_and(|out| out.status.success())
}

fn git(dir: &Path, args: &[&str]) -> String {
    let out = std::process::Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap();
    assert!(out.status.success(), "git {args:?} failed");
    String::from_utf8_lossy(&out.stdout).trim().to_string()
}

fn init_repo(dir: &Path) {
    git(dir, &["init", "-q"]);
    git(dir, &["config", "user.email", "test@example.com"]);
    git(dir, &["config", "user.name", "Test"]);
    git(dir, &["config", "commit.gpgsign", "false"]);
    git(dir, &["config", "tag.gpgsign", "false"]);
}

// =============================================================================
// Help & Version
// =============================================================================

#[test]
fn help_flag_shows_usage() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("Commands:"))
        .stdout(predicate::str::contains("bump"))
        .stdout(predicate::str::contains("set"))
        .stdout(predicate::str::contains("show"));
}

#[test]
fn long_help_lists_environment() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("VMARK_LOG_DIR"));
}

#[test]
fn version_flag_shows_version() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

// =============================================================================
// Show
// =============================================================================

#[test]
fn show_creates_default_file() {
    let project = Project::new();

    project
        .cmd()
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("Current version:"))
        .stdout(predicate::str::contains("1.0.0"));

    assert_eq!(project.stored_version(), "1.0.0");
    let raw = fs::read_to_string(project.path().join("version.json")).unwrap();
    assert_eq!(raw, "{\n    \"version\": \"1.0.0\"\n}\n");
}

#[test]
fn show_lists_components() {
    let project = Project::with_version("2.4.6-beta.3+sha.1");

    project
        .cmd()
        .args(["--color", "never", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Major: 2"))
        .stdout(predicate::str::contains("Minor: 4"))
        .stdout(predicate::str::contains("Patch: 6"))
        .stdout(predicate::str::contains("Pre-release: beta.3"))
        .stdout(predicate::str::contains("Build: sha.1"));
}

#[test]
fn show_marks_missing_parts_with_dash() {
    let project = Project::with_version("3.0.0");

    project
        .cmd()
        .args(["--color", "never", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pre-release: -"))
        .stdout(predicate::str::contains("Build: -"));
}

#[test]
fn show_json_outputs_summary() {
    let project = Project::with_version("1.2.3-rc.1");

    let output = project.cmd().args(["show", "--json"]).assert().success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let json: serde_json::Value =
        serde_json::from_str(&stdout).expect("show --json should output valid JSON");
    assert_eq!(json["version"], "1.2.3-rc.1");
    assert_eq!(json["major"], 1);
    assert_eq!(json["pre_release"], "rc.1");
    assert_eq!(json["stable"], false);
    assert!(json["build"].is_null());
}

#[test]
fn show_short_prints_bare_version() {
    let project = Project::with_version("0.9.1");

    project
        .cmd()
        .args(["show", "--short"])
        .assert()
        .success()
        .stdout("0.9.1\n");
}

#[test]
fn show_rejects_corrupt_version() {
    let project = Project::with_version("banana");

    project
        .cmd()
        .arg("show")
        .assert()
        .failure()
        .stderr(predicate::str::contains("banana"));
}

// =============================================================================
// Bump
// =============================================================================

#[test]
fn bump_patch_without_git() {
    let project = Project::with_version("1.2.3");

    project
        .cmd()
        .args(["--color", "never", "bump", "patch", "--no-git"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Version bumped: 1.2.3 → 1.2.4"))
        .stdout(predicate::str::contains("Committed").not());

    assert_eq!(project.stored_version(), "1.2.4");
}

#[test]
fn bump_type_is_case_insensitive() {
    let project = Project::with_version("1.2.3");

    project
        .cmd()
        .args(["bump", "MAJOR", "--no-git"])
        .assert()
        .success();

    assert_eq!(project.stored_version(), "2.0.0");
}

#[test]
fn bump_pre_release_sequence() {
    let project = Project::with_version("1.0.0");

    for (kind, expected) in [
        ("alpha", "1.0.0-alpha.1"),
        ("alpha", "1.0.0-alpha.2"),
        ("beta", "1.0.0-beta.1"),
        ("rc", "1.0.0-rc.1"),
    ] {
        project
            .cmd()
            .args(["bump", kind, "--no-git"])
            .assert()
            .success();
        assert_eq!(project.stored_version(), expected);
    }
}

#[test]
fn bump_with_build_metadata() {
    let project = Project::with_version("1.0.0");

    project
        .cmd()
        .args(["bump", "minor", "--build", "123", "--no-git"])
        .assert()
        .success();

    assert_eq!(project.stored_version(), "1.1.0+123");
}

#[test]
fn bump_invalid_type_is_rejected() {
    let project = Project::with_version("1.0.0");

    project
        .cmd()
        .args(["bump", "huge"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));

    assert_eq!(project.stored_version(), "1.0.0");
}

#[test]
fn bump_json_outputs_outcome() {
    let project = Project::with_version("1.0.0");

    let output = project
        .cmd()
        .args(["--json", "bump", "major", "--no-git"])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["command"], "bump");
    assert_eq!(json["previous"], "1.0.0");
    assert_eq!(json["current"], "2.0.0");
    assert_eq!(json["vcs"]["status"], "disabled");
}

#[test]
fn bump_json_without_type_fails() {
    let project = Project::with_version("1.0.0");

    project
        .cmd()
        .args(["--json", "bump"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("TYPE is required"));
}

#[test]
fn bump_without_type_or_terminal_fails() {
    let project = Project::with_version("1.0.0");

    project
        .cmd()
        .arg("bump")
        .write_stdin("")
        .assert()
        .failure();

    assert_eq!(project.stored_version(), "1.0.0");
}

#[test]
fn bump_outside_repository_warns_but_succeeds() {
    let project = Project::with_version("1.0.0");

    project
        .cmd()
        .args(["bump", "patch"])
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "Git is not available or not in a git repository",
        ));

    assert_eq!(project.stored_version(), "1.0.1");
}

#[test]
fn bump_in_repository_commits_and_tags() {
    if !git_installed() {
        return;
    }
    let project = Project::with_version("1.0.0");
    init_repo(project.path());

    project
        .cmd()
        .args(["--color", "never", "bump", "minor"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Committed: 1.1.0"))
        .stdout(predicate::str::contains("Tagged: v1.1.0"));

    assert_eq!(
        git(project.path(), &["log", "-1", "--format=%s"]),
        "Bump version to 1.1.0"
    );
    assert_eq!(git(project.path(), &["tag", "-l"]), "v1.1.0");
}

// =============================================================================
// Set
// =============================================================================

#[test]
fn set_explicit_version() {
    let project = Project::with_version("1.0.0");

    project
        .cmd()
        .args(["--color", "never", "set", "v2.1.0-alpha.1", "--no-git"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Version set: 1.0.0 → 2.1.0-alpha.1"));

    assert_eq!(project.stored_version(), "2.1.0-alpha.1");
}

#[test]
fn set_requires_a_version() {
    let project = Project::with_version("1.0.0");

    project
        .cmd()
        .args(["set", "--no-git"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("A version string is required."));
}

#[test]
fn set_rejects_invalid_version() {
    let project = Project::with_version("1.0.0");

    project
        .cmd()
        .args(["set", "1.2", "--no-git"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid version format: 1.2"))
        .stderr(predicate::str::contains("Please provide a valid semver string"));

    assert_eq!(project.stored_version(), "1.0.0");
}

#[test]
fn set_version_conflicts_with_match_git_tags() {
    let project = Project::with_version("1.0.0");

    project
        .cmd()
        .args(["set", "2.0.0", "--match-git-tags"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn set_match_git_tags_outside_repository_fails() {
    let project = Project::with_version("1.0.0");

    project
        .cmd()
        .args(["set", "--match-git-tags"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not in a git repository"));

    assert_eq!(project.stored_version(), "1.0.0");
}

#[test]
fn set_match_git_tags_uses_highest_tag() {
    if !git_installed() {
        return;
    }
    let project = Project::with_version("1.0.0");
    init_repo(project.path());
    git(project.path(), &["add", "version.json"]);
    git(project.path(), &["commit", "-q", "-m", "initial"]);
    for tag in ["v1.2.0", "v1.10.0", "v1.9.3", "nightly"] {
        git(project.path(), &["tag", tag]);
    }

    project
        .cmd()
        .args(["--color", "never", "set", "--match-git-tags"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Using latest git tag: 1.10.0"))
        .stdout(predicate::str::contains("Committed: 1.10.0"))
        .stdout(predicate::str::contains("Tagged").not());

    assert_eq!(project.stored_version(), "1.10.0");
}

// =============================================================================
// Global Flags & Errors
// =============================================================================

#[test]
fn quiet_and_verbose_flags_accepted() {
    let project = Project::with_version("1.0.0");

    project.cmd().args(["-q", "show"]).assert().success();
    project.cmd().args(["-vv", "show"]).assert().success();
}

#[test]
fn verbose_logs_land_in_log_file() {
    let project = Project::with_version("1.0.0");

    project
        .cmd()
        .args(["-v", "bump", "patch", "--no-git"])
        .assert()
        .success();

    let log = fs::read_to_string(project.path().join("logs").join("vmark.jsonl")).unwrap();
    let first: serde_json::Value =
        serde_json::from_str(log.lines().next().expect("at least one log line")).unwrap();
    assert!(first.get("level").is_some());
    assert!(log.contains("version bumped"));
}

#[test]
fn color_choices_accepted() {
    let project = Project::with_version("1.0.0");

    for choice in ["auto", "always", "never"] {
        project
            .cmd()
            .args(["--color", choice, "show"])
            .assert()
            .success();
    }
}

#[test]
fn no_subcommand_shows_help() {
    cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn invalid_subcommand_shows_error() {
    cmd()
        .arg("not-a-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn chdir_nonexistent_fails() {
    cmd()
        .args(["-C", "/nonexistent/path/that/does/not/exist", "show"])
        .assert()
        .failure();
}

//! CLI integration tests
//!
//! These drive the built binary against throwaway student projects and check
//! report output and exit codes.

use serial_test::serial;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn stepgate_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_stepgate"))
}

/// Runs stepgate in `project` with a private progress file and a scrubbed
/// environment, so the host's git repo or CI variables never leak in.
fn run(project: &Path, progress: &Path, args: &[&str]) -> Output {
    let ceiling = project.parent().unwrap_or(project);
    Command::new(stepgate_bin())
        .args(args)
        .arg("--project")
        .arg(project)
        .arg("--progress-file")
        .arg(progress)
        .env_remove("CURRENT_STEP")
        .env_remove("GITHUB_ACTIONS")
        .env_remove("RUST_LOG")
        .env_remove("STEPGATE_LOG_LEVEL")
        .env("GIT_CEILING_DIRECTORIES", ceiling)
        .output()
        .expect("Failed to execute stepgate")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn complete_project(dir: &TempDir) -> PathBuf {
    let root = dir.path().join("project");
    fs::create_dir_all(&root).unwrap();
    fs::write(
        root.join("index.html"),
        r#"<!DOCTYPE html>
<html>
<head><link rel="stylesheet" href="styles.css"></head>
<body>
<form method="post" action="process.php">
  <input type="text" name="name">
  <input type="email" name="email">
  <select name="club">
    <option>Programming Club</option>
    <option>Art Club</option>
    <option>Music Club</option>
  </select>
  <input type="submit" name="submit">
</form>
</body>
</html>
"#,
    )
    .unwrap();
    fs::write(
        root.join("styles.css"),
        "body { color: #333; }\nform { padding: 1em; }\ninput { margin: 4px; }\nselect { border: 1px solid; }\n",
    )
    .unwrap();
    fs::write(root.join("process.php"), "<?php\n$name = $_POST['name'];\n").unwrap();
    fs::write(root.join("README.md"), "# Club Registration\n").unwrap();
    root
}

fn git(dir: &Path, args: &[&str]) {
    let status = Command::new("git")
        .args(["-c", "user.name=Student", "-c", "user.email=student@example.com"])
        .args(["-c", "commit.gpgsign=false", "-c", "tag.gpgsign=false"])
        .args(args)
        .current_dir(dir)
        .env("GIT_CEILING_DIRECTORIES", dir.parent().unwrap_or(dir))
        .status()
        .expect("Failed to execute git");
    assert!(status.success(), "git {:?} failed", args);
}

/// Turns `project` into a repository with one commit carrying `tags`
fn tag_project(project: &Path, tags: &[&str]) {
    git(project, &["init", "-q"]);
    git(project, &["add", "."]);
    git(project, &["commit", "-q", "-m", "Registration form"]);
    for tag in tags {
        git(project, &["tag", tag]);
    }
}

#[test]
fn test_cli_help() {
    let output = Command::new(stepgate_bin())
        .arg("--help")
        .output()
        .expect("Failed to execute stepgate");

    assert!(output.status.success());
    let text = stdout(&output);
    for command in ["detect", "test", "structure", "tags", "smoke"] {
        assert!(text.contains(command), "help is missing {}", command);
    }
}

#[test]
fn test_cli_version() {
    let output = Command::new(stepgate_bin())
        .arg("--version")
        .output()
        .expect("Failed to execute stepgate");

    assert!(output.status.success());
    assert!(stdout(&output).contains("stepgate"));
}

#[test]
fn test_detect_without_repository_records_step_one() {
    let dir = TempDir::new().unwrap();
    let project = complete_project(&dir);
    let progress = dir.path().join("current_step.txt");

    let output = run(&project, &progress, &["detect"]);

    assert!(output.status.success());
    assert!(stdout(&output).contains("Current Step: 1 - Basic HTML Form Structure"));
    assert_eq!(fs::read_to_string(&progress).unwrap(), "1");
}

#[test]
fn test_detect_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let project = complete_project(&dir);
    let progress = dir.path().join("current_step.txt");

    run(&project, &progress, &["detect"]);
    let first = fs::read_to_string(&progress).unwrap();
    run(&project, &progress, &["detect"]);
    let second = fs::read_to_string(&progress).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_detect_survives_unwritable_progress_file() {
    let dir = TempDir::new().unwrap();
    let project = complete_project(&dir);
    let progress = dir.path().join("missing-dir").join("current_step.txt");

    let output = run(&project, &progress, &["detect"]);

    assert!(output.status.success());
    assert!(stdout(&output).contains("Current Step: 1"));
}

#[test]
fn test_detect_ci_annotations() {
    let dir = TempDir::new().unwrap();
    let project = complete_project(&dir);
    let progress = dir.path().join("current_step.txt");

    let output = Command::new(stepgate_bin())
        .args(["detect", "--project"])
        .arg(&project)
        .arg("--progress-file")
        .arg(&progress)
        .env("GITHUB_ACTIONS", "true")
        .env_remove("CURRENT_STEP")
        .env("GIT_CEILING_DIRECTORIES", dir.path())
        .output()
        .expect("Failed to execute stepgate");

    let text = stdout(&output);
    assert!(text.contains("::set-output name=step::1"));
    assert!(text.contains("::set-output name=step_name::Basic HTML Form Structure"));
}

#[test]
fn test_step_one_passes_on_complete_project() {
    let dir = TempDir::new().unwrap();
    let project = complete_project(&dir);
    let progress = dir.path().join("current_step.txt");

    let output = run(&project, &progress, &["test", "--step", "1"]);
    let text = stdout(&output);

    assert!(output.status.success(), "{}", text);
    assert!(text.contains("=== STEP 1 TESTS ==="));
    assert!(text.contains("Run: git tag step-1"));
}

#[test]
fn test_step_one_fails_without_html() {
    let dir = TempDir::new().unwrap();
    let project = complete_project(&dir);
    fs::remove_file(project.join("index.html")).unwrap();
    let progress = dir.path().join("current_step.txt");

    let output = run(&project, &progress, &["test", "--step", "1"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("index.html file missing"));
}

#[test]
fn test_step_two_requires_step_one_tag() {
    let dir = TempDir::new().unwrap();
    let project = complete_project(&dir);
    let progress = dir.path().join("current_step.txt");

    let output = run(&project, &progress, &["test", "--step", "2"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("Step 1 must be tagged before working on Step 2"));
}

#[test]
fn test_step_six_enhancement_threshold() {
    let dir = TempDir::new().unwrap();
    let project = complete_project(&dir);
    let progress = dir.path().join("current_step.txt");

    let output = run(&project, &progress, &["test", "--step", "6"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("Need more enhancement features"));

    fs::write(
        project.join("process.php"),
        "<?php\nfunction save_entry($row) {\n  file_put_contents('data.txt', $row);\n}\n",
    )
    .unwrap();
    let output = run(&project, &progress, &["test", "--step", "6"]);
    assert!(output.status.success(), "{}", stdout(&output));
    assert!(stdout(&output).contains("Good enhancement features implemented"));
}

#[test]
fn test_unknown_step_runs_nothing() {
    let dir = TempDir::new().unwrap();
    let project = complete_project(&dir);
    let progress = dir.path().join("current_step.txt");

    let output = run(&project, &progress, &["test", "--step", "7"]);
    let text = stdout(&output);

    assert!(output.status.success());
    assert!(text.contains("No tests defined for step 7"));
    assert!(text.contains("STEP 7 TESTS: 0/0 passed"));
}

#[test]
fn test_step_from_progress_file() {
    let dir = TempDir::new().unwrap();
    let project = complete_project(&dir);
    let progress = dir.path().join("current_step.txt");
    fs::write(&progress, "3\n").unwrap();

    let output = run(&project, &progress, &["test"]);

    assert!(stdout(&output).contains("Testing Step 3: PHP Form Processing"));
}

#[test]
#[serial]
fn test_current_step_env_overrides_progress_file() {
    let dir = TempDir::new().unwrap();
    let project = complete_project(&dir);
    let progress = dir.path().join("current_step.txt");
    fs::write(&progress, "3").unwrap();

    let output = Command::new(stepgate_bin())
        .args(["test", "--project"])
        .arg(&project)
        .arg("--progress-file")
        .arg(&progress)
        .env("CURRENT_STEP", "1")
        .env("GIT_CEILING_DIRECTORIES", dir.path())
        .output()
        .expect("Failed to execute stepgate");

    assert!(stdout(&output).contains("Testing Step 1: Basic HTML Form Structure"));
}

#[test]
fn test_json_format() {
    let dir = TempDir::new().unwrap();
    let project = complete_project(&dir);
    let progress = dir.path().join("current_step.txt");

    let output = run(&project, &progress, &["test", "--step", "1", "--format", "json"]);
    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");

    assert_eq!(value["failed"], 0);
    assert_eq!(value["label"], "STEP 1 TESTS");
}

#[test]
fn test_structure_passes_on_complete_project() {
    let dir = TempDir::new().unwrap();
    let project = complete_project(&dir);
    let progress = dir.path().join("current_step.txt");

    let output = run(&project, &progress, &["structure"]);
    let text = stdout(&output);

    assert!(output.status.success(), "{}", text);
    assert!(text.contains("No forbidden frameworks/tools detected"));
    assert!(text.contains("✅ Structure validation passed!"));
}

#[test]
fn test_structure_flags_node_modules() {
    let dir = TempDir::new().unwrap();
    let project = complete_project(&dir);
    fs::create_dir_all(project.join("node_modules")).unwrap();
    let progress = dir.path().join("current_step.txt");

    let output = run(&project, &progress, &["structure"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("Forbidden file/directory found: node_modules"));
}

#[test]
fn test_tags_always_succeeds() {
    let dir = TempDir::new().unwrap();
    let project = complete_project(&dir);
    let progress = dir.path().join("current_step.txt");

    let output = run(&project, &progress, &["tags"]);
    let text = stdout(&output);

    assert!(output.status.success());
    assert!(text.contains("=== TAG VALIDATION ==="));
    assert!(text.contains("=== GUIDANCE ==="));
}

#[test]
fn test_smoke_unreachable_endpoint_fails_cleanly() {
    let dir = TempDir::new().unwrap();
    let project = complete_project(&dir);
    let progress = dir.path().join("current_step.txt");

    let output = run(
        &project,
        &progress,
        &["smoke", "--url", "http://127.0.0.1:9/register.php"],
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("SMOKE TESTS"));
}

#[test]
fn test_detect_reads_git_tags() {
    let dir = TempDir::new().unwrap();
    let project = complete_project(&dir);
    let progress = dir.path().join("current_step.txt");
    tag_project(&project, &["step-1", "step-2"]);

    let output = run(&project, &progress, &["detect"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Current Step: 3 - PHP Form Processing"));
    assert_eq!(fs::read_to_string(&progress).unwrap(), "3");

    git(&project, &["tag", "step-10"]);
    let output = run(&project, &progress, &["detect"]);
    assert!(stdout(&output).contains("Current Step: 6 - Enhanced Features"));
    assert_eq!(fs::read_to_string(&progress).unwrap(), "6");
}

#[test]
fn test_step_two_passes_once_step_one_is_tagged() {
    let dir = TempDir::new().unwrap();
    let project = complete_project(&dir);
    let progress = dir.path().join("current_step.txt");
    tag_project(&project, &["step-1"]);

    let output = run(&project, &progress, &["test", "--step", "2"]);
    let text = stdout(&output);

    assert!(output.status.success(), "{}", text);
    assert!(!text.contains("must be tagged"));
    assert!(text.contains("CSS stylesheet linked in HTML"));
    assert!(text.contains("Run: git tag step-2"));
}

#[test]
fn test_tags_walks_repository_history() {
    let dir = TempDir::new().unwrap();
    let project = complete_project(&dir);
    let progress = dir.path().join("current_step.txt");
    tag_project(&project, &["step-2", "step-1"]);
    fs::write(&progress, "3").unwrap();

    let output = run(&project, &progress, &["tags"]);
    let text = stdout(&output);

    assert!(output.status.success());
    assert!(text.contains("✓ step-1: Basic HTML Form Structure"));
    assert!(text.contains("✓ step-2: CSS Styling and Layout"));
    assert!(text.contains("✅ Tag sequence is correct!"));
}

#[test]
fn test_invalid_current_step_only_fails_test_command() {
    let dir = TempDir::new().unwrap();
    let project = complete_project(&dir);
    let progress = dir.path().join("current_step.txt");

    let with_bad_step = |args: &[&str]| {
        Command::new(stepgate_bin())
            .args(args)
            .arg("--project")
            .arg(&project)
            .arg("--progress-file")
            .arg(&progress)
            .env("CURRENT_STEP", "abc")
            .env_remove("GITHUB_ACTIONS")
            .env("GIT_CEILING_DIRECTORIES", dir.path())
            .output()
            .expect("Failed to execute stepgate")
    };

    for command in ["tags", "detect", "structure"] {
        let output = with_bad_step(&[command]);
        assert_eq!(output.status.code(), Some(0), "{} should ignore CURRENT_STEP", command);
    }

    let output = with_bad_step(&["test"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("CURRENT_STEP"));
}

#[test]
fn test_latin1_html_is_still_checked() {
    let dir = TempDir::new().unwrap();
    let project = complete_project(&dir);
    let progress = dir.path().join("current_step.txt");
    let mut html = fs::read(project.join("index.html")).unwrap();
    html.extend_from_slice(b"<p>Caf\xE9 Club meets Fridays</p>\n");
    fs::write(project.join("index.html"), html).unwrap();

    let output = run(&project, &progress, &["test", "--step", "1"]);
    let text = stdout(&output);

    assert!(output.status.success(), "{}", text);
    assert!(text.contains("Form element present"));
}

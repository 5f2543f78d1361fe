use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn setup_generated_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("postgres_migrations")).unwrap();
    fs::write(root.join("postgres_migrations/env.py"), "env").unwrap();
    fs::write(root.join("readme_pg.md"), "pg").unwrap();
    fs::create_dir_all(root.join("app/static")).unwrap();
    fs::write(root.join("app/static/site.css"), "").unwrap();
    fs::write(root.join("app/main.py"), "").unwrap();
    fs::write(root.join(".env.example"), "KEY=value").unwrap();
    dir
}

fn postgen() -> Command {
    let mut cmd = Command::cargo_bin("postgen").unwrap();
    cmd.env("NO_COLOR", "1");
    cmd
}

#[test]
fn test_explicit_paths_verbose() {
    let dir = setup_generated_project();

    let assert = postgen()
        .arg("--verbose")
        .arg("--output-dir")
        .arg(dir.path())
        .args(["postgres_migrations", "missing.txt", "readme_pg.md"])
        .assert()
        .success();
    let output = assert.get_output();

    let stdout = String::from_utf8_lossy(&output.stdout);
    let successes: Vec<&str> = stdout.lines().collect();
    assert_eq!(successes.len(), 2, "{}", stdout);
    assert!(successes[0].starts_with("[SUCCESS]: Directory deleted:"));
    assert!(successes[0].ends_with("postgres_migrations"));
    assert!(successes[1].starts_with("[SUCCESS]: File deleted:"));
    assert!(successes[1].ends_with("readme_pg.md"));

    let stderr = String::from_utf8_lossy(&output.stderr);
    let errors: Vec<&str> = stderr.lines().filter(|l| l.starts_with("[ERROR]:")).collect();
    assert_eq!(errors.len(), 1, "{}", stderr);
    assert!(errors[0].contains("missing.txt"));

    assert!(!dir.path().join("postgres_migrations").exists());
    assert!(!dir.path().join("readme_pg.md").exists());
    assert!(dir.path().join("app/main.py").exists());
}

#[test]
fn test_quiet_run_only_reports_errors() {
    let dir = setup_generated_project();

    postgen()
        .arg("-o")
        .arg(dir.path())
        .args(["readme_pg.md", "missing.txt"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("missing.txt"));

    assert!(!dir.path().join("readme_pg.md").exists());
}

#[test]
fn test_hook_payload_with_template_rules() {
    let project = setup_generated_project();
    let template = TempDir::new().unwrap();
    fs::create_dir(template.path().join("hooks")).unwrap();
    fs::write(
        template.path().join("hooks/cleanup.yml"),
        r#"
remove:
  - when: "database != 'postgresql'"
    paths: [postgres_migrations, readme_pg.md]
  - when: "not render_html"
    paths: ["app/static"]
rename:
  - from: .env.example
    to: .env
messages:
  success: "{{ project_name }} initialized"
  info: "Happy hacking"
"#,
    )
    .unwrap();

    let payload = serde_json::json!({
        "template_dir": template.path(),
        "output_dir": project.path(),
        "context": {"database": "sqlite", "render_html": true, "project_name": "demo"}
    });

    postgen()
        .arg("--stdin")
        .write_stdin(payload.to_string())
        .assert()
        .success()
        .stdout(predicate::str::contains("[SUCCESS]: demo initialized"))
        .stdout(predicate::str::contains("[INFO]: Happy hacking"));

    let root = project.path();
    assert!(!root.join("postgres_migrations").exists());
    assert!(!root.join("readme_pg.md").exists());
    assert!(root.join("app/static/site.css").exists());
    assert!(root.join(".env").exists());
    assert!(!root.join(".env.example").exists());
}

#[test]
fn test_malformed_payload_fails_before_cleanup() {
    let dir = setup_generated_project();

    postgen()
        .arg("--stdin")
        .arg("-o")
        .arg(dir.path())
        .arg("readme_pg.md")
        .write_stdin("{not json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Hook payload error"));

    assert!(dir.path().join("readme_pg.md").exists());
}

#[test]
fn test_explicit_rules_file() {
    let dir = setup_generated_project();
    let rules = TempDir::new().unwrap();
    let rules_path = rules.path().join("rules.json");
    fs::write(&rules_path, r#"{"remove": [{"paths": ["app/static"]}]}"#).unwrap();

    postgen()
        .arg("-o")
        .arg(dir.path())
        .arg("--rules")
        .arg(&rules_path)
        .assert()
        .success();

    assert!(!dir.path().join("app/static").exists());
}

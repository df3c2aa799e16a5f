//! Integration tests for `depstrap apply`.

use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn empty_manifest_succeeds() {
  let env = TestEnv::with_manifest("{}");
  env
    .cmd()
    .arg("apply")
    .assert()
    .success()
    .stdout(predicate::str::contains("no dependencies"));
}

#[test]
fn malformed_manifest_fails() {
  let env = TestEnv::with_manifest(r#"{"pip": ["numpy""#);
  env
    .cmd()
    .arg("apply")
    .assert()
    .failure()
    .stderr(predicate::str::contains("invalid JSON manifest"));
}

#[test]
fn top_level_list_is_rejected() {
  let env = TestEnv::with_manifest(r#"["numpy"]"#);
  env
    .cmd()
    .arg("apply")
    .assert()
    .failure()
    .stderr(predicate::str::contains("mapping"));
}

#[test]
fn drive_entry_without_source_fails_before_download() {
  let env = TestEnv::with_manifest(r#"{"gdrive_compressed": [{"fname": "data.zip"}]}"#);
  env
    .cmd()
    .arg("apply")
    .assert()
    .failure()
    .stderr(predicate::str::contains("file_id"));

  assert!(!env.path("data.zip").exists());
  assert!(!env.path("data").exists());
}

#[test]
fn git_entry_without_url_fails() {
  let env = TestEnv::with_manifest(r#"{"git": [{"folder": "repo"}]}"#);
  env
    .cmd()
    .arg("apply")
    .assert()
    .failure()
    .stderr(predicate::str::contains("git entry needs a 'url'"));
}

#[test]
#[cfg(unix)]
fn pip_packages_install_and_drive_mounts() {
  let env = TestEnv::with_manifest(r#"{"pip": ["numpy", "scipy"], "gdrive": true}"#);
  env
    .cmd()
    .arg("apply")
    .assert()
    .success()
    .stdout(predicate::str::contains("Environment ready"))
    .stdout(predicate::str::contains("Pip packages: 2"))
    .stdout(predicate::str::contains("Drive mounted at"));

  assert!(env.path("drive").is_dir());
}

#[test]
#[cfg(unix)]
fn failing_pip_halts_the_pass() {
  let env = TestEnv::with_manifest(r#"{"pip": ["numpy"], "gdrive": true}"#);
  env
    .cmd()
    .args(["apply", "--python", "false"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("pip install of 'numpy' failed"));

  assert!(!env.path("drive").exists());
}

#[test]
#[cfg(unix)]
fn yaml_manifest_with_work_dir() {
  let env = TestEnv::with_named_manifest("deps.yaml", "pip: numpy\n");
  let work_dir = env.path("work");
  std::fs::create_dir(&work_dir).unwrap();

  env
    .cmd()
    .arg("apply")
    .arg(env.path("deps.yaml"))
    .arg("--work-dir")
    .arg(&work_dir)
    .assert()
    .success()
    .stdout(predicate::str::contains("Pip packages: 1"));
}

#[test]
fn missing_work_dir_fails() {
  let env = TestEnv::with_manifest(r#"{"pip": ["numpy"]}"#);
  env
    .cmd()
    .args(["apply", "--work-dir", "does-not-exist"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("Work directory not found"));
}

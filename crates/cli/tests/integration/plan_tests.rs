//! Integration tests for `depstrap plan`.

use predicates::prelude::*;

use super::common::TestEnv;

const FULL_MANIFEST: &str = r#"{
  "pip": ["numpy"],
  "git": [{"url": "https://x/y/repo.git"}],
  "gdrive_compressed": [{"file_id": "ABC", "fname": "data.zip"}],
  "otherdata": ["https://example.com/labels.csv"]
}"#;

#[test]
fn plan_lists_steps_in_order() {
  let env = TestEnv::with_manifest(FULL_MANIFEST);
  let output = env.cmd().arg("plan").assert().success().get_output().stdout.clone();
  let stdout = String::from_utf8(output).unwrap();

  let clone = stdout.find("clone https://x/y/repo.git -> repo.git").unwrap();
  let pip = stdout.find("pip install numpy").unwrap();
  let drive = stdout
    .find("download https://drive.google.com/uc?id=ABC as data.zip, extract -> data")
    .unwrap();
  let raw = stdout.find("download https://example.com/labels.csv -> labels.csv").unwrap();
  assert!(clone < pip && pip < drive && drive < raw);
}

#[test]
fn plan_has_no_side_effects() {
  let env = TestEnv::with_manifest(FULL_MANIFEST);
  env.cmd().arg("plan").assert().success();

  assert!(!env.path("repo.git").exists());
  assert!(!env.path("data").exists());
  assert!(!env.path("labels.csv").exists());
}

#[test]
fn plan_json_output() {
  let env = TestEnv::with_manifest(r#"{"git": [{"url": "https://x/y/lib", "install": true}], "gdrive": true}"#);
  let output = env.cmd().args(["plan", "--json"]).assert().success().get_output().stdout.clone();

  let steps: serde_json::Value = serde_json::from_slice(&output).unwrap();
  assert_eq!(steps[0]["category"], "git");
  assert_eq!(steps[0]["step"]["action"], "install_git");
  assert_eq!(steps[0]["step"]["specifier"], "git+https://x/y/lib");
  assert_eq!(steps[1]["step"]["action"], "mount_drive");
}

#[test]
fn plan_reports_invalid_entries() {
  let env = TestEnv::with_manifest(r#"{"gdrive_compressed": [{"file_id": "ABC"}], "pip": ["numpy"]}"#);
  env
    .cmd()
    .arg("plan")
    .assert()
    .failure()
    .stdout(predicate::str::contains("gdrive_compressed[0]"))
    .stdout(predicate::str::contains("pip install numpy"))
    .stderr(predicate::str::contains("1 invalid entry in manifest"));
}

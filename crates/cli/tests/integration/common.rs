//! Shared test helpers for CLI integration tests.

use std::path::PathBuf;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Isolated test environment.
///
/// Each test gets its own temporary directory holding the manifest and
/// serving as the work dir, so nothing leaks into the crate directory.
pub struct TestEnv {
  pub temp: TempDir,
  pub manifest_path: PathBuf,
}

impl TestEnv {
  /// Create an environment with `deps.json` holding `manifest`.
  pub fn with_manifest(manifest: &str) -> Self {
    Self::with_named_manifest("deps.json", manifest)
  }

  pub fn with_named_manifest(name: &str, manifest: &str) -> Self {
    let temp = TempDir::new().unwrap();
    let manifest_path = temp.path().join(name);
    std::fs::write(&manifest_path, manifest).unwrap();
    Self { temp, manifest_path }
  }

  pub fn path(&self, relative: &str) -> PathBuf {
    self.temp.path().join(relative)
  }

  /// A depstrap command running inside the environment.
  ///
  /// The interpreter and mount command default to programs that exist
  /// everywhere so no test touches the real pip or a real mount.
  pub fn cmd(&self) -> Command {
    let mut cmd = cargo_bin_cmd!("depstrap");
    cmd
      .current_dir(self.temp.path())
      .env_remove("RUST_LOG")
      .env("DEPSTRAP_PYTHON", "true")
      .env("DEPSTRAP_MOUNT_COMMAND", "true")
      .env("DEPSTRAP_MOUNT_POINT", self.temp.path().join("drive"))
      .env_remove("DEPSTRAP_WORK_DIR");
    cmd
  }
}

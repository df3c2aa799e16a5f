//! Running external programs for the installer and the drive mount.

use std::process::{Command, Output};

use tracing::debug;

use super::CollaboratorError;

/// Run `program` with `args`, capturing its output.
///
/// Only a failure to start the process is an error here; callers decide
/// what a non-zero exit means.
pub(crate) fn run_command(program: &str, args: &[String]) -> Result<Output, CollaboratorError> {
  debug!(program, ?args, "spawning process");

  let output = Command::new(program)
    .args(args)
    .output()
    .map_err(|source| CollaboratorError::Spawn {
      program: program.to_string(),
      source,
    })?;

  let stdout = String::from_utf8_lossy(&output.stdout);
  let stderr = String::from_utf8_lossy(&output.stderr);
  if !stdout.trim().is_empty() {
    debug!(stdout = %stdout.trim(), "command stdout");
  }
  if !stderr.trim().is_empty() {
    debug!(stderr = %stderr.trim(), "command stderr");
  }

  Ok(output)
}

/// The trimmed stderr of a finished process.
pub(crate) fn stderr_text(output: &Output) -> String {
  String::from_utf8_lossy(&output.stderr).trim().to_string()
}

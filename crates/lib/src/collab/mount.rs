//! Mounting the cloud drive through an external command.
//!
//! The command is configurable; arguments equal to `{mount_point}` are
//! replaced by the mount point.

use std::fs;
use std::path::Path;

use tracing::info;

use super::command::{run_command, stderr_text};
use super::{CollaboratorError, StorageMount};
use crate::consts::MOUNT_POINT_PLACEHOLDER;

/// Mounts storage by running a command such as `rclone mount`.
#[derive(Debug, Clone)]
pub struct CommandMount {
  command: Vec<String>,
}

impl CommandMount {
  pub fn new(command: Vec<String>) -> Self {
    Self { command }
  }

  /// Program and arguments for mounting at `mount_point`.
  fn resolve(&self, mount_point: &Path) -> Option<(&str, Vec<String>)> {
    let (program, args) = self.command.split_first()?;
    let point = mount_point.display().to_string();
    let args = args
      .iter()
      .map(|arg| arg.replace(MOUNT_POINT_PLACEHOLDER, &point))
      .collect();
    Some((program.as_str(), args))
  }
}

impl StorageMount for CommandMount {
  fn mount(&self, mount_point: &Path) -> Result<(), CollaboratorError> {
    let mount_error = |message: String| CollaboratorError::Mount {
      mount_point: mount_point.to_path_buf(),
      message,
    };

    let (program, args) = self
      .resolve(mount_point)
      .ok_or_else(|| mount_error("no mount command configured".to_string()))?;

    fs::create_dir_all(mount_point).map_err(|e| CollaboratorError::io(mount_point, e))?;

    let output = run_command(program, &args)?;
    if !output.status.success() {
      return Err(mount_error(format!(
        "'{}' exited with {:?}: {}",
        program,
        output.status.code(),
        stderr_text(&output)
      )));
    }

    info!(mount_point = %mount_point.display(), "mounted drive");
    Ok(())
  }
}

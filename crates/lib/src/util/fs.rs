//! Filesystem helpers used when replacing folders and cleaning up downloads.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tracing::debug;

use crate::collab::CollaboratorError;

/// Make sure nothing exists at `path`.
///
/// Removes a directory tree, a file or a symlink. Succeeds when the path is
/// already absent; any other I/O failure is returned.
pub fn ensure_absent(path: &Path) -> Result<(), CollaboratorError> {
  let metadata = match fs::symlink_metadata(path) {
    Ok(metadata) => metadata,
    Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
    Err(e) => return Err(CollaboratorError::io(path, e)),
  };

  let result = if metadata.is_dir() {
    fs::remove_dir_all(path)
  } else {
    fs::remove_file(path)
  };

  match result {
    Ok(()) => {
      debug!(path = %path.display(), "removed existing path");
      Ok(())
    }
    Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
    Err(e) => Err(CollaboratorError::io(path, e)),
  }
}

/// Delete a single file that is expected to exist.
pub fn remove_file(path: &Path) -> Result<(), CollaboratorError> {
  fs::remove_file(path).map_err(|e| CollaboratorError::io(path, e))?;
  debug!(path = %path.display(), "removed file");
  Ok(())
}

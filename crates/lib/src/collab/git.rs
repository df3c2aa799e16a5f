//! Fresh git clones.
//!
//! The processor always removes the destination before calling in here, so
//! a clone never has to reconcile with existing local state.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use super::{CollaboratorError, Vcs};

/// Clones repositories with gix.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitCloner;

impl Vcs for GitCloner {
  fn clone_from(&self, url: &str, dest: &Path) -> Result<(), CollaboratorError> {
    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
      fs::create_dir_all(parent).map_err(|e| CollaboratorError::io(parent, e))?;
    }

    info!(url, path = %dest.display(), "cloning repository");
    let repo = clone_repo(url, dest)?;

    match repo.head_id() {
      Ok(id) => debug!(url, rev = %id, "checked out"),
      Err(e) => debug!(url, error = %e, "cloned repository has no resolvable HEAD"),
    }
    Ok(())
  }
}

/// Clone a git repository to the specified path and check out its worktree.
fn clone_repo(url: &str, dest: &Path) -> Result<gix::Repository, CollaboratorError> {
  let clone_error = |e: Box<dyn std::error::Error + Send + Sync>| CollaboratorError::Clone {
    url: url.to_string(),
    source: e,
  };

  let mut prepared = gix::prepare_clone(url, dest).map_err(|e| clone_error(Box::new(e)))?;

  let (mut checkout, _outcome) = prepared
    .fetch_then_checkout(gix::progress::Discard, &gix::interrupt::IS_INTERRUPTED)
    .map_err(|e| clone_error(Box::new(e)))?;

  let (repo, _outcome) = checkout
    .main_worktree(gix::progress::Discard, &gix::interrupt::IS_INTERRUPTED)
    .map_err(|e| clone_error(Box::new(e)))?;

  Ok(repo)
}

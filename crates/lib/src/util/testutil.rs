//! Test utilities for depstrap-lib.
//!
//! Recording fakes for every collaborator. All fakes share one [`CallLog`]
//! so tests can assert on the global order of side effects.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::collab::{CollaboratorError, Collaborators, Extractor, Fetcher, Installer, StorageMount, Vcs};

/// One recorded collaborator call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
  Install { specifier: String, upgrade: bool },
  Clone { url: String, dest: PathBuf },
  Download { url: String, dest: PathBuf },
  Extract { archive: PathBuf, dest: PathBuf },
  Mount { mount_point: PathBuf },
}

pub type CallLog = Rc<RefCell<Vec<Call>>>;

/// Fails every call whose URL or specifier contains `fail_on`.
#[derive(Clone, Default)]
pub struct Fakes {
  pub log: CallLog,
  pub fail_on: Option<String>,
}

impl Fakes {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn failing_on(needle: &str) -> Self {
    Self {
      log: CallLog::default(),
      fail_on: Some(needle.to_string()),
    }
  }

  pub fn calls(&self) -> Vec<Call> {
    self.log.borrow().clone()
  }

  pub fn collaborators(&self) -> Collaborators {
    Collaborators {
      installer: Box::new(self.clone()),
      vcs: Box::new(self.clone()),
      fetcher: Box::new(self.clone()),
      extractor: Box::new(self.clone()),
      mount: Box::new(self.clone()),
    }
  }

  fn should_fail(&self, value: &str) -> bool {
    self.fail_on.as_deref().is_some_and(|needle| value.contains(needle))
  }
}

impl Installer for Fakes {
  fn install(&self, specifier: &str, upgrade: bool) -> Result<(), CollaboratorError> {
    self.log.borrow_mut().push(Call::Install {
      specifier: specifier.to_string(),
      upgrade,
    });
    if self.should_fail(specifier) {
      return Err(CollaboratorError::Install {
        specifier: specifier.to_string(),
        code: Some(1),
        stderr: "fake failure".to_string(),
      });
    }
    Ok(())
  }
}

impl Vcs for Fakes {
  fn clone_from(&self, url: &str, dest: &Path) -> Result<(), CollaboratorError> {
    self.log.borrow_mut().push(Call::Clone {
      url: url.to_string(),
      dest: dest.to_path_buf(),
    });
    if self.should_fail(url) {
      return Err(CollaboratorError::Clone {
        url: url.to_string(),
        source: "fake failure".into(),
      });
    }
    fs::create_dir_all(dest.join(".git")).map_err(|e| CollaboratorError::io(dest, e))
  }
}

impl Fetcher for Fakes {
  fn download(&self, url: &str, dest: &Path) -> Result<(), CollaboratorError> {
    self.log.borrow_mut().push(Call::Download {
      url: url.to_string(),
      dest: dest.to_path_buf(),
    });
    if self.should_fail(url) {
      return Err(CollaboratorError::Download {
        url: url.to_string(),
        message: "fake failure".to_string(),
      });
    }
    fs::write(dest, url).map_err(|e| CollaboratorError::io(dest, e))
  }
}

impl Extractor for Fakes {
  fn extract_all(&self, archive: &Path, dest: &Path) -> Result<(), CollaboratorError> {
    self.log.borrow_mut().push(Call::Extract {
      archive: archive.to_path_buf(),
      dest: dest.to_path_buf(),
    });
    if !archive.exists() {
      return Err(CollaboratorError::Extract {
        archive: archive.to_path_buf(),
        message: "archive missing".to_string(),
      });
    }
    fs::create_dir_all(dest).map_err(|e| CollaboratorError::io(dest, e))?;
    fs::write(dest.join("extracted.txt"), "ok").map_err(|e| CollaboratorError::io(dest, e))
  }
}

impl StorageMount for Fakes {
  fn mount(&self, mount_point: &Path) -> Result<(), CollaboratorError> {
    self.log.borrow_mut().push(Call::Mount {
      mount_point: mount_point.to_path_buf(),
    });
    Ok(())
  }
}

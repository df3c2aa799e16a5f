//! Types for manifest processing.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::collab::CollaboratorError;
use crate::consts::{DEFAULT_MOUNT_COMMAND, DEFAULT_MOUNT_POINT, DEFAULT_PYTHON};

/// Settings for a processing pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessorConfig {
  /// Python interpreter whose pip installs packages.
  pub python: String,
  /// Where the cloud drive is mounted.
  pub mount_point: PathBuf,
  /// Program and arguments used to mount the drive.
  pub mount_command: Vec<String>,
  /// Base directory for relative clone, download and extraction targets.
  pub work_dir: PathBuf,
}

impl Default for ProcessorConfig {
  fn default() -> Self {
    Self {
      python: DEFAULT_PYTHON.to_string(),
      mount_point: PathBuf::from(DEFAULT_MOUNT_POINT),
      mount_command: DEFAULT_MOUNT_COMMAND.iter().map(|s| s.to_string()).collect(),
      work_dir: PathBuf::from("."),
    }
  }
}

/// A manifest entry is missing something it needs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
  #[error("git entry needs a 'url'")]
  MissingGitUrl,

  #[error("compressed_data entry needs a 'url'")]
  MissingArchiveUrl,

  #[error(r#"gdrive_compressed entry needs a 'file_id' or a 'url' such as "https://drive.google.com/uc?id=FILE_ID""#)]
  MissingDriveSource,

  #[error("gdrive_compressed entry needs the original file name as 'fname'")]
  MissingDriveFileName,

  /// No usable local name could be derived from the entry.
  #[error("cannot derive a local name from '{0}'; set 'folder' or use a URL ending in a file name")]
  EmptyTarget(String),

  /// An explicit `folder` that points at the work directory or above it.
  #[error("folder '{0}' must name a path below the work directory")]
  UnsafeFolder(String),
}

/// Errors that stop a processing pass.
#[derive(Debug, Error)]
pub enum ProcessError {
  #[error("invalid entry: {0}")]
  Validation(#[from] ValidationError),

  #[error(transparent)]
  Collaborator(#[from] CollaboratorError),
}

/// The manifest categories, in processing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
  Git,
  Pip,
  CompressedData,
  GdriveCompressed,
  Otherdata,
  Gdrive,
}

impl Category {
  /// The manifest key of this category.
  pub fn as_str(self) -> &'static str {
    match self {
      Category::Git => "git",
      Category::Pip => "pip",
      Category::CompressedData => "compressed_data",
      Category::GdriveCompressed => "gdrive_compressed",
      Category::Otherdata => "otherdata",
      Category::Gdrive => "gdrive",
    }
  }
}

impl fmt::Display for Category {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// The concrete side effect a resolved entry performs.
///
/// File and folder names are relative to the configured work dir.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
  /// `pip install git+<url>` instead of cloning.
  InstallGit { specifier: String },
  /// Remove `folder`, then clone `url` into it.
  CloneGit { url: String, folder: String },
  /// `pip install -U <specifier>`.
  Pip { specifier: String },
  /// Download to `archive`, replace `folder` with its contents, delete `archive`.
  ExtractArchive { url: String, archive: String, folder: String },
  /// Quiet download to `archive`, extract into `folder`, delete `archive`.
  ExtractDriveArchive { url: String, archive: String, folder: String },
  /// Download `url` to `file`.
  DownloadFile { url: String, file: String },
  /// Mount the cloud drive.
  MountDrive { mount_point: PathBuf },
}

impl fmt::Display for Step {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Step::InstallGit { specifier } | Step::Pip { specifier } => write!(f, "pip install {specifier}"),
      Step::CloneGit { url, folder } => write!(f, "clone {url} -> {folder}"),
      Step::ExtractArchive { url, archive, folder } | Step::ExtractDriveArchive { url, archive, folder } => {
        write!(f, "download {url} as {archive}, extract -> {folder}")
      }
      Step::DownloadFile { url, file } => write!(f, "download {url} -> {file}"),
      Step::MountDrive { mount_point } => write!(f, "mount drive at {}", mount_point.display()),
    }
  }
}

/// One entry of a dry-run plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedStep {
  pub category: Category,
  /// Position of the entry within its category.
  pub index: usize,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub step: Option<Step>,
  /// Why the entry would fail validation.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error: Option<String>,
}

impl PlannedStep {
  pub fn is_valid(&self) -> bool {
    self.error.is_none()
  }
}

/// Counts of what a completed pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ApplySummary {
  pub git: usize,
  pub pip: usize,
  pub compressed_data: usize,
  pub gdrive_compressed: usize,
  pub otherdata: usize,
  pub drive_mounted: bool,
}

impl ApplySummary {
  pub(crate) fn record(&mut self, category: Category) {
    match category {
      Category::Git => self.git += 1,
      Category::Pip => self.pip += 1,
      Category::CompressedData => self.compressed_data += 1,
      Category::GdriveCompressed => self.gdrive_compressed += 1,
      Category::Otherdata => self.otherdata += 1,
      Category::Gdrive => self.drive_mounted = true,
    }
  }

  /// Entries processed, counting the mount.
  pub fn total(&self) -> usize {
    self.git + self.pip + self.compressed_data + self.gdrive_compressed + self.otherdata + usize::from(self.drive_mounted)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn step_display() {
    let step = Step::CloneGit {
      url: "https://x/y/repo.git".to_string(),
      folder: "repo.git".to_string(),
    };
    assert_eq!(step.to_string(), "clone https://x/y/repo.git -> repo.git");
  }

  #[test]
  fn planned_step_serializes_action_tag() {
    let planned = PlannedStep {
      category: Category::Pip,
      index: 0,
      step: Some(Step::Pip {
        specifier: "numpy".to_string(),
      }),
      error: None,
    };
    let json = serde_json::to_value(&planned).unwrap();
    assert_eq!(
      json,
      serde_json::json!({ "category": "pip", "index": 0, "step": { "action": "pip", "specifier": "numpy" } })
    );
  }

  #[test]
  fn summary_total_counts_mount() {
    let mut summary = ApplySummary::default();
    summary.record(Category::Git);
    summary.record(Category::Pip);
    summary.record(Category::Pip);
    summary.record(Category::Gdrive);
    assert_eq!(summary.pip, 2);
    assert!(summary.drive_mounted);
    assert_eq!(summary.total(), 4);
  }
}

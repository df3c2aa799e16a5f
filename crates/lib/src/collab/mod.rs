//! External collaborators driven by the processor.
//!
//! Each collaborator is a narrow trait so the processor can be exercised
//! with fakes. The production implementations live in the submodules:
//! - [`PipInstaller`]: `python -m pip install`
//! - [`GitCloner`]: fresh clones via gix
//! - [`HttpFetcher`]: blocking HTTP downloads, Google Drive aware
//! - [`ArchiveExtractor`]: zip and tar(.gz) extraction
//! - [`CommandMount`]: mounts the cloud drive with an external command

mod archive;
mod command;
mod fetch;
mod git;
mod install;
mod mount;

use std::path::{Path, PathBuf};

use thiserror::Error;

pub use archive::{ArchiveExtractor, ArchiveKind};
pub use fetch::HttpFetcher;
pub use git::GitCloner;
pub use install::{PipInstaller, pip_args};
pub use mount::CommandMount;

use crate::process::ProcessorConfig;

/// Errors raised by collaborators. They are propagated unchanged.
#[derive(Debug, Error)]
pub enum CollaboratorError {
  /// The package installer exited unsuccessfully.
  #[error("pip install of '{specifier}' failed with exit code {code:?}: {stderr}")]
  Install {
    specifier: String,
    code: Option<i32>,
    stderr: String,
  },

  /// An external program could not be started.
  #[error("failed to run '{program}': {source}")]
  Spawn {
    program: String,
    #[source]
    source: std::io::Error,
  },

  /// Cloning a git repository failed.
  #[error("failed to clone repository '{url}': {source}")]
  Clone {
    url: String,
    #[source]
    source: Box<dyn std::error::Error + Send + Sync>,
  },

  /// Downloading a file failed.
  #[error("download failed for {url}: {message}")]
  Download { url: String, message: String },

  /// Extracting an archive failed.
  #[error("failed to extract '{archive}': {message}")]
  Extract { archive: PathBuf, message: String },

  /// The archive's extension is not one we can extract.
  #[error("unsupported archive format: {0}")]
  UnsupportedArchive(PathBuf),

  /// Mounting the cloud drive failed.
  #[error("failed to mount drive at '{mount_point}': {message}")]
  Mount { mount_point: PathBuf, message: String },

  /// A filesystem operation failed.
  #[error("io error at '{path}': {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

impl CollaboratorError {
  pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
    CollaboratorError::Io {
      path: path.to_path_buf(),
      source,
    }
  }
}

/// Installs Python packages.
pub trait Installer {
  /// Install `specifier`, upgrading an already installed version if `upgrade`.
  fn install(&self, specifier: &str, upgrade: bool) -> Result<(), CollaboratorError>;
}

/// Version-control client.
pub trait Vcs {
  /// Clone `url` into `dest`, which must not exist yet.
  fn clone_from(&self, url: &str, dest: &Path) -> Result<(), CollaboratorError>;
}

/// Downloads remote files.
pub trait Fetcher {
  fn download(&self, url: &str, dest: &Path) -> Result<(), CollaboratorError>;
}

/// Unpacks archives.
pub trait Extractor {
  /// Extract every entry of `archive` below `dest`, creating `dest` if needed.
  fn extract_all(&self, archive: &Path, dest: &Path) -> Result<(), CollaboratorError>;
}

/// Mounts cloud storage.
pub trait StorageMount {
  fn mount(&self, mount_point: &Path) -> Result<(), CollaboratorError>;
}

/// The full set of collaborators handed to a processor.
pub struct Collaborators {
  pub installer: Box<dyn Installer>,
  pub vcs: Box<dyn Vcs>,
  pub fetcher: Box<dyn Fetcher>,
  pub extractor: Box<dyn Extractor>,
  pub mount: Box<dyn StorageMount>,
}

impl Collaborators {
  /// The real installer, git client, downloader, extractor and mount.
  pub fn production(config: &ProcessorConfig) -> Result<Self, CollaboratorError> {
    Ok(Self {
      installer: Box::new(PipInstaller::new(&config.python)),
      vcs: Box::new(GitCloner),
      fetcher: Box::new(HttpFetcher::new()?),
      extractor: Box::new(ArchiveExtractor),
      mount: Box::new(CommandMount::new(config.mount_command.clone())),
    })
  }
}

//! The manifest processor.

use std::path::PathBuf;

use tracing::{debug, info};

use super::resolve::{resolve_compressed, resolve_drive_archive, resolve_git, resolve_raw_file, resolved_entries};
use super::types::{ApplySummary, ProcessError, ProcessorConfig, Step};
use crate::collab::{CollaboratorError, Collaborators};
use crate::manifest::{CompressedFileEntry, DriveArchiveEntry, GitEntry, Manifest};
use crate::util::fs::{ensure_absent, remove_file};

/// Applies manifests through injected collaborators.
pub struct Processor {
  config: ProcessorConfig,
  collab: Collaborators,
}

impl Processor {
  pub fn new(config: ProcessorConfig, collab: Collaborators) -> Self {
    Self { config, collab }
  }

  pub fn config(&self) -> &ProcessorConfig {
    &self.config
  }

  /// Apply every entry of `manifest` in processing order.
  ///
  /// Stops at the first invalid entry or collaborator failure. Nothing done
  /// before the failure is undone.
  pub fn apply(&self, manifest: &Manifest) -> Result<ApplySummary, ProcessError> {
    info!(entries = manifest.entry_count(), "applying manifest");

    let mut summary = ApplySummary::default();
    for (category, index, resolved) in resolved_entries(manifest, &self.config.mount_point) {
      debug!(%category, index, "processing entry");
      self.execute(&resolved?)?;
      summary.record(category);
    }

    info!(processed = summary.total(), "manifest applied");
    Ok(summary)
  }

  /// Clone or pip-install a git dependency.
  pub fn handle_git(&self, entry: &GitEntry) -> Result<(), ProcessError> {
    Ok(self.execute(&resolve_git(entry)?)?)
  }

  /// Install a package with upgrade.
  pub fn handle_pip(&self, specifier: &str) -> Result<(), ProcessError> {
    Ok(self.execute(&Step::Pip {
      specifier: specifier.to_string(),
    })?)
  }

  /// Download and extract an archive from a plain URL.
  pub fn handle_compressed_file(&self, entry: &CompressedFileEntry) -> Result<(), ProcessError> {
    Ok(self.execute(&resolve_compressed(entry)?)?)
  }

  /// Download and extract an archive from Google Drive.
  pub fn handle_drive_archive(&self, entry: &DriveArchiveEntry) -> Result<(), ProcessError> {
    Ok(self.execute(&resolve_drive_archive(entry)?)?)
  }

  /// Download a file without further processing.
  pub fn handle_raw_file(&self, url: &str) -> Result<(), ProcessError> {
    Ok(self.execute(&resolve_raw_file(url)?)?)
  }

  /// Mount the cloud drive at the configured mount point.
  pub fn mount_drive(&self) -> Result<(), ProcessError> {
    Ok(self.execute(&Step::MountDrive {
      mount_point: self.config.mount_point.clone(),
    })?)
  }

  fn execute(&self, step: &Step) -> Result<(), CollaboratorError> {
    match step {
      Step::InstallGit { specifier } => {
        info!(specifier, "installing git dependency");
        self.collab.installer.install(specifier, false)
      }
      Step::CloneGit { url, folder } => {
        let dest = self.target(folder);
        ensure_absent(&dest)?;
        self.collab.vcs.clone_from(url, &dest)
      }
      Step::Pip { specifier } => {
        info!(specifier, "installing package");
        self.collab.installer.install(specifier, true)
      }
      Step::ExtractArchive { url, archive, folder } => {
        let archive = self.target(archive);
        info!(url, archive = %archive.display(), "downloading archive");
        self.collab.fetcher.download(url, &archive)?;

        let dest = self.target(folder);
        ensure_absent(&dest)?;
        self.collab.extractor.extract_all(&archive, &dest)?;
        remove_file(&archive)
      }
      Step::ExtractDriveArchive { url, archive, folder } => {
        let archive = self.target(archive);
        debug!(url, archive = %archive.display(), "downloading drive archive");
        self.collab.fetcher.download(url, &archive)?;

        let dest = self.target(folder);
        self.collab.extractor.extract_all(&archive, &dest)?;
        remove_file(&archive)
      }
      Step::DownloadFile { url, file } => {
        let file = self.target(file);
        info!(url, file = %file.display(), "downloading file");
        self.collab.fetcher.download(url, &file)
      }
      Step::MountDrive { mount_point } => {
        info!(mount_point = %mount_point.display(), "mounting drive");
        self.collab.mount.mount(mount_point)
      }
    }
  }

  fn target(&self, name: &str) -> PathBuf {
    self.config.work_dir.join(name)
  }
}

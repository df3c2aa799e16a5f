//! Turning manifest entries into concrete steps.
//!
//! Resolution validates required fields and derives default names. It has
//! no side effects apart from the warning for drive entries that set both
//! `url` and `file_id`.

use std::path::Path;

use tracing::warn;

use super::types::{Category, Step, ValidationError};
use crate::consts::DRIVE_DOWNLOAD_URL;
use crate::manifest::{CompressedFileEntry, DriveArchiveEntry, GitEntry, Manifest, present};
use crate::util::name::{file_name_from_url, last_segment, resolves_to_ancestor, stem};

/// Resolve a git entry to an install or a fresh clone.
pub fn resolve_git(entry: &GitEntry) -> Result<Step, ValidationError> {
  let url = present(&entry.url).ok_or(ValidationError::MissingGitUrl)?;

  if entry.install {
    return Ok(Step::InstallGit {
      specifier: format!("git+{url}"),
    });
  }

  let folder = match present(&entry.folder) {
    Some(folder) => explicit_folder(folder)?,
    None => derived(last_segment(url), url)?,
  };

  Ok(Step::CloneGit {
    url: url.to_string(),
    folder: folder.to_string(),
  })
}

/// Resolve an archive downloaded from a plain URL.
pub fn resolve_compressed(entry: &CompressedFileEntry) -> Result<Step, ValidationError> {
  let url = present(&entry.url).ok_or(ValidationError::MissingArchiveUrl)?;
  let archive = derived(file_name_from_url(url), url)?;

  let folder = match present(&entry.folder) {
    Some(folder) => explicit_folder(folder)?,
    None => derived(stem(archive), url)?,
  };

  Ok(Step::ExtractArchive {
    url: url.to_string(),
    archive: archive.to_string(),
    folder: folder.to_string(),
  })
}

/// Resolve an archive downloaded from Google Drive.
///
/// Both checks run before anything is downloaded. When `url` and `file_id`
/// are both set, `file_id` is used and a warning is logged.
pub fn resolve_drive_archive(entry: &DriveArchiveEntry) -> Result<Step, ValidationError> {
  let url = present(&entry.url);
  let file_id = present(&entry.file_id);

  if url.is_none() && file_id.is_none() {
    return Err(ValidationError::MissingDriveSource);
  }
  let fname = present(&entry.fname).ok_or(ValidationError::MissingDriveFileName)?;
  let fname = derived(fname, fname)?;

  let folder = match present(&entry.folder) {
    Some(folder) => explicit_folder(folder)?,
    None => derived(stem(fname), fname)?,
  };

  let url = match (file_id, url) {
    (Some(file_id), Some(_)) => {
      warn!(file_id, fname, "both url and file_id are set, using file_id");
      drive_download_url(file_id)
    }
    (Some(file_id), None) => drive_download_url(file_id),
    (None, Some(url)) => url.to_string(),
    (None, None) => return Err(ValidationError::MissingDriveSource),
  };

  Ok(Step::ExtractDriveArchive {
    url,
    archive: fname.to_string(),
    folder: folder.to_string(),
  })
}

/// Resolve a raw file download.
pub fn resolve_raw_file(url: &str) -> Result<Step, ValidationError> {
  let file = derived(file_name_from_url(url), url)?;
  Ok(Step::DownloadFile {
    url: url.to_string(),
    file: file.to_string(),
  })
}

/// The canonical download URL for a Drive file id.
pub fn drive_download_url(file_id: &str) -> String {
  format!("{DRIVE_DOWNLOAD_URL}{file_id}")
}

/// A name derived from `source` must point below the work directory.
fn derived<'a>(name: &'a str, source: &str) -> Result<&'a str, ValidationError> {
  if resolves_to_ancestor(name) {
    Err(ValidationError::EmptyTarget(source.to_string()))
  } else {
    Ok(name)
  }
}

fn explicit_folder(folder: &str) -> Result<&str, ValidationError> {
  if resolves_to_ancestor(folder) {
    Err(ValidationError::UnsafeFolder(folder.to_string()))
  } else {
    Ok(folder)
  }
}

/// Every entry of `manifest` in processing order, resolved lazily.
///
/// Entries are only resolved when the iterator reaches them, so a consumer
/// that stops at the first error never validates later entries.
pub(crate) fn resolved_entries<'a>(
  manifest: &'a Manifest,
  mount_point: &'a Path,
) -> impl Iterator<Item = (Category, usize, Result<Step, ValidationError>)> + 'a {
  let git = manifest
    .git
    .iter()
    .enumerate()
    .map(|(i, entry)| (Category::Git, i, resolve_git(entry)));
  let pip = manifest.pip.iter().enumerate().map(|(i, specifier)| {
    (
      Category::Pip,
      i,
      Ok(Step::Pip {
        specifier: specifier.clone(),
      }),
    )
  });
  let compressed = manifest
    .compressed_data
    .iter()
    .enumerate()
    .map(|(i, entry)| (Category::CompressedData, i, resolve_compressed(entry)));
  let drive = manifest
    .gdrive_compressed
    .iter()
    .enumerate()
    .map(|(i, entry)| (Category::GdriveCompressed, i, resolve_drive_archive(entry)));
  let raw = manifest
    .otherdata
    .iter()
    .enumerate()
    .map(|(i, url)| (Category::Otherdata, i, resolve_raw_file(url)));
  let mount = manifest.gdrive.then(|| {
    (
      Category::Gdrive,
      0,
      Ok(Step::MountDrive {
        mount_point: mount_point.to_path_buf(),
      }),
    )
  });

  git.chain(pip).chain(compressed).chain(drive).chain(raw).chain(mount)
}

//! Archive extraction.
//!
//! Supports:
//! - `.zip`
//! - `.tar`
//! - `.tar.gz` / `.tgz`
//! - `.tar.bz2` / `.tbz` / `.tbz2`
//!
//! Entries are extracted as they are laid out in the archive. Entries whose
//! paths would escape the destination are refused.

use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::Path;

use bzip2::read::BzDecoder;
use flate2::read::GzDecoder;
use tar::Archive;
use tracing::{debug, info};

use super::{CollaboratorError, Extractor};

/// Archive formats recognised by file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
  Zip,
  Tar,
  TarGz,
  TarBz2,
}

impl ArchiveKind {
  pub fn from_path(path: &Path) -> Option<Self> {
    let name = path.file_name()?.to_str()?.to_ascii_lowercase();
    if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
      Some(ArchiveKind::TarGz)
    } else if name.ends_with(".tar.bz2") || name.ends_with(".tbz") || name.ends_with(".tbz2") {
      Some(ArchiveKind::TarBz2)
    } else if name.ends_with(".tar") {
      Some(ArchiveKind::Tar)
    } else if name.ends_with(".zip") {
      Some(ArchiveKind::Zip)
    } else {
      None
    }
  }
}

/// Extracts zip and tar archives into a folder.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArchiveExtractor;

impl Extractor for ArchiveExtractor {
  fn extract_all(&self, archive: &Path, dest: &Path) -> Result<(), CollaboratorError> {
    let kind = ArchiveKind::from_path(archive).ok_or_else(|| CollaboratorError::UnsupportedArchive(archive.to_path_buf()))?;

    fs::create_dir_all(dest).map_err(|e| CollaboratorError::io(dest, e))?;
    let file = File::open(archive).map_err(|e| CollaboratorError::io(archive, e))?;
    let reader = BufReader::new(file);

    debug!(archive = %archive.display(), ?kind, "extracting");
    match kind {
      ArchiveKind::TarGz => unpack_tar(archive, GzDecoder::new(reader), dest)?,
      ArchiveKind::TarBz2 => unpack_tar(archive, BzDecoder::new(reader), dest)?,
      ArchiveKind::Tar => unpack_tar(archive, reader, dest)?,
      ArchiveKind::Zip => unpack_zip(archive, reader, dest)?,
    }

    info!(archive = %archive.display(), dest = %dest.display(), "extracted archive");
    Ok(())
  }
}

fn unpack_tar<R: Read>(archive_path: &Path, reader: R, dest: &Path) -> Result<(), CollaboratorError> {
  let extract_error = |message: String| CollaboratorError::Extract {
    archive: archive_path.to_path_buf(),
    message,
  };

  let mut archive = Archive::new(reader);
  let entries = archive.entries().map_err(|e| extract_error(e.to_string()))?;

  for entry in entries {
    let mut entry = entry.map_err(|e| extract_error(e.to_string()))?;
    let unpacked = entry.unpack_in(dest).map_err(|e| extract_error(e.to_string()))?;

    if !unpacked {
      let path = entry.path().map(|p| p.display().to_string()).unwrap_or_default();
      return Err(extract_error(format!("refusing entry outside destination: {path}")));
    }
  }

  Ok(())
}

fn unpack_zip<R: Read + std::io::Seek>(archive_path: &Path, reader: R, dest: &Path) -> Result<(), CollaboratorError> {
  let extract_error = |message: String| CollaboratorError::Extract {
    archive: archive_path.to_path_buf(),
    message,
  };

  let mut archive = zip::ZipArchive::new(reader).map_err(|e| extract_error(format!("failed to open zip: {e}")))?;

  for i in 0..archive.len() {
    let mut file = archive
      .by_index(i)
      .map_err(|e| extract_error(format!("failed to read zip entry: {e}")))?;

    let path = file
      .enclosed_name()
      .ok_or_else(|| extract_error(format!("refusing entry outside destination: {}", file.name())))?;
    let dest_path = dest.join(path);

    if file.is_dir() {
      fs::create_dir_all(&dest_path).map_err(|e| CollaboratorError::io(&dest_path, e))?;
      continue;
    }

    if let Some(parent) = dest_path.parent() {
      fs::create_dir_all(parent).map_err(|e| CollaboratorError::io(parent, e))?;
    }

    let mut outfile = File::create(&dest_path).map_err(|e| CollaboratorError::io(&dest_path, e))?;
    std::io::copy(&mut file, &mut outfile).map_err(|e| extract_error(e.to_string()))?;

    #[cfg(unix)]
    {
      use std::os::unix::fs::PermissionsExt;
      if let Some(mode) = file.unix_mode() {
        fs::set_permissions(&dest_path, fs::Permissions::from_mode(mode))
          .map_err(|e| CollaboratorError::io(&dest_path, e))?;
      }
    }
  }

  Ok(())
}

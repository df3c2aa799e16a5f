//! Reading manifests from disk.
//!
//! Files ending in `.yaml` or `.yml` are decoded as YAML, everything else as
//! JSON. The top level must be a mapping.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use super::Manifest;

/// Errors that can occur while reading or decoding a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
  /// The manifest file could not be read.
  #[error("failed to read manifest '{path}': {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// The document is not valid JSON or does not match the schema.
  #[error("invalid JSON manifest: {0}")]
  Json(#[from] serde_json::Error),

  /// The document is not valid YAML or does not match the schema.
  #[error("invalid YAML manifest: {0}")]
  Yaml(#[from] serde_yaml::Error),

  /// The top-level value is not a key/value mapping.
  #[error("manifest must be a mapping at the top level")]
  NotAMapping,
}

/// Read and decode the manifest at `path`.
pub fn parse(path: &Path) -> Result<Manifest, ManifestError> {
  let content = fs::read_to_string(path).map_err(|source| ManifestError::Read {
    path: path.to_path_buf(),
    source,
  })?;

  let manifest = if is_yaml(path) {
    from_yaml_str(&content)?
  } else {
    from_json_str(&content)?
  };

  debug!(path = %path.display(), entries = manifest.entry_count(), "parsed manifest");
  Ok(manifest)
}

/// Decode a JSON manifest document.
pub fn from_json_str(content: &str) -> Result<Manifest, ManifestError> {
  let value: serde_json::Value = serde_json::from_str(content)?;
  if !value.is_object() {
    return Err(ManifestError::NotAMapping);
  }
  Ok(serde_json::from_value(value)?)
}

/// Decode a YAML manifest document.
pub fn from_yaml_str(content: &str) -> Result<Manifest, ManifestError> {
  let value: serde_yaml::Value = serde_yaml::from_str(content)?;
  if !value.is_mapping() {
    return Err(ManifestError::NotAMapping);
  }
  Ok(serde_yaml::from_value(value)?)
}

fn is_yaml(path: &Path) -> bool {
  path
    .extension()
    .and_then(|ext| ext.to_str())
    .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
}

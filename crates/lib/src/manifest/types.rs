//! Manifest types for depstrap.
//!
//! The manifest is the declarative description of everything an experiment
//! environment needs before its workload starts.
//!
//! # Structure
//!
//! ```json
//! {
//!   "git": [{ "url": "https://github.com/org/repo.git", "folder": "repo" }],
//!   "pip": ["numpy", "torch==2.3.0"],
//!   "compressed_data": [{ "url": "https://example.com/data.zip" }],
//!   "gdrive_compressed": [{ "file_id": "1AbC", "fname": "weights.zip" }],
//!   "otherdata": ["https://example.com/labels.csv"],
//!   "gdrive": true
//! }
//! ```
//!
//! Every category is optional and may be given as a single value instead of
//! a one-element list. Required entry fields are kept optional here so that a
//! missing field surfaces as a validation error when the entry is reached,
//! in manifest order, rather than failing the whole parse.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// The parsed dependency manifest.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct Manifest {
  /// Git repositories to clone or pip-install.
  #[serde(default, deserialize_with = "one_or_many")]
  pub git: Vec<GitEntry>,
  /// Pip package specifiers, installed with upgrade.
  #[serde(default, deserialize_with = "one_or_many")]
  pub pip: Vec<String>,
  /// Archives downloaded from plain URLs and extracted.
  #[serde(default, deserialize_with = "one_or_many")]
  pub compressed_data: Vec<CompressedFileEntry>,
  /// Archives downloaded from Google Drive and extracted.
  #[serde(default, deserialize_with = "one_or_many")]
  pub gdrive_compressed: Vec<DriveArchiveEntry>,
  /// Raw files downloaded as-is.
  #[serde(default, deserialize_with = "one_or_many")]
  pub otherdata: Vec<String>,
  /// Whether to mount the cloud drive at the end of the pass.
  #[serde(default, deserialize_with = "truthy")]
  pub gdrive: bool,
}

impl Manifest {
  /// Number of entries across all categories, counting the drive mount.
  pub fn entry_count(&self) -> usize {
    self.git.len()
      + self.pip.len()
      + self.compressed_data.len()
      + self.gdrive_compressed.len()
      + self.otherdata.len()
      + usize::from(self.gdrive)
  }

  pub fn is_empty(&self) -> bool {
    self.entry_count() == 0
  }
}

/// A git repository dependency.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct GitEntry {
  pub url: Option<String>,
  /// Install with pip (`git+<url>`) instead of cloning. `folder` is ignored.
  #[serde(default, deserialize_with = "truthy")]
  pub install: bool,
  /// Clone destination, defaults to the last segment of `url`.
  pub folder: Option<String>,
}

/// An archive fetched from a plain URL.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct CompressedFileEntry {
  pub url: Option<String>,
  /// Extraction folder, defaults to the downloaded file's stem.
  pub folder: Option<String>,
}

/// An archive fetched from Google Drive.
///
/// At least one of `url` and `file_id` must be set; `file_id` wins when
/// both are.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct DriveArchiveEntry {
  pub url: Option<String>,
  pub file_id: Option<String>,
  /// Name the archive is downloaded as.
  pub fname: Option<String>,
  /// Extraction folder, defaults to the stem of `fname`.
  pub folder: Option<String>,
}

/// Treat empty strings the same as absent fields.
pub(crate) fn present(value: &Option<String>) -> Option<&str> {
  value.as_deref().filter(|s| !s.is_empty())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
  Many(Vec<T>),
  One(T),
}

fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
  D: Deserializer<'de>,
  T: Deserialize<'de>,
{
  Ok(match Option::<OneOrMany<T>>::deserialize(deserializer)? {
    Some(OneOrMany::Many(items)) => items,
    Some(OneOrMany::One(item)) => vec![item],
    None => Vec::new(),
  })
}

fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
  D: Deserializer<'de>,
{
  Ok(is_truthy(&Value::deserialize(deserializer)?))
}

/// Truthiness of a flag value: `false`, `null`, zero and empty
/// strings/lists/maps are false, everything else is true.
pub fn is_truthy(value: &Value) -> bool {
  match value {
    Value::Null => false,
    Value::Bool(b) => *b,
    Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
    Value::String(s) => !s.is_empty(),
    Value::Array(items) => !items.is_empty(),
    Value::Object(map) => !map.is_empty(),
  }
}

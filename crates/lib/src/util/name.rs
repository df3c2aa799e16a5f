//! Derivation of local file and folder names from URLs and file names.

use std::path::{Component, Path};

/// The last `/`-delimited segment of `url`, taken verbatim.
///
/// Used for clone destinations, so `https://x/y/repo.git` yields `repo.git`.
pub fn last_segment(url: &str) -> &str {
  url.rsplit('/').next().unwrap_or(url)
}

/// Local file name for a download: the last path segment without any
/// query string or fragment.
pub fn file_name_from_url(url: &str) -> &str {
  last_segment(url.split(['?', '#']).next().unwrap_or(url))
}

/// Everything before the first `.` of a file name.
///
/// `data.tar.gz` yields `data`, a name without extension is returned as is.
pub fn stem(file_name: &str) -> &str {
  file_name.split('.').next().unwrap_or(file_name)
}

/// Whether joining `name` onto a directory lands on that directory or one of
/// its ancestors (`""`, `.`, `..`, `a/..`, `/`).
///
/// Such names can never be removed and recreated as a target.
pub fn resolves_to_ancestor(name: &str) -> bool {
  let mut depth = 0usize;
  for component in Path::new(name).components() {
    match component {
      Component::Normal(_) => depth += 1,
      Component::ParentDir => depth = depth.saturating_sub(1),
      Component::CurDir => {}
      Component::RootDir | Component::Prefix(_) => depth = 0,
    }
  }
  depth == 0
}

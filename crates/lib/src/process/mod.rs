//! Applying a manifest.
//!
//! Categories run in a fixed order: git, pip, compressed data, Google
//! Drive archives, raw files, then the drive mount. Entries run one at a
//! time in manifest order and the first error stops the pass.

mod apply;
mod plan;
mod resolve;
mod types;

pub use apply::Processor;
pub use plan::plan;
pub use resolve::{drive_download_url, resolve_compressed, resolve_drive_archive, resolve_git, resolve_raw_file};
pub use types::*;

//! depstrap-lib: manifest-driven environment bootstrapping.
//!
//! This crate materializes the dependencies an experiment needs before its
//! main workload starts:
//! - `manifest`: the declarative dependency document and its parsing
//! - `collab`: interfaces to the installer, git, downloader, extractor and
//!   storage mount, plus their production implementations
//! - `process`: the processor that applies a manifest in a fixed order

pub mod collab;
pub mod consts;
pub mod manifest;
pub mod process;
pub mod util;

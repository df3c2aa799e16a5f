//! Implementation of the `depstrap apply` command.
//!
//! Parses a manifest and applies it with the production collaborators:
//! git repositories, pip packages, compressed data, Google Drive archives,
//! raw files, then the drive mount.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::debug;

use depstrap_lib::collab::Collaborators;
use depstrap_lib::manifest;
use depstrap_lib::process::{ProcessorConfig, Processor};

use crate::output::{format_elapsed, print_info, print_stat, print_success};

/// Execute the apply command.
///
/// Stops at the first failing entry; whatever ran before it stays in place.
pub fn cmd_apply(path: &Path, config: ProcessorConfig) -> Result<()> {
  let manifest =
    manifest::parse(path).with_context(|| format!("Failed to load manifest: {}", path.display()))?;

  if manifest.is_empty() {
    print_info("Manifest declares no dependencies.");
    return Ok(());
  }

  debug!(work_dir = %config.work_dir.display(), python = %config.python, "using configuration");
  let collaborators = Collaborators::production(&config).context("Failed to initialize collaborators")?;
  let processor = Processor::new(config, collaborators);

  let started = Instant::now();
  let summary = processor.apply(&manifest).context("Apply failed")?;

  print_success(&format!("Environment ready in {}", format_elapsed(started.elapsed())));
  print_stat("Git repositories", &summary.git.to_string());
  print_stat("Pip packages", &summary.pip.to_string());
  print_stat("Archives", &summary.compressed_data.to_string());
  print_stat("Drive archives", &summary.gdrive_compressed.to_string());
  print_stat("Raw files", &summary.otherdata.to_string());
  if summary.drive_mounted {
    print_stat("Drive mounted at", &processor.config().mount_point.display().to_string());
  }

  Ok(())
}

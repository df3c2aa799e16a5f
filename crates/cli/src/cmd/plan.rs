//! Implementation of the `depstrap plan` command.
//!
//! Resolves every manifest entry to the step `apply` would perform, without
//! touching the filesystem. Invalid entries are listed and make the command
//! fail.

use std::path::Path;

use anyhow::{Context, Result, bail};
use owo_colors::{OwoColorize, Stream};

use depstrap_lib::manifest;
use depstrap_lib::process::{PlannedStep, ProcessorConfig, plan};

use crate::output::{print_info, print_json, symbols};

pub fn cmd_plan(path: &Path, config: &ProcessorConfig, json: bool) -> Result<()> {
  let manifest =
    manifest::parse(path).with_context(|| format!("Failed to load manifest: {}", path.display()))?;

  let steps = plan(&manifest, config);

  if json {
    print_json(&steps)?;
  } else {
    print_info(&format!("Plan for {}: {} step(s)", path.display(), steps.len()));
    for step in &steps {
      print_step(step);
    }
  }

  let invalid = steps.iter().filter(|s| !s.is_valid()).count();
  if invalid > 0 {
    bail!("{} invalid entr{} in manifest", invalid, if invalid == 1 { "y" } else { "ies" });
  }

  Ok(())
}

fn print_step(planned: &PlannedStep) {
  let label = format!("{}[{}]", planned.category, planned.index);
  match (&planned.step, &planned.error) {
    (Some(step), _) => println!(
      "  {} {} {}",
      symbols::ARROW.if_supports_color(Stream::Stdout, |s| s.cyan()),
      label.if_supports_color(Stream::Stdout, |s| s.dimmed()),
      step
    ),
    (None, error) => println!(
      "  {} {} {}",
      symbols::ERROR.if_supports_color(Stream::Stdout, |s| s.red()),
      label.if_supports_color(Stream::Stdout, |s| s.dimmed()),
      error.as_deref().unwrap_or("invalid entry")
    ),
  }
}

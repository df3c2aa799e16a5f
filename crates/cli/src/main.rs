use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use depstrap_lib::consts::{DEFAULT_MOUNT_POINT, DEFAULT_PYTHON};
use depstrap_lib::process::ProcessorConfig;

mod cmd;
mod output;

use cmd::{cmd_apply, cmd_plan};
use output::print_error;

/// depstrap - Bootstrap an experiment environment from a dependency manifest
#[derive(Parser)]
#[command(name = "depstrap")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Apply a dependency manifest
  Apply {
    /// Path to the manifest (JSON, or YAML by extension)
    #[arg(default_value = "deps.json")]
    manifest: PathBuf,

    #[command(flatten)]
    config: ConfigArgs,
  },

  /// Show what applying a manifest would do (dry-run)
  Plan {
    /// Path to the manifest (JSON, or YAML by extension)
    #[arg(default_value = "deps.json")]
    manifest: PathBuf,

    /// Print the plan as JSON
    #[arg(long)]
    json: bool,

    #[command(flatten)]
    config: ConfigArgs,
  },
}

#[derive(Args)]
struct ConfigArgs {
  /// Python interpreter whose pip installs packages
  #[arg(long, env = "DEPSTRAP_PYTHON", default_value = DEFAULT_PYTHON)]
  python: String,

  /// Where the cloud drive is mounted
  #[arg(long, env = "DEPSTRAP_MOUNT_POINT", default_value = DEFAULT_MOUNT_POINT)]
  mount_point: PathBuf,

  /// Command that mounts the drive; `{mount_point}` is substituted
  #[arg(long, env = "DEPSTRAP_MOUNT_COMMAND")]
  mount_command: Option<String>,

  /// Directory that clones, downloads and extracted folders go into
  #[arg(long, env = "DEPSTRAP_WORK_DIR")]
  work_dir: Option<PathBuf>,
}

impl ConfigArgs {
  fn into_config(self) -> Result<ProcessorConfig> {
    let mut config = ProcessorConfig {
      python: self.python,
      mount_point: self.mount_point,
      ..ProcessorConfig::default()
    };

    if let Some(command) = self.mount_command {
      config.mount_command = command.split_whitespace().map(str::to_string).collect();
    }

    if let Some(dir) = self.work_dir {
      config.work_dir =
        dunce::canonicalize(&dir).with_context(|| format!("Work directory not found: {}", dir.display()))?;
    }

    Ok(config)
  }
}

fn init_tracing(verbose: bool) {
  let default_level = if verbose { "debug" } else { "info" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_target(false)
    .without_time()
    .init();
}

fn main() -> ExitCode {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  let result = match cli.command {
    Commands::Apply { manifest, config } => config.into_config().and_then(|config| cmd_apply(&manifest, config)),
    Commands::Plan { manifest, json, config } => {
      config.into_config().and_then(|config| cmd_plan(&manifest, &config, json))
    }
  };

  match result {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      print_error(&format!("{:#}", e));
      ExitCode::FAILURE
    }
  }
}

//! Package installation through `python -m pip`.

use tracing::info;

use super::command::{run_command, stderr_text};
use super::{CollaboratorError, Installer};

/// Installs packages with the configured Python interpreter's pip.
#[derive(Debug, Clone)]
pub struct PipInstaller {
  python: String,
}

impl PipInstaller {
  pub fn new(python: &str) -> Self {
    Self {
      python: python.to_string(),
    }
  }
}

impl Installer for PipInstaller {
  fn install(&self, specifier: &str, upgrade: bool) -> Result<(), CollaboratorError> {
    let args = pip_args(specifier, upgrade);
    let output = run_command(&self.python, &args)?;

    if !output.status.success() {
      return Err(CollaboratorError::Install {
        specifier: specifier.to_string(),
        code: output.status.code(),
        stderr: stderr_text(&output),
      });
    }

    info!(specifier, "installed package");
    Ok(())
  }
}

/// Arguments passed to the interpreter to install `specifier`.
pub fn pip_args(specifier: &str, upgrade: bool) -> Vec<String> {
  let mut args = vec!["-m".to_string(), "pip".to_string(), "install".to_string()];
  if upgrade {
    args.push("-U".to_string());
  }
  args.push(specifier.to_string());
  args
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn pip_args_with_upgrade() {
    assert_eq!(pip_args("numpy", true), vec!["-m", "pip", "install", "-U", "numpy"]);
  }

  #[test]
  fn pip_args_without_upgrade() {
    assert_eq!(
      pip_args("git+https://github.com/org/repo.git", false),
      vec!["-m", "pip", "install", "git+https://github.com/org/repo.git"]
    );
  }

  #[test]
  #[cfg(unix)]
  fn failing_interpreter_is_install_error() {
    let installer = PipInstaller::new("false");
    let result = installer.install("numpy", true);
    assert!(matches!(
      result,
      Err(CollaboratorError::Install { ref specifier, code: Some(1), .. }) if specifier == "numpy"
    ));
  }

  #[test]
  #[cfg(unix)]
  fn succeeding_interpreter_is_ok() {
    let installer = PipInstaller::new("true");
    installer.install("numpy", true).unwrap();
  }
}

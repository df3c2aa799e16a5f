//! Dry-run planning.

use super::resolve::resolved_entries;
use super::types::{PlannedStep, ProcessorConfig};
use crate::manifest::Manifest;

/// Resolve every entry of `manifest` without performing anything.
///
/// Invalid entries are reported in place instead of stopping the plan.
pub fn plan(manifest: &Manifest, config: &ProcessorConfig) -> Vec<PlannedStep> {
  resolved_entries(manifest, &config.mount_point)
    .map(|(category, index, resolved)| match resolved {
      Ok(step) => PlannedStep {
        category,
        index,
        step: Some(step),
        error: None,
      },
      Err(e) => PlannedStep {
        category,
        index,
        step: None,
        error: Some(e.to_string()),
      },
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::manifest::from_json_str;
  use crate::process::{Category, Step};

  #[test]
  fn plan_reports_invalid_entries_and_continues() {
    let manifest = from_json_str(
      r#"{
        "git": [{"folder": "no-url"}, {"url": "https://x/y/repo.git", "install": true}],
        "gdrive_compressed": [{"fname": "data.zip"}]
      }"#,
    )
    .unwrap();

    let steps = plan(&manifest, &ProcessorConfig::default());

    assert_eq!(steps.len(), 3);
    assert!(!steps[0].is_valid());
    assert_eq!(
      steps[1].step,
      Some(Step::InstallGit {
        specifier: "git+https://x/y/repo.git".to_string()
      })
    );
    assert_eq!(steps[2].category, Category::GdriveCompressed);
    assert!(steps[2].error.as_deref().unwrap().contains("file_id"));
  }

  #[test]
  fn plan_uses_configured_mount_point() {
    let manifest = from_json_str(r#"{"gdrive": true}"#).unwrap();
    let config = ProcessorConfig {
      mount_point: "/mnt/gdrive".into(),
      ..ProcessorConfig::default()
    };

    let steps = plan(&manifest, &config);
    assert_eq!(
      steps[0].step,
      Some(Step::MountDrive {
        mount_point: "/mnt/gdrive".into()
      })
    );
  }

  #[test]
  fn empty_manifest_plans_nothing() {
    assert!(plan(&Manifest::default(), &ProcessorConfig::default()).is_empty());
  }
}

use std::{collections::BTreeMap, path::Path};

use serde::Deserialize;

fn true_by_default() -> bool {
  true
}

/// User-facing bundling configuration, usually read from `edgepack.config.json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BundleConfig {
  /// Modules resolved by the host at runtime, never inlined.
  #[serde(default)]
  pub external: Vec<String>,
  #[serde(default)]
  pub stub_empty: Vec<String>,
  #[serde(default)]
  pub stub_throw: Vec<String>,
  #[serde(default)]
  pub stub_fetch: Vec<String>,
  #[serde(default)]
  pub stub_env: Vec<String>,
  /// Specifier to replacement module. Applied after every other source.
  #[serde(default)]
  pub custom_aliases: BTreeMap<String, String>,
  #[serde(default = "true_by_default")]
  pub include_defaults: bool,
  /// Enables the `workerd`/`worker` package export conditions.
  #[serde(default = "true_by_default")]
  pub use_workerd_condition: bool,
}

impl Default for BundleConfig {
  fn default() -> Self {
    Self {
      external: Default::default(),
      stub_empty: Default::default(),
      stub_throw: Default::default(),
      stub_fetch: Default::default(),
      stub_env: Default::default(),
      custom_aliases: Default::default(),
      include_defaults: true,
      use_workerd_condition: true,
    }
  }
}

impl BundleConfig {
  pub const FILE_NAME: &'static str = "edgepack.config.json";

  pub fn parse(path: &Path, content: &str) -> edgepack_error::Result<Self> {
    serde_json::from_str(content).map_err(|e| edgepack_error::Error::invalid_config(path, e))
  }

  /// Reads the config at `path`. A missing file means "all defaults".
  pub fn from_path(path: &Path) -> edgepack_error::Result<Self> {
    match std::fs::read_to_string(path) {
      Ok(content) => Self::parse(path, &content),
      Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
        tracing::debug!("no config at {}, using defaults", path.display());
        Ok(Self::default())
      }
      Err(err) => Err(edgepack_error::Error::io_error(err).context(format!("Read config: {}", path.display()))),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_object_means_defaults() {
    let config = BundleConfig::parse(Path::new("c.json"), "{}").unwrap();
    assert_eq!(config, BundleConfig::default());
    assert!(config.include_defaults);
    assert!(config.use_workerd_condition);
  }

  #[test]
  fn camel_case_fields() {
    let config = BundleConfig::parse(
      Path::new("c.json"),
      r#"{"stubEmpty": ["heavy-pkg"], "customAliases": {"a": "./b.js"}, "includeDefaults": false}"#,
    )
    .unwrap();
    assert_eq!(config.stub_empty, vec!["heavy-pkg".to_string()]);
    assert_eq!(config.custom_aliases.get("a").map(String::as_str), Some("./b.js"));
    assert!(!config.include_defaults);
  }

  #[test]
  fn unknown_fields_are_rejected() {
    let err = BundleConfig::parse(Path::new("c.json"), r#"{"stubEmtpy": []}"#).unwrap_err();
    assert_eq!(err.kind.code(), "INVALID_CONFIG");
  }

  #[test]
  fn missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = BundleConfig::from_path(&dir.path().join(BundleConfig::FILE_NAME)).unwrap();
    assert_eq!(config, BundleConfig::default());
  }
}

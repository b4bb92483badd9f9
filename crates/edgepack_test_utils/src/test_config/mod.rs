use std::path::Path;

use serde::Deserialize;

mod input_options;
pub use input_options::*;
mod output_options;
pub use output_options::*;

/// `test.config.json` of a fixture directory. Every field is optional.
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TestConfig {
  #[serde(default)]
  pub input: InputOptions,
  #[serde(default)]
  pub output: OutputOptions,
  #[serde(default)]
  pub expected: Expected,
}

/// What the rendered output must (not) contain, or the error code the build must fail with.
#[derive(Deserialize, Default, Debug)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Expected {
  #[serde(default)]
  pub contains: Vec<String>,
  #[serde(default)]
  pub not_contains: Vec<String>,
  #[serde(default)]
  pub error: Option<String>,
  #[serde(default)]
  pub warnings: Option<usize>,
}

impl TestConfig {
  pub fn from_config_path(filepath: &Path) -> Self {
    let content = std::fs::read_to_string(filepath).unwrap_or_else(|_| "{}".to_string());
    serde_json::from_str(&content)
      .unwrap_or_else(|err| panic!("Invalid test config {}: {err}", filepath.display()))
  }
}

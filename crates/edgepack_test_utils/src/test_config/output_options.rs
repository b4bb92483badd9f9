use serde::Deserialize;

fn esm_by_default() -> String {
  "esm".to_string()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OutputOptions {
  #[serde(default = "esm_by_default")]
  pub format: String,
}

impl Default for OutputOptions {
  fn default() -> Self {
    Self {
      format: esm_by_default(),
    }
  }
}

use std::collections::HashMap;

use serde::Deserialize;

fn input_default() -> Vec<InputItem> {
  vec![InputItem {
    name: "main".to_string(),
    import: "./main.js".to_string(),
  }]
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct InputOptions {
  #[serde(default = "input_default")]
  pub input: Vec<InputItem>,

  #[serde(default)]
  pub external: Vec<String>,

  #[serde(default)]
  pub alias: HashMap<String, String>,

  #[serde(default)]
  pub conditions: Option<Vec<String>>,
}

#[derive(Deserialize, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct InputItem {
  pub name: String,
  pub import: String,
}

impl Default for InputOptions {
  fn default() -> Self {
    Self {
      input: input_default(),
      external: Default::default(),
      alias: Default::default(),
      conditions: None,
    }
  }
}

use std::str::FromStr;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum InternalModuleFormat {
  /// `export default` plus a `createRequire` prelude.
  Esm,
  Cjs,
}

impl InternalModuleFormat {
  pub fn is_es(self) -> bool {
    self == InternalModuleFormat::Esm
  }
}

impl FromStr for InternalModuleFormat {
  type Err = String;

  fn from_str(value: &str) -> Result<Self, Self::Err> {
    match value {
      "esm" => Ok(InternalModuleFormat::Esm),
      "cjs" => Ok(InternalModuleFormat::Cjs),
      _ => Err(format!("Invalid module format: {value}")),
    }
  }
}

/// Artifact file name with a `[name]` placeholder for the entry name.
#[derive(Debug, Clone)]
pub struct FileNameTemplate(String);

impl FileNameTemplate {
  pub fn render(&self, name: &str) -> String {
    self.0.replace("[name]", name)
  }
}

impl From<&str> for FileNameTemplate {
  fn from(template: &str) -> Self {
    Self(template.to_string())
  }
}

#[derive(Debug, Clone)]
pub struct OutputOptions {
  pub entry_file_names: FileNameTemplate,
  pub format: InternalModuleFormat,
}

impl OutputOptions {
  /// The file an entry named `name` is written to.
  pub fn artifact_file_name(&self, name: &str) -> String {
    self.entry_file_names.render(name)
  }
}

impl Default for OutputOptions {
  fn default() -> Self {
    Self {
      entry_file_names: FileNameTemplate::from("[name].mjs"),
      format: InternalModuleFormat::Esm,
    }
  }
}

use std::{
  path::{Path, PathBuf},
  str::FromStr,
  sync::{Arc, Mutex},
};

use edgepack_core::{BuildOutput, BundlerCore, InternalModuleFormat};
use edgepack_error::Error as BuildError;

use crate::test_config::TestConfig;

pub struct Tester {
  pub config: TestConfig,
  pub warnings: Arc<Mutex<Vec<BuildError>>>,
}

impl Tester {
  pub fn from_config_path(filepath: &Path) -> Self {
    let test_config = TestConfig::from_config_path(filepath);
    Self {
      config: test_config,
      warnings: Default::default(),
    }
  }

  pub fn input_options(&self, cwd: PathBuf) -> edgepack_core::InputOptions {
    let warning_collector = self.warnings.clone();
    let mut resolve = edgepack_core::ResolverOptions::default();
    if let Some(conditions) = &self.config.input.conditions {
      resolve.conditions = conditions.clone();
    }
    edgepack_core::InputOptions {
      input: self
        .config
        .input
        .input
        .iter()
        .map(|item| edgepack_core::InputItem {
          name: item.name.clone(),
          import: item.import.clone(),
        })
        .collect(),
      cwd,
      is_external: edgepack_core::external_from_list(self.config.input.external.clone()),
      alias: self
        .config
        .input
        .alias
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect(),
      resolve,
      on_warn: Arc::new(move |err| {
        warning_collector.lock().unwrap().push(err);
      }),
    }
  }

  pub fn output_options(&self) -> edgepack_core::OutputOptions {
    edgepack_core::OutputOptions {
      format: InternalModuleFormat::from_str(&self.config.output.format)
        .unwrap_or(InternalModuleFormat::Esm),
      ..Default::default()
    }
  }

  pub async fn build(&self, cwd: PathBuf) -> Result<BuildOutput, BuildError> {
    let mut bundler = BundlerCore::new(self.input_options(cwd));
    bundler.build(self.output_options()).await
  }

  pub fn warnings_len(&self) -> usize {
    self.warnings.lock().unwrap().len()
  }
}

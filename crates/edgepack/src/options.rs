use std::path::PathBuf;

use derivative::Derivative;
use edgepack_core::{default_warning_handler, WarningHandler};
use edgepack_patch::PatchLimits;
use edgepack_plugin_content_updater::RewriteRule;

/// What patches artifacts between the in-process and the skip limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LargePatchStrategy {
  /// `sed`, as a subprocess.
  #[default]
  ExternalTool,
  /// Line-buffered rewrite through a temporary file, for hosts without `sed`.
  Streaming,
}

#[derive(Derivative)]
#[derivative(Debug)]
pub struct PipelineOptions {
  /// Directory holding the framework build (`.next/`).
  pub app_dir: PathBuf,
  /// Root of the deployable output.
  pub output_dir: PathBuf,
  /// Defaults to `<app_dir>/edgepack.config.json`.
  pub config_path: Option<PathBuf>,
  /// Run after the built-in rules, in order.
  pub rules: Vec<Box<dyn RewriteRule>>,
  pub patch_limits: PatchLimits,
  pub large_patch: LargePatchStrategy,
  #[derivative(Debug = "ignore")]
  pub on_warn: WarningHandler,
}

impl PipelineOptions {
  pub fn new(app_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
    Self {
      app_dir: app_dir.into(),
      output_dir: output_dir.into(),
      config_path: None,
      rules: vec![],
      patch_limits: PatchLimits::default(),
      large_patch: LargePatchStrategy::default(),
      on_warn: default_warning_handler(),
    }
  }

  pub fn rule(mut self, rule: impl RewriteRule + 'static) -> Self {
    self.rules.push(Box::new(rule));
    self
  }
}

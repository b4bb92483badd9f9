use std::path::PathBuf;

/// A structural change a hook wants applied once the bundling pass is over.
///
/// Effects are recorded rather than applied so the module graph is never
/// mutated while it is being traversed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum PluginEffect {
  /// Write an extra file next to the bundled artifact.
  EmitFile { file_name: String, content: String },
  /// Overwrite a file of the input tree that is read at runtime instead of bundled.
  ReplaceFile { path: PathBuf, content: String },
}

/// Per-call context handed to every hook.
#[derive(Debug, Default)]
pub struct Context {
  effects: Vec<PluginEffect>,
}

impl Context {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn emit(&mut self, effect: PluginEffect) {
    self.effects.push(effect);
  }

  pub fn emit_file(&mut self, file_name: impl Into<String>, content: impl Into<String>) {
    self.emit(PluginEffect::EmitFile {
      file_name: file_name.into(),
      content: content.into(),
    });
  }

  pub fn take_effects(&mut self) -> Vec<PluginEffect> {
    std::mem::take(&mut self.effects)
  }
}

use std::fmt::Display;
use std::path::Path;

mod loader;
pub use loader::*;

pub use edgepack_error::CWD;

/// Identity of a module in the graph.
///
/// For bundled modules `value` is the absolute path on disk. For external
/// modules it is the specifier left for the host runtime to resolve.
#[derive(Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Clone)]
pub struct ModuleId {
  value: String,
  is_external: bool,
}

impl Display for ModuleId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.value)
  }
}

impl ModuleId {
  pub fn new(value: impl Into<String>, is_external: bool) -> Self {
    Self {
      value: value.into(),
      is_external,
    }
  }

  pub fn is_external(&self) -> bool {
    self.is_external
  }

  pub fn id(&self) -> &str {
    &self.value
  }

  pub fn as_path(&self) -> &Path {
    Path::new(&self.value)
  }

  /// A stable, forward-slashed key for this module relative to `cwd`.
  ///
  /// Used as the registry key in rendered output and in the metafile, so the
  /// artifact doesn't leak absolute paths of the build machine.
  pub fn stable_key(&self, cwd: &Path) -> String {
    use sugar_path::SugarPath;
    if self.is_external {
      return self.value.clone();
    }
    let relative = self.as_path().relative(cwd);
    relative.to_string_lossy().replace('\\', "/")
  }
}

impl AsRef<str> for ModuleId {
  fn as_ref(&self) -> &str {
    &self.value
  }
}

#[cfg(test)]
mod tests {
  use std::path::PathBuf;

  use super::*;

  #[test]
  fn stable_key_is_relative_for_bundled_modules() {
    let cwd = PathBuf::from("/app");
    let id = ModuleId::new("/app/node_modules/pkg/index.js", false);
    assert_eq!(id.stable_key(&cwd), "node_modules/pkg/index.js");
  }

  #[test]
  fn stable_key_keeps_external_specifier() {
    let cwd = PathBuf::from("/app");
    let id = ModuleId::new("node:buffer", true);
    assert_eq!(id.stable_key(&cwd), "node:buffer");
  }
}

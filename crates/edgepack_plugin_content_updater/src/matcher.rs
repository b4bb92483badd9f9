use edgepack_common::ModuleId;

/// Decides whether a rule looks at a file at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileMatcher {
  Any,
  /// Forward-slashed path suffix, e.g. `next/dist/server/require-hook.js`.
  PathSuffix(String),
  /// The current content contains the text.
  Contains(String),
}

impl FileMatcher {
  pub fn path_suffix(suffix: impl Into<String>) -> Self {
    Self::PathSuffix(suffix.into())
  }

  pub fn contains(needle: impl Into<String>) -> Self {
    Self::Contains(needle.into())
  }

  pub fn matches(&self, id: &ModuleId, code: &str) -> bool {
    match self {
      FileMatcher::Any => true,
      FileMatcher::PathSuffix(suffix) => {
        let path = id.id().replace('\\', "/");
        path.ends_with(suffix.as_str())
      }
      FileMatcher::Contains(needle) => code.contains(needle.as_str()),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn path_suffix_uses_forward_slashes() {
    let id = ModuleId::new("C:\\app\\node_modules\\next\\dist\\server\\next-server.js", false);
    assert!(FileMatcher::path_suffix("next/dist/server/next-server.js").matches(&id, ""));
    assert!(!FileMatcher::path_suffix("next/dist/server/base-server.js").matches(&id, ""));
  }

  #[test]
  fn contains_checks_content() {
    let id = ModuleId::new("/app/a.js", false);
    assert!(FileMatcher::contains("process.env.TURBOPACK").matches(&id, "if (process.env.TURBOPACK) {}"));
    assert!(!FileMatcher::contains("process.env.TURBOPACK").matches(&id, "if (x) {}"));
  }
}

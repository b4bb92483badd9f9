use std::{
  fmt::Display,
  path::{Path, PathBuf},
};

use crate::ErrorKind;

#[derive(Debug)]
pub struct Error {
  contexts: Vec<String>,
  pub kind: ErrorKind,
}

impl PartialEq for Error {
  fn eq(&self, other: &Self) -> bool {
    self.kind.to_string().eq(&other.kind.to_string())
  }
}

impl Eq for Error {}

impl PartialOrd for Error {
  fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
    Some(self.cmp(other))
  }
}

impl Ord for Error {
  fn cmp(&self, other: &Self) -> std::cmp::Ordering {
    self.kind.to_string().cmp(&other.kind.to_string())
  }
}

impl Error {
  fn with_kind(kind: ErrorKind) -> Self {
    Self {
      contexts: vec![],
      kind,
    }
  }

  pub fn context(mut self, context: String) -> Self {
    self.contexts.push(context);
    self
  }

  pub fn contexts(&self) -> &[String] {
    &self.contexts
  }

  // --- Configuration

  pub fn missing_manifest(path: impl AsRef<Path>) -> Self {
    Self::with_kind(ErrorKind::MissingManifest {
      path: path.as_ref().to_path_buf(),
    })
  }

  pub fn invalid_manifest(path: impl AsRef<Path>, reason: impl Display) -> Self {
    Self::with_kind(ErrorKind::InvalidManifest {
      path: path.as_ref().to_path_buf(),
      reason: reason.to_string(),
    })
  }

  pub fn invalid_config(path: impl AsRef<Path>, reason: impl Display) -> Self {
    Self::with_kind(ErrorKind::InvalidConfig {
      path: path.as_ref().to_path_buf(),
      reason: reason.to_string(),
    })
  }

  pub fn invalid_alias_target(specifier: impl Into<String>, target: impl AsRef<Path>) -> Self {
    Self::with_kind(ErrorKind::InvalidAliasTarget {
      specifier: specifier.into(),
      target: target.as_ref().to_path_buf(),
    })
  }

  // --- Rewrite rules

  pub fn rule_application(
    rule: impl Into<String>,
    file: impl AsRef<Path>,
    reason: impl Display,
  ) -> Self {
    Self::with_kind(ErrorKind::RuleApplication {
      rule: rule.into(),
      file: file.as_ref().to_path_buf(),
      reason: reason.to_string(),
    })
  }

  // --- Post-bundle patching

  pub fn patch_tool_failed(tool: impl Into<String>, reason: impl Display) -> Self {
    Self::with_kind(ErrorKind::PatchToolFailed {
      tool: tool.into(),
      reason: reason.to_string(),
    })
  }

  // --- Bundling

  pub fn entry_cannot_be_external(unresolved_id: impl AsRef<Path>) -> Self {
    Self::with_kind(ErrorKind::ExternalEntry {
      id: unresolved_id.as_ref().to_path_buf(),
    })
  }

  pub fn unresolved_entry(unresolved_id: impl AsRef<Path>) -> Self {
    Self::with_kind(ErrorKind::UnresolvedEntry {
      unresolved_id: unresolved_id.as_ref().to_path_buf(),
    })
  }

  pub fn unresolved_import(specifier: impl Into<String>, importer: impl Into<PathBuf>) -> Self {
    Self::with_kind(ErrorKind::UnresolvedImport {
      specifier: specifier.into(),
      importer: importer.into(),
    })
  }

  pub fn io_error(e: std::io::Error) -> Self {
    Self::with_kind(ErrorKind::IoError(e))
  }

  pub fn panic(msg: String) -> Self {
    anyhow::format_err!(msg).into()
  }
}

impl std::convert::From<anyhow::Error> for Error {
  fn from(value: anyhow::Error) -> Self {
    Self::with_kind(ErrorKind::Panic { source: value })
  }
}

impl std::convert::From<std::io::Error> for Error {
  fn from(value: std::io::Error) -> Self {
    Self::io_error(value)
  }
}

impl std::error::Error for Error {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match &self.kind {
      ErrorKind::Panic { source, .. } => Some(source.as_ref()),
      ErrorKind::IoError(e) => Some(e),
      _ => None,
    }
  }
}

impl Display for Error {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    for ctx in self.contexts.iter().rev() {
      writeln!(f, "{}: {}", ansi_term::Color::Yellow.paint("context"), ctx)?;
    }

    self.kind.fmt(f)
  }
}

#[cfg(test)]
mod tests {
  use crate::ErrorCategory;

  use super::*;

  #[test]
  fn rule_error_names_rule_and_file() {
    let err = Error::rule_application("inline-next-config", "/app/.next/server.js", "pattern not found");
    assert_eq!(err.kind.code(), "RULE_APPLICATION");
    assert_eq!(err.kind.category(), ErrorCategory::RuleApplication);
    assert_eq!(
      err.kind.to_readable_string("/app"),
      r#"Rewrite rule "inline-next-config" failed on ".next/server.js": pattern not found"#
    );
  }

  #[test]
  fn only_patch_tool_errors_are_recoverable() {
    assert!(Error::patch_tool_failed("sed", "exit status 1")
      .kind
      .category()
      .is_recoverable());
    assert!(!Error::missing_manifest("/x").kind.category().is_recoverable());
    assert!(!Error::panic("boom".to_string()).kind.category().is_recoverable());
  }

  #[test]
  fn contexts_render_before_message() {
    let err = Error::missing_manifest("m.json").context("while building".to_string());
    let rendered = err.to_string();
    assert!(rendered.contains("while building"));
    assert!(rendered.ends_with(r#"Could not find build manifest "m.json". Did the framework build run?"#));
  }
}

use std::{
  fmt::Display,
  path::{Path, PathBuf},
};

use crate::utils::PathExt;
use crate::CWD;

pub mod error_code;

/// Coarse grouping of [ErrorKind]s, used to decide how the pipeline reacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
  /// Upstream build output or user configuration is missing or malformed.
  Configuration,
  /// A rewrite rule threw or could not find what it expected.
  RuleApplication,
  /// The external substitution tool failed. Recovered by skipping the patch.
  PatchTool,
  /// The bundling engine could not produce a module graph.
  Bundle,
  Io,
}

impl ErrorCategory {
  pub fn is_recoverable(self) -> bool {
    matches!(self, ErrorCategory::PatchTool)
  }
}

#[derive(Debug)]
pub enum ErrorKind {
  // --- Configuration
  MissingManifest {
    path: PathBuf,
  },
  InvalidManifest {
    path: PathBuf,
    reason: String,
  },
  InvalidConfig {
    path: PathBuf,
    reason: String,
  },
  InvalidAliasTarget {
    specifier: String,
    target: PathBuf,
  },

  // --- Rewrite rules
  RuleApplication {
    rule: String,
    file: PathBuf,
    reason: String,
  },

  // --- Post-bundle patching
  PatchToolFailed {
    tool: String,
    reason: String,
  },

  // --- Bundling
  UnresolvedEntry {
    unresolved_id: PathBuf,
  },
  ExternalEntry {
    id: PathBuf,
  },
  UnresolvedImport {
    specifier: String,
    importer: PathBuf,
  },

  /// Unrecoverable error that has no dedicated kind.
  ///
  /// We also use this to replace `panic!()` in the code for graceful shutdown.
  /// But this is not recommended.
  Panic {
    source: anyhow::Error,
  },

  IoError(std::io::Error),
}

impl Display for ErrorKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      // Configuration
      ErrorKind::MissingManifest { path } => write!(f, "Could not find build manifest \"{}\". Did the framework build run?", path.may_display_relative()),
      ErrorKind::InvalidManifest { path, reason } => write!(f, "Failed to parse build manifest \"{}\": {reason}", path.may_display_relative()),
      ErrorKind::InvalidConfig { path, reason } => write!(f, "Failed to parse config \"{}\": {reason}", path.may_display_relative()),
      ErrorKind::InvalidAliasTarget { specifier, target } => write!(f, "Custom alias for \"{specifier}\" points to \"{}\", which does not exist.", target.may_display_relative()),
      // Rewrite rules
      ErrorKind::RuleApplication { rule, file, reason } => write!(f, "Rewrite rule \"{rule}\" failed on \"{}\": {reason}", file.may_display_relative()),
      // Post-bundle patching
      ErrorKind::PatchToolFailed { tool, reason } => write!(f, "External patch tool \"{tool}\" failed: {reason}"),
      // Bundling
      ErrorKind::UnresolvedEntry { unresolved_id } => write!(f, "Could not resolve entry module \"{}\"", unresolved_id.may_display_relative()),
      ErrorKind::ExternalEntry { id } => write!(f, "Entry module \"{}\" cannot be external.", id.may_display_relative()),
      ErrorKind::UnresolvedImport { specifier, importer } => write!(f, "Could not resolve \"{specifier}\" from \"{}\"", importer.may_display_relative()),
      ErrorKind::Panic { source } => source.fmt(f),
      ErrorKind::IoError(e) => e.fmt(f),
    }
  }
}

impl ErrorKind {
  /// Shorten the file paths in messages by make them relative to CWD.
  pub fn to_readable_string(&self, cwd: impl AsRef<Path>) -> String {
    let cwd = cwd.as_ref().to_path_buf();
    CWD.set(&cwd, || self.to_string())
  }

  pub fn code(&self) -> &'static str {
    match self {
      ErrorKind::MissingManifest { .. } => error_code::MISSING_MANIFEST,
      ErrorKind::InvalidManifest { .. } => error_code::INVALID_MANIFEST,
      ErrorKind::InvalidConfig { .. } => error_code::INVALID_CONFIG,
      ErrorKind::InvalidAliasTarget { .. } => error_code::INVALID_ALIAS_TARGET,
      ErrorKind::RuleApplication { .. } => error_code::RULE_APPLICATION,
      ErrorKind::PatchToolFailed { .. } => error_code::PATCH_TOOL,
      ErrorKind::UnresolvedEntry { .. } => error_code::UNRESOLVED_ENTRY,
      ErrorKind::ExternalEntry { .. } => error_code::UNRESOLVED_ENTRY,
      ErrorKind::UnresolvedImport { .. } => error_code::UNRESOLVED_IMPORT,
      ErrorKind::Panic { .. } => error_code::PANIC,
      ErrorKind::IoError(_) => error_code::IO_ERROR,
    }
  }

  pub fn category(&self) -> ErrorCategory {
    match self {
      ErrorKind::MissingManifest { .. }
      | ErrorKind::InvalidManifest { .. }
      | ErrorKind::InvalidConfig { .. }
      | ErrorKind::InvalidAliasTarget { .. } => ErrorCategory::Configuration,
      ErrorKind::RuleApplication { .. } => ErrorCategory::RuleApplication,
      ErrorKind::PatchToolFailed { .. } => ErrorCategory::PatchTool,
      ErrorKind::UnresolvedEntry { .. }
      | ErrorKind::ExternalEntry { .. }
      | ErrorKind::UnresolvedImport { .. }
      | ErrorKind::Panic { .. } => ErrorCategory::Bundle,
      ErrorKind::IoError(_) => ErrorCategory::Io,
    }
  }
}

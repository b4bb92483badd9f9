//! Turns a framework's standalone server build into one self-contained
//! `handler.mjs` for a constrained edge runtime.
mod builtin_rules;
pub use builtin_rules::*;
mod manifest;
pub use manifest::*;
mod options;
pub use options::*;
mod pipeline;
pub use pipeline::*;

pub use {
  edgepack_core::{default_warning_handler, WarningHandler},
  edgepack_error::{Error, Result},
  edgepack_patch::{PatchLimits, PatchOutcome, PatchReport, PatchTier, SkipReason},
  edgepack_plugin_content_updater::{FileMatcher, RegexRule, ReplaceRule, RewriteRule},
  edgepack_policy::BundleConfig,
};

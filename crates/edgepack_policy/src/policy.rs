use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;
use sugar_path::SugarPath;

use crate::{BundleConfig, DefaultTables, ShimKind, ShimPaths};

pub type AliasMap = FxHashMap<String, String>;

/// Everything the bundling engine needs to know about module treatment for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionPolicy {
  /// Order-preserving; the engine only ever tests membership.
  pub externals: Vec<String>,
  pub alias: AliasMap,
}

impl ResolutionPolicy {
  pub fn compute(config: &BundleConfig, defaults: &DefaultTables, shims: &ShimPaths) -> Self {
    Self {
      externals: compute_external(config, defaults),
      alias: compute_alias_map(config, defaults, shims),
    }
  }

  pub fn is_external(&self, specifier: &str) -> bool {
    self.externals.iter().any(|ext| ext == specifier)
  }
}

pub fn compute_external(config: &BundleConfig, defaults: &DefaultTables) -> Vec<String> {
  let defaults = if config.include_defaults {
    defaults.external
  } else {
    &[]
  };
  defaults
    .iter()
    .map(|s| s.to_string())
    .chain(config.external.iter().cloned())
    .collect()
}

/// Builds the alias map in passes. A later pass overwrites an earlier one for
/// the same specifier, and `custom_aliases` always goes last.
pub fn compute_alias_map(
  config: &BundleConfig,
  defaults: &DefaultTables,
  shims: &ShimPaths,
) -> AliasMap {
  let mut alias = AliasMap::default();

  if config.include_defaults {
    stub_with(&mut alias, defaults.stub_empty.iter().copied(), shims.get(ShimKind::Empty));
    stub_with(&mut alias, defaults.stub_throw.iter().copied(), shims.get(ShimKind::Throw));
    stub_with(&mut alias, defaults.stub_fetch.iter().copied(), shims.get(ShimKind::Fetch));
    stub_with(&mut alias, defaults.stub_env.iter().copied(), shims.get(ShimKind::Env));
    stub_with(&mut alias, defaults.stub_styled_jsx.iter().copied(), shims.get(ShimKind::Empty));
  }

  stub_with(&mut alias, config.stub_empty.iter().map(String::as_str), shims.get(ShimKind::Empty));
  stub_with(&mut alias, config.stub_throw.iter().map(String::as_str), shims.get(ShimKind::Throw));
  stub_with(&mut alias, config.stub_fetch.iter().map(String::as_str), shims.get(ShimKind::Fetch));
  stub_with(&mut alias, config.stub_env.iter().map(String::as_str), shims.get(ShimKind::Env));

  for (specifier, target) in &config.custom_aliases {
    alias.insert(specifier.clone(), target.clone());
  }

  alias
}

fn stub_with<'a>(alias: &mut AliasMap, ids: impl IntoIterator<Item = &'a str>, shim: &Path) {
  let target = shim.to_string_lossy();
  for id in ids {
    alias.insert(id.to_string(), target.to_string());
  }
}

fn is_path_target(target: &str) -> bool {
  target.starts_with('.') || target.starts_with('/') || Path::new(target).is_absolute()
}

/// Resolves a path-like custom alias target against `base_dir`.
pub fn custom_alias_path(target: &str, base_dir: &Path) -> Option<PathBuf> {
  if !is_path_target(target) {
    return None;
  }
  let path = Path::new(target);
  if path.is_absolute() {
    Some(path.to_path_buf())
  } else {
    Some(base_dir.join(path).normalize().to_path_buf())
  }
}

/// Fails fast when a path-like custom alias points at nothing.
///
/// Bare package targets are left for the engine's resolver to report.
pub fn validate_custom_aliases(config: &BundleConfig, base_dir: &Path) -> edgepack_error::Result<()> {
  config
    .custom_aliases
    .iter()
    .filter_map(|(specifier, target)| {
      custom_alias_path(target, base_dir).map(|path| (specifier, path))
    })
    .try_for_each(|(specifier, path)| {
      if path.exists() {
        Ok(())
      } else {
        Err(edgepack_error::Error::invalid_alias_target(specifier.as_str(), path))
      }
    })
}

use std::{path::PathBuf, pin::Pin, sync::Arc};

use derivative::Derivative;
use edgepack_resolver::ResolverOptions;
use futures::{future, Future, FutureExt};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::{BuildError, BuildResult};

type PinFutureBox<T> = Pin<Box<dyn Future<Output = T> + Send>>;

/// `(specifier, importer, is_resolved) -> is external`
pub type IsExternal =
  Arc<dyn Fn(&str, Option<&str>, bool) -> PinFutureBox<BuildResult<bool>> + Send + Sync>;

pub type WarningHandler = Arc<dyn Fn(BuildError) + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputItem {
  pub name: String,
  pub import: String,
}

#[derive(Derivative)]
#[derivative(Debug)]
pub struct InputOptions {
  pub input: Vec<InputItem>,
  pub cwd: PathBuf,
  #[derivative(Debug = "ignore")]
  pub is_external: IsExternal,
  /// Specifier substitutions, consulted before the external test.
  pub alias: FxHashMap<String, String>,
  pub resolve: ResolverOptions,
  #[derivative(Debug = "ignore")]
  pub on_warn: WarningHandler,
}

pub fn default_warning_handler() -> WarningHandler {
  Arc::new(|err| {
    tracing::warn!("{}", err);
  })
}

/// Builds an [IsExternal] doing exact membership tests against `list`.
pub fn external_from_list(list: impl IntoIterator<Item = String>) -> IsExternal {
  let list = Arc::new(list.into_iter().collect::<FxHashSet<_>>());
  Arc::new(move |specifier, _importer, _is_resolved| {
    future::ready(Ok(list.contains(specifier))).boxed()
  })
}

impl Default for InputOptions {
  fn default() -> Self {
    Self {
      input: Default::default(),
      cwd: std::env::current_dir().unwrap_or_default(),
      is_external: Arc::new(|_, _, _| future::ready(Ok(false)).boxed()),
      alias: Default::default(),
      resolve: Default::default(),
      on_warn: default_warning_handler(),
    }
  }
}

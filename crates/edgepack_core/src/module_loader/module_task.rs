use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use edgepack_common::{Loader, ModuleId};
use edgepack_plugin::ResolveArgs;
use edgepack_resolver::{is_path_like, Resolver};
use futures::future::join_all;
use rustc_hash::FxHashMap;
use sugar_path::SugarPath;
use tracing::instrument;

use super::Msg;
use crate::{
  is_node_builtin, resolve_id, scan, strip_bom, BuildError, BuildResult, IsExternal,
  ResolvedModuleIds, SharedBuildPluginDriver, SharedResolver, WarningHandler,
};

pub(crate) struct ModuleTask {
  pub(crate) id: ModuleId,
  pub(crate) tx: tokio::sync::mpsc::UnboundedSender<Msg>,
  pub(crate) cwd: PathBuf,
  pub(crate) alias: Arc<FxHashMap<String, String>>,
  pub(crate) resolver: SharedResolver,
  pub(crate) plugin_driver: SharedBuildPluginDriver,
  pub(crate) is_external: IsExternal,
  pub(crate) on_warn: WarningHandler,
}

impl ModuleTask {
  /// Alias first, then the external test on the post-alias specifier, then
  /// plugins and the file system.
  pub(crate) async fn resolve_id(
    &self,
    resolver: &Resolver,
    specifier: &str,
  ) -> BuildResult<ModuleId> {
    let importer = &self.id;
    let aliased = self.alias.get(specifier).map(|target| {
      if is_path_like(target) && !Path::new(target).is_absolute() {
        self
          .cwd
          .join(target)
          .normalize()
          .to_path_buf()
          .to_string_lossy()
          .to_string()
      } else {
        target.clone()
      }
    });
    if let Some(aliased) = &aliased {
      tracing::trace!("alias {} -> {}", specifier, aliased);
    }
    let specifier = aliased.as_deref().unwrap_or(specifier);

    if is_node_builtin(specifier) || (self.is_external)(specifier, Some(importer.id()), false).await?
    {
      return Ok(ModuleId::new(specifier, true));
    }

    let resolved = resolve_id(
      resolver,
      ResolveArgs {
        importer: Some(importer),
        specifier,
      },
      &self.plugin_driver,
    )
    .await?;

    match resolved {
      Some(id) => {
        let external =
          id.is_external() || (self.is_external)(id.id(), Some(importer.id()), true).await?;
        Ok(ModuleId::new(id.id(), external))
      }
      None => {
        (self.on_warn)(
          BuildError::unresolved_import(specifier, importer.as_path())
            .context("Treating it as external".to_string()),
        );
        Ok(ModuleId::new(specifier, true))
      }
    }
  }

  #[instrument(skip_all)]
  pub(crate) async fn run(self) {
    let tx = self.tx.clone();
    let msg = match self.run_inner().await {
      Ok(result) => Msg::Scanned(result),
      Err(err) => Msg::Error(err),
    };
    // The loader only goes away once every task has reported back.
    let _ = tx.send(msg);
  }

  async fn run_inner(self) -> BuildResult<TaskResult> {
    let raw = tokio::fs::read_to_string(self.id.as_path())
      .await
      .map_err(|e| BuildError::io_error(e).context(format!("Read file: {}", self.id)))?;
    let original_bytes = raw.len();
    let loader = Loader::from_path(self.id.as_path());

    let code = self
      .plugin_driver
      .read()
      .await
      .transform(&self.id, strip_bom(raw))
      .await?;

    let dependencies = match loader {
      Loader::Js => scan(&code).dependencies,
      Loader::Json => vec![],
    };

    let resolved_ids = join_all(dependencies.iter().map(|specifier| {
      let resolver = self.resolver.clone();
      let task = &self;
      async move {
        task
          .resolve_id(&resolver, specifier)
          .await
          .map(|id| (specifier.clone(), id))
      }
    }))
    .await
    .into_iter()
    .collect::<BuildResult<ResolvedModuleIds>>()?;

    Ok(TaskResult {
      module_id: self.id,
      code,
      loader,
      original_bytes,
      dependencies,
      resolved_ids,
    })
  }
}

#[derive(Debug)]
pub(crate) struct TaskResult {
  pub module_id: ModuleId,
  pub code: String,
  pub loader: Loader,
  pub original_bytes: usize,
  /// Statically required specifiers in source order.
  pub dependencies: Vec<String>,
  pub resolved_ids: ResolvedModuleIds,
}

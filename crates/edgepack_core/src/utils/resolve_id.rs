use edgepack_common::ModuleId;
use edgepack_plugin::ResolveArgs;
use edgepack_resolver::{is_path_like, Resolver};

use crate::{BuildResult, SharedBuildPluginDriver};

/// Plugins first, then the file system.
///
/// A bare specifier the resolver can't find from inside the graph yields
/// `Ok(None)` so the caller can leave it to the host runtime. Path-like
/// specifiers and entries must resolve.
pub(crate) async fn resolve_id(
  resolver: &Resolver,
  args: ResolveArgs<'_>,
  plugin_driver: &SharedBuildPluginDriver,
) -> BuildResult<Option<ModuleId>> {
  let plugin_result = plugin_driver
    .read()
    .await
    .resolve(args.clone())
    .await?;

  if let Some(plugin_result) = plugin_result {
    return Ok(Some(ModuleId::new(plugin_result.id, plugin_result.external)));
  }

  let importer = args.importer.map(|id| id.id());
  match resolver.resolve(importer, args.specifier) {
    Ok(resolved) => Ok(Some(ModuleId::new(resolved, false))),
    Err(_) if importer.is_some() && !is_path_like(args.specifier) => Ok(None),
    Err(err) => Err(err),
  }
}

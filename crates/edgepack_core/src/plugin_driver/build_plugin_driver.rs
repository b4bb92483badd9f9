use std::sync::{Arc, Mutex};

use edgepack_common::ModuleId;
use edgepack_plugin::{
  BuildPlugin, Context, PluginEffect, ResolveArgs, ResolveOutput, TransformArgs,
};
use tokio::sync::RwLock;

use crate::BuildResult;

pub(crate) type SharedBuildPluginDriver = Arc<RwLock<BuildPluginDriver>>;

#[derive(Debug, Default)]
pub(crate) struct BuildPluginDriver {
  pub plugins: Vec<Box<dyn BuildPlugin>>,
  effects: Mutex<Vec<PluginEffect>>,
}

impl BuildPluginDriver {
  pub(crate) fn new(plugins: Vec<Box<dyn BuildPlugin>>) -> Self {
    Self {
      plugins,
      effects: Default::default(),
    }
  }

  pub(crate) fn into_shared(self) -> SharedBuildPluginDriver {
    Arc::new(RwLock::new(self))
  }

  fn collect_effects(&self, ctx: &mut Context) {
    let effects = ctx.take_effects();
    if effects.is_empty() {
      return;
    }
    match self.effects.lock() {
      Ok(mut collected) => collected.extend(effects),
      Err(poisoned) => poisoned.into_inner().extend(effects),
    }
  }

  /// Drains every effect recorded so far, sorted so the result doesn't depend
  /// on the order modules were visited.
  pub(crate) fn take_effects(&self) -> Vec<PluginEffect> {
    let mut effects = match self.effects.lock() {
      Ok(mut collected) => std::mem::take(&mut *collected),
      Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
    };
    effects.sort();
    effects
  }

  pub(crate) async fn resolve(&self, mut args: ResolveArgs<'_>) -> ResolveOutput {
    for plugin in &self.plugins {
      let mut ctx = Context::new();
      let output = plugin.resolve(&mut ctx, &mut args).await;
      self.collect_effects(&mut ctx);
      let output = output?;
      if output.is_some() {
        return Ok(output);
      }
    }
    Ok(None)
  }

  /// Threads `code` through every plugin's transform hook in registration order.
  pub(crate) async fn transform(&self, id: &ModuleId, code: String) -> BuildResult<String> {
    let mut code = code;
    for plugin in &self.plugins {
      let mut ctx = Context::new();
      let output = plugin
        .transform(&mut ctx, &mut TransformArgs { id, code: &code })
        .await;
      self.collect_effects(&mut ctx);
      if let Some(output) = output? {
        code = output
      }
    }
    Ok(code)
  }
}

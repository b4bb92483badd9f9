use std::sync::Arc;

use derivative::Derivative;
use edgepack_common::ModuleId;
use edgepack_resolver::Resolver;
use itertools::Itertools;
use rustc_hash::FxHashSet;

use crate::module_loader::ModuleLoader;
use crate::{
  norm_or_ext::NormOrExt, normal_module::NormalModule, options::InputOptions, BuildResult,
  ModuleById, SharedBuildPluginDriver,
};

#[derive(Derivative)]
#[derivative(Debug)]
pub struct Graph {
  pub entries: Vec<ModuleId>,
  pub(crate) module_by_id: ModuleById,
  #[derivative(Debug = "ignore")]
  pub(crate) build_plugin_driver: SharedBuildPluginDriver,
}

impl Graph {
  pub(crate) fn new(build_plugin_driver: SharedBuildPluginDriver) -> Self {
    Self {
      entries: Default::default(),
      module_by_id: Default::default(),
      build_plugin_driver,
    }
  }

  pub(crate) fn add_module(&mut self, module: NormOrExt) {
    debug_assert!(!self.module_by_id.contains_key(module.id()));
    self.module_by_id.insert(module.id().clone(), module);
  }

  /// Assigns `exec_order` with a post-order DFS from the entries, so a
  /// module's dependencies always come before it.
  #[tracing::instrument(skip_all)]
  fn sort_modules(&mut self) {
    enum Action {
      Enter,
      Exit,
    }
    let mut queue = self
      .entries
      .iter()
      .map(|id| (Action::Enter, id.clone()))
      .rev()
      .collect::<Vec<_>>();

    let mut entered_ids: FxHashSet<ModuleId> = FxHashSet::default();
    let mut next_exec_order = 0;

    while let Some((action, id)) = queue.pop() {
      match action {
        Action::Enter => {
          let Some(module) = self.module_by_id.get(&id) else {
            continue;
          };
          if entered_ids.insert(id.clone()) {
            queue.push((Action::Exit, id.clone()));
            module
              .dependencies()
              .iter()
              .rev()
              // Early filter modules that are already entered
              .filter(|id| !entered_ids.contains(*id))
              .for_each(|dep| {
                queue.push((Action::Enter, dep.clone()));
              });
          }
        }
        Action::Exit => {
          if let Some(module) = self.module_by_id.get_mut(&id) {
            module.set_exec_order(next_exec_order);
          }
          next_exec_order += 1;
        }
      }
    }
    tracing::debug!(
      "sorted modules {:#?}",
      self
        .module_by_id
        .values()
        .filter(|m| m.exec_order().is_some())
        .sorted_by_key(|m| m.exec_order())
        .map(|m| m.id())
        .collect_vec()
    );
  }

  /// Modules bundled for `entry`, in execution order.
  pub fn normal_modules_of(&self, entry: &ModuleId) -> Vec<&NormalModule> {
    let mut visited: FxHashSet<&ModuleId> = FxHashSet::default();
    let mut stack = vec![entry];
    let mut modules = vec![];
    while let Some(id) = stack.pop() {
      if !visited.insert(id) {
        continue;
      }
      if let Some(NormOrExt::Normal(module)) = self.module_by_id.get(id) {
        modules.push(module);
        stack.extend(module.dependencies.iter());
      }
    }
    modules.sort_by_key(|m| m.exec_order);
    modules
  }

  #[tracing::instrument(skip_all)]
  pub(crate) async fn generate_module_graph(&mut self, input_opts: &InputOptions) -> BuildResult<()> {
    let resolver = Arc::new(Resolver::with_options(
      input_opts.cwd.clone(),
      input_opts.resolve.clone(),
    ));

    let plugin_driver = self.build_plugin_driver.clone();
    ModuleLoader::new(self, resolver, plugin_driver, input_opts)
      .fetch_all_modules()
      .await?;

    self.sort_modules();
    Ok(())
  }
}

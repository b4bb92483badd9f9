use std::sync::Arc;

use edgepack_common::{ModuleId, CWD};
use edgepack_error::{format_err, ErrorKind, Errors};
use edgepack_plugin::ResolveArgs;
use futures::future::join_all;
use rustc_hash::FxHashSet;

pub(crate) mod module_task;

use module_task::{ModuleTask, TaskResult};

use crate::{norm_or_ext::NormOrExt, ExternalModule, Graph, InputOptions, NormalModule};
use crate::{resolve_id, BuildError, BuildResult, SharedBuildPluginDriver, SharedResolver};

pub(crate) struct ModuleLoader<'a> {
  input_options: &'a InputOptions,
  graph: &'a mut Graph,
  build_plugin_driver: SharedBuildPluginDriver,
  loaded_modules: FxHashSet<ModuleId>,
  remaining_tasks: usize,
  tx: tokio::sync::mpsc::UnboundedSender<Msg>,
  rx: tokio::sync::mpsc::UnboundedReceiver<Msg>,
  resolver: SharedResolver,
  alias: Arc<rustc_hash::FxHashMap<String, String>>,
  errors: Vec<BuildError>,
}

#[derive(Debug)]
pub(crate) enum Msg {
  Scanned(TaskResult),
  Error(BuildError),
}

impl<'a> ModuleLoader<'a> {
  pub(crate) fn new(
    graph: &'a mut Graph,
    resolver: SharedResolver,
    plugin_driver: SharedBuildPluginDriver,
    input_opts: &'a InputOptions,
  ) -> Self {
    let (tx, rx) = tokio::sync::mpsc::unbounded_channel::<Msg>();
    Self {
      graph,
      loaded_modules: Default::default(),
      remaining_tasks: 0,
      tx,
      rx,
      resolver,
      alias: Arc::new(input_opts.alias.clone()),
      errors: Default::default(),
      build_plugin_driver: plugin_driver,
      input_options: input_opts,
    }
  }

  async fn resolve_entries(&self) -> Vec<BuildResult<ModuleId>> {
    join_all(self.input_options.input.iter().map(|item| async {
      let specifier = item.import.as_str();
      let id = resolve_id(
        &self.resolver,
        ResolveArgs {
          importer: None,
          specifier,
        },
        &self.build_plugin_driver,
      )
      .await
      .map_err(|err| match err.kind {
        ErrorKind::UnresolvedImport { .. } => BuildError::unresolved_entry(specifier),
        _ => err,
      })?;

      let Some(id) = id else {
        return Err(BuildError::unresolved_entry(specifier));
      };

      if id.is_external() {
        return Err(BuildError::entry_cannot_be_external(id.id()));
      }
      Ok(id)
    }))
    .await
  }

  pub(crate) async fn fetch_all_modules(mut self) -> BuildResult<()> {
    if self.input_options.input.is_empty() {
      return Err(format_err!("You must supply at least one input to edgepack").into());
    }

    let resolved_entries = self.resolve_entries().await;

    for entry in resolved_entries {
      let id = entry?;
      // Entries stay aligned with `input`, even when two of them share a module.
      self.graph.entries.push(id.clone());
      if self.loaded_modules.insert(id.clone()) {
        self.spawn_new_module_task(id);
      }
    }

    while self.remaining_tasks > 0 {
      let Some(msg) = self.rx.recv().await else {
        break;
      };
      match msg {
        Msg::Scanned(res) => {
          tracing::trace!("finish: {}", res.module_id);
          self.remaining_tasks -= 1;
          self.handle_msg_scanned(res);
        }
        Msg::Error(err) => {
          self.remaining_tasks -= 1;
          self.errors.push(err);
        }
      }
      tracing::trace!("remaining: {}", self.remaining_tasks);
    }

    // Task completion order is arbitrary; keep the reported error stable.
    let cwd = self.input_options.cwd.clone();
    let mut errors = self.errors;
    CWD.set(&cwd, || errors.sort_by_cached_key(|err| err.to_string()));
    match Errors::from_vec(errors) {
      Some(errors) => Err(errors.into_first()),
      None => Ok(()),
    }
  }

  fn spawn_new_module_task(&mut self, module_id: ModuleId) {
    tracing::trace!("spawning new job for {}", module_id);
    self.remaining_tasks += 1;
    let task = ModuleTask {
      id: module_id,
      tx: self.tx.clone(),
      cwd: self.input_options.cwd.clone(),
      alias: self.alias.clone(),
      resolver: self.resolver.clone(),
      plugin_driver: self.build_plugin_driver.clone(),
      is_external: self.input_options.is_external.clone(),
      on_warn: self.input_options.on_warn.clone(),
    };
    tokio::spawn(task.run());
  }

  fn handle_msg_scanned(&mut self, result: TaskResult) {
    let resolved_ids = result.resolved_ids;

    result.dependencies.iter().for_each(|specifier| {
      let id = &resolved_ids[specifier];
      if self.loaded_modules.contains(id) {
        return;
      }
      self.loaded_modules.insert(id.clone());
      if id.is_external() {
        self
          .graph
          .add_module(NormOrExt::External(ExternalModule::new(id.clone())));
      } else {
        self.spawn_new_module_task(id.clone());
      }
    });

    let mut dependencies: Vec<ModuleId> = vec![];
    for specifier in &result.dependencies {
      let id = &resolved_ids[specifier];
      // Two specifiers may land on the same module.
      if !dependencies.contains(id) {
        dependencies.push(id.clone());
      }
    }

    let normal_module = NormalModule {
      exec_order: usize::MAX,
      id: result.module_id,
      loader: result.loader,
      code: result.code,
      original_bytes: result.original_bytes,
      dependencies,
      resolved_ids,
    };
    self.graph.add_module(NormOrExt::Normal(normal_module));
  }
}

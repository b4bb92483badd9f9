use std::sync::{Mutex, MutexGuard};

use edgepack_common::ModuleId;
use edgepack_plugin::{
  async_trait, BuildPlugin, Context, PluginName, TransformArgs, TransformOutput,
};
use rustc_hash::FxHashMap;

use crate::RewriteRule;

#[derive(Debug)]
enum Stage {
  Rule(Box<dyn RewriteRule>),
  /// Always last. Hands the ledger entry of a file back to the bundler.
  Commit,
}

/// Edits made to one file so far in this pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PendingEdits {
  pub content: String,
  /// Ids of the rules that changed the content, in the order they ran.
  pub applied: Vec<String>,
}

#[derive(Debug, Default)]
pub struct ContentUpdaterBuilder {
  rules: Vec<Box<dyn RewriteRule>>,
}

impl ContentUpdaterBuilder {
  pub fn rule(mut self, rule: impl RewriteRule + 'static) -> Self {
    self.rules.push(Box::new(rule));
    self
  }

  pub fn rules(mut self, rules: impl IntoIterator<Item = Box<dyn RewriteRule>>) -> Self {
    self.rules.extend(rules);
    self
  }

  pub fn build(self) -> ContentUpdater {
    let mut stages = self
      .rules
      .into_iter()
      .map(Stage::Rule)
      .collect::<Vec<_>>();
    stages.push(Stage::Commit);
    ContentUpdater {
      stages,
      ledger: Default::default(),
    }
  }
}

/// The rewrite pipeline, exposed to the bundler as a transform hook.
#[derive(Debug)]
pub struct ContentUpdater {
  stages: Vec<Stage>,
  ledger: Mutex<FxHashMap<ModuleId, PendingEdits>>,
}

impl ContentUpdater {
  pub fn builder() -> ContentUpdaterBuilder {
    ContentUpdaterBuilder::default()
  }

  pub fn rule_ids(&self) -> Vec<&str> {
    self
      .stages
      .iter()
      .filter_map(|stage| match stage {
        Stage::Rule(rule) => Some(rule.id()),
        Stage::Commit => None,
      })
      .collect()
  }

  /// Files edited but not committed yet. Empty between passes.
  pub fn pending_len(&self) -> usize {
    self.ledger().len()
  }

  fn ledger(&self) -> MutexGuard<'_, FxHashMap<ModuleId, PendingEdits>> {
    match self.ledger.lock() {
      Ok(guard) => guard,
      Err(poisoned) => poisoned.into_inner(),
    }
  }

  fn record(&self, id: &ModuleId, rule_id: &str, content: String) {
    let mut ledger = self.ledger();
    let entry = ledger.entry(id.clone()).or_default();
    entry.content = content;
    entry.applied.push(rule_id.to_string());
  }

  fn commit(&self, id: &ModuleId) -> Option<PendingEdits> {
    self.ledger().remove(id)
  }

  /// Runs every stage over one file. `Ok(None)` means no rule changed it.
  pub fn update(
    &self,
    ctx: &mut Context,
    id: &ModuleId,
    original: &str,
  ) -> edgepack_error::Result<Option<String>> {
    for stage in &self.stages {
      match stage {
        Stage::Rule(rule) => {
          let current = self.ledger().get(id).map(|edits| edits.content.clone());
          let current = current.as_deref().unwrap_or(original);
          if !rule.matches(id, current) {
            continue;
          }
          let output = match rule.transform(ctx, id, current) {
            Ok(output) => output,
            Err(err) => {
              // Nothing of a failed file may reach the bundle.
              self.commit(id);
              return Err(err);
            }
          };
          if let Some(content) = output {
            if content != current {
              tracing::trace!("rule {} rewrote {}", rule.id(), id);
              self.record(id, rule.id(), content);
            }
          }
        }
        Stage::Commit => {
          return Ok(self.commit(id).map(|edits| {
            tracing::debug!("{} rewritten by {:?}", id, edits.applied);
            edits.content
          }));
        }
      }
    }
    Ok(None)
  }
}

#[async_trait::async_trait]
impl BuildPlugin for ContentUpdater {
  fn name(&self) -> PluginName {
    std::borrow::Cow::Borrowed("builtin:content-updater")
  }

  async fn transform(&self, ctx: &mut Context, args: &mut TransformArgs) -> TransformOutput {
    self.update(ctx, args.id, args.code)
  }
}

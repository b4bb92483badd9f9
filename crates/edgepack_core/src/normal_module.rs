use std::path::Path;

use edgepack_common::{Loader, ModuleId};
use regex::Captures;

use crate::{specifier_of, ResolvedModuleIds, REQUIRE_CALL_RE, RUNTIME_REQUIRE_RE};

#[derive(Debug)]
pub struct NormalModule {
  pub exec_order: usize,
  pub id: ModuleId,
  pub loader: Loader,
  /// Source after every transform hook ran.
  pub code: String,
  /// Size of the file as read from disk.
  pub original_bytes: usize,
  pub dependencies: Vec<ModuleId>,
  pub(crate) resolved_ids: ResolvedModuleIds,
}

pub(crate) struct RenderContext<'a> {
  pub cwd: &'a Path,
  pub require_marker: &'a str,
}

fn quote(text: &str) -> String {
  serde_json::Value::from(text).to_string()
}

impl NormalModule {
  pub fn key(&self, cwd: &Path) -> String {
    self.id.stable_key(cwd)
  }

  /// The module's body with every static `require` pointed at the registry
  /// or at the host `require` marker.
  fn render_body(&self, ctx: &RenderContext) -> String {
    match self.loader {
      Loader::Json => format!("module.exports = {};", self.code.trim()),
      Loader::Js => {
        let code = REQUIRE_CALL_RE.replace_all(&self.code, |caps: &Captures| {
          let prefix = &caps[1];
          let target = specifier_of(caps).and_then(|specifier| self.resolved_ids.get(specifier));
          match target {
            Some(id) if id.is_external() => {
              format!("{prefix}{}({})", ctx.require_marker, quote(id.id()))
            }
            Some(id) => format!("{prefix}__edgepack_load({})", quote(&id.stable_key(ctx.cwd))),
            None => caps[0].to_string(),
          }
        });
        let mut code = code.into_owned();
        // Matches can't overlap, so `require(require(...` needs another round.
        while RUNTIME_REQUIRE_RE.is_match(&code) {
          code = RUNTIME_REQUIRE_RE
            .replace_all(&code, format!("${{1}}{}${{2}}", ctx.require_marker))
            .into_owned();
        }
        code
      }
    }
  }

  pub(crate) fn render(&self, ctx: &RenderContext) -> String {
    format!(
      "{}: function (module, exports, __filename, __dirname) {{\n{}\n}}",
      quote(&self.key(ctx.cwd)),
      self.render_body(ctx)
    )
  }
}

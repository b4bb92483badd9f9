use edgepack_error::{Error, Result};
use edgepack_plugin_content_updater::{FileMatcher, RegexRule, RewriteRule};

use crate::{BuildManifest, RuntimeMode};

pub const INLINE_NEXT_CONFIG: &str = "inline-next-config";
pub const INLINE_RUNTIME_MODE: &str = "inline-runtime-mode";

const STANDALONE_CONFIG_ENV: &str = "__NEXT_PRIVATE_STANDALONE_CONFIG";
const TURBOPACK_ENV: &str = "TURBOPACK";

/// Replaces reads of `process.env.<name>` with `literal`. Assignments to it
/// are kept, so `process.env.X = ...` stays valid JavaScript.
fn inline_env_read(rule_id: &str, name: &str, literal: &str) -> Result<RegexRule> {
  let needle = format!("process.env.{name}");
  // Anything but a lone `=` may follow a read. A line break before the next
  // statement counts too, and so does the end of the file.
  let pattern = format!(r"process\.env\.{name}(\s*(?:==|[^=\s\w$])|\s+[^=\s]|\s*$)");
  // `$` is special in regex replacements.
  let replacement = format!("{}${{1}}", literal.replace('$', "$$"));
  RegexRule::new(rule_id, FileMatcher::contains(needle), &pattern, replacement)
}

/// Rules every build runs before any user rule.
pub fn builtin_rules(
  manifest: &BuildManifest,
  mode: RuntimeMode,
) -> Result<Vec<Box<dyn RewriteRule>>> {
  let config = serde_json::to_string(&manifest.config)
    .and_then(|json| serde_json::to_string(&json))
    .map_err(|err| Error::rule_application(INLINE_NEXT_CONFIG, BuildManifest::RELATIVE_PATH, err))?;
  let runtime = if mode.is_turbopack() { "true" } else { "false" };
  Ok(vec![
    Box::new(inline_env_read(INLINE_NEXT_CONFIG, STANDALONE_CONFIG_ENV, &config)?),
    Box::new(inline_env_read(INLINE_RUNTIME_MODE, TURBOPACK_ENV, runtime)?),
  ])
}

#[cfg(test)]
mod tests {
  use edgepack_common::ModuleId;
  use edgepack_plugin::Context;
  use serde_json::json;

  use super::*;

  fn manifest(config: serde_json::Value) -> BuildManifest {
    BuildManifest {
      config,
      relative_app_dir: String::new(),
      files: vec![],
      version: None,
    }
  }

  fn run(rules: &[Box<dyn RewriteRule>], code: &str) -> String {
    let id = ModuleId::new("/app/.next/standalone/server.js", false);
    let mut ctx = Context::new();
    rules.iter().fold(code.to_string(), |code, rule| {
      if !rule.matches(&id, &code) {
        return code;
      }
      rule.transform(&mut ctx, &id, &code).unwrap().unwrap_or(code)
    })
  }

  #[test]
  fn inlines_config_reads_and_keeps_assignments() {
    let rules = builtin_rules(&manifest(json!({ "foo": 1, "price": "$5" })), RuntimeMode::Webpack).unwrap();
    let code = "process.env.__NEXT_PRIVATE_STANDALONE_CONFIG = JSON.stringify(nextConfig);\nconst c = JSON.parse(process.env.__NEXT_PRIVATE_STANDALONE_CONFIG);";
    assert_eq!(
      run(&rules, code),
      "process.env.__NEXT_PRIVATE_STANDALONE_CONFIG = JSON.stringify(nextConfig);\nconst c = JSON.parse(\"{\\\"foo\\\":1,\\\"price\\\":\\\"$5\\\"}\");"
    );
  }

  #[test]
  fn inlines_runtime_mode() {
    let rules = builtin_rules(&manifest(json!({})), RuntimeMode::Turbopack).unwrap();
    assert_eq!(
      run(&rules, "if (process.env.TURBOPACK) {} process.env.TURBOPACK_X;"),
      "if (true) {} process.env.TURBOPACK_X;"
    );
    let rules = builtin_rules(&manifest(json!({})), RuntimeMode::Webpack).unwrap();
    assert_eq!(run(&rules, "!process.env.TURBOPACK ? a : b"), "!false ? a : b");
  }

  #[test]
  fn reads_ending_a_line_or_the_file_are_inlined() {
    let rules = builtin_rules(&manifest(json!({})), RuntimeMode::Turbopack).unwrap();
    assert_eq!(
      run(&rules, "const t = process.env.TURBOPACK\nfoo()"),
      "const t = true\nfoo()"
    );
    assert_eq!(
      run(&rules, "module.exports = process.env.TURBOPACK"),
      "module.exports = true"
    );
    assert_eq!(
      run(&rules, "module.exports = process.env.TURBOPACK\n"),
      "module.exports = true\n"
    );
    assert_eq!(
      run(&rules, "process.env.TURBOPACK\n  = 1;"),
      "process.env.TURBOPACK\n  = 1;"
    );
  }

  #[test]
  fn files_without_the_env_reads_pass_through() {
    let rules = builtin_rules(&manifest(json!({})), RuntimeMode::Webpack).unwrap();
    assert_eq!(run(&rules, "module.exports = 1;"), "module.exports = 1;");
  }
}

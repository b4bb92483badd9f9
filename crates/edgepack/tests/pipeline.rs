use edgepack::{
  build, function_dir, FileMatcher, LargePatchStrategy, PatchLimits, PatchOutcome, PatchTier,
  PipelineOptions, ReplaceRule, RewriteRule,
};
use edgepack_common::ModuleId;
use edgepack_plugin::Context;
use edgepack_test_utils::{NextAppBuilder, SyntheticTree};
use serde_json::{json, Value};

const SERVER_JS: &str = r#"const heavy = require("heavy-pkg");
const nextConfig = {};
process.env.__NEXT_PRIVATE_STANDALONE_CONFIG = JSON.stringify(nextConfig);
const config = JSON.parse(process.env.__NEXT_PRIVATE_STANDALONE_CONFIG);
const lib = require("./lib");
module.exports = { heavy, config, lib };
"#;

const LIB_JS: &str = r#"const crypto = MARKER("node:crypto");
const name = "os";
module.exports = { crypto, os: MARKER(name) };
"#;

fn marker_rule() -> ReplaceRule {
  ReplaceRule::new(
    "marker-to-require",
    FileMatcher::path_suffix("lib.js"),
    "MARKER(",
    "require(",
  )
  .required()
}

fn app(tree: &SyntheticTree) -> std::path::PathBuf {
  let app = NextAppBuilder::new()
    .config(json!({ "foo": 1 }))
    .server_js(SERVER_JS)
    .standalone_file("lib.js", LIB_JS)
    .standalone_file(
      "node_modules/heavy-pkg/index.js",
      "module.exports = 'HEAVY_PKG_SOURCE';\n",
    )
    .write(tree, "app");
  tree.json("app/edgepack.config.json", &json!({ "stubEmpty": ["heavy-pkg"] }));
  app
}

#[tokio::test]
async fn end_to_end() {
  let tree = SyntheticTree::new();
  let app = app(&tree);
  let out = tree.path("out");

  let summary = build(PipelineOptions::new(&app, &out).rule(marker_rule()))
    .await
    .unwrap();

  assert_eq!(summary.artifact, function_dir(&out).join("handler.mjs"));
  assert_eq!(summary.patch.tier, PatchTier::InProcess);
  assert!(summary.monorepo_shim.is_none());

  let artifact = std::fs::read_to_string(&summary.artifact).unwrap();
  assert!(!artifact.contains("HEAVY_PKG_SOURCE"), "{artifact}");
  assert!(artifact.contains(".build/shims/empty.js\": function"), "{artifact}");
  assert!(artifact.contains("require(\"node:crypto\")"), "{artifact}");
  assert!(artifact.contains("os: require(name)"), "{artifact}");
  assert!(!artifact.contains("MARKER("), "{artifact}");
  assert!(!artifact.contains("__require("), "{artifact}");
  assert!(artifact.contains("JSON.parse(\"{\\\"foo\\\":1}\")"), "{artifact}");
  assert!(artifact.contains("process.env.__NEXT_PRIVATE_STANDALONE_CONFIG = JSON.stringify"));

  let sidecar: Value =
    serde_json::from_str(&std::fs::read_to_string(&summary.sidecar).unwrap()).unwrap();
  assert_eq!(
    sidecar["outputs"]["handler.mjs"]["bytes"].as_u64().unwrap(),
    artifact.len() as u64
  );
  assert_eq!(sidecar["outputs"]["handler.mjs"]["entryPoint"], "server.js");
  assert!(tree.path("out/.build/shims/throw.js").is_file());
}

#[tokio::test]
async fn monorepo_gets_a_re_export_shim() {
  let tree = SyntheticTree::new();
  let app = NextAppBuilder::new()
    .relative_app_dir("apps/web")
    .write(&tree, "repo");
  let out = tree.path("out");

  let summary = build(PipelineOptions::new(&app, &out)).await.unwrap();

  assert_eq!(
    summary.artifact,
    function_dir(&out).join("apps/web").join("handler.mjs")
  );
  let shim = summary.monorepo_shim.unwrap();
  assert_eq!(shim, function_dir(&out).join("handler.mjs"));
  assert_eq!(
    std::fs::read_to_string(shim).unwrap(),
    "export { default } from \"./apps/web/handler.mjs\";\nexport * from \"./apps/web/handler.mjs\";\n"
  );
}

#[tokio::test]
async fn missing_manifest_is_fatal() {
  let tree = SyntheticTree::new();
  let out = tree.path("out");
  let err = build(PipelineOptions::new(tree.path("app"), &out))
    .await
    .unwrap_err();
  assert_eq!(err.kind.code(), "MISSING_MANIFEST");
  assert!(!function_dir(&out).join("handler.mjs").exists());
}

#[tokio::test]
async fn required_rule_without_pattern_aborts() {
  let tree = SyntheticTree::new();
  let app = NextAppBuilder::new()
    .standalone_file("lib.js", "module.exports = 1;\n")
    .server_js("module.exports = require(\"./lib\");\n")
    .write(&tree, "app");
  let out = tree.path("out");

  let err = build(PipelineOptions::new(&app, &out).rule(marker_rule()))
    .await
    .unwrap_err();

  assert_eq!(err.kind.code(), "RULE_APPLICATION");
  let message = err.to_string();
  assert!(message.contains("marker-to-require"), "{message}");
  assert!(message.contains("lib.js"), "{message}");
  assert!(!function_dir(&out).join("handler.mjs").exists());
}

#[tokio::test]
async fn failed_rebuild_leaves_no_previous_output_behind() {
  let tree = SyntheticTree::new();
  let app = app(&tree);
  let out = tree.path("out");
  let first = build(PipelineOptions::new(&app, &out).rule(marker_rule()))
    .await
    .unwrap();
  assert!(first.artifact.is_file());
  assert!(first.sidecar.is_file());

  // The lib no longer has the pattern the required rule looks for.
  tree.file("app/.next/standalone/lib.js", "module.exports = {};\n");
  let err = build(PipelineOptions::new(&app, &out).rule(marker_rule()))
    .await
    .unwrap_err();
  assert_eq!(err.kind.code(), "RULE_APPLICATION");
  assert!(!first.artifact.exists());
  assert!(!first.sidecar.exists());
}

#[tokio::test]
async fn failed_monorepo_rebuild_removes_the_re_export_shim() {
  let tree = SyntheticTree::new();
  let app = NextAppBuilder::new()
    .relative_app_dir("apps/web")
    .write(&tree, "repo");
  let out = tree.path("out");
  let first = build(PipelineOptions::new(&app, &out)).await.unwrap();
  let shim = first.monorepo_shim.clone().unwrap();
  assert!(shim.is_file());

  std::fs::remove_file(app.join(".next/required-server-files.json")).unwrap();
  let err = build(PipelineOptions::new(&app, &out)).await.unwrap_err();
  assert_eq!(err.kind.code(), "MISSING_MANIFEST");
  assert!(!shim.exists());
}

#[tokio::test]
async fn missing_custom_alias_target_is_fatal() {
  let tree = SyntheticTree::new();
  let app = NextAppBuilder::new().write(&tree, "app");
  tree.json(
    "app/edgepack.config.json",
    &json!({ "customAliases": { "pkg": "./shims/missing.js" } }),
  );
  let err = build(PipelineOptions::new(&app, tree.path("out")))
    .await
    .unwrap_err();
  assert_eq!(err.kind.code(), "INVALID_ALIAS_TARGET");
}

#[tokio::test]
async fn custom_alias_targets_are_relative_to_the_app() {
  let tree = SyntheticTree::new();
  let app = NextAppBuilder::new()
    .server_js("module.exports = require(\"pkg\");\n")
    .write(&tree, "app");
  tree.file("app/shims/pkg.js", "module.exports = 'CUSTOM_PKG';\n");
  tree.json(
    "app/edgepack.config.json",
    &json!({ "customAliases": { "pkg": "./shims/pkg.js" } }),
  );
  let summary = build(PipelineOptions::new(&app, tree.path("out")))
    .await
    .unwrap();
  let artifact = std::fs::read_to_string(summary.artifact).unwrap();
  assert!(artifact.contains("CUSTOM_PKG"), "{artifact}");
}

#[derive(Debug)]
struct EmitManifestRule;

impl RewriteRule for EmitManifestRule {
  fn id(&self) -> &str {
    "emit-manifest"
  }

  fn matches(&self, id: &ModuleId, _code: &str) -> bool {
    id.id().ends_with("server.js")
  }

  fn transform(
    &self,
    ctx: &mut Context,
    _id: &ModuleId,
    code: &str,
  ) -> edgepack::Result<Option<String>> {
    ctx.emit_file("server-source.txt", code);
    Ok(None)
  }
}

#[tokio::test]
async fn effects_are_applied_after_the_pass() {
  let tree = SyntheticTree::new();
  let app = NextAppBuilder::new()
    .server_js("module.exports = 42;\n")
    .write(&tree, "app");
  let out = tree.path("out");
  let summary = build(PipelineOptions::new(&app, &out).rule(EmitManifestRule))
    .await
    .unwrap();
  assert_eq!(
    std::fs::read_to_string(function_dir(&out).join("server-source.txt")).unwrap(),
    "module.exports = 42;\n"
  );
  assert!(summary.sidecar.is_file());
}

#[tokio::test]
async fn streaming_patch_for_large_artifacts() {
  let tree = SyntheticTree::new();
  let app = NextAppBuilder::new()
    .server_js("module.exports = require(\"node:buffer\");\n")
    .write(&tree, "app");
  let mut options = PipelineOptions::new(&app, tree.path("out"));
  options.patch_limits = PatchLimits {
    in_process: 1,
    external_tool: 1 << 30,
  };
  options.large_patch = LargePatchStrategy::Streaming;

  let summary = build(options).await.unwrap();

  assert_eq!(summary.patch.tier, PatchTier::ExternalTool);
  assert_eq!(
    summary.patch.outcome,
    PatchOutcome::Patched {
      strategy: "streaming"
    }
  );
  let artifact = std::fs::read_to_string(summary.artifact).unwrap();
  assert!(artifact.contains("module.exports = require(\"node:buffer\");"));
  assert!(artifact.contains("const require = __edgepack_createRequire(import.meta.url);"));
  assert!(artifact.contains("var __require = require;"));
}

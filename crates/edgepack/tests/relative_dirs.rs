//! Changes the process working directory, so it lives in its own test binary.
use edgepack::{build, PipelineOptions};
use edgepack_test_utils::{NextAppBuilder, SyntheticTree};
use serde_json::json;

fn app(tree: &SyntheticTree) {
  NextAppBuilder::new()
    .server_js("module.exports = require(\"heavy-pkg\");\n")
    .standalone_file(
      "node_modules/heavy-pkg/index.js",
      "module.exports = 'HEAVY_PKG_SOURCE';\n",
    )
    .write(tree, "app");
  tree.json("app/edgepack.config.json", &json!({ "stubEmpty": ["heavy-pkg"] }));
}

fn assert_stubbed(artifact: &str) {
  assert!(!artifact.contains("HEAVY_PKG_SOURCE"), "{artifact}");
  assert!(artifact.contains(".build/shims/empty.js\": function"), "{artifact}");
  assert!(!artifact.contains("require(\"dist/"), "{artifact}");
}

#[tokio::test]
async fn app_and_output_dirs_may_be_relative_to_the_working_dir() {
  let tree = SyntheticTree::new();
  app(&tree);

  std::env::set_current_dir(tree.root()).unwrap();
  let summary = build(PipelineOptions::new("app", "dist")).await.unwrap();
  assert!(summary.artifact.is_absolute());
  assert!(summary
    .artifact
    .ends_with("dist/server-functions/default/handler.mjs"));
  assert_stubbed(&std::fs::read_to_string(&summary.artifact).unwrap());
  assert!(tree.path("dist/.build/shims/empty.js").is_file());

  // What the CLI does by default when run from inside the app.
  std::env::set_current_dir(tree.path("app")).unwrap();
  let summary = build(PipelineOptions::new(".", ".edgepack")).await.unwrap();
  assert!(summary
    .artifact
    .ends_with("app/.edgepack/server-functions/default/handler.mjs"));
  assert_stubbed(&std::fs::read_to_string(&summary.artifact).unwrap());

  std::env::set_current_dir(std::env::temp_dir()).unwrap();
}

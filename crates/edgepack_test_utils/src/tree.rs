use std::path::{Path, PathBuf};

use serde_json::{json, Value};
use tempfile::TempDir;

/// A throwaway directory tree, removed on drop.
pub struct SyntheticTree {
  dir: TempDir,
}

impl SyntheticTree {
  pub fn new() -> Self {
    Self {
      dir: tempfile::tempdir().expect("create temp dir"),
    }
  }

  pub fn root(&self) -> &Path {
    self.dir.path()
  }

  pub fn path(&self, rel: &str) -> PathBuf {
    self.root().join(rel)
  }

  pub fn file(&self, rel: &str, content: impl AsRef<[u8]>) -> &Self {
    let path = self.path(rel);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).expect("create parent dirs");
    }
    std::fs::write(path, content).expect("write file");
    self
  }

  pub fn json(&self, rel: &str, value: &Value) -> &Self {
    self.file(rel, serde_json::to_string_pretty(value).expect("serialize json"))
  }

  pub fn read(&self, rel: &str) -> String {
    std::fs::read_to_string(self.path(rel)).expect("read file")
  }
}

impl Default for SyntheticTree {
  fn default() -> Self {
    Self::new()
  }
}

/// Lays out the parts of a framework build output the pipeline reads:
/// `.next/required-server-files.json` and `.next/standalone/<app dir>/server.js`.
pub struct NextAppBuilder {
  config: Value,
  relative_app_dir: String,
  files: Vec<String>,
  server_js: String,
  standalone_files: Vec<(String, String)>,
}

impl Default for NextAppBuilder {
  fn default() -> Self {
    Self {
      config: json!({}),
      relative_app_dir: String::new(),
      files: vec![".next/server/webpack-runtime.js".to_string()],
      server_js: "module.exports = {};\n".to_string(),
      standalone_files: vec![],
    }
  }
}

impl NextAppBuilder {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn config(mut self, config: Value) -> Self {
    self.config = config;
    self
  }

  pub fn relative_app_dir(mut self, dir: &str) -> Self {
    self.relative_app_dir = dir.to_string();
    self
  }

  pub fn turbopack(mut self) -> Self {
    self.files = vec![".next/server/chunks/[turbopack]_runtime.js".to_string()];
    self
  }

  pub fn server_js(mut self, code: &str) -> Self {
    self.server_js = code.to_string();
    self
  }

  /// A file relative to the standalone app directory.
  pub fn standalone_file(mut self, rel: &str, content: &str) -> Self {
    self
      .standalone_files
      .push((rel.to_string(), content.to_string()));
    self
  }

  pub fn standalone_dir(&self) -> String {
    if self.relative_app_dir.is_empty() {
      ".next/standalone".to_string()
    } else {
      format!(".next/standalone/{}", self.relative_app_dir)
    }
  }

  pub fn write(self, tree: &SyntheticTree, app_root: &str) -> PathBuf {
    let prefix = |rel: &str| {
      if app_root.is_empty() {
        rel.to_string()
      } else {
        format!("{app_root}/{rel}")
      }
    };
    tree.json(
      &prefix(".next/required-server-files.json"),
      &json!({
        "version": 1,
        "config": self.config,
        "appDir": tree.path(app_root).to_string_lossy(),
        "relativeAppDir": self.relative_app_dir,
        "files": self.files,
      }),
    );
    let standalone = self.standalone_dir();
    tree.file(&prefix(&format!("{standalone}/server.js")), &self.server_js);
    for (rel, content) in &self.standalone_files {
      tree.file(&prefix(&format!("{standalone}/{rel}")), content);
    }
    if app_root.is_empty() {
      tree.root().to_path_buf()
    } else {
      tree.path(app_root)
    }
  }
}

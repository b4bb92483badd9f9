use std::path::{Path, PathBuf};

use edgepack_error::{Error, Result};
use serde::Deserialize;
use serde_json::Value;

/// `.next/required-server-files.json`, as far as the pipeline reads it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildManifest {
  pub config: Value,
  #[serde(default)]
  pub relative_app_dir: String,
  #[serde(default)]
  pub files: Vec<String>,
  #[serde(default)]
  pub version: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeMode {
  Turbopack,
  Webpack,
}

impl RuntimeMode {
  pub fn is_turbopack(self) -> bool {
    self == RuntimeMode::Turbopack
  }
}

const TURBOPACK_RUNTIME: &str = "[turbopack]_runtime";

impl BuildManifest {
  pub const RELATIVE_PATH: &'static str = ".next/required-server-files.json";

  pub fn path(app_dir: &Path) -> PathBuf {
    app_dir.join(Self::RELATIVE_PATH)
  }

  pub fn read(app_dir: &Path) -> Result<Self> {
    let path = Self::path(app_dir);
    let content = match std::fs::read_to_string(&path) {
      Ok(content) => content,
      Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
        return Err(Error::missing_manifest(&path));
      }
      Err(err) => {
        return Err(Error::io_error(err).context(format!("Read manifest: {}", path.display())))
      }
    };
    let manifest: Self =
      serde_json::from_str(&content).map_err(|err| Error::invalid_manifest(&path, err))?;
    if !manifest.config.is_object() {
      return Err(Error::invalid_manifest(&path, "`config` must be an object"));
    }
    Ok(manifest)
  }

  pub fn runtime_mode(&self) -> RuntimeMode {
    if self
      .files
      .iter()
      .any(|file| file.contains(TURBOPACK_RUNTIME))
    {
      RuntimeMode::Turbopack
    } else {
      RuntimeMode::Webpack
    }
  }

  /// Root of the standalone output, where the traced `node_modules` live.
  pub fn standalone_root(app_dir: &Path) -> PathBuf {
    app_dir.join(".next").join("standalone")
  }

  pub fn server_entry(&self, app_dir: &Path) -> PathBuf {
    let root = Self::standalone_root(app_dir);
    if self.relative_app_dir.is_empty() {
      root.join("server.js")
    } else {
      root.join(&self.relative_app_dir).join("server.js")
    }
  }
}

#[cfg(test)]
mod tests {
  use edgepack_test_utils::{NextAppBuilder, SyntheticTree};
  use serde_json::json;

  use super::*;

  #[test]
  fn missing_manifest() {
    let tree = SyntheticTree::new();
    let err = BuildManifest::read(tree.root()).unwrap_err();
    assert_eq!(err.kind.code(), "MISSING_MANIFEST");
  }

  #[test]
  fn manifest_without_config_is_invalid() {
    let tree = SyntheticTree::new();
    tree.json(BuildManifest::RELATIVE_PATH, &json!({ "files": [] }));
    let err = BuildManifest::read(tree.root()).unwrap_err();
    assert_eq!(err.kind.code(), "INVALID_MANIFEST");
  }

  #[test]
  fn detects_runtime_mode() {
    let tree = SyntheticTree::new();
    let app = NextAppBuilder::new().write(&tree, "webpack-app");
    assert_eq!(
      BuildManifest::read(&app).unwrap().runtime_mode(),
      RuntimeMode::Webpack
    );
    let app = NextAppBuilder::new().turbopack().write(&tree, "turbo-app");
    assert_eq!(
      BuildManifest::read(&app).unwrap().runtime_mode(),
      RuntimeMode::Turbopack
    );
  }

  #[test]
  fn server_entry_follows_relative_app_dir() {
    let tree = SyntheticTree::new();
    let app = NextAppBuilder::new()
      .relative_app_dir("apps/web")
      .write(&tree, "");
    let manifest = BuildManifest::read(&app).unwrap();
    assert_eq!(
      manifest.server_entry(&app),
      app.join(".next/standalone/apps/web/server.js")
    );
    assert!(manifest.server_entry(&app).is_file());
  }
}

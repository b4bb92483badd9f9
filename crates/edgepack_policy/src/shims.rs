use std::path::{Path, PathBuf};

/// What a stub module does in place of the real package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShimKind {
  Empty,
  Throw,
  Fetch,
  Env,
}

impl ShimKind {
  pub const ALL: [ShimKind; 4] = [ShimKind::Empty, ShimKind::Throw, ShimKind::Fetch, ShimKind::Env];

  pub fn file_name(self) -> &'static str {
    match self {
      ShimKind::Empty => "empty.js",
      ShimKind::Throw => "throw.js",
      ShimKind::Fetch => "fetch.js",
      ShimKind::Env => "env.js",
    }
  }

  pub fn source(self) -> &'static str {
    match self {
      ShimKind::Empty => "module.exports = {};\n",
      ShimKind::Throw => concat!(
        "function unsupported() {\n",
        "  throw new Error(\"This module is not supported in the target runtime\");\n",
        "}\n",
        "module.exports = unsupported;\n",
        "module.exports.default = unsupported;\n",
      ),
      ShimKind::Fetch => concat!(
        "module.exports = globalThis.fetch;\n",
        "module.exports.default = globalThis.fetch;\n",
        "module.exports.Headers = globalThis.Headers;\n",
        "module.exports.Request = globalThis.Request;\n",
        "module.exports.Response = globalThis.Response;\n",
      ),
      ShimKind::Env => concat!(
        "function loadEnvConfig() {\n",
        "  return { combinedEnv: process.env, loadedEnvFiles: [], parsedEnv: undefined };\n",
        "}\n",
        "module.exports = { loadEnvConfig, updateInitialEnv() {}, processEnv: process.env };\n",
      ),
    }
  }
}

/// Absolute locations of the shim modules under one shim root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShimPaths {
  pub empty: PathBuf,
  pub throw: PathBuf,
  pub fetch: PathBuf,
  pub env: PathBuf,
}

impl ShimPaths {
  pub fn under(shim_root: &Path) -> Self {
    Self {
      empty: shim_root.join(ShimKind::Empty.file_name()),
      throw: shim_root.join(ShimKind::Throw.file_name()),
      fetch: shim_root.join(ShimKind::Fetch.file_name()),
      env: shim_root.join(ShimKind::Env.file_name()),
    }
  }

  pub fn get(&self, kind: ShimKind) -> &Path {
    match kind {
      ShimKind::Empty => &self.empty,
      ShimKind::Throw => &self.throw,
      ShimKind::Fetch => &self.fetch,
      ShimKind::Env => &self.env,
    }
  }

  /// Writes every shim module to disk.
  pub fn write_all(&self) -> std::io::Result<()> {
    for kind in ShimKind::ALL {
      let path = self.get(kind);
      if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
      }
      std::fs::write(path, kind.source())?;
    }
    Ok(())
  }
}

use std::{
  ffi::OsString,
  path::{Path, PathBuf},
};

use serde_json::Value;
use sugar_path::SugarPath;

#[derive(Debug, Clone)]
pub struct ResolverOptions {
  /// Tried in order when a path has no exact match.
  pub extensions: Vec<String>,
  /// Package `exports` conditions, in addition to `default`.
  pub conditions: Vec<String>,
}

impl Default for ResolverOptions {
  fn default() -> Self {
    Self {
      extensions: vec![
        ".js".to_string(),
        ".cjs".to_string(),
        ".mjs".to_string(),
        ".json".to_string(),
      ],
      conditions: vec!["node".to_string(), "require".to_string()],
    }
  }
}

/// Node-style module resolution over the real filesystem.
#[derive(Debug)]
pub struct Resolver {
  cwd: PathBuf,
  options: ResolverOptions,
}

impl Resolver {
  pub fn with_options(cwd: PathBuf, options: ResolverOptions) -> Self {
    Self { cwd, options }
  }
}

pub fn is_path_like(specifier: &str) -> bool {
  specifier == "."
    || specifier == ".."
    || specifier.starts_with("./")
    || specifier.starts_with("../")
    || specifier.starts_with('/')
    || Path::new(specifier).is_absolute()
}

fn normalize(path: &Path) -> PathBuf {
  path.normalize().to_path_buf()
}

/// Splits `@scope/name/sub/path` into (`@scope/name`, `Some("sub/path")`).
fn split_package_specifier(specifier: &str) -> (&str, Option<&str>) {
  let name_len = if specifier.starts_with('@') {
    specifier
      .match_indices('/')
      .nth(1)
      .map_or(specifier.len(), |(idx, _)| idx)
  } else {
    specifier.find('/').unwrap_or(specifier.len())
  };
  let (name, rest) = specifier.split_at(name_len);
  let subpath = rest.strip_prefix('/').filter(|s| !s.is_empty());
  (name, subpath)
}

impl Resolver {
  pub fn resolve(&self, importer: Option<&str>, specifier: &str) -> edgepack_error::Result<String> {
    let base_dir = importer
      .and_then(|importer| Path::new(importer).parent())
      .map_or_else(|| self.cwd.clone(), Path::to_path_buf);

    let resolved = if is_path_like(specifier) {
      let path = if Path::new(specifier).is_absolute() {
        PathBuf::from(specifier)
      } else {
        normalize(&base_dir.join(specifier))
      };
      self
        .load_as_file(&path)
        .or_else(|| self.load_as_directory(&path))
    } else {
      self.load_node_modules(&base_dir, specifier)
    };

    match resolved {
      Some(path) => {
        tracing::trace!("resolved {} -> {}", specifier, path.display());
        Ok(path.to_string_lossy().to_string())
      }
      None => Err(edgepack_error::Error::unresolved_import(
        specifier,
        importer.map_or_else(|| self.cwd.clone(), PathBuf::from),
      )),
    }
  }

  fn load_as_file(&self, path: &Path) -> Option<PathBuf> {
    if path.is_file() {
      return Some(path.to_path_buf());
    }
    self.options.extensions.iter().find_map(|ext| {
      let mut candidate: OsString = path.as_os_str().to_owned();
      candidate.push(ext);
      let candidate = PathBuf::from(candidate);
      candidate.is_file().then_some(candidate)
    })
  }

  fn load_index(&self, dir: &Path) -> Option<PathBuf> {
    self
      .options
      .extensions
      .iter()
      .map(|ext| dir.join(format!("index{ext}")))
      .find(|candidate| candidate.is_file())
  }

  fn load_as_directory(&self, dir: &Path) -> Option<PathBuf> {
    if !dir.is_dir() {
      return None;
    }
    let main = read_package_json(dir)
      .as_ref()
      .and_then(|pkg| pkg.get("main"))
      .and_then(Value::as_str)
      .map(|main| normalize(&dir.join(main)));
    if let Some(main) = main {
      if let Some(found) = self.load_as_file(&main).or_else(|| self.load_index(&main)) {
        return Some(found);
      }
    }
    self.load_index(dir)
  }

  fn load_node_modules(&self, start: &Path, specifier: &str) -> Option<PathBuf> {
    let (name, subpath) = split_package_specifier(specifier);
    start
      .ancestors()
      .map(|dir| dir.join("node_modules").join(name))
      .find(|pkg_dir| pkg_dir.is_dir())
      .and_then(|pkg_dir| self.load_package(&pkg_dir, subpath))
  }

  fn load_package(&self, pkg_dir: &Path, subpath: Option<&str>) -> Option<PathBuf> {
    let manifest = read_package_json(pkg_dir);
    if let Some(exports) = manifest.as_ref().and_then(|pkg| pkg.get("exports")) {
      let key = subpath.map_or_else(|| ".".to_string(), |sub| format!("./{sub}"));
      // A package with `exports` hides everything it doesn't list.
      return self
        .resolve_exports(exports, &key)
        .and_then(|target| self.load_as_file(&normalize(&pkg_dir.join(target))));
    }
    match subpath {
      Some(sub) => {
        let path = pkg_dir.join(sub);
        self
          .load_as_file(&path)
          .or_else(|| self.load_as_directory(&path))
      }
      None => self.load_as_directory(pkg_dir),
    }
  }

  fn resolve_exports(&self, exports: &Value, key: &str) -> Option<String> {
    match exports {
      Value::Object(map) if map.keys().any(|k| k.starts_with('.')) => {
        if let Some(target) = map.get(key) {
          return self.resolve_conditions(target);
        }
        map.iter().find_map(|(pattern, target)| {
          let (prefix, suffix) = pattern.split_once('*')?;
          if key.len() < prefix.len() + suffix.len()
            || !key.starts_with(prefix)
            || !key.ends_with(suffix)
          {
            return None;
          }
          let star = &key[prefix.len()..key.len() - suffix.len()];
          self
            .resolve_conditions(target)
            .map(|resolved| resolved.replace('*', star))
        })
      }
      _ if key == "." => self.resolve_conditions(exports),
      _ => None,
    }
  }

  fn resolve_conditions(&self, value: &Value) -> Option<String> {
    match value {
      Value::String(target) => Some(target.clone()),
      Value::Object(map) => map.iter().find_map(|(condition, target)| {
        let enabled = condition == "default" || self.options.conditions.iter().any(|c| c == condition);
        if enabled {
          self.resolve_conditions(target)
        } else {
          None
        }
      }),
      Value::Array(items) => items.iter().find_map(|item| self.resolve_conditions(item)),
      _ => None,
    }
  }
}

fn read_package_json(dir: &Path) -> Option<Value> {
  let content = std::fs::read_to_string(dir.join("package.json")).ok()?;
  match serde_json::from_str(&content) {
    Ok(value) => Some(value),
    Err(err) => {
      tracing::warn!("ignoring malformed {}: {}", dir.join("package.json").display(), err);
      None
    }
  }
}

use std::{path::Path, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Loader {
  Js,
  Json,
}

impl Loader {
  /// Unknown extensions are treated like JavaScript.
  pub fn from_path(p: &Path) -> Self {
    p.extension()
      .and_then(|ext| ext.to_str())
      .map(Loader::from_str)
      .map(|l| l.unwrap_or(Loader::Js))
      .unwrap_or(Loader::Js)
  }
}

impl FromStr for Loader {
  type Err = edgepack_error::Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "js" | "cjs" | "mjs" => Ok(Self::Js),
      "json" => Ok(Self::Json),
      _ => Err(edgepack_error::Error::panic(format!(
        "Unknown loader value \"{}\"",
        s
      ))),
    }
  }
}

#[test]
fn loader_by_extension() {
  assert_eq!(Loader::from_path(Path::new("a/b.json")), Loader::Json);
  assert_eq!(Loader::from_path(Path::new("a/b.cjs")), Loader::Js);
  assert_eq!(Loader::from_path(Path::new("a/b.node")), Loader::Js);
  assert_eq!(Loader::from_path(Path::new("a/b")), Loader::Js);
}

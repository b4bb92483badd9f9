use std::{borrow::Cow, path::Path};

use sugar_path::SugarPath;

use crate::CWD;

pub trait PathExt {
  fn may_display_relative(&self) -> Cow<str>;
}

impl PathExt for Path {
  fn may_display_relative(&self) -> Cow<str> {
    let path = if CWD.is_set() && self.is_absolute() {
      CWD.with(|cwd| self.relative(cwd))
    } else {
      return self.to_string_lossy();
    };
    Cow::Owned(path.display().to_string())
  }
}

#[cfg(test)]
mod tests {
  use std::path::PathBuf;

  use super::*;

  #[test]
  fn relative_display_uses_scoped_cwd() {
    let cwd = PathBuf::from("/work/app");
    let shown = CWD.set(&cwd, || {
      Path::new("/work/app/.next/server.js")
        .may_display_relative()
        .to_string()
    });
    assert_eq!(shown, ".next/server.js");
    assert_eq!(
      Path::new("/work/app/x.js").may_display_relative(),
      "/work/app/x.js"
    );
  }
}

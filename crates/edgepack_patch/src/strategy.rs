use std::{fmt::Debug, path::Path};

use edgepack_error::{Error, Result};

use crate::replace_markers;

/// Rewrites the markers of an artifact in place.
pub trait PatchStrategy: Debug + Send + Sync {
  fn name(&self) -> &'static str;

  fn patch(&self, path: &Path) -> Result<()>;
}

/// Loads the whole artifact, substitutes in one pass and writes it back.
#[derive(Debug, Default, Clone, Copy)]
pub struct InProcessPatch;

impl PatchStrategy for InProcessPatch {
  fn name(&self) -> &'static str {
    "in-process"
  }

  fn patch(&self, path: &Path) -> Result<()> {
    let content = std::fs::read(path)
      .map_err(|e| Error::io_error(e).context(format!("Read artifact: {}", path.display())))?;
    if let Some(patched) = replace_markers(&content) {
      std::fs::write(path, patched)
        .map_err(|e| Error::io_error(e).context(format!("Write artifact: {}", path.display())))?;
    }
    Ok(())
  }
}

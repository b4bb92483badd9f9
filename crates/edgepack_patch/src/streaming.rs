use std::{
  io::{BufRead, BufReader, BufWriter, Write},
  path::Path,
};

use edgepack_error::{Error, Result};
use tempfile::NamedTempFile;

use crate::{PatchStrategy, MARKER_RE, MARKER_REPLACEMENT};

/// Substitutes line by line into a temporary file next to the artifact, then
/// moves it over the artifact. Markers never span lines, so memory use is
/// bounded by the longest line.
#[derive(Debug, Default, Clone, Copy)]
pub struct StreamingPatch;

impl StreamingPatch {
  fn patch_inner(path: &Path) -> std::io::Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let input = std::fs::File::open(path)?;
    let permissions = input.metadata()?.permissions();
    let mut reader = BufReader::new(input);
    let temp = NamedTempFile::new_in(dir)?;
    let mut writer = BufWriter::new(temp);

    let mut line = Vec::new();
    while reader.read_until(b'\n', &mut line)? > 0 {
      writer.write_all(&MARKER_RE.replace_all(&line, MARKER_REPLACEMENT))?;
      line.clear();
    }

    let temp = writer.into_inner().map_err(|err| err.into_error())?;
    temp.as_file().set_permissions(permissions)?;
    temp.persist(path).map_err(|err| err.error)?;
    Ok(())
  }
}

impl PatchStrategy for StreamingPatch {
  fn name(&self) -> &'static str {
    "streaming"
  }

  fn patch(&self, path: &Path) -> Result<()> {
    Self::patch_inner(path)
      .map_err(|e| Error::io_error(e).context(format!("Stream artifact: {}", path.display())))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::InProcessPatch;

  #[test]
  fn matches_in_process_and_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let content = "var a = __require(\"a\");\r\n__require2.cache\nno newline __require(x)";
    let streamed = dir.path().join("streamed.mjs");
    let in_memory = dir.path().join("in_memory.mjs");
    std::fs::write(&streamed, content).unwrap();
    std::fs::write(&in_memory, content).unwrap();

    StreamingPatch.patch(&streamed).unwrap();
    InProcessPatch.patch(&in_memory).unwrap();
    let once = std::fs::read_to_string(&streamed).unwrap();
    assert_eq!(once, std::fs::read_to_string(&in_memory).unwrap());

    StreamingPatch.patch(&streamed).unwrap();
    assert_eq!(std::fs::read_to_string(&streamed).unwrap(), once);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 2);
  }
}

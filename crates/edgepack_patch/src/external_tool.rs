use std::{
  path::{Path, PathBuf},
  process::Command,
};

use edgepack_error::{Error, Result};

use crate::{PatchStrategy, SED_SCRIPTS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SedFlavour {
  /// `-i` takes no argument.
  Gnu,
  /// `-i` requires a backup suffix.
  Bsd,
}

impl SedFlavour {
  pub fn detect() -> Self {
    if cfg!(any(
      target_os = "macos",
      target_os = "freebsd",
      target_os = "openbsd",
      target_os = "netbsd"
    )) {
      SedFlavour::Bsd
    } else {
      SedFlavour::Gnu
    }
  }
}

const BACKUP_SUFFIX: &str = ".bak";

/// Runs `sed -E` once per marker form, in place.
#[derive(Debug, Clone)]
pub struct ExternalToolPatch {
  program: PathBuf,
  flavour: SedFlavour,
}

impl Default for ExternalToolPatch {
  fn default() -> Self {
    Self {
      program: PathBuf::from("sed"),
      flavour: SedFlavour::detect(),
    }
  }
}

impl ExternalToolPatch {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_program(program: impl Into<PathBuf>, flavour: SedFlavour) -> Self {
    Self {
      program: program.into(),
      flavour,
    }
  }

  fn tool_name(&self) -> String {
    self.program.display().to_string()
  }

  fn run_script(&self, script: &str, path: &Path) -> Result<()> {
    let mut command = Command::new(&self.program);
    command.arg("-E").arg("-i");
    if self.flavour == SedFlavour::Bsd {
      command.arg(BACKUP_SUFFIX);
    }
    command.arg(script).arg(path);
    tracing::debug!("running {:?}", command);

    let ran = self.run(&mut command);
    // A failed run may have written the backup too.
    let cleaned = match self.flavour {
      SedFlavour::Bsd => self.remove_backup(path),
      SedFlavour::Gnu => Ok(()),
    };
    ran.and(cleaned)
  }

  fn run(&self, command: &mut Command) -> Result<()> {
    let output = command
      .output()
      .map_err(|e| Error::patch_tool_failed(self.tool_name(), e))?;
    if output.status.success() {
      return Ok(());
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    Err(Error::patch_tool_failed(
      self.tool_name(),
      format!("{}: {}", output.status, stderr.trim()),
    ))
  }

  fn remove_backup(&self, path: &Path) -> Result<()> {
    let mut backup = path.as_os_str().to_owned();
    backup.push(BACKUP_SUFFIX);
    match std::fs::remove_file(PathBuf::from(backup)) {
      Ok(()) => Ok(()),
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
      Err(e) => Err(Error::patch_tool_failed(self.tool_name(), e)),
    }
  }
}

impl PatchStrategy for ExternalToolPatch {
  fn name(&self) -> &'static str {
    "external-tool"
  }

  /// Each script rewrites the file on its own, so a failure after the first
  /// leaves one marker form replaced and the other in place.
  fn patch(&self, path: &Path) -> Result<()> {
    for (idx, script) in SED_SCRIPTS.iter().enumerate() {
      self.run_script(script, path).map_err(|err| {
        if idx == 0 {
          err
        } else {
          err.context(format!("{} may be partially patched", path.display()))
        }
      })?;
    }
    Ok(())
  }
}

use std::path::Path;

use edgepack_error::{Error, Result};

use crate::{ExternalToolPatch, InProcessPatch, PatchLimits, PatchStrategy, PatchTier};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
  TooLarge { limit: u64 },
  ToolFailed { tool: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchOutcome {
  Patched { strategy: &'static str },
  Skipped(SkipReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchReport {
  pub size: u64,
  pub tier: PatchTier,
  pub outcome: PatchOutcome,
}

impl PatchReport {
  pub fn is_patched(&self) -> bool {
    matches!(self.outcome, PatchOutcome::Patched { .. })
  }
}

/// Picks a strategy by artifact size and runs it.
#[derive(Debug)]
pub struct ArtifactPatcher {
  limits: PatchLimits,
  small: InProcessPatch,
  large: Box<dyn PatchStrategy>,
}

impl Default for ArtifactPatcher {
  fn default() -> Self {
    Self {
      limits: PatchLimits::default(),
      small: InProcessPatch,
      large: Box::new(ExternalToolPatch::new()),
    }
  }
}

impl ArtifactPatcher {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_limits(mut self, limits: PatchLimits) -> Self {
    self.limits = limits;
    self
  }

  /// Used for artifacts between the two limits instead of `sed`.
  pub fn with_large_strategy(mut self, strategy: Box<dyn PatchStrategy>) -> Self {
    self.large = strategy;
    self
  }

  pub fn limits(&self) -> PatchLimits {
    self.limits
  }

  /// Only I/O on the in-process path is an error. Whatever goes wrong with
  /// the large-file strategy leaves the artifact as written and is reported
  /// as a skip.
  #[tracing::instrument(skip(self))]
  pub fn patch(&self, path: &Path) -> Result<PatchReport> {
    let size = std::fs::metadata(path)
      .map_err(|e| Error::io_error(e).context(format!("Stat artifact: {}", path.display())))?
      .len();
    let tier = self.limits.tier_for(size);

    let outcome = match tier {
      PatchTier::InProcess => {
        self.small.patch(path)?;
        PatchOutcome::Patched {
          strategy: self.small.name(),
        }
      }
      PatchTier::ExternalTool => match self.large.patch(path) {
        Ok(()) => PatchOutcome::Patched {
          strategy: self.large.name(),
        },
        Err(err) => {
          tracing::warn!(
            "Patching {} ({} bytes) did not complete, markers may be only partly replaced: [{}] {}",
            path.display(),
            size,
            err.kind.code(),
            err
          );
          PatchOutcome::Skipped(SkipReason::ToolFailed {
            tool: self.large.name().to_string(),
            reason: err.to_string(),
          })
        }
      },
      PatchTier::Skip => {
        tracing::warn!(
          "Skipped patching {}: {} bytes is over the {} byte limit, `require` markers are left in place",
          path.display(),
          size,
          self.limits.external_tool
        );
        PatchOutcome::Skipped(SkipReason::TooLarge {
          limit: self.limits.external_tool,
        })
      }
    };

    Ok(PatchReport {
      size,
      tier,
      outcome,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{SedFlavour, StreamingPatch};

  const CONTENT: &str = "const a = __require(\"a\");\n";

  fn artifact() -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("handler.mjs");
    std::fs::write(&path, CONTENT).unwrap();
    (dir, path)
  }

  #[test]
  fn small_artifacts_are_patched_in_process() {
    let (_dir, path) = artifact();
    let report = ArtifactPatcher::new().patch(&path).unwrap();
    assert_eq!(report.tier, PatchTier::InProcess);
    assert_eq!(
      report.outcome,
      PatchOutcome::Patched {
        strategy: "in-process"
      }
    );
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "const a = require(\"a\");\n");
  }

  #[test]
  fn tool_failure_skips_and_keeps_artifact() {
    let (dir, path) = artifact();
    let patcher = ArtifactPatcher::new()
      .with_limits(PatchLimits {
        in_process: 1,
        external_tool: 1 << 20,
      })
      .with_large_strategy(Box::new(ExternalToolPatch::with_program(
        dir.path().join("missing-sed"),
        SedFlavour::Gnu,
      )));
    let report = patcher.patch(&path).unwrap();
    assert_eq!(report.tier, PatchTier::ExternalTool);
    assert!(matches!(
      report.outcome,
      PatchOutcome::Skipped(SkipReason::ToolFailed { .. })
    ));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), CONTENT);
  }

  #[test]
  fn streaming_can_stand_in_for_the_tool() {
    let (_dir, path) = artifact();
    let patcher = ArtifactPatcher::new()
      .with_limits(PatchLimits {
        in_process: 1,
        external_tool: 1 << 20,
      })
      .with_large_strategy(Box::new(StreamingPatch));
    let report = patcher.patch(&path).unwrap();
    assert!(report.is_patched());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "const a = require(\"a\");\n");
  }

  #[test]
  fn oversized_artifacts_are_skipped() {
    let (_dir, path) = artifact();
    let patcher = ArtifactPatcher::new().with_limits(PatchLimits {
      in_process: 1,
      external_tool: 2,
    });
    let report = patcher.patch(&path).unwrap();
    assert_eq!(report.tier, PatchTier::Skip);
    assert_eq!(
      report.outcome,
      PatchOutcome::Skipped(SkipReason::TooLarge { limit: 2 })
    );
    assert_eq!(report.size, CONTENT.len() as u64);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), CONTENT);
  }
}

pub const MIB: u64 = 1024 * 1024;

/// Largest artifact patched in memory.
pub const IN_PROCESS_LIMIT: u64 = 100 * MIB;
/// Largest artifact patched at all.
pub const EXTERNAL_TOOL_LIMIT: u64 = 500 * MIB;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchTier {
  InProcess,
  ExternalTool,
  Skip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatchLimits {
  pub in_process: u64,
  pub external_tool: u64,
}

impl Default for PatchLimits {
  fn default() -> Self {
    Self {
      in_process: IN_PROCESS_LIMIT,
      external_tool: EXTERNAL_TOOL_LIMIT,
    }
  }
}

impl PatchLimits {
  pub fn tier_for(&self, size: u64) -> PatchTier {
    if size > self.external_tool {
      PatchTier::Skip
    } else if size > self.in_process {
      PatchTier::ExternalTool
    } else {
      PatchTier::InProcess
    }
  }
}

impl PatchTier {
  pub fn for_size(size: u64) -> PatchTier {
    PatchLimits::default().tier_for(size)
  }
}

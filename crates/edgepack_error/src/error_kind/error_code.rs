// Configuration
pub const MISSING_MANIFEST: &str = "MISSING_MANIFEST";
pub const INVALID_MANIFEST: &str = "INVALID_MANIFEST";
pub const INVALID_CONFIG: &str = "INVALID_CONFIG";
pub const INVALID_ALIAS_TARGET: &str = "INVALID_ALIAS_TARGET";

// Rewrite rules
pub const RULE_APPLICATION: &str = "RULE_APPLICATION";

// Post-bundle patching
pub const PATCH_TOOL: &str = "PATCH_TOOL";

// Bundling
pub const UNRESOLVED_ENTRY: &str = "UNRESOLVED_ENTRY";
pub const UNRESOLVED_IMPORT: &str = "UNRESOLVED_IMPORT";
pub const PANIC: &str = "PANIC";

pub const IO_ERROR: &str = "IO_ERROR";

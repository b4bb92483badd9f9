//! Decides, per imported package, whether it is bundled, left external or
//! replaced by a shim.
//!
//! Everything here is a pure function of the built-in [DefaultTables] and the
//! user's [BundleConfig]; the tables are passed in explicitly and never mutated.

mod config;
pub use config::*;
mod defaults;
pub use defaults::*;
mod policy;
pub use policy::*;
mod shims;
pub use shims::*;

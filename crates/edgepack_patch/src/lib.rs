//! Post-bundle normalisation of the `require` markers in a written artifact.
//!
//! The strategy is picked by the artifact's size: small files are patched in
//! memory, large ones by an external stream editor, and anything bigger is
//! left alone with a warning.
mod markers;
pub use markers::*;
mod tier;
pub use tier::*;
mod strategy;
pub use strategy::*;
mod external_tool;
pub use external_tool::*;
mod streaming;
pub use streaming::*;
mod patcher;
pub use patcher::*;

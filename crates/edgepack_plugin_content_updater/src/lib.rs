//! Ordered content rewriting for the files the bundler visits.
//!
//! Rules run in registration order and thread their output through a
//! per-file ledger. The last stage, appended by [ContentUpdaterBuilder::build],
//! hands the final content back to the bundler.
mod matcher;
pub use matcher::*;
mod rule;
pub use rule::*;
mod updater;
pub use updater::*;

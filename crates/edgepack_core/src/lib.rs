//! A small CommonJS bundling engine.
//!
//! Modules are loaded concurrently, run through the build plugins' hooks and
//! rendered into a single artifact with a module registry. There is no
//! tree-shaking, scope hoisting or minification.
use std::sync::Arc;

mod bundler;
pub use bundler::*;
mod bundle;
pub use bundle::*;
mod external_module;
pub use external_module::*;
mod graph;
pub use graph::*;
mod metafile;
pub use metafile::*;
mod module_loader;
mod norm_or_ext;
pub(crate) use norm_or_ext::*;
mod normal_module;
pub use normal_module::*;
mod options;
pub use options::*;
mod plugin_driver;
pub(crate) use plugin_driver::*;
mod scan;
pub use scan::*;
mod utils;
pub use utils::*;

use edgepack_common::ModuleId;
use edgepack_resolver::Resolver;
use rustc_hash::FxHashMap;

pub(crate) type ResolvedModuleIds = FxHashMap<String, ModuleId>;
pub(crate) type SharedResolver = Arc<Resolver>;
pub(crate) type ModuleById = FxHashMap<ModuleId, NormOrExt>;

// public exports

pub type BuildResult<T> = edgepack_error::Result<T>;
pub type BuildError = edgepack_error::Error;
pub use edgepack_plugin::PluginEffect;
pub use edgepack_resolver::ResolverOptions;

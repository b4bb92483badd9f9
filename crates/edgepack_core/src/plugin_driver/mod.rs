mod build_plugin_driver;
pub(crate) use build_plugin_driver::*;

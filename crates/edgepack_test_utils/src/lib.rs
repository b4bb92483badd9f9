mod test_config;
pub use test_config::*;
mod tester;
pub use tester::*;
mod tree;
pub use tree::*;

use std::path::PathBuf;

use common::run_fixture;
use testing_macros::fixture;

mod common;

#[fixture("./tests/fixtures/**/test.config.json")]
fn test(path: PathBuf) {
  run_fixture(&path)
}

use std::path::Path;

use edgepack_test_utils::Tester;

pub fn run_fixture(test_config_path: &Path) {
  let fixture_path = std::fs::canonicalize(test_config_path.parent().unwrap()).unwrap();
  let tester = Tester::from_config_path(test_config_path);
  let expected = &tester.config.expected;

  let result = tokio::runtime::Runtime::new()
    .unwrap()
    .block_on(tester.build(fixture_path.clone()));

  match (result, &expected.error) {
    (Ok(output), None) => {
      let content = output
        .assets
        .iter()
        .map(|asset| asset.content.as_str())
        .collect::<Vec<_>>()
        .join("\n");
      for needle in &expected.contains {
        assert!(
          content.contains(needle.as_str()),
          "{}: expected output to contain {needle:?}\n{content}",
          fixture_path.display()
        );
      }
      for needle in &expected.not_contains {
        assert!(
          !content.contains(needle.as_str()),
          "{}: expected output not to contain {needle:?}\n{content}",
          fixture_path.display()
        );
      }
      if let Some(warnings) = expected.warnings {
        assert_eq!(tester.warnings_len(), warnings, "{}", fixture_path.display());
      }
    }
    (Err(err), Some(code)) => assert_eq!(err.kind.code(), code, "{err}"),
    (Ok(_), Some(code)) => panic!("{}: expected error {code}", fixture_path.display()),
    (Err(err), None) => panic!("{}: {err}", fixture_path.display()),
  }
}

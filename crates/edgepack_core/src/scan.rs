use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// `require("x")` / `require('x')` with a literal specifier, not preceded by
/// `.` or an identifier character. Group 1 keeps the preceding character.
pub static REQUIRE_CALL_RE: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r#"(^|[^.\w$])require\s*\(\s*(?:'([^'\\\n]*)'|"([^"\\\n]*)")\s*\)"#)
    .expect("valid regex")
});

/// Any remaining bare `require(` or `require.` that the bundle can't satisfy statically.
pub static RUNTIME_REQUIRE_RE: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"(^|[^.\w$])require(\s*[(.])").expect("valid regex"));

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScanResult {
  /// Statically required specifiers, deduplicated, in source order.
  pub dependencies: Vec<String>,
}

pub(crate) fn specifier_of<'c>(caps: &'c Captures) -> Option<&'c str> {
  caps
    .get(2)
    .or_else(|| caps.get(3))
    .map(|m| m.as_str())
}

/// Lexical scan for static `require` calls.
///
/// This is not a parser: a `require("x")` inside a string or comment is
/// picked up as well.
pub fn scan(code: &str) -> ScanResult {
  let mut dependencies: Vec<String> = vec![];
  for caps in REQUIRE_CALL_RE.captures_iter(code) {
    if let Some(specifier) = specifier_of(&caps) {
      if !dependencies.iter().any(|dep| dep == specifier) {
        dependencies.push(specifier.to_string());
      }
    }
  }
  ScanResult { dependencies }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn collects_unique_literal_requires_in_order() {
    let code = r#"
const a = require("./a");
const b = require( './b' );
const again = require("./a");
const dynamic = require(name);
obj.require("./not-a-dep");
my_require("./nor-this");
"#;
    assert_eq!(scan(code).dependencies, vec!["./a".to_string(), "./b".to_string()]);
  }

  #[test]
  fn runtime_require_matches_calls_and_members_only() {
    assert!(RUNTIME_REQUIRE_RE.is_match("require(name)"));
    assert!(RUNTIME_REQUIRE_RE.is_match("x = require.resolve('a')"));
    assert!(!RUNTIME_REQUIRE_RE.is_match("const required = 1"));
    assert!(!RUNTIME_REQUIRE_RE.is_match("__edgepack_load(\"a\")"));
  }
}

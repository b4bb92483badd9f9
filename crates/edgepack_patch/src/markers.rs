use once_cell::sync::Lazy;
use regex::bytes::Regex;

/// `__require`, an optional ASCII digit, then `(` or `.`. Matches exactly what
/// [SED_SCRIPTS] match.
pub static MARKER_RE: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"__require[0-9]?([(.])").expect("valid regex"));

pub const MARKER_REPLACEMENT: &[u8] = b"require$1";

/// The same substitution as two `sed -E` scripts, one per marker form.
pub const SED_SCRIPTS: [&str; 2] = [
  r"s/__require[0-9]?\(/require(/g",
  r"s/__require[0-9]?\./require./g",
];

/// Returns `None` when there's nothing to replace.
pub fn replace_markers(input: &[u8]) -> Option<Vec<u8>> {
  if !MARKER_RE.is_match(input) {
    return None;
  }
  Some(MARKER_RE.replace_all(input, MARKER_REPLACEMENT).into_owned())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn replaces_both_forms() {
    let out = replace_markers(b"__require(\"a\"); __require2.resolve(\"b\"); __require9(c)").unwrap();
    assert_eq!(
      String::from_utf8(out).unwrap(),
      "require(\"a\"); require.resolve(\"b\"); require(c)"
    );
  }

  #[test]
  fn leaves_other_names_alone() {
    assert_eq!(replace_markers(b"__requireX(a); __require = 1; __require23(b)"), None);
  }

  #[test]
  fn only_ascii_digits_belong_to_the_marker() {
    assert_eq!(replace_markers("__require\u{0663}(a)".as_bytes()), None);
    assert_eq!(replace_markers("__require\u{FF13}.x".as_bytes()), None);
  }

  #[test]
  fn idempotent() {
    let once = replace_markers(b"__require(\"a\")").unwrap();
    assert_eq!(replace_markers(&once), None);
  }
}

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{BuildError, BuildResult};

/// Name the bundle uses for the host's `require`. Later normalised back to
/// `require` by the post-bundle patch step.
pub const REQUIRE_MARKER: &str = "__require";

static IDENT_RE: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"[A-Za-z_$][\w$]*").expect("valid regex"));

/// Picks `__require`, or `__require2`..`__require9` when a bundled module
/// already uses the plain name.
pub fn choose_require_marker<'a>(sources: impl IntoIterator<Item = &'a str>) -> BuildResult<String> {
  let mut taken = [false; 10];
  for source in sources {
    for ident in IDENT_RE.find_iter(source) {
      let Some(rest) = ident.as_str().strip_prefix(REQUIRE_MARKER) else {
        continue;
      };
      match rest.as_bytes() {
        [] => taken[0] = true,
        [digit @ b'2'..=b'9'] => taken[usize::from(digit - b'0')] = true,
        _ => {}
      }
    }
  }
  let candidate = std::iter::once(0)
    .chain(2..=9)
    .find(|idx| !taken[*idx])
    .ok_or_else(|| {
      BuildError::panic(format!("Every {REQUIRE_MARKER} name is already declared by a bundled module"))
    })?;
  Ok(if candidate == 0 {
    REQUIRE_MARKER.to_string()
  } else {
    format!("{REQUIRE_MARKER}{candidate}")
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn plain_marker_when_free() {
    assert_eq!(choose_require_marker(["const a = 1;"]).unwrap(), "__require");
    assert_eq!(choose_require_marker(["var __requireX = 1;"]).unwrap(), "__require");
  }

  #[test]
  fn digit_suffix_on_collision() {
    assert_eq!(
      choose_require_marker(["var __require = 1;", "__require2()"]).unwrap(),
      "__require3"
    );
  }
}

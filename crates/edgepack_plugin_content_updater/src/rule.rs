use std::fmt::Debug;

use edgepack_common::ModuleId;
use edgepack_error::{Error, Result};
use edgepack_plugin::Context;
use regex::Regex;

use crate::FileMatcher;

/// One named rewrite of file content.
///
/// Implementations must not keep state across files: the bundler calls them
/// concurrently and in no particular file order.
pub trait RewriteRule: Debug + Send + Sync {
  fn id(&self) -> &str;

  fn matches(&self, id: &ModuleId, code: &str) -> bool;

  /// `Ok(None)` leaves the content as is. Effects go through `ctx` and are
  /// applied after the bundling pass.
  fn transform(&self, ctx: &mut Context, id: &ModuleId, code: &str) -> Result<Option<String>>;
}

/// Replaces every occurrence of a literal.
#[derive(Debug, Clone)]
pub struct ReplaceRule {
  id: String,
  matcher: FileMatcher,
  from: String,
  to: String,
  required: bool,
}

impl ReplaceRule {
  pub fn new(
    id: impl Into<String>,
    matcher: FileMatcher,
    from: impl Into<String>,
    to: impl Into<String>,
  ) -> Self {
    Self {
      id: id.into(),
      matcher,
      from: from.into(),
      to: to.into(),
      required: false,
    }
  }

  /// A matched file without the literal fails the build instead of passing through.
  pub fn required(mut self) -> Self {
    self.required = true;
    self
  }
}

impl RewriteRule for ReplaceRule {
  fn id(&self) -> &str {
    &self.id
  }

  fn matches(&self, id: &ModuleId, code: &str) -> bool {
    self.matcher.matches(id, code)
  }

  fn transform(&self, _ctx: &mut Context, id: &ModuleId, code: &str) -> Result<Option<String>> {
    if !code.contains(self.from.as_str()) {
      if self.required {
        return Err(Error::rule_application(
          &self.id,
          id.as_path(),
          format!("expected to find {:?}", self.from),
        ));
      }
      return Ok(None);
    }
    Ok(Some(code.replace(self.from.as_str(), &self.to)))
  }
}

/// Replaces every match of a regex. `replacement` may use `$1`-style groups.
#[derive(Debug, Clone)]
pub struct RegexRule {
  id: String,
  matcher: FileMatcher,
  pattern: Regex,
  replacement: String,
  required: bool,
}

impl RegexRule {
  pub fn new(
    id: impl Into<String>,
    matcher: FileMatcher,
    pattern: &str,
    replacement: impl Into<String>,
  ) -> Result<Self> {
    let id = id.into();
    let pattern = Regex::new(pattern)
      .map_err(|err| Error::rule_application(&id, "<rule definition>", err))?;
    Ok(Self {
      id,
      matcher,
      pattern,
      replacement: replacement.into(),
      required: false,
    })
  }

  pub fn required(mut self) -> Self {
    self.required = true;
    self
  }
}

impl RewriteRule for RegexRule {
  fn id(&self) -> &str {
    &self.id
  }

  fn matches(&self, id: &ModuleId, code: &str) -> bool {
    self.matcher.matches(id, code)
  }

  fn transform(&self, _ctx: &mut Context, id: &ModuleId, code: &str) -> Result<Option<String>> {
    if !self.pattern.is_match(code) {
      if self.required {
        return Err(Error::rule_application(
          &self.id,
          id.as_path(),
          format!("pattern /{}/ did not match", self.pattern.as_str()),
        ));
      }
      return Ok(None);
    }
    Ok(Some(
      self
        .pattern
        .replace_all(code, self.replacement.as_str())
        .into_owned(),
    ))
  }
}

use crate::Error;

/// A collection of edgepack [Error].
///
/// [Errors] is never empty. You could only construct a `Errors` from a `Error`.
#[derive(Debug)]
pub struct Errors(Vec<Error>);

impl Errors {
  pub fn new(err: Error) -> Self {
    Self(vec![err])
  }

  pub fn push(&mut self, error: Error) {
    self.0.push(error);
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn into_vec(self) -> Vec<Error> {
    self.0
  }

  /// Returns `None` for an empty `Vec`, so an `Errors` is never empty.
  pub fn from_vec(vec: Vec<Error>) -> Option<Self> {
    if vec.is_empty() {
      None
    } else {
      Some(Self(vec))
    }
  }

  /// Collapses the collection into its first error, attaching the rest as contexts.
  pub fn into_first(self) -> Error {
    let mut iter = self.0.into_iter();
    // `Errors` always holds at least one error.
    let first = iter.next().unwrap_or_else(|| Error::panic("empty Errors".to_string()));
    iter.fold(first, |acc, other| {
      acc.context(format!("also failed: [{}] {}", other.kind.code(), other.kind))
    })
  }
}

impl Extend<Error> for Errors {
  fn extend<T: IntoIterator<Item = Error>>(&mut self, iter: T) {
    self.0.extend(iter)
  }
}

impl From<Error> for Errors {
  fn from(error: Error) -> Self {
    Self(vec![error])
  }
}

impl From<std::io::Error> for Errors {
  fn from(error: std::io::Error) -> Self {
    Self(vec![Error::io_error(error)])
  }
}

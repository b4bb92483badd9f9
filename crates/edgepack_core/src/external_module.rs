use edgepack_common::ModuleId;

/// A specifier left for the host runtime. It's required through the
/// `createRequire` marker at runtime and never rendered into the registry.
#[derive(Debug)]
pub struct ExternalModule {
  pub id: ModuleId,
}

impl ExternalModule {
  pub(crate) fn new(id: ModuleId) -> Self {
    Self { id }
  }
}

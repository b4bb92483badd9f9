use edgepack_common::ModuleId;

use crate::{external_module::ExternalModule, normal_module::NormalModule};

#[derive(Debug)]
pub enum NormOrExt {
  Normal(NormalModule),
  External(ExternalModule),
}

impl NormOrExt {
  pub fn id(&self) -> &ModuleId {
    match self {
      NormOrExt::Normal(module) => &module.id,
      NormOrExt::External(module) => &module.id,
    }
  }

  pub fn dependencies(&self) -> &[ModuleId] {
    static DUMMY: [ModuleId; 0] = [];
    match self {
      NormOrExt::Normal(module) => &module.dependencies,
      NormOrExt::External(_) => &DUMMY,
    }
  }

  /// Externals are never rendered, so they have no place in the order.
  pub fn exec_order(&self) -> Option<usize> {
    self.as_norm().map(|module| module.exec_order)
  }

  pub fn set_exec_order(&mut self, exec_order: usize) {
    if let NormOrExt::Normal(module) = self {
      module.exec_order = exec_order;
    }
  }

  pub fn as_norm(&self) -> Option<&NormalModule> {
    match self {
      NormOrExt::Normal(m) => Some(m),
      _ => None,
    }
  }
}

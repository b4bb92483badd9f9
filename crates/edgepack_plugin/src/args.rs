use edgepack_common::ModuleId;

#[derive(Debug, Clone)]
pub struct ResolveArgs<'a> {
  pub importer: Option<&'a ModuleId>,
  pub specifier: &'a str,
}

#[derive(Debug)]
pub struct TransformArgs<'a> {
  pub id: &'a ModuleId,
  pub code: &'a String,
}

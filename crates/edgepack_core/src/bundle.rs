use std::collections::BTreeMap;

use edgepack_runtime_helpers::RuntimeHelpers;
use rayon::prelude::*;

use crate::{
  choose_require_marker, normal_module::RenderContext, Asset, BuildResult, Graph, InputOptions,
  Metafile, MetafileImport, MetafileInput, MetafileOutput, MetafileOutputInput, NormOrExt,
  OutputOptions,
};

#[derive(Debug)]
pub struct Bundle<'a> {
  pub input_options: &'a InputOptions,
  pub output_options: &'a OutputOptions,
  pub graph: &'a Graph,
}

impl<'a> Bundle<'a> {
  pub fn new(
    input_options: &'a InputOptions,
    output_options: &'a OutputOptions,
    graph: &'a Graph,
  ) -> Self {
    Self {
      input_options,
      output_options,
      graph,
    }
  }

  fn collect_inputs(&self) -> BTreeMap<String, MetafileInput> {
    let cwd = &self.input_options.cwd;
    self
      .graph
      .module_by_id
      .values()
      .filter_map(NormOrExt::as_norm)
      .map(|module| {
        let imports = module
          .dependencies
          .iter()
          .map(|dep| MetafileImport {
            path: dep.stable_key(cwd),
            external: dep.is_external(),
          })
          .collect();
        (
          module.key(cwd),
          MetafileInput {
            bytes: module.original_bytes,
            imports,
          },
        )
      })
      .collect()
  }

  /// One asset per entry. Every module reachable from the entry is wrapped
  /// into a registry keyed by its cwd-relative path.
  pub fn generate(&self) -> BuildResult<(Vec<Asset>, Metafile)> {
    let cwd = self.input_options.cwd.as_path();
    let mut metafile = Metafile {
      inputs: self.collect_inputs(),
      outputs: Default::default(),
    };

    let mut assets = vec![];
    for (entry, item) in self.graph.entries.iter().zip(&self.input_options.input) {
      let modules = self.graph.normal_modules_of(entry);
      let require_marker = choose_require_marker(modules.iter().map(|m| m.code.as_str()))?;
      let ctx = RenderContext {
        cwd,
        require_marker: &require_marker,
      };

      // `collect` on an indexed parallel iterator keeps the input order.
      let rendered = modules
        .par_iter()
        .map(|module| (module.key(cwd), module.render(&ctx)))
        .collect::<Vec<_>>();

      let helpers = RuntimeHelpers::new();
      helpers.module_registry();
      if self.output_options.format.is_es() {
        helpers.create_require();
      }
      let (imports, snippets): (Vec<_>, Vec<_>) = helpers
        .generate_helpers()
        .into_iter()
        .partition(|snippet| snippet.starts_with("import "));

      let entry_key = serde_json::Value::from(entry.stable_key(cwd)).to_string();
      let mut code = String::new();
      imports.iter().for_each(|snippet| code.push_str(snippet));
      // The host `require` under the marker name, so the artifact also runs unpatched.
      code.push_str(&format!("var {require_marker} = require;\n"));
      code.push_str("var __edgepack_modules = {\n");
      code.push_str(
        &rendered
          .iter()
          .map(|(_, rendered)| rendered.as_str())
          .collect::<Vec<_>>()
          .join(",\n"),
      );
      code.push_str("\n};\n");
      snippets.iter().for_each(|snippet| code.push_str(snippet));
      if self.output_options.format.is_es() {
        code.push_str(&format!("export default __edgepack_load({entry_key});\n"));
      } else {
        code.push_str(&format!("module.exports = __edgepack_load({entry_key});\n"));
      }

      let filename = self.output_options.artifact_file_name(&item.name);
      metafile.outputs.insert(
        filename.clone(),
        MetafileOutput {
          bytes: code.len(),
          entry_point: entry.stable_key(cwd),
          inputs: rendered
            .into_iter()
            .map(|(key, rendered)| {
              (
                key,
                MetafileOutputInput {
                  bytes_in_output: rendered.len(),
                },
              )
            })
            .collect(),
        },
      );
      assets.push(Asset {
        filename,
        content: code,
      });
    }

    Ok((assets, metafile))
  }
}

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::BuildResult;

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metafile {
  pub inputs: BTreeMap<String, MetafileInput>,
  pub outputs: BTreeMap<String, MetafileOutput>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetafileInput {
  pub bytes: usize,
  pub imports: Vec<MetafileImport>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetafileImport {
  pub path: String,
  pub external: bool,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetafileOutput {
  pub bytes: usize,
  pub entry_point: String,
  pub inputs: BTreeMap<String, MetafileOutputInput>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetafileOutputInput {
  pub bytes_in_output: usize,
}

impl Metafile {
  /// The artifact may change size after it's written, e.g. when patched.
  pub fn set_output_bytes(&mut self, output: &str, bytes: usize) {
    if let Some(out) = self.outputs.get_mut(output) {
      out.bytes = bytes;
    }
  }

  pub fn to_json(&self) -> BuildResult<String> {
    serde_json::to_string_pretty(self)
      .map_err(|err| edgepack_error::anyhow::Error::from(err).into())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn serializes_with_camel_case_keys() {
    let mut metafile = Metafile::default();
    metafile.outputs.insert(
      "handler.mjs".to_string(),
      MetafileOutput {
        bytes: 10,
        entry_point: "server.js".to_string(),
        inputs: BTreeMap::from([(
          "server.js".to_string(),
          MetafileOutputInput { bytes_in_output: 7 },
        )]),
      },
    );
    metafile.set_output_bytes("handler.mjs", 12);
    let json = metafile.to_json().unwrap();
    assert!(json.contains("\"entryPoint\": \"server.js\""));
    assert!(json.contains("\"bytesInOutput\": 7"));
    assert!(json.contains("\"bytes\": 12"));
  }
}

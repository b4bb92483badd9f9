use edgepack_plugin::BuildPlugin;
use tracing::instrument;

use crate::{
  BuildPluginDriver, BuildResult, Bundle, Graph, InputOptions, Metafile, OutputOptions,
  PluginEffect, SharedBuildPluginDriver,
};

pub struct BundlerCore {
  input_options: InputOptions,
  plugin_driver: SharedBuildPluginDriver,
}

#[derive(Debug)]
pub struct Asset {
  pub filename: String,
  pub content: String,
}

#[derive(Debug)]
pub struct BuildOutput {
  pub assets: Vec<Asset>,
  pub metafile: Metafile,
  /// Effects plugins recorded during the pass, not yet applied.
  pub effects: Vec<PluginEffect>,
}

impl BundlerCore {
  pub fn new(input_opts: InputOptions) -> Self {
    Self::with_plugins(input_opts, vec![])
  }

  pub fn with_plugins(input_opts: InputOptions, plugins: Vec<Box<dyn BuildPlugin>>) -> Self {
    edgepack_tracing::enable_tracing_on_demand();
    Self {
      input_options: input_opts,
      plugin_driver: BuildPluginDriver::new(plugins).into_shared(),
    }
  }

  #[instrument(skip_all)]
  pub async fn build(&mut self, output_opts: OutputOptions) -> BuildResult<BuildOutput> {
    tracing::debug!("{:#?}", self.input_options);
    tracing::debug!("{:#?}", output_opts);
    let mut graph = Graph::new(self.plugin_driver.clone());
    graph.generate_module_graph(&self.input_options).await?;
    let bundle = Bundle::new(&self.input_options, &output_opts, &graph);
    let (assets, metafile) = bundle.generate()?;
    let effects = self.plugin_driver.read().await.take_effects();
    Ok(BuildOutput {
      assets,
      metafile,
      effects,
    })
  }
}

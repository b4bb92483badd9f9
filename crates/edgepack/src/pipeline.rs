use std::path::{Path, PathBuf};

use edgepack_core::{
  external_from_list, BuildOutput, BundlerCore, InputItem, InputOptions, OutputOptions,
  PluginEffect, ResolverOptions,
};
use edgepack_error::{Error, Result};
use edgepack_patch::{ArtifactPatcher, PatchReport, StreamingPatch};
use edgepack_plugin_content_updater::ContentUpdater;
use edgepack_policy::{
  custom_alias_path, validate_custom_aliases, BundleConfig, DefaultTables, ResolutionPolicy,
  ShimPaths,
};
use sugar_path::SugarPath;
use tracing::instrument;

use crate::{builtin_rules, BuildManifest, LargePatchStrategy, PipelineOptions, RuntimeMode};

const ENTRY_NAME: &str = "handler";
const SIDECAR_SUFFIX: &str = ".meta.json";

#[derive(Debug)]
pub struct BuildSummary {
  pub artifact: PathBuf,
  pub sidecar: PathBuf,
  /// Present when the app lives in a sub-directory of a monorepo.
  pub monorepo_shim: Option<PathBuf>,
  pub mode: RuntimeMode,
  pub modules: usize,
  pub patch: PatchReport,
}

/// `<out>/server-functions/default`
pub fn function_dir(output_dir: &Path) -> PathBuf {
  output_dir.join("server-functions").join("default")
}

fn io_context(path: &Path, action: &str) -> impl FnOnce(std::io::Error) -> Error {
  let context = format!("{action}: {}", path.display());
  move |err| Error::io_error(err).context(context)
}

fn resolver_options(config: &BundleConfig) -> ResolverOptions {
  let mut options = ResolverOptions::default();
  if config.use_workerd_condition {
    let mut conditions = vec!["workerd".to_string(), "worker".to_string()];
    conditions.extend(options.conditions);
    options.conditions = conditions;
  }
  options
}

/// The files one run publishes.
#[derive(Debug)]
struct OutputFiles {
  artifact: PathBuf,
  sidecar: PathBuf,
  monorepo_shim: Option<PathBuf>,
}

impl OutputFiles {
  fn plan(function_dir: &Path, relative_app_dir: &str, file_name: &str) -> Self {
    let relative_app_dir = relative_app_dir.trim_matches('/');
    let artifact = if relative_app_dir.is_empty() {
      function_dir.join(file_name)
    } else {
      function_dir.join(relative_app_dir).join(file_name)
    };
    let mut sidecar = artifact.as_os_str().to_owned();
    sidecar.push(SIDECAR_SUFFIX);
    Self {
      artifact,
      sidecar: PathBuf::from(sidecar),
      monorepo_shim: (!relative_app_dir.is_empty()).then(|| function_dir.join(file_name)),
    }
  }

  fn paths(&self) -> impl Iterator<Item = &Path> {
    [Some(&self.artifact), Some(&self.sidecar), self.monorepo_shim.as_ref()]
      .into_iter()
      .flatten()
      .map(PathBuf::as_path)
  }

  fn remove(&self) -> Result<()> {
    for path in self.paths() {
      match std::fs::remove_file(path) {
        Ok(()) => tracing::debug!("removed {}", path.display()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => return Err(io_context(path, "Remove previous output")(err)),
      }
    }
    Ok(())
  }
}

/// Runs the whole pipeline once: manifest, policy, bundle, patch, sidecar.
///
/// Outputs of an earlier run are removed up front, and everything this run
/// wrote is removed again if it fails, so a failed build never leaves a
/// complete-looking artifact behind.
#[instrument(skip_all)]
pub async fn build(options: PipelineOptions) -> Result<BuildSummary> {
  edgepack_tracing::enable_tracing_on_demand();
  let PipelineOptions {
    app_dir,
    output_dir,
    config_path,
    rules,
    patch_limits,
    large_patch,
    on_warn,
  } = options;
  // Relative inputs are taken against the working directory, once.
  let cwd = std::env::current_dir().map_err(io_context(Path::new("."), "Read working dir"))?;
  let app_dir = app_dir.absolutize_with(cwd.as_path());
  let output_dir = output_dir.absolutize_with(cwd.as_path());
  let config_path = config_path.map_or_else(
    || app_dir.join(BundleConfig::FILE_NAME),
    |path| path.absolutize_with(cwd.as_path()),
  );

  let output_options = OutputOptions::default();
  let file_name = output_options.artifact_file_name(ENTRY_NAME);
  let function_dir = function_dir(&output_dir);
  // The nested layout is only known once the manifest is read.
  OutputFiles::plan(&function_dir, "", &file_name).remove()?;

  let manifest = BuildManifest::read(&app_dir)?;
  let files = OutputFiles::plan(&function_dir, &manifest.relative_app_dir, &file_name);
  files.remove()?;

  let run = Run {
    app_dir: &app_dir,
    output_dir: &output_dir,
    config_path: &config_path,
    manifest: &manifest,
    files: &files,
    output_options,
    rules,
    patcher: match large_patch {
      LargePatchStrategy::ExternalTool => ArtifactPatcher::new(),
      LargePatchStrategy::Streaming => {
        ArtifactPatcher::new().with_large_strategy(Box::new(StreamingPatch))
      }
    }
    .with_limits(patch_limits),
    on_warn,
  };
  match run.execute().await {
    Ok(summary) => Ok(summary),
    Err(err) => {
      if let Err(remove_err) = files.remove() {
        tracing::warn!("{}", remove_err);
      }
      Err(err)
    }
  }
}

struct Run<'a> {
  app_dir: &'a Path,
  output_dir: &'a Path,
  config_path: &'a Path,
  manifest: &'a BuildManifest,
  files: &'a OutputFiles,
  output_options: OutputOptions,
  rules: Vec<Box<dyn edgepack_plugin_content_updater::RewriteRule>>,
  patcher: ArtifactPatcher,
  on_warn: edgepack_core::WarningHandler,
}

impl<'a> Run<'a> {
  async fn execute(self) -> Result<BuildSummary> {
    let Run {
      app_dir,
      output_dir,
      config_path,
      manifest,
      files,
      output_options,
      rules,
      patcher,
      on_warn,
    } = self;
    let mode = manifest.runtime_mode();
    tracing::debug!("runtime mode: {:?}", mode);

    let config = BundleConfig::from_path(config_path)?;

    let shims = ShimPaths::under(&output_dir.join(".build").join("shims"));
    let mut policy = ResolutionPolicy::compute(&config, &DefaultTables::BUILTIN, &shims);
    validate_custom_aliases(&config, app_dir)?;
    // Relative custom alias targets are written relative to the app.
    for (specifier, target) in &config.custom_aliases {
      if let Some(path) = custom_alias_path(target, app_dir) {
        policy
          .alias
          .insert(specifier.clone(), path.to_string_lossy().to_string());
      }
    }
    tracing::debug!("{:#?}", policy);
    shims
      .write_all()
      .map_err(io_context(&shims.empty, "Write shims"))?;

    let updater = ContentUpdater::builder()
      .rules(builtin_rules(manifest, mode)?)
      .rules(rules)
      .build();
    tracing::debug!("rewrite rules: {:?}", updater.rule_ids());

    let entry = manifest.server_entry(app_dir);
    let mut bundler = BundlerCore::with_plugins(
      InputOptions {
        input: vec![InputItem {
          name: ENTRY_NAME.to_string(),
          import: entry.to_string_lossy().to_string(),
        }],
        cwd: BuildManifest::standalone_root(app_dir),
        is_external: external_from_list(policy.externals.clone()),
        alias: policy.alias.clone(),
        resolve: resolver_options(&config),
        on_warn,
      },
      vec![Box::new(updater)],
    );
    let BuildOutput {
      mut assets,
      mut metafile,
      effects,
    } = bundler.build(output_options).await?;

    let asset = assets
      .pop()
      .ok_or_else(|| Error::panic("The bundler produced no output".to_string()))?;
    let artifact = &files.artifact;
    let artifact_dir = artifact
      .parent()
      .ok_or_else(|| Error::panic(format!("No parent for {}", artifact.display())))?;
    std::fs::create_dir_all(artifact_dir).map_err(io_context(artifact_dir, "Create output dir"))?;
    std::fs::write(artifact, &asset.content).map_err(io_context(artifact, "Write artifact"))?;

    let patch = {
      let artifact = artifact.clone();
      tokio::task::spawn_blocking(move || patcher.patch(&artifact))
        .await
        .map_err(|err| Error::panic(format!("Patch task failed: {err}")))??
    };
    tracing::debug!("{:?}", patch);

    let size = std::fs::metadata(artifact)
      .map_err(io_context(artifact, "Stat artifact"))?
      .len();
    metafile.set_output_bytes(&asset.filename, size as usize);

    apply_effects(effects, artifact_dir, &BuildManifest::standalone_root(app_dir))?;

    std::fs::write(&files.sidecar, metafile.to_json()?)
      .map_err(io_context(&files.sidecar, "Write metafile"))?;

    if let Some(shim) = &files.monorepo_shim {
      let target = format!(
        "./{}/{}",
        manifest.relative_app_dir.trim_matches('/'),
        asset.filename
      );
      std::fs::write(
        shim,
        format!("export {{ default }} from \"{target}\";\nexport * from \"{target}\";\n"),
      )
      .map_err(io_context(shim, "Write monorepo shim"))?;
    }

    Ok(BuildSummary {
      artifact: artifact.clone(),
      sidecar: files.sidecar.clone(),
      monorepo_shim: files.monorepo_shim.clone(),
      mode,
      modules: metafile.inputs.len(),
      patch,
    })
  }
}

/// `EmitFile` lands next to the artifact; a relative `ReplaceFile` path is
/// taken relative to the standalone root.
fn apply_effects(effects: Vec<PluginEffect>, artifact_dir: &Path, input_root: &Path) -> Result<()> {
  for effect in effects {
    let (path, content) = match effect {
      PluginEffect::EmitFile { file_name, content } => (artifact_dir.join(file_name), content),
      PluginEffect::ReplaceFile { path, content } => (input_root.join(path), content),
    };
    tracing::debug!("writing effect output {}", path.display());
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).map_err(io_context(parent, "Create dir"))?;
    }
    std::fs::write(&path, content).map_err(io_context(&path, "Write file"))?;
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn flat_layout_has_no_monorepo_shim() {
    let files = OutputFiles::plan(Path::new("/out/fn"), "", "handler.mjs");
    assert_eq!(files.artifact, Path::new("/out/fn/handler.mjs"));
    assert_eq!(files.sidecar, Path::new("/out/fn/handler.mjs.meta.json"));
    assert!(files.monorepo_shim.is_none());
  }

  #[test]
  fn nested_layout_puts_the_shim_at_the_function_root() {
    let files = OutputFiles::plan(Path::new("/out/fn"), "apps/web/", "handler.mjs");
    assert_eq!(files.artifact, Path::new("/out/fn/apps/web/handler.mjs"));
    assert_eq!(
      files.monorepo_shim.as_deref(),
      Some(Path::new("/out/fn/handler.mjs"))
    );
    assert_eq!(files.paths().count(), 3);
  }
}

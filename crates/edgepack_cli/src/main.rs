//! `edgepack`: bundle a standalone server build into one edge handler.

use std::path::PathBuf;

use clap::Parser;
use edgepack::{LargePatchStrategy, PipelineOptions};
use edgepack_error::CWD;

/// Bundles a framework's standalone server output for a constrained edge runtime.
#[derive(Parser, Debug)]
#[command(name = "edgepack", version, about)]
struct Cli {
  /// Directory holding the framework build (`.next/`).
  #[arg(long, short = 'a', default_value = ".", env = "EDGEPACK_APP_DIR")]
  app_dir: PathBuf,

  /// Where to write `server-functions/`.
  #[arg(long, short = 'o', default_value = ".edgepack", env = "EDGEPACK_OUT_DIR")]
  out_dir: PathBuf,

  /// Bundle configuration, defaults to `<app-dir>/edgepack.config.json`.
  #[arg(long, short = 'c')]
  config: Option<PathBuf>,

  /// Patch large artifacts in-process line by line instead of running `sed`.
  #[arg(long)]
  streaming_patch: bool,
}

impl Cli {
  fn into_options(self) -> PipelineOptions {
    let mut options = PipelineOptions::new(self.app_dir, self.out_dir);
    options.config_path = self.config;
    if self.streaming_patch {
      options.large_patch = LargePatchStrategy::Streaming;
    }
    options
  }
}

#[tokio::main]
async fn main() {
  let cli = Cli::parse();
  let cwd = std::env::current_dir().unwrap_or_default();

  match edgepack::build(cli.into_options()).await {
    Ok(summary) => {
      tracing::info!(
        "{} modules, patch: {:?}",
        summary.modules,
        summary.patch.outcome
      );
      println!("{}", summary.artifact.display());
    }
    Err(err) => {
      let message = CWD.set(&cwd, || err.to_string());
      eprintln!(
        "{} [{}] {}",
        ansi_term::Color::Red.bold().paint("error"),
        err.kind.code(),
        message
      );
      std::process::exit(1);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_flags() {
    let cli = Cli::parse_from([
      "edgepack",
      "--app-dir",
      "apps/web",
      "-o",
      "dist",
      "--streaming-patch",
    ]);
    let options = cli.into_options();
    assert_eq!(options.app_dir, PathBuf::from("apps/web"));
    assert_eq!(options.output_dir, PathBuf::from("dist"));
    assert_eq!(options.large_patch, LargePatchStrategy::Streaming);
    assert_eq!(options.config_path, None);
  }
}

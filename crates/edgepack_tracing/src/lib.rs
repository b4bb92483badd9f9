use std::sync::atomic::{AtomicBool, Ordering};

use tracing::Level;

static IS_INIT: AtomicBool = AtomicBool::new(false);

/// Environment variable that turns on edgepack's own trace output.
pub const LOG_ENV: &str = "EDGEPACK_LOG";

pub fn init() {
  use tracing_subscriber::{fmt, prelude::*, EnvFilter};
  if !IS_INIT.swap(true, Ordering::SeqCst) {
    let targets = tracing_subscriber::filter::Targets::new()
      .with_targets(vec![("edgepack", Level::TRACE)])
      .with_default(Level::WARN);
    let _ = tracing_subscriber::registry()
      .with(fmt::layer().with_writer(std::io::stderr))
      .with(EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")))
      .with(targets)
      .try_init();
  }
}

/// Installs the subscriber only when `EDGEPACK_LOG` is set.
pub fn enable_tracing_on_demand() {
  if std::env::var_os(LOG_ENV).is_some() {
    init();
  }
}

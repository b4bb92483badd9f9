mod resolve_id;
pub(crate) use resolve_id::*;
mod marker;
pub use marker::*;

/// Node core modules the host runtime provides.
const NODE_BUILTINS: &[&str] = &[
  "assert", "async_hooks", "buffer", "child_process", "cluster", "console", "constants",
  "crypto", "dgram", "diagnostics_channel", "dns", "domain", "events", "fs", "fs/promises",
  "http", "http2", "https", "inspector", "module", "net", "os", "path", "perf_hooks",
  "process", "punycode", "querystring", "readline", "repl", "stream", "stream/web",
  "string_decoder", "sys", "timers", "tls", "trace_events", "tty", "url", "util", "v8", "vm",
  "worker_threads", "zlib",
];

pub fn is_node_builtin(specifier: &str) -> bool {
  specifier.starts_with("node:") || NODE_BUILTINS.contains(&specifier)
}

pub fn strip_bom(text: String) -> String {
  match text.strip_prefix('\u{FEFF}') {
    Some(stripped) => stripped.to_string(),
    None => text,
  }
}

#[test]
fn builtins() {
  assert!(is_node_builtin("fs"));
  assert!(is_node_builtin("node:async_hooks"));
  assert!(!is_node_builtin("react"));
}

/// Built-in module tables merged with user configuration.
#[derive(Debug, Clone, Copy)]
pub struct DefaultTables {
  pub external: &'static [&'static str],
  pub stub_empty: &'static [&'static str],
  pub stub_throw: &'static [&'static str],
  pub stub_fetch: &'static [&'static str],
  pub stub_env: &'static [&'static str],
  pub stub_styled_jsx: &'static [&'static str],
}

impl DefaultTables {
  pub const BUILTIN: DefaultTables = DefaultTables {
    external: &["./middleware/handler.mjs", "cloudflare:workers", "cloudflare:sockets"],
    stub_empty: &[
      "next/dist/compiled/ws",
      "next/dist/compiled/edge-runtime",
      "next/dist/compiled/@next/react-refresh-utils/dist/runtime",
      "critters",
    ],
    stub_throw: &[
      "next/dist/compiled/@ampproject/toolbox-optimizer",
      "next/dist/compiled/@vercel/og/index.node.js",
      "next/dist/compiled/sharp",
    ],
    stub_fetch: &["next/dist/compiled/node-fetch"],
    stub_env: &["@next/env"],
    stub_styled_jsx: &["styled-jsx", "styled-jsx/style", "styled-jsx/css"],
  };

  /// Tables with nothing in them.
  pub const EMPTY: DefaultTables = DefaultTables {
    external: &[],
    stub_empty: &[],
    stub_throw: &[],
    stub_fetch: &[],
    stub_env: &[],
    stub_styled_jsx: &[],
  };
}

impl Default for DefaultTables {
  fn default() -> Self {
    Self::BUILTIN
  }
}

/*!
Layered option settings: built-in defaults, then an optional TOML file, then
`CBOR_`-prefixed environment variables. Command-line flags are applied on
top by each subcommand.

```toml
[decode]
allow_nan = false
allow_infinity = false

[encode]
map_order = "bytewise"
```

The same keys can be set from the environment, e.g.
`CBOR_DECODE__ALLOW_NAN=false` or `CBOR_ENCODE__FLOAT64=true`.
*/

use anyhow::Context;
use serde::Deserialize;
use std::path::Path;
use strict_cbor::{PartialDecodeOptions, PartialEncodeOptions};
use tracing::info;

pub const ENV_PREFIX: &str = "CBOR";

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub decode: PartialDecodeOptions,
    pub encode: PartialEncodeOptions,
}

fn builder(path: Option<&Path>) -> config::ConfigBuilder<config::builder::DefaultState> {
    let mut b = config::Config::builder();

    // Add config file
    if let Some(path) = path {
        info!("Using configuration file '{}'", path.display());
        b = b.add_source(config::File::from(path).format(config::FileFormat::Toml))
    }

    // Pull in environment vars
    b.add_source(
        config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    )
}

pub fn load(path: Option<&Path>) -> anyhow::Result<Settings> {
    builder(path)
        .build()
        .context("Failed to read configuration")?
        .try_deserialize()
        .context("Failed to parse configuration")
}

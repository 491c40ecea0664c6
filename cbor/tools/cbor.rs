/*!
CBOR Tools - A CLI for validating and working with canonical CBOR data

# Commands

- `inspect`: Decode CBOR under a validation policy and display it (diagnostic
  notation, JSON, hex or a token listing)
- `compose`: Convert JSON (or re-encode CBOR) to canonical CBOR binary

# Examples

```bash
# Inspect a CBOR file in diagnostic notation
cbor inspect data.cbor

# Refuse NaN and Infinity while decoding hex input
echo 'f97e00' | cbor inspect --hex --allow-nan=false --allow-infinity=false -

# Show the individual heads
cbor inspect --format tokens data.cbor

# Convert JSON to CBOR, writing floats as float64
echo '{"a": 0.5}' | cbor compose --float64 -o data.cbor

# Canonicalise existing CBOR
cbor compose --format cbor legacy.cbor -o canonical.cbor
```

Options are layered: built-in defaults, then `--config FILE`, then `CBOR_`
environment variables, then command-line flags.
*/

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

mod compose;
mod inspect;
mod io;
mod settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Verbosity {
    /// Designates very low priority, often extremely verbose, information.
    #[value(name = "trace")]
    Trace,

    /// Designates lower priority information.
    #[value(name = "debug")]
    Debug,

    /// Designates useful information.
    #[value(name = "info")]
    Info,
    /// Designates hazardous situations.
    #[value(name = "warn")]
    Warn,

    /// Designates very serious errors.
    #[value(name = "error")]
    Error,
}

impl From<Verbosity> for tracing::Level {
    fn from(value: Verbosity) -> Self {
        match value {
            Verbosity::Trace => tracing::Level::TRACE,
            Verbosity::Debug => tracing::Level::DEBUG,
            Verbosity::Info => tracing::Level::INFO,
            Verbosity::Warn => tracing::Level::WARN,
            Verbosity::Error => tracing::Level::ERROR,
        }
    }
}

/// A CLI tool for validating and manipulating CBOR data
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "A CLI tool for validating, inspecting and composing canonical CBOR",
    long_about = None
)]
struct Cli {
    /// Output additional information, default 'info'.
    #[arg(
        short,
        long,
        global = true,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "info"
    )]
    verbose: Option<Verbosity>,

    /// TOML file with [decode] and [encode] option tables
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode CBOR data and display it in various formats
    Inspect(inspect::Command),

    /// Convert JSON or CBOR to canonical CBOR binary
    Compose(compose::Command),
}

fn init_logger(verbose: Option<Verbosity>) -> anyhow::Result<()> {
    if let Some(level) = verbose.map(tracing::Level::from) {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(level)
            .with_target(level > tracing::Level::INFO)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .map_err(|e| anyhow::anyhow!("Failed to set global default subscriber: {e}"))?;
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose)?;

    let settings = settings::load(cli.config.as_deref())?;
    match cli.command {
        Commands::Inspect(args) => args.exec(&settings),
        Commands::Compose(args) => args.exec(&settings),
    }
}

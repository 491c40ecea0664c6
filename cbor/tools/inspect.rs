/*!
Inspect command - decode CBOR under a validation policy and display it
*/

use super::io::{Input, Output};
use super::settings::Settings;
use anyhow::Context;
use base64::prelude::*;
use clap::{Args, Parser};
use strict_cbor::{DecodeOptions, PartialDecodeOptions, Tokeniser, Value};
use tracing::debug;

/// Decoder policy flags, each overriding the configured value when given.
///
/// A bare flag means `true`, so `--strict` and `--strict=true` are the same.
#[derive(Args, Debug, Default, Clone, PartialEq, Eq)]
pub struct DecodeArgs {
    /// Accept indefinite-length items and BREAK
    #[arg(
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    allow_indefinite: Option<bool>,

    /// Accept the undefined simple value
    #[arg(
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    allow_undefined: Option<bool>,

    /// Decode undefined as null
    #[arg(
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    coerce_undefined_to_null: Option<bool>,

    /// Accept +/-Infinity floats
    #[arg(
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    allow_infinity: Option<bool>,

    /// Accept NaN floats
    #[arg(
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    allow_nan: Option<bool>,

    /// Reject integers, lengths and tags encoded wider than necessary
    #[arg(
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    strict: Option<bool>,

    /// Reject maps that repeat a key
    #[arg(
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    reject_duplicate_map_keys: Option<bool>,

    /// Maximum nesting of arrays, maps and tags (capped at 512)
    #[arg(long, value_name = "DEPTH")]
    max_depth: Option<usize>,
}

impl DecodeArgs {
    fn partial(&self) -> PartialDecodeOptions {
        PartialDecodeOptions {
            allow_indefinite: self.allow_indefinite,
            allow_undefined: self.allow_undefined,
            coerce_undefined_to_null: self.coerce_undefined_to_null,
            allow_infinity: self.allow_infinity,
            allow_nan: self.allow_nan,
            strict: self.strict,
            reject_duplicate_map_keys: self.reject_duplicate_map_keys,
            max_depth: self.max_depth,
        }
    }

    /// Layers these flags over the configured settings.
    pub fn resolve(&self, settings: &Settings) -> DecodeOptions {
        self.partial().apply(settings.decode.resolve())
    }
}

/// Inspect and display CBOR data
#[derive(Parser, Debug)]
#[command(about = "Decode and display CBOR information", long_about = None)]
pub struct Command {
    /// Output format
    #[arg(
        long,
        default_value = "diag",
        value_name = "FORMAT",
        help = "Output format: diag/diagnostic (human-readable), json (lossy), hex, tokens"
    )]
    format: OutputFormat,

    /// Input is hexadecimal text rather than binary
    #[arg(long)]
    hex: bool,

    #[command(flatten)]
    decode: DecodeArgs,

    /// Output file (default: stdout)
    #[arg(short = 'o', long)]
    output: Option<Output>,

    /// Input CBOR file (use '-' for stdin)
    input: Input,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    /// CBOR Diagnostic Notation
    #[value(alias = "diagnostic")]
    Diag,
    /// JSON format (lossy - loses tags, undefined, NaN and Infinity)
    Json,
    /// Hexadecimal dump of the validated input
    Hex,
    /// One line per CBOR head, with its offset and raw bytes
    Tokens,
}

impl Command {
    pub fn exec(self, settings: &Settings) -> anyhow::Result<()> {
        let options = self.decode.resolve(settings);
        debug!("Decoding with {options:?}");

        let data = self
            .input
            .read_cbor(self.hex)
            .context("Failed to read input")?;

        let output_text = render(&data, self.format, &options)?;

        self.output
            .unwrap_or(Output::Stdout)
            .write_line(&output_text)?;
        Ok(())
    }
}

fn render(data: &[u8], format: OutputFormat, options: &DecodeOptions) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Diag => strict_cbor::decode(data, options)
            .context("Invalid CBOR")?
            .to_string(),
        OutputFormat::Json => serde_json::to_string_pretty(&value_to_json(
            &strict_cbor::decode(data, options).context("Invalid CBOR")?,
        ))?,
        OutputFormat::Hex => {
            strict_cbor::decode(data, options).context("Invalid CBOR")?;
            hex::encode(data)
        }
        OutputFormat::Tokens => format_tokens(data, options)?,
    })
}

fn format_tokens(data: &[u8], options: &DecodeOptions) -> anyhow::Result<String> {
    let mut tokens = Tokeniser::new(data, *options);
    let mut lines = Vec::new();
    loop {
        let offset = tokens.offset();
        let Some(token) = tokens
            .next_token()
            .with_context(|| format!("Invalid CBOR at offset {offset}"))?
        else {
            break;
        };
        lines.push(format!(
            "{offset:>6}  {:<20} {token:?}",
            hex::encode(&data[offset..tokens.offset()])
        ));
    }
    Ok(lines.join("\n"))
}

/// Convert a CBOR value to JSON (lossy)
fn value_to_json(value: &Value) -> serde_json::Value {
    use serde_json::Value as J;

    match value {
        Value::Unsigned(n) => J::from(*n),
        Value::Negative(_) => match value.as_integer().map(i64::try_from) {
            Some(Ok(i)) => J::from(i),
            // Below i64::MIN
            _ => J::String(value.to_string()),
        },
        Value::Bytes(b) => J::String(BASE64_URL_SAFE_NO_PAD.encode(b)),
        Value::Text(s) => J::String(s.clone()),
        Value::Array(items) => J::Array(items.iter().map(value_to_json).collect()),
        Value::Map(entries) => J::Object(
            entries
                .iter()
                .map(|(k, v)| (json_key(k), value_to_json(v)))
                .collect(),
        ),
        Value::Tagged(_, value) => value_to_json(value),
        Value::Bool(b) => J::Bool(*b),
        // JSON doesn't have undefined
        Value::Null | Value::Undefined => J::Null,
        // JSON doesn't support NaN/Infinity
        Value::Float(f) => serde_json::Number::from_f64(*f).map_or(J::Null, J::Number),
    }
}

/// In JSON, all keys must be strings
fn json_key(key: &Value) -> String {
    match key {
        Value::Text(s) => s.clone(),
        key => key.to_string(),
    }
}

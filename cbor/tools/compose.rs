/*!
Compose command - convert JSON, or re-encode existing CBOR, to canonical CBOR
*/

use super::inspect::DecodeArgs;
use super::io::{Input, Output};
use super::settings::Settings;
use anyhow::Context;
use clap::Parser;
use strict_cbor::{EncodeOptions, MapOrder, PartialEncodeOptions, Value};
use tracing::debug;

/// Input format for compose command
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum InputFormat {
    /// JSON format (no tags, bytes or undefined)
    Json,
    /// CBOR binary, decoded and then re-encoded canonically
    Cbor,
    /// CBOR as hexadecimal text
    Hex,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum KeyOrder {
    /// Shorter encoded keys first, then bytewise
    LengthFirst,
    /// Bytewise order of the encoded keys
    Bytewise,
    /// Keep the input order
    Insertion,
}

impl From<KeyOrder> for MapOrder {
    fn from(value: KeyOrder) -> Self {
        match value {
            KeyOrder::LengthFirst => MapOrder::LengthFirst,
            KeyOrder::Bytewise => MapOrder::Bytewise,
            KeyOrder::Insertion => MapOrder::Insertion,
        }
    }
}

/// Convert text or CBOR to canonical CBOR binary
#[derive(Parser, Debug)]
#[command(
    about = "Convert JSON or CBOR to canonical CBOR binary",
    long_about = "Parse the input and write it as canonical CBOR.\n\n\
                  Floats take the narrowest exact width unless --float64 is given,\n\
                  and map entries are sorted according to --map-order."
)]
pub struct Command {
    /// Input format
    #[arg(long, default_value = "json", value_name = "FORMAT")]
    format: InputFormat,

    /// Write every float as a 9-byte float64
    #[arg(
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    float64: Option<bool>,

    /// Ordering of map entries
    #[arg(long, value_name = "ORDER")]
    map_order: Option<KeyOrder>,

    /// Write hexadecimal text instead of binary
    #[arg(long)]
    hex: bool,

    /// Decoder policy when the input is CBOR
    #[command(flatten)]
    decode: DecodeArgs,

    /// Output file (default: stdout)
    #[arg(short = 'o', long)]
    output: Option<Output>,

    /// Input file (use '-' for stdin)
    input: Input,
}

impl Command {
    fn encode_options(&self, settings: &Settings) -> EncodeOptions {
        PartialEncodeOptions {
            float64: self.float64,
            map_order: self.map_order.map(Into::into),
        }
        .apply(settings.encode.resolve())
    }

    pub fn exec(self, settings: &Settings) -> anyhow::Result<()> {
        let options = self.encode_options(settings);
        debug!("Encoding with {options:?}");

        let value = match self.format {
            InputFormat::Json => {
                let text = self.input.read_to_string().context("Failed to read input")?;
                let json: serde_json::Value =
                    serde_json::from_str(&text).context("Failed to parse JSON")?;
                json_to_value(json)
            }
            InputFormat::Cbor | InputFormat::Hex => {
                let data = self
                    .input
                    .read_cbor(self.format == InputFormat::Hex)
                    .context("Failed to read input")?;
                strict_cbor::decode(data, &self.decode.resolve(settings))
                    .context("Invalid CBOR")?
            }
        };

        let cbor_bytes = strict_cbor::encode(&value, &options);

        let output = self.output.unwrap_or(Output::Stdout);
        if self.hex {
            output.write_line(&hex::encode(&cbor_bytes))?;
        } else {
            output.write_all(&cbor_bytes)?;
        }
        Ok(())
    }
}

/// Convert a JSON value to a CBOR value
///
/// Integers that fit 64 bits stay integers; every other number is a float.
fn json_to_value(value: serde_json::Value) -> Value {
    use serde_json::Value as J;

    match value {
        J::Null => Value::Null,
        J::Bool(b) => Value::Bool(b),
        J::Number(n) => {
            if let Some(u) = n.as_u64() {
                Value::Unsigned(u)
            } else if let Some(i) = n.as_i64() {
                Value::from(i)
            } else {
                Value::Float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        J::String(s) => Value::Text(s),
        J::Array(arr) => Value::Array(arr.into_iter().map(json_to_value).collect()),
        // JSON object keys are always strings
        J::Object(obj) => Value::Map(
            obj.into_iter()
                .map(|(k, v)| (Value::Text(k), json_to_value(v)))
                .collect(),
        ),
    }
}

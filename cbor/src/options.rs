/*!
Decoder and encoder configuration.

The resolved records ([`DecodeOptions`], [`EncodeOptions`]) are plain `Copy`
structs with documented defaults. The partial records
([`PartialDecodeOptions`], [`PartialEncodeOptions`]) keep "not specified"
apart from an explicit `false`, and are merged over defaults (or over an
already resolved record) with `resolve`/`apply`.
*/

use core::cmp::Ordering;

/// Hard upper bound on nesting, whatever [`DecodeOptions::max_depth`] says.
///
/// Decoding recurses once per level, so this keeps hostile input from
/// exhausting a 2 MiB thread stack.
pub const MAX_DEPTH_CEILING: usize = 512;

/// Controls which items the decoder accepts.
///
/// Each flag gates exactly one class of item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DecodeOptions {
    /// Accept indefinite-length heads and the BREAK marker.
    pub allow_indefinite: bool,
    /// Accept `undefined` (`0xf7`).
    pub allow_undefined: bool,
    /// Decode an accepted `undefined` as `null`.
    pub coerce_undefined_to_null: bool,
    /// Accept floats decoding to +/-Infinity, whatever their width.
    pub allow_infinity: bool,
    /// Accept floats decoding to NaN, whatever their width.
    pub allow_nan: bool,
    /// Reject integer, length and tag arguments encoded wider than necessary.
    pub strict: bool,
    /// Reject maps that repeat a key.
    pub reject_duplicate_map_keys: bool,
    /// Maximum nesting of arrays, maps and tags.
    ///
    /// Values above [`MAX_DEPTH_CEILING`] behave as the ceiling.
    pub max_depth: usize,
}

impl DecodeOptions {
    pub const fn new() -> Self {
        Self {
            allow_indefinite: true,
            allow_undefined: true,
            coerce_undefined_to_null: false,
            allow_infinity: true,
            allow_nan: true,
            strict: false,
            reject_duplicate_map_keys: false,
            max_depth: 256,
        }
    }
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Ordering applied to the entries of a map when encoding a [`Value`](crate::Value).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum MapOrder {
    /// Shorter encoded keys first, then bytewise (RFC 7049 canonical CBOR).
    #[default]
    LengthFirst,
    /// Bytewise lexicographic order of the encoded keys (RFC 8949 §4.2.1).
    Bytewise,
    /// Entries are written in the order given.
    Insertion,
}

impl MapOrder {
    /// Compares two encoded keys, `None` for [`MapOrder::Insertion`].
    pub fn compare(&self, a: &[u8], b: &[u8]) -> Option<Ordering> {
        match self {
            MapOrder::LengthFirst => Some(a.len().cmp(&b.len()).then_with(|| a.cmp(b))),
            MapOrder::Bytewise => Some(a.cmp(b)),
            MapOrder::Insertion => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EncodeOptions {
    /// Always write floats as 9-byte float64, whatever their value.
    pub float64: bool,
    pub map_order: MapOrder,
}

impl EncodeOptions {
    pub const fn new() -> Self {
        Self {
            float64: false,
            map_order: MapOrder::LengthFirst,
        }
    }
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// A caller-supplied subset of [`DecodeOptions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PartialDecodeOptions {
    pub allow_indefinite: Option<bool>,
    pub allow_undefined: Option<bool>,
    pub coerce_undefined_to_null: Option<bool>,
    pub allow_infinity: Option<bool>,
    pub allow_nan: Option<bool>,
    pub strict: Option<bool>,
    pub reject_duplicate_map_keys: Option<bool>,
    pub max_depth: Option<usize>,
}

impl PartialDecodeOptions {
    /// Merges over the defaults.
    pub fn resolve(&self) -> DecodeOptions {
        self.apply(DecodeOptions::default())
    }

    /// Merges over `base`; only the fields set here change.
    pub fn apply(&self, base: DecodeOptions) -> DecodeOptions {
        DecodeOptions {
            allow_indefinite: self.allow_indefinite.unwrap_or(base.allow_indefinite),
            allow_undefined: self.allow_undefined.unwrap_or(base.allow_undefined),
            coerce_undefined_to_null: self
                .coerce_undefined_to_null
                .unwrap_or(base.coerce_undefined_to_null),
            allow_infinity: self.allow_infinity.unwrap_or(base.allow_infinity),
            allow_nan: self.allow_nan.unwrap_or(base.allow_nan),
            strict: self.strict.unwrap_or(base.strict),
            reject_duplicate_map_keys: self
                .reject_duplicate_map_keys
                .unwrap_or(base.reject_duplicate_map_keys),
            max_depth: self.max_depth.unwrap_or(base.max_depth),
        }
    }
}

/// A caller-supplied subset of [`EncodeOptions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PartialEncodeOptions {
    pub float64: Option<bool>,
    pub map_order: Option<MapOrder>,
}

impl PartialEncodeOptions {
    pub fn resolve(&self) -> EncodeOptions {
        self.apply(EncodeOptions::default())
    }

    pub fn apply(&self, base: EncodeOptions) -> EncodeOptions {
        EncodeOptions {
            float64: self.float64.unwrap_or(base.float64),
            map_order: self.map_order.unwrap_or(base.map_order),
        }
    }
}

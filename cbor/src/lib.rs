/*!
Canonical CBOR (RFC 8949) encoding and decoding with configurable
validation of special values.

Decoding goes through a flat [`token`] layer, where each head is checked
against [`DecodeOptions`] (NaN, Infinity, undefined and indefinite-length
items can each be refused independently), and is then assembled into a
[`Value`] by [`decode`]. Encoding is deterministic: shortest heads, the
narrowest float width that is exact, and ordered map keys.

```
use strict_cbor::{DecodeOptions, Value, decode, emit};

assert_eq!(emit(&0.5), [0xf9, 0x38, 0x00]);

let no_nan = DecodeOptions {
    allow_nan: false,
    ..DecodeOptions::default()
};
assert!(decode([0xf9u8, 0x7e, 0x00], &no_nan).is_err());
assert_eq!(
    decode([0xf9u8, 0x7c, 0x00], &no_nan),
    Ok(Value::Float(f64::INFINITY))
);
```
*/
#![no_std]
extern crate alloc;

pub mod cursor;
pub mod decode;
pub mod encode;
pub mod half_precision;
pub mod options;
pub mod token;
pub mod value;

mod error;
mod simple;

pub use decode::{decode, decode_first, decode_hex};
pub use encode::{Encoder, ToCbor, emit, encode};
pub use error::Error;
pub use options::{
    DecodeOptions, EncodeOptions, MAX_DEPTH_CEILING, MapOrder, PartialDecodeOptions,
    PartialEncodeOptions,
};
pub use token::{Token, Tokeniser};
pub use value::Value;


#[cfg(test)]
mod encode_tests;

use thiserror::Error;

/// Everything that can go wrong while decoding.
///
/// Encoding never fails, so this is purely a decode-side type.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("simple values are not supported (minor value {0})")]
    UnsupportedSimpleValue(u8),

    #[error("not enough data for {0}")]
    InsufficientData(&'static str),

    #[error("unexpected end of input")]
    UnexpectedEnd,

    #[error("indefinite length items are not allowed")]
    DisallowedIndefinite,

    #[error("undefined values are not allowed")]
    DisallowedUndefined,

    #[error("Infinity values are not allowed")]
    DisallowedInfinity,

    #[error("NaN values are not allowed")]
    DisallowedNaN,

    #[error("unexpected break")]
    UnexpectedBreak,

    #[error("unexpected break to lengthed {0}")]
    UnexpectedBreakInLengthed(&'static str),

    #[error("Invalid minor-type value {0}")]
    InvalidMinorValue(u8),

    #[error("integer encoded in more bytes than necessary (strict decode)")]
    NonMinimalEncoding,

    #[error("Chunked string contains an invalid chunk")]
    InvalidChunk,

    #[error("indefinite length map ended with a key and no value")]
    PartialMap,

    #[error("found repeat map key")]
    DuplicateMapKey,

    #[error("{0} bytes of trailing data after the encoded item")]
    TrailingData(usize),

    #[error("Maximum recursion depth reached")]
    MaxRecursion,

    #[error("Invalid UTF-8 in text string: {0}")]
    InvalidUtf8(core::str::Utf8Error),

    #[error("{0} length {1} exceeds addressable memory")]
    LengthOverflow(&'static str, u64),

    #[error("Invalid hex input: {0}")]
    InvalidHex(hex::FromHexError),
}

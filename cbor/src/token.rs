/*!
The token layer: one CBOR head (plus any payload it owns) per token.

Tokens are flat. Arrays, maps, tags and indefinite-length strings appear as
their heads only; assembling items is left to [`crate::decode`].
*/

use super::cursor::Cursor;
use super::error::Error;
use super::options::DecodeOptions;
use super::simple::decode_simple;

#[derive(Debug, Clone, PartialEq)]
pub enum Token<'a> {
    Unsigned(u64),
    /// Major type 1; the logical value is `-1 - n`.
    Negative(u64),
    Bytes(&'a [u8]),
    Text(&'a str),
    /// Head of an indefinite-length byte string.
    BytesStart,
    /// Head of an indefinite-length text string.
    TextStart,
    /// Array head, `None` when indefinite.
    Array(Option<u64>),
    /// Map head with the number of pairs, `None` when indefinite.
    Map(Option<u64>),
    Tag(u64),
    Bool(bool),
    Null,
    Undefined,
    Float16(f64),
    Float32(f64),
    Float64(f64),
    Break,
}

impl Token<'_> {
    /// The widened value of a float token.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Token::Float16(f) | Token::Float32(f) | Token::Float64(f) => Some(*f),
            _ => None,
        }
    }
}

/// Splits an input buffer into [`Token`]s.
#[derive(Debug, Clone)]
pub struct Tokeniser<'a> {
    cursor: Cursor<'a>,
    options: DecodeOptions,
    failed: bool,
}

impl<'a> Tokeniser<'a> {
    pub fn new(data: &'a [u8], options: DecodeOptions) -> Self {
        Self {
            cursor: Cursor::new(data),
            options,
            failed: false,
        }
    }

    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    pub fn offset(&self) -> usize {
        self.cursor.offset()
    }

    pub fn remaining(&self) -> usize {
        self.cursor.remaining()
    }

    pub fn rest(&self) -> &'a [u8] {
        self.cursor.rest()
    }

    /// Reads the next token, `Ok(None)` at the end of the input.
    pub fn next_token(&mut self) -> Result<Option<Token<'a>>, Error> {
        let Some(prefix) = self.cursor.read_u8() else {
            return Ok(None);
        };
        let (major, minor) = (prefix >> 5, prefix & 0x1F);
        let options = &self.options;
        let cursor = &mut self.cursor;

        let token = match (major, minor) {
            (7, minor) => decode_simple(cursor, minor, options)?,
            (2..=5, 31) if !options.allow_indefinite => return Err(Error::DisallowedIndefinite),
            (2, 31) => Token::BytesStart,
            (3, 31) => Token::TextStart,
            (4, 31) => Token::Array(None),
            (5, 31) => Token::Map(None),
            (major, minor) => {
                let arg = read_argument(cursor, minor, options)?;
                match major {
                    0 => Token::Unsigned(arg),
                    1 => Token::Negative(arg),
                    2 => Token::Bytes(read_payload(cursor, arg, "byte string")?),
                    3 => Token::Text(
                        core::str::from_utf8(read_payload(cursor, arg, "text string")?)
                            .map_err(Error::InvalidUtf8)?,
                    ),
                    4 => Token::Array(Some(arg)),
                    5 => Token::Map(Some(arg)),
                    _ => Token::Tag(arg),
                }
            }
        };
        Ok(Some(token))
    }
}

impl<'a> Iterator for Tokeniser<'a> {
    type Item = Result<Token<'a>, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let r = self.next_token();
        self.failed = r.is_err();
        r.transpose()
    }
}

/// Reads the argument that follows a head, for majors 0 to 6.
fn read_argument(cursor: &mut Cursor, minor: u8, options: &DecodeOptions) -> Result<u64, Error> {
    let (value, minimum) = match minor {
        0..=23 => return Ok(minor as u64),
        24 => (
            cursor.read_u8().ok_or(Error::InsufficientData("uint8"))? as u64,
            24,
        ),
        25 => (
            u16::from_be_bytes(
                cursor
                    .read_array()
                    .ok_or(Error::InsufficientData("uint16"))?,
            ) as u64,
            0x100,
        ),
        26 => (
            u32::from_be_bytes(
                cursor
                    .read_array()
                    .ok_or(Error::InsufficientData("uint32"))?,
            ) as u64,
            0x1_0000,
        ),
        27 => (
            u64::from_be_bytes(
                cursor
                    .read_array()
                    .ok_or(Error::InsufficientData("uint64"))?,
            ),
            0x1_0000_0000,
        ),
        _ => return Err(Error::InvalidMinorValue(minor)),
    };
    if options.strict && value < minimum {
        return Err(Error::NonMinimalEncoding);
    }
    Ok(value)
}

fn read_payload<'a>(
    cursor: &mut Cursor<'a>,
    len: u64,
    what: &'static str,
) -> Result<&'a [u8], Error> {
    let len = usize::try_from(len).map_err(|_| Error::LengthOverflow(what, len))?;
    cursor.read(len).ok_or(Error::InsufficientData(what))
}

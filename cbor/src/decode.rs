/*!
Assembles [`Token`]s into [`Value`]s.

The token layer decides whether an individual head is acceptable; this layer
decides whether it makes sense where it appears: BREAK inside a definite
container, chunks of the wrong type inside an indefinite string, repeated
map keys, excessive nesting and trailing input.
*/

use super::encode;
use super::options::{DecodeOptions, EncodeOptions, MAX_DEPTH_CEILING};
use super::token::{Token, Tokeniser};
use super::value::Value;
use alloc::{boxed::Box, collections::BTreeSet, string::String, vec::Vec};
use tracing::debug;

pub use super::error::Error;

/// Decodes exactly one item from `data`.
///
/// Any bytes left over after the item are an error; use [`decode_first`] to
/// walk a CBOR sequence.
pub fn decode(data: impl AsRef<[u8]>, options: &DecodeOptions) -> Result<Value, Error> {
    let (value, rest) = decode_first(data.as_ref(), options)?;
    if !rest.is_empty() {
        debug!("{} bytes of trailing data after CBOR item", rest.len());
        return Err(Error::TrailingData(rest.len()));
    }
    Ok(value)
}

/// Decodes the first item of `data`, returning it with the unconsumed remainder.
pub fn decode_first<'a>(
    data: &'a [u8],
    options: &DecodeOptions,
) -> Result<(Value, &'a [u8]), Error> {
    let mut tokens = Tokeniser::new(data, *options);
    match next(&mut tokens).and_then(|token| item(&mut tokens, token, 0)) {
        Ok(value) => Ok((value, tokens.rest())),
        Err(e) => {
            debug!("CBOR decode failed at offset {}: {e}", tokens.offset());
            Err(e)
        }
    }
}

/// Decodes exactly one item from hexadecimal text.
pub fn decode_hex(text: &str, options: &DecodeOptions) -> Result<Value, Error> {
    decode(hex::decode(text.trim()).map_err(Error::InvalidHex)?, options)
}

fn next<'a>(tokens: &mut Tokeniser<'a>) -> Result<Token<'a>, Error> {
    tokens.next_token()?.ok_or(Error::UnexpectedEnd)
}

fn item(tokens: &mut Tokeniser, token: Token, depth: usize) -> Result<Value, Error> {
    match token {
        Token::Unsigned(n) => Ok(Value::Unsigned(n)),
        Token::Negative(n) => Ok(Value::Negative(n)),
        Token::Bytes(b) => Ok(Value::Bytes(b.to_vec())),
        Token::Text(s) => Ok(Value::Text(s.into())),
        Token::BytesStart => byte_chunks(tokens).map(Value::Bytes),
        Token::TextStart => text_chunks(tokens).map(Value::Text),
        Token::Array(count) => {
            check_depth(tokens, depth)?;
            array(tokens, count, depth + 1).map(Value::Array)
        }
        Token::Map(count) => {
            check_depth(tokens, depth)?;
            map(tokens, count, depth + 1).map(Value::Map)
        }
        Token::Tag(tag) => {
            check_depth(tokens, depth)?;
            match next(tokens)? {
                Token::Break => Err(Error::UnexpectedBreak),
                token => Ok(Value::Tagged(
                    tag,
                    Box::new(item(tokens, token, depth + 1)?),
                )),
            }
        }
        Token::Bool(b) => Ok(Value::Bool(b)),
        Token::Null => Ok(Value::Null),
        Token::Undefined => Ok(Value::Undefined),
        Token::Float16(f) | Token::Float32(f) | Token::Float64(f) => Ok(Value::Float(f)),
        Token::Break => Err(Error::UnexpectedBreak),
    }
}

fn check_depth(tokens: &Tokeniser, depth: usize) -> Result<(), Error> {
    if depth >= tokens.options().max_depth.min(MAX_DEPTH_CEILING) {
        Err(Error::MaxRecursion)
    } else {
        Ok(())
    }
}

fn array(tokens: &mut Tokeniser, count: Option<u64>, depth: usize) -> Result<Vec<Value>, Error> {
    match count {
        Some(count) => {
            // Counts come from the input, so grow as items arrive
            let mut items = Vec::new();
            for _ in 0..count {
                match next(tokens)? {
                    Token::Break => return Err(Error::UnexpectedBreakInLengthed("array")),
                    token => items.push(item(tokens, token, depth)?),
                }
            }
            Ok(items)
        }
        None => {
            let mut items = Vec::new();
            loop {
                match next(tokens)? {
                    Token::Break => break Ok(items),
                    token => items.push(item(tokens, token, depth)?),
                }
            }
        }
    }
}

fn map(
    tokens: &mut Tokeniser,
    count: Option<u64>,
    depth: usize,
) -> Result<Vec<(Value, Value)>, Error> {
    let mut entries = Vec::new();
    let mut seen = BTreeSet::new();
    let mut parsed = 0;
    loop {
        if count.is_some_and(|c| parsed >= c) {
            break Ok(entries);
        }
        let key = match (next(tokens)?, count) {
            (Token::Break, None) => break Ok(entries),
            (Token::Break, Some(_)) => return Err(Error::UnexpectedBreakInLengthed("map")),
            (token, _) => item(tokens, token, depth)?,
        };
        let value = match (next(tokens)?, count) {
            (Token::Break, None) => return Err(Error::PartialMap),
            (Token::Break, Some(_)) => return Err(Error::UnexpectedBreakInLengthed("map")),
            (token, _) => item(tokens, token, depth)?,
        };
        if tokens.options().reject_duplicate_map_keys
            && !seen.insert(encode::encode(&key, &EncodeOptions::default()))
        {
            return Err(Error::DuplicateMapKey);
        }
        entries.push((key, value));
        parsed += 1;
    }
}

fn byte_chunks(tokens: &mut Tokeniser) -> Result<Vec<u8>, Error> {
    let mut v = Vec::new();
    loop {
        match next(tokens)? {
            Token::Bytes(b) => v.extend_from_slice(b),
            Token::Break => break Ok(v),
            _ => break Err(Error::InvalidChunk),
        }
    }
}

fn text_chunks(tokens: &mut Tokeniser) -> Result<String, Error> {
    let mut s = String::new();
    loop {
        match next(tokens)? {
            Token::Text(t) => s.push_str(t),
            Token::Break => break Ok(s),
            _ => break Err(Error::InvalidChunk),
        }
    }
}

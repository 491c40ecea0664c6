use super::cursor::Cursor;
use super::error::Error;
use super::half_precision::half_to_double;
use super::options::DecodeOptions;
use super::token::Token;
use tracing::trace;

/// Decodes a major type 7 item, `minor` having been split from the prefix byte.
///
/// On success the cursor has advanced past the item's trailing bytes. On
/// error its position is unspecified.
pub(crate) fn decode_simple<'a>(
    cursor: &mut Cursor<'a>,
    minor: u8,
    options: &DecodeOptions,
) -> Result<Token<'a>, Error> {
    match minor {
        20 => Ok(Token::Bool(false)),
        21 => Ok(Token::Bool(true)),
        22 => Ok(Token::Null),
        23 => {
            if !options.allow_undefined {
                trace!("Rejecting undefined");
                Err(Error::DisallowedUndefined)
            } else if options.coerce_undefined_to_null {
                Ok(Token::Null)
            } else {
                Ok(Token::Undefined)
            }
        }
        25 => {
            let b = cursor
                .read_array()
                .ok_or(Error::InsufficientData("float16"))?;
            check_special(half_to_double(u16::from_be_bytes(b)), options).map(Token::Float16)
        }
        26 => {
            let b = cursor
                .read_array()
                .ok_or(Error::InsufficientData("float32"))?;
            check_special(canonical_nan(f32::from_be_bytes(b).into()), options)
                .map(Token::Float32)
        }
        27 => {
            let b = cursor
                .read_array()
                .ok_or(Error::InsufficientData("float64"))?;
            check_special(canonical_nan(f64::from_be_bytes(b)), options).map(Token::Float64)
        }
        31 => {
            if options.allow_indefinite {
                Ok(Token::Break)
            } else {
                trace!("Rejecting break");
                Err(Error::DisallowedIndefinite)
            }
        }
        // 0..=19 unassigned, 24 extended simple values, 28..=30 reserved
        _ => Err(Error::UnsupportedSimpleValue(minor)),
    }
}

fn canonical_nan(value: f64) -> f64 {
    if value.is_nan() { f64::NAN } else { value }
}

/// NaN is checked before Infinity.
fn check_special(value: f64, options: &DecodeOptions) -> Result<f64, Error> {
    if value.is_nan() && !options.allow_nan {
        trace!("Rejecting NaN");
        Err(Error::DisallowedNaN)
    } else if value.is_infinite() && !options.allow_infinity {
        trace!("Rejecting {value}");
        Err(Error::DisallowedInfinity)
    } else {
        Ok(value)
    }
}

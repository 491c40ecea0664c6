/*!
IEEE-754 binary16 conversions.

Decoding widens a half-precision bit pattern to `f64`; encoding narrows an
`f64` and checks whether the narrowing was exact.
*/

use half::f16;

/// Widens a binary16 bit pattern to `f64`.
///
/// Every NaN pattern decodes to [`f64::NAN`]; payloads are not carried across.
pub fn half_to_double(bits: u16) -> f64 {
    let h = f16::from_bits(bits);
    if h.is_nan() { f64::NAN } else { h.to_f64() }
}

/// Narrows `value` to the nearest binary16 bit pattern, ties to even.
///
/// Magnitudes beyond 65504 saturate to Infinity, tiny magnitudes become
/// subnormals or a signed zero.
pub fn double_to_half(value: f64) -> u16 {
    f16::from_f64(value).to_bits()
}

/// Returns the binary16 pattern for `value` when it widens back to exactly
/// `value`, sign of zero included.
pub fn lossless_half(value: f64) -> Option<u16> {
    let bits = double_to_half(value);
    let back = half_to_double(bits);
    (back == value && back.is_sign_negative() == value.is_sign_negative()).then_some(bits)
}

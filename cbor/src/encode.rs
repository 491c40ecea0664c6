/*!
Canonical CBOR encoding.

Heads always use the shortest argument form and floats the narrowest width
that represents the value exactly, so equal values encode to equal bytes.
*/

use super::half_precision::lossless_half;
use super::options::{EncodeOptions, MapOrder};
use super::value::Value;
use alloc::{string::String, vec::Vec};

const FLOAT16: u8 = (7 << 5) | 25;
const FLOAT32: u8 = (7 << 5) | 26;
const FLOAT64: u8 = (7 << 5) | 27;

pub trait ToCbor {
    fn to_cbor(&self, encoder: &mut Encoder);
}

pub struct Encoder {
    data: Vec<u8>,
    options: EncodeOptions,
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder {
    pub fn new() -> Self {
        Self::with_options(EncodeOptions::default())
    }

    pub fn with_options(options: EncodeOptions) -> Self {
        Self {
            data: Vec::new(),
            options,
        }
    }

    pub fn options(&self) -> &EncodeOptions {
        &self.options
    }

    pub fn build(self) -> Vec<u8> {
        self.data
    }

    pub fn offset(&self) -> usize {
        self.data.len()
    }

    fn emit_uint_minor(&mut self, major: u8, val: u64) {
        if val < 24 {
            self.data.push((major << 5) | (val as u8))
        } else if val <= u8::MAX as u64 {
            self.data.push((major << 5) | 24u8);
            self.data.push(val as u8)
        } else if val <= u16::MAX as u64 {
            self.data.push((major << 5) | 25u8);
            self.data.extend((val as u16).to_be_bytes())
        } else if val <= u32::MAX as u64 {
            self.data.push((major << 5) | 26u8);
            self.data.extend((val as u32).to_be_bytes())
        } else {
            self.data.push((major << 5) | 27u8);
            self.data.extend(val.to_be_bytes())
        }
    }

    /// Writes `value` in the narrowest float width that round-trips exactly,
    /// or always as float64 when [`EncodeOptions::float64`] is set.
    ///
    /// NaN is always written as the canonical quiet NaN; payloads are dropped.
    pub fn emit_float(&mut self, value: f64) {
        if self.options.float64 {
            let value = if value.is_nan() { f64::NAN } else { value };
            self.data.push(FLOAT64);
            self.data.extend(value.to_be_bytes())
        } else if value.is_nan() {
            self.data.extend([FLOAT16, 0x7E, 0x00])
        } else if value == f64::INFINITY {
            self.data.extend([FLOAT16, 0x7C, 0x00])
        } else if value == f64::NEG_INFINITY {
            self.data.extend([FLOAT16, 0xFC, 0x00])
        } else if let Some(bits) = lossless_half(value) {
            self.data.push(FLOAT16);
            self.data.extend(bits.to_be_bytes())
        } else if let Some(f) = lossless_float_coerce::<f32>(value) {
            self.data.push(FLOAT32);
            self.data.extend(f.to_be_bytes())
        } else {
            self.data.push(FLOAT64);
            self.data.extend(value.to_be_bytes())
        }
    }

    pub fn emit_null(&mut self) {
        self.data.push((7 << 5) | 22)
    }

    pub fn emit_undefined(&mut self) {
        self.data.push((7 << 5) | 23)
    }

    pub fn emit<T>(&mut self, value: &T)
    where
        T: ToCbor + ?Sized,
    {
        value.to_cbor(self)
    }

    pub fn emit_tagged<T, I>(&mut self, value: &T, tags: I)
    where
        T: ToCbor + ?Sized,
        I: IntoIterator<Item = u64>,
    {
        for tag in tags {
            self.emit_uint_minor(6, tag);
        }
        self.emit(value)
    }

    /// Emits an array of `count` items (indefinite when `None`), filled by `f`.
    ///
    /// Panics if `f` emits a different number of items than `count`.
    pub fn emit_array<F>(&mut self, count: Option<usize>, f: F)
    where
        F: FnOnce(&mut Array),
    {
        let mut a = Array::new(self, count);
        f(&mut a);
        a.end()
    }

    /// Emits a map of `count` pairs (indefinite when `None`), filled by `f`
    /// with alternating keys and values.
    ///
    /// Entries are written as emitted; [`EncodeOptions::map_order`] only
    /// applies to [`Value::Map`].
    pub fn emit_map<F>(&mut self, count: Option<usize>, f: F)
    where
        F: FnOnce(&mut Map),
    {
        let mut m = Map::new(self, count);
        f(&mut m);
        m.end()
    }

    fn emit_entries(&mut self, entries: &[(Value, Value)]) {
        self.emit_uint_minor(5, entries.len() as u64);
        let order = self.options.map_order;
        if order == MapOrder::Insertion {
            for (k, v) in entries {
                self.emit(k);
                self.emit(v);
            }
            return;
        }

        let mut encoded = entries
            .iter()
            .map(|(k, v)| (self.nested(k), self.nested(v)))
            .collect::<Vec<_>>();
        encoded.sort_by(|(a, _), (b, _)| {
            order
                .compare(a, b)
                .unwrap_or(core::cmp::Ordering::Equal)
        });
        for (k, v) in encoded {
            self.data.extend(k);
            self.data.extend(v);
        }
    }

    fn nested<T>(&self, value: &T) -> Vec<u8>
    where
        T: ToCbor + ?Sized,
    {
        let mut e = Encoder::with_options(self.options);
        e.emit(value);
        e.build()
    }
}

pub struct Sequence<'a, const D: usize> {
    encoder: &'a mut Encoder,
    count: Option<usize>,
    idx: usize,
}

pub type Array<'a> = Sequence<'a, 1>;
pub type Map<'a> = Sequence<'a, 2>;

impl<'a, const D: usize> Sequence<'a, D> {
    fn new(encoder: &'a mut Encoder, count: Option<usize>) -> Self {
        let major = if D == 1 { 4 } else { 5 };
        if let Some(count) = count {
            encoder.emit_uint_minor(major, count as u64);
        } else {
            encoder.data.push((major << 5) | 31);
        }
        Self {
            encoder,
            count: count.map(|c| c * D),
            idx: 0,
        }
    }

    fn next_field(&mut self) -> &mut Encoder {
        self.idx += 1;
        match self.count {
            Some(count) if self.idx > count => {
                panic!("Too many items added to definite length sequence")
            }
            _ => {}
        };
        self.encoder
    }

    fn end(self) {
        let Some(count) = self.count else {
            return self.encoder.data.push(0xFF);
        };
        if self.idx != count {
            panic!(
                "Definite length sequence is short of items: {}, expected {}",
                self.idx, count
            );
        }
    }

    pub fn emit<T>(&mut self, value: &T)
    where
        T: ToCbor + ?Sized,
    {
        self.next_field().emit(value)
    }

    pub fn emit_float(&mut self, value: f64) {
        self.next_field().emit_float(value)
    }

    pub fn emit_array<F>(&mut self, count: Option<usize>, f: F)
    where
        F: FnOnce(&mut Array),
    {
        self.next_field().emit_array(count, f)
    }

    pub fn emit_map<F>(&mut self, count: Option<usize>, f: F)
    where
        F: FnOnce(&mut Map),
    {
        self.next_field().emit_map(count, f)
    }
}

macro_rules! impl_uint_to_cbor {
    ($($ty:ty),*) => {
        $(
            impl ToCbor for $ty {
                fn to_cbor(&self, encoder: &mut Encoder) {
                    encoder.emit_uint_minor(0, *self as u64);
                }
            }
        )*
    };
}

impl_uint_to_cbor!(u8, u16, u32, u64, usize);

fn emit_i64(encoder: &mut Encoder, val: i64) {
    if val >= 0 {
        encoder.emit_uint_minor(0, val as u64);
    } else {
        encoder.emit_uint_minor(1, (-1 - val) as u64);
    }
}

macro_rules! impl_int_to_cbor {
    ($($ty:ty),*) => {
        $(
            impl ToCbor for $ty {
                fn to_cbor(&self, encoder: &mut Encoder) {
                    emit_i64(encoder, *self as i64)
                }
            }
        )*
    };
}

impl_int_to_cbor!(i8, i16, i32, i64, isize);

fn lossless_float_coerce<T>(value: f64) -> Option<T>
where
    T: num_traits::FromPrimitive + Into<f64> + Copy,
{
    match <T as num_traits::FromPrimitive>::from_f64(value) {
        Some(f) if <T as Into<f64>>::into(f) == value => Some(f),
        _ => None,
    }
}

impl ToCbor for f64 {
    fn to_cbor(&self, encoder: &mut Encoder) {
        encoder.emit_float(*self)
    }
}

impl ToCbor for f32 {
    fn to_cbor(&self, encoder: &mut Encoder) {
        encoder.emit_float((*self).into())
    }
}

impl ToCbor for half::f16 {
    fn to_cbor(&self, encoder: &mut Encoder) {
        encoder.emit_float(self.to_f64())
    }
}

impl ToCbor for bool {
    fn to_cbor(&self, encoder: &mut Encoder) {
        encoder.data.push((7 << 5) | if *self { 21 } else { 20 })
    }
}

impl ToCbor for str {
    fn to_cbor(&self, encoder: &mut Encoder) {
        encoder.emit_uint_minor(3, self.len() as u64);
        encoder.data.extend_from_slice(self.as_bytes())
    }
}

impl ToCbor for String {
    fn to_cbor(&self, encoder: &mut Encoder) {
        self.as_str().to_cbor(encoder)
    }
}

impl ToCbor for [u8] {
    fn to_cbor(&self, encoder: &mut Encoder) {
        encoder.emit_uint_minor(2, self.len() as u64);
        encoder.data.extend_from_slice(self)
    }
}

impl ToCbor for Vec<u8> {
    fn to_cbor(&self, encoder: &mut Encoder) {
        self.as_slice().to_cbor(encoder)
    }
}

impl<const N: usize> ToCbor for [u8; N] {
    fn to_cbor(&self, encoder: &mut Encoder) {
        self.as_slice().to_cbor(encoder)
    }
}

impl<T> ToCbor for Option<T>
where
    T: ToCbor,
{
    fn to_cbor(&self, encoder: &mut Encoder) {
        match self {
            Some(value) => encoder.emit(value),
            None => encoder.emit_null(),
        }
    }
}

impl<T> ToCbor for &T
where
    T: ToCbor + ?Sized,
{
    fn to_cbor(&self, encoder: &mut Encoder) {
        (**self).to_cbor(encoder)
    }
}

macro_rules! impl_slice_to_cbor {
    ($( $value_type:ty),*) => {
        $(
            impl ToCbor for [$value_type] {
                fn to_cbor(&self, encoder: &mut Encoder) {
                    encoder.emit_uint_minor(4, self.len() as u64);
                    for value in self {
                        encoder.emit(value);
                    }
                }
            }
        )*
    };
}

impl_slice_to_cbor!(
    u16,
    u32,
    u64,
    usize,
    i8,
    i16,
    i32,
    i64,
    isize,
    half::f16,
    f32,
    f64,
    bool,
    String,
    Value
);

impl ToCbor for Value {
    fn to_cbor(&self, encoder: &mut Encoder) {
        match self {
            Value::Unsigned(n) => encoder.emit_uint_minor(0, *n),
            Value::Negative(n) => encoder.emit_uint_minor(1, *n),
            Value::Bytes(b) => encoder.emit(b.as_slice()),
            Value::Text(s) => encoder.emit(s.as_str()),
            Value::Array(items) => encoder.emit(items.as_slice()),
            Value::Map(entries) => encoder.emit_entries(entries),
            Value::Tagged(tag, value) => encoder.emit_tagged(&**value, [*tag]),
            Value::Bool(b) => encoder.emit(b),
            Value::Null => encoder.emit_null(),
            Value::Undefined => encoder.emit_undefined(),
            Value::Float(f) => encoder.emit_float(*f),
        }
    }
}

/// Encodes `value` with the given options.
pub fn encode<T>(value: &T, options: &EncodeOptions) -> Vec<u8>
where
    T: ToCbor + ?Sized,
{
    let mut e = Encoder::with_options(*options);
    e.emit(value);
    e.build()
}

/// Encodes `value` with the default options.
pub fn emit<T>(value: &T) -> Vec<u8>
where
    T: ToCbor + ?Sized,
{
    encode(value, &EncodeOptions::default())
}

pub fn emit_tagged<T, I>(value: &T, tags: I) -> Vec<u8>
where
    T: ToCbor + ?Sized,
    I: IntoIterator<Item = u64>,
{
    let mut e = Encoder::new();
    e.emit_tagged(value, tags);
    e.build()
}

pub fn emit_array<F>(count: Option<usize>, f: F) -> Vec<u8>
where
    F: FnOnce(&mut Array),
{
    let mut e = Encoder::new();
    e.emit_array(count, f);
    e.build()
}

pub fn emit_map<F>(count: Option<usize>, f: F) -> Vec<u8>
where
    F: FnOnce(&mut Map),
{
    let mut e = Encoder::new();
    e.emit_map(count, f);
    e.build()
}

use super::decode::decode;
use super::encode::*;
use super::options::{DecodeOptions, EncodeOptions, MapOrder};
use super::value::Value;
use alloc::{boxed::Box, vec, vec::Vec};
use hex_literal::hex;

fn text(s: &str) -> Value {
    Value::Text(s.into())
}

fn float64() -> EncodeOptions {
    EncodeOptions {
        float64: true,
        ..EncodeOptions::default()
    }
}

#[test]
fn rfc_tests() {
    // RFC 8949, Appendix A:
    // https://www.rfc-editor.org/rfc/rfc8949.html#section-appendix.a

    assert_eq!(*emit(&0), hex!("00"));
    assert_eq!(*emit(&1), hex!("01"));
    assert_eq!(*emit(&10), hex!("0a"));
    assert_eq!(*emit(&23), hex!("17"));
    assert_eq!(*emit(&24), hex!("1818"));
    assert_eq!(*emit(&25), hex!("1819"));
    assert_eq!(*emit(&100), hex!("1864"));
    assert_eq!(*emit(&1000), hex!("1903e8"));
    assert_eq!(*emit(&1000000), hex!("1a000f4240"));
    assert_eq!(*emit(&1000000000000u64), hex!("1b000000e8d4a51000"));
    assert_eq!(*emit(&18446744073709551615u64), hex!("1bffffffffffffffff"));
    assert_eq!(
        *emit(&Value::Tagged(
            2,
            Box::new(Value::Bytes(hex!("010000000000000000").to_vec()))
        )),
        hex!("c249010000000000000000")
    );
    assert_eq!(
        *emit(&Value::Negative(u64::MAX)),
        hex!("3bffffffffffffffff")
    );
    assert_eq!(*emit(&-1), hex!("20"));
    assert_eq!(*emit(&-10), hex!("29"));
    assert_eq!(*emit(&-100), hex!("3863"));
    assert_eq!(*emit(&-1000), hex!("3903e7"));
    assert_eq!(*emit(&i64::MIN), hex!("3b7fffffffffffffff"));

    assert_eq!(*emit(&0.0), hex!("f90000"));
    assert_eq!(*emit(&-0.0), hex!("f98000"));
    assert_eq!(*emit(&1.0), hex!("f93c00"));
    assert_eq!(*emit(&1.1), hex!("fb3ff199999999999a"));
    assert_eq!(*emit(&1.5), hex!("f93e00"));
    assert_eq!(*emit(&65504.0), hex!("f97bff"));
    assert_eq!(*emit(&100000.0), hex!("fa47c35000"));
    assert_eq!(*emit(&3.4028234663852886e+38), hex!("fa7f7fffff"));
    assert_eq!(*emit(&1.0e+300), hex!("fb7e37e43c8800759c"));
    assert_eq!(*emit(&5.960464477539063e-8), hex!("f90001"));
    assert_eq!(*emit(&0.00006103515625), hex!("f90400"));
    assert_eq!(*emit(&-4.0), hex!("f9c400"));
    assert_eq!(*emit(&-4.1), hex!("fbc010666666666666"));
    assert_eq!(*emit(&half::f16::INFINITY), hex!("f97c00"));
    assert_eq!(*emit(&half::f16::NAN), hex!("f97e00"));
    assert_eq!(*emit(&half::f16::NEG_INFINITY), hex!("f9fc00"));

    /* Specials always take the shortest form, whatever their source width */
    assert_eq!(*emit(&f32::INFINITY), hex!("f97c00"));
    assert_eq!(*emit(&f32::NAN), hex!("f97e00"));
    assert_eq!(*emit(&f32::NEG_INFINITY), hex!("f9fc00"));
    assert_eq!(*emit(&f64::INFINITY), hex!("f97c00"));
    assert_eq!(*emit(&f64::NAN), hex!("f97e00"));
    assert_eq!(*emit(&f64::NEG_INFINITY), hex!("f9fc00"));

    assert_eq!(*emit(&false), hex!("f4"));
    assert_eq!(*emit(&true), hex!("f5"));
    assert_eq!(*emit(&Value::Null), hex!("f6"));
    assert_eq!(*emit(&Value::Undefined), hex!("f7"));
    assert_eq!(
        *emit_tagged("2013-03-21T20:04:00Z", [0]),
        hex!("c074323031332d30332d32315432303a30343a30305a")
    );
    assert_eq!(*emit_tagged(&1363896240, [1]), hex!("c11a514b67b0"));
    assert_eq!(
        *emit_tagged(&1363896240.5, [1]),
        hex!("c1fb41d452d9ec200000")
    );
    assert_eq!(
        *emit_tagged(&hex!("01020304"), [23]),
        hex!("d74401020304")
    );
    assert_eq!(
        *emit_tagged(&hex!("6449455446"), [24]),
        hex!("d818456449455446")
    );
    assert_eq!(
        *emit_tagged("http://www.example.com", [32]),
        hex!("d82076687474703a2f2f7777772e6578616d706c652e636f6d")
    );
    assert_eq!(*emit::<[u8]>(&[]), hex!("40"));
    assert_eq!(*emit(&hex!("01020304")), hex!("4401020304"));
    assert_eq!(*emit(""), hex!("60"));
    assert_eq!(*emit("a"), hex!("6161"));
    assert_eq!(*emit("IETF"), hex!("6449455446"));
    assert_eq!(*emit("\"\\"), hex!("62225c"));
    assert_eq!(*emit("\u{00fc}"), hex!("62c3bc"));
    assert_eq!(*emit("\u{6c34}"), hex!("63e6b0b4"));
    assert_eq!(
        *emit("\u{10151}" /* surrogate pair: \u{d800}\u{dd51} */,),
        hex!("64f0908591")
    );
    assert_eq!(*emit_array(Some(0), |_| {}), hex!("80"));
    assert_eq!(*emit::<[u16]>(&[]), hex!("80"));
    assert_eq!(
        *emit_array(Some(3), |a| {
            a.emit(&1);
            a.emit(&2);
            a.emit(&3);
        }),
        hex!("83010203")
    );
    assert_eq!(*emit(&[1, 2, 3][..]), hex!("83010203"));
    assert_eq!(
        *emit_array(Some(3), |a| {
            a.emit(&1);
            a.emit(&[2, 3][..]);
            a.emit_array(Some(2), |a| {
                a.emit(&4);
                a.emit(&5);
            });
        }),
        hex!("8301820203820405")
    );
    assert_eq!(
        *emit((1..=25).collect::<Vec<u64>>().as_slice()),
        hex!("98190102030405060708090a0b0c0d0e0f101112131415161718181819")
    );

    assert_eq!(*emit_map(Some(0), |_| {}), hex!("a0"));
    assert_eq!(
        *emit_map(Some(2), |m| {
            m.emit(&1);
            m.emit(&2);
            m.emit(&3);
            m.emit(&4);
        }),
        hex!("a201020304")
    );
    assert_eq!(
        *emit_map(Some(2), |m| {
            m.emit("a");
            m.emit(&1);
            m.emit("b");
            m.emit(&[2, 3][..]);
        }),
        hex!("a26161016162820203")
    );
    assert_eq!(
        *emit_array(Some(2), |a| {
            a.emit("a");
            a.emit_map(Some(1), |m| {
                m.emit("b");
                m.emit("c");
            });
        }),
        hex!("826161a161626163")
    );
    assert_eq!(
        *emit(&Value::Map(vec![
            (text("e"), text("E")),
            (text("d"), text("D")),
            (text("c"), text("C")),
            (text("b"), text("B")),
            (text("a"), text("A")),
        ])),
        hex!("a56161614161626142616361436164614461656145")
    );

    /* Indefinite length arrays and maps */
    assert_eq!(*emit_array(None, |_| {}), hex!("9fff"));
    assert_eq!(
        *emit_array(None, |a| {
            a.emit(&1);
            a.emit(&[2, 3][..]);
            a.emit_array(None, |a| {
                a.emit(&4);
                a.emit(&5);
            });
        }),
        hex!("9f018202039f0405ffff")
    );
    assert_eq!(
        *emit_array(Some(3), |a| {
            a.emit(&1);
            a.emit_array(None, |a| {
                a.emit(&2);
                a.emit(&3);
            });
            a.emit(&[4, 5][..]);
        }),
        hex!("83019f0203ff820405")
    );
    assert_eq!(
        *emit_map(None, |m| {
            m.emit("a");
            m.emit(&1);
            m.emit("b");
            m.emit_array(None, |a| {
                a.emit(&2);
                a.emit(&3);
            });
        }),
        hex!("bf61610161629f0203ffff")
    );
    assert_eq!(
        *emit_map(None, |m| {
            m.emit("Fun");
            m.emit(&true);
            m.emit("Amt");
            m.emit(&-2);
        }),
        hex!("bf6346756ef563416d7421ff")
    );
}

#[test]
fn narrowest_float_width() {
    assert_eq!(*emit(&0.5), hex!("f93800"));
    assert_eq!(*emit(&0.5f32), hex!("f93800"));
    assert_eq!(*emit(&65505.0), hex!("fa477fe100"));
    assert_eq!(*emit(&100000.0f32), hex!("fa47c35000"));
    assert_eq!(*emit(&(0.1f32 as f64)), hex!("fa3dcccccd"));
    assert_eq!(*emit(&0.1), hex!("fb3fb999999999999a"));
    /* NaN payloads and sign are dropped */
    assert_eq!(
        *emit(&f64::from_bits(0xfff8_0000_0000_0001)),
        hex!("f97e00")
    );
    assert_eq!(*emit(&f32::from_bits(0x7fc0_0001)), hex!("f97e00"));
    assert_eq!(*emit(&Value::Float(f64::NAN)), hex!("f97e00"));
}

#[test]
fn forced_float64() {
    let o = float64();
    assert_eq!(*encode(&1.0, &o), hex!("fb3ff0000000000000"));
    assert_eq!(*encode(&0.5f32, &o), hex!("fb3fe0000000000000"));
    assert_eq!(*encode(&-0.0, &o), hex!("fb8000000000000000"));
    assert_eq!(*encode(&f64::INFINITY, &o), hex!("fb7ff0000000000000"));
    assert_eq!(*encode(&f64::NEG_INFINITY, &o), hex!("fbfff0000000000000"));
    assert_eq!(*encode(&f64::NAN, &o), hex!("fb7ff8000000000000"));
    assert_eq!(*encode(&f32::NAN, &o), hex!("fb7ff8000000000000"));
    assert_eq!(
        *encode(&f64::from_bits(0x7ff0_0000_0000_0001), &o),
        hex!("fb7ff8000000000000")
    );
    for f in [0.0, 1.5, -4.1, 1.0e300, f64::INFINITY, f64::NAN] {
        assert_eq!(encode(&f, &o).len(), 9);
    }

    /* Applies to nested floats too, and leaves everything else alone */
    assert_eq!(
        *encode(&Value::Array(vec![1.into(), 1.5.into(), Value::Null]), &o),
        hex!("8301fb3ff8000000000000f6")
    );
    assert_eq!(
        *encode(&Value::Map(vec![(1.5.into(), 2.into())]), &o),
        hex!("a1fb3ff800000000000002")
    );
}

#[test]
fn map_order() {
    let m = Value::Map(vec![
        (text("b"), 1.into()),
        (1000.into(), 2.into()),
        (10.into(), 3.into()),
    ]);
    assert_eq!(*emit(&m), hex!("a30a036162011903e802"));
    assert_eq!(
        *encode(
            &m,
            &EncodeOptions {
                map_order: MapOrder::Bytewise,
                ..EncodeOptions::default()
            }
        ),
        hex!("a30a031903e802616201")
    );
    assert_eq!(
        *encode(
            &m,
            &EncodeOptions {
                map_order: MapOrder::Insertion,
                ..EncodeOptions::default()
            }
        ),
        hex!("a36162011903e8020a03")
    );

    /* Builders write entries as emitted */
    assert_eq!(
        *emit_map(Some(2), |m| {
            m.emit(&10);
            m.emit(&1);
            m.emit(&1);
            m.emit(&2);
        }),
        hex!("a20a010102")
    );
}

#[test]
fn optional_values() {
    assert_eq!(*emit(&None::<i32>), hex!("f6"));
    assert_eq!(*emit(&Some(1)), hex!("01"));
    assert_eq!(
        *emit_array(Some(2), |a| {
            a.emit(&Some(1.5));
            a.emit(&None::<f64>);
        }),
        hex!("82f93e00f6")
    );
}

#[test]
fn round_trip() {
    let o = DecodeOptions::default();
    let values = [
        Value::from(0),
        Value::from(u64::MAX),
        Value::from(i64::MIN),
        Value::from(1.5),
        Value::from(65505.0),
        Value::from(1.0e300),
        Value::from(5.960464477539063e-8),
        Value::Float(f64::INFINITY),
        Value::Float(f64::NEG_INFINITY),
        Value::Float(f64::MIN_POSITIVE),
        Value::Null,
        Value::Undefined,
        Value::Bool(false),
        text("\u{10151}"),
        Value::Bytes(hex!("00ff").to_vec()),
        Value::Tagged(1, Box::new(1363896240.5.into())),
        Value::Array(vec![1.into(), Value::Array(vec![0.1.into()])]),
    ];
    for v in values {
        assert_eq!(decode(emit(&v), &o), Ok(v.clone()));
        assert_eq!(decode(encode(&v, &float64()), &o), Ok(v));
    }

    let zero = decode(emit(&-0.0), &o).unwrap().as_f64().unwrap();
    assert_eq!(zero.to_bits(), (-0.0f64).to_bits());

    let nan = decode(emit(&f64::NAN), &o).unwrap().as_f64().unwrap();
    assert!(nan.is_nan());
}

/// xorshift64, so the sweep below is repeatable.
struct Bits(u64);

impl Bits {
    fn next_u64(&mut self) -> u64 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        self.0
    }
}

/// Width the canonical path should choose for a non-NaN `f`.
fn expected_len(f: f64) -> usize {
    if half::f16::from_f64(f).to_f64().to_bits() == f.to_bits() {
        3
    } else if (f as f32) as f64 == f {
        5
    } else {
        9
    }
}

fn check_float(f: f64) {
    let o = DecodeOptions::default();
    let bytes = emit(&f);
    assert_eq!(bytes.len(), expected_len(f), "{f:e} as {bytes:02x?}");
    match decode(&bytes, &o) {
        Ok(Value::Float(g)) => assert_eq!(g.to_bits(), f.to_bits(), "{bytes:02x?}"),
        r => panic!("{bytes:02x?} decoded as {r:?}"),
    }

    let wide = encode(&f, &float64());
    assert_eq!(wide.len(), 9);
    let g = decode(&wide, &o).unwrap().as_f64().unwrap();
    assert_eq!(g.to_bits(), f.to_bits(), "{wide:02x?}");
}

#[test]
fn random_float_widths() {
    let mut bits = Bits(0x2545_f491_4f6c_dd1d);
    for _ in 0..10_000 {
        let f = half::f16::from_bits(bits.next_u64() as u16).to_f64();
        if !f.is_nan() {
            assert_eq!(expected_len(f), 3);
            check_float(f);
        }

        let f = f32::from_bits(bits.next_u64() as u32) as f64;
        if !f.is_nan() {
            assert!(expected_len(f) <= 5);
            check_float(f);
        }

        let f = f64::from_bits(bits.next_u64());
        if !f.is_nan() {
            check_float(f);
        }
    }
}

#[test]
#[should_panic(expected = "short of items")]
fn short_definite_array() {
    emit_array(Some(2), |a| a.emit(&1));
}

#[test]
#[should_panic(expected = "Too many items")]
fn overfull_definite_map() {
    emit_map(Some(1), |m| {
        m.emit(&1);
        m.emit(&2);
        m.emit(&3);
    });
}

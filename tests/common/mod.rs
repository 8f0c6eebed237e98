//! Shared test harness: an in-memory value tree with matching encoders and
//! decoders. The tree exists only for testing — the codec itself never
//! builds one.

#![allow(dead_code)]

use std::io::Read;

use bytes::BytesMut;
use proptest::prelude::*;

use msgpackr::encode::value::*;
use msgpackr::{Header, Kind, StreamUnpacker, Unpacker};

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Nil,
    Bool(bool),
    Uint(u64),
    Sint(i64),
    F32(f32),
    F64(f64),
    Str(String),
    Bin(Vec<u8>),
    Ext(i8, Vec<u8>),
    Array(Vec<Value>),
    Map(Vec<(Value, Value)>),
}

/// Buckets a float the way the minimal encoder will: values that survive a
/// 4-byte round-trip bit-exactly travel (and therefore decode) as f32.
pub fn float_value(v: f64) -> Value {
    let narrow = v as f32;
    if f64::from(narrow).to_bits() == v.to_bits() {
        Value::F32(narrow)
    } else {
        Value::F64(v)
    }
}

pub fn encode_value(buf: &mut BytesMut, value: &Value) {
    match value {
        Value::Nil => encode_nil(buf),
        Value::Bool(b) => encode_bool(buf, *b),
        Value::Uint(v) => encode_uint(buf, *v),
        Value::Sint(v) => encode_sint(buf, *v),
        Value::F32(v) => encode_float(buf, f64::from(*v)),
        Value::F64(v) => encode_float(buf, *v),
        Value::Str(s) => encode_str(buf, s).unwrap(),
        Value::Bin(b) => encode_bin(buf, b).unwrap(),
        Value::Ext(t, d) => encode_ext(buf, *t, d).unwrap(),
        Value::Array(items) => {
            encode_array_header(buf, items.len()).unwrap();
            for item in items {
                encode_value(buf, item);
            }
        }
        Value::Map(pairs) => {
            encode_map_header(buf, pairs.len()).unwrap();
            for (k, v) in pairs {
                encode_value(buf, k);
                encode_value(buf, v);
            }
        }
    }
}

pub fn decode_value(un: &mut Unpacker<'_>) -> Value {
    let kind = un.peek().expect("peek failed");
    let header = un.advance(kind);
    decode_body(un, &header)
}

pub fn decode_body(un: &mut Unpacker<'_>, header: &Header) -> Value {
    match header.kind {
        Kind::Nil => {
            un.as_nil(header).unwrap();
            Value::Nil
        }
        Kind::False | Kind::True => Value::Bool(un.as_bool(header).unwrap()),
        Kind::PosFixInt(_) | Kind::Uint8 | Kind::Uint16 | Kind::Uint32 | Kind::Uint64 => {
            Value::Uint(un.as_int::<u64>(header).unwrap())
        }
        Kind::NegFixInt(_) | Kind::Int8 | Kind::Int16 | Kind::Int32 | Kind::Int64 => {
            Value::Sint(un.as_int::<i64>(header).unwrap())
        }
        Kind::Float32 => Value::F32(un.as_float::<f32>(header).unwrap()),
        Kind::Float64 => Value::F64(un.as_float::<f64>(header).unwrap()),
        Kind::FixStr(_) | Kind::Str8 | Kind::Str16 | Kind::Str32 => {
            Value::Str(un.as_str(header).unwrap().to_owned())
        }
        Kind::Bin8 | Kind::Bin16 | Kind::Bin32 => Value::Bin(un.as_raw(header).unwrap().to_vec()),
        Kind::FixExt1
        | Kind::FixExt2
        | Kind::FixExt4
        | Kind::FixExt8
        | Kind::FixExt16
        | Kind::Ext8
        | Kind::Ext16
        | Kind::Ext32 => Value::Ext(header.ext_type, un.as_raw(header).unwrap().to_vec()),
        Kind::FixArray(_) | Kind::Array16 | Kind::Array32 => {
            let mut items = Vec::with_capacity(header.size as usize);
            let mut cursor = un.open_array(header).unwrap();
            while let Some(kind) = cursor.peek() {
                let kind = kind.unwrap();
                let child = cursor.advance(kind);
                let item = decode_body(cursor.unpacker(), &child);
                items.push(item);
            }
            assert!(cursor.is_exhausted());
            Value::Array(items)
        }
        Kind::FixMap(_) | Kind::Map16 | Kind::Map32 => {
            let mut pairs = Vec::with_capacity(header.size as usize);
            let mut cursor = un.open_map(header).unwrap();
            while let Some(kind) = cursor.peek() {
                let kind = kind.unwrap();
                let child = cursor.advance(kind);
                let key = decode_body(cursor.unpacker(), &child);

                let kind = cursor.peek().expect("value after key").unwrap();
                let child = cursor.advance(kind);
                let value = decode_body(cursor.unpacker(), &child);
                pairs.push((key, value));
            }
            assert!(cursor.is_exhausted());
            Value::Map(pairs)
        }
    }
}

pub fn decode_stream_value<R: Read>(un: &mut StreamUnpacker<'_>, src: &mut R) -> Value {
    let header = un.next(src).expect("next failed");
    decode_stream_body(un, src, &header)
}

pub fn decode_stream_body<R: Read>(
    un: &mut StreamUnpacker<'_>,
    src: &mut R,
    header: &Header,
) -> Value {
    match header.kind {
        Kind::Nil => {
            un.as_nil(src, header).unwrap();
            Value::Nil
        }
        Kind::False | Kind::True => Value::Bool(un.as_bool(src, header).unwrap()),
        Kind::PosFixInt(_) | Kind::Uint8 | Kind::Uint16 | Kind::Uint32 | Kind::Uint64 => {
            Value::Uint(un.as_int::<u64, _>(src, header).unwrap())
        }
        Kind::NegFixInt(_) | Kind::Int8 | Kind::Int16 | Kind::Int32 | Kind::Int64 => {
            Value::Sint(un.as_int::<i64, _>(src, header).unwrap())
        }
        Kind::Float32 => Value::F32(un.as_float::<f32, _>(src, header).unwrap()),
        Kind::Float64 => Value::F64(un.as_float::<f64, _>(src, header).unwrap()),
        Kind::FixStr(_) | Kind::Str8 | Kind::Str16 | Kind::Str32 => {
            Value::Str(String::from_utf8(read_raw(un, src, header)).unwrap())
        }
        Kind::Bin8 | Kind::Bin16 | Kind::Bin32 => Value::Bin(read_raw(un, src, header)),
        Kind::FixExt1
        | Kind::FixExt2
        | Kind::FixExt4
        | Kind::FixExt8
        | Kind::FixExt16
        | Kind::Ext8
        | Kind::Ext16
        | Kind::Ext32 => Value::Ext(header.ext_type, read_raw(un, src, header)),
        Kind::FixArray(_) | Kind::Array16 | Kind::Array32 => {
            let mut items = Vec::with_capacity(header.size as usize);
            let mut cursor = un.open_array(header).unwrap();
            while let Some(child) = cursor.next(src).unwrap() {
                let item = decode_stream_body(cursor.unpacker(), src, &child);
                items.push(item);
            }
            Value::Array(items)
        }
        Kind::FixMap(_) | Kind::Map16 | Kind::Map32 => {
            let mut pairs = Vec::with_capacity(header.size as usize);
            let mut cursor = un.open_map(header).unwrap();
            while let Some(child) = cursor.next(src).unwrap() {
                let key = decode_stream_body(cursor.unpacker(), src, &child);
                let child = cursor.next(src).unwrap().expect("value after key");
                let value = decode_stream_body(cursor.unpacker(), src, &child);
                pairs.push((key, value));
            }
            Value::Map(pairs)
        }
    }
}

fn read_raw<R: Read>(un: &mut StreamUnpacker<'_>, src: &mut R, header: &Header) -> Vec<u8> {
    let mut data = Vec::with_capacity(header.size as usize);
    let mut raw = un.raw_reader(src, header).unwrap();
    raw.read_to_end(&mut data).unwrap();
    assert_eq!(data.len(), header.size as usize);
    data
}

/// A source that yields at most `chunk` bytes per read call, exercising
/// arbitrary refill boundaries.
pub struct ChunkedReader<'a> {
    data: &'a [u8],
    pos: usize,
    chunk: usize,
}

impl<'a> ChunkedReader<'a> {
    pub fn new(data: &'a [u8], chunk: usize) -> Self {
        assert!(chunk > 0);
        Self {
            data,
            pos: 0,
            chunk,
        }
    }
}

impl Read for ChunkedReader<'_> {
    fn read(&mut self, out: &mut [u8]) -> std::io::Result<usize> {
        let left = self.data.len() - self.pos;
        let take = left.min(self.chunk).min(out.len());
        out[..take].copy_from_slice(&self.data[self.pos..self.pos + take]);
        self.pos += take;
        Ok(take)
    }
}

fn arb_float() -> impl Strategy<Value = Value> {
    use proptest::num::f64::{INFINITE, NEGATIVE, NORMAL, POSITIVE, SUBNORMAL, ZERO};
    (POSITIVE | NEGATIVE | NORMAL | SUBNORMAL | ZERO | INFINITE).prop_map(float_value)
}

pub fn arb_leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Nil),
        any::<bool>().prop_map(Value::Bool),
        any::<u64>().prop_map(Value::Uint),
        (i64::MIN..0i64).prop_map(Value::Sint),
        arb_float(),
        ".{0,40}".prop_map(Value::Str),
        proptest::collection::vec(any::<u8>(), 0..40).prop_map(Value::Bin),
        (any::<i8>(), proptest::collection::vec(any::<u8>(), 0..20))
            .prop_map(|(t, d)| Value::Ext(t, d)),
    ]
}

pub fn arb_value() -> impl Strategy<Value = Value> {
    arb_leaf().prop_recursive(4, 24, 6, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            proptest::collection::vec((arb_leaf(), inner), 0..4).prop_map(Value::Map),
        ]
    })
}

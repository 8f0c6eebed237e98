//! Buffer-mode value encoding: host values → MessagePack bytes in a
//! caller-owned buffer.
//!
//! The `encode_uint`/`encode_sint`/`encode_float` routines pick the
//! smallest tag whose range contains the value; the width-named routines
//! (`encode_u16`, `encode_i8`, ...) emit the tag matching the named width
//! irrespective of the runtime value.

use bytes::BufMut;

use super::prefix::Prefix;
use crate::error::PackError;
use crate::format::marker;

pub fn encode_nil<B: BufMut>(buf: &mut B) {
    buf.put_u8(marker::NIL);
}

pub fn encode_bool<B: BufMut>(buf: &mut B, value: bool) {
    buf.put_u8(if value { marker::TRUE } else { marker::FALSE });
}

/// Encodes an unsigned integer using the smallest representation.
pub fn encode_uint<B: BufMut>(buf: &mut B, value: u64) {
    if value <= u64::from(marker::POS_FIXINT_MAX) {
        buf.put_u8(value as u8);
    } else if value <= u64::from(u8::MAX) {
        buf.put_u8(marker::UINT_8);
        buf.put_u8(value as u8);
    } else if value <= u64::from(u16::MAX) {
        buf.put_u8(marker::UINT_16);
        buf.put_u16(value as u16);
    } else if value <= u64::from(u32::MAX) {
        buf.put_u8(marker::UINT_32);
        buf.put_u32(value as u32);
    } else {
        buf.put_u8(marker::UINT_64);
        buf.put_u64(value);
    }
}

/// Encodes a signed integer using the smallest representation.
///
/// The chooser is value-based: non-negative values take the unsigned
/// ladder, so 0..=127 still lands on positive fixint.
pub fn encode_sint<B: BufMut>(buf: &mut B, value: i64) {
    if value >= 0 {
        encode_uint(buf, value as u64);
    } else if value >= marker::NEG_FIXINT_MIN {
        buf.put_u8(value as u8);
    } else if value >= i64::from(i8::MIN) {
        buf.put_u8(marker::INT_8);
        buf.put_i8(value as i8);
    } else if value >= i64::from(i16::MIN) {
        buf.put_u8(marker::INT_16);
        buf.put_i16(value as i16);
    } else if value >= i64::from(i32::MIN) {
        buf.put_u8(marker::INT_32);
        buf.put_i32(value as i32);
    } else {
        buf.put_u8(marker::INT_64);
        buf.put_i64(value);
    }
}

/// Encodes a float using the smallest exact representation: float32 when
/// the value is bit-exact through a 4-byte round-trip, else float64.
pub fn encode_float<B: BufMut>(buf: &mut B, value: f64) {
    match exact_f32(value) {
        Some(narrow) => encode_f32(buf, narrow),
        None => encode_f64(buf, value),
    }
}

/// The value as f32 when widening back reproduces the exact bits.
pub(crate) fn exact_f32(value: f64) -> Option<f32> {
    let narrow = value as f32;
    if f64::from(narrow).to_bits() == value.to_bits() {
        Some(narrow)
    } else {
        None
    }
}

// Width-named encodings. A `u8` travels as uint8 even when 0..=127 would
// fit a fixint; the fixint forms are the `encode_pos_fixint` /
// `encode_neg_fixint` widths.

pub fn encode_u8<B: BufMut>(buf: &mut B, value: u8) {
    buf.put_u8(marker::UINT_8);
    buf.put_u8(value);
}

pub fn encode_u16<B: BufMut>(buf: &mut B, value: u16) {
    buf.put_u8(marker::UINT_16);
    buf.put_u16(value);
}

pub fn encode_u32<B: BufMut>(buf: &mut B, value: u32) {
    buf.put_u8(marker::UINT_32);
    buf.put_u32(value);
}

pub fn encode_u64<B: BufMut>(buf: &mut B, value: u64) {
    buf.put_u8(marker::UINT_64);
    buf.put_u64(value);
}

pub fn encode_i8<B: BufMut>(buf: &mut B, value: i8) {
    buf.put_u8(marker::INT_8);
    buf.put_i8(value);
}

pub fn encode_i16<B: BufMut>(buf: &mut B, value: i16) {
    buf.put_u8(marker::INT_16);
    buf.put_i16(value);
}

pub fn encode_i32<B: BufMut>(buf: &mut B, value: i32) {
    buf.put_u8(marker::INT_32);
    buf.put_i32(value);
}

pub fn encode_i64<B: BufMut>(buf: &mut B, value: i64) {
    buf.put_u8(marker::INT_64);
    buf.put_i64(value);
}

pub fn encode_f32<B: BufMut>(buf: &mut B, value: f32) {
    buf.put_u8(marker::FLOAT_32);
    buf.put_f32(value);
}

pub fn encode_f64<B: BufMut>(buf: &mut B, value: f64) {
    buf.put_u8(marker::FLOAT_64);
    buf.put_f64(value);
}

/// Positive fixint: the 7-bit width.
///
/// # Panics
///
/// Debug builds assert `value <= 127`.
pub fn encode_pos_fixint<B: BufMut>(buf: &mut B, value: u8) {
    debug_assert!(value <= marker::POS_FIXINT_MAX);
    buf.put_u8(value);
}

/// Negative fixint: the 6-bit negative width, -32..=-1.
///
/// # Panics
///
/// Debug builds assert the range.
pub fn encode_neg_fixint<B: BufMut>(buf: &mut B, value: i8) {
    debug_assert!((-32..=-1).contains(&value));
    buf.put_u8(value as u8);
}

/// Encodes a string (length = byte length, not char count).
///
/// Fails only with [`PackError::ValueTooLarge`].
pub fn encode_str<B: BufMut>(buf: &mut B, value: &str) -> Result<(), PackError> {
    buf.put_slice(Prefix::str_header(value.len())?.as_bytes());
    buf.put_slice(value.as_bytes());
    Ok(())
}

/// Encodes a binary blob.
pub fn encode_bin<B: BufMut>(buf: &mut B, value: &[u8]) -> Result<(), PackError> {
    buf.put_slice(Prefix::bin_header(value.len())?.as_bytes());
    buf.put_slice(value);
    Ok(())
}

/// Encodes an ext value: header, then the opaque data.
pub fn encode_ext<B: BufMut>(buf: &mut B, ext_type: i8, data: &[u8]) -> Result<(), PackError> {
    buf.put_slice(Prefix::ext_header(data.len(), ext_type)?.as_bytes());
    buf.put_slice(data);
    Ok(())
}

/// Encodes an array header; the caller then encodes `len` element values.
pub fn encode_array_header<B: BufMut>(buf: &mut B, len: usize) -> Result<(), PackError> {
    buf.put_slice(Prefix::array_header(len)?.as_bytes());
    Ok(())
}

/// Encodes a map header; the caller then encodes `len` key/value pairs.
pub fn encode_map_header<B: BufMut>(buf: &mut B, len: usize) -> Result<(), PackError> {
    buf.put_slice(Prefix::map_header(len)?.as_bytes());
    Ok(())
}

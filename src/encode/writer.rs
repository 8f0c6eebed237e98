//! Stream-mode value encoding: the same surface as [`super::value`], but
//! into a `std::io::Write` sink. Sink errors are propagated verbatim as
//! [`PackError::Io`].

use std::io::Write;

use super::prefix::Prefix;
use super::value::exact_f32;
use crate::error::PackError;
use crate::format::marker;

pub fn write_nil<W: Write>(out: &mut W) -> Result<(), PackError> {
    out.write_all(&[marker::NIL])?;
    Ok(())
}

pub fn write_bool<W: Write>(out: &mut W, value: bool) -> Result<(), PackError> {
    out.write_all(&[if value { marker::TRUE } else { marker::FALSE }])?;
    Ok(())
}

/// Writes an unsigned integer using the smallest representation.
pub fn write_uint<W: Write>(out: &mut W, value: u64) -> Result<(), PackError> {
    if value <= u64::from(marker::POS_FIXINT_MAX) {
        out.write_all(&[value as u8])?;
    } else if value <= u64::from(u8::MAX) {
        out.write_all(&[marker::UINT_8, value as u8])?;
    } else if value <= u64::from(u16::MAX) {
        out.write_all(&[marker::UINT_16])?;
        out.write_all(&(value as u16).to_be_bytes())?;
    } else if value <= u64::from(u32::MAX) {
        out.write_all(&[marker::UINT_32])?;
        out.write_all(&(value as u32).to_be_bytes())?;
    } else {
        out.write_all(&[marker::UINT_64])?;
        out.write_all(&value.to_be_bytes())?;
    }
    Ok(())
}

/// Writes a signed integer using the smallest representation; non-negative
/// values take the unsigned ladder.
pub fn write_sint<W: Write>(out: &mut W, value: i64) -> Result<(), PackError> {
    if value >= 0 {
        write_uint(out, value as u64)
    } else if value >= marker::NEG_FIXINT_MIN {
        out.write_all(&[value as u8])?;
        Ok(())
    } else if value >= i64::from(i8::MIN) {
        out.write_all(&[marker::INT_8, value as u8])?;
        Ok(())
    } else if value >= i64::from(i16::MIN) {
        out.write_all(&[marker::INT_16])?;
        out.write_all(&(value as i16).to_be_bytes())?;
        Ok(())
    } else if value >= i64::from(i32::MIN) {
        out.write_all(&[marker::INT_32])?;
        out.write_all(&(value as i32).to_be_bytes())?;
        Ok(())
    } else {
        out.write_all(&[marker::INT_64])?;
        out.write_all(&value.to_be_bytes())?;
        Ok(())
    }
}

/// Writes a float minimally: float32 when bit-exact, else float64.
pub fn write_float<W: Write>(out: &mut W, value: f64) -> Result<(), PackError> {
    match exact_f32(value) {
        Some(narrow) => write_f32(out, narrow),
        None => write_f64(out, value),
    }
}

pub fn write_f32<W: Write>(out: &mut W, value: f32) -> Result<(), PackError> {
    out.write_all(&[marker::FLOAT_32])?;
    out.write_all(&value.to_be_bytes())?;
    Ok(())
}

pub fn write_f64<W: Write>(out: &mut W, value: f64) -> Result<(), PackError> {
    out.write_all(&[marker::FLOAT_64])?;
    out.write_all(&value.to_be_bytes())?;
    Ok(())
}

/// Writes a string header followed by the bytes.
pub fn write_str<W: Write>(out: &mut W, value: &str) -> Result<(), PackError> {
    out.write_all(Prefix::str_header(value.len())?.as_bytes())?;
    out.write_all(value.as_bytes())?;
    Ok(())
}

/// Writes a binary header followed by the bytes.
pub fn write_bin<W: Write>(out: &mut W, value: &[u8]) -> Result<(), PackError> {
    out.write_all(Prefix::bin_header(value.len())?.as_bytes())?;
    out.write_all(value)?;
    Ok(())
}

/// Writes an ext header followed by the opaque data.
pub fn write_ext<W: Write>(out: &mut W, ext_type: i8, data: &[u8]) -> Result<(), PackError> {
    out.write_all(Prefix::ext_header(data.len(), ext_type)?.as_bytes())?;
    out.write_all(data)?;
    Ok(())
}

pub fn write_array_header<W: Write>(out: &mut W, len: usize) -> Result<(), PackError> {
    out.write_all(Prefix::array_header(len)?.as_bytes())?;
    Ok(())
}

pub fn write_map_header<W: Write>(out: &mut W, len: usize) -> Result<(), PackError> {
    out.write_all(Prefix::map_header(len)?.as_bytes())?;
    Ok(())
}

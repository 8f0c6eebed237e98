//! The buffer unpacker: a stateless-over-bytes consumer of caller-owned
//! slices.
//!
//! `peek` classifies the next tag, `advance` consumes a header, and the
//! converters consume payloads. A higher layer stitches reads together
//! with [`Unpacker::set_append`] instead of copying.

use crate::error::PackError;
use crate::format::{classify, decode_header, Header, Kind};

use super::{Float, Int};

/// Decodes values from a contiguous byte slice.
#[derive(Debug)]
pub struct Unpacker<'a> {
    rest: &'a [u8],
}

enum WireScalar {
    Unsigned(u64),
    Signed(i64),
    Float(f64),
}

impl<'a> Unpacker<'a> {
    /// Wraps an existing byte range.
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { rest: bytes }
    }

    /// Unread bytes remaining in the view.
    pub fn remaining(&self) -> usize {
        self.rest.len()
    }

    /// The unread window itself.
    pub fn rest(&self) -> &'a [u8] {
        self.rest
    }

    pub fn is_empty(&self) -> bool {
        self.rest.is_empty()
    }

    /// Classifies the next value's tag without consuming anything.
    ///
    /// Errors: [`PackError::BufferEmpty`] when the view is exhausted,
    /// [`PackError::UnrecognisedTag`] for reserved bytes.
    pub fn peek(&self) -> Result<Kind, PackError> {
        match self.rest.first() {
            None => Err(PackError::BufferEmpty),
            Some(&tag) => classify(tag).ok_or(PackError::UnrecognisedTag(tag)),
        }
    }

    /// Consumes the tag byte plus the header data bytes and returns the
    /// full header.
    ///
    /// # Panics
    ///
    /// The view must hold at least `1 + kind.header_data_bytes()` bytes;
    /// anything less is a programmer error. `peek` plus a length check (or
    /// the stream unpacker's refill loop) establishes the precondition.
    pub fn advance(&mut self, kind: Kind) -> Header {
        let data = kind.header_data_bytes();
        assert!(
            self.rest.len() >= 1 + data,
            "advance: header bytes not buffered"
        );
        let header = decode_header(kind, &self.rest[1..1 + data]);
        self.rest = &self.rest[1 + data..];
        header
    }

    /// Swaps in a longer view of the same logical stream, preserving the
    /// unread offset.
    ///
    /// `old_total_len` is the length of the view originally handed to
    /// [`Unpacker::new`] (or to the previous `set_append`); the difference
    /// from [`Unpacker::remaining`] recovers how far this unpacker has
    /// consumed into `new`.
    ///
    /// # Panics
    ///
    /// If `new` is shorter than the bytes already consumed.
    pub fn set_append(&mut self, old_total_len: usize, new: &'a [u8]) {
        let consumed = old_total_len - self.rest.len();
        assert!(
            new.len() >= consumed,
            "set_append: new view shorter than consumed prefix"
        );
        self.rest = &new[consumed..];
    }

    /// Consumes a nil payload (zero bytes); errors with
    /// [`PackError::InvalidValue`] for any other kind.
    pub fn as_nil(&mut self, header: &Header) -> Result<(), PackError> {
        match header.kind {
            Kind::Nil => Ok(()),
            _ => Err(PackError::InvalidValue("not a nil value")),
        }
    }

    pub fn as_bool(&mut self, header: &Header) -> Result<bool, PackError> {
        match header.kind {
            Kind::False => Ok(false),
            Kind::True => Ok(true),
            _ => Err(PackError::InvalidValue("not a boolean value")),
        }
    }

    /// Consumes a numeric payload and converts it to `T`.
    ///
    /// Range rules: an on-wire unsigned value converts to a signed target
    /// only within the target's positive range; an on-wire negative never
    /// converts to an unsigned target; floats truncate toward zero and must
    /// fit exactly after truncation. Failed range checks consume the
    /// payload and return [`PackError::InvalidValue`]; a non-numeric kind
    /// consumes nothing. [`PackError::BufferEmpty`] when the payload has
    /// not arrived yet.
    pub fn as_int<T: Int>(&mut self, header: &Header) -> Result<T, PackError> {
        let converted = match self.wire_scalar(header)? {
            WireScalar::Unsigned(v) => T::from_unsigned(v),
            WireScalar::Signed(v) => T::from_signed(v),
            WireScalar::Float(f) => float_to_int(f),
        };
        converted.ok_or(PackError::InvalidValue("integer out of range for target"))
    }

    /// Consumes a float payload and converts it to `T`.
    ///
    /// A float64 converts to `f32` only when bit-exact; integer kinds are
    /// rejected.
    pub fn as_float<T: Float>(&mut self, header: &Header) -> Result<T, PackError> {
        let converted = match header.kind {
            Kind::Float32 => {
                let raw = self.take_payload(4)?;
                T::from_f32(f32::from_be_bytes([raw[0], raw[1], raw[2], raw[3]]))
            }
            Kind::Float64 => {
                let raw = self.take_payload(8)?;
                T::from_f64(f64::from_be_bytes([
                    raw[0], raw[1], raw[2], raw[3], raw[4], raw[5], raw[6], raw[7],
                ]))
            }
            _ => return Err(PackError::InvalidValue("not a float value")),
        };
        converted.ok_or(PackError::InvalidValue("float narrowing loses information"))
    }

    /// Consumes a string payload and returns it as UTF-8.
    ///
    /// With the `compat-raw` feature, bin-family tags are accepted too (the
    /// pre-2013 raw family carried text under what are now the bin tags for
    /// transitional writers).
    pub fn as_str(&mut self, header: &Header) -> Result<&'a str, PackError> {
        match header.kind {
            Kind::FixStr(_) | Kind::Str8 | Kind::Str16 | Kind::Str32 => {}
            #[cfg(feature = "compat-raw")]
            Kind::Bin8 | Kind::Bin16 | Kind::Bin32 => {}
            _ => return Err(PackError::InvalidValue("not a string value")),
        }
        let raw = self.take_payload(header.size as usize)?;
        std::str::from_utf8(raw).map_err(|_| PackError::InvalidValue("string is not valid UTF-8"))
    }

    /// Consumes and returns the payload slice of any non-container value:
    /// string and binary bytes, ext data, a primitive's big-endian data
    /// bytes (empty for nil/bool/fixint).
    ///
    /// Arrays and maps are structural, not raw, and are rejected.
    pub fn as_raw(&mut self, header: &Header) -> Result<&'a [u8], PackError> {
        if header.is_container() {
            return Err(PackError::InvalidValue("container values are not raw"));
        }
        self.take_payload(header.size as usize)
    }

    /// Opens a cursor over an array header's elements.
    pub fn open_array<'u>(&'u mut self, header: &Header) -> Result<ArrayCursor<'u, 'a>, PackError> {
        match header.kind {
            Kind::FixArray(_) | Kind::Array16 | Kind::Array32 => Ok(ArrayCursor {
                unpacker: self,
                len: header.size,
                consumed: 0,
            }),
            _ => Err(PackError::InvalidValue("not an array value")),
        }
    }

    /// Opens a cursor over a map header's key/value pairs.
    pub fn open_map<'u>(&'u mut self, header: &Header) -> Result<MapCursor<'u, 'a>, PackError> {
        match header.kind {
            Kind::FixMap(_) | Kind::Map16 | Kind::Map32 => Ok(MapCursor {
                unpacker: self,
                len: header.size,
                consumed: 0,
                expecting_value: false,
            }),
            _ => Err(PackError::InvalidValue("not a map value")),
        }
    }

    fn take_payload(&mut self, n: usize) -> Result<&'a [u8], PackError> {
        if self.rest.len() < n {
            return Err(PackError::BufferEmpty);
        }
        let (head, tail) = self.rest.split_at(n);
        self.rest = tail;
        Ok(head)
    }

    fn wire_scalar(&mut self, header: &Header) -> Result<WireScalar, PackError> {
        Ok(match header.kind {
            Kind::PosFixInt(v) => WireScalar::Unsigned(u64::from(v)),
            Kind::NegFixInt(v) => WireScalar::Signed(i64::from(v)),
            Kind::Uint8 => WireScalar::Unsigned(u64::from(self.take_payload(1)?[0])),
            Kind::Uint16 => {
                let raw = self.take_payload(2)?;
                WireScalar::Unsigned(u64::from(u16::from_be_bytes([raw[0], raw[1]])))
            }
            Kind::Uint32 => {
                let raw = self.take_payload(4)?;
                WireScalar::Unsigned(u64::from(u32::from_be_bytes([
                    raw[0], raw[1], raw[2], raw[3],
                ])))
            }
            Kind::Uint64 => {
                let raw = self.take_payload(8)?;
                WireScalar::Unsigned(u64::from_be_bytes([
                    raw[0], raw[1], raw[2], raw[3], raw[4], raw[5], raw[6], raw[7],
                ]))
            }
            Kind::Int8 => WireScalar::Signed(i64::from(self.take_payload(1)?[0] as i8)),
            Kind::Int16 => {
                let raw = self.take_payload(2)?;
                WireScalar::Signed(i64::from(i16::from_be_bytes([raw[0], raw[1]])))
            }
            Kind::Int32 => {
                let raw = self.take_payload(4)?;
                WireScalar::Signed(i64::from(i32::from_be_bytes([raw[0], raw[1], raw[2], raw[3]])))
            }
            Kind::Int64 => {
                let raw = self.take_payload(8)?;
                WireScalar::Signed(i64::from_be_bytes([
                    raw[0], raw[1], raw[2], raw[3], raw[4], raw[5], raw[6], raw[7],
                ]))
            }
            Kind::Float32 => {
                let raw = self.take_payload(4)?;
                WireScalar::Float(f64::from(f32::from_be_bytes([raw[0], raw[1], raw[2], raw[3]])))
            }
            Kind::Float64 => {
                let raw = self.take_payload(8)?;
                WireScalar::Float(f64::from_be_bytes([
                    raw[0], raw[1], raw[2], raw[3], raw[4], raw[5], raw[6], raw[7],
                ]))
            }
            _ => return Err(PackError::InvalidValue("not a numeric value")),
        })
    }
}

/// Float-to-integer conversion: truncate toward zero, then range-check.
fn float_to_int<T: Int>(f: f64) -> Option<T> {
    if !f.is_finite() {
        return None;
    }
    let t = f.trunc();
    if t >= 0.0 {
        // 2^64 as an exact f64 bound.
        if t >= 18_446_744_073_709_551_616.0 {
            return None;
        }
        T::from_unsigned(t as u64)
    } else {
        // -2^63 is exactly representable.
        if t < -9_223_372_036_854_775_808.0 {
            return None;
        }
        T::from_signed(t as i64)
    }
}

/// Iterates the elements of one opened array.
///
/// The cursor shares the unpacker's position; the mutable borrow keeps it
/// the only live cursor. Exactly `len` children pass through before
/// [`ArrayCursor::peek`] reports the end.
#[derive(Debug)]
pub struct ArrayCursor<'u, 'a> {
    unpacker: &'u mut Unpacker<'a>,
    len: u32,
    consumed: u32,
}

impl<'u, 'a> ArrayCursor<'u, 'a> {
    /// The next element's kind, or `None` once the declared count is
    /// exhausted.
    pub fn peek(&self) -> Option<Result<Kind, PackError>> {
        if self.consumed == self.len {
            None
        } else {
            Some(self.unpacker.peek())
        }
    }

    /// Enters the next element's header and counts it.
    ///
    /// # Panics
    ///
    /// If the cursor is exhausted, or on [`Unpacker::advance`]'s own
    /// precondition.
    pub fn advance(&mut self, kind: Kind) -> Header {
        assert!(self.consumed < self.len, "array cursor exhausted");
        let header = self.unpacker.advance(kind);
        self.consumed += 1;
        header
    }

    /// Elements not yet entered.
    pub fn remaining(&self) -> u32 {
        self.len - self.consumed
    }

    pub fn is_exhausted(&self) -> bool {
        self.consumed == self.len
    }

    /// The shared unpacker, for payload conversion and nested containers.
    pub fn unpacker(&mut self) -> &mut Unpacker<'a> {
        self.unpacker
    }
}

/// Iterates the key/value pairs of one opened map.
///
/// Each [`MapCursor::advance`] enters one child value, alternating key and
/// value; a pair counts as consumed on the value's advance.
#[derive(Debug)]
pub struct MapCursor<'u, 'a> {
    unpacker: &'u mut Unpacker<'a>,
    len: u32,
    consumed: u32,
    expecting_value: bool,
}

impl<'u, 'a> MapCursor<'u, 'a> {
    /// The next child's kind, or `None` once all pairs are consumed.
    pub fn peek(&self) -> Option<Result<Kind, PackError>> {
        if self.consumed == self.len && !self.expecting_value {
            None
        } else {
            Some(self.unpacker.peek())
        }
    }

    /// Enters the next key or value header.
    ///
    /// # Panics
    ///
    /// If the cursor is exhausted, or on [`Unpacker::advance`]'s own
    /// precondition.
    pub fn advance(&mut self, kind: Kind) -> Header {
        assert!(
            self.consumed < self.len || self.expecting_value,
            "map cursor exhausted"
        );
        let header = self.unpacker.advance(kind);
        if self.expecting_value {
            self.consumed += 1;
        }
        self.expecting_value = !self.expecting_value;
        header
    }

    /// True when the next advance enters a value (not a key).
    pub fn expecting_value(&self) -> bool {
        self.expecting_value
    }

    /// Pairs not yet fully consumed.
    pub fn remaining(&self) -> u32 {
        self.len - self.consumed
    }

    pub fn is_exhausted(&self) -> bool {
        self.consumed == self.len && !self.expecting_value
    }

    /// The shared unpacker, for payload conversion and nested containers.
    pub fn unpacker(&mut self) -> &mut Unpacker<'a> {
        self.unpacker
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::value::*;
    use bytes::BytesMut;

    fn advance_next(un: &mut Unpacker<'_>) -> Header {
        let kind = un.peek().expect("peek failed");
        un.advance(kind)
    }

    #[test]
    fn decode_fixints() {
        let mut un = Unpacker::new(&[0x00, 0xFF]);
        let h = advance_next(&mut un);
        assert_eq!(un.as_int::<i64>(&h).unwrap(), 0);
        let h = advance_next(&mut un);
        assert_eq!(un.as_int::<i64>(&h).unwrap(), -1);
        assert!(un.is_empty());
    }

    #[test]
    fn decode_uint_widths() {
        let mut un = Unpacker::new(&[0xCC, 0xFF, 0xCD, 0x01, 0x00]);
        let h = advance_next(&mut un);
        assert_eq!(h.kind, Kind::Uint8);
        assert_eq!(un.as_int::<u64>(&h).unwrap(), 255);
        let h = advance_next(&mut un);
        assert_eq!(un.as_int::<u64>(&h).unwrap(), 256);
    }

    #[test]
    fn narrowing_out_of_range_is_invalid() {
        // 256 does not fit u8.
        let mut un = Unpacker::new(&[0xCD, 0x01, 0x00]);
        let h = advance_next(&mut un);
        assert!(matches!(
            un.as_int::<u8>(&h),
            Err(PackError::InvalidValue(_))
        ));
    }

    #[test]
    fn signedness_is_checked() {
        // Unsigned wire value above the signed target's positive range.
        let mut buf = BytesMut::new();
        encode_u8(&mut buf, 200);
        let mut un = Unpacker::new(&buf);
        let h = advance_next(&mut un);
        assert!(matches!(
            un.as_int::<i8>(&h),
            Err(PackError::InvalidValue(_))
        ));

        // Negative wire value requested as unsigned.
        let mut buf = BytesMut::new();
        encode_sint(&mut buf, -5);
        let mut un = Unpacker::new(&buf);
        let h = advance_next(&mut un);
        assert!(matches!(
            un.as_int::<u32>(&h),
            Err(PackError::InvalidValue(_))
        ));
    }

    #[test]
    fn float_to_int_truncates_toward_zero() {
        let mut buf = BytesMut::new();
        encode_f64(&mut buf, 3.9);
        let mut un = Unpacker::new(&buf);
        let h = advance_next(&mut un);
        assert_eq!(un.as_int::<i32>(&h).unwrap(), 3);

        let mut buf = BytesMut::new();
        encode_f64(&mut buf, -3.9);
        let mut un = Unpacker::new(&buf);
        let h = advance_next(&mut un);
        assert_eq!(un.as_int::<i32>(&h).unwrap(), -3);

        let mut buf = BytesMut::new();
        encode_f64(&mut buf, 1.0e20);
        let mut un = Unpacker::new(&buf);
        let h = advance_next(&mut un);
        assert!(matches!(
            un.as_int::<u64>(&h),
            Err(PackError::InvalidValue(_))
        ));

        let mut buf = BytesMut::new();
        encode_f64(&mut buf, f64::NAN);
        let mut un = Unpacker::new(&buf);
        let h = advance_next(&mut un);
        assert!(matches!(
            un.as_int::<i64>(&h),
            Err(PackError::InvalidValue(_))
        ));
    }

    #[test]
    fn float_narrowing_must_be_exact() {
        let mut buf = BytesMut::new();
        encode_f64(&mut buf, 0.1);
        let mut un = Unpacker::new(&buf);
        let h = advance_next(&mut un);
        assert!(matches!(
            un.as_float::<f32>(&h),
            Err(PackError::InvalidValue(_))
        ));

        let mut buf = BytesMut::new();
        encode_f64(&mut buf, 1.5);
        let mut un = Unpacker::new(&buf);
        let h = advance_next(&mut un);
        assert_eq!(un.as_float::<f32>(&h).unwrap(), 1.5f32);
    }

    #[test]
    fn decode_fixstr() {
        let bytes: &[u8] = &[
            0xAB, b'H', b'e', b'l', b'l', b'o', b' ', b'W', b'o', b'r', b'l', b'd',
        ];
        let mut un = Unpacker::new(bytes);
        let h = advance_next(&mut un);
        assert_eq!(h.kind, Kind::FixStr(11));
        assert_eq!(un.as_str(&h).unwrap(), "Hello World");
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        let mut un = Unpacker::new(&[0xA2, 0xFF, 0xFE]);
        let h = advance_next(&mut un);
        assert!(matches!(un.as_str(&h), Err(PackError::InvalidValue(_))));
    }

    #[cfg(not(feature = "compat-raw"))]
    #[test]
    fn bin_tags_do_not_satisfy_string_reads() {
        let mut un = Unpacker::new(&[0xC4, 0x02, b'h', b'i']);
        let h = advance_next(&mut un);
        assert!(matches!(un.as_str(&h), Err(PackError::InvalidValue(_))));
    }

    #[cfg(feature = "compat-raw")]
    #[test]
    fn compat_raw_accepts_bin_tags_as_strings() {
        let mut un = Unpacker::new(&[0xC4, 0x02, b'h', b'i']);
        let h = advance_next(&mut un);
        assert_eq!(un.as_str(&h).unwrap(), "hi");
    }

    #[test]
    fn reserved_tag_is_unrecognised() {
        let un = Unpacker::new(&[0xC1]);
        assert!(matches!(un.peek(), Err(PackError::UnrecognisedTag(0xC1))));
    }

    #[test]
    fn empty_view_reports_buffer_empty() {
        let un = Unpacker::new(&[]);
        assert!(matches!(un.peek(), Err(PackError::BufferEmpty)));
    }

    #[test]
    fn missing_payload_reports_buffer_empty() {
        // uint16 header present, only one of two payload bytes.
        let mut un = Unpacker::new(&[0xCD, 0x01]);
        let h = advance_next(&mut un);
        assert!(matches!(un.as_int::<u16>(&h), Err(PackError::BufferEmpty)));
    }

    #[test]
    fn set_append_preserves_the_unread_offset() {
        let full: Vec<u8> = vec![0x01, 0xCD, 0x01, 0x00, 0x2A];
        // Start with a truncated view.
        let mut un = Unpacker::new(&full[..2]);
        let h = advance_next(&mut un);
        assert_eq!(un.as_int::<u8>(&h).unwrap(), 1);

        let h = advance_next(&mut un);
        assert!(matches!(un.as_int::<u16>(&h), Err(PackError::BufferEmpty)));

        // The caller appended the rest; same logical stream, longer view.
        un.set_append(2, &full);
        assert_eq!(un.as_int::<u16>(&h).unwrap(), 256);
        let h = advance_next(&mut un);
        assert_eq!(un.as_int::<u8>(&h).unwrap(), 42);
        assert!(un.is_empty());
    }

    #[test]
    fn as_raw_returns_payload_slices() {
        let mut buf = BytesMut::new();
        encode_bin(&mut buf, &[0xDE, 0xAD, 0xBE, 0xEF]).unwrap();
        encode_uint(&mut buf, 256);
        let mut un = Unpacker::new(&buf);

        let h = advance_next(&mut un);
        assert_eq!(un.as_raw(&h).unwrap(), &[0xDE, 0xAD, 0xBE, 0xEF]);

        // A primitive's raw payload is its big-endian data bytes.
        let h = advance_next(&mut un);
        assert_eq!(un.as_raw(&h).unwrap(), &[0x01, 0x00]);
    }

    #[test]
    fn as_raw_rejects_containers() {
        let mut un = Unpacker::new(&[0x91, 0x01]);
        let h = advance_next(&mut un);
        assert!(matches!(un.as_raw(&h), Err(PackError::InvalidValue(_))));
    }

    #[test]
    fn ext_payload_and_type() {
        let mut buf = BytesMut::new();
        encode_ext(&mut buf, -1, &[1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        let mut un = Unpacker::new(&buf);
        let h = advance_next(&mut un);
        assert_eq!(h.kind, Kind::FixExt8);
        assert_eq!(h.ext_type, -1);
        assert_eq!(un.as_raw(&h).unwrap(), &[1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn array_cursor_yields_declared_count() {
        // [nil, 1, "Hi"]
        let bytes: &[u8] = &[0x93, 0xC0, 0x01, 0xA2, b'H', b'i'];
        let mut un = Unpacker::new(bytes);
        let h = advance_next(&mut un);
        assert_eq!(h.kind, Kind::FixArray(3));

        let mut cursor = un.open_array(&h).unwrap();
        assert_eq!(cursor.remaining(), 3);

        let kind = cursor.peek().unwrap().unwrap();
        assert_eq!(kind, Kind::Nil);
        let child = cursor.advance(kind);
        cursor.unpacker().as_nil(&child).unwrap();

        let kind = cursor.peek().unwrap().unwrap();
        let child = cursor.advance(kind);
        assert_eq!(cursor.unpacker().as_int::<i64>(&child).unwrap(), 1);

        let kind = cursor.peek().unwrap().unwrap();
        let child = cursor.advance(kind);
        assert_eq!(cursor.unpacker().as_str(&child).unwrap(), "Hi");

        assert!(cursor.peek().is_none());
        assert!(cursor.is_exhausted());
    }

    #[test]
    fn map_cursor_alternates_keys_and_values() {
        // {"a": 1, "b": "Hello World"}
        let bytes: &[u8] = &[
            0x82, 0xA1, b'a', 0x01, 0xA1, b'b', 0xAB, b'H', b'e', b'l', b'l', b'o', b' ', b'W',
            b'o', b'r', b'l', b'd',
        ];
        let mut un = Unpacker::new(bytes);
        let h = advance_next(&mut un);
        assert_eq!(h.kind, Kind::FixMap(2));

        let mut cursor = un.open_map(&h).unwrap();
        assert!(!cursor.expecting_value());

        let k = cursor.peek().unwrap().unwrap();
        let kh = cursor.advance(k);
        assert_eq!(cursor.unpacker().as_str(&kh).unwrap(), "a");
        assert!(cursor.expecting_value());
        assert_eq!(cursor.remaining(), 2);

        let v = cursor.peek().unwrap().unwrap();
        let vh = cursor.advance(v);
        assert_eq!(cursor.unpacker().as_int::<i64>(&vh).unwrap(), 1);
        assert_eq!(cursor.remaining(), 1);

        let k = cursor.peek().unwrap().unwrap();
        let kh = cursor.advance(k);
        assert_eq!(cursor.unpacker().as_str(&kh).unwrap(), "b");
        let v = cursor.peek().unwrap().unwrap();
        let vh = cursor.advance(v);
        assert_eq!(cursor.unpacker().as_str(&vh).unwrap(), "Hello World");

        assert!(cursor.peek().is_none());
        assert!(cursor.is_exhausted());
    }

    #[test]
    fn nested_containers_via_reborrowed_cursors() {
        // [[1, 2], 3]
        let bytes: &[u8] = &[0x92, 0x92, 0x01, 0x02, 0x03];
        let mut un = Unpacker::new(bytes);
        let h = advance_next(&mut un);
        let mut outer = un.open_array(&h).unwrap();

        let kind = outer.peek().unwrap().unwrap();
        let inner_header = outer.advance(kind);
        {
            let mut inner = outer.unpacker().open_array(&inner_header).unwrap();
            for expected in [1i64, 2] {
                let k = inner.peek().unwrap().unwrap();
                let ch = inner.advance(k);
                assert_eq!(inner.unpacker().as_int::<i64>(&ch).unwrap(), expected);
            }
            assert!(inner.peek().is_none());
        }

        let kind = outer.peek().unwrap().unwrap();
        let ch = outer.advance(kind);
        assert_eq!(outer.unpacker().as_int::<i64>(&ch).unwrap(), 3);
        assert!(outer.peek().is_none());
    }

    #[test]
    fn u64_and_i64_extremes_round_trip() {
        let mut buf = BytesMut::new();
        encode_uint(&mut buf, u64::MAX);
        encode_sint(&mut buf, i64::MIN);
        let mut un = Unpacker::new(&buf);

        let h = advance_next(&mut un);
        assert_eq!(un.as_int::<u64>(&h).unwrap(), u64::MAX);
        let h = advance_next(&mut un);
        assert_eq!(un.as_int::<i64>(&h).unwrap(), i64::MIN);
    }
}

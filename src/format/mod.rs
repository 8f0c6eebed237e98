//! The wire format model: tag classification and header decoding.
//!
//! A MessagePack value starts with a one-byte *tag*. The tag plus any
//! length/ext-type bytes that follow it form the value's *header*; the
//! header describes the *payload* that comes next. This module maps tag
//! bytes to [`Kind`]s and assembles [`Header`]s; it never touches payloads.

pub mod marker;
mod table;

/// Logical kind of a wire value, classified from its tag byte.
///
/// Fixed-range variants carry the in-tag value or length in their
/// discriminant, so a `Kind` together with the header bytes fully describes
/// a header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Nil,
    False,
    True,
    /// `0b0xxxxxxx`, value 0..=127.
    PosFixInt(u8),
    /// `0b111xxxxx`, value -32..=-1.
    NegFixInt(i8),
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Int8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    /// `0b101xxxxx`, byte length 0..=31.
    FixStr(u8),
    Str8,
    Str16,
    Str32,
    Bin8,
    Bin16,
    Bin32,
    /// `0b1001xxxx`, element count 0..=15.
    FixArray(u8),
    Array16,
    Array32,
    /// `0b1000xxxx`, pair count 0..=15.
    FixMap(u8),
    Map16,
    Map32,
    FixExt1,
    FixExt2,
    FixExt4,
    FixExt8,
    FixExt16,
    Ext8,
    Ext16,
    Ext32,
}

/// Whether a kind's payload size is determined by the tag alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadLen {
    /// Primitive payload byte count fully determined by the tag.
    Known(usize),
    /// String/binary/ext/array/map families: the true size comes from the
    /// header.
    Variable,
}

/// A decoded value header.
///
/// `size` is the payload byte count for primitives, strings, binaries and
/// ext values, and the element (or pair) count for arrays and maps.
/// `ext_type` is meaningful only for the ext kinds; negative values are
/// reserved by the wire specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub kind: Kind,
    pub size: u32,
    pub ext_type: i8,
}

impl Header {
    /// True for array and map headers, whose bodies are child values rather
    /// than raw bytes.
    pub fn is_container(&self) -> bool {
        matches!(
            self.kind,
            Kind::FixArray(_)
                | Kind::Array16
                | Kind::Array32
                | Kind::FixMap(_)
                | Kind::Map16
                | Kind::Map32
        )
    }

    /// Payload byte count, or `None` for containers.
    pub fn payload_bytes(&self) -> Option<u32> {
        if self.is_container() {
            None
        } else {
            Some(self.size)
        }
    }
}

/// Classifies a tag byte. Total over `0..=255`: every byte maps to a kind
/// except the reserved `0xC1`.
///
/// Dispatches to the lookup-table implementation selected at build time
/// (`lookup-all` > `lookup-small` > direct); all strategies are built from
/// the same classification function and are bit-equivalent.
#[inline]
pub fn classify(tag: u8) -> Option<Kind> {
    #[cfg(feature = "lookup-all")]
    {
        table::classify_all(tag)
    }
    #[cfg(all(feature = "lookup-small", not(feature = "lookup-all")))]
    {
        table::classify_small(tag)
    }
    #[cfg(not(any(feature = "lookup-all", feature = "lookup-small")))]
    {
        classify_direct(tag)
    }
}

/// The direct implementation: masked-prefix tests and range matches.
///
/// This is the reference classifier; the lookup tables are generated from
/// it at compile time.
pub const fn classify_direct(tag: u8) -> Option<Kind> {
    Some(match tag {
        0x00..=0x7F => Kind::PosFixInt(tag),
        0x80..=0x8F => Kind::FixMap(tag & marker::FIX_LEN_MASK),
        0x90..=0x9F => Kind::FixArray(tag & marker::FIX_LEN_MASK),
        0xA0..=0xBF => Kind::FixStr(tag & marker::FIXSTR_LEN_MASK),
        marker::NIL => Kind::Nil,
        marker::NEVER_USED => return None,
        marker::FALSE => Kind::False,
        marker::TRUE => Kind::True,
        marker::BIN_8 => Kind::Bin8,
        marker::BIN_16 => Kind::Bin16,
        marker::BIN_32 => Kind::Bin32,
        marker::EXT_8 => Kind::Ext8,
        marker::EXT_16 => Kind::Ext16,
        marker::EXT_32 => Kind::Ext32,
        marker::FLOAT_32 => Kind::Float32,
        marker::FLOAT_64 => Kind::Float64,
        marker::UINT_8 => Kind::Uint8,
        marker::UINT_16 => Kind::Uint16,
        marker::UINT_32 => Kind::Uint32,
        marker::UINT_64 => Kind::Uint64,
        marker::INT_8 => Kind::Int8,
        marker::INT_16 => Kind::Int16,
        marker::INT_32 => Kind::Int32,
        marker::INT_64 => Kind::Int64,
        marker::FIXEXT_1 => Kind::FixExt1,
        marker::FIXEXT_2 => Kind::FixExt2,
        marker::FIXEXT_4 => Kind::FixExt4,
        marker::FIXEXT_8 => Kind::FixExt8,
        marker::FIXEXT_16 => Kind::FixExt16,
        marker::STR_8 => Kind::Str8,
        marker::STR_16 => Kind::Str16,
        marker::STR_32 => Kind::Str32,
        marker::ARRAY_16 => Kind::Array16,
        marker::ARRAY_32 => Kind::Array32,
        marker::MAP_16 => Kind::Map16,
        marker::MAP_32 => Kind::Map32,
        0xE0..=0xFF => Kind::NegFixInt(tag as i8),
    })
}

impl Kind {
    /// Bytes following the tag byte that belong to the header itself
    /// (length fields and the ext type byte).
    pub const fn header_data_bytes(self) -> usize {
        match self {
            Kind::Nil
            | Kind::False
            | Kind::True
            | Kind::PosFixInt(_)
            | Kind::NegFixInt(_)
            | Kind::Uint8
            | Kind::Uint16
            | Kind::Uint32
            | Kind::Uint64
            | Kind::Int8
            | Kind::Int16
            | Kind::Int32
            | Kind::Int64
            | Kind::Float32
            | Kind::Float64
            | Kind::FixStr(_)
            | Kind::FixArray(_)
            | Kind::FixMap(_) => 0,
            Kind::Str8 | Kind::Bin8 => 1,
            Kind::Str16 | Kind::Bin16 | Kind::Array16 | Kind::Map16 => 2,
            Kind::Str32 | Kind::Bin32 | Kind::Array32 | Kind::Map32 => 4,
            Kind::FixExt1 | Kind::FixExt2 | Kind::FixExt4 | Kind::FixExt8 | Kind::FixExt16 => 1,
            Kind::Ext8 => 2,
            Kind::Ext16 => 3,
            Kind::Ext32 => 5,
        }
    }

    /// Payload size determination for this kind.
    pub const fn payload_len(self) -> PayloadLen {
        match self {
            Kind::Nil | Kind::False | Kind::True | Kind::PosFixInt(_) | Kind::NegFixInt(_) => {
                PayloadLen::Known(0)
            }
            Kind::Uint8 | Kind::Int8 => PayloadLen::Known(1),
            Kind::Uint16 | Kind::Int16 => PayloadLen::Known(2),
            Kind::Uint32 | Kind::Int32 | Kind::Float32 => PayloadLen::Known(4),
            Kind::Uint64 | Kind::Int64 | Kind::Float64 => PayloadLen::Known(8),
            _ => PayloadLen::Variable,
        }
    }

    /// Minimum bytes (beyond the tag) a streamer should try to have
    /// available before decoding this kind: the header data plus any
    /// tag-determined payload.
    pub const fn fetch_hint(self) -> usize {
        let payload = match self.payload_len() {
            PayloadLen::Known(n) => n,
            PayloadLen::Variable => 0,
        };
        self.header_data_bytes() + payload
    }
}

/// Decodes the header for `kind` from the bytes that followed the tag byte.
///
/// Pure: reads exactly `kind.header_data_bytes()` bytes, no more.
///
/// # Panics
///
/// If `bytes` holds fewer than `kind.header_data_bytes()` bytes; callers
/// check availability first.
pub fn decode_header(kind: Kind, bytes: &[u8]) -> Header {
    assert!(
        bytes.len() >= kind.header_data_bytes(),
        "decode_header: header bytes not buffered"
    );
    let (size, ext_type) = match kind {
        Kind::FixStr(n) | Kind::FixArray(n) | Kind::FixMap(n) => (u32::from(n), 0),
        Kind::Str8 | Kind::Bin8 => (u32::from(bytes[0]), 0),
        Kind::Str16 | Kind::Bin16 | Kind::Array16 | Kind::Map16 => (u32::from(be_u16(bytes)), 0),
        Kind::Str32 | Kind::Bin32 | Kind::Array32 | Kind::Map32 => (be_u32(bytes), 0),
        Kind::FixExt1 => (1, bytes[0] as i8),
        Kind::FixExt2 => (2, bytes[0] as i8),
        Kind::FixExt4 => (4, bytes[0] as i8),
        Kind::FixExt8 => (8, bytes[0] as i8),
        Kind::FixExt16 => (16, bytes[0] as i8),
        Kind::Ext8 => (u32::from(bytes[0]), bytes[1] as i8),
        Kind::Ext16 => (u32::from(be_u16(bytes)), bytes[2] as i8),
        Kind::Ext32 => (be_u32(bytes), bytes[4] as i8),
        _ => match kind.payload_len() {
            PayloadLen::Known(n) => (n as u32, 0),
            PayloadLen::Variable => unreachable!("variable kinds handled above"),
        },
    };
    Header {
        kind,
        size,
        ext_type,
    }
}

fn be_u16(bytes: &[u8]) -> u16 {
    u16::from_be_bytes([bytes[0], bytes[1]])
}

fn be_u32(bytes: &[u8]) -> u32 {
    u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

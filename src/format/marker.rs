//! MessagePack marker byte constants.

// Nil
pub const NIL: u8 = 0xC0;

// 0xC1 is reserved and never emitted by conforming encoders.
pub const NEVER_USED: u8 = 0xC1;

// Boolean
pub const FALSE: u8 = 0xC2;
pub const TRUE: u8 = 0xC3;

// Binary (length-prefixed byte blobs)
pub const BIN_8: u8 = 0xC4;
pub const BIN_16: u8 = 0xC5;
pub const BIN_32: u8 = 0xC6;

// Ext (length, 1-byte ext type, then data)
pub const EXT_8: u8 = 0xC7;
pub const EXT_16: u8 = 0xC8;
pub const EXT_32: u8 = 0xC9;

// Float (IEEE 754, big-endian)
pub const FLOAT_32: u8 = 0xCA;
pub const FLOAT_64: u8 = 0xCB;

// Unsigned integers (big-endian payload)
pub const UINT_8: u8 = 0xCC;
pub const UINT_16: u8 = 0xCD;
pub const UINT_32: u8 = 0xCE;
pub const UINT_64: u8 = 0xCF;

// Signed integers (two's complement, big-endian payload)
pub const INT_8: u8 = 0xD0;
pub const INT_16: u8 = 0xD1;
pub const INT_32: u8 = 0xD2;
pub const INT_64: u8 = 0xD3;

// Fixext (fixed payload of 1/2/4/8/16 bytes after the ext type)
pub const FIXEXT_1: u8 = 0xD4;
pub const FIXEXT_2: u8 = 0xD5;
pub const FIXEXT_4: u8 = 0xD6;
pub const FIXEXT_8: u8 = 0xD7;
pub const FIXEXT_16: u8 = 0xD8;

// String (length-prefixed UTF-8)
pub const STR_8: u8 = 0xD9;
pub const STR_16: u8 = 0xDA;
pub const STR_32: u8 = 0xDB;

// Array
pub const ARRAY_16: u8 = 0xDC;
pub const ARRAY_32: u8 = 0xDD;

// Map
pub const MAP_16: u8 = 0xDE;
pub const MAP_32: u8 = 0xDF;

// Fixed families, value or length carried in the tag byte itself.
// POS_FIXINT: 0x00..=0x7F (value = low 7 bits)
// FIXMAP:     0x80..=0x8F (pair count = low 4 bits)
// FIXARRAY:   0x90..=0x9F (element count = low 4 bits)
// FIXSTR:     0xA0..=0xBF (byte length = low 5 bits)
// NEG_FIXINT: 0xE0..=0xFF (value = byte as i8, -32..=-1)
pub const POS_FIXINT_MAX: u8 = 0x7F;
pub const FIXMAP_PREFIX: u8 = 0x80;
pub const FIXARRAY_PREFIX: u8 = 0x90;
pub const FIXSTR_PREFIX: u8 = 0xA0;
pub const NEG_FIXINT_PREFIX: u8 = 0xE0;

/// High-nibble mask for fixmap/fixarray.
pub const NIBBLE_MASK: u8 = 0xF0;
/// Low four bits: fixmap/fixarray length.
pub const FIX_LEN_MASK: u8 = 0x0F;
/// Low five bits: fixstr length and negative fixint magnitude.
pub const FIXSTR_LEN_MASK: u8 = 0x1F;
/// Three-bit prefix mask for fixstr (0b101xxxxx) and negative fixint
/// (0b111xxxxx).
pub const PREFIX3_MASK: u8 = 0xE0;

/// Inclusive maxima for the fix-form encodings.
pub const FIXSTR_MAX_LEN: usize = 31;
pub const FIX_CONTAINER_MAX_LEN: usize = 15;
pub const NEG_FIXINT_MIN: i64 = -32;

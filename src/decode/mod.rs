//! Value decoding: the buffer unpacker and the stream unpacker.
//!
//! Both unpackers hand out [`crate::format::Header`]s and convert payloads
//! on demand; arrays and maps are walked through cursors, never
//! materialised.

pub mod buffer;
pub mod stream;

pub use buffer::{ArrayCursor, MapCursor, Unpacker};
pub use stream::{RawReader, StreamArrayCursor, StreamMapCursor, StreamUnpacker};

mod sealed {
    pub trait Sealed {}
}

/// Integer targets for [`Unpacker::as_int`].
///
/// Conversions are checked: a value outside the target's range is
/// `InvalidValue`, never a silent wraparound.
pub trait Int: sealed::Sealed + Copy {
    #[doc(hidden)]
    fn from_unsigned(v: u64) -> Option<Self>;
    #[doc(hidden)]
    fn from_signed(v: i64) -> Option<Self>;
}

macro_rules! impl_int {
    ($($t:ty),*) => {$(
        impl sealed::Sealed for $t {}
        impl Int for $t {
            #[inline]
            fn from_unsigned(v: u64) -> Option<Self> {
                Self::try_from(v).ok()
            }
            #[inline]
            fn from_signed(v: i64) -> Option<Self> {
                Self::try_from(v).ok()
            }
        }
    )*};
}

impl_int!(u8, u16, u32, u64, i8, i16, i32, i64);

/// Float targets for [`Unpacker::as_float`].
pub trait Float: sealed::Sealed + Copy {
    #[doc(hidden)]
    fn from_f32(v: f32) -> Option<Self>;
    #[doc(hidden)]
    fn from_f64(v: f64) -> Option<Self>;
}

impl sealed::Sealed for f32 {}

impl Float for f32 {
    #[inline]
    fn from_f32(v: f32) -> Option<Self> {
        Some(v)
    }

    /// Narrowing is accepted only when widening back reproduces the exact
    /// bits.
    #[inline]
    fn from_f64(v: f64) -> Option<Self> {
        let narrow = v as f32;
        if f64::from(narrow).to_bits() == v.to_bits() {
            Some(narrow)
        } else {
            None
        }
    }
}

impl sealed::Sealed for f64 {}

impl Float for f64 {
    #[inline]
    fn from_f32(v: f32) -> Option<Self> {
        Some(f64::from(v))
    }

    #[inline]
    fn from_f64(v: f64) -> Option<Self> {
        Some(v)
    }
}

//! Value encoding: minimal-width and typed-width emitters.
//!
//! Buffer mode writes into a `bytes::BufMut`; stream mode writes into a
//! `std::io::Write` sink. Both emit identical bytes for identical values.

pub mod prefix;
pub mod value;
pub mod writer;

pub use prefix::Prefix;

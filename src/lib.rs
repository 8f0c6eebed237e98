//! msgpackr — a streaming MessagePack codec.
//!
//! This crate implements the MessagePack wire format at single-value
//! granularity: callers compose higher-level serialisation on top without
//! the codec ever buffering whole documents or building value trees.
//!
//! # Architecture
//!
//! - **`format`** — Tag classification and header decoding
//! - **`encode`** — Minimal-width and typed-width value encoding
//! - **`decode`** — Buffer and stream unpackers with container cursors
//! - **`ffi`** — C ABI descriptor for the buffer unpacker (feature-gated)
//!
//! # Modes
//!
//! Buffer mode works over contiguous slices with no I/O:
//!
//! ```
//! use msgpackr::{encode, Unpacker};
//!
//! let mut buf = bytes::BytesMut::new();
//! encode::value::encode_sint(&mut buf, -32);
//!
//! let mut un = Unpacker::new(&buf);
//! let kind = un.peek().unwrap();
//! let header = un.advance(kind);
//! assert_eq!(un.as_int::<i64>(&header).unwrap(), -32);
//! ```
//!
//! Stream mode drives the same engine from a `std::io::Read` source
//! through a small caller-provided refill buffer:
//!
//! ```
//! use msgpackr::StreamUnpacker;
//!
//! let doc: &[u8] = &[0xCD, 0x01, 0x00]; // uint16 256
//! let mut src = doc;
//! let mut refill = [0u8; 8];
//! let mut un = StreamUnpacker::new(&mut refill);
//! let header = un.next(&mut src).unwrap();
//! assert_eq!(un.as_int::<u32, _>(&mut src, &header).unwrap(), 256);
//! ```

pub mod decode;
pub mod encode;
pub mod error;
pub mod format;

#[cfg(feature = "ffi")]
pub mod ffi;

pub use decode::{
    ArrayCursor, Float, Int, MapCursor, RawReader, StreamArrayCursor, StreamMapCursor,
    StreamUnpacker, Unpacker,
};
pub use encode::Prefix;
pub use error::PackError;
pub use format::{classify, decode_header, Header, Kind, PayloadLen};

//! The stream unpacker: drives the buffer unpacker over an external byte
//! source.
//!
//! Source bytes are copied into the tail of a caller-provided refill
//! buffer; the *window* is the contiguous run of yet-unconsumed bytes
//! inside it. Each operation assembles just enough window to hand the
//! buffer unpacker a complete header or payload, so the source is never
//! read past what the stream demands.

use std::io::{self, Read};

use crate::error::PackError;
use crate::format::{classify, Header, Kind, PayloadLen};

use super::buffer::Unpacker;
use super::{Float, Int};

/// Decodes values from a `std::io::Read` source through a refill buffer.
///
/// The buffer is borrowed for the unpacker's lifetime and must hold at
/// least [`StreamUnpacker::MIN_BUFFER`] bytes so any primitive payload
/// fits; one memory page is a good size for real sources. The source is
/// borrowed on each call, so one unpacker can follow a stream across
/// several source handles.
#[derive(Debug)]
pub struct StreamUnpacker<'b> {
    buf: &'b mut [u8],
    start: usize,
    len: usize,
    bytes_read: u64,
}

impl<'b> StreamUnpacker<'b> {
    /// Smallest usable refill buffer: the widest primitive payload.
    pub const MIN_BUFFER: usize = 8;

    /// Wraps a refill buffer.
    ///
    /// # Panics
    ///
    /// If the buffer is smaller than [`StreamUnpacker::MIN_BUFFER`].
    pub fn new(buf: &'b mut [u8]) -> Self {
        assert!(
            buf.len() >= Self::MIN_BUFFER,
            "refill buffer must hold at least {} bytes",
            Self::MIN_BUFFER
        );
        Self {
            buf,
            start: 0,
            len: 0,
            bytes_read: 0,
        }
    }

    /// Total bytes pulled from sources so far.
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Bytes sitting unconsumed in the window.
    pub fn window_len(&self) -> usize {
        self.len
    }

    /// Assembles the next value's header, refilling as needed.
    ///
    /// Errors: [`PackError::EndOfStream`] when the source dries up before a
    /// full header (a clean stream end leaves [`StreamUnpacker::window_len`]
    /// at zero), [`PackError::UnrecognisedTag`] for reserved bytes, and
    /// source errors verbatim.
    pub fn next<R: Read>(&mut self, src: &mut R) -> Result<Header, PackError> {
        while self.len == 0 {
            if self.refill(src)? == 0 {
                return Err(PackError::EndOfStream);
            }
        }
        let tag = self.buf[self.start];
        let kind = classify(tag).ok_or(PackError::UnrecognisedTag(tag))?;
        let needed = 1 + kind.header_data_bytes();
        while self.len < needed {
            if self.refill(src)? == 0 {
                return Err(PackError::EndOfStream);
            }
        }
        let header = self.window_unpacker().advance(kind);
        self.consume(needed);
        Ok(header)
    }

    /// See [`Unpacker::as_nil`].
    pub fn as_nil<R: Read>(&mut self, src: &mut R, header: &Header) -> Result<(), PackError> {
        self.ensure_scalar(src, header)?;
        self.convert(|un| un.as_nil(header))
    }

    /// See [`Unpacker::as_bool`].
    pub fn as_bool<R: Read>(&mut self, src: &mut R, header: &Header) -> Result<bool, PackError> {
        self.ensure_scalar(src, header)?;
        self.convert(|un| un.as_bool(header))
    }

    /// See [`Unpacker::as_int`]; refills until the payload is in the
    /// window.
    pub fn as_int<T: Int, R: Read>(
        &mut self,
        src: &mut R,
        header: &Header,
    ) -> Result<T, PackError> {
        self.ensure_scalar(src, header)?;
        self.convert(|un| un.as_int::<T>(header))
    }

    /// See [`Unpacker::as_float`].
    pub fn as_float<T: Float, R: Read>(
        &mut self,
        src: &mut R,
        header: &Header,
    ) -> Result<T, PackError> {
        self.ensure_scalar(src, header)?;
        self.convert(|un| un.as_float::<T>(header))
    }

    /// Refills until a tag-determined payload is windowed. Variable-size
    /// kinds get nothing: the scalar converters reject them without
    /// touching the payload.
    fn ensure_scalar<R: Read>(&mut self, src: &mut R, header: &Header) -> Result<(), PackError> {
        match header.kind.payload_len() {
            PayloadLen::Known(n) => self.ensure(src, n),
            PayloadLen::Variable => Ok(()),
        }
    }

    /// A length-limited reader over a non-container payload.
    ///
    /// The reader serves whatever payload bytes already sit in the window,
    /// then pulls at most the payload remainder from the source. While it
    /// is alive the unpacker is exclusively borrowed; dropping it before
    /// the payload is drained leaves the stream position mid-value.
    pub fn raw_reader<'u, R: Read>(
        &'u mut self,
        src: &'u mut R,
        header: &Header,
    ) -> Result<RawReader<'u, 'b, R>, PackError> {
        if header.is_container() {
            return Err(PackError::InvalidValue("container values are not raw"));
        }
        Ok(RawReader {
            unpacker: self,
            src,
            remaining: u64::from(header.size),
        })
    }

    /// Opens a cursor over an array header's elements.
    pub fn open_array<'u>(
        &'u mut self,
        header: &Header,
    ) -> Result<StreamArrayCursor<'u, 'b>, PackError> {
        match header.kind {
            Kind::FixArray(_) | Kind::Array16 | Kind::Array32 => Ok(StreamArrayCursor {
                unpacker: self,
                len: header.size,
                consumed: 0,
            }),
            _ => Err(PackError::InvalidValue("not an array value")),
        }
    }

    /// Opens a cursor over a map header's key/value pairs.
    pub fn open_map<'u>(
        &'u mut self,
        header: &Header,
    ) -> Result<StreamMapCursor<'u, 'b>, PackError> {
        match header.kind {
            Kind::FixMap(_) | Kind::Map16 | Kind::Map32 => Ok(StreamMapCursor {
                unpacker: self,
                len: header.size,
                consumed: 0,
                expecting_value: false,
            }),
            _ => Err(PackError::InvalidValue("not a map value")),
        }
    }

    /// Discards the value under `header` entirely: drains primitive and
    /// blob payloads, recurses into containers.
    ///
    /// Total: either the whole value is consumed or the incomplete stream
    /// surfaces as [`PackError::EndOfStream`].
    pub fn skip<R: Read>(&mut self, src: &mut R, header: &Header) -> Result<(), PackError> {
        match header.kind {
            Kind::FixArray(_) | Kind::Array16 | Kind::Array32 => {
                for _ in 0..header.size {
                    let child = self.next(src)?;
                    self.skip(src, &child)?;
                }
                Ok(())
            }
            Kind::FixMap(_) | Kind::Map16 | Kind::Map32 => {
                for _ in 0..header.size {
                    let key = self.next(src)?;
                    self.skip(src, &key)?;
                    let value = self.next(src)?;
                    self.skip(src, &value)?;
                }
                Ok(())
            }
            _ => self.drain(src, header.size as usize),
        }
    }

    fn drain<R: Read>(&mut self, src: &mut R, mut left: usize) -> Result<(), PackError> {
        while left > 0 {
            if self.len == 0 && self.refill(src)? == 0 {
                return Err(PackError::EndOfStream);
            }
            let take = left.min(self.len);
            self.consume(take);
            left -= take;
        }
        Ok(())
    }

    /// Refills the window until it holds `n` bytes.
    fn ensure<R: Read>(&mut self, src: &mut R, n: usize) -> Result<(), PackError> {
        assert!(n <= self.buf.len(), "payload cannot fit the refill buffer");
        while self.len < n {
            if self.refill(src)? == 0 {
                return Err(PackError::EndOfStream);
            }
        }
        Ok(())
    }

    /// Reads once from the source into the buffer tail, compacting the
    /// window to offset 0 first when the tail is exhausted. Returns the
    /// byte count; zero means the source is drained.
    fn refill<R: Read>(&mut self, src: &mut R) -> Result<usize, PackError> {
        if self.start > 0 && self.start + self.len == self.buf.len() {
            self.buf.copy_within(self.start..self.start + self.len, 0);
            self.start = 0;
        }
        let tail = self.start + self.len;
        debug_assert!(tail < self.buf.len(), "refill with a full window");
        let n = src.read(&mut self.buf[tail..])?;
        self.len += n;
        self.bytes_read += n as u64;
        tracing::trace!(refilled = n, window = self.len, "stream refill");
        Ok(n)
    }

    fn consume(&mut self, n: usize) {
        debug_assert!(n <= self.len);
        self.start += n;
        self.len -= n;
        if self.len == 0 {
            self.start = 0;
        }
    }

    fn window_unpacker(&self) -> Unpacker<'_> {
        Unpacker::new(&self.buf[self.start..self.start + self.len])
    }

    /// Runs a buffer-unpacker operation over the window and consumes what
    /// it consumed, success or not, so buffer and stream positions agree.
    fn convert<T>(
        &mut self,
        op: impl FnOnce(&mut Unpacker<'_>) -> Result<T, PackError>,
    ) -> Result<T, PackError> {
        let mut un = Unpacker::new(&self.buf[self.start..self.start + self.len]);
        let before = un.remaining();
        let result = op(&mut un);
        let used = before - un.remaining();
        self.consume(used);
        result
    }
}

/// Reads one value's raw payload out of a [`StreamUnpacker`].
///
/// Reads at most the payload length; a source that ends early makes the
/// reader report end-of-file short, which callers detect by comparing the
/// copied count against the header's size.
#[derive(Debug)]
pub struct RawReader<'u, 'b, R> {
    unpacker: &'u mut StreamUnpacker<'b>,
    src: &'u mut R,
    remaining: u64,
}

impl<R> RawReader<'_, '_, R> {
    /// Payload bytes not yet read.
    pub fn remaining(&self) -> u64 {
        self.remaining
    }
}

impl<R: Read> Read for RawReader<'_, '_, R> {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        if self.remaining == 0 || out.is_empty() {
            return Ok(0);
        }
        let cap = out
            .len()
            .min(usize::try_from(self.remaining).unwrap_or(usize::MAX));

        // Window prefix first.
        if self.unpacker.len > 0 {
            let take = cap.min(self.unpacker.len);
            let start = self.unpacker.start;
            out[..take].copy_from_slice(&self.unpacker.buf[start..start + take]);
            self.unpacker.consume(take);
            self.remaining -= take as u64;
            return Ok(take);
        }

        // Then straight from the source, bypassing the refill buffer.
        let n = self.src.read(&mut out[..cap])?;
        self.unpacker.bytes_read += n as u64;
        self.remaining -= n as u64;
        Ok(n)
    }
}

/// Iterates the elements of one opened array, driving the stream unpacker.
#[derive(Debug)]
pub struct StreamArrayCursor<'u, 'b> {
    unpacker: &'u mut StreamUnpacker<'b>,
    len: u32,
    consumed: u32,
}

impl<'u, 'b> StreamArrayCursor<'u, 'b> {
    /// The next element's header, or `None` once the declared count is
    /// exhausted.
    pub fn next<R: Read>(&mut self, src: &mut R) -> Result<Option<Header>, PackError> {
        if self.consumed == self.len {
            return Ok(None);
        }
        let header = self.unpacker.next(src)?;
        self.consumed += 1;
        Ok(Some(header))
    }

    pub fn remaining(&self) -> u32 {
        self.len - self.consumed
    }

    pub fn is_exhausted(&self) -> bool {
        self.consumed == self.len
    }

    /// The shared unpacker, for payload conversion and nested containers.
    pub fn unpacker(&mut self) -> &mut StreamUnpacker<'b> {
        self.unpacker
    }
}

/// Iterates the key/value pairs of one opened map; each
/// [`StreamMapCursor::next`] yields one child header, alternating key and
/// value.
#[derive(Debug)]
pub struct StreamMapCursor<'u, 'b> {
    unpacker: &'u mut StreamUnpacker<'b>,
    len: u32,
    consumed: u32,
    expecting_value: bool,
}

impl<'u, 'b> StreamMapCursor<'u, 'b> {
    /// The next key or value header, or `None` once all pairs are
    /// consumed.
    pub fn next<R: Read>(&mut self, src: &mut R) -> Result<Option<Header>, PackError> {
        if self.consumed == self.len && !self.expecting_value {
            return Ok(None);
        }
        let header = self.unpacker.next(src)?;
        if self.expecting_value {
            self.consumed += 1;
        }
        self.expecting_value = !self.expecting_value;
        Ok(Some(header))
    }

    /// True when the next header is a value (not a key).
    pub fn expecting_value(&self) -> bool {
        self.expecting_value
    }

    pub fn remaining(&self) -> u32 {
        self.len - self.consumed
    }

    pub fn is_exhausted(&self) -> bool {
        self.consumed == self.len && !self.expecting_value
    }

    /// The shared unpacker, for payload conversion and nested containers.
    pub fn unpacker(&mut self) -> &mut StreamUnpacker<'b> {
        self.unpacker
    }
}

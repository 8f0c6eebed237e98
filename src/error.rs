//! Error types for the MessagePack codec.

/// Errors signalled by the encoder and the unpackers.
///
/// Every fallible operation documents which of these it can return. Panics
/// are reserved for precondition violations (programmer errors), never for
/// data-driven failures.
#[derive(Debug, thiserror::Error)]
pub enum PackError {
    /// The unpacker's window holds no bytes (or not enough payload bytes).
    /// Recoverable: supply more input and retry.
    #[error("buffer empty: more input required")]
    BufferEmpty,

    /// The leading byte is reserved by the wire format or not accepted by
    /// this build.
    #[error("unrecognised tag byte: 0x{0:02X}")]
    UnrecognisedTag(u8),

    /// The on-wire kind does not admit conversion to the requested host
    /// type, or the conversion would lose information.
    #[error("invalid value: {0}")]
    InvalidValue(&'static str),

    /// Encoder-only: a container or blob length exceeds the 32-bit wire
    /// length field.
    #[error("value too large for the wire format: {0} bytes")]
    ValueTooLarge(u64),

    /// Stream unpacker only: the source returned zero bytes before a full
    /// header or payload was available.
    #[error("end of stream")]
    EndOfStream,

    /// An error from a caller-supplied source or sink, propagated verbatim.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

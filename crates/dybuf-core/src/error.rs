//! Error type shared by the buffer, the codecs and the packet layer.

use thiserror::Error;

use crate::packet::FieldType;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DyBufError>;

/// Errors that can occur while appending to or reading from a [`crate::DyBuf`].
///
/// Every failing operation leaves the cursor where it was before the call, so
/// a caller may inspect the buffer after an error. Reusing the buffer for new
/// output still requires [`crate::DyBuf::clear`].
#[derive(Debug, Error, PartialEq)]
pub enum DyBufError {
    /// The allocator refused to provide the requested storage.
    #[error("allocation of {requested} bytes failed")]
    AllocationFailed { requested: usize },

    /// An append needs more room than a non-growable buffer has left.
    #[error("capacity exhausted: need {needed} bytes, {remainder} remaining")]
    CapacityExhausted { needed: usize, remainder: usize },

    /// The buffer wraps read-only memory and cannot be appended to.
    #[error("buffer is read-only")]
    ReadOnly,

    /// A read would run past the end of the valid extent.
    #[error("unexpected end of buffer: need {needed} bytes, {remainder} remaining")]
    UnexpectedEnd { needed: usize, remainder: usize },

    /// A cursor move targets a position outside `[0, extent]`.
    #[error("position {position} is beyond extent {extent}")]
    PositionOutOfBounds { position: usize, extent: usize },

    /// The first byte of a typdex tag carries no valid tier marker.
    #[error("malformed typdex header: 0x{0:02X}")]
    MalformedTypdex(u8),

    /// A typdex index does not fit in the widest (4-byte) tier.
    #[error("typdex index {index} exceeds maximum {max}")]
    TypdexIndexOutOfRange { index: u32, max: u32 },

    /// A 9-byte varint whose biased value does not fit in 64 bits.
    #[error("varint overflows 64 bits")]
    VarintOverflow,

    /// A payload is longer than its fixed-width length prefix can describe.
    #[error("payload of {len} bytes exceeds the {max}-byte prefix limit")]
    LengthTooLarge { len: usize, max: usize },

    /// A decoded length prefix does not fit in `usize` on this platform.
    #[error("length prefix {0} does not fit in memory")]
    LengthOverflow(u64),

    /// A text payload is not valid UTF-8.
    #[error("invalid UTF-8 in text payload: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    /// A text payload does not end with its NUL terminator.
    #[error("text payload is missing its terminator")]
    MissingTerminator,

    /// A packet field tag names a type code with no meaning in this format.
    #[error("unknown field type code: 0x{0:02X}")]
    UnknownFieldType(u8),

    /// A packet field tag names a reserved type this codec does not decode.
    #[error("unsupported field type: {0:?}")]
    UnsupportedFieldType(FieldType),

    /// The packet already ends with `Eof`; clear the writer to start another.
    #[error("packet is finished")]
    PacketFinished,

    /// The next packet field is not of the type the caller asked for.
    #[error("field type mismatch: expected {expected:?}, found {found:?}")]
    FieldTypeMismatch { expected: FieldType, found: FieldType },
}

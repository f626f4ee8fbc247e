//! Error types for block construction, encoding and body decoding.

use stream::StreamError;

/// Result type for block operations.
pub type BlockResult<T> = Result<T, BlockError>;

/// Errors raised by a single block.
///
/// Every variant is fatal for a serialization run: a block whose length
/// cannot be trusted corrupts the offset of every block after it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum BlockError {
    /// A time-varying block was declared with zero frames.
    #[error("invalid declared frame count {declared}, need at least 1")]
    InvalidFrameCount { declared: u16 },

    /// Name does not fit the `u16` length prefix.
    #[error("name is {len} bytes, maximum is 65535")]
    NameTooLong { len: usize },

    /// String or array attribute does not fit the `u16` length prefix.
    #[error("attribute value has {len} elements, maximum is 65535")]
    ValueTooLong { len: usize },

    /// Attribute list is already at its `u16` entry limit.
    #[error("attribute list is full ({count} entries)")]
    TooManyAttributes { count: usize },

    /// A frame was appended past the declared frame count.
    #[error("frame chain already holds the declared {declared} frames")]
    FrameOverflow { declared: u16 },

    /// Declared frame count disagrees with the chain at encode time.
    #[error("declared {declared} frames but chain holds {actual}")]
    FrameCountMismatch { declared: u16, actual: usize },

    /// Emitted body length disagrees with the computed length.
    #[error("computed body length {computed} but emitted {emitted} bytes")]
    LengthMismatch { computed: u32, emitted: usize },

    /// Referenced block has been dropped.
    #[error("reference to a dropped block")]
    DanglingReference,

    /// Referenced block is not part of the registry being written.
    #[error("reference to a block that is not registered")]
    UnregisteredReference,

    /// Mutation attempted after the block was sealed for serialization.
    #[error("block is sealed; it cannot be mutated after its length was computed")]
    Sealed,

    /// Compressed output requested but no codec supplied.
    #[error("compressed body requested without a codec")]
    MissingCodec,

    /// Unknown attribute value tag while decoding.
    #[error("unknown attribute value tag {tag}")]
    UnknownValueTag { tag: u8 },

    /// Body had bytes left over after parsing.
    #[error("{remaining} trailing bytes after block body")]
    TrailingBytes { remaining: usize },

    /// Byte stream error.
    #[error(transparent)]
    Stream(#[from] StreamError),
}

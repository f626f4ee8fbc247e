//! Error types for registration, file writing and file reading.

use std::fmt;
use std::io;

use block::{BlockError, BlockId};
use stream::StreamError;

/// Result type for container operations.
pub type AwdResult<T> = Result<T, AwdError>;

/// Errors raised by the registry, the writer and the reader.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AwdError {
    /// The same block instance was registered twice.
    #[error("block is already registered as {id}")]
    DuplicateRegistration { id: BlockId },

    /// The 32-bit ID space ran out.
    #[error("block id space exhausted")]
    IdSpaceExhausted,

    /// A block was mutably borrowed elsewhere while the writer needed it.
    #[error("block {id} is borrowed elsewhere")]
    BlockBusy { id: BlockId },

    /// A block failed to compute its length, encode or decode.
    #[error("block {id}: {source}")]
    Block {
        id: BlockId,
        #[source]
        source: BlockError,
    },

    /// The serialized body does not fit the 32-bit file length field.
    #[error("file body is {length} bytes, maximum is 4294967295")]
    BodyTooLarge { length: usize },

    /// File is too small to contain its header.
    #[error("file is {actual} bytes, header needs {required}")]
    FileTooSmall { actual: usize, required: usize },

    #[error("invalid magic {found:?}")]
    InvalidMagic { found: [u8; 3] },

    #[error("unsupported format version {major}.{minor}")]
    UnsupportedVersion { major: u8, minor: u8 },

    #[error("invalid file flags {flags:#06x}")]
    InvalidFlags { flags: u16 },

    #[error("invalid flags {flags:#04x} on block {id}")]
    InvalidBlockFlags { id: BlockId, flags: u8 },

    /// The file names a compression scheme no codec was supplied for.
    #[error("unknown compression id {id}")]
    UnknownCompression { id: u8 },

    /// A codec claimed the id that marks a file as uncompressed.
    #[error("codec {name} uses reserved compression id {id}")]
    ReservedCodecId { name: &'static str, id: u8 },

    #[error("header declares {header_len} body bytes but {actual_len} follow")]
    BodyLengthMismatch { header_len: u32, actual_len: usize },

    /// Block IDs must strictly increase through the file.
    #[error("block {current} follows block {previous}")]
    NonMonotonicId { previous: BlockId, current: BlockId },

    #[error("truncated block frame: need {needed} bytes, {available} available")]
    Truncated { needed: usize, available: usize },

    #[error("{kind} limit exceeded: {actual} > {limit}")]
    LimitsExceeded {
        kind: LimitKind,
        limit: usize,
        actual: usize,
    },

    #[error(transparent)]
    Stream(#[from] StreamError),

    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}

impl AwdError {
    pub(crate) fn block(id: BlockId) -> impl FnOnce(BlockError) -> Self {
        move |source| Self::Block { id, source }
    }
}

/// Reader limits that can be exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    FileBytes,
    BlockCount,
    BodyLength,
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileBytes => write!(f, "file size"),
            Self::BlockCount => write!(f, "block count"),
            Self::BodyLength => write!(f, "block body length"),
        }
    }
}

//! Error types for byte stream operations.

/// Result type for byte stream operations.
pub type StreamResult<T> = Result<T, StreamError>;

/// Errors that can occur while encoding or decoding byte streams.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StreamError {
    /// Attempted to read past the end of the buffer.
    #[error("attempted to read {requested} bytes but only {available} bytes available")]
    UnexpectedEof {
        /// Number of bytes requested.
        requested: usize,
        /// Number of bytes available.
        available: usize,
    },

    /// A length does not fit in its prefix field.
    #[error("length {length} does not fit in a {prefix_bits}-bit prefix")]
    LengthOverflow {
        /// The length that was too large.
        length: usize,
        /// Width of the prefix field in bits.
        prefix_bits: u8,
    },

    /// A string field did not contain valid UTF-8.
    #[error("invalid utf-8 in string field at byte {valid_up_to}")]
    InvalidUtf8 {
        /// Number of valid bytes before the first invalid sequence.
        valid_up_to: usize,
    },

    /// Compression or decompression failed.
    #[error("{codec} codec failed: {message}")]
    Codec {
        /// Codec name.
        codec: &'static str,
        /// Underlying error message.
        message: String,
    },

    /// Decompressed output grew past the caller's cap.
    #[error("decompressed output exceeds {limit} bytes")]
    OutputLimit {
        /// The cap that was hit.
        limit: usize,
    },
}

//! File header types and constants.

use stream::{ByteReader, ByteSink};

use crate::error::{AwdError, AwdResult};

/// Magic bytes at the start of every file.
pub const MAGIC: [u8; 3] = *b"AWD";

/// Format version written by this crate.
pub const VERSION_MAJOR: u8 = 2;
pub const VERSION_MINOR: u8 = 1;

/// Header size in bytes (12 total).
pub const FILE_HEADER_SIZE: usize = 3 + 1 + 1 + 2 + 1 + 4;

/// Compression id for uncompressed files.
pub const COMPRESSION_NONE: u8 = 0;

/// File-level flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FileFlags(u16);

impl FileFlags {
    /// Floating point fields are 64-bit throughout the file.
    pub const WIDE_FLOATS: u16 = 1 << 0;

    /// Reserved bits mask (must be zero).
    const RESERVED_MASK: u16 = !0b1;

    #[must_use]
    pub const fn from_raw(raw: u16) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }

    #[must_use]
    pub const fn wide_floats(self) -> bool {
        self.0 & Self::WIDE_FLOATS != 0
    }

    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 & Self::RESERVED_MASK == 0
    }

    #[must_use]
    pub const fn with_wide_floats(wide: bool) -> Self {
        if wide {
            Self(Self::WIDE_FLOATS)
        } else {
            Self(0)
        }
    }
}

/// File header.
///
/// The magic is checked during decoding and not stored here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeader {
    pub major: u8,
    pub minor: u8,
    pub flags: FileFlags,
    /// Id of the codec block bodies were compressed with, or
    /// [`COMPRESSION_NONE`].
    pub compression: u8,
    /// Length of everything after the header.
    pub body_len: u32,
}

impl FileHeader {
    /// Creates a header for the current format version.
    #[must_use]
    pub const fn new(flags: FileFlags, compression: u8, body_len: u32) -> Self {
        Self {
            major: VERSION_MAJOR,
            minor: VERSION_MINOR,
            flags,
            compression,
            body_len,
        }
    }

    #[must_use]
    pub const fn is_compressed(&self) -> bool {
        self.compression != COMPRESSION_NONE
    }

    pub fn encode(&self, sink: &mut dyn ByteSink) {
        sink.write_bytes(&MAGIC);
        sink.write_u8(self.major);
        sink.write_u8(self.minor);
        sink.write_u16(self.flags.raw());
        sink.write_u8(self.compression);
        sink.write_u32(self.body_len);
    }

    /// Decodes and validates a header from the start of `buf`.
    pub fn decode(buf: &[u8]) -> AwdResult<Self> {
        if buf.len() < FILE_HEADER_SIZE {
            return Err(AwdError::FileTooSmall {
                actual: buf.len(),
                required: FILE_HEADER_SIZE,
            });
        }
        let mut reader = ByteReader::new(buf);

        let mut found = [0u8; 3];
        found.copy_from_slice(reader.read_bytes(3)?);
        if found != MAGIC {
            return Err(AwdError::InvalidMagic { found });
        }

        let major = reader.read_u8()?;
        let minor = reader.read_u8()?;
        if major != VERSION_MAJOR {
            return Err(AwdError::UnsupportedVersion { major, minor });
        }

        let raw_flags = reader.read_u16()?;
        let flags = FileFlags::from_raw(raw_flags);
        if !flags.is_valid() {
            return Err(AwdError::InvalidFlags { flags: raw_flags });
        }

        Ok(Self {
            major,
            minor,
            flags,
            compression: reader.read_u8()?,
            body_len: reader.read_u32()?,
        })
    }
}

//! Bounded file reading.

use block::{decode_body, BlockError, BlockHeader, BlockId, DecodedBody, BLOCK_HEADER_SIZE};
use stream::{ByteReader, Codec, Deflate, StreamError};
use tracing::debug;

use crate::error::{AwdError, AwdResult, LimitKind};
use crate::header::{FileHeader, COMPRESSION_NONE, FILE_HEADER_SIZE};
use crate::limits::Limits;

/// A block header and its stored (possibly compressed) body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockFrame<'a> {
    pub header: BlockHeader,
    pub body: &'a [u8],
}

/// A decoded block.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedBlock {
    pub header: BlockHeader,
    pub body: DecodedBody,
}

impl DecodedBlock {
    #[must_use]
    pub const fn id(&self) -> BlockId {
        self.header.id
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.body.name.as_ref().map(|name| name.as_str())
    }
}

/// A fully decoded file.
#[derive(Debug, Clone, PartialEq)]
pub struct AwdFile {
    pub header: FileHeader,
    pub blocks: Vec<DecodedBlock>,
}

impl AwdFile {
    /// Looks a block up by ID.
    #[must_use]
    pub fn block(&self, id: BlockId) -> Option<&DecodedBlock> {
        self.blocks
            .binary_search_by_key(&id, DecodedBlock::id)
            .ok()
            .map(|index| &self.blocks[index])
    }
}

/// Splits a file into its header and block frames without decoding bodies.
///
/// Validates the header, the declared body length, every block header and
/// the ID order against `limits`.
pub fn read_frames<'a>(
    buf: &'a [u8],
    limits: &Limits,
) -> AwdResult<(FileHeader, Vec<BlockFrame<'a>>)> {
    if buf.len() > limits.max_file_bytes {
        return Err(AwdError::LimitsExceeded {
            kind: LimitKind::FileBytes,
            limit: limits.max_file_bytes,
            actual: buf.len(),
        });
    }
    let header = FileHeader::decode(buf)?;

    let body = &buf[FILE_HEADER_SIZE..];
    if header.body_len as usize != body.len() {
        return Err(AwdError::BodyLengthMismatch {
            header_len: header.body_len,
            actual_len: body.len(),
        });
    }

    let mut reader = ByteReader::new(body);
    let mut frames = Vec::new();
    let mut previous = BlockId::NONE;
    while !reader.is_empty() {
        if frames.len() == limits.max_blocks {
            return Err(AwdError::LimitsExceeded {
                kind: LimitKind::BlockCount,
                limit: limits.max_blocks,
                actual: frames.len() + 1,
            });
        }
        if reader.remaining() < BLOCK_HEADER_SIZE {
            return Err(AwdError::Truncated {
                needed: BLOCK_HEADER_SIZE,
                available: reader.remaining(),
            });
        }
        let block_header =
            BlockHeader::decode(&mut reader).map_err(AwdError::block(BlockId::NONE))?;
        let id = block_header.id;
        if id <= previous {
            return Err(AwdError::NonMonotonicId {
                previous,
                current: id,
            });
        }
        if !block_header.flags.is_valid()
            || block_header.flags.wide_floats() != header.flags.wide_floats()
            || block_header.flags.compressed() != header.is_compressed()
        {
            return Err(AwdError::InvalidBlockFlags {
                id,
                flags: block_header.flags.raw(),
            });
        }

        let len = block_header.body_len as usize;
        if len > limits.max_body_len {
            return Err(AwdError::LimitsExceeded {
                kind: LimitKind::BodyLength,
                limit: limits.max_body_len,
                actual: len,
            });
        }
        if reader.remaining() < len {
            return Err(AwdError::Truncated {
                needed: len,
                available: reader.remaining(),
            });
        }
        let body = reader.read_bytes(len)?;
        frames.push(BlockFrame {
            header: block_header,
            body,
        });
        previous = id;
    }

    debug!(blocks = frames.len(), "read block frames");
    Ok((header, frames))
}

/// Reads and decodes a whole file.
///
/// Compressed bodies are inflated with the built-in codec named by the file
/// header.
///
/// # Errors
///
/// [`AwdError::UnknownCompression`] if the header names a codec this crate
/// does not ship; use [`read_file_with_codec`] for those.
pub fn read_file(buf: &[u8], limits: &Limits) -> AwdResult<AwdFile> {
    let header = FileHeader::decode(buf)?;
    match header.compression {
        COMPRESSION_NONE => decode_file(buf, limits, None),
        Deflate::ID => decode_file(buf, limits, Some(&Deflate::default())),
        id => Err(AwdError::UnknownCompression { id }),
    }
}

/// Reads a file whose bodies were compressed with `codec`.
pub fn read_file_with_codec(buf: &[u8], limits: &Limits, codec: &dyn Codec) -> AwdResult<AwdFile> {
    let header = FileHeader::decode(buf)?;
    if header.is_compressed() && header.compression != codec.id() {
        return Err(AwdError::UnknownCompression {
            id: header.compression,
        });
    }
    decode_file(buf, limits, Some(codec))
}

fn decode_file(buf: &[u8], limits: &Limits, codec: Option<&dyn Codec>) -> AwdResult<AwdFile> {
    let (header, frames) = read_frames(buf, limits)?;
    let blocks = frames
        .iter()
        .map(|frame| decode_frame(frame, limits, codec))
        .collect::<AwdResult<Vec<_>>>()?;
    Ok(AwdFile { header, blocks })
}

fn decode_frame(
    frame: &BlockFrame<'_>,
    limits: &Limits,
    codec: Option<&dyn Codec>,
) -> AwdResult<DecodedBlock> {
    let id = frame.header.id;
    let body = if frame.header.flags.compressed() {
        let codec = codec.ok_or_else(|| AwdError::Block {
            id,
            source: BlockError::MissingCodec,
        })?;
        let raw = codec
            .decompress(frame.body, limits.max_body_len)
            .map_err(|err| match err {
                // Inflation stops one byte past the limit.
                StreamError::OutputLimit { limit } => AwdError::LimitsExceeded {
                    kind: LimitKind::BodyLength,
                    limit,
                    actual: limit.saturating_add(1),
                },
                err => AwdError::block(id)(err.into()),
            })?;
        decode_body(&frame.header, &raw)
    } else {
        decode_body(&frame.header, frame.body)
    }
    .map_err(AwdError::block(id))?;

    Ok(DecodedBlock {
        header: frame.header,
        body,
    })
}

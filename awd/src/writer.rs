//! Two-pass file writer.

use std::fmt;
use std::io;

use block::{
    Block, BlockError, BlockHeader, BlockId, BodyConfig, EncodeContext, BLOCK_HEADER_SIZE,
};
use stream::{ByteSink, ByteWriter, Codec};
use tracing::{debug, info, instrument};

use crate::error::{AwdError, AwdResult};
use crate::header::{FileFlags, FileHeader, COMPRESSION_NONE, FILE_HEADER_SIZE};
use crate::options::WriteOptions;
use crate::registry::BlockRegistry;

/// Serializes a registry into a complete file.
///
/// A run has two passes over the blocks in ID order. The length pass asks
/// every block for its exact body length, which also runs each block's
/// consistency checks. The emit pass writes headers and bodies and verifies
/// each body against the length computed for it. Every block is sealed before
/// the length pass, so nothing can change between the two.
///
/// The file is assembled in memory; an error in either pass leaves the
/// destination untouched.
pub struct Writer {
    options: WriteOptions,
    codec: Option<Box<dyn Codec>>,
}

impl Writer {
    /// Creates a writer using the built-in codec for `options.compression`.
    #[must_use]
    pub fn new(options: WriteOptions) -> Self {
        Self {
            options,
            codec: options.compression.codec(),
        }
    }

    /// Replaces the compression codec. Bodies are compressed with `codec`
    /// and its id, which must not be [`COMPRESSION_NONE`], is recorded in the
    /// file header.
    #[must_use]
    pub fn with_codec(mut self, codec: Box<dyn Codec>) -> Self {
        self.codec = Some(codec);
        self
    }

    #[must_use]
    pub const fn options(&self) -> &WriteOptions {
        &self.options
    }

    /// The configuration every block in a run is encoded under.
    #[must_use]
    pub fn body_config(&self) -> BodyConfig {
        BodyConfig::new(self.options.wide_floats, self.codec.is_some())
    }

    /// Serializes `registry` into file bytes.
    ///
    /// Every registered block is sealed before the length pass and stays
    /// sealed even when the run fails, so a block rejected here (for example
    /// one short of its declared frames) has to be rebuilt before retrying.
    ///
    /// # Errors
    ///
    /// Any block error is returned as [`AwdError::Block`] with the offending
    /// block's ID; no bytes are produced. A codec reporting
    /// [`COMPRESSION_NONE`] as its id is rejected with
    /// [`AwdError::ReservedCodecId`] before any block is sealed.
    #[instrument(skip_all, fields(blocks = registry.len()))]
    pub fn encode(&self, registry: &BlockRegistry) -> AwdResult<Vec<u8>> {
        let compression = self.compression_id()?;
        let config = self.body_config();
        let mut ctx = EncodeContext::new(config, registry);
        if let Some(codec) = self.codec.as_deref() {
            ctx = ctx.with_codec(codec);
        }

        registry.seal_all()?;
        let lengths = length_pass(registry, &ctx)?;
        let body = emit_pass(registry, &ctx, &lengths)?;

        let body_len =
            u32::try_from(body.len()).map_err(|_| AwdError::BodyTooLarge { length: body.len() })?;
        let header = FileHeader::new(
            FileFlags::with_wide_floats(config.wide_floats),
            compression,
            body_len,
        );

        let mut out = ByteWriter::with_capacity(FILE_HEADER_SIZE + body.len());
        header.encode(&mut out);
        out.write_bytes(&body);
        info!(bytes = out.bytes_written(), "encoded file");
        Ok(out.finish())
    }

    fn compression_id(&self) -> AwdResult<u8> {
        match self.codec.as_deref() {
            None => Ok(COMPRESSION_NONE),
            Some(codec) if codec.id() == COMPRESSION_NONE => Err(AwdError::ReservedCodecId {
                name: codec.name(),
                id: codec.id(),
            }),
            Some(codec) => Ok(codec.id()),
        }
    }

    /// Serializes `registry` and writes the file to `out` in one call.
    ///
    /// Returns the number of bytes written.
    pub fn write_to<W: io::Write>(&self, registry: &BlockRegistry, mut out: W) -> AwdResult<usize> {
        let bytes = self.encode(registry)?;
        out.write_all(&bytes)?;
        out.flush()?;
        Ok(bytes.len())
    }
}

impl Default for Writer {
    fn default() -> Self {
        Self::new(WriteOptions::default())
    }
}

impl fmt::Debug for Writer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Writer")
            .field("options", &self.options)
            .field("codec", &self.codec.as_ref().map(|codec| codec.name()))
            .finish()
    }
}

fn length_pass(registry: &BlockRegistry, ctx: &EncodeContext<'_>) -> AwdResult<Vec<u32>> {
    let mut lengths = Vec::with_capacity(registry.len());
    for (id, handle) in registry.iter() {
        let block = handle
            .try_borrow()
            .map_err(|_| AwdError::BlockBusy { id })?;
        let len = block
            .compute_body_length(ctx)
            .map_err(AwdError::block(id))?;
        debug!(id = id.raw(), kind = ?block.block_type(), len, "computed body length");
        lengths.push(len);
    }
    Ok(lengths)
}

fn emit_pass(
    registry: &BlockRegistry,
    ctx: &EncodeContext<'_>,
    lengths: &[u32],
) -> AwdResult<Vec<u8>> {
    let capacity = lengths
        .iter()
        .map(|&len| BLOCK_HEADER_SIZE + len as usize)
        .sum();
    let mut body = ByteWriter::with_capacity(capacity);

    for ((id, handle), &len) in registry.iter().zip(lengths) {
        let block = handle
            .try_borrow()
            .map_err(|_| AwdError::BlockBusy { id })?;
        emit_block(&mut body, id, &*block, ctx, len)?;
    }
    Ok(body.finish())
}

fn emit_block(
    sink: &mut ByteWriter,
    id: BlockId,
    block: &dyn Block,
    ctx: &EncodeContext<'_>,
    len: u32,
) -> AwdResult<()> {
    let header = BlockHeader::new(id, block.block_type(), block.flags(ctx.config), len);
    header.encode(sink);

    let start = sink.bytes_written();
    block.write_body(sink, ctx).map_err(AwdError::block(id))?;
    let emitted = sink.bytes_written() - start;
    if emitted != len as usize {
        return Err(AwdError::Block {
            id,
            source: BlockError::LengthMismatch {
                computed: len,
                emitted,
            },
        });
    }
    Ok(())
}

//! The block contract.

use std::fmt;

use stream::{ByteSink, ByteWriter, LengthCounter, StreamError};

use crate::context::{BodyConfig, EncodeContext};
use crate::element::BlockCore;
use crate::error::{BlockError, BlockResult};
use crate::header::{BlockFlags, BlockType};

/// A serializable unit of the container.
///
/// Implementors provide their type tag, access to their embedded
/// [`BlockCore`], and the type-specific payload writer. Length computation
/// and body emission are provided on top of those and share one code path:
/// [`compute_body_length`](Self::compute_body_length) runs the same writer
/// against a [`LengthCounter`], so the two cannot disagree for a given state
/// and configuration.
///
/// Body layout: name (if any), attribute list (if any), payload. When the run
/// is compressed, that whole sequence is passed through the run's codec and
/// the compressed bytes are the body.
pub trait Block: fmt::Debug {
    fn block_type(&self) -> BlockType;

    fn core(&self) -> &BlockCore;

    fn core_mut(&mut self) -> &mut BlockCore;

    /// Checks payload consistency before anything is written.
    fn validate(&self) -> BlockResult<()> {
        Ok(())
    }

    /// Writes the type-specific payload.
    fn write_payload(&self, sink: &mut dyn ByteSink, ctx: &EncodeContext<'_>) -> BlockResult<()>;

    fn name(&self) -> Option<&str> {
        self.core().name().map(|name| name.as_str())
    }

    fn flags(&self, config: BodyConfig) -> BlockFlags {
        self.core().flags(config)
    }

    fn is_sealed(&self) -> bool {
        self.core().is_sealed()
    }

    /// Freezes the block. Setters fail with [`BlockError::Sealed`] afterwards.
    fn seal(&mut self) {
        self.core_mut().seal();
    }

    /// Writes the uncompressed body.
    fn write_raw_body(&self, sink: &mut dyn ByteSink, ctx: &EncodeContext<'_>) -> BlockResult<()> {
        self.validate()?;
        self.core().encode(sink, ctx)?;
        self.write_payload(sink, ctx)
    }

    /// Returns the exact number of bytes [`write_body`](Self::write_body)
    /// emits under `ctx`. Pure: repeated calls on unchanged state agree.
    fn compute_body_length(&self, ctx: &EncodeContext<'_>) -> BlockResult<u32> {
        if ctx.config.compressed {
            let packed = compressed_body(self, ctx)?;
            return u32::try_from(packed.len()).map_err(|_| {
                StreamError::LengthOverflow {
                    length: packed.len(),
                    prefix_bits: 32,
                }
                .into()
            });
        }
        let mut counter = LengthCounter::new();
        self.write_raw_body(&mut counter, ctx)?;
        Ok(counter.len_u32()?)
    }

    /// Writes the body as stored in the container.
    fn write_body(&self, sink: &mut dyn ByteSink, ctx: &EncodeContext<'_>) -> BlockResult<()> {
        if ctx.config.compressed {
            let packed = compressed_body(self, ctx)?;
            sink.write_bytes(&packed);
            return Ok(());
        }
        self.write_raw_body(sink, ctx)
    }
}

fn compressed_body<B: Block + ?Sized>(block: &B, ctx: &EncodeContext<'_>) -> BlockResult<Vec<u8>> {
    let codec = ctx.codec.ok_or(BlockError::MissingCodec)?;
    let mut raw = ByteWriter::new();
    block.write_raw_body(&mut raw, ctx)?;
    Ok(codec.compress(raw.as_slice())?)
}

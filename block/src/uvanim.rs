//! Texture coordinate animation blocks.

use stream::{ByteSink, FloatWidth};

use crate::attr::AttrValue;
use crate::block::Block;
use crate::context::EncodeContext;
use crate::element::BlockCore;
use crate::error::{BlockError, BlockResult};
use crate::frames::{FrameChain, Transform};
use crate::header::BlockType;
use crate::name::Name;

/// A UV animation track: one transform per frame.
///
/// The frame count is declared up front and written before the frames so
/// readers can preallocate. The chain must hold exactly that many frames when
/// the block is encoded.
///
/// Payload: `frame_count: u16`, then `frame_count` transforms at the run's
/// float width.
#[derive(Debug, Clone)]
pub struct UvAnimation {
    core: BlockCore,
    frame_count: u16,
    frames: FrameChain,
}

impl UvAnimation {
    /// Creates an empty track declared to hold `frame_count` frames.
    ///
    /// An empty name is stored as no name.
    pub fn new(name: impl Into<String>, frame_count: u16) -> BlockResult<Self> {
        if frame_count == 0 {
            return Err(BlockError::InvalidFrameCount {
                declared: frame_count,
            });
        }
        Ok(Self {
            core: BlockCore::new(Name::optional(name)?),
            frame_count,
            frames: FrameChain::with_capacity(usize::from(frame_count)),
        })
    }

    /// Declared number of frames.
    #[must_use]
    pub const fn frame_count(&self) -> u16 {
        self.frame_count
    }

    #[must_use]
    pub const fn frames(&self) -> &FrameChain {
        &self.frames
    }

    /// Appends the next frame's transform.
    pub fn append_frame(&mut self, transform: &Transform) -> BlockResult<()> {
        self.core.ensure_unsealed()?;
        if self.frames.len() >= usize::from(self.frame_count) {
            return Err(BlockError::FrameOverflow {
                declared: self.frame_count,
            });
        }
        self.frames.push(transform);
        Ok(())
    }

    pub fn add_attribute(&mut self, namespace: u8, id: u16, value: AttrValue) -> BlockResult<()> {
        self.core.add_attribute(namespace, id, value)
    }

    /// Encoded payload size at `width`.
    #[must_use]
    pub const fn payload_len(frame_count: u16, width: FloatWidth) -> usize {
        2 + FrameChain::records_len(frame_count as usize, width)
    }
}

impl Block for UvAnimation {
    fn block_type(&self) -> BlockType {
        BlockType::UvAnimation
    }

    fn core(&self) -> &BlockCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut BlockCore {
        &mut self.core
    }

    fn validate(&self) -> BlockResult<()> {
        if self.frames.len() != usize::from(self.frame_count) {
            return Err(BlockError::FrameCountMismatch {
                declared: self.frame_count,
                actual: self.frames.len(),
            });
        }
        Ok(())
    }

    fn write_payload(&self, sink: &mut dyn ByteSink, ctx: &EncodeContext<'_>) -> BlockResult<()> {
        sink.write_u16(self.frame_count);
        self.frames.encode(sink, ctx.float_width());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::context::BodyConfig;
    use crate::frames::IDENTITY;
    use crate::link::BlockKey;
    use crate::types::BlockId;
    use stream::{ByteReader, ByteWriter};

    fn no_ids() -> HashMap<BlockKey, BlockId> {
        HashMap::new()
    }

    fn offset(u: f64) -> Transform {
        let mut t = IDENTITY;
        t[3] = u;
        t
    }

    #[test]
    fn zero_frames_rejected() {
        assert_eq!(
            UvAnimation::new("UVANIM_water", 0).unwrap_err(),
            BlockError::InvalidFrameCount { declared: 0 }
        );
    }

    #[test]
    fn payload_length_formula() {
        let mut anim = UvAnimation::new("", 3).unwrap();
        for i in 0..3 {
            anim.append_frame(&offset(f64::from(i))).unwrap();
        }
        let ids = no_ids();
        for (wide, width) in [(false, 4), (true, 8)] {
            let ctx = EncodeContext::new(BodyConfig::new(wide, false), &ids);
            assert_eq!(
                anim.compute_body_length(&ctx).unwrap() as usize,
                2 + 3 * 16 * width
            );
        }
    }

    #[test]
    fn frames_are_written_in_append_order() {
        let mut anim = UvAnimation::new("", 2).unwrap();
        anim.append_frame(&offset(0.25)).unwrap();
        anim.append_frame(&offset(0.75)).unwrap();

        let ids = no_ids();
        let ctx = EncodeContext::new(BodyConfig::new(true, false), &ids);
        let mut writer = ByteWriter::new();
        anim.write_body(&mut writer, &ctx).unwrap();
        let bytes = writer.finish();

        let mut reader = ByteReader::new(&bytes);
        assert_eq!(reader.read_u16().unwrap(), 2);
        let chain = FrameChain::decode(&mut reader, 2, FloatWidth::Double).unwrap();
        let us: Vec<f64> = chain.iter().map(|t| t[3]).collect();
        assert_eq!(us, vec![0.25, 0.75]);
    }

    #[test]
    fn short_chain_is_a_consistency_error() {
        let mut anim = UvAnimation::new("UVANIM_water", 3).unwrap();
        anim.append_frame(&IDENTITY).unwrap();
        anim.append_frame(&IDENTITY).unwrap();

        let ids = no_ids();
        let ctx = EncodeContext::new(BodyConfig::default(), &ids);
        let expected = BlockError::FrameCountMismatch {
            declared: 3,
            actual: 2,
        };
        assert_eq!(anim.compute_body_length(&ctx).unwrap_err(), expected);

        let mut writer = ByteWriter::new();
        assert_eq!(anim.write_body(&mut writer, &ctx).unwrap_err(), expected);
        assert_eq!(writer.bytes_written(), 0);
    }

    #[test]
    fn overflow_rejected_at_append() {
        let mut anim = UvAnimation::new("", 1).unwrap();
        anim.append_frame(&IDENTITY).unwrap();
        assert_eq!(
            anim.append_frame(&IDENTITY).unwrap_err(),
            BlockError::FrameOverflow { declared: 1 }
        );
        assert_eq!(anim.frames().len(), 1);
    }

    #[test]
    fn sealed_rejects_append() {
        let mut anim = UvAnimation::new("", 2).unwrap();
        anim.append_frame(&IDENTITY).unwrap();
        anim.seal();
        assert_eq!(anim.append_frame(&IDENTITY).unwrap_err(), BlockError::Sealed);
    }

    #[test]
    fn payload_len_helper() {
        assert_eq!(UvAnimation::payload_len(4, FloatWidth::Double), 2 + 4 * 128);
    }
}

//! Block contract and block building blocks for the awd container.
//!
//! A block is a named element carrying an attribute list and a type-specific
//! payload. Every block implements [`Block`], which pairs an exact length
//! computation with body emission; both are derived from one payload writer
//! so they always agree.
//!
//! # Design Principles
//!
//! - **Composition over inheritance** - Name and attributes live in an embedded
//!   [`BlockCore`]; concrete blocks add only their payload.
//! - **References by identity** - [`BlockLink`] points at a block instance and
//!   resolves to its ID only at encode time, so forward references and cycles
//!   need no backpatching.
//! - **Consistency is checked, never repaired** - A declared count that does
//!   not match its data is an error, not something to pad or truncate.
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//!
//! use block::{Block, BlockId, BlockKey, BodyConfig, EncodeContext, UvAnimation, IDENTITY};
//! use stream::ByteWriter;
//!
//! let mut anim = UvAnimation::new("UVANIM_water", 2).unwrap();
//! anim.append_frame(&IDENTITY).unwrap();
//! anim.append_frame(&IDENTITY).unwrap();
//!
//! let ids: HashMap<BlockKey, BlockId> = HashMap::new();
//! let ctx = EncodeContext::new(BodyConfig::new(true, false), &ids);
//! let len = anim.compute_body_length(&ctx).unwrap();
//!
//! let mut writer = ByteWriter::new();
//! anim.write_body(&mut writer, &ctx).unwrap();
//! assert_eq!(writer.finish().len(), len as usize);
//! ```

mod attr;
mod block;
mod container;
mod context;
mod decode;
mod element;
mod error;
mod frames;
mod header;
mod link;
mod name;
mod types;
mod uvanim;

pub use attr::{tag as attr_tag, AttrEntry, AttrValue, AttributeList};
pub use block::Block;
pub use container::Container;
pub use context::{BodyConfig, EncodeContext};
pub use decode::{decode_body, DecodedBody, Payload};
pub use element::BlockCore;
pub use error::{BlockError, BlockResult};
pub use frames::{
    decode_transform, encode_transform, FrameChain, Transform, IDENTITY, TRANSFORM_LEN,
};
pub use header::{BlockFlags, BlockHeader, BlockType, BLOCK_HEADER_SIZE};
pub use link::{share, BlockHandle, BlockKey, BlockLink, IdResolver, Shared};
pub use name::Name;
pub use types::BlockId;
pub use uvanim::UvAnimation;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_api_exports() {
        let _ = BLOCK_HEADER_SIZE;
        let _ = BlockId::NONE;
        let _ = BlockFlags::default();
        let _ = BodyConfig::default();
        let _ = AttributeList::new();
        let _ = FrameChain::new();
        let _ = IDENTITY;
        let _ = attr_tag::BLOCK_REF;

        let _: BlockResult<()> = Ok(());
    }

    #[test]
    fn variants_report_their_type() {
        assert_eq!(Container::unnamed().block_type(), BlockType::Container);
        assert_eq!(
            UvAnimation::new("", 1).unwrap().block_type(),
            BlockType::UvAnimation
        );
    }
}

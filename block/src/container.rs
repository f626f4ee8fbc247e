//! Scene graph container blocks.

use stream::ByteSink;

use crate::attr::AttrValue;
use crate::block::Block;
use crate::context::EncodeContext;
use crate::element::BlockCore;
use crate::error::BlockResult;
use crate::frames::{encode_transform, Transform, IDENTITY};
use crate::header::BlockType;
use crate::link::BlockLink;
use crate::name::Name;
use crate::types::BlockId;

/// A named scene node with an optional parent and a local transform.
///
/// Payload: parent ID as `u32` (`0` when there is no parent) followed by the
/// 16 transform values at the run's float width.
#[derive(Debug, Clone)]
pub struct Container {
    core: BlockCore,
    parent: Option<BlockLink>,
    transform: Transform,
}

impl Container {
    /// Creates a named container. An empty name is stored as no name.
    pub fn new(name: impl Into<String>) -> BlockResult<Self> {
        Ok(Self::with_core(BlockCore::new(Name::optional(name)?)))
    }

    #[must_use]
    pub fn unnamed() -> Self {
        Self::with_core(BlockCore::new(None))
    }

    fn with_core(core: BlockCore) -> Self {
        Self {
            core,
            parent: None,
            transform: IDENTITY,
        }
    }

    #[must_use]
    pub const fn parent(&self) -> Option<&BlockLink> {
        self.parent.as_ref()
    }

    /// Points this container at `parent`. The parent may be registered later.
    pub fn set_parent(&mut self, parent: Option<BlockLink>) -> BlockResult<()> {
        self.core.ensure_unsealed()?;
        self.parent = parent;
        Ok(())
    }

    #[must_use]
    pub const fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn set_transform(&mut self, transform: &Transform) -> BlockResult<()> {
        self.core.ensure_unsealed()?;
        self.transform = *transform;
        Ok(())
    }

    pub fn add_attribute(&mut self, namespace: u8, id: u16, value: AttrValue) -> BlockResult<()> {
        self.core.add_attribute(namespace, id, value)
    }
}

impl Block for Container {
    fn block_type(&self) -> BlockType {
        BlockType::Container
    }

    fn core(&self) -> &BlockCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut BlockCore {
        &mut self.core
    }

    fn write_payload(&self, sink: &mut dyn ByteSink, ctx: &EncodeContext<'_>) -> BlockResult<()> {
        let parent = match &self.parent {
            Some(link) => link.resolve(ctx.resolver)?,
            None => BlockId::NONE,
        };
        sink.write_u32(parent.raw());
        encode_transform(sink, &self.transform, ctx.float_width());
        Ok(())
    }
}

//! State shared by every block: name, attributes and the sealed marker.

use stream::ByteSink;

use crate::attr::{AttrValue, AttributeList};
use crate::context::{BodyConfig, EncodeContext};
use crate::error::{BlockError, BlockResult};
use crate::header::BlockFlags;
use crate::name::Name;

/// Name and attribute state embedded in every concrete block.
#[derive(Debug, Clone, Default)]
pub struct BlockCore {
    name: Option<Name>,
    attributes: AttributeList,
    sealed: bool,
}

impl BlockCore {
    #[must_use]
    pub fn new(name: Option<Name>) -> Self {
        Self {
            name,
            attributes: AttributeList::new(),
            sealed: false,
        }
    }

    #[must_use]
    pub const fn name(&self) -> Option<&Name> {
        self.name.as_ref()
    }

    pub fn set_name(&mut self, name: Option<Name>) -> BlockResult<()> {
        self.ensure_unsealed()?;
        self.name = name;
        Ok(())
    }

    #[must_use]
    pub const fn attributes(&self) -> &AttributeList {
        &self.attributes
    }

    pub fn add_attribute(&mut self, namespace: u8, id: u16, value: AttrValue) -> BlockResult<()> {
        self.ensure_unsealed()?;
        self.attributes.push(namespace, id, value)
    }

    #[must_use]
    pub const fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Marks the block as handed to a writer. Irreversible.
    pub fn seal(&mut self) {
        self.sealed = true;
    }

    /// Fails with [`BlockError::Sealed`] once the block is sealed.
    pub fn ensure_unsealed(&self) -> BlockResult<()> {
        if self.sealed {
            return Err(BlockError::Sealed);
        }
        Ok(())
    }

    /// Header flags for this state under `config`.
    #[must_use]
    pub fn flags(&self, config: BodyConfig) -> BlockFlags {
        config
            .flags()
            .with(BlockFlags::HAS_NAME, self.name.is_some())
            .with(BlockFlags::HAS_ATTRIBUTES, !self.attributes.is_empty())
    }

    /// Writes the name (if any) then the attribute list (if non-empty).
    pub fn encode(&self, sink: &mut dyn ByteSink, ctx: &EncodeContext<'_>) -> BlockResult<()> {
        if let Some(name) = &self.name {
            name.encode(sink)?;
        }
        if !self.attributes.is_empty() {
            self.attributes.encode(sink, ctx)?;
        }
        Ok(())
    }
}

//! Block registry: ID assignment and serialization order.

use std::cell::RefCell;
use std::rc::Rc;

use block::{Block, BlockHandle, BlockId, BlockKey, IdResolver, Shared};
use indexmap::IndexMap;
use tracing::debug;

use crate::error::{AwdError, AwdResult};

/// ID assigned to the first registered block.
pub const FIRST_BLOCK_ID: u32 = 1;

#[derive(Debug)]
struct Entry {
    id: BlockId,
    handle: BlockHandle,
}

/// Owns the ordered set of blocks in one file.
///
/// IDs are handed out in registration order starting at
/// [`FIRST_BLOCK_ID`] and never reused. A block instance can be registered
/// once; registration order is also serialization order.
///
/// The registry resolves [`BlockLink`](block::BlockLink)s for the writer, so
/// a block may reference another before or after that one is registered.
#[derive(Debug)]
pub struct BlockRegistry {
    entries: IndexMap<BlockKey, Entry>,
    next_id: u32,
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
            next_id: FIRST_BLOCK_ID,
        }
    }

    /// Registers a block and returns its new ID.
    ///
    /// # Errors
    ///
    /// [`AwdError::DuplicateRegistration`] if this instance is already
    /// registered; the registry is left unchanged.
    pub fn register<T: Block + 'static>(&mut self, block: &Shared<T>) -> AwdResult<BlockId> {
        let handle: BlockHandle = block.clone();
        self.register_handle(handle)
    }

    /// Registers a type-erased block handle.
    pub fn register_handle(&mut self, handle: BlockHandle) -> AwdResult<BlockId> {
        let key = BlockKey::of(&handle);
        if let Some(existing) = self.entries.get(&key) {
            return Err(AwdError::DuplicateRegistration { id: existing.id });
        }

        let id = BlockId::new(self.next_id);
        self.next_id = self
            .next_id
            .checked_add(1)
            .ok_or(AwdError::IdSpaceExhausted)?;
        self.entries.insert(key, Entry { id, handle });
        debug!(id = id.raw(), "registered block");
        Ok(id)
    }

    /// Returns the ID of `block`, if registered.
    #[must_use]
    pub fn id_of<T: ?Sized>(&self, block: &Rc<RefCell<T>>) -> Option<BlockId> {
        self.entries.get(&BlockKey::of(block)).map(|entry| entry.id)
    }

    /// Looks a block up by ID.
    #[must_use]
    pub fn get(&self, id: BlockId) -> Option<&BlockHandle> {
        let index = id.raw().checked_sub(FIRST_BLOCK_ID)?;
        self.entries
            .get_index(usize::try_from(index).ok()?)
            .map(|(_, entry)| &entry.handle)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates blocks in ID order.
    pub fn iter(&self) -> impl Iterator<Item = (BlockId, &BlockHandle)> + '_ {
        self.entries.values().map(|entry| (entry.id, &entry.handle))
    }

    /// Seals every block so later mutation is rejected.
    ///
    /// # Errors
    ///
    /// [`AwdError::BlockBusy`] if a block is currently borrowed.
    pub fn seal_all(&self) -> AwdResult<()> {
        for (id, handle) in self.iter() {
            handle
                .try_borrow_mut()
                .map_err(|_| AwdError::BlockBusy { id })?
                .seal();
        }
        Ok(())
    }
}

impl IdResolver for BlockRegistry {
    fn resolve(&self, key: BlockKey) -> Option<BlockId> {
        self.entries.get(&key).map(|entry| entry.id)
    }
}

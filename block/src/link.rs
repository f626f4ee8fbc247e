//! Shared block handles and cross-block references.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::block::Block;
use crate::error::{BlockError, BlockResult};
use crate::types::BlockId;

/// A shared handle to any block, as stored by a registry.
pub type BlockHandle = Rc<RefCell<dyn Block>>;

/// A shared handle to a concrete block type, as held by producers.
pub type Shared<T> = Rc<RefCell<T>>;

/// Wraps a block in a shared handle.
pub fn share<T: Block>(block: T) -> Shared<T> {
    Rc::new(RefCell::new(block))
}

/// Identity of a block instance.
///
/// Two handles have the same key exactly when they point at the same block,
/// regardless of whether one of them is type-erased.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockKey(usize);

impl BlockKey {
    /// Returns the key of the block behind `handle`.
    #[must_use]
    pub fn of<T: ?Sized>(handle: &Rc<RefCell<T>>) -> Self {
        Self(Rc::as_ptr(handle).cast::<()>() as usize)
    }
}

/// Maps block instances to their assigned IDs.
pub trait IdResolver {
    fn resolve(&self, key: BlockKey) -> Option<BlockId>;
}

impl IdResolver for HashMap<BlockKey, BlockId> {
    fn resolve(&self, key: BlockKey) -> Option<BlockId> {
        self.get(&key).copied()
    }
}

/// A non-owning reference from one block to another.
///
/// Links hold a weak pointer, so blocks may reference each other in cycles
/// without keeping each other alive. The target's ID is looked up when the
/// referencing block is encoded, which lets a link be created before the
/// target is registered.
#[derive(Clone)]
pub struct BlockLink {
    key: BlockKey,
    target: Weak<RefCell<dyn Block>>,
}

impl BlockLink {
    /// Creates a link to a concrete block.
    pub fn to<T: Block + 'static>(block: &Shared<T>) -> Self {
        let handle: BlockHandle = block.clone();
        Self::from_handle(&handle)
    }

    /// Creates a link to a type-erased block.
    #[must_use]
    pub fn from_handle(handle: &BlockHandle) -> Self {
        Self {
            key: BlockKey::of(handle),
            target: Rc::downgrade(handle),
        }
    }

    #[must_use]
    pub const fn key(&self) -> BlockKey {
        self.key
    }

    /// Returns `true` while the target block is still alive.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.target.strong_count() > 0
    }

    /// Resolves the target's ID.
    pub fn resolve(&self, resolver: &dyn IdResolver) -> BlockResult<BlockId> {
        if !self.is_alive() {
            return Err(BlockError::DanglingReference);
        }
        resolver
            .resolve(self.key)
            .ok_or(BlockError::UnregisteredReference)
    }
}

impl PartialEq for BlockLink {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl fmt::Debug for BlockLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockLink")
            .field("key", &self.key)
            .field("alive", &self.is_alive())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::Container;

    #[test]
    fn key_is_shared_by_erased_handle() {
        let block = share(Container::unnamed());
        let erased: BlockHandle = block.clone();
        assert_eq!(BlockKey::of(&block), BlockKey::of(&erased));
    }

    #[test]
    fn distinct_blocks_have_distinct_keys() {
        let a = share(Container::unnamed());
        let b = share(Container::unnamed());
        assert_ne!(BlockKey::of(&a), BlockKey::of(&b));
    }

    #[test]
    fn link_resolves_through_map() {
        let block = share(Container::unnamed());
        let link = BlockLink::to(&block);
        let mut ids = HashMap::new();
        ids.insert(BlockKey::of(&block), BlockId::new(5));
        assert_eq!(link.resolve(&ids).unwrap(), BlockId::new(5));
    }

    #[test]
    fn link_to_unregistered_block() {
        let block = share(Container::unnamed());
        let link = BlockLink::to(&block);
        let ids: HashMap<BlockKey, BlockId> = HashMap::new();
        assert_eq!(
            link.resolve(&ids).unwrap_err(),
            BlockError::UnregisteredReference
        );
    }

    #[test]
    fn link_to_dropped_block() {
        let block = share(Container::unnamed());
        let link = BlockLink::to(&block);
        let mut ids = HashMap::new();
        ids.insert(BlockKey::of(&block), BlockId::new(1));
        drop(block);
        assert!(!link.is_alive());
        assert_eq!(link.resolve(&ids).unwrap_err(), BlockError::DanglingReference);
    }

    #[test]
    fn link_does_not_keep_target_alive() {
        let block = share(Container::unnamed());
        let _link = BlockLink::to(&block);
        assert_eq!(Rc::strong_count(&block), 1);
    }
}

//! Block registry, two-pass writer and reader for the awd container.
//!
//! A file is a 12-byte header followed by blocks in ID order. Each block is a
//! 10-byte header (`id`, `type`, `flags`, `body_len`) and its body. Blocks
//! are registered with a [`BlockRegistry`], which assigns IDs, and written by
//! a [`Writer`], which computes every body length before emitting anything.
//!
//! # Design Principles
//!
//! - **Identity, not equality** - Registration and references key on the
//!   block instance; two equal-looking blocks are still two blocks.
//! - **All or nothing** - A run either produces a complete file or an error
//!   naming the block that failed.
//! - **Bounded reading** - Every length in a file is checked against
//!   [`Limits`] before it is trusted.
//!
//! # Example
//!
//! ```
//! use awd::{read_file, BlockRegistry, Limits, WriteOptions, Writer};
//! use block::{share, BlockLink, Container, UvAnimation, IDENTITY};
//!
//! let mut registry = BlockRegistry::new();
//! let root = share(Container::new("root").unwrap());
//! let water = share(UvAnimation::new("UVANIM_water", 2).unwrap());
//! water.borrow_mut().append_frame(&IDENTITY).unwrap();
//! water.borrow_mut().append_frame(&IDENTITY).unwrap();
//! let child = share(Container::new("child").unwrap());
//! child.borrow_mut().set_parent(Some(BlockLink::to(&root))).unwrap();
//!
//! registry.register(&root).unwrap();
//! registry.register(&water).unwrap();
//! registry.register(&child).unwrap();
//!
//! let bytes = Writer::new(WriteOptions::default()).encode(&registry).unwrap();
//! let file = read_file(&bytes, &Limits::default()).unwrap();
//! assert_eq!(file.blocks.len(), 3);
//! assert_eq!(file.blocks[2].name(), Some("child"));
//! ```

mod error;
mod header;
mod limits;
mod options;
mod reader;
mod registry;
mod writer;

pub use error::{AwdError, AwdResult, LimitKind};
pub use header::{
    FileFlags, FileHeader, COMPRESSION_NONE, FILE_HEADER_SIZE, MAGIC, VERSION_MAJOR, VERSION_MINOR,
};
pub use limits::Limits;
pub use options::{Compression, WriteOptions};
pub use reader::{read_file, read_file_with_codec, read_frames, AwdFile, BlockFrame, DecodedBlock};
pub use registry::{BlockRegistry, FIRST_BLOCK_ID};
pub use writer::Writer;

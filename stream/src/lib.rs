//! Byte-level primitives for the awd block container.
//!
//! This crate provides the [`ByteSink`] trait with its two implementations,
//! [`ByteWriter`] (stores bytes) and [`LengthCounter`] (only counts them),
//! the bounded [`ByteReader`], and the [`Codec`] compression capability.
//!
//! # Design Principles
//!
//! - **No unsafe code** - Safety is paramount.
//! - **One code path for length and bytes** - Anything that can be written to a
//!   [`ByteWriter`] can be measured by running it against a [`LengthCounter`].
//! - **No domain knowledge** - This crate knows nothing about blocks or scenes.
//! - **Explicit errors** - All decode failures return structured errors, never panic.
//!
//! # Example
//!
//! ```
//! use stream::{ByteReader, ByteSink, ByteWriter, FloatWidth, LengthCounter};
//!
//! let mut writer = ByteWriter::new();
//! writer.write_u16(7);
//! writer.write_float(0.5, FloatWidth::Double);
//!
//! let mut counter = LengthCounter::new();
//! counter.write_u16(7);
//! counter.write_float(0.5, FloatWidth::Double);
//! assert_eq!(counter.len(), writer.bytes_written());
//!
//! let bytes = writer.finish();
//! let mut reader = ByteReader::new(&bytes);
//! assert_eq!(reader.read_u16().unwrap(), 7);
//! assert_eq!(reader.read_float(FloatWidth::Double).unwrap(), 0.5);
//! ```

mod codec;
mod error;
mod reader;
mod writer;

pub use codec::{Codec, Deflate};
pub use error::{StreamError, StreamResult};
pub use reader::ByteReader;
pub use writer::{ByteSink, ByteWriter, FloatWidth, LengthCounter};

//! Per-run encoding configuration.

use stream::{Codec, FloatWidth};

use crate::header::BlockFlags;
use crate::link::IdResolver;

/// The two per-run flags every block is encoded under.
///
/// A run applies the same configuration to every block; the length pass and
/// the emit pass must see identical values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BodyConfig {
    /// Encode floating point fields as 64-bit.
    pub wide_floats: bool,
    /// Pass the body through the run's codec.
    pub compressed: bool,
}

impl BodyConfig {
    #[must_use]
    pub const fn new(wide_floats: bool, compressed: bool) -> Self {
        Self {
            wide_floats,
            compressed,
        }
    }

    #[must_use]
    pub const fn float_width(self) -> FloatWidth {
        FloatWidth::from_wide(self.wide_floats)
    }

    /// Flag bits contributed by the configuration.
    #[must_use]
    pub const fn flags(self) -> BlockFlags {
        BlockFlags::from_raw(0)
            .with(BlockFlags::WIDE_FLOATS, self.wide_floats)
            .with(BlockFlags::COMPRESSED, self.compressed)
    }
}

/// Everything a block needs to compute its length or write its body.
#[derive(Clone, Copy)]
pub struct EncodeContext<'a> {
    pub config: BodyConfig,
    pub resolver: &'a dyn IdResolver,
    pub codec: Option<&'a dyn Codec>,
}

impl<'a> EncodeContext<'a> {
    #[must_use]
    pub fn new(config: BodyConfig, resolver: &'a dyn IdResolver) -> Self {
        Self {
            config,
            resolver,
            codec: None,
        }
    }

    #[must_use]
    pub fn with_codec(mut self, codec: &'a dyn Codec) -> Self {
        self.codec = Some(codec);
        self
    }

    #[must_use]
    pub const fn float_width(&self) -> FloatWidth {
        self.config.float_width()
    }
}

//! Writer configuration.

use stream::{Codec, Deflate};

/// Compression applied to block bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum Compression {
    #[default]
    None,
    /// Raw deflate at `level` (0-9).
    Deflate { level: u32 },
}

impl Compression {
    /// Returns the built-in codec for this setting.
    #[must_use]
    pub fn codec(self) -> Option<Box<dyn Codec>> {
        match self {
            Self::None => None,
            Self::Deflate { level } => Some(Box::new(Deflate::new(level))),
        }
    }
}

/// Per-run writer options.
///
/// Both settings apply uniformly to every block in the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WriteOptions {
    /// Encode floating point fields as 64-bit.
    pub wide_floats: bool,
    pub compression: Compression,
}

impl WriteOptions {
    #[must_use]
    pub const fn new(wide_floats: bool, compression: Compression) -> Self {
        Self {
            wide_floats,
            compression,
        }
    }

    /// Options for 64-bit floats with default deflate compression.
    #[must_use]
    pub const fn wide_deflate() -> Self {
        Self::new(true, Compression::Deflate { level: 6 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_narrow_uncompressed() {
        let options = WriteOptions::default();
        assert!(!options.wide_floats);
        assert_eq!(options.compression, Compression::None);
        assert!(options.compression.codec().is_none());
    }

    #[test]
    fn deflate_has_a_codec() {
        let codec = Compression::Deflate { level: 3 }.codec().unwrap();
        assert_eq!(codec.id(), Deflate::ID);
        assert!(Compression::None.codec().is_none());
    }

    #[test]
    fn wide_deflate_uses_default_level() {
        let options = WriteOptions::wide_deflate();
        assert!(options.wide_floats);
        assert_eq!(options.compression, Compression::Deflate { level: 6 });
    }

    #[cfg(feature = "serde")]
    #[test]
    fn options_from_json() {
        let options: WriteOptions = serde_json::from_str(
            r#"{"wide_floats": true, "compression": {"kind": "deflate", "level": 9}}"#,
        )
        .unwrap();
        assert_eq!(options, WriteOptions::new(true, Compression::Deflate { level: 9 }));

        let defaults: WriteOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(defaults, WriteOptions::default());
    }
}

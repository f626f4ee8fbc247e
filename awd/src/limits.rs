//! Bounds applied while reading untrusted files.

/// Ceilings on what a reader will accept from one file.
///
/// `max_file_bytes` and `max_blocks` are checked against the header and the
/// block frames before any body is decoded. `max_body_len` bounds a block
/// body both as stored and after inflation; inflation stops as soon as it is
/// crossed, so a small compressed body cannot expand without bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    pub max_file_bytes: usize,
    pub max_blocks: usize,
    pub max_body_len: usize,
}

impl Limits {
    /// Small ceilings for unit tests and fuzzing.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            max_file_bytes: 64 * 1024,
            max_blocks: 64,
            max_body_len: 16 * 1024,
        }
    }

    /// No ceilings. Only for trusted input.
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_file_bytes: usize::MAX,
            max_blocks: usize::MAX,
            max_body_len: usize::MAX,
        }
    }
}

impl Default for Limits {
    /// Room for a full scene: a 65535-frame wide UV animation body is about
    /// 8 MiB, so each body gets 16 MiB and the file 256 MiB.
    fn default() -> Self {
        Self {
            max_file_bytes: 256 * 1024 * 1024,
            max_blocks: 1 << 20,
            max_body_len: 16 * 1024 * 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use block::UvAnimation;
    use stream::FloatWidth;

    #[test]
    fn default_holds_widest_uv_animation() {
        let widest = UvAnimation::payload_len(u16::MAX, FloatWidth::Double);
        assert!(Limits::default().max_body_len >= widest);
    }

    #[test]
    fn testing_ceilings_sit_below_defaults() {
        let small = Limits::for_testing();
        let full = Limits::default();
        assert!(small.max_file_bytes < full.max_file_bytes);
        assert!(small.max_blocks < full.max_blocks);
        assert!(small.max_body_len < full.max_body_len);
    }

    #[test]
    fn unlimited_accepts_any_body() {
        assert_eq!(Limits::unlimited().max_body_len, usize::MAX);
    }
}

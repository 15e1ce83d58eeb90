//! Layout constants for a packed sequence unit.
//!
//! ```text
//! offset   size               field
//! 0        4                  signature, "SEQ\x01"
//! 4        1                  version
//! 5        4                  metadata length M (u32, little-endian)
//! 9        M                  metadata: the header line, marker included
//! 9+M      1                  strand type (1 = DNA, 2 = RNA)
//! 10+M     8                  base count N (u64, little-endian)
//! 18+M     ceil(N * 2 / 8)    packed bases, 4 per byte, first base in the high bits
//! ```

use crate::error::{CodecError, Result};

pub const SIGNATURE: [u8; 4] = *b"SEQ\x01";
pub const VERSION: u8 = 0x01;
/// Number of bases per line when a unit is decoded back to FASTA.
pub const LINE_WIDTH: usize = 60;

pub const BITS_PER_BASE: usize = 2;
pub const BASES_PER_BYTE: usize = 8 / BITS_PER_BASE;

/// The values which define the on-disk format, passed to both the writer and the reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatOptions {
    pub signature: [u8; 4],
    pub version: u8,
    pub line_width: usize,
    /// Reject units whose version byte differs from `version`
    pub strict_version: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            signature: SIGNATURE,
            version: VERSION,
            line_width: LINE_WIDTH,
            strict_version: false,
        }
    }
}

impl FormatOptions {
    pub fn check_version(&self, found: u8) -> Result<()> {
        if self.strict_version && found != self.version {
            return Err(CodecError::UnsupportedVersion {
                expected: self.version,
                found,
            });
        }
        Ok(())
    }
}

/// Number of bytes needed to hold `n_bases` packed bases. Defined for every `u64`, including
/// counts read from a corrupt unit.
pub fn packed_len(n_bases: u64) -> u64 {
    n_bases.div_ceil(BASES_PER_BYTE as u64)
}

/// Total size of a unit on disk, saturating at `u64::MAX`.
pub fn unit_len(metadata_len: usize, n_bases: u64) -> u64 {
    (18 + metadata_len as u64).saturating_add(packed_len(n_bases))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packing_size_law() {
        assert_eq!(packed_len(0), 0);
        assert_eq!(packed_len(1), 1);
        assert_eq!(packed_len(4), 1);
        assert_eq!(packed_len(5), 2);
        assert_eq!(packed_len(9), 3);
        assert_eq!(packed_len(60), 15);
        assert_eq!(packed_len(61), 16);
    }

    #[test]
    fn packed_len_never_overflows() {
        assert_eq!(packed_len(u64::MAX), u64::MAX / 4 + 1);
        assert_eq!(packed_len(u64::MAX - 3), u64::MAX / 4);
        assert_eq!(unit_len(10, u64::MAX), u64::MAX);
    }

    #[test]
    fn version_check_is_opt_in() {
        let lenient = FormatOptions::default();
        assert!(lenient.check_version(7).is_ok());

        let strict = FormatOptions {
            strict_version: true,
            ..FormatOptions::default()
        };
        assert!(strict.check_version(VERSION).is_ok());
        assert!(matches!(
            strict.check_version(2),
            Err(CodecError::UnsupportedVersion { expected: 1, found: 2 })
        ));
    }
}

use std::io::Write;

use byteorder::{LittleEndian, WriteBytesExt};

use super::format::{packed_len, unit_len, FormatOptions, BITS_PER_BASE};
use crate::error::{CodecError, Result};
use crate::seq::{SequenceRecord, Symbol};

/// Packs symbols 4 to a byte, first symbol in the most significant bits.
///
/// 1. Create a packer with `BasePacker::with_capacity`.
/// 2. Add symbols with `push` or `extend`.
/// 3. Call `finalize` to zero-pad the last byte and take the packed bytes.
pub struct BasePacker {
    packed: Vec<u8>,
    buffer: u8,      // bits not yet flushed to `packed`
    buffer_bits: usize,
}

impl BasePacker {
    pub fn with_capacity(n_bases: usize) -> Self {
        Self {
            packed: Vec::with_capacity(packed_len(n_bases as u64) as usize),
            buffer: 0,
            buffer_bits: 0,
        }
    }

    #[inline(always)]
    pub fn push(&mut self, symbol: Symbol) {
        self.buffer = (self.buffer << BITS_PER_BASE) | symbol.code();
        self.buffer_bits += BITS_PER_BASE;

        if self.buffer_bits == 8 {
            self.packed.push(self.buffer);
            self.buffer = 0;
            self.buffer_bits = 0;
        }
    }

    pub fn extend<'a>(&mut self, symbols: impl IntoIterator<Item = &'a Symbol>) {
        symbols.into_iter().for_each(|s| self.push(*s));
    }

    pub fn finalize(mut self) -> Vec<u8> {
        if self.buffer_bits > 0 {
            self.packed.push(self.buffer << (8 - self.buffer_bits));
        }
        self.packed
    }
}

/// Packs a slice of symbols in one go.
pub fn pack_bases(bases: &[Symbol]) -> Vec<u8> {
    let mut packer = BasePacker::with_capacity(bases.len());
    packer.extend(bases);
    packer.finalize()
}

/// Serializes normalized records into binary units.
pub struct UnitWriter {
    options: FormatOptions,
}

impl UnitWriter {
    pub fn new(options: FormatOptions) -> Self {
        Self { options }
    }

    /// Writes one complete unit for `record`, returning the number of bytes written.
    ///
    /// # Errors
    ///
    /// * `CodecError::MetadataTooLong` if the header does not fit in a 32-bit length.
    /// * `CodecError::Io` if the writer fails. The output may then hold a partial unit.
    pub fn write_record(&self, writer: &mut impl Write, record: &SequenceRecord) -> Result<u64> {
        let metadata_len = u32::try_from(record.header.len())
            .map_err(|_| CodecError::MetadataTooLong(record.header.len()))?;
        let n_bases = record.bases.len() as u64;

        writer.write_all(&self.options.signature)?;
        writer.write_u8(self.options.version)?;

        writer.write_u32::<LittleEndian>(metadata_len)?;
        writer.write_all(&record.header)?;

        writer.write_u8(record.strand.to_byte())?;
        writer.write_u64::<LittleEndian>(n_bases)?;

        writer.write_all(&pack_bases(&record.bases))?;

        Ok(unit_len(record.header.len(), n_bases))
    }
}

impl Default for UnitWriter {
    fn default() -> Self {
        Self::new(FormatOptions::default())
    }
}

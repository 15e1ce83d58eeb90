use std::io::{Read, Write};

use byteorder::{LittleEndian, ReadBytesExt};

use super::format::{packed_len, FormatOptions, BASES_PER_BYTE, BITS_PER_BASE};
use crate::error::{CodecError, Result};
use crate::seq::{decode_symbol, StrandType, Symbol};

const READ_CHUNK: usize = 64 * 1024;
// upper bound on the line buffer reserved up front; wider lines grow on demand
const MAX_LINE_RESERVE: usize = 4096;

/// Everything in a unit that precedes the packed bases.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitHeader {
    pub version: u8,
    /// The original header line, marker included
    pub metadata: Vec<u8>,
    pub strand: StrandType,
    pub base_count: u64,
}

impl UnitHeader {
    pub fn packed_len(&self) -> u64 {
        packed_len(self.base_count)
    }
}

/// A fully-read unit.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryUnit {
    pub header: UnitHeader,
    pub packed: Vec<u8>,
}

impl BinaryUnit {
    /// Iterates over the bases in order, stopping after `base_count` symbols so that the
    /// padding in the last byte is never yielded.
    pub fn symbols(&self) -> impl Iterator<Item = Symbol> + '_ {
        unpack(&self.packed).take(self.header.base_count as usize)
    }

    /// Renders the bases as text using the unit's strand.
    pub fn to_ascii(&self) -> Vec<u8> {
        self.symbols()
            .map(|s| decode_symbol(s, self.header.strand) as u8)
            .collect()
    }

    /// Writes the metadata line followed by the bases, wrapped at `line_width`.
    pub fn write_fasta(&self, output: &mut impl Write, line_width: usize) -> Result<()> {
        output.write_all(&self.header.metadata)?;
        output.write_all(b"\n")?;

        let mut wrapped = WrappedWriter::new(output, line_width);
        for symbol in self.symbols() {
            wrapped.push(decode_symbol(symbol, self.header.strand) as u8)?;
        }
        wrapped.finish()?;
        Ok(())
    }
}

/// Unpacks bytes into symbols, 4 per byte, most significant bits first.
pub fn unpack(packed: &[u8]) -> impl Iterator<Item = Symbol> + '_ {
    packed.iter().flat_map(|byte| {
        (0..BASES_PER_BYTE)
            .rev()
            .map(move |i| Symbol::from_code(byte >> (i * BITS_PER_BASE)))
    })
}

/// Emits text with a newline after every `width` characters, and after a final partial line.
/// A width of 0 disables wrapping.
pub struct WrappedWriter<W> {
    inner: W,
    width: usize,
    line: Vec<u8>,
}

impl<W: Write> WrappedWriter<W> {
    pub fn new(inner: W, width: usize) -> Self {
        Self {
            inner,
            width,
            line: Vec::with_capacity(width.min(MAX_LINE_RESERVE).saturating_add(1)),
        }
    }

    #[inline(always)]
    pub fn push(&mut self, c: u8) -> std::io::Result<()> {
        self.line.push(c);
        if self.line.len() == self.width {
            self.flush_line()?;
        }
        Ok(())
    }

    fn flush_line(&mut self) -> std::io::Result<()> {
        self.line.push(b'\n');
        self.inner.write_all(&self.line)?;
        self.line.clear();
        Ok(())
    }

    /// Terminates a partial last line. Never produces an empty line.
    pub fn finish(mut self) -> std::io::Result<W> {
        if !self.line.is_empty() {
            self.flush_line()?;
        }
        Ok(self.inner)
    }
}

/// Parses binary units and turns them back into FASTA.
pub struct UnitReader {
    options: FormatOptions,
}

impl UnitReader {
    pub fn new(options: FormatOptions) -> Self {
        Self { options }
    }

    /// Reads and validates everything up to the packed bases.
    ///
    /// # Errors
    ///
    /// * `CodecError::BadSignature` if the first 4 bytes are not the expected signature.
    /// * `CodecError::UnsupportedVersion` if strict version checking is enabled and the version
    ///   differs.
    /// * `CodecError::InvalidStrandType` for a strand byte other than 1 or 2.
    /// * `CodecError::TruncatedInput` if the input ends inside a field.
    pub fn read_header(&self, input: &mut impl Read) -> Result<UnitHeader> {
        let mut signature = [0u8; 4];
        input
            .read_exact(&mut signature)
            .map_err(CodecError::truncated("signature"))?;
        if signature != self.options.signature {
            return Err(CodecError::BadSignature {
                expected: self.options.signature,
                found: signature,
            });
        }

        let version = input.read_u8().map_err(CodecError::truncated("version"))?;
        self.options.check_version(version)?;

        let metadata_len = input
            .read_u32::<LittleEndian>()
            .map_err(CodecError::truncated("metadata length"))?;
        let metadata = read_exactly(input, metadata_len as u64, "metadata")?;

        let strand = input
            .read_u8()
            .map_err(CodecError::truncated("strand type"))?;
        let strand = StrandType::from_byte(strand)?;

        let base_count = input
            .read_u64::<LittleEndian>()
            .map_err(CodecError::truncated("base count"))?;

        Ok(UnitHeader {
            version,
            metadata,
            strand,
            base_count,
        })
    }

    /// Reads one complete unit into memory.
    pub fn read_unit(&self, input: &mut impl Read) -> Result<BinaryUnit> {
        let header = self.read_header(input)?;
        let packed = read_exactly(input, header.packed_len(), "packed bases")?;
        Ok(BinaryUnit { header, packed })
    }

    /// Streams the packed bases following `header` from `input` and writes them to `output` as
    /// FASTA, without holding the whole sequence in memory.
    pub fn write_fasta(
        &self,
        header: &UnitHeader,
        input: &mut impl Read,
        output: &mut impl Write,
    ) -> Result<()> {
        output.write_all(&header.metadata)?;
        output.write_all(b"\n")?;

        let mut wrapped = WrappedWriter::new(output, self.options.line_width);
        let mut remaining_bytes = header.packed_len();
        let mut remaining_bases = header.base_count;
        let mut chunk = vec![0u8; READ_CHUNK];

        while remaining_bytes > 0 {
            let n = remaining_bytes.min(READ_CHUNK as u64) as usize;
            input
                .read_exact(&mut chunk[..n])
                .map_err(CodecError::truncated("packed bases"))?;

            let wanted = remaining_bases.min(usize::MAX as u64) as usize;
            for symbol in unpack(&chunk[..n]).take(wanted) {
                wrapped.push(decode_symbol(symbol, header.strand) as u8)?;
            }

            remaining_bases = remaining_bases.saturating_sub((n * BASES_PER_BYTE) as u64);
            remaining_bytes -= n as u64;
        }

        wrapped.finish()?;
        Ok(())
    }

    /// Decodes a whole unit from `input` into FASTA text on `output`.
    pub fn decode(&self, input: &mut impl Read, output: &mut impl Write) -> Result<UnitHeader> {
        let header = self.read_header(input)?;
        self.write_fasta(&header, input, output)?;
        Ok(header)
    }
}

impl Default for UnitReader {
    fn default() -> Self {
        Self::new(FormatOptions::default())
    }
}

/// Reads exactly `len` bytes without trusting `len` for the allocation up front.
fn read_exactly(input: &mut impl Read, len: u64, field: &'static str) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    input.by_ref().take(len).read_to_end(&mut buf)?;
    if (buf.len() as u64) < len {
        return Err(CodecError::TruncatedInput { field });
    }
    Ok(buf)
}

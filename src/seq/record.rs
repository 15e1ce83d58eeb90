use super::dna::{decode_symbol, StrandType, Symbol};
use super::normalize::DroppedSymbol;

/// A record as it comes out of the FASTA reader, before any validation of its bases.
#[derive(Debug, PartialEq, Clone)]
pub struct RawRecord {
    /// The first whitespace-delimited token of the header, without the leading `>`
    pub identifier: String,
    /// The full header line, marker included, line ending removed
    pub header: Vec<u8>,
    /// All sequence lines concatenated, line endings removed
    pub sequence: Vec<u8>,
    /// 1-based line number of the header in the input
    pub line: u64,
}

/// A record whose bases have been classified and normalized, ready for packing.
#[derive(Debug, PartialEq, Clone)]
pub struct SequenceRecord {
    pub identifier: String,
    pub header: Vec<u8>,
    pub bases: Vec<Symbol>,
    pub strand: StrandType,
    /// Characters which were removed during normalization. Only populated when the
    /// normalizer is asked to track them.
    pub dropped: Vec<DroppedSymbol>,
}

impl SequenceRecord {
    pub fn len(&self) -> usize {
        self.bases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }

    /// Renders the bases as text, using `U` for code `0b11` when the record is RNA.
    pub fn to_ascii(&self) -> Vec<u8> {
        self.bases
            .iter()
            .map(|s| decode_symbol(*s, self.strand) as u8)
            .collect()
    }
}

impl std::fmt::Display for SequenceRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = String::from_utf8_lossy(&self.to_ascii()).into_owned();
        write!(f, "{}", s)
    }
}

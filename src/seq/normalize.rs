use serde::{Serialize, Serializer};

use super::dna::{encode_symbol, StrandType, Symbol};
use super::record::{RawRecord, SequenceRecord};
use crate::error::{CodecError, Result};

/// What to do with characters that are not one of A, C, G, T or U.
#[derive(clap::ValueEnum, Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum SymbolPolicy {
    /// Silently remove them (IUPAC ambiguity codes, gaps, stray punctuation)
    #[default]
    Drop,

    /// Reject the record. Whitespace is still ignored.
    Strict,

    /// Remove them, but keep a note of each character and its position
    Track,
}

/// A byte removed from a sequence during normalization.
#[derive(Serialize, Debug, PartialEq, Eq, Clone, Copy)]
pub struct DroppedSymbol {
    /// 0-based byte offset into the concatenated sequence text
    pub position: usize,
    /// Serialized as text, with bytes outside printable ASCII written as `\xNN`
    #[serde(serialize_with = "escaped_byte")]
    pub symbol: u8,
}

fn escaped_byte<S: Serializer>(byte: &u8, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(&byte.escape_ascii())
}

/// The result of normalizing a raw sequence.
#[derive(Debug, Default, PartialEq)]
pub struct NormalizedBases {
    pub bases: Vec<Symbol>,
    pub dropped: Vec<DroppedSymbol>,
}

/// A sequence is RNA if it contains at least one `U`, in either case.
pub fn classify_strand(sequence: &[u8]) -> StrandType {
    if sequence.iter().any(|b| b.eq_ignore_ascii_case(&b'U')) {
        StrandType::Rna
    } else {
        StrandType::Dna
    }
}

/// Uppercases the sequence and keeps only the canonical bases. `U` is stored as `T`; the strand
/// is recorded separately.
///
/// # Errors
///
/// With `SymbolPolicy::Strict`, returns `CodecError::InvalidSymbol` for the first character which
/// is neither a base nor ASCII whitespace.
pub fn normalize_bases(sequence: &[u8], policy: SymbolPolicy) -> Result<NormalizedBases> {
    let mut normalized = NormalizedBases {
        bases: Vec::with_capacity(sequence.len()),
        dropped: Vec::new(),
    };

    for (position, raw) in sequence.iter().enumerate() {
        let base = raw.to_ascii_uppercase();
        match encode_symbol(base, position) {
            Ok(symbol) => normalized.bases.push(symbol),
            Err(e) => match policy {
                SymbolPolicy::Drop => (),
                SymbolPolicy::Strict if raw.is_ascii_whitespace() => (),
                SymbolPolicy::Strict => return Err(e),
                SymbolPolicy::Track => normalized.dropped.push(DroppedSymbol {
                    position,
                    symbol: *raw,
                }),
            },
        }
    }

    Ok(normalized)
}

/// Extracts the identifier from a header line: its first whitespace-delimited token, with the
/// leading `>` removed. A header without whitespace gives the whole line.
pub fn identifier_from_header(header: &[u8]) -> String {
    let header = header.strip_prefix(b">").unwrap_or(header);
    let end = header
        .iter()
        .position(|b| *b == b' ' || *b == b'\t')
        .unwrap_or(header.len());
    String::from_utf8_lossy(&header[..end]).into_owned()
}

/// Classifies and normalizes a raw record.
///
/// # Errors
///
/// * `CodecError::EmptyIdentifier` if the header does not name the record.
/// * `CodecError::InvalidSymbol` under `SymbolPolicy::Strict`.
pub fn normalize_record(raw: RawRecord, policy: SymbolPolicy) -> Result<SequenceRecord> {
    if raw.identifier.is_empty() {
        return Err(CodecError::EmptyIdentifier { line: raw.line });
    }

    // decided on the original text, before U is folded into T
    let strand = classify_strand(&raw.sequence);
    let NormalizedBases { bases, dropped } = normalize_bases(&raw.sequence, policy)?;

    Ok(SequenceRecord {
        identifier: raw.identifier,
        header: raw.header,
        bases,
        strand,
        dropped,
    })
}

use serde::Serialize;

use crate::error::{CodecError, Result};

const DNA_LOOKUP: [char; 4] = ['A', 'C', 'G', 'T'];
const RNA_LOOKUP: [char; 4] = ['A', 'C', 'G', 'U'];

/// One nucleotide in its canonical 2-bit form. `T` also stands in for `U`; which of the two is
/// printed is decided by the record's [`StrandType`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[repr(u8)]
pub enum Symbol {
    A = 0b00,
    C = 0b01,
    G = 0b10,
    T = 0b11,
}

impl Symbol {
    #[inline(always)]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Builds a symbol from the low two bits of `bits`. Higher bits are ignored, so every input
    /// maps to a valid symbol.
    #[inline(always)]
    pub fn from_code(bits: u8) -> Self {
        match bits & 0b11 {
            0b00 => Symbol::A,
            0b01 => Symbol::C,
            0b10 => Symbol::G,
            _ => Symbol::T,
        }
    }
}

/// Whether a record is DNA or RNA. Only affects how code `0b11` is rendered as text.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StrandType {
    Dna,
    Rna,
}

impl StrandType {
    pub fn to_byte(self) -> u8 {
        match self {
            StrandType::Dna => 1,
            StrandType::Rna => 2,
        }
    }

    pub fn from_byte(b: u8) -> Result<Self> {
        match b {
            1 => Ok(StrandType::Dna),
            2 => Ok(StrandType::Rna),
            other => Err(CodecError::InvalidStrandType(other)),
        }
    }
}

impl std::fmt::Display for StrandType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StrandType::Dna => f.write_str("DNA"),
            StrandType::Rna => f.write_str("RNA"),
        }
    }
}

/// Converts an uppercase base to its symbol. The caller is responsible for uppercasing.
///
/// `position` is only used to describe the failure.
#[inline(always)]
pub fn encode_symbol(base: u8, position: usize) -> Result<Symbol> {
    match base {
        b'A' => Ok(Symbol::A),
        b'C' => Ok(Symbol::C),
        b'G' => Ok(Symbol::G),
        b'T' | b'U' => Ok(Symbol::T),
        _ => Err(CodecError::InvalidSymbol {
            symbol: base,
            position,
        }),
    }
}

#[inline(always)]
pub fn decode_symbol(symbol: Symbol, strand: StrandType) -> char {
    match strand {
        StrandType::Dna => DNA_LOOKUP[symbol.code() as usize],
        StrandType::Rna => RNA_LOOKUP[symbol.code() as usize],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_canonical_bases() {
        let codes: Vec<u8> = b"ACGTU"
            .iter()
            .enumerate()
            .map(|(i, b)| encode_symbol(*b, i).unwrap().code())
            .collect();
        assert_eq!(codes, vec![0, 1, 2, 3, 3]);
    }

    #[test]
    fn encode_rejects_lowercase_and_ambiguity_codes() {
        for (i, b) in b"aNRY-".iter().enumerate() {
            match encode_symbol(*b, i) {
                Err(CodecError::InvalidSymbol { symbol, position }) => {
                    assert_eq!(symbol, *b);
                    assert_eq!(position, i);
                }
                other => panic!("expected InvalidSymbol, got {:?}", other),
            }
        }
    }

    #[test]
    fn non_ascii_bytes_are_escaped() {
        let err = encode_symbol(0xc3, 12).unwrap_err();
        assert_eq!(err.to_string(), "invalid base '\\xc3' at position 12");
    }

    #[test]
    fn decode_depends_on_strand() {
        assert_eq!(decode_symbol(Symbol::T, StrandType::Dna), 'T');
        assert_eq!(decode_symbol(Symbol::T, StrandType::Rna), 'U');
        assert_eq!(decode_symbol(Symbol::G, StrandType::Rna), 'G');
    }

    #[test]
    fn from_code_masks_high_bits() {
        assert_eq!(Symbol::from_code(0b1110), Symbol::G);
        assert_eq!(Symbol::from_code(0xff), Symbol::T);
    }

    #[test]
    fn strand_byte() {
        assert_eq!(StrandType::from_byte(1).unwrap(), StrandType::Dna);
        assert_eq!(StrandType::from_byte(2).unwrap(), StrandType::Rna);
        assert!(matches!(
            StrandType::from_byte(3),
            Err(CodecError::InvalidStrandType(3))
        ));
        assert_eq!(StrandType::Rna.to_byte(), 2);
    }
}

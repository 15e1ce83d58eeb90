pub mod dna;
pub mod normalize;
pub mod record;

pub use self::dna::{decode_symbol, encode_symbol, StrandType, Symbol};
pub use self::normalize::{
    classify_strand, identifier_from_header, normalize_bases, normalize_record, DroppedSymbol,
    NormalizedBases, SymbolPolicy,
};
pub use self::record::{RawRecord, SequenceRecord};

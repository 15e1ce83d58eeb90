pub mod bytes;
pub mod fasta;

pub use self::fasta::{FastaReader, RECORD_MARKER};

//! Converts FASTA records to and from `.seq` units, a per-record binary format which stores each
//! nucleotide in 2 bits.
//!
//! Encoding runs `reader` (FASTA text to raw records), then `seq` (strand detection and base
//! normalization), then `unit::writer`. Decoding is `unit::reader`, which reproduces the header
//! line and writes the bases back out wrapped at a fixed width.

#[macro_use]
extern crate log;

pub mod error;
pub mod io;
pub mod reader;
pub mod seq;
pub mod unit;

pub use error::{CodecError, Result};

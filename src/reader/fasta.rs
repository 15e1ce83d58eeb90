use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::bytes::LineReader;
use crate::error::Result;
use crate::seq::{identifier_from_header, RawRecord};

pub const RECORD_MARKER: u8 = b'>';

/// Streams records out of FASTA text, one at a time and in file order.
///
/// Sequence lines may be wrapped at any width and use any line ending. Text before the first
/// header is discarded. A record is only yielded once the next header, or the end of the input,
/// has been seen.
pub struct FastaReader<R> {
    lines: LineReader<R>,
    buf: Vec<u8>,
    current: Option<RawRecord>,
    line: u64,
    eof: bool,
}

impl FastaReader<BufReader<File>> {
    pub fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> FastaReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: LineReader::new(reader),
            buf: Vec::with_capacity(128),
            current: None,
            line: 0,
            eof: false,
        }
    }
}

impl<R: BufRead> Iterator for FastaReader<R> {
    type Item = Result<RawRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.eof {
                return None;
            }

            self.buf.clear();
            match self.lines.read_line(&mut self.buf) {
                Ok(true) => self.line += 1,
                Ok(false) => {
                    // end of input: flush whatever record is still open
                    self.eof = true;
                    return self.current.take().map(Ok);
                }
                Err(e) => {
                    self.eof = true;
                    return Some(Err(e.into()));
                }
            }

            if self.buf.first() == Some(&RECORD_MARKER) {
                let header = self.buf.clone();
                let next = RawRecord {
                    identifier: identifier_from_header(&header),
                    header,
                    sequence: Vec::new(),
                    line: self.line,
                };

                if let Some(finished) = self.current.replace(next) {
                    return Some(Ok(finished));
                }
            } else if let Some(rec) = self.current.as_mut() {
                rec.sequence.extend_from_slice(&self.buf);
            }
        }
    }
}

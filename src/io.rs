use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tempfile::NamedTempFile;

use crate::error::CodecError;
use crate::reader::FastaReader;
use crate::seq::{normalize_record, DroppedSymbol, RawRecord, StrandType, SymbolPolicy};
use crate::unit::{FormatOptions, UnitHeader, UnitReader, UnitWriter};

pub const UNIT_EXTENSION: &str = "seq";

/// What to do when a single record cannot be encoded.
#[derive(clap::ValueEnum, Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum OnError {
    /// Stop at the first failing record
    #[default]
    Abort,

    /// Log the failure and carry on with the next record
    Skip,
}

#[derive(Debug, Clone)]
pub struct EncodeOptions {
    pub format: FormatOptions,
    pub symbols: SymbolPolicy,
    pub on_error: OnError,
    /// Directory which receives one `<identifier>.seq` file per record
    pub out_dir: PathBuf,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            format: FormatOptions::default(),
            symbols: SymbolPolicy::default(),
            on_error: OnError::default(),
            out_dir: PathBuf::from("."),
        }
    }
}

#[derive(Serialize, Debug)]
pub struct EncodedRecord {
    pub identifier: String,
    pub path: PathBuf,
    pub strand: StrandType,
    pub bases: usize,
    pub bytes: u64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dropped: Vec<DroppedSymbol>,
}

#[derive(Serialize, Debug)]
pub struct SkippedRecord {
    pub identifier: String,
    pub line: u64,
    pub reason: String,
}

/// Everything that happened while encoding one FASTA file.
#[derive(Serialize, Debug, Default)]
pub struct EncodeSummary {
    pub seqpack_version: String,
    pub input: String,
    pub records: Vec<EncodedRecord>,
    pub skipped: Vec<SkippedRecord>,
}

impl EncodeSummary {
    pub fn total_bases(&self) -> usize {
        self.records.iter().map(|r| r.bases).sum()
    }
}

/// Builds the output path of a record's unit. Path separators in the identifier are replaced so
/// that every unit lands directly inside `out_dir`.
pub fn unit_path(out_dir: &Path, identifier: &str) -> PathBuf {
    let name: String = identifier
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            c => c,
        })
        .collect();
    out_dir.join(format!("{name}.{UNIT_EXTENSION}"))
}

/// Writes to a temporary file next to `path`, and only moves it into place once `f` succeeds.
/// On any failure the temporary file is removed, so `path` is never left half-written.
fn write_atomically<T>(
    path: &Path,
    f: impl FnOnce(&mut BufWriter<&mut File>) -> Result<T>,
) -> Result<T> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Unable to create a temporary file in {}", dir.display()))?;

    let value = {
        let mut writer = BufWriter::new(temp.as_file_mut());
        let value = f(&mut writer)?;
        writer
            .flush()
            .with_context(|| format!("Unable to write {}", path.display()))?;
        value
    };

    temp.persist(path)
        .with_context(|| format!("Unable to create {}", path.display()))?;
    Ok(value)
}

/// Normalizes one record and writes its unit. Errors specific to the record are returned as
/// `Ok(Err(_))` so that the caller can apply its skip policy; anything else is fatal.
fn encode_record(
    raw: RawRecord,
    writer: &UnitWriter,
    opts: &EncodeOptions,
) -> Result<std::result::Result<EncodedRecord, CodecError>> {
    let record = match normalize_record(raw, opts.symbols) {
        Ok(r) => r,
        Err(e) => return Ok(Err(e)),
    };

    let path = unit_path(&opts.out_dir, &record.identifier);
    let written = write_atomically(&path, |out| Ok(writer.write_record(out, &record)?));

    let bytes = match written {
        Ok(n) => n,
        Err(e) => match e.downcast::<CodecError>() {
            Ok(CodecError::Io(e)) => {
                return Err(e).with_context(|| format!("Unable to write {}", path.display()))
            }
            Ok(e) => return Ok(Err(e)),
            Err(e) => return Err(e),
        },
    };

    debug!(
        "Wrote {} ({} {} bases, {} bytes)",
        path.display(),
        record.len(),
        record.strand,
        bytes
    );

    Ok(Ok(EncodedRecord {
        identifier: record.identifier,
        path,
        strand: record.strand,
        bases: record.bases.len(),
        bytes,
        dropped: record.dropped,
    }))
}

/// Encodes every record produced by `records`, in order, into its own unit under
/// `opts.out_dir`.
///
/// # Errors
///
/// Reading the input or writing an output always fails the whole batch. Record-level
/// failures (invalid symbols, empty identifiers) fail it only under `OnError::Abort`.
pub fn encode_records(
    records: impl Iterator<Item = crate::error::Result<RawRecord>>,
    opts: &EncodeOptions,
) -> Result<EncodeSummary> {
    let writer = UnitWriter::new(opts.format);
    let mut summary = EncodeSummary {
        seqpack_version: env!("CARGO_PKG_VERSION").to_string(),
        ..EncodeSummary::default()
    };
    let mut seen = HashSet::new();

    for raw in records {
        let raw = raw.context("Unable to read FASTA input")?;
        let (identifier, line) = (raw.identifier.clone(), raw.line);

        match encode_record(raw, &writer, opts)? {
            Ok(rec) => {
                if !rec.dropped.is_empty() {
                    let preview: Vec<String> = rec
                        .dropped
                        .iter()
                        .take(5)
                        .map(|d| format!("'{}'@{}", d.symbol.escape_ascii(), d.position))
                        .collect();
                    warn!(
                        "{}: dropped {} unsupported symbols ({}{})",
                        rec.identifier,
                        rec.dropped.len(),
                        preview.join(", "),
                        if rec.dropped.len() > 5 { ", ..." } else { "" }
                    );
                }
                if !seen.insert(rec.path.clone()) {
                    warn!(
                        "{} was already written by an earlier record and has been overwritten",
                        rec.path.display()
                    );
                }
                summary.records.push(rec);
            }
            Err(e) => match opts.on_error {
                OnError::Abort => {
                    return Err(e).with_context(|| {
                        format!("Unable to encode record `{identifier}` (line {line})")
                    })
                }
                OnError::Skip => {
                    warn!("Skipping record `{identifier}` (line {line}): {e}");
                    summary.skipped.push(SkippedRecord {
                        identifier,
                        line,
                        reason: e.to_string(),
                    });
                }
            },
        }
    }

    Ok(summary)
}

/// Reads `input` as FASTA and writes one unit per record.
pub fn encode_fasta(input: &Path, opts: &EncodeOptions) -> Result<EncodeSummary> {
    info!("Encoding {} into {}", input.display(), opts.out_dir.display());

    let reader = FastaReader::from_path(input)
        .with_context(|| format!("Unable to open FASTA file {}", input.display()))?;

    let mut summary = encode_records(reader, opts)?;
    summary.input = input.display().to_string();

    info!(
        "Wrote {} units ({} bases), skipped {} records",
        summary.records.len(),
        summary.total_bases(),
        summary.skipped.len()
    );
    Ok(summary)
}

/// Reads `input` as one unit and writes it to `output` as wrapped FASTA.
///
/// The unit's header is validated before `output` is touched, and `output` only appears once
/// the whole unit has been decoded.
pub fn decode_unit(input: &Path, output: &Path, format: &FormatOptions) -> Result<UnitHeader> {
    info!("Decoding {} into {}", input.display(), output.display());

    let file = File::open(input)
        .with_context(|| format!("Unable to open .seq file {}", input.display()))?;
    let mut reader = BufReader::new(file);
    let unit_reader = UnitReader::new(*format);

    let header = unit_reader
        .read_header(&mut reader)
        .with_context(|| format!("Unable to read {}", input.display()))?;

    debug!(
        "{}: version {}, {} {} bases",
        input.display(),
        header.version,
        header.base_count,
        header.strand
    );

    write_atomically(output, |out| {
        unit_reader
            .write_fasta(&header, &mut reader, out)
            .with_context(|| format!("Unable to decode {}", input.display()))
    })?;

    info!("Decoded {} bases", header.base_count);
    Ok(header)
}

/// Writes the summary as pretty JSON.
pub fn write_report(summary: &EncodeSummary, path: &Path) -> Result<()> {
    write_atomically(path, |out| {
        serde_json::to_writer_pretty(&mut *out, summary).context("Could not serialize report")?;
        writeln!(out)?;
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(dir: &Path, on_error: OnError, symbols: SymbolPolicy) -> EncodeOptions {
        EncodeOptions {
            out_dir: dir.to_path_buf(),
            on_error,
            symbols,
            ..EncodeOptions::default()
        }
    }

    fn records(input: &str) -> FastaReader<&[u8]> {
        FastaReader::new(input.as_bytes())
    }

    #[test]
    fn one_unit_per_record_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let opts = options(dir.path(), OnError::Abort, SymbolPolicy::Drop);
        let summary = encode_records(records(">a x\nACGT\n>b\nUUU\n>c\n"), &opts).unwrap();

        let ids: Vec<&str> = summary.records.iter().map(|r| r.identifier.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(summary.records[1].strand, StrandType::Rna);
        for id in ["a", "b", "c"] {
            assert!(dir.path().join(format!("{id}.seq")).exists());
        }
        assert_eq!(summary.total_bases(), 7);
    }

    #[test]
    fn strict_symbols_abort() {
        let dir = tempfile::tempdir().unwrap();
        let opts = options(dir.path(), OnError::Abort, SymbolPolicy::Strict);
        let err = encode_records(records(">a\nACGT\n>b\nACNT\n>c\nA\n"), &opts).unwrap_err();

        assert!(format!("{err:#}").contains("invalid base 'N' at position 2"));
        assert!(dir.path().join("a.seq").exists());
        assert!(!dir.path().join("b.seq").exists());
        assert!(!dir.path().join("c.seq").exists());
    }

    #[test]
    fn strict_symbols_skip() {
        let dir = tempfile::tempdir().unwrap();
        let opts = options(dir.path(), OnError::Skip, SymbolPolicy::Strict);
        let summary = encode_records(records(">a\nACGT\n>b\nACNT\n>\nA\n>c\nA\n"), &opts).unwrap();

        assert_eq!(summary.records.len(), 2);
        assert_eq!(summary.skipped.len(), 2);
        assert_eq!(summary.skipped[0].identifier, "b");
        assert_eq!(summary.skipped[1].line, 5);
        assert!(!dir.path().join("b.seq").exists());
        assert!(dir.path().join("c.seq").exists());
    }

    #[test]
    fn tracked_symbols_reach_the_summary() {
        let dir = tempfile::tempdir().unwrap();
        let opts = options(dir.path(), OnError::Abort, SymbolPolicy::Track);
        let summary = encode_records(records(">a\nANNT\n"), &opts).unwrap();
        assert_eq!(summary.records[0].bases, 2);
        assert_eq!(summary.records[0].dropped.len(), 2);
    }

    #[test]
    fn unit_paths_stay_in_out_dir() {
        let dir = Path::new("out");
        assert_eq!(unit_path(dir, "chr1"), Path::new("out/chr1.seq"));
        assert_eq!(unit_path(dir, "../etc/x"), Path::new("out/.._etc_x.seq"));
    }

    #[test]
    fn decode_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let opts = options(dir.path(), OnError::Abort, SymbolPolicy::Drop);
        encode_records(records(">r1 some text\nACGU\nacgu\nA\n"), &opts).unwrap();

        let out = dir.path().join("r1.fa");
        let header = decode_unit(&dir.path().join("r1.seq"), &out, &FormatOptions::default())
            .unwrap();
        assert_eq!(header.strand, StrandType::Rna);
        assert_eq!(
            std::fs::read_to_string(out).unwrap(),
            ">r1 some text\nACGUACGUA\n"
        );
    }

    #[test]
    fn bad_signature_leaves_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("bad.seq");
        std::fs::write(&input, b"NOPE\x01\x00\x00\x00\x00").unwrap();

        let out = dir.path().join("bad.fa");
        let err = decode_unit(&input, &out, &FormatOptions::default()).unwrap_err();
        assert!(matches!(
            err.root_cause().downcast_ref::<CodecError>(),
            Some(CodecError::BadSignature { .. })
        ));
        assert!(!out.exists());
    }

    #[test]
    fn truncated_unit_leaves_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let opts = options(dir.path(), OnError::Abort, SymbolPolicy::Drop);
        encode_records(records(">t\nACGTACGTACGT\n"), &opts).unwrap();

        let unit = dir.path().join("t.seq");
        let bytes = std::fs::read(&unit).unwrap();
        std::fs::write(&unit, &bytes[..bytes.len() - 1]).unwrap();

        let out = dir.path().join("t.fa");
        assert!(decode_unit(&unit, &out, &FormatOptions::default()).is_err());
        assert!(!out.exists());
    }
}

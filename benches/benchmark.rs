use criterion::{black_box, criterion_group, criterion_main, Criterion};
use seqpack::reader::FastaReader;
use seqpack::seq::{normalize_record, SymbolPolicy};
use seqpack::unit::{UnitReader, UnitWriter};

fn sample_fasta() -> String {
    let line = "ACGTTGCAACGTAGCTAGCTAGGATCCGATCGATNNACGATCGTAGCTAGCTAGCTAGCA\n";
    let mut fasta = String::new();
    for i in 0..8 {
        fasta.push_str(&format!(">record{i} synthetic\n"));
        for _ in 0..500 {
            fasta.push_str(line);
        }
    }
    fasta
}

pub fn encode_records(c: &mut Criterion) {
    let fasta = sample_fasta();
    let writer = UnitWriter::default();

    c.bench_function("encode 8 x 30kb", |b| {
        b.iter(|| {
            let mut out = Vec::new();
            for raw in FastaReader::new(fasta.as_bytes()) {
                let rec = normalize_record(raw.unwrap(), SymbolPolicy::Drop).unwrap();
                writer.write_record(&mut out, &rec).unwrap();
            }
            black_box(out);
        })
    });
}

pub fn decode_unit(c: &mut Criterion) {
    let fasta = sample_fasta();
    let raw = FastaReader::new(fasta.as_bytes()).next().unwrap().unwrap();
    let rec = normalize_record(raw, SymbolPolicy::Drop).unwrap();
    let mut unit = Vec::new();
    UnitWriter::default().write_record(&mut unit, &rec).unwrap();
    let reader = UnitReader::default();

    c.bench_function("decode 30kb unit", |b| {
        b.iter(|| {
            let mut out = Vec::new();
            reader.decode(&mut unit.as_slice(), &mut out).unwrap();
            black_box(out);
        })
    });
}

criterion_group!(benches, encode_records, decode_unit);
criterion_main!(benches);

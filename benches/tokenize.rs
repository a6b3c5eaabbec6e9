use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use xmltokenizer::{Error, Options, Tokenizer};

const RECORDS: usize = 10_000;

fn make_document(records: usize) -> String {
    let mut doc = String::with_capacity(records * 96 + 64);
    doc.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<trk>\n");
    for i in 0..records {
        doc.push_str(&format!(
            "  <trkpt lat=\"{}.5\" lon=\"-{}.25\">\n    <ele>{}</ele>\n    <time><![CDATA[t{}]]></time>\n  </trkpt>\n",
            i % 90,
            i % 180,
            i,
            i
        ));
    }
    doc.push_str("</trk>\n");
    doc
}

fn count_tokens(input: &[u8], read_increment: usize) -> usize {
    let mut tok = Tokenizer::with_options(input, Options::new().with_read_increment(read_increment));
    let mut count = 0;
    loop {
        match tok.next_token() {
            Ok(token) => {
                black_box(token.attrs().len());
                count += 1;
            }
            Err(Error::Eof) => return count,
            Err(err) => panic!("{err}"),
        }
    }
}

fn count_raw_tokens(input: &[u8]) -> usize {
    let mut tok = Tokenizer::new(input);
    let mut count = 0;
    while let Ok(raw) = tok.next_raw_token() {
        black_box(raw);
        count += 1;
    }
    count
}

fn bench_tokenize(c: &mut Criterion) {
    let input = make_document(RECORDS);
    let mut group = c.benchmark_group("tokenize");
    group.throughput(Throughput::Bytes(input.len() as u64));
    for increment in [64, 4 << 10, 64 << 10] {
        group.bench_with_input(BenchmarkId::from_parameter(increment), &increment, |b, &inc| {
            b.iter(|| count_tokens(black_box(input.as_bytes()), inc));
        });
    }
    group.finish();
}

fn bench_raw_tokens(c: &mut Criterion) {
    let input = make_document(RECORDS);
    c.bench_function("raw_tokens", |b| {
        b.iter(|| count_raw_tokens(black_box(input.as_bytes())));
    });
}

criterion_group!(benches, bench_tokenize, bench_raw_tokens);
criterion_main!(benches);

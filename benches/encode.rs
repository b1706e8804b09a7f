use criterion::{black_box, criterion_group, criterion_main, Criterion};
use header_codec::HeaderEncoder;

fn criterion_benchmark(c: &mut Criterion) {
    let encoder = HeaderEncoder::default();

    let ascii = b"Re: [announce] Release of the quarterly report (final version)".repeat(4);
    let mixed = "Grüße aus Köln, Zürich und Malmö: Überraschung für alle! ".repeat(4);
    let malformed = b"foofoo-\x80\x80\x80-barbar \xc3\xc3\xa4 \x01\x02 =?utf-8?q?x?=".repeat(4);

    // Preallocate some memory to encode into.
    let mut out = Vec::with_capacity(1024);

    c.bench_function("encode_ascii", |b| {
        b.iter(|| {
            encoder.encode_into(black_box(&ascii), &mut out);
            out.clear();
        })
    });

    c.bench_function("encode_mixed", |b| {
        b.iter(|| {
            encoder.encode_into(black_box(mixed.as_bytes()), &mut out);
            out.clear();
        })
    });

    c.bench_function("encode_malformed", |b| {
        b.iter(|| {
            encoder.encode_into(black_box(&malformed), &mut out);
            out.clear();
        })
    });

    c.bench_function("encode_data", |b| {
        b.iter(|| {
            encoder.encode_data(black_box(mixed.as_bytes()), &mut out);
            out.clear();
        })
    });
}

criterion_group!(benches, criterion_benchmark);

criterion_main!(benches);

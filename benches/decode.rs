use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use resp_parser::{Parser, ParserOptions, Reply, ReplyError, ReplySink};

struct NullSink;

impl ReplySink for NullSink {
    fn on_reply(&mut self, value: Reply) {
        black_box(value);
    }
    fn on_error(&mut self, error: ReplyError) {
        black_box(error);
    }
}

fn array_of_bulk_strings(count: usize, word_len: usize) -> Vec<u8> {
    let word = vec![b'x'; word_len];
    let mut out = Vec::new();
    out.extend_from_slice(format!("*{count}\r\n").as_bytes());
    for _ in 0..count {
        out.extend_from_slice(format!("${word_len}\r\n").as_bytes());
        out.extend_from_slice(&word);
        out.extend_from_slice(b"\r\n");
    }
    out
}

fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("feed_whole");

    for &count in &[10usize, 1_000, 10_000] {
        let input = array_of_bulk_strings(count, 16);
        group.bench_with_input(BenchmarkId::new("small_elements", count), &input, |b, input| {
            b.iter(|| {
                let mut parser = Parser::new(ParserOptions::default()).unwrap();
                let mut sink = NullSink;
                parser.feed(black_box(input), &mut sink);
            });
        });
    }

    for &size in &[1_024usize, 64 * 1024, 4 * 1024 * 1024] {
        let mut input = format!("${size}\r\n").into_bytes();
        input.extend(std::iter::repeat(b'a').take(size));
        input.extend_from_slice(b"\r\n");
        group.bench_with_input(BenchmarkId::new("single_bulk_string", size), &input, |b, input| {
            b.iter(|| {
                let mut parser = Parser::new(ParserOptions::default()).unwrap();
                let mut sink = NullSink;
                parser.feed(black_box(input), &mut sink);
            });
        });
    }

    group.bench_function("multi_chunk_bulk_string", |b| {
        let size = 1024 * 1024;
        let mut payload = format!("${size}\r\n").into_bytes();
        payload.extend(std::iter::repeat(b'a').take(size));
        payload.extend_from_slice(b"\r\n");
        let chunks: Vec<&[u8]> = payload.chunks(4096).collect();

        b.iter(|| {
            let mut parser = Parser::new(ParserOptions::default()).unwrap();
            let mut sink = NullSink;
            for chunk in &chunks {
                parser.feed(black_box(chunk), &mut sink);
            }
        });
    });

    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);

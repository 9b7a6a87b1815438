use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use dbc2dbf::{convert_stream, explode_bytes, CompressionMode, DictionarySize};
use std::hint::black_box;
use std::io::{self, Cursor};
use std::time::Duration;

#[path = "../tests/common/mod.rs"]
mod common;

use common::{dbc_container, dbf_header, encode, Token};

/// Fixed-width records like a DBF table: short runs of new bytes followed by
/// matches against earlier records
fn record_tokens(size: usize, dict_size: DictionarySize, match_every: u32) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut produced = 0usize;
    let mut i = 0u32;

    while produced < size {
        if i % match_every == match_every - 1 && produced >= 64 {
            let window = produced.min(dict_size.window_size()) as u32;
            let length = 3 + (i.wrapping_mul(2654435761) >> 24) % 60;
            let distance = 1 + i.wrapping_mul(40503) % window;
            tokens.push(Token::Match { length, distance });
            produced += length as usize;
        } else {
            tokens.push(Token::Literal(b' ' + (i.wrapping_mul(17) % 90) as u8));
            produced += 1;
        }
        i += 1;
    }

    tokens
}

fn decompression_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("decompression_throughput");
    group.measurement_time(Duration::from_secs(10));

    for size in [10240usize, 102400, 1048576] {
        for (pattern, match_every) in [("literal_heavy", 20u32), ("match_heavy", 2)] {
            for mode in [CompressionMode::Binary, CompressionMode::Ascii] {
                let dict_size = DictionarySize::Size4K;
                let tokens = record_tokens(size, dict_size, match_every);
                let compressed = encode(mode, dict_size, &tokens);

                let benchmark_id =
                    BenchmarkId::from_parameter(format!("{}B/{}/{:?}", size, pattern, mode));
                group.throughput(Throughput::Bytes(size as u64));
                group.bench_with_input(benchmark_id, &compressed, |b, data| {
                    b.iter(|| explode_bytes(black_box(data)).expect("Decompression failed"));
                });
            }
        }
    }

    group.finish();
}

fn dictionary_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("dictionary_sizes");
    group.measurement_time(Duration::from_secs(5));

    let size = 102400;
    for dict_size in [
        DictionarySize::Size1K,
        DictionarySize::Size2K,
        DictionarySize::Size4K,
    ] {
        let tokens = record_tokens(size, dict_size, 3);
        let compressed = encode(CompressionMode::Binary, dict_size, &tokens);

        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(dict_size.window_size()),
            &compressed,
            |b, data| {
                b.iter(|| explode_bytes(black_box(data)).expect("Decompression failed"));
            },
        );
    }

    group.finish();
}

fn container_conversion(c: &mut Criterion) {
    let mut group = c.benchmark_group("container_conversion");
    group.sample_size(20);

    let size = 1048576;
    let tokens = record_tokens(size, DictionarySize::Size4K, 4);
    let payload = encode(CompressionMode::Binary, DictionarySize::Size4K, &tokens);
    let container = dbc_container(&dbf_header(1409), 0, &payload);

    group.throughput(Throughput::Bytes(size as u64));
    group.bench_function("1MB", |b| {
        b.iter(|| {
            convert_stream(Cursor::new(black_box(&container)), io::sink())
                .expect("Conversion failed")
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    decompression_throughput,
    dictionary_sizes,
    container_conversion
);
criterion_main!(benches);

//! Benchmarks for conversion and tolerant comparison

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};

use easy_time::{compare_instants, convert, EasyTime, TextFormat, Tolerance};

const SAMPLES: [&str; 5] = [
    "Thu, 06 Oct 2011 02:26:12 -0500",
    "Thu, 06 Oct 2011 02:26:12 GMT",
    "2011-10-06T02:26:12-05:00",
    "2011-10-06T02:26:12.345Z",
    "2010-09-08 07:06:06 -04:00",
];

fn bench_detect(c: &mut Criterion) {
    c.bench_function("detect_format", |b| {
        b.iter(|| {
            for text in SAMPLES {
                black_box(TextFormat::detect(black_box(text)));
            }
        })
    });
}

fn bench_convert_text(c: &mut Criterion) {
    let mut group = c.benchmark_group("convert_text");
    for (i, text) in SAMPLES.iter().enumerate() {
        group.bench_function(format!("sample_{i}"), |b| {
            b.iter(|| convert(black_box(*text)))
        });
    }
    group.finish();
}

fn bench_convert_components(c: &mut Criterion) {
    c.bench_function("convert_components", |b| {
        b.iter(|| convert(black_box(vec![2011i64, 10, 6, 2, 26, 12, -18_000])))
    });
}

fn bench_compare_instants(c: &mut Criterion) {
    let a = convert(SAMPLES[0]).expect("sample parses");
    let b_ = convert(SAMPLES[1]).expect("sample parses");
    let t = Tolerance::minutes(1);

    c.bench_function("compare_instants", |b| {
        b.iter(|| compare_instants(black_box(&a), black_box(&b_), t))
    });
}

fn bench_easy_time_is_same(c: &mut Criterion) {
    let t = EasyTime::new(SAMPLES[2], None).expect("sample parses");

    c.bench_function("easy_time_is_same_text", |b| {
        b.iter(|| t.is_same(black_box(SAMPLES[3]), None))
    });
}

criterion_group!(
    benches,
    bench_detect,
    bench_convert_text,
    bench_convert_components,
    bench_compare_instants,
    bench_easy_time_is_same,
);
criterion_main!(benches);

//! Benchmarks para soma de séries

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sil_series::{
    sum_series_with, sum_source, DirectSource, SeriesConfig, TermStrategy,
};

fn log1p_terms(x: f64) -> impl FnMut() -> f64 {
    let mult = -x;
    let mut prod = -1.0;
    let mut k = 0.0;
    move || {
        prod *= mult;
        k += 1.0;
        prod / k
    }
}

fn bench_strategies(c: &mut Criterion) {
    let direct = SeriesConfig::new().with_strategy(TermStrategy::Direct);
    let cooperative = SeriesConfig::new().with_strategy(TermStrategy::Cooperative);

    c.bench_function("log1p_direct", |b| {
        b.iter(|| sum_series_with(log1p_terms(black_box(0.5)), &direct).unwrap())
    });

    c.bench_function("log1p_cooperative", |b| {
        b.iter(|| sum_series_with(log1p_terms(black_box(0.5)), &cooperative).unwrap())
    });
}

fn bench_exact_count(c: &mut Criterion) {
    let config = SeriesConfig::new().with_max_terms(10_000);

    c.bench_function("exact_count_10k", |b| {
        b.iter(|| sum_source(DirectSource::new(log1p_terms(black_box(0.99))), &config).unwrap())
    });
}

fn bench_safety_cap(c: &mut Criterion) {
    let config = SeriesConfig::default();

    let mut group = c.benchmark_group("safety_cap");
    group.sample_size(10);
    group.bench_function("non_convergent_1m", |b| {
        b.iter(|| sum_source(DirectSource::new(|| black_box(1.0)), &config).unwrap())
    });
    group.finish();
}

criterion_group!(benches, bench_strategies, bench_exact_count, bench_safety_cap);
criterion_main!(benches);

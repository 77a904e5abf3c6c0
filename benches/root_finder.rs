use codspeed_criterion_compat::{Criterion, criterion_group, criterion_main};
use lmi7702::prelude::*;

fn bench_find_root_linear(c: &mut Criterion) {
    c.bench_function("find_root_linear", |b| {
        b.iter(|| find_root(|x| x - 3.0, 0.0, 10.0, 1e-10, RootBias::None, u32::MAX));
    });
}

fn bench_find_root_quadratic(c: &mut Criterion) {
    c.bench_function("find_root_quadratic", |b| {
        b.iter(|| find_root(|x| x * x - 2.0, 0.0, 2.0, 1e-12, RootBias::None, u32::MAX));
    });
}

fn bench_decimal_root_memoized(c: &mut Criterion) {
    c.bench_function("decimal_root_memoized", |b| {
        b.iter(|| decimal_root(|x| x - 1234.5, 0.0, 10_000.0, RootBias::Higher, 2, 64));
    });
}

criterion_group!(
    benches,
    bench_find_root_linear,
    bench_find_root_quadratic,
    bench_decimal_root_memoized
);
criterion_main!(benches);

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use threshold_sss::random::OsRandom;
use threshold_sss::sss::{combine, generate_refresh_key, refresh_shares, split};

fn bench_split(c: &mut Criterion) {
    c.bench_function("split", |b| {
        let secret = b"this is a very secret message";
        let threshold = 5;
        let shares = 10;
        b.iter(|| split(black_box(secret), black_box(shares), black_box(threshold)).unwrap())
    });
}

fn bench_combine(c: &mut Criterion) {
    c.bench_function("combine", |b| {
        let secret = b"this is a very secret message";
        let threshold = 5;
        let shares = split(secret, 10, threshold).unwrap();
        b.iter(|| combine(black_box(&shares[..threshold])).unwrap())
    });
}

fn bench_refresh_shares(c: &mut Criterion) {
    c.bench_function("refresh_shares", |b| {
        let secret = b"benchmark secret";
        let threshold = 5;
        let mut shares = split(secret, 10, threshold).unwrap();
        let mut rng = OsRandom::default();

        b.iter(|| {
            refresh_shares(black_box(&mut shares), black_box(threshold), &mut rng).unwrap();
        })
    });
}

fn bench_generate_refresh_key(c: &mut Criterion) {
    c.bench_function("generate_refresh_key", |b| {
        let threshold = 5;
        let secret_length = 10;
        let mut rng = OsRandom::default();

        b.iter(|| {
            generate_refresh_key(black_box(threshold), black_box(secret_length), &mut rng).unwrap()
        })
    });
}

criterion_group!(
    benches,
    bench_split,
    bench_combine,
    bench_refresh_shares,
    bench_generate_refresh_key
);
criterion_main!(benches);

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use siderea::bodies::Body;
use siderea::constants::flags;
use siderea::houses::{houses_armc, HouseSystem};
use siderea::Siderea;

/// Uniform random Julian day within ±50 years of J2000.
#[inline]
fn rand_epoch(rng: &mut StdRng) -> f64 {
    2_451_545.0 + rng.random_range(-18_262.0..18_262.0)
}

fn bench_planet_positions(c: &mut Criterion) {
    let session = Siderea::new();
    let mut rng = StdRng::seed_from_u64(0xC0FFEE);
    let samples = 1_000usize;

    c.bench_function("calc/mars_apparent", |b| {
        b.iter_batched(
            || (0..samples).map(|_| rand_epoch(&mut rng)).collect::<Vec<_>>(),
            |epochs| {
                for jd in epochs {
                    let pos = session.calc(black_box(jd), Body::Mars, 0).unwrap();
                    black_box(pos);
                }
            },
            BatchSize::LargeInput,
        )
    });
}

fn bench_moon_with_speed(c: &mut Criterion) {
    let session = Siderea::new();
    let mut rng = StdRng::seed_from_u64(0xBEEF);
    let samples = 1_000usize;

    c.bench_function("calc/moon_with_speed", |b| {
        b.iter_batched(
            || (0..samples).map(|_| rand_epoch(&mut rng)).collect::<Vec<_>>(),
            |epochs| {
                for jd in epochs {
                    let pos = session
                        .calc(black_box(jd), Body::Moon, flags::SPEED)
                        .unwrap();
                    black_box(pos);
                }
            },
            BatchSize::LargeInput,
        )
    });
}

fn bench_placidus_houses(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0xFACADE);
    let samples = 1_000usize;

    c.bench_function("houses/placidus", |b| {
        b.iter_batched(
            || {
                (0..samples)
                    .map(|_| {
                        (
                            rng.random_range(0.0..360.0),
                            rng.random_range(-60.0..60.0),
                        )
                    })
                    .collect::<Vec<_>>()
            },
            |cases| {
                for (armc, lat) in cases {
                    let h = houses_armc(
                        black_box(armc),
                        black_box(lat),
                        23.4392911,
                        HouseSystem::Placidus,
                    )
                    .unwrap();
                    black_box(h);
                }
            },
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = bench_planet_positions, bench_moon_with_speed, bench_placidus_houses
);
criterion_main!(benches);

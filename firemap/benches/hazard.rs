//! Benchmarks pour le calcul de l'emprise de danger (tampons + union)

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use geo::Point;

use firemap::hazard::hazard_extent;
use maplayers::Feature;

/// Semis pseudo-aléatoire de détections autour de Rhodes (UTM 35N)
fn fire_points(n: usize) -> Vec<Feature> {
    let mut state = 0x2545_f491_u64;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        (state % 10_000) as f64 / 10_000.0
    };

    (0..n)
        .map(|i| {
            let x = 570_000.0 + next() * 40_000.0;
            let y = 3_990_000.0 + next() * 40_000.0;
            Feature::new(i.to_string(), Point::new(x, y))
        })
        .collect()
}

fn bench_hazard(c: &mut Criterion) {
    let mut group = c.benchmark_group("hazard_extent");
    for n in [50, 200, 800] {
        let fires = fire_points(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &fires, |b, fires| {
            b.iter(|| hazard_extent(black_box(fires), 1000.0, 16).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_hazard);
criterion_main!(benches);

//! # Pursuit Benchmark

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

use nalgebra::Vector2;
use pursuit_lib::{
    loc::Pose,
    path::{build_segments, simplify, Waypoint},
    pursuit_ctrl::{Params, PursuitCtrl},
};

fn pursuit_benchmark(c: &mut Criterion) {
    // ---- Build a dense sketched path ----

    // A sine wave sampled every 0.5 units, as a sketch would be
    let raw: Vec<Waypoint> = (0..2000)
        .map(|i| {
            let x = i as f64 * 0.5;
            Vector2::new(x, 50.0 * (x / 80.0).sin())
        })
        .collect();

    c.bench_function("simplify::high_quality", |b| {
        b.iter(|| simplify(black_box(&raw), 2.0, true))
    });
    c.bench_function("simplify::fast", |b| {
        b.iter(|| simplify(black_box(&raw), 2.0, false))
    });

    let segments = build_segments(&simplify(&raw, 2.0, true)).unwrap();

    // Bench a step from the middle of the path, which searches from the first segment
    let pose = Pose::new(500.0, 50.0 * (500.0f64 / 80.0).sin() + 3.0, 0.0);

    c.bench_function("PursuitCtrl::step", |b| {
        b.iter_batched(
            || {
                let mut ctrl = PursuitCtrl::new(Params::default()).unwrap();
                ctrl.start(segments.clone(), &pose).unwrap();
                ctrl
            },
            // Hand the controller back so it is dropped outside the timing
            |mut ctrl| (ctrl.step(black_box(&pose)).unwrap(), ctrl),
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, pursuit_benchmark);
criterion_main!(benches);

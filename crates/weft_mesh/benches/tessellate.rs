use criterion::{black_box, criterion_group, criterion_main, Criterion};
use weft_mesh::{tessellate, MeshGrid};

fn bench_tessellate(c: &mut Criterion) {
    let grid = MeshGrid::default_grid(5, 5, 1920.0, 1080.0);

    c.bench_function("tessellate 5x5 S=16", |b| {
        b.iter(|| tessellate(black_box(&grid), 16))
    });

    c.bench_function("tessellate 5x5 S=48", |b| {
        b.iter(|| tessellate(black_box(&grid), 48))
    });
}

criterion_group!(benches, bench_tessellate);
criterion_main!(benches);

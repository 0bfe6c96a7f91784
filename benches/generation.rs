use criterion::{black_box, criterion_group, criterion_main, Criterion};
use gridlock::generation::utils;
use gridlock::{collect_keys, GenerationConfig, Generator, SectorDungeonGenerator};

fn bench_generate_level(c: &mut Criterion) {
    let generator = SectorDungeonGenerator::new();
    let config = GenerationConfig::new(42);

    c.bench_function("generate 3x3 level", |b| {
        b.iter(|| {
            let mut rng = utils::create_rng(&config);
            generator.generate(black_box(&config), &mut rng)
        })
    });

    let detailed = GenerationConfig::for_detailed_generation(42);
    c.bench_function("generate 4x4 level", |b| {
        b.iter(|| {
            let mut rng = utils::create_rng(&detailed);
            generator.generate(black_box(&detailed), &mut rng)
        })
    });
}

fn bench_walkthrough(c: &mut Criterion) {
    let config = GenerationConfig::new(42);
    let mut rng = utils::create_rng(&config);
    let Ok(level) = SectorDungeonGenerator::new().generate(&config, &mut rng) else {
        return;
    };

    c.bench_function("collect keys", |b| b.iter(|| collect_keys(black_box(&level))));
}

criterion_group!(benches, bench_generate_level, bench_walkthrough);
criterion_main!(benches);

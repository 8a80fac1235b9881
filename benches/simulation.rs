//! Performance benchmarks for the genealogy sampler and pedigree builder.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use lineal::pipelines::{build_pedigrees, sample_genealogy, GenerationLimit};
use lineal::RunMonitor;

fn benchmark_sample_genealogy(c: &mut Criterion) {
    let mut group = c.benchmark_group("sample_genealogy");

    for population_size in [100, 1000, 10000].iter() {
        group.bench_with_input(
            BenchmarkId::new("until_one_founder", population_size),
            population_size,
            |b, &m| {
                b.iter(|| {
                    let monitor = RunMonitor::new();
                    let mut rng = StdRng::seed_from_u64(42);
                    sample_genealogy(
                        m,
                        GenerationLimit::UntilOneFounder,
                        false,
                        &mut rng,
                        &monitor,
                    )
                    .unwrap()
                });
            },
        );
    }

    group.finish();
}

fn benchmark_build_pedigrees(c: &mut Criterion) {
    let monitor = RunMonitor::new();
    let mut rng = StdRng::seed_from_u64(42);
    let sim = sample_genealogy(
        5000,
        GenerationLimit::UntilOneFounder,
        false,
        &mut rng,
        &monitor,
    )
    .unwrap();

    c.bench_function("build_pedigrees_5000", |b| {
        b.iter_batched(
            || sim.population.clone(),
            |mut population| build_pedigrees(&mut population, &monitor).unwrap(),
            criterion::BatchSize::LargeInput,
        );
    });
}

criterion_group!(benches, benchmark_sample_genealogy, benchmark_build_pedigrees);
criterion_main!(benches);

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rectcover::generators::staircase;
use rectcover::{Algorithm, Costs, Postprocessor, Provider, RuntimeState};

fn covering(c: &mut Criterion) {
    let steps: Vec<(u32, u32)> = (0u32..40).map(|i| (i % 3 + 1, (i + 1) % 4 + 1)).collect();
    let polygon = staircase(&steps);
    let costs = Costs {
        creation: 5,
        area: 1,
    };

    let mut group = c.benchmark_group("staircase-40");
    for algorithm in [Algorithm::Partition, Algorithm::Strip, Algorithm::Greedy] {
        group.bench_function(algorithm.to_string(), |b| {
            b.iter(|| {
                let provider = Provider::algorithm(algorithm);
                provider.get_cover_for(black_box(&polygon), &costs, &mut RuntimeState::new())
            })
        });
    }
    group.bench_function("greedy+prune+trim", |b| {
        b.iter(|| {
            let provider = Provider::algorithm(Algorithm::Greedy)
                .then(Postprocessor::Prune)
                .then(Postprocessor::Trim);
            provider.get_cover_for(black_box(&polygon), &costs, &mut RuntimeState::new())
        })
    });
    group.finish();
}

criterion_group!(benches, covering);
criterion_main!(benches);

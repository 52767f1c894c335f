use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use network::{BayesianRating, BookNetwork, Popularity};
use prototypes::{synthetic_dataset, SyntheticSpec};

fn build(spec: SyntheticSpec) -> BookNetwork {
    let dataset = synthetic_dataset(spec);
    let cohort: Vec<String> = dataset.interactions.keys().cloned().collect();
    BookNetwork::new(cohort, dataset.interactions).unwrap()
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let spec = SyntheticSpec::default();
    let dataset = synthetic_dataset(spec);
    let cohort: Vec<String> = dataset.interactions.keys().cloned().collect();

    c.bench_function("construct 1k users", |b| {
        b.iter_batched(
            || (cohort.clone(), dataset.interactions.clone()),
            |(cohort, interactions)| BookNetwork::new(cohort, interactions).unwrap(),
            BatchSize::LargeInput,
        )
    });

    c.bench_function("rank by popularity", |b| {
        b.iter_batched(
            || build(spec),
            |mut network| black_box(network.get_books_by_statistic(&Popularity, 3)),
            BatchSize::LargeInput,
        )
    });

    c.bench_function("rank by bayesian rating", |b| {
        b.iter_batched(
            || build(spec),
            |mut network| {
                let metric = BayesianRating::new(&dataset.catalog);
                black_box(network.get_books_by_statistic(&metric, 3))
            },
            BatchSize::LargeInput,
        )
    });

    c.bench_function("prune head book", |b| {
        b.iter_batched(
            || build(spec),
            |mut network| black_box(network.prune(&["book-00000"])),
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);

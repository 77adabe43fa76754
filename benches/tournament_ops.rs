use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use cordon_dp::LockFreeTournamentTree;
use rand::{rngs::StdRng, Rng, SeedableRng};

const SENTINEL: u32 = u32::MAX;

fn filled_tree(capacity: usize, seed: u64) -> LockFreeTournamentTree {
    let tree = LockFreeTournamentTree::new(capacity, SENTINEL).unwrap();
    let mut rng = StdRng::seed_from_u64(seed);
    for i in 0..capacity {
        tree.insert(i, rng.gen_range(0..1 << 24)).unwrap();
    }
    tree
}

fn bench_single_thread_ops(c: &mut Criterion) {
    let mut group = c.benchmark_group("tournament_single_thread");

    group.bench_function("insert_1024", |b| {
        b.iter_batched(
            || LockFreeTournamentTree::new(1_024, SENTINEL).unwrap(),
            |tree| {
                let mut rng = StdRng::seed_from_u64(1);
                for i in 0..1_024 {
                    tree.insert(i, rng.gen_range(0..1 << 24)).unwrap();
                }
                criterion::black_box(tree.get_winner());
            },
            BatchSize::PerIteration,
        )
    });

    group.bench_function("extract_drain_1024", |b| {
        b.iter_batched(
            || filled_tree(1_024, 2),
            |tree| {
                while tree.extract_winner() != SENTINEL {}
            },
            BatchSize::PerIteration,
        )
    });

    group.bench_function("replace_winner_4096x", |b| {
        b.iter_batched(
            || filled_tree(256, 3),
            |tree| {
                let mut rng = StdRng::seed_from_u64(4);
                for _ in 0..4_096 {
                    tree.replace_winner(rng.gen_range(0..1 << 24));
                }
                criterion::black_box(tree.get_winner());
            },
            BatchSize::PerIteration,
        )
    });

    group.finish();
}

fn bench_contended_ops(c: &mut Criterion) {
    let mut group = c.benchmark_group("tournament_contended");
    group.sample_size(20);

    for &threads in &[2usize, 4, 8] {
        group.bench_function(format!("mixed_churn_{threads}_threads"), |b| {
            b.iter_batched(
                || filled_tree(1_024, 5),
                |tree| {
                    std::thread::scope(|scope| {
                        for t in 0..threads {
                            let tree = &tree;
                            scope.spawn(move || {
                                let mut rng = StdRng::seed_from_u64(t as u64);
                                for _ in 0..10_000 {
                                    if rng.gen_bool(0.5) {
                                        let slot = rng.gen_range(0..1_024);
                                        tree.insert(slot, rng.gen_range(0..1 << 24)).unwrap();
                                    } else {
                                        tree.extract_winner();
                                    }
                                }
                            });
                        }
                    });
                },
                BatchSize::PerIteration,
            )
        });
    }

    group.finish();
}

criterion_group!(benches, bench_single_thread_ops, bench_contended_ops);
criterion_main!(benches);

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

use common::create_rng_from_seed;
use engine::GameState;
use mcts::{HeuristicRaveStrategy, RaveStrategy, SearchOptions, SolverStrategy, Ucb1Strategy, MCTS};
use ultimate_tictactoe::{Engine, MainBoard, SubBoardCapture};

criterion_group!(benches, bench_search);
criterion_main!(benches);

const SIMULATIONS: usize = 200;

fn bench_search(c: &mut Criterion) {
    let engine = Engine::new();
    let options = SearchOptions::default();
    let mut group = c.benchmark_group("search_200");

    group.bench_function("ucb1", |b| {
        b.iter_batched(
            || MCTS::new(MainBoard::initial(), 1, &engine, Ucb1Strategy::new(&engine, &options), create_rng_from_seed(Some(1))),
            |mut mcts| black_box(mcts.search_visits(SIMULATIONS).unwrap()),
            BatchSize::SmallInput,
        )
    });

    group.bench_function("solver", |b| {
        b.iter_batched(
            || MCTS::new(MainBoard::initial(), 1, &engine, SolverStrategy::new(&engine, &options), create_rng_from_seed(Some(1))),
            |mut mcts| black_box(mcts.search_visits(SIMULATIONS).unwrap()),
            BatchSize::SmallInput,
        )
    });

    group.bench_function("rave", |b| {
        b.iter_batched(
            || MCTS::new(MainBoard::initial(), 1, &engine, RaveStrategy::new(&engine, &options), create_rng_from_seed(Some(1))),
            |mut mcts| black_box(mcts.search_visits(SIMULATIONS).unwrap()),
            BatchSize::SmallInput,
        )
    });

    group.bench_function("heuristic_rave", |b| {
        b.iter_batched(
            || {
                let strategy = HeuristicRaveStrategy::new(&engine, SubBoardCapture, &options);
                MCTS::new(MainBoard::initial(), 1, &engine, strategy, create_rng_from_seed(Some(1)))
            },
            |mut mcts| black_box(mcts.search_visits(SIMULATIONS).unwrap()),
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

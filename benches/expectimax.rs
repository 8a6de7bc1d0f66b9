use ai_2048_solver::engine::{Board, Direction};
use ai_2048_solver::expectimax::{Expectimax, ExpectimaxConfig};
use criterion::{criterion_group, criterion_main, Criterion};
use rand::{rngs::StdRng, SeedableRng};
use std::hint::black_box;

fn corpus() -> Vec<Board> {
    let mut rng = StdRng::seed_from_u64(4242);
    let mut boards = Vec::new();
    let mut b = Board::EMPTY.with_random_tile(&mut rng).with_random_tile(&mut rng);
    boards.push(b);
    for i in 0..32 {
        let (nb, _) = b.make_move(Direction::ALL[i % 4], &mut rng);
        if nb.is_game_over() { break; }
        b = nb;
        boards.push(b);
    }
    boards
}

fn bench_fixed_depth(c: &mut Criterion) {
    let boards = corpus();
    let mut ex = Expectimax::with_config(ExpectimaxConfig::fixed_depth(2)).unwrap();

    c.bench_function("expectimax/fixed_depth_2", |bch| {
        bch.iter(|| {
            let mut acc = 0usize;
            for &bd in &boards {
                acc ^= ex.best_move(bd).map(|d| d.index()).unwrap_or(4);
            }
            black_box(acc)
        })
    });
}

fn bench_governed(c: &mut Criterion) {
    let boards = corpus();
    let mut ex = Expectimax::new();
    let mut group = c.benchmark_group("expectimax/governed");
    group.sample_size(10);
    group.bench_function("best_move", |bch| {
        bch.iter(|| {
            let mut nodes = 0u64;
            for &bd in &boards {
                black_box(ex.best_move(bd));
                nodes += ex.last_stats().total_nodes;
            }
            black_box(nodes)
        })
    });
    group.finish();
}

criterion_group!(expectimax, bench_fixed_depth, bench_governed);
criterion_main!(expectimax);

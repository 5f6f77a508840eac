use std::time::Duration;

use criterion::BenchmarkId;
use criterion::Criterion;
use criterion::criterion_group;
use criterion::criterion_main;
use hrsw::Stopwatch;
use human_duration::human_duration;
use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::SeedableRng;

use astar::algorithms::astar::AStarSearch;
use astar::grid::Grid;
use astar::heuristic::Blind;
use astar::heuristic::Heuristic;
use astar::heuristic::Manhattan;
use astar::maze::MazeGenerator;

const BOARD_SIZES: [u32; 3] = [20, 50, 100];
const WALL_THRESHOLD: f64 = 0.1;
/// Maximum time willing to wait for a single benchmark instance.
const MAX_INSTANCE_TIME: Duration = Duration::from_secs(1);

fn solve<H: Heuristic>(grid: Grid) -> usize {
    let mut search = AStarSearch::<H>::new(grid).unwrap();
    search.run().unwrap();
    search.stats().steps
}

fn step_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("Grid A*");

    for size in BOARD_SIZES {
        let generator = MazeGenerator::new(size, size, WALL_THRESHOLD);
        for i in 0..3 {
            let instance_name = format!("{size}x{size}:{i}");
            let mut rng = ChaCha8Rng::seed_from_u64(i);
            let grid = generator.generate(&mut rng).unwrap();

            let mut stopwatch = Stopwatch::new_started();
            let steps = solve::<Manhattan>(grid.clone());
            stopwatch.stop();
            let elapsed = stopwatch.elapsed();
            if elapsed > MAX_INSTANCE_TIME {
                log::warn!(
                    "Skipping {instance_name} as it takes too long ({})",
                    human_duration(&elapsed)
                );
                continue;
            }
            println!("{instance_name}: {steps} steps");

            group.bench_with_input(BenchmarkId::new("A*", &instance_name), &grid, |b, g| {
                b.iter(|| solve::<Manhattan>(g.clone()))
            });
            group.bench_with_input(
                BenchmarkId::new("Uniform cost", &instance_name),
                &grid,
                |b, g| b.iter(|| solve::<Blind>(g.clone())),
            );
        }
    }
    group.finish();
}

criterion_group!(benches, step_search);
criterion_main!(benches);

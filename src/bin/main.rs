use std::error::Error;
use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use hrsw::Stopwatch;
use human_duration::human_duration;
use owo_colors::OwoColorize;
use thousands::Separable;
use tracing_subscriber::EnvFilter;

use astar::algorithms::astar::AStarSearch;
use astar::algorithms::astar::SearchStatus;
use astar::config::BoardConfig;
use astar::grid::Grid;
use astar::heuristic::Blind;
use astar::heuristic::Heuristic;
use astar::heuristic::Manhattan;
use astar::maze::MazeGenerator;
use astar::render::TerminalRenderer;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeuristicChoice {
    /// Manhattan distance to the goal
    Manhattan,
    /// No estimate, uniform-cost search
    Blind,
}

/// Watch A* find its way across a board, one expansion per frame
#[derive(Parser, Debug)]
#[clap(long_version = astar::build::CLAP_LONG_VERSION)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[command(flatten)]
    pub board: BoardConfig,

    /// Load the walls from a layout (.txt, .maze) or an image instead
    #[arg(long, env = "ASTAR_MAZE")]
    pub maze: Option<PathBuf>,

    /// Searches to run, each on a fresh random board
    #[arg(long, default_value_t = 1u64, conflicts_with = "maze")]
    pub runs: u64,

    /// Only print the outcome of each search
    #[arg(long)]
    pub headless: bool,

    #[arg(long, value_enum, default_value_t = HeuristicChoice::Manhattan)]
    pub heuristic: HeuristicChoice,

    #[command(flatten)]
    color: colorchoice_clap::Color,
}

fn solve<H: Heuristic>(args: &Args, grid: Grid) -> Result<SearchStatus, Box<dyn Error>> {
    let mut out = anstream::stdout().lock();
    let renderer = TerminalRenderer::for_stream(&out, &grid);
    let tick = args.board.tick();
    let mut search = AStarSearch::<H>::new(grid)?;

    let mut stopwatch = Stopwatch::new_started();
    loop {
        let frame = Stopwatch::new_started();
        let result = search.step()?;
        if !args.headless {
            renderer.draw(&mut out, &search.snapshot())?;
            if let Some(tick) = tick {
                std::thread::sleep(tick.saturating_sub(frame.elapsed()));
            }
        }
        if result.is_terminal() {
            break;
        }
    }
    stopwatch.stop();
    let elapsed = stopwatch.elapsed();

    match search.solution() {
        Some(path) => writeln!(
            out,
            "{} cost {} in {} steps ({})",
            "Path Finding COMPLETE!!!".green(),
            path.cost().yellow(),
            search.stats().steps.separate_with_commas(),
            human_duration(&elapsed)
        )?,
        None => writeln!(
            out,
            "{} after {} steps ({})",
            "NO SOLUTION".red(),
            search.stats().steps.separate_with_commas(),
            human_duration(&elapsed)
        )?,
    }
    search.write_stats(&mut out)?;

    Ok(search.status())
}

fn run(args: &Args, grid: Grid) -> Result<SearchStatus, Box<dyn Error>> {
    match args.heuristic {
        HeuristicChoice::Manhattan => solve::<Manhattan>(args, grid),
        HeuristicChoice::Blind => solve::<Blind>(args, grid),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    args.color.write_global();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    args.board.validate()?;

    if let Some(p) = &args.maze {
        let grid = Grid::try_from(p.as_path())?;
        log::info!("Loaded {:?} from {}", grid, p.display());
        run(&args, grid)?;
        return Ok(());
    }

    let (seed, mut rng) = args.board.rng();
    log::info!("Maze seed: {seed}");
    let generator = MazeGenerator::from_config(&args.board);

    let mut solved = 0u64;
    for i in 0..args.runs {
        let grid = generator.generate(&mut rng)?;
        log::info!("Run {}/{} on {:?}", i + 1, args.runs, grid);
        if run(&args, grid)? == SearchStatus::Succeeded {
            solved += 1;
        }
    }

    if args.runs > 1 {
        anstream::println!(
            "Solved {}/{} boards (seed {})",
            solved.separate_with_commas(),
            args.runs.separate_with_commas(),
            seed.cyan()
        );
    }
    Ok(())
}

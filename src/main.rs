use std::path::PathBuf;
use std::time::Duration;

use ai_2048_solver::driver::{Driver, Game, SimulatedGame};
use ai_2048_solver::expectimax::ExpectimaxConfig;
use ai_2048_solver::solver::Solver;
use anyhow::Context;
use clap::Parser;
use flexi_logger::Logger;
use rand::Rng;

#[derive(Parser, Debug)]
#[command(name = "ai-2048-solver")]
#[command(author, version, about = "Play one simulated 2048 game with the expectimax solver")]
struct Args {
    /// Seed for tile spawns (random if omitted)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Stop after this many moves
    #[arg(short = 'n', long)]
    max_moves: Option<u64>,

    /// JSON file with solver settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Depth of the first search pass of every decision
    #[arg(long)]
    initial_depth: Option<u32>,

    /// Deepest pass the governor may run
    #[arg(long)]
    depth_cap: Option<u32>,

    /// Node count at which the governor stops deepening
    #[arg(long)]
    node_budget: Option<u64>,

    /// Milliseconds to wait between moves
    #[arg(long, default_value_t = 0)]
    interval_ms: u64,

    /// Only print the final summary
    #[arg(short, long)]
    quiet: bool,
}

fn load_config(args: &Args) -> anyhow::Result<ExpectimaxConfig> {
    let mut cfg = match &args.config {
        Some(path) => ExpectimaxConfig::from_json_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => ExpectimaxConfig::default(),
    };
    if let Some(depth) = args.initial_depth { cfg.initial_depth = depth; }
    if let Some(cap) = args.depth_cap { cfg.depth_cap = cap; }
    if let Some(budget) = args.node_budget { cfg.node_budget = budget; }
    Ok(cfg)
}

fn main() -> anyhow::Result<()> {
    let _logger = Logger::try_with_env_or_str("info")?
        .format(flexi_logger::colored_default_format)
        .start()?;

    let args = Args::parse();
    let cfg = load_config(&args)?;
    let seed = args.seed.unwrap_or_else(|| rand::thread_rng().gen());
    log::info!("seed {seed}, config {cfg:?}");

    let solver = Solver::with_config(cfg)?;
    let game = SimulatedGame::new(seed);
    let mut driver = Driver::new(solver, game);
    if !args.quiet {
        println!("{}", driver.game().board());
    }

    let interval = Duration::from_millis(args.interval_ms);
    let mut move_count = 0u64;
    let mut total_states = 0u64;
    let mut peak_states = 0u64;
    while args.max_moves.map_or(true, |limit| move_count < limit) {
        let Some(dir) = driver.tick()? else { break };
        move_count += 1;
        let stats = driver.solver().last_stats();
        total_states = total_states.saturating_add(stats.total_nodes);
        peak_states = peak_states.max(stats.total_nodes);
        if !args.quiet {
            println!("{dir} (depth {}, {} nodes)", stats.depth, stats.total_nodes);
            println!("{}", driver.game().board());
        }
        if !interval.is_zero() {
            std::thread::sleep(interval);
        }
    }

    let game = driver.into_game();
    println!(
        "Moves made: {}, Score: {}, Highest tile: {}, Game over: {}",
        move_count,
        game.score(),
        game.board().highest_tile(),
        game.is_over()
    );
    println!("States considered: {}, Max states considered for a move: {}", total_states, peak_states);
    Ok(())
}

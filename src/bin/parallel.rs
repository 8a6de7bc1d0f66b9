use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use ai_2048_solver::driver::{Driver, RunSummary, SimulatedGame};
use ai_2048_solver::expectimax::ExpectimaxConfig;
use ai_2048_solver::solver::Solver;
use anyhow::Context;
use clap::Parser;
use flexi_logger::Logger;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;

#[derive(Debug, Parser)]
#[command(name = "parallel", about = "Play many independent 2048 games with the expectimax solver")]
struct Args {
    /// Number of games to play
    #[arg(short, long, default_value_t = 16)]
    games: u64,

    /// Seed of the first game; game i uses seed + i
    #[arg(short, long, default_value_t = 0)]
    seed: u64,

    /// Worker threads (defaults to rayon's choice)
    #[arg(long)]
    threads: Option<usize>,

    /// Per-game: stop after this many moves
    #[arg(long)]
    steps: Option<u64>,

    /// JSON file with solver settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Node count at which the governor stops deepening
    #[arg(long)]
    node_budget: Option<u64>,

    /// Deepest pass the governor may run
    #[arg(long)]
    depth_cap: Option<u32>,

    /// Suppress the progress bar
    #[arg(long)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    let _logger = Logger::try_with_env_or_str("warn")?
        .format(flexi_logger::colored_default_format)
        .start()?;

    let args = Args::parse();
    let mut cfg = match &args.config {
        Some(path) => ExpectimaxConfig::from_json_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => ExpectimaxConfig::default(),
    };
    if let Some(budget) = args.node_budget { cfg.node_budget = budget; }
    if let Some(cap) = args.depth_cap { cfg.depth_cap = cap; }
    cfg.validate()?;

    if let Some(threads) = args.threads {
        ThreadPoolBuilder::new().num_threads(threads).build_global()?;
    }

    let pb = if args.quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(args.games);
        pb.set_style(
            ProgressStyle::with_template("{spinner} {elapsed_precise} [{bar:30}] {pos}/{len} games | {msg}")?
                .tick_chars("⠁⠃⠇⠧⠷⠿⠻⠟⠯⠷⠧⠇⠃"),
        );
        pb.enable_steady_tick(Duration::from_millis(120));
        pb
    };

    let start = Instant::now();
    // One solver per game; only finished summaries cross threads.
    let summaries: Vec<RunSummary> = (0..args.games)
        .into_par_iter()
        .map(|i| -> anyhow::Result<RunSummary> {
            let solver = Solver::with_config(cfg.clone())?;
            let mut driver = Driver::new(solver, SimulatedGame::new(args.seed.wrapping_add(i)));
            let summary = driver.run(args.steps)?;
            pb.inc(1);
            pb.set_message(format!("last: score {} tile {}", summary.score, summary.highest_tile));
            Ok(summary)
        })
        .collect::<anyhow::Result<_>>()?;
    pb.finish_and_clear();

    report(&summaries, start.elapsed());
    Ok(())
}

fn report(summaries: &[RunSummary], elapsed: Duration) {
    if summaries.is_empty() {
        println!("No games played");
        return;
    }
    let games = summaries.len() as f64;
    let total_moves: u64 = summaries.iter().map(|s| s.moves).sum();
    let mean_score = summaries.iter().map(|s| s.score as f64).sum::<f64>() / games;
    let best_score = summaries.iter().map(|s| s.score).max().unwrap_or(0);
    let mut tiles: BTreeMap<u32, usize> = BTreeMap::new();
    for s in summaries {
        *tiles.entry(s.highest_tile).or_default() += 1;
    }
    let secs = elapsed.as_secs_f64().max(1e-6);
    println!(
        "Games: {} | moves: {} | moves/sec: {:.1} | mean score: {:.1} | best score: {}",
        summaries.len(),
        total_moves,
        total_moves as f64 / secs,
        mean_score,
        best_score
    );
    for (tile, count) in tiles.iter().rev() {
        println!("  {:>6}: {:>5.1}%", tile, 100.0 * *count as f64 / games);
    }
}

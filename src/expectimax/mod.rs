//! Depth-limited expectimax search policy for 2048.
//!
//! The policy alternates a max layer (best of the four directions) with a
//! chance layer (2 or 4 spawned in each empty cell), down to a depth limit.
//! [`Expectimax`] wraps the search in a depth governor that re-runs it at
//! increasing depths while the node count stays under a budget.
//!
//! Notes
//! - The search is deterministic: spawn probabilities are folded into an
//!   expectation, nothing is sampled.
//! - Each decision starts again from `initial_depth`; only the
//!   [`SearchStats`] of the last decision are kept.
//!
//! Quick start
//! ```
//! use ai_2048_solver::engine::{Board, Direction};
//! use ai_2048_solver::expectimax::{Expectimax, ExpectimaxConfig};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(123);
//! let b0 = Board::EMPTY.with_random_tile(&mut rng).with_random_tile(&mut rng);
//!
//! // Adaptive depth (3 up to 8, 10k node budget)
//! let mut ex = Expectimax::new();
//! assert!(ex.best_move(b0).is_some());
//!
//! // Fixed depth, a single pass
//! let mut fixed = Expectimax::with_config(ExpectimaxConfig::fixed_depth(2)).unwrap();
//! let m: Option<Direction> = fixed.best_move(b0);
//! assert!(m.is_some());
//! assert_eq!(fixed.last_stats().passes, 1);
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::engine::{Board, Direction};

mod governor;
mod heuristic;
mod search;

pub use governor::Expectimax;
pub use heuristic::{heuristic, HeuristicWeights};
pub use search::LOSS_SCORE;

/// Configurable knobs for Expectimax. Defaults reproduce the reference tuning.
///
/// - `initial_depth`: depth limit of the first pass of every decision.
/// - `depth_cap`: the governor never searches deeper than this.
/// - `node_budget`: stop deepening once a pass visits at least this many nodes.
/// - `spawn_two_prob`: probability that a spawned tile is a 2 (otherwise a 4).
/// - `weights`: leaf heuristic weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpectimaxConfig {
    pub initial_depth: u32,
    pub depth_cap: u32,
    pub node_budget: u64,
    pub spawn_two_prob: f64,
    pub weights: HeuristicWeights,
}

impl Default for ExpectimaxConfig {
    fn default() -> Self {
        Self {
            initial_depth: 3,
            depth_cap: 8,
            node_budget: 10_000,
            spawn_two_prob: 0.9,
            weights: HeuristicWeights::default(),
        }
    }
}

/// Invalid or unreadable configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl ExpectimaxConfig {
    /// Config that runs exactly one pass at `depth` (the governor is disabled).
    pub fn fixed_depth(depth: u32) -> Self {
        Self { initial_depth: depth, depth_cap: depth, ..Default::default() }
    }

    /// Parse a JSON config. Missing fields keep their defaults.
    ///
    /// ```
    /// use ai_2048_solver::expectimax::ExpectimaxConfig;
    /// let cfg = ExpectimaxConfig::from_json_str(r#"{ "depth_cap": 5 }"#).unwrap();
    /// assert_eq!(cfg.depth_cap, 5);
    /// assert_eq!(cfg.initial_depth, 3);
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read and parse a JSON config file.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        Self::from_json_str(&fs::read_to_string(path)?)
    }

    /// Check the relationships between fields.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_depth > self.depth_cap {
            return Err(ConfigError::Invalid(format!(
                "initial_depth {} exceeds depth_cap {}",
                self.initial_depth, self.depth_cap
            )));
        }
        if self.node_budget == 0 {
            return Err(ConfigError::Invalid("node_budget must be positive".into()));
        }
        if !(0.0..=1.0).contains(&self.spawn_two_prob) {
            return Err(ConfigError::Invalid(format!(
                "spawn_two_prob {} is not a probability",
                self.spawn_two_prob
            )));
        }
        Ok(())
    }
}

/// Expected value of one root direction.
///
/// - `ev` is the move score plus the spawn expectation for taking `dir`.
/// - `legal` is false when the move is a no-op for the current board.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BranchEval {
    pub dir: Direction,
    pub ev: f64,
    pub legal: bool,
}

impl BranchEval {
    pub(crate) fn illegal(dir: Direction) -> Self { Self { dir, ev: LOSS_SCORE, legal: false } }
}

/// Basic search stats for the last decision.
///
/// `nodes` counts the final pass only; `total_nodes` sums every pass the
/// governor ran, since passes restart from scratch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes: u64,
    pub total_nodes: u64,
    pub depth: u32,
    pub passes: u32,
}

/// Leaf heuristic with the default weights.
#[inline]
pub fn heuristic_value(board: Board) -> f64 { heuristic(board, &HeuristicWeights::default()) }

use log::debug;

use crate::engine::{Board, Direction};

use super::search::{PassOutcome, SearchPass};
use super::{BranchEval, ConfigError, ExpectimaxConfig, SearchStats};

/// Expectimax policy driven by an adaptive depth governor.
///
/// Every decision starts at `initial_depth` and re-runs the whole search one
/// level deeper until a pass visits `node_budget` nodes or the depth reaches
/// `depth_cap`. The last completed pass decides.
#[derive(Debug, Clone)]
pub struct Expectimax {
    cfg: ExpectimaxConfig,
    stats: SearchStats,
}

impl Expectimax {
    pub fn new() -> Self { Self { cfg: ExpectimaxConfig::default(), stats: SearchStats::default() } }

    /// Build a policy after checking `cfg`.
    pub fn with_config(cfg: ExpectimaxConfig) -> Result<Self, ConfigError> {
        cfg.validate()?;
        Ok(Self { cfg, stats: SearchStats::default() })
    }

    /// Active configuration.
    #[inline]
    pub fn config(&self) -> &ExpectimaxConfig { &self.cfg }

    /// Compute the best move, or None when no direction changes the board.
    ///
    /// Example
    /// ```
    /// use ai_2048_solver::engine::Board;
    /// use ai_2048_solver::expectimax::Expectimax;
    /// use rand::{SeedableRng, rngs::StdRng};
    /// let mut rng = StdRng::seed_from_u64(7);
    /// let b = Board::EMPTY.with_random_tile(&mut rng).with_random_tile(&mut rng);
    /// let mut ex = Expectimax::new();
    /// assert!(ex.best_move(b).is_some());
    /// assert!(ex.last_stats().depth >= 3);
    /// ```
    pub fn best_move(&mut self, board: Board) -> Option<Direction> {
        let outcome = self.govern(board, self.cfg.initial_depth, self.cfg.depth_cap);
        debug!(
            "decided {:?} at depth {} ({} nodes over {} passes)",
            outcome.best_dir, self.stats.depth, self.stats.total_nodes, self.stats.passes
        );
        outcome.best_dir
    }

    /// Run a single pass at `depth`, bypassing the governor.
    pub fn best_move_at_depth(&mut self, board: Board, depth: u32) -> Option<Direction> {
        self.govern(board, depth, depth).best_dir
    }

    /// Root EV for each direction at the depth the governor settles on.
    ///
    /// Returns a fixed array in rotation order `[Left, Down, Right, Up]` and
    /// marks no-op moves as `legal=false`.
    ///
    /// ```
    /// use ai_2048_solver::engine::{Board, Direction};
    /// use ai_2048_solver::expectimax::{Expectimax, ExpectimaxConfig};
    /// let b = Board::try_from_slice(&[2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]).unwrap();
    /// let mut ex = Expectimax::with_config(ExpectimaxConfig::fixed_depth(1)).unwrap();
    /// let branches = ex.branch_evals(b);
    /// assert!(!branches[Direction::Left.index()].legal);
    /// assert!(branches[Direction::Down.index()].legal);
    /// ```
    pub fn branch_evals(&mut self, board: Board) -> [BranchEval; 4] {
        self.govern(board, self.cfg.initial_depth, self.cfg.depth_cap).root
    }

    /// Root value (the best branch EV) at the depth the governor settles on.
    pub fn state_value(&mut self, board: Board) -> f64 {
        self.govern(board, self.cfg.initial_depth, self.cfg.depth_cap).value
    }

    /// Statistics collected from the last call to [`Self::best_move`],
    /// [`Self::branch_evals`] or [`Self::state_value`].
    #[inline]
    pub fn last_stats(&self) -> SearchStats { self.stats }

    /// Reset stats to zero.
    #[inline]
    pub fn reset_stats(&mut self) { self.stats = SearchStats::default(); }

    fn govern(&mut self, board: Board, initial_depth: u32, depth_cap: u32) -> PassOutcome {
        let mut stats = SearchStats::default();
        let mut depth = initial_depth;
        loop {
            let outcome = SearchPass::new(&self.cfg, depth).run(board);
            stats.nodes = outcome.nodes;
            stats.total_nodes += outcome.nodes;
            stats.depth = depth;
            stats.passes += 1;
            debug!("pass at depth {depth}: {} nodes, best {:?}", outcome.nodes, outcome.best_dir);
            if outcome.nodes >= self.cfg.node_budget || depth >= depth_cap {
                self.stats = stats;
                return outcome;
            }
            depth += 1;
        }
    }
}

impl Default for Expectimax { fn default() -> Self { Self::new() } }

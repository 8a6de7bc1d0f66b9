use log::trace;

use crate::engine::{Board, Direction, Tile};

use super::heuristic::heuristic;
use super::{BranchEval, ExpectimaxConfig};

/// Value of a position with no legal continuation.
///
/// It is both the starting point of every max node and the expectation of a
/// branch with no empty cell left. It is finite so that weighted sums stay finite.
pub const LOSS_SCORE: f64 = -1.0e12;

const SPAWN_TWO: Tile = 2;
const SPAWN_FOUR: Tile = 4;

/// Result of one complete pass at a fixed depth limit.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PassOutcome {
    pub value: f64,
    pub best_dir: Option<Direction>,
    pub nodes: u64,
    pub root: [BranchEval; 4],
}

/// Transient state of one search pass: depth limit, node counter and root choice.
pub(crate) struct SearchPass<'a> {
    cfg: &'a ExpectimaxConfig,
    max_depth: u32,
    nodes: u64,
    best_dir: Option<Direction>,
    root: [BranchEval; 4],
}

impl<'a> SearchPass<'a> {
    pub(crate) fn new(cfg: &'a ExpectimaxConfig, max_depth: u32) -> Self {
        Self { cfg, max_depth, nodes: 0, best_dir: None, root: Direction::ALL.map(BranchEval::illegal) }
    }

    /// Search `board` from the root and report what the pass found.
    pub(crate) fn run(mut self, board: Board) -> PassOutcome {
        let value = self.search(board, 0);
        PassOutcome { value, best_dir: self.best_dir, nodes: self.nodes, root: self.root }
    }

    fn search(&mut self, board: Board, depth: u32) -> f64 {
        self.nodes += 1;
        if depth >= self.max_depth {
            return heuristic(board, &self.cfg.weights);
        }
        let mut best = LOSS_SCORE;
        let mut rotated = board;
        for dir in Direction::ALL {
            let (moved, move_score) = rotated.merge_left();
            if moved != rotated {
                let value = move_score as f64 + self.expectation(moved, depth);
                if depth == 0 {
                    trace!("root {dir}: {value:.1} (depth {})", self.max_depth);
                    self.root[dir.index()] = BranchEval { dir, ev: value, legal: true };
                }
                // Strictly greater: the first direction reaching the maximum keeps it.
                // A legal root move is always recorded, even one valued at the sentinel.
                if value > best || (depth == 0 && self.best_dir.is_none()) {
                    best = value;
                    if depth == 0 {
                        self.best_dir = Some(dir);
                    }
                }
            }
            rotated = rotated.rotate_90();
        }
        best
    }

    /// Mean over empty cells of the probability-weighted values of a 2 or a 4 spawning there.
    fn expectation(&mut self, board: Board, depth: u32) -> f64 {
        let num_empty = board.count_empty();
        if num_empty == 0 {
            return LOSS_SCORE;
        }
        let two_prob = self.cfg.spawn_two_prob;
        let four_prob = 1.0 - two_prob;
        let mut total = 0.0;
        for idx in board.empty_cells() {
            total += two_prob * self.search(board.with_tile(idx, SPAWN_TWO), depth + 1);
            total += four_prob * self.search(board.with_tile(idx, SPAWN_FOUR), depth + 1);
        }
        total / num_empty as f64
    }
}

//! The two-call surface an external game driver talks to.
//!
//! ```
//! use ai_2048_solver::expectimax::ExpectimaxConfig;
//! use ai_2048_solver::solver::Solver;
//!
//! let mut solver = Solver::with_config(ExpectimaxConfig::fixed_depth(2)).unwrap();
//! solver.set_board(&[2, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 4]).unwrap();
//! let dir = solver.decide().unwrap();
//! assert!(dir.is_some());
//! ```

use log::debug;

use crate::engine::{Board, BoardError, Direction, Tile};
use crate::expectimax::{ConfigError, Expectimax, ExpectimaxConfig, SearchStats};

#[derive(thiserror::Error, Debug)]
pub enum SolverError {
    #[error("invalid board: {0}")]
    InvalidBoard(#[from] BoardError),
    #[error("invalid solver config: {0}")]
    Config(#[from] ConfigError),
    #[error("no board set; call set_board before decide")]
    NoBoard,
}

/// Holds the current board and the search policy that decides moves for it.
#[derive(Debug, Clone, Default)]
pub struct Solver {
    policy: Expectimax,
    board: Option<Board>,
}

impl Solver {
    pub fn new() -> Self { Self::default() }

    /// Build a solver after checking `cfg`.
    pub fn with_config(cfg: ExpectimaxConfig) -> Result<Self, SolverError> {
        Ok(Self { policy: Expectimax::with_config(cfg)?, board: None })
    }

    /// Set the board the next decision searches from.
    ///
    /// `values` is the row-major grid with 0 for empty cells. On error the
    /// previously set board is kept.
    pub fn set_board(&mut self, values: &[Tile]) -> Result<(), SolverError> {
        let board = Board::try_from_slice(values)?;
        debug!("board set: {board:?}");
        self.board = Some(board);
        Ok(())
    }

    /// The board set by the last successful [`Self::set_board`].
    pub fn board(&self) -> Option<Board> { self.board }

    /// Run the depth-governed search on the current board.
    ///
    /// Returns `Ok(None)` when no direction changes the board. The stored
    /// board is left untouched; the caller applies the move and sets the next board.
    pub fn decide(&mut self) -> Result<Option<Direction>, SolverError> {
        let board = self.board.ok_or(SolverError::NoBoard)?;
        Ok(self.policy.best_move(board))
    }

    /// Search statistics of the last decision.
    pub fn last_stats(&self) -> SearchStats { self.policy.last_stats() }

    /// The underlying policy, for root-level introspection.
    pub fn policy_mut(&mut self) -> &mut Expectimax { &mut self.policy }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(depth: u32) -> Solver { Solver::with_config(ExpectimaxConfig::fixed_depth(depth)).unwrap() }

    #[test]
    fn it_requires_board() {
        let mut solver = Solver::new();
        assert!(matches!(solver.decide(), Err(SolverError::NoBoard)));
    }

    #[test]
    fn it_rejects_malformed_boards() {
        let mut solver = fixed(1);
        assert!(matches!(
            solver.set_board(&[2, 4]),
            Err(SolverError::InvalidBoard(BoardError::CellCount { found: 2 }))
        ));
        let mut cells = [0; 16];
        cells[15] = 3;
        assert!(matches!(
            solver.set_board(&cells),
            Err(SolverError::InvalidBoard(BoardError::NotPowerOfTwo { index: 15, value: 3 }))
        ));
        assert_eq!(solver.board(), None);
    }

    #[test]
    fn it_keeps_previous_board_on_error() {
        let mut solver = fixed(1);
        let cells = [2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0];
        solver.set_board(&cells).unwrap();
        assert!(solver.set_board(&[3; 16]).is_err());
        assert_eq!(solver.board().map(|b| b.into_cells()), Some(cells));
    }

    #[test]
    fn it_rejects_bad_config() {
        let cfg = ExpectimaxConfig { initial_depth: 5, depth_cap: 2, ..Default::default() };
        assert!(matches!(Solver::with_config(cfg), Err(SolverError::Config(_))));
    }

    #[test]
    fn it_decides_without_touching_board() {
        let mut solver = fixed(2);
        let cells = [2, 2, 4, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 8, 0, 0];
        solver.set_board(&cells).unwrap();
        let first = solver.decide().unwrap();
        let second = solver.decide().unwrap();
        assert!(first.is_some());
        assert_eq!(first, second);
        assert_eq!(solver.board().map(|b| b.into_cells()), Some(cells));
        assert!(solver.last_stats().nodes > 0);
    }

    #[test]
    fn it_reports_no_move_on_stuck_board() {
        let mut solver = fixed(3);
        solver.set_board(&[2, 4, 2, 4, 4, 2, 4, 2, 2, 4, 2, 4, 4, 2, 4, 2]).unwrap();
        assert_eq!(solver.decide().unwrap(), None);
    }
}

//! Game adapters and the decision loop.
//!
//! [`Driver`] owns one [`Solver`] and one live game handle. Each tick reads a
//! snapshot from the game, asks the solver for a move, and applies it.
//! [`SimulatedGame`] is an in-process game with a seeded RNG.
//!
//! ```
//! use ai_2048_solver::driver::{Driver, SimulatedGame};
//! use ai_2048_solver::expectimax::ExpectimaxConfig;
//! use ai_2048_solver::solver::Solver;
//!
//! let solver = Solver::with_config(ExpectimaxConfig::fixed_depth(1)).unwrap();
//! let mut driver = Driver::new(solver, SimulatedGame::new(42));
//! let summary = driver.run(Some(10)).unwrap();
//! assert_eq!(summary.moves, 10);
//! ```

use std::thread;
use std::time::Duration;

use log::{info, warn};
use rand::{rngs::StdRng, SeedableRng};

use crate::engine::{Board, Direction, Score, Tile};
use crate::solver::{Solver, SolverError};

/// The handle a driver needs on a running game.
pub trait Game {
    /// Row-major cell values, 0 for empty.
    fn snapshot(&self) -> Vec<Tile>;
    /// Apply a move. Returns false if the game did not change.
    fn apply(&mut self, dir: Direction) -> bool;
    /// True once no move can change the game.
    fn is_over(&self) -> bool;
    /// Points scored so far.
    fn score(&self) -> Score;
}

/// In-process 2048 game with a seedable RNG for tile spawns.
#[derive(Debug, Clone)]
pub struct SimulatedGame {
    board: Board,
    score: Score,
    moves: u64,
    rng: StdRng,
}

impl SimulatedGame {
    /// New game with two random tiles.
    pub fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let board = Board::EMPTY.with_random_tile(&mut rng).with_random_tile(&mut rng);
        Self { board, score: 0, moves: 0, rng }
    }

    /// Continue from an existing board.
    pub fn from_board(board: Board, seed: u64) -> Self {
        Self { board, score: 0, moves: 0, rng: StdRng::seed_from_u64(seed) }
    }

    pub fn board(&self) -> Board { self.board }

    /// Number of moves that changed the board.
    pub fn moves(&self) -> u64 { self.moves }
}

impl Game for SimulatedGame {
    fn snapshot(&self) -> Vec<Tile> { self.board.cells().to_vec() }

    fn apply(&mut self, dir: Direction) -> bool {
        let (next, gained) = self.board.make_move(dir, &mut self.rng);
        if next == self.board {
            return false;
        }
        self.board = next;
        self.score += gained;
        self.moves += 1;
        true
    }

    fn is_over(&self) -> bool { self.board.is_game_over() }

    fn score(&self) -> Score { self.score }
}

#[derive(thiserror::Error, Debug)]
pub enum DriverError {
    #[error(transparent)]
    Solver(#[from] SolverError),
    #[error("game rejected move {0}")]
    MoveRejected(Direction),
}

/// Outcome of [`Driver::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub moves: u64,
    pub score: Score,
    pub highest_tile: Tile,
    pub board: Board,
    pub game_over: bool,
}

/// Owns one solver and one game and plays moves on it.
pub struct Driver<G: Game> {
    solver: Solver,
    game: G,
}

impl<G: Game> Driver<G> {
    pub fn new(solver: Solver, game: G) -> Self { Self { solver, game } }

    pub fn game(&self) -> &G { &self.game }

    pub fn solver(&self) -> &Solver { &self.solver }

    pub fn into_game(self) -> G { self.game }

    /// Decide and apply one move. Returns `Ok(None)` once the game is over.
    pub fn tick(&mut self) -> Result<Option<Direction>, DriverError> {
        if self.game.is_over() {
            return Ok(None);
        }
        self.solver.set_board(&self.game.snapshot())?;
        let Some(dir) = self.solver.decide()? else {
            return Ok(None);
        };
        if !self.game.apply(dir) {
            warn!("game did not change after {dir}");
            return Err(DriverError::MoveRejected(dir));
        }
        Ok(Some(dir))
    }

    /// Play until the game is over or `max_moves` moves were made.
    pub fn run(&mut self, max_moves: Option<u64>) -> Result<RunSummary, DriverError> {
        self.run_paced(max_moves, Duration::ZERO)
    }

    /// Like [`Self::run`], sleeping `interval` between moves.
    pub fn run_paced(&mut self, max_moves: Option<u64>, interval: Duration) -> Result<RunSummary, DriverError> {
        let mut moves = 0u64;
        let mut game_over = false;
        while max_moves.map_or(true, |limit| moves < limit) {
            if self.tick()?.is_none() {
                game_over = true;
                break;
            }
            moves += 1;
            if !interval.is_zero() {
                thread::sleep(interval);
            }
        }
        let summary = self.summary(moves, game_over)?;
        if game_over {
            info!("game over after {} moves, score {}, highest tile {}", summary.moves, summary.score, summary.highest_tile);
        }
        Ok(summary)
    }

    fn summary(&self, moves: u64, game_over: bool) -> Result<RunSummary, DriverError> {
        let board = Board::try_from_slice(&self.game.snapshot()).map_err(SolverError::from)?;
        Ok(RunSummary { moves, score: self.game.score(), highest_tile: board.highest_tile(), board, game_over })
    }
}

//! ai-2048-solver: an expectimax decision engine for 2048
//!
//! This crate provides:
//! - A `Board` value type with the primitives the search is built on
//!   (`compact_left`, `merge_left`, `rotate_90`) plus game helpers
//! - An Expectimax policy (`expectimax` module) whose depth is grown per
//!   decision until a node budget or depth cap is hit
//! - A `Solver` with the `set_board`/`decide` surface an external game driver uses
//! - A `Driver` that plays a `Game` (e.g. the in-process `SimulatedGame`) with a solver
//!
//! Quick start:
//! ```
//! use ai_2048_solver::engine::{Board, Direction};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! // Deterministic board initialization with a seeded RNG
//! let mut rng = StdRng::seed_from_u64(42);
//! let b0 = Board::EMPTY.with_random_tile(&mut rng).with_random_tile(&mut rng);
//! let (b1, score) = b0.apply(Direction::Left);
//! assert!(b1.sum() == b0.sum() && score % 4 == 0);
//! ```
//!
//! Deciding a move for a board read from somewhere else
//! ```
//! use ai_2048_solver::solver::Solver;
//!
//! let mut solver = Solver::new();
//! solver.set_board(&[0, 2, 2, 4, 2, 0, 2, 8, 4, 8, 0, 4, 0, 0, 2, 0]).unwrap();
//! let dir = solver.decide().unwrap();
//! assert!(dir.is_some());
//! ```
//!
//! Full loop (simplest possible)
//! ```
//! use ai_2048_solver::driver::{Driver, Game, SimulatedGame};
//! use ai_2048_solver::expectimax::ExpectimaxConfig;
//! use ai_2048_solver::solver::Solver;
//!
//! let solver = Solver::with_config(ExpectimaxConfig::fixed_depth(1)).unwrap();
//! let mut driver = Driver::new(solver, SimulatedGame::new(123));
//! // Keep doctests fast: a handful of moves
//! let summary = driver.run(Some(4)).unwrap();
//! assert_eq!(summary.moves, 4);
//! assert_eq!(summary.score, driver.game().score());
//! ```
//!
pub mod driver;
pub mod engine;
pub mod expectimax;
pub mod solver;

use serde::{Deserialize, Serialize};

use crate::engine::{Board, Tile};

/// Weights of the leaf heuristic.
///
/// The defaults are tuned constants; treat them as knobs, not invariants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicWeights {
    /// Reward per unit of tile value on the board.
    pub sum_weight: f64,
    /// Penalty per unit of absolute difference between neighbouring cells.
    pub roughness_weight: f64,
}

impl Default for HeuristicWeights {
    fn default() -> Self { Self { sum_weight: 4.0, roughness_weight: 2.0 } }
}

/// Static board score: tile mass minus local roughness.
///
/// ```
/// use ai_2048_solver::engine::Board;
/// use ai_2048_solver::expectimax::{heuristic, HeuristicWeights};
/// let b = Board::try_from_slice(&[2, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]).unwrap();
/// // 4 * 4 - 2 * (|2 - 0| horizontally + |2 - 0| + |2 - 0| vertically)
/// assert_eq!(heuristic(b, &HeuristicWeights::default()), 4.0);
/// ```
pub fn heuristic(board: Board, weights: &HeuristicWeights) -> f64 {
    let cells = board.cells();
    let mass = cells.iter().map(|&v| f64::from(v)).sum::<f64>();
    weights.sum_weight * mass - weights.roughness_weight * roughness(cells)
}

// Rows never wrap into the next row; columns stop at the last row.
fn roughness(cells: &[Tile; 16]) -> f64 {
    (0..16).fold(0.0, |acc, idx| {
        let horizontal = if idx % 4 != 3 { cells[idx].abs_diff(cells[idx + 1]) } else { 0 };
        let vertical = if idx < 12 { cells[idx].abs_diff(cells[idx + 4]) } else { 0 };
        acc + f64::from(horizontal) + f64::from(vertical)
    })
}

use rand::Rng;
use std::fmt;

/// Value held by a single cell: 0 for empty, otherwise a power of two.
pub type Tile = u32;
/// Points gained from merges.
pub type Score = u64;

const SIZE: usize = 4;
const CELLS: usize = SIZE * SIZE;

/// Largest tile a board accepts: 2^18, the highest tile a 4x4 game can build.
///
/// Sixteen such tiles sum to 2^22, so merges made during a search stay far
/// below `u32::MAX`.
pub const MAX_TILE: Tile = 1 << 18;

type Cells = [Tile; CELLS];

/// A direction to move/merge tiles.
///
/// The discriminant is the number of clockwise quarter turns applied before
/// merging left, so `Direction::ALL[i]` is the move simulated by `i` rotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Direction {
    Left = 0,
    Down = 1,
    Right = 2,
    Up = 3,
}

impl Direction {
    /// All four directions in rotation order.
    pub const ALL: [Direction; 4] = [Direction::Left, Direction::Down, Direction::Right, Direction::Up];

    /// Canonical index, equal to the number of clockwise rotations.
    #[inline]
    pub fn index(self) -> usize { self as usize }

    /// Inverse of [`Direction::index`]. Returns None for values outside 0..4.
    pub fn from_index(idx: usize) -> Option<Self> { Self::ALL.get(idx).copied() }

    /// Keyboard code used by the classic 2048 web game (0=up, 1=right, 2=down, 3=left).
    pub fn ui_code(self) -> u8 {
        match self {
            Direction::Up => 0,
            Direction::Right => 1,
            Direction::Down => 2,
            Direction::Left => 3,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Left => "left",
            Direction::Down => "down",
            Direction::Right => "right",
            Direction::Up => "up",
        };
        f.write_str(name)
    }
}

/// Rejected board input.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("expected 16 cells, got {found}")]
    CellCount { found: usize },
    #[error("cell {index} holds {value}, which is neither empty nor a power of two")]
    NotPowerOfTwo { index: usize, value: Tile },
    #[error("cell {index} holds {value}, above the largest tile 262144")]
    TileTooLarge { index: usize, value: Tile },
}

/// Flat row-major 4x4 2048 board.
///
/// Each cell stores the tile value itself (2, 4, 8, ...), with 0 for empty.
/// `Board` is `Copy`; every transformation returns a new board.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Board(Cells);

impl Board {
    /// A constant empty board (all zeros).
    pub const EMPTY: Board = Board([0; CELLS]);

    /// Build a board from exactly 16 row-major cell values.
    ///
    /// ```
    /// use ai_2048_solver::engine::{Board, BoardError};
    /// assert!(Board::try_from_slice(&[0; 16]).is_ok());
    /// assert_eq!(Board::try_from_slice(&[2; 15]), Err(BoardError::CellCount { found: 15 }));
    /// ```
    pub fn try_from_slice(values: &[Tile]) -> Result<Self, BoardError> {
        let cells: Cells = values
            .try_into()
            .map_err(|_| BoardError::CellCount { found: values.len() })?;
        Self::from_cells(cells)
    }

    /// Build a board from a cell array, checking that every tile is 0 or a
    /// power of two no larger than [`MAX_TILE`].
    pub fn from_cells(cells: Cells) -> Result<Self, BoardError> {
        for (index, &value) in cells.iter().enumerate() {
            if value != 0 && !value.is_power_of_two() {
                return Err(BoardError::NotPowerOfTwo { index, value });
            }
            if value > MAX_TILE {
                return Err(BoardError::TileTooLarge { index, value });
            }
        }
        Ok(Board(cells))
    }

    /// Borrow the row-major cells.
    #[inline]
    pub fn cells(&self) -> &Cells { &self.0 }

    /// Consume this `Board`, returning its cells.
    #[inline]
    pub fn into_cells(self) -> Cells { self.0 }

    /// Value at row-major index `idx` (0 if empty).
    ///
    /// # Panics
    /// If `idx` is 16 or more.
    #[inline]
    pub fn get(self, idx: usize) -> Tile { self.0[idx] }

    /// Copy of this board with cell `idx` set to `value`.
    ///
    /// # Panics
    /// If `idx` is 16 or more.
    #[inline]
    pub fn with_tile(self, idx: usize, value: Tile) -> Self {
        let mut cells = self.0;
        cells[idx] = value;
        Board(cells)
    }

    /// Slide every non-zero cell of each row to the row start, preserving order. No merging.
    ///
    /// ```
    /// use ai_2048_solver::engine::Board;
    /// let b = Board::try_from_slice(&[0, 2, 2, 4, 2, 0, 2, 8, 4, 8, 0, 4, 0, 0, 2, 0]).unwrap();
    /// assert_eq!(
    ///     b.compact_left().cells(),
    ///     &[2, 2, 4, 0, 2, 2, 8, 0, 4, 8, 4, 0, 2, 0, 0, 0]
    /// );
    /// ```
    pub fn compact_left(self) -> Self {
        let mut cells = self.0;
        for row in cells.chunks_exact_mut(SIZE) {
            compact_row(row);
        }
        Board(cells)
    }

    /// Compact left, then merge equal neighbours once per pass in each row.
    ///
    /// Returns the new board and the sum of all values created by merges.
    pub fn merge_left(self) -> (Self, Score) {
        let mut cells = self.0;
        let score: Score = cells.chunks_exact_mut(SIZE).map(merge_row).sum();
        (Board(cells), score)
    }

    /// Rotate the board a quarter turn clockwise.
    ///
    /// Four rotations return the original board.
    pub fn rotate_90(self) -> Self {
        Board(std::array::from_fn(|idx| {
            let (row, col) = (idx / SIZE, idx % SIZE);
            self.0[(SIZE - 1 - col) * SIZE + row]
        }))
    }

    /// Apply `times` clockwise quarter turns.
    pub fn rotate(self, times: usize) -> Self {
        (0..times % 4).fold(self, |b, _| b.rotate_90())
    }

    /// Slide/merge tiles in `dir`, returning the board in its original orientation
    /// together with the merge score. No random insert.
    ///
    /// ```
    /// use ai_2048_solver::engine::{Board, Direction};
    /// let b = Board::try_from_slice(&[2, 0, 0, 0, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]).unwrap();
    /// let (up, score) = b.apply(Direction::Up);
    /// assert_eq!(up.get(0), 4);
    /// assert_eq!(score, 4);
    /// ```
    pub fn apply(self, dir: Direction) -> (Self, Score) {
        let turns = dir.index();
        let (merged, score) = self.rotate(turns).merge_left();
        (merged.rotate(4 - turns), score)
    }

    /// Like [`Board::apply`] but drops the score.
    #[inline]
    pub fn shift(self, dir: Direction) -> Self { self.apply(dir).0 }

    /// Insert a 2 (90%) or 4 (10%) tile into a uniformly chosen empty cell.
    ///
    /// A full board is returned unchanged.
    ///
    /// ```
    /// use ai_2048_solver::engine::Board;
    /// use rand::{SeedableRng, rngs::StdRng};
    /// let mut rng = StdRng::seed_from_u64(123);
    /// let b = Board::EMPTY.with_random_tile(&mut rng).with_random_tile(&mut rng);
    /// assert_eq!(b.count_empty(), 14);
    /// ```
    pub fn with_random_tile<R: Rng + ?Sized>(self, rng: &mut R) -> Self {
        let empty = self.count_empty();
        if empty == 0 {
            return self;
        }
        let pick = rng.gen_range(0..empty);
        let tile = if rng.gen_range(0..10) < 9 { 2 } else { 4 };
        match self.empty_cells().nth(pick) {
            Some(idx) => self.with_tile(idx, tile),
            None => self,
        }
    }

    /// Perform a move, then insert a random tile if the move changed the board.
    ///
    /// Returns the new board and the merge score (0 for a no-op move).
    pub fn make_move<R: Rng + ?Sized>(self, dir: Direction, rng: &mut R) -> (Self, Score) {
        let (moved, score) = self.apply(dir);
        if moved != self { (moved.with_random_tile(rng), score) } else { (self, 0) }
    }

    /// Count the number of empty cells on the board.
    #[inline]
    pub fn count_empty(self) -> usize { self.0.iter().filter(|&&v| v == 0).count() }

    /// Row-major indices of the empty cells, in ascending order.
    pub fn empty_cells(self) -> impl Iterator<Item = usize> {
        (0..CELLS).filter(move |&idx| self.0[idx] == 0)
    }

    /// Sum of all tile values.
    pub fn sum(self) -> u64 { self.0.iter().map(|&v| u64::from(v)).sum() }

    /// Return the highest tile value (e.g., 2048) present on the board.
    pub fn highest_tile(self) -> Tile { self.0.iter().copied().max().unwrap_or(0) }

    /// Return true if no direction changes the board.
    ///
    /// ```
    /// use ai_2048_solver::engine::Board;
    /// // Nothing can slide on an empty board.
    /// assert!(Board::EMPTY.is_game_over());
    /// ```
    pub fn is_game_over(self) -> bool {
        Direction::ALL.iter().all(|&dir| self.shift(dir) == self)
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board({:?})", self.0)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        for (row_idx, row) in self.0.chunks_exact(SIZE).enumerate() {
            if row_idx > 0 {
                writeln!(f, "{}", "-".repeat(31))?;
            }
            let line: Vec<String> = row.iter().map(|&v| format_val(v)).collect();
            writeln!(f, "{}", line.join("|"))?;
        }
        Ok(())
    }
}

impl TryFrom<&[Tile]> for Board {
    type Error = BoardError;
    fn try_from(values: &[Tile]) -> Result<Self, Self::Error> { Board::try_from_slice(values) }
}

impl From<Board> for Cells { fn from(b: Board) -> Self { b.into_cells() } }

fn format_val(val: Tile) -> String {
    match val {
        0 => " ".repeat(7),
        v => format!("{v:^7}"),
    }
}

fn compact_row(row: &mut [Tile]) {
    let mut write = 0;
    for read in 0..row.len() {
        if row[read] != 0 {
            // Everything in write..read is zero, so the swap only moves the tile.
            row.swap(write, read);
            write += 1;
        }
    }
}

fn merge_row(row: &mut [Tile]) -> Score {
    compact_row(row);
    let mut score = 0;
    let mut idx = 0;
    while idx + 1 < row.len() {
        if row[idx] != 0 && row[idx] == row[idx + 1] {
            // Tiles start at most MAX_TILE, so doubling cannot overflow.
            row[idx] *= 2;
            score += Score::from(row[idx]);
            row.copy_within(idx + 2.., idx + 1);
            if let Some(last) = row.last_mut() {
                *last = 0;
            }
        }
        idx += 1;
    }
    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn board(cells: [Tile; 16]) -> Board { Board::from_cells(cells).unwrap() }

    fn row_merge(mut row: [Tile; 4]) -> ([Tile; 4], Score) {
        let score = merge_row(&mut row);
        (row, score)
    }

    fn random_boards(seed: u64, count: usize) -> Vec<Board> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut boards = Vec::with_capacity(count);
        let mut b = Board::EMPTY.with_random_tile(&mut rng).with_random_tile(&mut rng);
        for i in 0..count {
            boards.push(b);
            let (next, _) = b.make_move(Direction::ALL[i % 4], &mut rng);
            b = if next.is_game_over() { Board::EMPTY.with_random_tile(&mut rng) } else { next };
        }
        boards
    }

    #[test]
    fn it_compact_left_documented_example() {
        let b = board([0, 2, 2, 4, 2, 0, 2, 8, 4, 8, 0, 4, 0, 0, 2, 0]);
        assert_eq!(b.compact_left(), board([2, 2, 4, 0, 2, 2, 8, 0, 4, 8, 4, 0, 2, 0, 0, 0]));
    }

    #[test]
    fn it_compact_left_idempotent() {
        for b in random_boards(11, 64) {
            let once = b.compact_left();
            assert_eq!(once.compact_left(), once);
        }
    }

    #[test]
    fn it_merge_row() {
        assert_eq!(row_merge([2, 2, 4, 0]), ([4, 4, 0, 0], 4));
        assert_eq!(row_merge([0, 0, 0, 0]), ([0, 0, 0, 0], 0));
        assert_eq!(row_merge([2, 4, 2, 4]), ([2, 4, 2, 4], 0));
        assert_eq!(row_merge([2, 2, 2, 2]), ([4, 4, 0, 0], 8));
        assert_eq!(row_merge([4, 0, 0, 4]), ([8, 0, 0, 0], 8));
        assert_eq!(row_merge([0, 2, 2, 2]), ([4, 2, 0, 0], 4));
        assert_eq!(row_merge([8, 4, 4, 0]), ([8, 8, 0, 0], 8));
    }

    #[test]
    fn it_merge_left_whole_board() {
        let b = board([2, 2, 4, 0, 0, 4, 4, 4, 8, 0, 8, 16, 2, 4, 8, 16]);
        let (merged, score) = b.merge_left();
        assert_eq!(merged, board([4, 4, 0, 0, 8, 4, 0, 0, 16, 16, 0, 0, 2, 4, 8, 16]));
        assert_eq!(score, 4 + 8 + 16);
    }

    #[test]
    fn it_merge_left_keeps_or_grows_sum() {
        for b in random_boards(5, 64) {
            let (merged, score) = b.merge_left();
            assert!(merged.sum() >= b.sum());
            // Every merged value is at least 4, and no score without a freed cell.
            let freed = merged.count_empty() - b.count_empty();
            assert!(score >= 4 * freed as u64);
            assert_eq!(score == 0, freed == 0);
        }
    }

    #[test]
    fn it_merge_left_fixed_point() {
        let b = board([2, 4, 8, 16, 4, 8, 16, 32, 2, 4, 0, 0, 64, 0, 0, 0]);
        assert_eq!(b.merge_left(), (b, 0));
    }

    #[test]
    fn it_rotate_90() {
        let b = board([2, 4, 8, 16, 32, 64, 128, 256, 512, 1024, 2048, 4096, 0, 0, 0, 2]);
        assert_eq!(
            b.rotate_90(),
            board([0, 512, 32, 2, 0, 1024, 64, 4, 0, 2048, 128, 8, 2, 4096, 256, 16])
        );
    }

    #[test]
    fn it_rotate_four_times_is_identity() {
        for b in random_boards(17, 64) {
            assert_eq!(b.rotate_90().rotate_90().rotate_90().rotate_90(), b);
            assert_eq!(b.rotate(4), b);
        }
    }

    #[test]
    fn it_apply_each_direction() {
        let b = board([2, 0, 0, 2, 0, 0, 0, 0, 0, 0, 0, 0, 2, 0, 0, 0]);
        assert_eq!(b.apply(Direction::Left), (board([4, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 2, 0, 0, 0]), 4));
        assert_eq!(b.apply(Direction::Right), (board([0, 0, 0, 4, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 2]), 4));
        assert_eq!(b.apply(Direction::Up), (board([4, 0, 0, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]), 4));
        assert_eq!(b.apply(Direction::Down), (board([0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 4, 0, 0, 2]), 4));
    }

    #[test]
    fn it_rotation_simulates_direction() {
        // One clockwise turn then merge-left moves tiles towards the bottom row.
        let b = board([2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        let (merged, _) = b.rotate_90().merge_left();
        assert_eq!(merged.rotate(3), board([0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 2, 0, 0, 0]));
    }

    #[test]
    fn it_validates_input() {
        assert_eq!(Board::try_from_slice(&[0; 17]), Err(BoardError::CellCount { found: 17 }));
        let mut cells = [0; 16];
        cells[5] = 6;
        assert_eq!(Board::try_from_slice(&cells), Err(BoardError::NotPowerOfTwo { index: 5, value: 6 }));
        cells[5] = 8;
        assert_eq!(Board::try_from_slice(&cells).map(|b| b.get(5)), Ok(8));
    }

    #[test]
    fn it_rejects_oversized_tiles() {
        let mut cells = [0; 16];
        cells[7] = MAX_TILE << 1;
        assert_eq!(Board::from_cells(cells), Err(BoardError::TileTooLarge { index: 7, value: MAX_TILE << 1 }));
        cells[7] = 1 << 31;
        assert_eq!(Board::from_cells(cells), Err(BoardError::TileTooLarge { index: 7, value: 1 << 31 }));
        cells[7] = MAX_TILE;
        assert!(Board::from_cells(cells).is_ok());
    }

    #[test]
    fn it_merges_largest_tiles_exactly() {
        let b = board([MAX_TILE, MAX_TILE, MAX_TILE, MAX_TILE, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        let (merged, score) = b.merge_left();
        assert_eq!(merged.cells()[..4], [MAX_TILE * 2, MAX_TILE * 2, 0, 0]);
        assert!(merged.highest_tile().is_power_of_two());
        assert_eq!(score, 4 * Score::from(MAX_TILE));
        let (merged, score) = merged.merge_left();
        assert_eq!(merged.highest_tile(), MAX_TILE * 4);
        assert_eq!(score, 4 * Score::from(MAX_TILE));
    }

    #[test]
    #[should_panic]
    fn it_get_panics_out_of_range() {
        Board::EMPTY.get(16);
    }

    #[test]
    fn it_random_tile_fills_board() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut b = Board::EMPTY;
        for _ in 0..16 {
            b = b.with_random_tile(&mut rng);
        }
        assert_eq!(b.count_empty(), 0);
        assert!(b.cells().iter().all(|&v| v == 2 || v == 4));
        assert_eq!(b.with_random_tile(&mut rng), b);
    }

    #[test]
    fn it_game_over() {
        let stuck = board([2, 4, 2, 4, 4, 2, 4, 2, 2, 4, 2, 4, 4, 2, 4, 2]);
        assert!(stuck.is_game_over());
        assert!(!stuck.with_tile(0, 4).is_game_over());
    }

    #[test]
    fn it_direction_codes() {
        for (i, dir) in Direction::ALL.iter().enumerate() {
            assert_eq!(dir.index(), i);
            assert_eq!(Direction::from_index(i), Some(*dir));
        }
        assert_eq!(Direction::from_index(4), None);
        assert_eq!(Direction::Up.ui_code(), 0);
        assert_eq!(Direction::Left.ui_code(), 3);
    }

    #[test]
    fn it_highest_and_sum() {
        let b = board([0, 2, 4, 0, 0, 0, 1024, 0, 0, 0, 0, 0, 0, 0, 0, 2]);
        assert_eq!(b.highest_tile(), 1024);
        assert_eq!(b.sum(), 1032);
        assert_eq!(b.empty_cells().count(), 12);
        assert_eq!(b.empty_cells().next(), Some(0));
    }
}

use std::{fmt, iter};

use arrayvec::ArrayVec;

use super::piece::{Piece, PieceKind};

/// Largest supported number of rows.
pub const MAX_ROWS: usize = 32;
/// Largest supported number of columns.
pub const MAX_COLUMNS: usize = 16;

const MAX_CELLS: usize = MAX_ROWS * MAX_COLUMNS;

/// A single cell of a [`Board`] or [`Piece`] matrix.
///
/// The piece kind stored in an occupied cell is an identity/color tag only;
/// no board logic depends on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Block {
    /// Empty cell.
    #[default]
    Empty,
    /// Cell occupied by a locked (or falling) piece of the given kind.
    Piece(PieceKind),
}

impl Block {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Block::Empty
    }

    #[must_use]
    pub fn is_occupied(self) -> bool {
        !self.is_empty()
    }
}

/// Occupancy grid with line clearing and board-quality metrics.
///
/// Cells live in one contiguous fixed-capacity buffer, so cloning a board
/// during search is a plain copy with no heap allocation.
///
/// # Coordinate System
///
/// - Row 0 is the top of the board, rows grow downward
/// - Column 0 is the left edge, columns grow rightward
/// - Rows above the board (negative) never hold cells
///
/// # Example
///
/// ```
/// use autotris_engine::{Block, Board, PieceKind};
///
/// let mut board = Board::new(4, 3);
/// for column in 0..3 {
///     board.set_cell(3, column, Block::Piece(PieceKind::I));
/// }
/// board.set_cell(2, 1, Block::Piece(PieceKind::T));
///
/// assert_eq!(board.lines(), 1);
/// assert_eq!(board.clear_lines(), 1);
/// assert_eq!(board.cell(3, 1), Block::Piece(PieceKind::T));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: usize,
    columns: usize,
    cells: ArrayVec<Block, MAX_CELLS>,
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

impl Board {
    /// Row count of the standard board (two hidden spawn rows + 20 visible rows).
    pub const STANDARD_ROWS: usize = 22;
    /// Column count of the standard board.
    pub const STANDARD_COLUMNS: usize = 10;

    /// Creates an empty board.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero or exceeds [`MAX_ROWS`] / [`MAX_COLUMNS`].
    #[must_use]
    pub fn new(rows: usize, columns: usize) -> Self {
        assert!(
            (1..=MAX_ROWS).contains(&rows),
            "board rows must be in 1..={MAX_ROWS}, got {rows}"
        );
        assert!(
            (1..=MAX_COLUMNS).contains(&columns),
            "board columns must be in 1..={MAX_COLUMNS}, got {columns}"
        );
        let mut cells = ArrayVec::new();
        cells.extend(iter::repeat_n(Block::Empty, rows * columns));
        Self {
            rows,
            columns,
            cells,
        }
    }

    /// Creates an empty 22×10 board.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(Self::STANDARD_ROWS, Self::STANDARD_COLUMNS)
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn columns(&self) -> usize {
        self.columns
    }

    fn index(&self, row: usize, column: usize) -> usize {
        assert!(
            row < self.rows && column < self.columns,
            "cell ({row}, {column}) is outside a {}x{} board",
            self.rows,
            self.columns
        );
        row * self.columns + column
    }

    #[must_use]
    pub fn cell(&self, row: usize, column: usize) -> Block {
        self.cells[self.index(row, column)]
    }

    pub fn set_cell(&mut self, row: usize, column: usize, block: Block) {
        let index = self.index(row, column);
        self.cells[index] = block;
    }

    /// Returns the cells of a single row, left to right.
    #[must_use]
    pub fn row(&self, row: usize) -> &[Block] {
        let start = self.index(row, 0);
        &self.cells[start..start + self.columns]
    }

    /// Returns whether a piece cell may sit at the given (possibly off-board) position.
    ///
    /// Columns must be on the board and rows must not go below it. Rows above
    /// the board are always free.
    fn is_free(&self, row: i32, column: i32) -> bool {
        let Ok(column) = usize::try_from(column) else {
            return false;
        };
        if column >= self.columns {
            return false;
        }
        let Ok(row) = usize::try_from(row) else {
            return true;
        };
        row < self.rows && self.cell(row, column).is_empty()
    }

    /// Returns whether every occupied cell of `piece` lies on a free, in-bounds cell.
    ///
    /// Cells above the top edge are tolerated.
    #[must_use]
    pub fn valid(&self, piece: &Piece) -> bool {
        piece
            .occupied_cells()
            .all(|(row, column)| self.is_free(row, column))
    }

    /// Merges the piece into the board.
    ///
    /// Cells above the top edge are dropped. The placement is not validated;
    /// callers check [`Self::valid`] first.
    pub fn add_piece(&mut self, piece: &Piece) {
        let block = Block::Piece(piece.kind());
        for (row, column) in piece.occupied_cells() {
            let (Ok(row), Ok(column)) = (usize::try_from(row), usize::try_from(column)) else {
                continue;
            };
            self.set_cell(row, column, block);
        }
    }

    fn is_line(&self, row: usize) -> bool {
        self.row(row).iter().all(|block| block.is_occupied())
    }

    fn is_empty_row(&self, row: usize) -> bool {
        self.row(row).iter().all(|block| block.is_empty())
    }

    fn clear_row(&mut self, row: usize) {
        let start = self.index(row, 0);
        self.cells[start..start + self.columns].fill(Block::Empty);
    }

    /// Clears full rows and returns how many were cleared.
    ///
    /// Rows are scanned bottom-up in a single pass; every non-full row drops by
    /// the number of full rows found below it.
    pub fn clear_lines(&mut self) -> usize {
        let mut distance = 0;
        for row in (0..self.rows).rev() {
            if self.is_line(row) {
                distance += 1;
                self.clear_row(row);
            } else if distance > 0 {
                let start = self.index(row, 0);
                let target = self.index(row + distance, 0);
                self.cells.copy_within(start..start + self.columns, target);
                self.clear_row(row);
            }
        }
        distance
    }

    /// Distance from the bottom to the topmost non-empty row.
    #[must_use]
    pub fn height(&self) -> usize {
        let top = (0..self.rows)
            .find(|&row| !self.is_empty_row(row))
            .unwrap_or(self.rows);
        self.rows - top
    }

    /// Number of full rows (not yet cleared).
    #[must_use]
    pub fn lines(&self) -> usize {
        (0..self.rows).filter(|&row| self.is_line(row)).count()
    }

    /// Number of empty cells with at least one occupied cell above them in the same column.
    #[must_use]
    pub fn holes(&self) -> usize {
        let mut count = 0;
        for column in 0..self.columns {
            let mut covered = false;
            for row in 0..self.rows {
                if self.cell(row, column).is_occupied() {
                    covered = true;
                } else if covered {
                    count += 1;
                }
            }
        }
        count
    }

    /// Number of occupied cells with at least one empty cell below them in the same column.
    #[must_use]
    pub fn blockades(&self) -> usize {
        let mut count = 0;
        for column in 0..self.columns {
            let mut hole = false;
            for row in (0..self.rows).rev() {
                if self.cell(row, column).is_empty() {
                    hole = true;
                } else if hole {
                    count += 1;
                }
            }
        }
        count
    }

    /// Distance from the bottom to the topmost occupied cell of the column.
    #[must_use]
    pub fn column_height(&self, column: usize) -> usize {
        let top = (0..self.rows)
            .find(|&row| self.cell(row, column).is_occupied())
            .unwrap_or(self.rows);
        self.rows - top
    }

    /// Sum of all column heights.
    #[must_use]
    pub fn aggregate_height(&self) -> usize {
        (0..self.columns).map(|c| self.column_height(c)).sum()
    }

    /// Sum of absolute height differences between adjacent columns.
    #[must_use]
    pub fn bumpiness(&self) -> usize {
        (1..self.columns)
            .map(|c| usize::abs_diff(self.column_height(c - 1), self.column_height(c)))
            .sum()
    }

    /// Returns whether either of the two topmost rows holds a cell (game over).
    #[must_use]
    pub fn exceeded(&self) -> bool {
        (0..self.rows.min(2)).any(|row| !self.is_empty_row(row))
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows {
            for block in self.row(row) {
                let ch = match block {
                    Block::Empty => '.',
                    Block::Piece(kind) => kind.as_char(),
                };
                write!(f, "{ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

use super::board::{Block, Board};

/// A tetromino cell matrix anchored on the board.
///
/// The anchor `(row, column)` is the board position of the matrix's top-left
/// cell. The row may be negative while the piece spawns or rotates above the
/// visible area. Pieces are `Copy`, so searching by value never touches the
/// caller's piece.
///
/// # Example
///
/// ```
/// use autotris_engine::{Board, Piece, PieceKind};
///
/// let board = Board::standard();
/// let mut piece = Piece::from_kind(PieceKind::T, board.columns());
/// assert_eq!((piece.row(), piece.column()), (0, 3));
///
/// assert!(piece.rotate(&board));
/// while piece.move_left(&board) {}
/// while piece.move_down(&board) {}
/// assert!(board.valid(&piece));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    kind: PieceKind,
    cells: PieceCells,
    rotation: u8,
    row: i32,
    column: i32,
}

/// Translation applied to a rotated piece so that it fits the board.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RotateOffset {
    pub row_offset: i32,
    pub column_offset: i32,
}

impl RotateOffset {
    pub const ZERO: Self = Self {
        row_offset: 0,
        column_offset: 0,
    };
}

impl Piece {
    /// Creates a piece at its spawn position: row 0, horizontally centered
    /// on a board with `columns` columns.
    ///
    /// # Panics
    ///
    /// Panics if the board is narrower than the piece matrix.
    #[must_use]
    pub fn from_kind(kind: PieceKind, columns: usize) -> Self {
        let dimension = kind.dimension();
        assert!(
            columns >= dimension,
            "{columns} columns cannot hold a {dimension}x{dimension} piece"
        );
        #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
        let column = ((columns - dimension) / 2) as i32;
        Self {
            kind,
            cells: PIECE_CELLS[kind.index()],
            rotation: 0,
            row: 0,
            column,
        }
    }

    /// Returns a copy of this piece moved to the given anchor.
    #[must_use]
    pub fn with_position(self, row: i32, column: i32) -> Self {
        Self {
            row,
            column,
            ..self
        }
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub fn dimension(&self) -> usize {
        self.kind.dimension()
    }

    #[must_use]
    pub fn row(&self) -> i32 {
        self.row
    }

    #[must_use]
    pub fn column(&self) -> i32 {
        self.column
    }

    /// Number of clockwise quarter turns applied since spawn, modulo 4.
    #[must_use]
    pub fn rotation(&self) -> u8 {
        self.rotation
    }

    /// Returns the matrix cell at `(r, c)`.
    ///
    /// # Panics
    ///
    /// Panics if `r` or `c` is outside the piece matrix.
    #[must_use]
    pub fn cell(&self, r: usize, c: usize) -> Block {
        let dimension = self.dimension();
        assert!(
            r < dimension && c < dimension,
            "cell ({r}, {c}) is outside a {dimension}x{dimension} piece"
        );
        self.cells[r][c]
    }

    /// Returns the board coordinates `(row, column)` of every occupied cell.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        let dimension = self.dimension();
        self.cells[..dimension]
            .iter()
            .zip(self.row..)
            .flat_map(move |(cells, row)| {
                cells[..dimension]
                    .iter()
                    .zip(self.column..)
                    .filter(|(cell, _)| cell.is_occupied())
                    .map(move |(_, column)| (row, column))
            })
    }

    fn translated(self, row_offset: i32, column_offset: i32) -> Self {
        self.with_position(self.row + row_offset, self.column + column_offset)
    }

    #[must_use]
    pub fn can_move_left(&self, board: &Board) -> bool {
        board.valid(&self.translated(0, -1))
    }

    #[must_use]
    pub fn can_move_right(&self, board: &Board) -> bool {
        board.valid(&self.translated(0, 1))
    }

    #[must_use]
    pub fn can_move_down(&self, board: &Board) -> bool {
        board.valid(&self.translated(1, 0))
    }

    /// Moves one column left if possible; returns whether the piece moved.
    pub fn move_left(&mut self, board: &Board) -> bool {
        if !self.can_move_left(board) {
            return false;
        }
        self.column -= 1;
        true
    }

    /// Moves one column right if possible; returns whether the piece moved.
    pub fn move_right(&mut self, board: &Board) -> bool {
        if !self.can_move_right(board) {
            return false;
        }
        self.column += 1;
        true
    }

    /// Moves one row down if possible; returns whether the piece moved.
    pub fn move_down(&mut self, board: &Board) -> bool {
        if !self.can_move_down(board) {
            return false;
        }
        self.row += 1;
        true
    }

    /// Replaces the cell matrix with its 90° clockwise rotation.
    ///
    /// The anchor is left untouched; use [`Self::rotate`] for a board-aware
    /// rotation with wall kicks.
    pub fn rotate_cells(&mut self) {
        let dimension = self.dimension();
        let table = &ROTATION_TABLES[dimension - 2];
        let mut rotated = EMPTY_CELLS;
        for (rotated_row, sources) in rotated.iter_mut().zip(table).take(dimension) {
            for (cell, &(r, c)) in rotated_row.iter_mut().zip(sources).take(dimension) {
                *cell = self.cells[usize::from(r)][usize::from(c)];
            }
        }
        self.cells = rotated;
        self.rotation = (self.rotation + 1) % 4;
    }

    /// Finds the translation that makes the clockwise-rotated piece fit the board.
    ///
    /// Candidates are tried in a fixed order and the first fit wins:
    ///
    /// 1. the unchanged anchor
    /// 2. shifted right by `i` columns for `i` in `0..d-1`, each first at the
    ///    original row and then lifted by `j` rows for `j` in `0..d-1`
    /// 3. the same sequence shifted left
    ///
    /// where `d` is the piece dimension. Returns `None` when nothing fits.
    #[must_use]
    pub fn compute_rotate_offset(&self, board: &Board) -> Option<RotateOffset> {
        let mut rotated = *self;
        rotated.rotate_cells();
        if board.valid(&rotated) {
            return Some(RotateOffset::ZERO);
        }
        kick_offsets(self.kind.size()).find(|offset| {
            board.valid(&rotated.translated(offset.row_offset, offset.column_offset))
        })
    }

    /// Rotates clockwise with wall kicks.
    ///
    /// Returns `false` and leaves the piece unchanged when no kick fits.
    pub fn rotate(&mut self, board: &Board) -> bool {
        let Some(offset) = self.compute_rotate_offset(board) else {
            return false;
        };
        self.rotate_cells();
        self.row += offset.row_offset;
        self.column += offset.column_offset;
        true
    }
}

/// Kick candidates tried after the unchanged anchor fails.
fn kick_offsets(size: u8) -> impl Iterator<Item = RotateOffset> {
    let reach = i32::from(size) - 1;
    [1, -1].into_iter().flat_map(move |direction| {
        (0..reach).flat_map(move |i| {
            (0..reach).map(move |j| RotateOffset {
                row_offset: -j,
                column_offset: direction * i,
            })
        })
    })
}

/// The seven tetromino kinds, in catalog order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PieceKind {
    /// O-piece.
    O = 0,
    /// J-piece.
    J = 1,
    /// L-piece.
    L = 2,
    /// Z-piece.
    Z = 3,
    /// S-piece.
    S = 4,
    /// T-piece.
    T = 5,
    /// I-piece.
    I = 6,
}

impl PieceKind {
    /// Number of piece kinds (7).
    pub const LEN: usize = 7;

    /// All kinds in catalog order.
    pub const ALL: [Self; Self::LEN] = [
        PieceKind::O,
        PieceKind::J,
        PieceKind::L,
        PieceKind::Z,
        PieceKind::S,
        PieceKind::T,
        PieceKind::I,
    ];

    /// Returns the catalog index (0–6).
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Looks up a kind by catalog index.
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < Self::LEN {
            Some(Self::ALL[index])
        } else {
            None
        }
    }

    const fn size(self) -> u8 {
        match self {
            PieceKind::O => 2,
            PieceKind::I => 4,
            PieceKind::J | PieceKind::L | PieceKind::Z | PieceKind::S | PieceKind::T => 3,
        }
    }

    /// Side length of the piece matrix.
    #[must_use]
    pub const fn dimension(self) -> usize {
        self.size() as usize
    }

    /// Display color as `0xRRGGBB`.
    #[must_use]
    pub const fn color(self) -> u32 {
        match self {
            PieceKind::O => 0x00_00aa,
            PieceKind::J => 0xc0_c0c0,
            PieceKind::L => 0xaa_00aa,
            PieceKind::Z => 0x00_aaaa,
            PieceKind::S => 0x00_aa00,
            PieceKind::T => 0xaa_5500,
            PieceKind::I => 0xaa_0000,
        }
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use autotris_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::O => 'O',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
            PieceKind::Z => 'Z',
            PieceKind::S => 'S',
            PieceKind::T => 'T',
            PieceKind::I => 'I',
        }
    }
}

/// Piece matrix padded to 4×4; only the top-left `d×d` part is meaningful.
type PieceCells = [[Block; 4]; 4];

const EMPTY_CELLS: PieceCells = [[Block::Empty; 4]; 4];

const PIECE_CELLS: [PieceCells; PieceKind::LEN] = {
    use Block::Empty as E;
    const O: Block = Block::Piece(PieceKind::O);
    const J: Block = Block::Piece(PieceKind::J);
    const L: Block = Block::Piece(PieceKind::L);
    const Z: Block = Block::Piece(PieceKind::Z);
    const S: Block = Block::Piece(PieceKind::S);
    const T: Block = Block::Piece(PieceKind::T);
    const I: Block = Block::Piece(PieceKind::I);
    const EEEE: [Block; 4] = [E; 4];
    [
        // O-piece
        [[O, O, E, E], [O, O, E, E], EEEE, EEEE],
        // J-piece
        [[J, E, E, E], [J, J, J, E], EEEE, EEEE],
        // L-piece
        [[E, E, L, E], [L, L, L, E], EEEE, EEEE],
        // Z-piece
        [[Z, Z, E, E], [E, Z, Z, E], EEEE, EEEE],
        // S-piece
        [[E, S, S, E], [S, S, E, E], EEEE, EEEE],
        // T-piece
        [[E, T, E, E], [T, T, T, E], EEEE, EEEE],
        // I-piece
        [EEEE, [I, I, I, I], EEEE, EEEE],
    ]
};

/// Source cell `(row, column)` for every destination cell of a clockwise turn.
type RotationTable = [[(u8, u8); 4]; 4];

/// Rotation tables for dimensions 2, 3 and 4. Entries outside `d×d` are unused.
const ROTATION_TABLES: [RotationTable; 3] = {
    const U: (u8, u8) = (0, 0);
    [
        [
            [(1, 0), (0, 0), U, U],
            [(1, 1), (0, 1), U, U],
            [U; 4],
            [U; 4],
        ],
        [
            [(2, 0), (1, 0), (0, 0), U],
            [(2, 1), (1, 1), (0, 1), U],
            [(2, 2), (1, 2), (0, 2), U],
            [U; 4],
        ],
        [
            [(3, 0), (2, 0), (1, 0), (0, 0)],
            [(3, 1), (2, 1), (1, 1), (0, 1)],
            [(3, 2), (2, 2), (1, 2), (0, 2)],
            [(3, 3), (2, 3), (1, 3), (0, 3)],
        ],
    ]
};

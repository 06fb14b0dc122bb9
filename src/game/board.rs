use std::fmt;

pub const ROWS: usize = 6;
pub const COLS: usize = 7;
pub const CELLS: usize = ROWS * COLS;
pub const CENTER: usize = COLS / 2;

/// Line directions as (row step, column step): horizontal, vertical, `/`, `\`.
pub const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Red,
    Yellow,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("column is full")]
    ColumnFull,
    #[error("column is out of range")]
    InvalidColumn,
}

/// 6x7 grid filled bottom-up. Row 0 is the bottom row.
///
/// The board also remembers the order in which pieces were dropped so that
/// opening lookups can see the ply count and the opponent's last move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    cells: [[Cell; COLS]; ROWS],
    heights: [u8; COLS],
    history: [u8; CELLS],
    ply: u8,
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Board {
            cells: [[Cell::Empty; COLS]; ROWS],
            heights: [0; COLS],
            history: [0; CELLS],
            ply: 0,
        }
    }

    /// Get the cell at a specific position
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row][col]
    }

    /// Number of pieces in a column
    pub fn height(&self, col: usize) -> usize {
        self.heights[col] as usize
    }

    /// Number of pieces on the board
    pub fn ply(&self) -> usize {
        self.ply as usize
    }

    pub fn empty_cells(&self) -> usize {
        CELLS - self.ply()
    }

    /// Column of the most recent drop still on the board
    pub fn last_move(&self) -> Option<usize> {
        self.ply
            .checked_sub(1)
            .map(|i| self.history[i as usize] as usize)
    }

    /// Check if a column is full. Out-of-range columns count as full.
    pub fn is_column_full(&self, col: usize) -> bool {
        if col >= COLS {
            return true;
        }
        self.height(col) == ROWS
    }

    pub fn legal_columns(&self) -> Vec<usize> {
        (0..COLS).filter(|&col| !self.is_column_full(col)).collect()
    }

    /// Drop a piece in a column, returns the row where it landed
    pub fn drop_piece(&mut self, col: usize, cell: Cell) -> Result<usize, MoveError> {
        if col >= COLS {
            return Err(MoveError::InvalidColumn);
        }
        if self.is_column_full(col) {
            return Err(MoveError::ColumnFull);
        }

        let row = self.height(col);
        self.cells[row][col] = cell;
        self.heights[col] += 1;
        self.history[self.ply()] = col as u8;
        self.ply += 1;
        Ok(row)
    }

    /// Remove the topmost piece of a column, returning the row it occupied.
    ///
    /// The most recent drop into `col` is also removed from the move history.
    pub fn undo_piece(&mut self, col: usize) -> Option<usize> {
        if col >= COLS || self.heights[col] == 0 {
            return None;
        }

        self.heights[col] -= 1;
        let row = self.height(col);
        self.cells[row][col] = Cell::Empty;

        let len = self.ply();
        if let Some(idx) = self.history[..len].iter().rposition(|&c| c as usize == col) {
            self.history.copy_within(idx + 1..len, idx);
            self.history[len - 1] = 0;
            self.ply -= 1;
        }
        Some(row)
    }

    /// Check if every column is full
    pub fn is_full(&self) -> bool {
        (0..COLS).all(|col| self.is_column_full(col))
    }

    /// A draw in the board-only sense: no column accepts another piece.
    pub fn is_draw(&self) -> bool {
        self.is_full()
    }

    pub fn any_valid_moves(&self) -> bool {
        !self.is_full()
    }

    /// Check whether the piece just placed at (row, col) completes four in a row
    pub fn is_winning_move(&self, row: usize, col: usize, cell: Cell) -> bool {
        if cell == Cell::Empty || row >= ROWS || col >= COLS || self.get(row, col) != cell {
            return false;
        }
        self.longest_run_through(row, col, cell) >= 4
    }

    /// Check whether dropping `cell` into `col` would win, without touching the board
    pub fn would_win(&self, col: usize, cell: Cell) -> bool {
        if cell == Cell::Empty || self.is_column_full(col) {
            return false;
        }
        self.longest_run_through(self.height(col), col, cell) >= 4
    }

    /// First column in `order` where `cell` wins immediately
    pub fn winning_column(&self, cell: Cell, order: &[usize]) -> Option<usize> {
        order.iter().copied().find(|&col| self.would_win(col, cell))
    }

    /// Number of distinct columns where `cell` wins immediately
    pub fn count_winning_columns(&self, cell: Cell) -> usize {
        (0..COLS).filter(|&col| self.would_win(col, cell)).count()
    }

    /// Whole-board scan for four in a row of `cell`
    pub fn has_four(&self, cell: Cell) -> bool {
        if cell == Cell::Empty {
            return false;
        }
        for row in 0..ROWS {
            for col in 0..COLS {
                if self.cells[row][col] != cell {
                    continue;
                }
                for &(dr, dc) in &DIRECTIONS {
                    if (0..4).all(|i| self.cell_at(row as isize + dr * i, col as isize + dc * i) == Some(cell)) {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// The colour holding four in a row, if any
    pub fn winner(&self) -> Option<Cell> {
        [Cell::Red, Cell::Yellow]
            .into_iter()
            .find(|&cell| self.has_four(cell))
    }

    /// Bounds-checked cell access with signed coordinates
    pub fn cell_at(&self, row: isize, col: isize) -> Option<Cell> {
        if row < 0 || col < 0 || row >= ROWS as isize || col >= COLS as isize {
            return None;
        }
        Some(self.cells[row as usize][col as usize])
    }

    /// Longest run of `cell` through (row, col), counting that square as `cell`
    fn longest_run_through(&self, row: usize, col: usize, cell: Cell) -> usize {
        DIRECTIONS
            .iter()
            .map(|&(dr, dc)| {
                1 + self.count_dir(row, col, dr, dc, cell) + self.count_dir(row, col, -dr, -dc, cell)
            })
            .max()
            .unwrap_or(1)
    }

    /// Count consecutive `cell`s starting next to (row, col) in one direction
    fn count_dir(&self, row: usize, col: usize, dr: isize, dc: isize, cell: Cell) -> usize {
        let mut count = 0;
        let mut r = row as isize + dr;
        let mut c = col as isize + dc;
        while self.cell_at(r, c) == Some(cell) {
            count += 1;
            r += dr;
            c += dc;
        }
        count
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, " ")?;
        for col in 0..COLS {
            write!(f, " {}", col + 1)?;
        }
        writeln!(f)?;
        for row in (0..ROWS).rev() {
            write!(f, "{}", row + 1)?;
            for col in 0..COLS {
                let symbol = match self.cells[row][col] {
                    Cell::Empty => '.',
                    Cell::Red => 'X',
                    Cell::Yellow => 'O',
                };
                write!(f, " {symbol}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

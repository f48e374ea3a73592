use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of cells on the 3x3 grid.
pub const CELL_COUNT: usize = 9;

/// The 8 winning index-triples: rows, columns, then diagonals.
pub const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// A mark placed on the board.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Symbol {
    X,
    O,
}

impl Symbol {
    pub fn opponent(self) -> Self {
        match self {
            Symbol::X => Symbol::O,
            Symbol::O => Symbol::X,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Symbol::X => "X",
            Symbol::O => "O",
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum BoardError {
    WrongLength { len: usize },
    UnknownSymbol { value: String },
    CellOutOfRange { index: usize },
    CellOccupied { index: usize },
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardError::WrongLength { len } => {
                write!(f, "board must have {CELL_COUNT} cells, got {len}")
            }
            BoardError::UnknownSymbol { value } => write!(f, "unknown cell value {value:?}"),
            BoardError::CellOutOfRange { index } => write!(f, "cell {index} is off the board"),
            BoardError::CellOccupied { index } => write!(f, "cell {index} is already taken"),
        }
    }
}

impl std::error::Error for BoardError {}

/// 9 cells in row-major order. On the JS side a board is an array of
/// `""`, `"X"` and `"O"` strings.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Board {
    cells: [Option<Symbol>; CELL_COUNT],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cells(cells: [Option<Symbol>; CELL_COUNT]) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[Option<Symbol>; CELL_COUNT] {
        &self.cells
    }

    pub fn get(&self, index: usize) -> Option<Symbol> {
        self.cells.get(index).copied().flatten()
    }

    /// Puts `symbol` on an empty cell.
    pub fn place(&mut self, index: usize, symbol: Symbol) -> Result<(), BoardError> {
        match self.cells.get_mut(index) {
            None => Err(BoardError::CellOutOfRange { index }),
            Some(Some(_)) => Err(BoardError::CellOccupied { index }),
            Some(cell) => {
                *cell = Some(symbol);
                Ok(())
            }
        }
    }

    // Trial placements made by the search; callers guarantee `index` is in range.
    pub(crate) fn set(&mut self, index: usize, symbol: Symbol) {
        self.cells[index] = Some(symbol);
    }

    pub(crate) fn clear(&mut self, index: usize) {
        self.cells[index] = None;
    }

    /// Symbol of the first complete line in [`LINES`] order, if any.
    pub fn winner(&self) -> Option<Symbol> {
        LINES.iter().find_map(|&[a, b, c]| {
            let first = self.cells[a]?;
            (self.cells[b] == Some(first) && self.cells[c] == Some(first)).then_some(first)
        })
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Unfilled positions in ascending order. Empty when the board is full.
    pub fn empty_indices(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_none())
            .map(|(idx, _)| idx)
            .collect()
    }
}

impl TryFrom<Vec<String>> for Board {
    type Error = BoardError;

    fn try_from(values: Vec<String>) -> Result<Self, Self::Error> {
        if values.len() != CELL_COUNT {
            return Err(BoardError::WrongLength { len: values.len() });
        }
        let mut board = Board::new();
        for (idx, value) in values.iter().enumerate() {
            board.cells[idx] = match value.as_str() {
                "" => None,
                "X" | "x" => Some(Symbol::X),
                "O" | "o" => Some(Symbol::O),
                _ => {
                    return Err(BoardError::UnknownSymbol {
                        value: value.clone(),
                    })
                }
            };
        }
        Ok(board)
    }
}

impl From<Board> for Vec<String> {
    fn from(board: Board) -> Self {
        board
            .cells
            .iter()
            .map(|cell| cell.map(Symbol::as_str).unwrap_or_default().to_string())
            .collect()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row_idx, row) in self.cells.chunks(3).enumerate() {
            if row_idx > 0 {
                writeln!(f)?;
            }
            for cell in row {
                f.write_str(cell.map(Symbol::as_str).unwrap_or("."))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn board_from(pattern: &str) -> Board {
    let mut board = Board::new();
    for (idx, ch) in pattern.chars().filter(|c| !c.is_whitespace()).enumerate() {
        match ch {
            'X' => board.set(idx, Symbol::X),
            'O' => board.set(idx, Symbol::O),
            _ => {}
        }
    }
    board
}

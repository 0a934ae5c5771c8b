use std::ops::Deref;

use serde::{Deserialize, Serialize};

use crate::error::MoveError;

pub const ROWS: usize = 6;
pub const COLS: usize = 7;

/// Length of a winning line.
pub const CONNECT: usize = 4;

/// How far a directional walk looks on each side of its starting cell.
pub const REACH: usize = CONNECT - 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cell {
    Empty,
    Red,
    Yellow,
}

/// One of the four lines a token can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
    /// Bottom-left to top-right (/)
    DiagonalUp,
    /// Top-left to bottom-right (\)
    DiagonalDown,
}

impl Axis {
    pub const ALL: [Axis; 4] = [
        Axis::Horizontal,
        Axis::Vertical,
        Axis::DiagonalUp,
        Axis::DiagonalDown,
    ];

    /// Row/column step for the "forward" direction of the axis.
    fn delta(self) -> (isize, isize) {
        match self {
            Axis::Horizontal => (0, 1),
            Axis::Vertical => (1, 0),
            Axis::DiagonalUp => (-1, 1),
            Axis::DiagonalDown => (1, 1),
        }
    }
}

/// Contiguous same-colour tokens through a cell along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Run {
    /// Tokens in the run, the starting cell included.
    pub length: usize,
    /// Number of run ends (0..=2) that stop on an empty cell.
    pub open_ends: usize,
}

/// Where a four-in-a-row search looks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Every occupied cell of the grid.
    Everywhere,
    /// Only lines passing through one cell.
    From { row: usize, col: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [[Cell; COLS]; ROWS],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Board {
            cells: [[Cell::Empty; COLS]; ROWS],
        }
    }

    /// Get the cell at a specific position
    /// Row 0 is the top, row 5 is the bottom
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row][col]
    }

    /// Raw grid, top row first.
    pub fn cells(&self) -> &[[Cell; COLS]; ROWS] {
        &self.cells
    }

    /// Check if a column is full. Columns outside the board count as full.
    pub fn is_column_full(&self, col: usize) -> bool {
        if col >= COLS {
            return true;
        }
        self.cells[0][col] != Cell::Empty
    }

    /// Row a token dropped into `col` would land on.
    pub fn landing_row(&self, col: usize) -> Option<usize> {
        if col >= COLS {
            return None;
        }
        (0..ROWS).rev().find(|&row| self.cells[row][col] == Cell::Empty)
    }

    /// Drop a piece in a column, returns the row where it landed
    pub fn drop_piece(&mut self, col: usize, cell: Cell) -> Result<usize, MoveError> {
        if col >= COLS {
            return Err(MoveError::InvalidColumn(col));
        }

        let row = self.landing_row(col).ok_or(MoveError::ColumnFull(col))?;
        self.cells[row][col] = cell;
        Ok(row)
    }

    /// Check if the board is completely full
    pub fn is_full(&self) -> bool {
        (0..COLS).all(|col| self.is_column_full(col))
    }

    /// Columns that still accept a token, left to right.
    pub fn open_columns(&self) -> Vec<usize> {
        (0..COLS).filter(|&col| !self.is_column_full(col)).collect()
    }

    /// Walk both directions of `axis` from (row, col), at most `reach` steps
    /// each way, counting tokens of the starting cell's colour.
    ///
    /// A walk stops at the board edge or the first cell of another colour; if
    /// that cell is empty the end counts as open. An empty starting cell yields
    /// an empty run.
    pub fn run(&self, row: usize, col: usize, axis: Axis, reach: usize) -> Run {
        let cell = self.cells[row][col];
        if cell == Cell::Empty {
            return Run::default();
        }

        let (dr, dc) = axis.delta();
        let mut run = Run {
            length: 1,
            open_ends: 0,
        };

        for sign in [1isize, -1] {
            for step in 1..=reach as isize {
                let r = row as isize + dr * step * sign;
                let c = col as isize + dc * step * sign;
                if r < 0 || r >= ROWS as isize || c < 0 || c >= COLS as isize {
                    break;
                }
                match self.cells[r as usize][c as usize] {
                    other if other == cell => run.length += 1,
                    Cell::Empty => {
                        run.open_ends += 1;
                        break;
                    }
                    _ => break,
                }
            }
        }

        run
    }

    /// Colour of a four-in-a-row within `scope`, if any.
    pub fn four_in_a_row(&self, scope: Scope) -> Option<Cell> {
        match scope {
            Scope::From { row, col } => {
                let connected = Axis::ALL
                    .into_iter()
                    .any(|axis| self.run(row, col, axis, REACH).length >= CONNECT);
                connected.then(|| self.cells[row][col])
            }
            Scope::Everywhere => (0..ROWS)
                .flat_map(|row| (0..COLS).map(move |col| (row, col)))
                .filter(|&(row, col)| self.cells[row][col] != Cell::Empty)
                .find_map(|(row, col)| self.four_in_a_row(Scope::From { row, col })),
        }
    }

    /// Check if the token at (row, col) is part of a four-in-a-row
    pub fn check_win(&self, row: usize, col: usize) -> bool {
        self.four_in_a_row(Scope::From { row, col }).is_some()
    }

    /// Place a hypothetical `cell` token in `col`. The token is removed again
    /// when the returned guard is dropped. Returns `None` for full or invalid
    /// columns.
    pub fn probe(&mut self, col: usize, cell: Cell) -> Option<Probe<'_>> {
        let row = self.drop_piece(col, cell).ok()?;
        Some(Probe {
            board: self,
            row,
            col,
        })
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// A simulated token that is cleared on drop.
pub struct Probe<'a> {
    board: &'a mut Board,
    row: usize,
    col: usize,
}

impl Probe<'_> {
    pub fn row(&self) -> usize {
        self.row
    }

    pub fn col(&self) -> usize {
        self.col
    }

    /// Run through the probed token along `axis`.
    pub fn run(&self, axis: Axis) -> Run {
        self.board.run(self.row, self.col, axis, REACH)
    }

    /// Runs through the probed token along all four axes.
    pub fn runs(&self) -> impl Iterator<Item = Run> + '_ {
        Axis::ALL.into_iter().map(move |axis| self.run(axis))
    }
}

impl Deref for Probe<'_> {
    type Target = Board;

    fn deref(&self) -> &Board {
        &*self.board
    }
}

impl Drop for Probe<'_> {
    fn drop(&mut self) {
        self.board.cells[self.row][self.col] = Cell::Empty;
    }
}

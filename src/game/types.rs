//! Core domain types: marks, squares, and the board.

use super::position::Position;
use serde::{Deserialize, Serialize};

/// A player's marker on the board.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, clap::ValueEnum,
)]
pub enum Mark {
    /// The X marker.
    X,
    /// The O marker.
    O,
}

impl Mark {
    /// Returns the opposing mark.
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    /// Single-character form used in board rendering.
    pub fn as_char(self) -> char {
        match self {
            Mark::X => 'X',
            Mark::O => 'O',
        }
    }
}

/// A single cell on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Square {
    /// No mark placed yet.
    Empty,
    /// Cell taken by a mark.
    Taken(Mark),
}

impl Square {
    /// Returns the mark occupying this square, if any.
    pub fn mark(self) -> Option<Mark> {
        match self {
            Square::Empty => None,
            Square::Taken(mark) => Some(mark),
        }
    }
}

/// 3x3 tic-tac-toe board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// Squares in row-major order (0-8).
    squares: [Square; 9],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self {
            squares: [Square::Empty; 9],
        }
    }

    /// Gets the square at the given position.
    pub fn get(&self, pos: Position) -> Square {
        self.squares[pos.index()]
    }

    /// Sets the square at the given position.
    pub fn set(&mut self, pos: Position, square: Square) {
        self.squares[pos.index()] = square;
    }

    /// Checks whether the position is unoccupied.
    pub fn is_empty(&self, pos: Position) -> bool {
        self.get(pos) == Square::Empty
    }

    /// Checks whether every square is occupied.
    pub fn is_full(&self) -> bool {
        self.squares.iter().all(|s| *s != Square::Empty)
    }

    /// Number of occupied squares. Equal to the number of turns played.
    pub fn occupied(&self) -> usize {
        self.squares.iter().filter(|s| **s != Square::Empty).count()
    }

    /// Returns all squares as a slice, row-major.
    pub fn squares(&self) -> &[Square; 9] {
        &self.squares
    }

    /// Formats the board with its coordinate frame:
    ///
    /// ```text
    ///   -------------
    /// A | X |   | O |
    ///   -------------
    /// B |   | X |   |
    ///   -------------
    /// C |   |   |   |
    ///   -------------
    ///     1   2   3
    /// ```
    pub fn display(&self) -> String {
        let mut out = String::from("  -------------\n");
        for row in 0..3 {
            out.push((b'A' + row as u8) as char);
            out.push_str(" |");
            for col in 0..3 {
                let cell = match self.squares[row * 3 + col] {
                    Square::Empty => ' ',
                    Square::Taken(mark) => mark.as_char(),
                };
                out.push(' ');
                out.push(cell);
                out.push_str(" |");
            }
            out.push_str("\n  -------------\n");
        }
        out.push_str("    1   2   3\n");
        out
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

//! Board positions and the coordinate codec.
//!
//! A position has two equivalent representations: a linear index (0-8,
//! row-major) and a board coordinate (row letter A-C plus column digit
//! 1-3, e.g. "B2"). Conversions in both directions reject anything
//! outside those ranges.

use super::error::ParseError;
use super::types::Board;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// A position on the tic-tac-toe board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    /// Top-left, coordinate A1 (index 0).
    TopLeft,
    /// Top-center, coordinate A2 (index 1).
    TopCenter,
    /// Top-right, coordinate A3 (index 2).
    TopRight,
    /// Middle-left, coordinate B1 (index 3).
    MiddleLeft,
    /// Center, coordinate B2 (index 4).
    Center,
    /// Middle-right, coordinate B3 (index 5).
    MiddleRight,
    /// Bottom-left, coordinate C1 (index 6).
    BottomLeft,
    /// Bottom-center, coordinate C2 (index 7).
    BottomCenter,
    /// Bottom-right, coordinate C3 (index 8).
    BottomRight,
}

impl Position {
    /// All 9 positions in index order.
    pub const ALL: [Position; 9] = [
        Position::TopLeft,
        Position::TopCenter,
        Position::TopRight,
        Position::MiddleLeft,
        Position::Center,
        Position::MiddleRight,
        Position::BottomLeft,
        Position::BottomCenter,
        Position::BottomRight,
    ];

    /// Converts the position to its linear index (0-8).
    pub fn index(self) -> usize {
        self as usize
    }

    /// Creates a position from a linear index.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Index`] if the index is not in 0-8.
    #[instrument]
    pub fn from_index(index: usize) -> Result<Self, ParseError> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(ParseError::Index { index })
    }

    /// The uppercase board coordinate for this position ("A1" - "C3").
    pub fn coordinate(self) -> &'static str {
        const COORDINATES: [&str; 9] = ["A1", "A2", "A3", "B1", "B2", "B3", "C1", "C2", "C3"];
        COORDINATES[self.index()]
    }

    /// Parses a board coordinate: one row letter A-C (either case)
    /// followed by one column digit 1-3, nothing else.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Coordinate`] for any other input.
    #[instrument]
    pub fn from_coordinate(input: &str) -> Result<Self, ParseError> {
        let reject = || ParseError::Coordinate {
            input: input.to_string(),
        };

        let mut chars = input.chars();
        let row_char = chars.next().ok_or_else(reject)?;
        let col_char = chars.next().ok_or_else(reject)?;
        if chars.next().is_some() {
            return Err(reject());
        }

        let row = match row_char.to_ascii_uppercase() {
            c @ 'A'..='C' => c as usize - 'A' as usize,
            _ => return Err(reject()),
        };
        let col = match col_char {
            c @ '1'..='3' => c as usize - '1' as usize,
            _ => return Err(reject()),
        };

        Self::from_index(row * 3 + col)
    }

    /// Returns the positions still unoccupied on the given board.
    pub fn open_squares(board: &Board) -> Vec<Position> {
        Self::ALL
            .iter()
            .copied()
            .filter(|pos| board.is_empty(*pos))
            .collect()
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.coordinate())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_round_trip() {
        for index in 0..9 {
            let pos = Position::from_index(index).unwrap();
            assert_eq!(pos.index(), index);
            assert_eq!(Position::from_coordinate(pos.coordinate()).unwrap(), pos);
        }
    }

    #[test]
    fn test_lowercase_row_accepted() {
        assert_eq!(
            Position::from_coordinate("b2").unwrap(),
            Position::Center
        );
    }

    #[test]
    fn test_malformed_coordinates_rejected() {
        for input in ["D1", "A4", "", "B", "B22", "1A", " A1"] {
            assert!(
                Position::from_coordinate(input).is_err(),
                "{input:?} should not parse"
            );
        }
    }

    #[test]
    fn test_out_of_range_index_rejected() {
        assert_eq!(
            Position::from_index(9),
            Err(ParseError::Index { index: 9 })
        );
    }
}

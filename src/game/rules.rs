//! Winning-line table and game-over detection.
//!
//! The eight winning lines live in a process-wide constant table. Scan
//! order is fixed (rows, columns, diagonals) so the reported line is
//! deterministic when one placement completes several lines at once.

use super::position::Position;
use super::types::{Board, Mark};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Identifier of one of the eight winning lines.
///
/// The `Display` form is the kebab-case row id surfaced to frontends
/// ("horizontal-top", "diagonal-left", ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Line {
    /// Top row (A1 A2 A3).
    HorizontalTop,
    /// Middle row (B1 B2 B3).
    HorizontalCenter,
    /// Bottom row (C1 C2 C3).
    HorizontalBottom,
    /// Left column (A1 B1 C1).
    VerticalLeft,
    /// Center column (A2 B2 C2).
    VerticalCenter,
    /// Right column (A3 B3 C3).
    VerticalRight,
    /// Main diagonal (A1 B2 C3).
    DiagonalLeft,
    /// Anti-diagonal (A3 B2 C1).
    DiagonalRight,
}

impl Line {
    /// All lines in detection scan order.
    pub const ALL: [Line; 8] = [
        Line::HorizontalTop,
        Line::HorizontalCenter,
        Line::HorizontalBottom,
        Line::VerticalLeft,
        Line::VerticalCenter,
        Line::VerticalRight,
        Line::DiagonalLeft,
        Line::DiagonalRight,
    ];

    /// The three positions forming this line.
    pub fn cells(self) -> [Position; 3] {
        match self {
            Line::HorizontalTop => [Position::TopLeft, Position::TopCenter, Position::TopRight],
            Line::HorizontalCenter => {
                [Position::MiddleLeft, Position::Center, Position::MiddleRight]
            }
            Line::HorizontalBottom => {
                [Position::BottomLeft, Position::BottomCenter, Position::BottomRight]
            }
            Line::VerticalLeft => [Position::TopLeft, Position::MiddleLeft, Position::BottomLeft],
            Line::VerticalCenter => {
                [Position::TopCenter, Position::Center, Position::BottomCenter]
            }
            Line::VerticalRight => {
                [Position::TopRight, Position::MiddleRight, Position::BottomRight]
            }
            Line::DiagonalLeft => [Position::TopLeft, Position::Center, Position::BottomRight],
            Line::DiagonalRight => [Position::TopRight, Position::Center, Position::BottomLeft],
        }
    }

    /// Coordinates of the three cells, for frontend consumption.
    pub fn coordinates(self) -> [&'static str; 3] {
        self.cells().map(Position::coordinate)
    }
}

/// Checks the board for a completed line.
///
/// Scans [`Line::ALL`] in order and returns the first line uniformly
/// occupied by one mark, together with that mark.
#[instrument]
pub fn check_winner(board: &Board) -> Option<(Mark, Line)> {
    for line in Line::ALL {
        let [a, b, c] = line.cells();
        if let Some(mark) = board.get(a).mark() {
            if board.get(b).mark() == Some(mark) && board.get(c).mark() == Some(mark) {
                return Some((mark, line));
            }
        }
    }
    None
}

/// Checks whether the board is a draw: full, with no winner.
#[instrument]
pub fn is_draw(board: &Board) -> bool {
    board.is_full() && check_winner(board).is_none()
}

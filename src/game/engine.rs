//! Mutable rules engine: turn order, placement, and terminal state.

use super::error::PlayError;
use super::position::Position;
use super::rules::{self, Line};
use super::types::{Board, Mark, Square};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// How a finished match ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// One mark completed a line.
    Won {
        /// The winning mark.
        mark: Mark,
        /// The completed line.
        line: Line,
    },
    /// Full board, no line completed.
    Draw,
}

/// The rules engine for a single match.
///
/// Owns the board, derives whose turn it is from the turn counter, and
/// becomes terminal once a win or tie is detected. The mark that opens
/// the match is a construction-time parameter and holds for the whole
/// match; `reset` starts a fresh match with the same opening mark.
#[derive(Debug, Clone)]
pub struct Engine {
    board: Board,
    first: Mark,
    turn: usize,
    outcome: Option<Outcome>,
}

impl Engine {
    /// Creates an engine for a new match where `first` opens.
    #[instrument]
    pub fn new(first: Mark) -> Self {
        Self {
            board: Board::new(),
            first,
            turn: 0,
            outcome: None,
        }
    }

    /// The board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Number of placements made this match.
    pub fn turn(&self) -> usize {
        self.turn
    }

    /// The mark that moves on the current turn.
    ///
    /// Alternates from the opening mark: turn `t` belongs to
    /// `first` when `t` is even, to its opponent otherwise.
    pub fn current_mark(&self) -> Mark {
        if self.turn % 2 == 0 {
            self.first
        } else {
            self.first.opponent()
        }
    }

    /// Whether the match has concluded.
    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// The winning mark, if the match ended with one.
    pub fn winner(&self) -> Option<Mark> {
        match self.outcome {
            Some(Outcome::Won { mark, .. }) => Some(mark),
            _ => None,
        }
    }

    /// The completed line, if the match ended with a winner.
    pub fn winning_line(&self) -> Option<Line> {
        match self.outcome {
            Some(Outcome::Won { line, .. }) => Some(line),
            _ => None,
        }
    }

    /// The match outcome, present once terminal.
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Places the current turn's mark at the given position, advances
    /// the turn, then runs game-over detection.
    ///
    /// # Errors
    ///
    /// - [`PlayError::GameOver`] if the match already concluded.
    /// - [`PlayError::Occupied`] if the cell holds a mark; the board is
    ///   left unchanged.
    #[instrument(skip(self), fields(turn = self.turn, mark = %self.current_mark()))]
    pub fn place(&mut self, pos: Position) -> Result<Mark, PlayError> {
        if self.is_over() {
            return Err(PlayError::GameOver);
        }
        if !self.board.is_empty(pos) {
            return Err(PlayError::Occupied(pos));
        }

        let mark = self.current_mark();
        self.board.set(pos, Square::Taken(mark));
        self.turn += 1;

        if let Some((winner, line)) = rules::check_winner(&self.board) {
            info!(%winner, %line, "Match won");
            self.outcome = Some(Outcome::Won { mark: winner, line });
        } else if rules::is_draw(&self.board) {
            info!("Match drawn");
            self.outcome = Some(Outcome::Draw);
        } else {
            debug!(position = %pos, "Mark placed, match continues");
        }

        Ok(mark)
    }

    /// Parses a board coordinate and places at it.
    ///
    /// # Errors
    ///
    /// [`PlayError::Parse`] for malformed input, otherwise as [`Engine::place`].
    #[instrument(skip(self))]
    pub fn place_at(&mut self, coordinate: &str) -> Result<Mark, PlayError> {
        let pos = Position::from_coordinate(coordinate)?;
        self.place(pos)
    }

    /// Restores the initial empty state, abandoning any match in
    /// progress. The opening mark is unchanged.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        debug!("Resetting match state");
        self.board = Board::new();
        self.turn = 0;
        self.outcome = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::error::ParseError;

    #[test]
    fn test_marks_alternate_from_first() {
        let mut engine = Engine::new(Mark::O);
        assert_eq!(engine.current_mark(), Mark::O);
        assert_eq!(engine.place(Position::Center).unwrap(), Mark::O);
        assert_eq!(engine.current_mark(), Mark::X);
        assert_eq!(engine.place(Position::TopLeft).unwrap(), Mark::X);
        assert_eq!(engine.current_mark(), Mark::O);
    }

    #[test]
    fn test_occupied_cell_rejected_without_mutation() {
        let mut engine = Engine::new(Mark::X);
        engine.place(Position::Center).unwrap();
        let before = engine.board().clone();

        let err = engine.place(Position::Center).unwrap_err();
        assert_eq!(err, PlayError::Occupied(Position::Center));
        assert_eq!(engine.board(), &before);
        assert_eq!(engine.turn(), 1);
        // Still O's turn after the rejected play.
        assert_eq!(engine.current_mark(), Mark::O);
    }

    #[test]
    fn test_win_sets_terminal_state() {
        let mut engine = Engine::new(Mark::X);
        engine.place_at("A1").unwrap(); // X
        engine.place_at("B1").unwrap(); // O
        engine.place_at("A2").unwrap(); // X
        engine.place_at("B2").unwrap(); // O
        engine.place_at("A3").unwrap(); // X wins the top row

        assert!(engine.is_over());
        assert_eq!(engine.winner(), Some(Mark::X));
        assert_eq!(engine.winning_line(), Some(Line::HorizontalTop));
    }

    #[test]
    fn test_placement_after_game_over_rejected() {
        let mut engine = Engine::new(Mark::X);
        for coord in ["A1", "B1", "A2", "B2", "A3"] {
            engine.place_at(coord).unwrap();
        }
        assert_eq!(engine.place_at("C3"), Err(PlayError::GameOver));
    }

    #[test]
    fn test_malformed_coordinate_rejected() {
        let mut engine = Engine::new(Mark::X);
        let err = engine.place_at("D1").unwrap_err();
        assert_eq!(
            err,
            PlayError::Parse(ParseError::Coordinate {
                input: "D1".to_string()
            })
        );
        assert_eq!(engine.turn(), 0);
    }

    #[test]
    fn test_tie_on_full_board() {
        let mut engine = Engine::new(Mark::X);
        // X O X / X O O / O X X column-wise fill with no line.
        for coord in ["A1", "A2", "A3", "B2", "B1", "B3", "C2", "C1", "C3"] {
            engine.place_at(coord).unwrap();
        }
        assert!(engine.is_over());
        assert_eq!(engine.winner(), None);
        assert_eq!(engine.winning_line(), None);
        assert_eq!(engine.outcome(), Some(Outcome::Draw));
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut engine = Engine::new(Mark::X);
        for coord in ["A1", "B1", "A2", "B2", "A3"] {
            engine.place_at(coord).unwrap();
        }
        engine.reset();

        assert!(!engine.is_over());
        assert_eq!(engine.winner(), None);
        assert_eq!(engine.turn(), 0);
        assert_eq!(engine.board().occupied(), 0);
        assert_eq!(engine.current_mark(), Mark::X);
    }
}

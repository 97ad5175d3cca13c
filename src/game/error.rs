//! Gameplay error taxonomy.

use super::position::Position;
use derive_more::{Display, Error, From};

/// Malformed position input, in either representation.
///
/// Always recoverable: callers reprompt a human, and a bot never
/// produces one.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum ParseError {
    /// Input did not match the coordinate grammar (A-C then 1-3).
    #[display("unparseable coordinate {input:?}, expected \"A1\" through \"C3\"")]
    Coordinate {
        /// The rejected input.
        input: String,
    },
    /// Linear index outside 0-8.
    #[display("invalid board index {index}, expected 0 through 8")]
    Index {
        /// The rejected index.
        index: usize,
    },
}

/// Failure to place a mark on the board.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error, From)]
pub enum PlayError {
    /// The position could not be parsed.
    #[display("{_0}")]
    Parse(ParseError),
    /// The target cell already holds a mark. Recoverable.
    #[display("position {_0} is already taken")]
    #[from(ignore)]
    Occupied(#[error(not(source))] Position),
    /// Placement attempted after the match concluded. A collaborator
    /// defect rather than a normal gameplay condition.
    #[display("game is already over")]
    GameOver,
}

impl PlayError {
    /// Whether the caller can recover by asking for another play.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, PlayError::Parse(_) | PlayError::Occupied(_))
    }
}

/// Invalid session configuration. Fatal to session construction.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum ConfigError {
    /// The bot delay range has min above max.
    #[display("bot delay range [{min}, {max}] is inverted")]
    DelayRange {
        /// Lower bound in milliseconds.
        min: u64,
        /// Upper bound in milliseconds.
        max: u64,
    },
}

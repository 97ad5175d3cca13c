//! Lifecycle notifications emitted by the session facade.
//!
//! Frontends subscribe through an unbounded channel and react to these
//! instead of polling the session. The serialized form keeps the
//! original kebab-case event names ("game-start", "bot-delay-start").

use crate::game::{Line, Mark};
use crate::session::{Player, Scores};
use serde::{Deserialize, Serialize};

/// A notification from the game session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum GameEvent {
    /// A match started (initial game or rematch).
    GameStart,
    /// The turn passed to a new player.
    GameNewTurn {
        /// Display name of the player to move.
        player: String,
        /// Their mark.
        mark: Mark,
    },
    /// The match concluded.
    GameOver {
        /// The winning player, or `None` for a tie.
        winner: Option<Player>,
        /// Identifier of the completed line, if any.
        winning_row: Option<Line>,
        /// Coordinates of the winning cells, if any.
        winning_cells: Option<[String; 3]>,
        /// Scores after this match was counted.
        scores: Scores,
    },
    /// A bot started its artificial thinking delay.
    BotDelayStart {
        /// The bot's display name.
        name: String,
        /// The bot's mark.
        mark: Mark,
        /// Chosen delay in milliseconds.
        delay_ms: u64,
    },
    /// A bot's thinking delay elapsed.
    BotDelayEnd {
        /// The bot's display name.
        name: String,
        /// The bot's mark.
        mark: Mark,
    },
    /// A human play was rejected; the caller should reprompt.
    InvalidPlay {
        /// The rejected input, if any was supplied.
        input: Option<String>,
        /// Human-readable reason.
        reason: String,
    },
}

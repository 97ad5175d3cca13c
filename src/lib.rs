//! Tic-tac-toe game core.
//!
//! # Architecture
//!
//! - **Game**: board types, position codec, winning-line rules, and the
//!   mutable match engine
//! - **Bot**: prioritized/probabilistic heuristic strategy, scaled by
//!   difficulty
//! - **Session**: facade composing the engine with two players (human
//!   or bot), cumulative scores, and lifecycle event notifications
//! - **Console**: line-oriented frontend driving the session facade
//!
//! # Example
//!
//! ```no_run
//! use tictactoe::{GameType, Session, SessionConfig};
//! use tokio::sync::mpsc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let (events_tx, mut events_rx) = mpsc::unbounded_channel();
//! let config = SessionConfig {
//!     game_type: GameType::PlayerVsBot,
//!     player1_name: "Ada".to_string(),
//!     ..SessionConfig::default()
//! };
//! let mut session = Session::new(config, events_tx)?;
//!
//! // Human X plays the center, then the bot answers.
//! session.play_turn(Some("B2")).await?;
//! session.play_turn(None).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod bot;
pub mod console;
pub mod events;
pub mod game;
pub mod session;

pub use bot::{BotError, Difficulty};
pub use events::GameEvent;
pub use game::{
    Board, ConfigError, Engine, Line, Mark, Outcome, ParseError, PlayError, Position, Square,
};
pub use session::{
    CancelSignal, GameType, Player, PlayerKind, Scores, Session, SessionConfig, SessionError,
    TurnOutcome,
};

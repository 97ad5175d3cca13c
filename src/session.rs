//! Game session facade.
//!
//! A `Session` composes the rules engine with two players (human or
//! bot), tracks cumulative scores across rematches, and emits
//! [`GameEvent`] notifications for frontends. Construction performs all
//! configuration up front; there is no separate init step and no
//! half-initialized state to guard against.

use crate::bot::{self, BotError, Difficulty};
use crate::events::GameEvent;
use crate::game::{ConfigError, Engine, Line, Mark, PlayError, Position};
use derive_more::{Display, Error, From};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{mpsc, watch};
use tokio::time::{Duration, sleep};
use tracing::{debug, info, instrument, warn};

/// Default name for a human player on the X side.
pub const DEFAULT_PLAYER1_NAME: &str = "Player 1";
/// Default name for a human player on the O side.
pub const DEFAULT_PLAYER2_NAME: &str = "Player 2";

const BOT_NAME: &str = "Bot McBotFace";
const SECOND_BOT_NAME: &str = "Another Bot";

/// Which combination of players the session hosts.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    clap::ValueEnum,
)]
pub enum GameType {
    /// Two humans sharing the frontend.
    #[default]
    PlayerVsPlayer,
    /// A human as X against a bot as O.
    PlayerVsBot,
    /// Two bots; the frontend spectates.
    BotVsBot,
}

/// Player capability: interactive, or autonomous with a difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PlayerKind {
    /// Moves come from the frontend via `play_turn` input.
    Human,
    /// Moves come from the heuristic strategy.
    Bot {
        /// Strength of the heuristic play.
        difficulty: Difficulty,
    },
}

/// A participant in the session: display name, assigned mark, and
/// capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Display name.
    pub name: String,
    /// The mark this player places.
    pub mark: Mark,
    /// Human or bot.
    pub kind: PlayerKind,
}

impl Player {
    /// Whether this player moves autonomously.
    pub fn is_bot(&self) -> bool {
        matches!(self.kind, PlayerKind::Bot { .. })
    }
}

/// Per-mark win counters, scoped to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Scores {
    /// Wins by X.
    pub x: u32,
    /// Wins by O.
    pub o: u32,
}

impl Scores {
    /// The win count for a mark.
    pub fn get(&self, mark: Mark) -> u32 {
        match mark {
            Mark::X => self.x,
            Mark::O => self.o,
        }
    }

    fn bump(&mut self, mark: Mark) {
        match mark {
            Mark::X => self.x += 1,
            Mark::O => self.o += 1,
        }
    }
}

/// Session configuration, consumed once at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Player line-up.
    pub game_type: GameType,
    /// Difficulty applied to every bot in the session.
    pub bot_difficulty: Difficulty,
    /// Name for the X-side human; blank falls back to the default.
    pub player1_name: String,
    /// Name for the O-side human; blank falls back to the default.
    pub player2_name: String,
    /// Uniform-random artificial thinking delay for bots, in
    /// milliseconds. `None` plays bot moves immediately.
    pub bot_delay_range: Option<(u64, u64)>,
    /// Which mark opens every match of the session.
    pub first_mark: Mark,
    /// Seed for the session RNG; `None` seeds from entropy.
    pub rng_seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            game_type: GameType::PlayerVsPlayer,
            bot_difficulty: Difficulty::default(),
            player1_name: String::new(),
            player2_name: String::new(),
            bot_delay_range: None,
            first_mark: Mark::X,
            rng_seed: None,
        }
    }
}

/// Defect-class session failures.
///
/// Gameplay problems (bad coordinate, occupied cell) never surface
/// here; they come back as [`TurnOutcome::Rejected`] plus an
/// invalid-play event.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error, From)]
pub enum SessionError {
    /// A turn is already pending; the call was rejected unprocessed.
    #[display("a game turn is already in progress")]
    TurnInProgress,
    /// `play_turn` called after the match concluded. Frontends must
    /// block input (or call `rematch`) once the session reports over.
    #[display("game is already over")]
    GameOver,
    /// The bot strategy failed.
    #[display("{_0}")]
    Bot(BotError),
    /// The bot produced a move the engine refused. Indicates a strategy
    /// bug, never a gameplay condition.
    #[display("bot produced an unplayable move: {_0}")]
    #[from(ignore)]
    BotPlay(#[error(not(source))] PlayError),
}

/// What a `play_turn` call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// A mark was placed.
    Placed {
        /// The mark that was placed.
        mark: Mark,
        /// Where it was placed.
        position: Position,
    },
    /// The human input was invalid; nothing changed. Reprompt and
    /// retry.
    Rejected {
        /// Why the play was refused.
        reason: String,
    },
    /// A pending bot move was cancelled during its delay; nothing
    /// changed.
    Cancelled,
}

/// Handle for aborting a pending bot delay from outside the session,
/// e.g. when the frontend leaves the game screen.
#[derive(Debug, Clone)]
pub struct CancelSignal {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelSignal {
    fn new() -> (Self, watch::Receiver<bool>) {
        let (tx, rx) = watch::channel(false);
        (Self { tx: Arc::new(tx) }, rx)
    }

    /// Signals cancellation. A bot turn waiting out its delay discards
    /// its move without touching the board.
    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }
}

/// Clears the turn-in-progress flag even when the pending turn future
/// is dropped mid-delay.
struct TurnGuard(Arc<AtomicBool>);

impl TurnGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
            .then(|| Self(Arc::clone(flag)))
    }
}

impl Drop for TurnGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Orchestrates matches between two players and reports lifecycle
/// events.
#[derive(Debug)]
pub struct Session {
    engine: Engine,
    players: [Player; 2],
    scores: Scores,
    delay_range: Option<(u64, u64)>,
    events: mpsc::UnboundedSender<GameEvent>,
    cancel: CancelSignal,
    cancel_rx: watch::Receiver<bool>,
    rng: StdRng,
    pending: Arc<AtomicBool>,
}

impl Session {
    /// Builds a session from its configuration and an event channel.
    ///
    /// Emits `GameStart` and the first `GameNewTurn` on success.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] when the configuration is unusable (inverted
    /// delay range).
    #[instrument(skip(events))]
    pub fn new(
        config: SessionConfig,
        events: mpsc::UnboundedSender<GameEvent>,
    ) -> Result<Self, ConfigError> {
        if let Some((min, max)) = config.bot_delay_range {
            if min > max {
                return Err(ConfigError::DelayRange { min, max });
            }
        }

        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let players = build_players(&config);
        let (cancel, cancel_rx) = CancelSignal::new();

        info!(
            game_type = %config.game_type,
            player_x = %players[0].name,
            player_o = %players[1].name,
            "Session created"
        );

        let session = Self {
            engine: Engine::new(config.first_mark),
            players,
            scores: Scores::default(),
            delay_range: config.bot_delay_range,
            events,
            cancel,
            cancel_rx,
            rng,
            pending: Arc::new(AtomicBool::new(false)),
        };
        session.emit(GameEvent::GameStart);
        session.emit_new_turn();
        Ok(session)
    }

    /// Plays one turn for the current player.
    ///
    /// For a human, `input` must hold a board coordinate; parse and
    /// occupied-cell failures come back as [`TurnOutcome::Rejected`]
    /// with an `InvalidPlay` event and no state change. For a bot,
    /// `input` is ignored: the strategy picks a move, the artificial
    /// delay elapses (observing the [`CancelSignal`]), then the move is
    /// placed.
    ///
    /// On the turn that ends the match, the winner's score is bumped
    /// and `GameOver` is emitted; otherwise `GameNewTurn` announces the
    /// next player.
    ///
    /// # Errors
    ///
    /// [`SessionError`] values are collaborator defects, not gameplay
    /// conditions.
    #[instrument(skip(self))]
    pub async fn play_turn(&mut self, input: Option<&str>) -> Result<TurnOutcome, SessionError> {
        if self.engine.is_over() {
            warn!("play_turn called on a finished match");
            return Err(SessionError::GameOver);
        }
        let _guard = TurnGuard::acquire(&self.pending).ok_or(SessionError::TurnInProgress)?;

        let player = self.current_player();
        let outcome = match player.kind {
            PlayerKind::Human => self.human_turn(input)?,
            PlayerKind::Bot { difficulty } => self.bot_turn(&player, difficulty).await?,
        };

        if matches!(outcome, TurnOutcome::Placed { .. }) {
            if self.engine.is_over() {
                self.finish_match();
            } else {
                self.emit_new_turn();
            }
        }
        Ok(outcome)
    }

    /// Resets the board for a new match, preserving players and scores.
    /// Emits `GameStart` and the opening `GameNewTurn`.
    #[instrument(skip(self))]
    pub fn rematch(&mut self) {
        info!(scores = ?self.scores, "Rematch");
        self.engine.reset();
        self.emit(GameEvent::GameStart);
        self.emit_new_turn();
    }

    /// A handle that cancels a pending bot delay.
    pub fn cancel_signal(&self) -> CancelSignal {
        self.cancel.clone()
    }

    // ── read-only observers (owned snapshots) ────────────────────

    /// The board keyed by coordinate ("A1" through "C3").
    pub fn board(&self) -> BTreeMap<String, Option<Mark>> {
        Position::ALL
            .iter()
            .map(|&pos| {
                (
                    pos.coordinate().to_string(),
                    self.engine.board().get(pos).mark(),
                )
            })
            .collect()
    }

    /// The board rendered with its coordinate frame.
    pub fn board_display(&self) -> String {
        self.engine.board().display()
    }

    /// The player whose turn it is.
    pub fn current_player(&self) -> Player {
        self.player_for(self.engine.current_mark()).clone()
    }

    /// Whether the current match has concluded.
    pub fn is_over(&self) -> bool {
        self.engine.is_over()
    }

    /// The winning player of the current match, if any.
    pub fn winner(&self) -> Option<Player> {
        self.engine
            .winner()
            .map(|mark| self.player_for(mark).clone())
    }

    /// Identifier of the winning line, if any.
    pub fn winning_row(&self) -> Option<Line> {
        self.engine.winning_line()
    }

    /// Cumulative per-mark scores.
    pub fn scores(&self) -> Scores {
        self.scores
    }

    /// Both players, X side first.
    pub fn players(&self) -> [Player; 2] {
        self.players.clone()
    }

    // ── internals ────────────────────────────────────────────────

    fn human_turn(&mut self, input: Option<&str>) -> Result<TurnOutcome, SessionError> {
        let Some(text) = input else {
            return Ok(self.reject(None, "no input supplied for a human player"));
        };

        let pos = match Position::from_coordinate(text.trim()) {
            Ok(pos) => pos,
            Err(err) => return Ok(self.reject(Some(text), &err.to_string())),
        };
        match self.engine.place(pos) {
            Ok(mark) => Ok(TurnOutcome::Placed {
                mark,
                position: pos,
            }),
            Err(err) if err.is_recoverable() => Ok(self.reject(Some(text), &err.to_string())),
            // Terminal state was checked on entry; reaching this means
            // the facade and engine disagree.
            Err(_) => Err(SessionError::GameOver),
        }
    }

    async fn bot_turn(
        &mut self,
        player: &Player,
        difficulty: Difficulty,
    ) -> Result<TurnOutcome, SessionError> {
        let pos = bot::choose_move(self.engine.board(), player.mark, difficulty, &mut self.rng)?;

        if let Some((min, max)) = self.delay_range {
            // A fresh turn clears any cancellation that predates it.
            self.cancel.tx.send_replace(false);

            let delay = if min == max {
                min
            } else {
                self.rng.gen_range(min..=max)
            };
            self.emit(GameEvent::BotDelayStart {
                name: player.name.clone(),
                mark: player.mark,
                delay_ms: delay,
            });

            let mut cancel_rx = self.cancel_rx.clone();
            tokio::select! {
                _ = sleep(Duration::from_millis(delay)) => {
                    self.emit(GameEvent::BotDelayEnd {
                        name: player.name.clone(),
                        mark: player.mark,
                    });
                }
                _ = cancelled(&mut cancel_rx) => {
                    debug!(bot = %player.name, "Bot play cancelled during delay");
                    return Ok(TurnOutcome::Cancelled);
                }
            }
        }

        let mark = self.engine.place(pos).map_err(SessionError::BotPlay)?;
        Ok(TurnOutcome::Placed {
            mark,
            position: pos,
        })
    }

    fn finish_match(&mut self) {
        let winner = self.winner();
        if let Some(player) = &winner {
            self.scores.bump(player.mark);
        }
        let winning_row = self.engine.winning_line();
        let winning_cells = winning_row.map(|line| line.coordinates().map(String::from));

        info!(
            winner = winner.as_ref().map(|p| p.name.as_str()),
            row = winning_row.map(|l| l.to_string()),
            "Match over"
        );
        self.emit(GameEvent::GameOver {
            winner,
            winning_row,
            winning_cells,
            scores: self.scores,
        });
    }

    fn reject(&self, input: Option<&str>, reason: &str) -> TurnOutcome {
        debug!(?input, reason, "Play rejected");
        self.emit(GameEvent::InvalidPlay {
            input: input.map(str::to_string),
            reason: reason.to_string(),
        });
        TurnOutcome::Rejected {
            reason: reason.to_string(),
        }
    }

    fn player_for(&self, mark: Mark) -> &Player {
        self.players
            .iter()
            .find(|p| p.mark == mark)
            .unwrap_or(&self.players[0])
    }

    fn emit_new_turn(&self) {
        let player = self.current_player();
        self.emit(GameEvent::GameNewTurn {
            player: player.name,
            mark: player.mark,
        });
    }

    fn emit(&self, event: GameEvent) {
        if self.events.send(event).is_err() {
            debug!("Event receiver dropped, notification discarded");
        }
    }
}

/// Resolves once the signal reads true. Never resolves if the channel
/// closes, so the delay branch wins the race instead.
async fn cancelled(rx: &mut watch::Receiver<bool>) {
    if *rx.borrow_and_update() {
        return;
    }
    while rx.changed().await.is_ok() {
        if *rx.borrow() {
            return;
        }
    }
    std::future::pending::<()>().await
}

fn build_players(config: &SessionConfig) -> [Player; 2] {
    let human = |name: &str, fallback: &str, mark| Player {
        name: if name.trim().is_empty() {
            fallback.to_string()
        } else {
            name.trim().to_string()
        },
        mark,
        kind: PlayerKind::Human,
    };
    let robot = |name: &str, mark| Player {
        name: name.to_string(),
        mark,
        kind: PlayerKind::Bot {
            difficulty: config.bot_difficulty,
        },
    };

    match config.game_type {
        GameType::PlayerVsPlayer => [
            human(&config.player1_name, DEFAULT_PLAYER1_NAME, Mark::X),
            human(&config.player2_name, DEFAULT_PLAYER2_NAME, Mark::O),
        ],
        GameType::PlayerVsBot => [
            human(&config.player1_name, DEFAULT_PLAYER1_NAME, Mark::X),
            robot(BOT_NAME, Mark::O),
        ],
        GameType::BotVsBot => [robot(BOT_NAME, Mark::X), robot(SECOND_BOT_NAME, Mark::O)],
    }
}

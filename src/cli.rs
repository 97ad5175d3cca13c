//! Command-line interface for the console frontend.

use clap::Parser;
use tictactoe::{Difficulty, GameType, Mark, SessionConfig};

/// Tic-tac-toe in the terminal.
#[derive(Parser, Debug)]
#[command(name = "tictactoe")]
#[command(about = "Play tic-tac-toe against another player or a heuristic bot", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Player line-up.
    #[arg(long, value_enum, default_value_t = GameType::PlayerVsBot)]
    pub game_type: GameType,

    /// Bot strength (applies when the line-up includes a bot).
    #[arg(long, value_enum, default_value_t = Difficulty::Medium)]
    pub difficulty: Difficulty,

    /// Name of player X.
    #[arg(long, default_value = "")]
    pub player1: String,

    /// Name of player O.
    #[arg(long, default_value = "")]
    pub player2: String,

    /// Lower bound of the bot thinking delay, in milliseconds.
    #[arg(long, default_value_t = 1000)]
    pub bot_delay_min: u64,

    /// Upper bound of the bot thinking delay, in milliseconds.
    #[arg(long, default_value_t = 3500)]
    pub bot_delay_max: u64,

    /// Play bot moves immediately, without the artificial delay.
    #[arg(long)]
    pub no_bot_delay: bool,

    /// Which mark opens each match.
    #[arg(long, value_enum, default_value_t = Mark::X)]
    pub first_mark: Mark,

    /// Seed for the session RNG, for reproducible bot games.
    #[arg(long)]
    pub seed: Option<u64>,
}

impl Cli {
    /// Builds the session configuration from the parsed arguments.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            game_type: self.game_type,
            bot_difficulty: self.difficulty,
            player1_name: self.player1.clone(),
            player2_name: self.player2.clone(),
            bot_delay_range: (!self.no_bot_delay)
                .then_some((self.bot_delay_min, self.bot_delay_max)),
            first_mark: self.first_mark,
            rng_seed: self.seed,
        }
    }
}

//! Console frontend: a line-oriented loop over the session facade.
//!
//! Prints the scoreboard and board between turns, prompts the human
//! player for coordinates, and replays matches until the player
//! declines a rematch. Bot delay notifications are printed from a
//! background task as they arrive.

use crate::events::GameEvent;
use crate::session::{Session, SessionConfig, TurnOutcome};
use anyhow::{Context, Result};
use std::io::Write as _;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::mpsc;
use tracing::{debug, instrument};

/// Runs the console game loop until the player declines a rematch or
/// stdin closes.
#[instrument(skip(config))]
pub async fn run(config: SessionConfig) -> Result<()> {
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let mut session = Session::new(config, events_tx).context("invalid session configuration")?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let printer = tokio::spawn(print_events(events_rx));

    loop {
        while !session.is_over() {
            render(&session);

            let input = if session.current_player().is_bot() {
                None
            } else {
                match prompt(&mut lines, "Enter a board position ( e.g.: A1 ): ").await? {
                    Some(line) => Some(line),
                    None => return Ok(()),
                }
            };

            match session.play_turn(input.as_deref()).await? {
                TurnOutcome::Rejected { reason } => println!("Invalid play: {reason}"),
                outcome => debug!(?outcome, "Turn completed"),
            }
        }

        render(&session);

        match prompt(&mut lines, "Would you like to play again? (yes/no): ").await? {
            Some(answer) if !answer.trim().to_lowercase().starts_with('n') => session.rematch(),
            _ => break,
        }
    }

    drop(session);
    let _ = printer.await;
    Ok(())
}

/// Renders the scoreboard, the board, and the result banner once the
/// match is over. Mirrors the layout frontends of the original game
/// used.
fn render(session: &Session) {
    let mut out = String::from("========== Tic Tac Toe ==========\n\n -- SCORES --\n\n");

    let current = session.current_player();
    for player in session.players() {
        let marker = if !session.is_over() && player.mark == current.mark {
            " TURN --> "
        } else {
            "          "
        };
        out.push_str(&format!(
            "{marker}{} ( {} ): {} points\n",
            player.name,
            player.mark,
            session.scores().get(player.mark)
        ));
    }

    out.push('\n');
    out.push_str(&session.board_display());

    if session.is_over() {
        match session.winner() {
            Some(winner) => {
                let row = session
                    .winning_row()
                    .map(|line| line.to_string())
                    .unwrap_or_default();
                out.push_str(&format!(
                    "\n{} ( {} ) won on row {row}!\n",
                    winner.name, winner.mark
                ));
            }
            None => out.push_str("\nIt's a tie!\n"),
        }
    }

    println!("{out}");
}

/// Prints bot lifecycle notifications as they arrive.
async fn print_events(mut events: mpsc::UnboundedReceiver<GameEvent>) {
    while let Some(event) = events.recv().await {
        match event {
            GameEvent::BotDelayStart { name, delay_ms, .. } => {
                println!("{name} is thinking ({delay_ms} ms)...");
            }
            GameEvent::BotDelayEnd { name, .. } => {
                println!("{name} made up its mind.");
            }
            _ => debug!(?event, "Event"),
        }
    }
}

async fn prompt(lines: &mut Lines<BufReader<Stdin>>, message: &str) -> Result<Option<String>> {
    print!("{message}");
    std::io::stdout().flush().context("flushing prompt")?;
    let line = lines.next_line().await.context("reading stdin")?;
    Ok(line)
}

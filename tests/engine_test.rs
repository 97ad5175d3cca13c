//! Tests for the rules engine: win detection on every line, ties,
//! rejected placements, and reset.

use tictactoe::{Engine, Line, Mark, PlayError, Position};

/// Plays `winner_cells` for the opening mark while the opponent fills
/// cells that never complete a line first.
fn play_to_win(line: Line) -> Engine {
    let mut engine = Engine::new(Mark::X);
    let winner_cells = line.cells();

    // Opponent replies on cells off the target line, never three in a
    // row: pick the first empty non-line cells in index order and stop
    // one short of a full board.
    let mut filler = Position::ALL
        .iter()
        .copied()
        .filter(|pos| !winner_cells.contains(pos));

    for (i, &pos) in winner_cells.iter().enumerate() {
        engine.place(pos).unwrap();
        if i < 2 {
            let reply = filler.next().expect("filler cell available");
            engine.place(reply).unwrap();
        }
    }
    engine
}

#[test]
fn test_every_line_wins_with_its_own_id() {
    for line in Line::ALL {
        let engine = play_to_win(line);
        assert!(engine.is_over(), "{line} should end the match");
        assert_eq!(engine.winner(), Some(Mark::X), "{line}");
        // The filler replies may incidentally sit on an earlier line in
        // scan order, but only X ever completes one.
        assert_eq!(engine.winning_line(), Some(line), "{line}");
    }
}

#[test]
fn test_occupied_placement_fails_and_board_is_unchanged() {
    let mut engine = Engine::new(Mark::X);
    engine.place_at("B2").unwrap();
    let snapshot = engine.board().clone();

    assert_eq!(
        engine.place_at("B2"),
        Err(PlayError::Occupied(Position::Center))
    );
    assert_eq!(engine.board(), &snapshot);
    assert_eq!(engine.turn(), 1);
}

#[test]
fn test_full_board_without_winner_is_a_tie() {
    let mut engine = Engine::new(Mark::X);
    // X: A1 A3 B1 C2 C3, O: A2 B2 B3 C1 -- no completed line.
    for coord in ["A1", "A2", "A3", "B2", "B1", "B3", "C2", "C1", "C3"] {
        engine.place_at(coord).unwrap();
    }
    assert!(engine.is_over());
    assert_eq!(engine.winner(), None);
    assert_eq!(engine.winning_line(), None);
}

#[test]
fn test_placing_after_conclusion_is_game_over_error() {
    let mut engine = play_to_win(Line::HorizontalTop);
    assert_eq!(engine.place_at("C3"), Err(PlayError::GameOver));
}

#[test]
fn test_reset_clears_the_match() {
    let mut engine = play_to_win(Line::DiagonalLeft);
    engine.reset();

    assert!(!engine.is_over());
    assert_eq!(engine.winner(), None);
    assert_eq!(engine.winning_line(), None);
    assert_eq!(engine.turn(), 0);
    assert_eq!(engine.board().occupied(), 0);
    // The opening mark is preserved across resets.
    assert_eq!(engine.current_mark(), Mark::X);
    engine.place_at("B2").unwrap();
}

#[test]
fn test_configurable_opening_mark() {
    let mut engine = Engine::new(Mark::O);
    let placed = engine.place_at("A1").unwrap();
    assert_eq!(placed, Mark::O);
    assert_eq!(engine.current_mark(), Mark::X);
}

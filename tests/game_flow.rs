//! End-to-end flows through the controller and reducer: the properties a
//! driving UI relies on.

use pretty_assertions::assert_eq;
use tabia::chess::core::{CastleRights, Piece, PieceKind, Player, Square};
use tabia::chess::position::{Position, Resolution};
use tabia::game::controller::GameController;
use tabia::game::state::GameMetaInfo;

fn play(controller: &mut GameController, moves: &[(&str, &str)]) {
    for (from, to) in moves {
        controller
            .apply_move(
                Square::try_from(*from).unwrap(),
                Square::try_from(*to).unwrap(),
            )
            .expect("scripted moves are legal");
    }
}

#[test]
fn castling_end_to_end() {
    let mut controller = GameController::new();
    // Clear the kingside path without disturbing anything else.
    play(
        &mut controller,
        &[
            ("g1", "f3"),
            ("b8", "c6"),
            ("g2", "g3"),
            ("e7", "e5"),
            ("f1", "g2"),
            ("d7", "d6"),
        ],
    );
    controller
        .apply_move(Square::E1, Square::G1)
        .expect("kingside castling is available");
    let snapshot = controller.snapshot();
    assert_eq!(
        snapshot.at(Square::G1),
        Some(Piece {
            owner: Player::White,
            kind: PieceKind::King
        })
    );
    assert_eq!(
        snapshot.at(Square::F1),
        Some(Piece {
            owner: Player::White,
            kind: PieceKind::Rook
        })
    );
    assert_eq!(snapshot.at(Square::E1), None);
    assert_eq!(snapshot.at(Square::H1), None);
    // Both of White's rights are gone, Black's are intact.
    assert_eq!(snapshot.castling(), CastleRights::BLACK_BOTH);
    assert_eq!(snapshot.side_to_move(), Player::Black);
}

#[test]
fn promotion_end_to_end_defaults_to_queen_headless() {
    let mut controller = GameController::new();
    controller.reset_to(
        Position::from_fen("4k3/6P1/8/8/8/8/8/4K3 w - - 0 1").unwrap(),
        GameMetaInfo::with_defaults(),
    );
    controller.on_click(Square::G7);
    controller.on_click(Square::G8);
    assert_eq!(
        controller.square(Square::G8),
        Some(Piece {
            owner: Player::White,
            kind: PieceKind::Queen
        })
    );
    assert_eq!(controller.to_move(), Player::Black);
}

#[test]
fn en_passant_capture_through_clicks() {
    let mut controller = GameController::new();
    play(&mut controller, &[("e2", "e4"), ("h7", "h6"), ("e4", "e5")]);
    // Black double-pushes past the white pawn.
    play(&mut controller, &[("d7", "d5")]);
    assert_eq!(controller.snapshot().en_passant_square(), Some(Square::D6));
    controller.on_click(Square::E5);
    controller.on_click(Square::D6);
    // The black pawn is removed from its origin rank, not the destination.
    assert_eq!(controller.square(Square::D5), None);
    assert_eq!(
        controller.square(Square::D6),
        Some(Piece {
            owner: Player::White,
            kind: PieceKind::Pawn
        })
    );
}

#[test]
fn checkmate_ends_the_game() {
    let mut controller = GameController::new();
    play(
        &mut controller,
        &[("f2", "f3"), ("e7", "e5"), ("g2", "g4"), ("d8", "h4")],
    );
    assert_eq!(
        controller.snapshot().resolution(),
        Resolution::Checkmate {
            winner: Player::Black
        }
    );
    assert_eq!(
        controller.state().game_state.meta.result.as_deref(),
        Some("0-1")
    );
}

#[test]
fn branch_truncation_on_new_move_after_rewind() {
    let mut controller = GameController::new();
    play(
        &mut controller,
        &[("e2", "e4"), ("e7", "e5"), ("g1", "f3"), ("b8", "c6")],
    );
    assert_eq!(controller.state().game_state.len(), 5);
    controller.go_to_move(2).unwrap();
    // A new move from index 2 discards indices 3..4 and extends the new line.
    controller.apply_move(Square::B1, Square::C3).unwrap();
    let history = &controller.state().game_state;
    assert_eq!(history.len(), 4);
    assert_eq!(history.current_index(), 3);
    assert_eq!(
        controller.square(Square::C3).map(|piece| piece.kind),
        Some(PieceKind::Knight)
    );
    assert_eq!(controller.square(Square::F3), None);
}

#[test]
fn step_round_trip_restores_cursor_and_snapshot() {
    let mut controller = GameController::new();
    play(&mut controller, &[("e2", "e4"), ("e7", "e5")]);
    controller.step_backward();
    let interior = controller.snapshot().clone();
    let index = controller.state().game_state.current_index();
    controller.step_backward();
    controller.step_forward();
    assert_eq!(controller.state().game_state.current_index(), index);
    assert_eq!(controller.snapshot(), &interior);
}

#[test]
fn stepping_past_the_ends_is_a_no_op() {
    let mut controller = GameController::new();
    play(&mut controller, &[("e2", "e4")]);
    controller.step_forward();
    assert_eq!(controller.state().game_state.current_index(), 1);
    controller.step_backward();
    controller.step_backward();
    assert_eq!(controller.state().game_state.current_index(), 0);
}

#[test]
fn repeated_click_on_selected_square_keeps_selection() {
    let mut controller = GameController::new();
    controller.on_click(Square::E2);
    let selected = controller.state().clone();
    controller.on_click(Square::E2);
    assert_eq!(controller.state(), &selected);
}

#[test]
fn moving_from_a_rewound_snapshot_uses_that_snapshot() {
    let mut controller = GameController::new();
    play(&mut controller, &[("e2", "e4"), ("e7", "e5")]);
    controller.go_to_move(0).unwrap();
    // From the starting snapshot the e2 pawn has not moved yet.
    controller.on_click(Square::E2);
    assert_eq!(
        controller
            .state()
            .ui_state
            .target_squares()
            .collect::<Vec<_>>(),
        vec![Square::E3, Square::E4]
    );
}

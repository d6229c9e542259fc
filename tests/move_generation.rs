use itertools::Itertools;
use pretty_assertions::assert_eq;
use tabia::chess::moves::Move;
use tabia::chess::position::Position;

fn setup(input: &str) -> Position {
    Position::from_fen(input).expect("parsing legal position: {input}")
}

fn get_moves(position: &Position) -> Vec<String> {
    position
        .legal_moves()
        .iter()
        .map(Move::to_string)
        .sorted()
        .collect::<Vec<_>>()
}

fn sorted_moves(moves: &[&str]) -> Vec<String> {
    moves
        .iter()
        .map(|m| (*m).to_string())
        .sorted()
        .collect::<Vec<_>>()
}

#[test]
fn starting_moves() {
    assert_eq!(
        get_moves(&Position::starting()),
        sorted_moves(&[
            "a2a3", "a2a4", "b1a3", "b1c3", "b2b3", "b2b4", "c2c3", "c2c4", "d2d3", "d2d4", "e2e3",
            "e2e4", "f2f3", "f2f4", "g1f3", "g1h3", "g2g3", "g2g4", "h2h3", "h2h4"
        ])
    );
}

#[test]
fn basic_moves() {
    // The king may not step onto g5: the f4 pawn guards it, which only the
    // simulate-and-discard filter detects.
    assert_eq!(
        get_moves(&setup("8/8/7k/8/4pP2/8/7K/8 b - f3 0 1")),
        sorted_moves(&["e4e3", "e4f3", "h6g6", "h6g7", "h6h5", "h6h7"])
    );
}

#[test]
fn check_evasions() {
    // Capture the undefended checker or step off the attacked lines.
    assert_eq!(
        get_moves(&setup("3k4/8/8/8/8/8/4r3/4K3 w - - 0 1")),
        sorted_moves(&["e1d1", "e1e2", "e1f1"])
    );
    // The other rook can capture the checker too.
    assert_eq!(
        get_moves(&setup("1k6/8/8/8/8/8/r6R/K7 w - - 0 1")),
        sorted_moves(&["a1a2", "a1b1", "h2a2"])
    );
}

#[test]
fn double_check_only_king_moves() {
    // Both the rook and the bishop check: no block or capture resolves both.
    assert_eq!(
        get_moves(&setup("3kn3/R2p1N2/8/8/7B/6K1/3R4/8 b - - 0 1")),
        sorted_moves(&["d8c8"])
    );
}

#[test]
fn pins() {
    // The pawn is pinned to the king by the queen along the diagonal and can
    // only capture en passant towards the pinning line.
    assert_eq!(
        get_moves(&setup("6qk/8/8/3Pp3/8/8/K7/8 w - e6 0 1")),
        sorted_moves(&["a2a1", "a2a3", "a2b1", "a2b2", "a2b3", "d5e6"])
    );
    // Without the en passant target the pinned pawn can not move at all.
    assert_eq!(
        get_moves(&setup("6qk/8/8/3Pp3/8/8/K7/8 w - - 0 1")),
        sorted_moves(&["a2a1", "a2a3", "a2b1", "a2b2", "a2b3"])
    );
    // A file pin: the pawn may push but never leave the file.
    assert_eq!(
        get_moves(&setup("k3r3/8/8/8/8/4P3/4K3/8 w - - 0 1")),
        sorted_moves(&["e3e4", "e2d1", "e2d2", "e2d3", "e2e1", "e2f1", "e2f2", "e2f3"])
    );
}

#[test]
fn promotions_with_capture() {
    assert_eq!(
        get_moves(&setup("2n4k/1P6/8/8/8/8/8/K7 w - - 0 1")),
        sorted_moves(&[
            "b7b8q", "b7b8r", "b7b8b", "b7b8n", "b7c8q", "b7c8r", "b7c8b", "b7c8n", "a1a2", "a1b1",
            "a1b2"
        ])
    );
}

#[test]
fn castling_in_legal_move_set() {
    let moves = get_moves(&setup("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1"));
    assert!(moves.contains(&"e1g1".to_string()));
    assert!(moves.contains(&"e1c1".to_string()));
    // Black's rights are not White's moves.
    assert!(!moves.contains(&"e8g8".to_string()));
}

#[test]
fn legal_moves_never_leave_own_king_attacked() {
    for fen in [
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        "r1b1qrk1/ppp2pbp/n2p1np1/4p1B1/2PPP3/2NB1N1P/PP3PP1/R2QK2R w KQ e6 0 9",
        "6qk/8/8/3Pp3/8/8/K7/8 w - e6 0 1",
        "3kn3/R2p1N2/8/8/7B/6K1/3R4/8 b - - 0 1",
        "2r3r1/p3k3/1p3pp1/1B5p/5P2/2P1p1P1/PP4KP/3R4 w - - 0 34",
    ] {
        let position = setup(fen);
        let mover = position.side_to_move();
        for mv in position.legal_moves() {
            let next = position.make_move(&mv);
            assert!(
                !next.is_attacked(next.king(mover), mover.opponent()),
                "{mv} leaves the king attacked in {fen}"
            );
        }
    }
}

#[test]
fn perft_like_depth_two_from_start() {
    // Every reply count after each of the 20 openers adds up to the known
    // 400 positions at depth 2.
    let position = Position::starting();
    let total: usize = position
        .legal_moves()
        .iter()
        .map(|mv| position.make_move(mv).legal_moves().len())
        .sum();
    assert_eq!(total, 400);
}

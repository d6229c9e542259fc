//! Per-piece pseudo-legal move generation.
//!
//! A pseudo-legal move obeys the piece's movement geometry and never lands on
//! a friendly piece, but it may still leave the mover's own king attacked.
//! Filtering those out is the job of
//! [`crate::chess::position::Position::legal_moves_from`], which simulates
//! each candidate and discards the ones failing the check test.

use strum::IntoEnumIterator;

use crate::chess::core::{CastlingSide, File, Piece, PieceKind, Promotion, Rank, Square};
use crate::chess::moves::{Consequence, Move, MoveList};
use crate::chess::position::Position;

const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];
const KING_STEPS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];
const ORTHOGONALS: [(i8, i8); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
const DIAGONALS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// Generates the moves following `piece`'s movement geometry from `from`.
///
/// `check_check` suppresses castling candidates for the king. Castling
/// legality asks whether the king's transit squares are attacked, which
/// enumerates the opponent's pseudo-legal moves; those must not expand
/// castling again or attack detection would recurse forever.
pub(crate) fn pseudo_legal_moves(
    position: &Position,
    from: Square,
    piece: Piece,
    check_check: bool,
) -> MoveList {
    match piece.kind {
        PieceKind::Pawn => pawn_moves(position, from, piece),
        PieceKind::Knight => step_moves(position, from, piece, &KNIGHT_JUMPS),
        PieceKind::Bishop => sliding_moves(position, from, piece, &DIAGONALS),
        PieceKind::Rook => sliding_moves(position, from, piece, &ORTHOGONALS),
        PieceKind::Queen => {
            let mut moves = sliding_moves(position, from, piece, &ORTHOGONALS);
            moves.extend(sliding_moves(position, from, piece, &DIAGONALS));
            moves
        },
        PieceKind::King => king_moves(position, from, piece, check_check),
    }
}

/// Single-step moves over a fixed offset table (knight jumps and king steps):
/// in-bounds targets not occupied by a friendly piece.
fn step_moves(
    position: &Position,
    from: Square,
    piece: Piece,
    offsets: &[(i8, i8)],
) -> MoveList {
    let mut moves = MoveList::new();
    for &(file_delta, rank_delta) in offsets {
        let Some(to) = from.offset(file_delta, rank_delta) else {
            continue;
        };
        match position.at(to) {
            None => moves.push(Move::new(piece, from, to, None)),
            Some(other) if other.owner != piece.owner => {
                moves.push(Move::new(piece, from, to, Some(Consequence::Capture(to))));
            },
            Some(_) => {},
        }
    }
    moves
}

/// Ray-casts along each direction, stopping at the first occupied square
/// (capturing an enemy, excluding a friend) or the board edge.
fn sliding_moves(
    position: &Position,
    from: Square,
    piece: Piece,
    directions: &[(i8, i8)],
) -> MoveList {
    let mut moves = MoveList::new();
    for &(file_delta, rank_delta) in directions {
        let mut cursor = from.offset(file_delta, rank_delta);
        while let Some(to) = cursor {
            match position.at(to) {
                None => {
                    moves.push(Move::new(piece, from, to, None));
                    cursor = to.offset(file_delta, rank_delta);
                },
                Some(other) if other.owner != piece.owner => {
                    moves.push(Move::new(piece, from, to, Some(Consequence::Capture(to))));
                    break;
                },
                Some(_) => break,
            }
        }
    }
    moves
}

fn pawn_moves(position: &Position, from: Square, piece: Piece) -> MoveList {
    let mut moves = MoveList::new();
    let step = piece.owner.pawn_step();
    // Single push, and the double push from the starting rank when both
    // squares in front are empty.
    if let Some(to) = from.offset(0, step) {
        if position.at(to).is_none() {
            push_pawn_move(&mut moves, piece, from, to, None);
            if from.rank() == Rank::pawns_starting(piece.owner) {
                if let Some(jump) = to.offset(0, step) {
                    if position.at(jump).is_none() {
                        moves.push(Move::new(piece, from, jump, None));
                    }
                }
            }
        }
    }
    // Diagonal captures, including en passant against the snapshot's target.
    for file_delta in [-1, 1] {
        let Some(to) = from.offset(file_delta, step) else {
            continue;
        };
        match position.at(to) {
            Some(other) if other.owner != piece.owner => {
                push_pawn_move(&mut moves, piece, from, to, Some(Consequence::Capture(to)));
            },
            None if position.en_passant_square() == Some(to) => {
                let victim = to
                    .offset(0, -step)
                    .expect("en passant target always has a square behind it");
                moves.push(Move::new(
                    piece,
                    from,
                    to,
                    Some(Consequence::EnPassantCapture(victim)),
                ));
            },
            _ => {},
        }
    }
    moves
}

/// Pushes the move, fanning it out into one candidate per promotable piece
/// kind when the pawn reaches the last rank.
fn push_pawn_move(
    moves: &mut MoveList,
    piece: Piece,
    from: Square,
    to: Square,
    consequence: Option<Consequence>,
) {
    if to.rank() == Rank::backrank(piece.owner.opponent()) {
        for promotion in Promotion::iter() {
            moves.push(Move::new(
                piece,
                from,
                to,
                Some(Consequence::Promotion(promotion)),
            ));
        }
    } else {
        moves.push(Move::new(piece, from, to, consequence));
    }
}

fn king_moves(position: &Position, from: Square, piece: Piece, check_check: bool) -> MoveList {
    let mut moves = step_moves(position, from, piece, &KING_STEPS);
    if !check_check {
        for side in [CastlingSide::Short, CastlingSide::Long] {
            if let Some(castle) = castle_move(position, piece, from, side) {
                moves.push(castle);
            }
        }
    }
    moves
}

/// A castling candidate for `side`, or `None` when any of its gates fails:
/// the castling right must still be held, the king must stand on its original
/// square and not be in check, the squares between king and rook must be
/// empty, the king's transit squares must not be attacked, and the rook must
/// still be on its original square.
///
/// Queenside: the b-file square must be empty but may be attacked, since the
/// king never transits it.
fn castle_move(
    position: &Position,
    piece: Piece,
    from: Square,
    side: CastlingSide,
) -> Option<Move> {
    let player = piece.owner;
    if !position.castling().allows(player, side) {
        return None;
    }
    let rank = Rank::backrank(player);
    if from != Square::new(File::E, rank) {
        return None;
    }
    let (rook_file, king_file, rook_to_file): (File, File, File) = match side {
        CastlingSide::Short => (File::H, File::G, File::F),
        CastlingSide::Long => (File::A, File::C, File::D),
    };
    let between: &[File] = match side {
        CastlingSide::Short => &[File::F, File::G],
        CastlingSide::Long => &[File::B, File::C, File::D],
    };
    let transit: &[File] = match side {
        CastlingSide::Short => &[File::F, File::G],
        CastlingSide::Long => &[File::C, File::D],
    };
    let rook_square = Square::new(rook_file, rank);
    match position.at(rook_square) {
        Some(Piece {
            owner,
            kind: PieceKind::Rook,
        }) if owner == player => {},
        _ => return None,
    }
    if between
        .iter()
        .any(|file| position.at(Square::new(*file, rank)).is_some())
    {
        return None;
    }
    if position.is_attacked(from, player.opponent()) {
        return None;
    }
    if transit
        .iter()
        .any(|file| position.is_attacked(Square::new(*file, rank), player.opponent()))
    {
        return None;
    }
    Some(Move::new(
        piece,
        from,
        Square::new(king_file, rank),
        Some(Consequence::RookRelocation {
            from: rook_square,
            to: Square::new(rook_to_file, rank),
        }),
    ))
}

//! Move representation: a primary displacement plus the consequence that
//! distinguishes it from a plain relocation.

use std::fmt;

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::chess::core::{Piece, Promotion, Square};

/// Longest list a single piece can produce: a queen in the centre of an open
/// board reaches 27 squares.
pub const MAX_PIECE_MOVES: usize = 28;

/// Moves a single piece can make, allocated on the stack.
pub type MoveList = ArrayVec<Move, MAX_PIECE_MOVES>;

/// A move of one piece: the moving piece, its origin and destination, and at
/// most one [`Consequence`]. Castling moves describe the king's displacement
/// and always carry [`Consequence::RookRelocation`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    /// The piece being moved.
    pub piece: Piece,
    #[allow(missing_docs)]
    pub from: Square,
    #[allow(missing_docs)]
    pub to: Square,
    /// The side effect of the move, if it has one.
    pub consequence: Option<Consequence>,
}

/// Everything a move does to the board beyond the primary displacement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Consequence {
    /// The destination square holds an opposing piece that is removed.
    Capture(Square),
    /// The captured pawn sits one rank behind the destination square, not on
    /// it.
    EnPassantCapture(Square),
    /// The moved pawn is replaced by the chosen piece kind on arrival. A
    /// capturing promotion still carries `Promotion`: the capture is implied
    /// by the occupied destination.
    Promotion(Promotion),
    /// Castling relocates the rook over the king in the same turn.
    RookRelocation {
        #[allow(missing_docs)]
        from: Square,
        #[allow(missing_docs)]
        to: Square,
    },
}

impl Move {
    #[must_use]
    pub(crate) const fn new(
        piece: Piece,
        from: Square,
        to: Square,
        consequence: Option<Consequence>,
    ) -> Self {
        Self {
            piece,
            from,
            to,
            consequence,
        }
    }

    /// The piece kind this move promotes to, if it is a promotion.
    #[must_use]
    pub const fn promotion(&self) -> Option<Promotion> {
        match self.consequence {
            Some(Consequence::Promotion(promotion)) => Some(promotion),
            _ => None,
        }
    }

    /// Whether the move removes an opposing piece from the board.
    #[must_use]
    pub const fn is_capture(&self) -> bool {
        matches!(
            self.consequence,
            Some(Consequence::Capture(_) | Consequence::EnPassantCapture(_))
        )
    }
}

impl fmt::Display for Move {
    /// Serializes a move in [UCI format]. Castling prints as the king's
    /// two-square displacement (e1g1).
    ///
    /// [UCI format]: http://wbec-ridderkerk.nl/html/UCIProtocol.html
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promotion) = self.promotion() {
            write!(f, "{promotion}")?;
        }
        Ok(())
    }
}

/// Destination squares of a batch of moves, for highlighting.
pub fn target_squares<'a>(
    moves: impl IntoIterator<Item = &'a Move> + 'a,
) -> impl Iterator<Item = Square> + 'a {
    moves.into_iter().map(|mv| mv.to)
}

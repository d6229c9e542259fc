//! Fully-specified, immutable position snapshot: board occupancy, side to
//! move, castling rights, en passant target, move clocks and the resolution
//! status. It has a 1:1 relationship with [Forsyth-Edwards Notation] (FEN).
//!
//! The legality filter and the pure snapshot transition live here as the only
//! ways of deriving new positions.
//!
//! [Forsyth-Edwards Notation]: https://www.chessprogramming.org/Forsyth-Edwards_Notation

use std::fmt::{self, Write};
use std::num::NonZeroU16;

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::chess::board::Board;
use crate::chess::core::{CastleRights, Piece, PieceKind, Player, Rank, Square};
use crate::chess::movegen::pseudo_legal_moves;
use crate::chess::moves::{Consequence, Move, MoveList};

/// Terminal or non-terminal status of a position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    /// The game goes on: the side to move has at least one legal move.
    InProgress,
    /// The side to move has no legal moves and their king is attacked.
    Checkmate {
        #[allow(missing_docs)]
        winner: Player,
    },
    /// The side to move has no legal moves but their king is safe.
    Stalemate,
    /// Nobody can win anymore.
    Draw {
        #[allow(missing_docs)]
        reason: DrawReason,
    },
}

/// Why a position is drawn.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrawReason {
    FiftyMoveRule,
    InsufficientMaterial,
}

impl Resolution {
    /// Whether the game is over and no further moves are accepted.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InProgress => f.write_str("in progress"),
            Self::Checkmate {
                winner: Player::White,
            } => f.write_str("checkmate, white wins"),
            Self::Checkmate {
                winner: Player::Black,
            } => f.write_str("checkmate, black wins"),
            Self::Stalemate => f.write_str("stalemate"),
            Self::Draw {
                reason: DrawReason::FiftyMoveRule,
            } => f.write_str("draw by the fifty-move rule"),
            Self::Draw {
                reason: DrawReason::InsufficientMaterial,
            } => f.write_str("draw by insufficient material"),
        }
    }
}

/// One complete, immutable state of the game at a point in its history.
///
/// A position is only ever derived from another one through [`Self::make_move`],
/// which returns a new value and leaves its input untouched: histories can
/// hold snapshots without defensive copying.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    board: Board,
    side_to_move: Player,
    castling: CastleRights,
    en_passant_square: Option<Square>,
    /// [Halfmove Clock] keeps track of the number of (half-)moves since the
    /// last capture or pawn move and is used to enforce the fifty-move draw
    /// rule.
    ///
    /// [Halfmove Clock]: https://www.chessprogramming.org/Halfmove_Clock
    halfmove_clock: u8,
    fullmove_counter: NonZeroU16,
    resolution: Resolution,
}

impl Position {
    /// Creates the starting position of the standard chess variant.
    ///
    /// ```
    /// use tabia::chess::position::Position;
    ///
    /// let starting_position = Position::starting();
    /// assert_eq!(
    ///     &starting_position.to_string(),
    ///     "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
    /// );
    /// ```
    #[must_use]
    pub fn starting() -> Self {
        Self {
            board: Board::starting(),
            side_to_move: Player::White,
            castling: CastleRights::ALL,
            en_passant_square: None,
            halfmove_clock: 0,
            fullmove_counter: NonZeroU16::MIN,
            resolution: Resolution::InProgress,
        }
    }

    /// Parses a position from FEN. A trimmed 4-part version (without the move
    /// clocks) is accepted as well, for compatibility with position databases
    /// that drop them.
    ///
    /// # Errors
    ///
    /// Returns an error when the text is not structurally valid FEN or the
    /// described position violates the game invariants (exactly one king per
    /// player, at most eight pawns, no pawns on backranks, a plausible en
    /// passant square).
    pub fn from_fen(input: &str) -> anyhow::Result<Self> {
        let parts: Vec<&str> = input.split_whitespace().collect();
        if parts.len() != 6 && parts.len() != 4 {
            bail!(
                "FEN should have 6 parts (or 4 with the clocks trimmed), got {}",
                parts.len()
            );
        }
        let board = Board::from_placement(parts[0])?;
        let side_to_move = Player::try_from(parts[1])?;
        let castling = CastleRights::try_from(parts[2])?;
        let en_passant_square = match parts[3] {
            "-" => None,
            square => Some(Square::try_from(square)?),
        };
        let (halfmove_clock, fullmove_counter) = if parts.len() == 6 {
            (
                parts[4].parse::<u8>().context("parsing halfmove clock")?,
                parts[5]
                    .parse::<NonZeroU16>()
                    .context("parsing fullmove counter")?,
            )
        } else {
            (0, NonZeroU16::MIN)
        };
        let mut position = Self {
            board,
            side_to_move,
            castling,
            en_passant_square,
            halfmove_clock,
            fullmove_counter,
            resolution: Resolution::InProgress,
        };
        position.validate()?;
        position.resolution = position.compute_resolution();
        Ok(position)
    }

    fn validate(&self) -> anyhow::Result<()> {
        for (player, name) in [(Player::White, "white"), (Player::Black, "black")] {
            let kings = self.board.count(player, PieceKind::King);
            if kings != 1 {
                bail!("expected 1 {name} king, got {kings}");
            }
            let pawns = self.board.count(player, PieceKind::Pawn);
            if pawns > 8 {
                bail!("expected <= 8 {name} pawns, got {pawns}");
            }
        }
        for square in Square::iter() {
            if matches!(
                self.board.at(square),
                Some(Piece {
                    kind: PieceKind::Pawn,
                    ..
                })
            ) && matches!(square.rank(), Rank::One | Rank::Eight)
            {
                bail!("pawns can not be placed on backranks");
            }
        }
        if let Some(square) = self.en_passant_square {
            let expected_rank = match self.side_to_move {
                Player::White => Rank::Six,
                Player::Black => Rank::Three,
            };
            if square.rank() != expected_rank {
                bail!(
                    "expected en passant square to be on rank {expected_rank}, got {}",
                    square.rank()
                );
            }
            // A pawn that was just double-pushed by the opponent should be in
            // front of the en passant square.
            let pushed_pawn = square
                .offset(0, self.they().pawn_step())
                .expect("we already checked for correct rank");
            match self.board.at(pushed_pawn) {
                Some(Piece {
                    owner,
                    kind: PieceKind::Pawn,
                }) if owner == self.they() => {},
                _ => bail!("en passant square is not beyond pushed pawn"),
            }
        }
        Ok(())
    }

    /// The player who makes the next move.
    #[must_use]
    pub const fn side_to_move(&self) -> Player {
        self.side_to_move
    }

    pub(crate) const fn us(&self) -> Player {
        self.side_to_move
    }

    pub(crate) const fn they(&self) -> Player {
        self.us().opponent()
    }

    /// The board occupancy.
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the piece occupying `square`, if any. Total for all 64
    /// squares.
    #[must_use]
    pub const fn at(&self, square: Square) -> Option<Piece> {
        self.board.at(square)
    }

    /// Remaining castling rights of both players.
    #[must_use]
    pub const fn castling(&self) -> CastleRights {
        self.castling
    }

    /// The square a double-pushed pawn passed over on the previous move, if
    /// any: the only square where an en passant capture may land.
    #[must_use]
    pub const fn en_passant_square(&self) -> Option<Square> {
        self.en_passant_square
    }

    /// Terminal or non-terminal status of this position.
    #[must_use]
    pub const fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Locates `player`'s king.
    ///
    /// # Panics
    ///
    /// Positions are validated to hold exactly one king per player on every
    /// construction path; a missing king is a programming error.
    #[must_use]
    pub fn king(&self, player: Player) -> Square {
        self.board
            .king(player)
            .expect("a validated position holds one king per player")
    }

    /// Whether any of `by`'s pseudo-legal moves targets `square`. Castling
    /// expansion is suppressed while answering this, so attack detection and
    /// castling validation can not recurse into each other.
    #[must_use]
    pub fn is_attacked(&self, square: Square, by: Player) -> bool {
        self.board.occupied(by).any(|(from, piece)| {
            pseudo_legal_moves(self, from, piece, true)
                .iter()
                .any(|mv| mv.to == square)
        })
    }

    /// Whether the side to move is currently in check.
    #[must_use]
    pub fn in_check(&self) -> bool {
        self.is_attacked(self.king(self.us()), self.they())
    }

    /// Moves following the geometry of the piece at `from`, ignoring king
    /// safety. Empty when the square is empty.
    #[must_use]
    pub fn pseudo_legal_moves_from(&self, from: Square) -> MoveList {
        match self.at(from) {
            Some(piece) => pseudo_legal_moves(self, from, piece, false),
            None => MoveList::new(),
        }
    }

    /// Calculates the legal moves of the piece at `from`: pseudo-legal moves
    /// that do not leave the mover's own king attacked.
    ///
    /// Every candidate is simulated through the snapshot transition and
    /// discarded if the resulting position has the mover's king attacked.
    /// There is no shortcut for "obviously safe" moves: pins and discovered
    /// checks are only detected this way.
    #[must_use]
    pub fn legal_moves_from(&self, from: Square) -> Vec<Move> {
        let Some(piece) = self.at(from) else {
            return Vec::new();
        };
        pseudo_legal_moves(self, from, piece, false)
            .into_iter()
            .filter(|mv| {
                let next = self.apply(mv);
                !next.is_attacked(next.king(piece.owner), piece.owner.opponent())
            })
            .collect()
    }

    /// Calculates all legal moves of the side to move.
    #[must_use]
    pub fn legal_moves(&self) -> Vec<Move> {
        // The average branching factor of chess is around 35.
        let mut moves = Vec::with_capacity(50);
        for (from, _) in self.board.occupied(self.us()) {
            moves.extend(self.legal_moves_from(from));
        }
        moves
    }

    fn has_any_legal_move(&self) -> bool {
        self.board
            .occupied(self.us())
            .any(|(from, _)| !self.legal_moves_from(from).is_empty())
    }

    /// Applies a validated move, producing the next position with its
    /// resolution computed. The input position is left untouched.
    ///
    /// The move must come from [`Self::legal_moves_from`]: applying an illegal
    /// move is a programming error, not a recoverable condition, and is only
    /// caught by debug assertions.
    #[must_use]
    pub fn make_move(&self, mv: &Move) -> Self {
        debug_assert!(
            !self.resolution.is_terminal(),
            "moves can not be applied to a resolved position"
        );
        debug_assert!(
            self.legal_moves_from(mv.from).contains(mv),
            "applying an illegal move is a programming error"
        );
        let mut next = self.apply(mv);
        next.resolution = next.compute_resolution();
        next
    }

    /// The raw transition: board mutation on a cloned board, castling rights
    /// and en passant bookkeeping, clocks and turn flip. Resolution is left
    /// `InProgress`: the legality filter simulates moves through this and
    /// computing resolution there would recurse into move generation.
    fn apply(&self, mv: &Move) -> Self {
        let mut board = self.board.clone();
        let moved = board
            .take(mv.from)
            .expect("transition precondition: the moving piece is on its origin square");
        let mut captured = board.take(mv.to);
        match mv.consequence {
            Some(Consequence::EnPassantCapture(victim)) => captured = board.take(victim),
            Some(Consequence::RookRelocation { from, to }) => {
                let rook = board
                    .take(from)
                    .expect("castling precondition: the rook is on its origin square");
                board.put(to, rook);
            },
            _ => {},
        }
        let placed = match mv.consequence {
            Some(Consequence::Promotion(promotion)) => Piece {
                owner: moved.owner,
                kind: promotion.into(),
            },
            _ => moved,
        };
        board.put(mv.to, placed);

        // Moving or capturing a king or rook permanently clears the
        // corresponding rights; touching any other square clears nothing.
        let mut castling = self.castling;
        castling.remove(rights_touched(mv.from) | rights_touched(mv.to));

        let en_passant_square = if moved.kind == PieceKind::Pawn
            && (mv.from.rank() as i8 - mv.to.rank() as i8).abs() == 2
        {
            mv.from.offset(0, moved.owner.pawn_step())
        } else {
            None
        };

        let halfmove_clock = if moved.kind == PieceKind::Pawn || captured.is_some() {
            0
        } else {
            self.halfmove_clock.saturating_add(1)
        };
        let fullmove_counter = match moved.owner {
            Player::White => self.fullmove_counter,
            Player::Black => self.fullmove_counter.saturating_add(1),
        };

        Self {
            board,
            side_to_move: self.side_to_move.opponent(),
            castling,
            en_passant_square,
            halfmove_clock,
            fullmove_counter,
            resolution: Resolution::InProgress,
        }
    }

    fn compute_resolution(&self) -> Resolution {
        if !self.has_any_legal_move() {
            if self.in_check() {
                return Resolution::Checkmate {
                    winner: self.they(),
                };
            }
            return Resolution::Stalemate;
        }
        if self.halfmove_clock >= 100 {
            return Resolution::Draw {
                reason: DrawReason::FiftyMoveRule,
            };
        }
        if self.insufficient_material() {
            return Resolution::Draw {
                reason: DrawReason::InsufficientMaterial,
            };
        }
        Resolution::InProgress
    }

    /// Bare kings, or a king and a single minor piece against a bare king:
    /// no sequence of legal moves can deliver mate.
    fn insufficient_material(&self) -> bool {
        let mut minors = 0;
        for player in [Player::White, Player::Black] {
            for (_, piece) in self.board.occupied(player) {
                match piece.kind {
                    PieceKind::King => {},
                    PieceKind::Bishop | PieceKind::Knight => minors += 1,
                    _ => return false,
                }
            }
        }
        minors <= 1
    }
}

const fn rights_touched(square: Square) -> CastleRights {
    match square {
        Square::A1 => CastleRights::WHITE_LONG,
        Square::E1 => CastleRights::WHITE_BOTH,
        Square::H1 => CastleRights::WHITE_SHORT,
        Square::A8 => CastleRights::BLACK_LONG,
        Square::E8 => CastleRights::BLACK_BOTH,
        Square::H8 => CastleRights::BLACK_SHORT,
        _ => CastleRights::NONE,
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::starting()
    }
}

impl TryFrom<&str> for Position {
    type Error = anyhow::Error;

    fn try_from(input: &str) -> anyhow::Result<Self> {
        Self::from_fen(input)
    }
}

impl fmt::Display for Position {
    /// Serializes the position as FEN.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} ",
            self.board.placement(),
            self.side_to_move,
            self.castling
        )?;
        match self.en_passant_square {
            Some(square) => write!(f, "{square}")?,
            None => f.write_char('-')?,
        }
        write!(f, " {} {}", self.halfmove_clock, self.fullmove_counter)
    }
}

impl fmt::Debug for Position {
    /// The board grid followed by the FEN line, for readable test failures.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.board)?;
        write!(f, "{self}")
    }
}

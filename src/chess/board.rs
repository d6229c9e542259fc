//! Square-centric [mailbox] board: 64 squares, each possibly occupied by a
//! piece. This is not the fastest board representation available, but it is
//! the most direct one for a rules engine that answers "what is on this
//! square" far more often than "where are all the rooks".
//!
//! [mailbox]: https://www.chessprogramming.org/Mailbox

use std::fmt::{self, Write};

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::chess::core::{File, Piece, PieceKind, Player, Rank, Square, BOARD_SIZE, BOARD_WIDTH};

/// Maps every [`Square`] to its occupant. The mapping is total: all 64
/// squares always exist, empty ones hold `None`.
///
/// Boards compare structurally and are cheap to clone; the snapshot
/// transition clones the previous board instead of mutating it.
#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    squares: [Option<Piece>; BOARD_SIZE as usize],
}

impl Board {
    /// Creates a board with no pieces on it.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            squares: [None; BOARD_SIZE as usize],
        }
    }

    /// Creates a board with the standard starting arrangement.
    #[must_use]
    pub fn starting() -> Self {
        const BACKRANK: [PieceKind; BOARD_WIDTH as usize] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        let mut board = Self::empty();
        for (file, kind) in File::iter().zip(BACKRANK) {
            for player in [Player::White, Player::Black] {
                board.put(
                    Square::new(file, Rank::backrank(player)),
                    Piece { owner: player, kind },
                );
                board.put(
                    Square::new(file, Rank::pawns_starting(player)),
                    Piece {
                        owner: player,
                        kind: PieceKind::Pawn,
                    },
                );
            }
        }
        board
    }

    /// Returns the piece occupying `square`, if any. Total: never fails for
    /// any of the 64 squares.
    #[must_use]
    pub const fn at(&self, square: Square) -> Option<Piece> {
        self.squares[square as usize]
    }

    pub(crate) fn put(&mut self, square: Square, piece: Piece) {
        debug_assert!(
            self.squares[square as usize].is_none(),
            "can't put a piece on already occupied {square}"
        );
        self.squares[square as usize] = Some(piece);
    }

    pub(crate) fn take(&mut self, square: Square) -> Option<Piece> {
        self.squares[square as usize].take()
    }

    /// Locates `player`'s king.
    #[must_use]
    pub fn king(&self, player: Player) -> Option<Square> {
        self.occupied(player)
            .find(|(_, piece)| piece.kind == PieceKind::King)
            .map(|(square, _)| square)
    }

    /// Iterates over the squares holding `player`'s pieces.
    pub fn occupied(&self, player: Player) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::iter()
            .filter_map(|square| self.at(square).map(|piece| (square, piece)))
            .filter(move |(_, piece)| piece.owner == player)
    }

    pub(crate) fn count(&self, player: Player, kind: PieceKind) -> usize {
        self.occupied(player)
            .filter(|(_, piece)| piece.kind == kind)
            .count()
    }

    /// Parses the piece placement chunk of FEN: ranks from eighth to first,
    /// separated by '/', with digits standing for runs of empty squares.
    ///
    /// # Errors
    ///
    /// Returns an error for a wrong rank count, an over- or underfull rank or
    /// an unknown piece symbol.
    pub fn from_placement(placement: &str) -> anyhow::Result<Self> {
        let mut board = Self::empty();
        let ranks: Vec<_> = placement.split('/').collect();
        if ranks.len() != BOARD_WIDTH as usize {
            bail!(
                "piece placement should have 8 ranks, got {}",
                ranks.len()
            );
        }
        for (chunk, rank_index) in ranks.iter().zip((0..BOARD_WIDTH).rev()) {
            let rank = Rank::try_from(rank_index)?;
            let mut file = 0u8;
            for symbol in chunk.chars() {
                if let Some(skip) = symbol.to_digit(10) {
                    if skip == 0 || skip > u32::from(BOARD_WIDTH) {
                        bail!("invalid empty square run in rank {rank}: {skip}");
                    }
                    file += skip as u8;
                    continue;
                }
                let piece = Piece::try_from(symbol)
                    .with_context(|| format!("in placement rank {rank}"))?;
                board.put(Square::new(File::try_from(file)?, rank), piece);
                file += 1;
            }
            if file != BOARD_WIDTH {
                bail!("rank {rank} describes {file} files, want {BOARD_WIDTH}");
            }
        }
        Ok(board)
    }

    /// Formats the piece placement chunk of FEN.
    #[must_use]
    pub fn placement(&self) -> String {
        let mut result = String::with_capacity(BOARD_SIZE as usize);
        for rank_index in (0..BOARD_WIDTH).rev() {
            let rank = Rank::try_from(rank_index).expect("iterating valid ranks");
            let mut empty_run = 0;
            for file in File::iter() {
                match self.at(Square::new(file, rank)) {
                    Some(piece) => {
                        if empty_run > 0 {
                            result.push_str(&empty_run.to_string());
                            empty_run = 0;
                        }
                        result.push_str(&piece.to_string());
                    },
                    None => empty_run += 1,
                }
            }
            if empty_run > 0 {
                result.push_str(&empty_run.to_string());
            }
            if rank_index > 0 {
                result.push('/');
            }
        }
        result
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::starting()
    }
}

impl fmt::Display for Board {
    /// Draws the board as an ASCII grid from White's perspective, with rank
    /// and file labels.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for rank_index in (0..BOARD_WIDTH).rev() {
            let rank = Rank::try_from(rank_index).expect("iterating valid ranks");
            write!(f, "{rank} ")?;
            for file in File::iter() {
                match self.at(Square::new(file, rank)) {
                    Some(piece) => write!(f, " {piece}")?,
                    None => f.write_str(" .")?,
                }
            }
            f.write_char('\n')?;
        }
        f.write_str("   a b c d e f g h")
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{self}")
    }
}

// The placement string is the canonical wire form of a board: serde has no
// built-in support for 64-element arrays and the text round-trips exactly.
impl Serialize for Board {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.placement())
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let placement = String::deserialize(deserializer)?;
        Self::from_placement(&placement).map_err(serde::de::Error::custom)
    }
}

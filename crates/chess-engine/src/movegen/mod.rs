//! Move generation.
//!
//! Moves are produced in two stages. [`pseudo_legal_moves`] follows each
//! piece's movement pattern and ignores king safety; [`legal_moves`] then
//! applies every candidate to a copy of the position and keeps it only if the
//! mover's king is not attacked afterwards. Check detection reuses the
//! generator itself in [`GenMode::CheckProbe`], which never produces castling
//! moves, so probing cannot recurse back into check detection.

mod attacks;
mod castling;
mod make;
pub mod perft;

use crate::Position;
use chess_core::{Color, Move, Piece};

pub use attacks::{
    BISHOP_DIRECTIONS, KING_OFFSETS, KNIGHT_OFFSETS, QUEEN_DIRECTIONS, ROOK_DIRECTIONS,
};
pub use make::make_move;

/// Inline, fixed-capacity move buffer.
///
/// Generation runs once per node and once more per candidate during the
/// legality filter, so the list never touches the heap.
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; Self::MAX_MOVES],
    len: usize,
}

impl MoveList {
    /// Room for every pseudo-legal move of any reachable position.
    pub const MAX_MOVES: usize = 256;

    #[inline]
    pub const fn new() -> Self {
        MoveList {
            moves: [Move::NULL; Self::MAX_MOVES],
            len: 0,
        }
    }

    #[inline]
    pub fn push(&mut self, m: Move) {
        debug_assert!(self.len < Self::MAX_MOVES);
        self.moves[self.len] = m;
        self.len += 1;
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.as_slice().iter()
    }

    /// Keeps only the moves matching `f`, preserving their order.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&Move) -> bool,
    {
        let mut write = 0;
        for read in 0..self.len {
            if f(&self.moves[read]) {
                self.moves[write] = self.moves[read];
                write += 1;
            }
        }
        self.len = write;
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Index<usize> for MoveList {
    type Output = Move;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.as_slice()[index]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

/// How much of the movement rules to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenMode {
    /// Every pseudo-legal move, castling included.
    Full,
    /// Castling suppressed. Used when asking whether a king is attacked.
    CheckProbe,
}

/// Generates every pseudo-legal move for `color`'s pieces.
///
/// Pieces are visited in ascending square order, and each piece's moves come
/// out in the order of its direction or offset table. En-passant captures are
/// only produced when `color` is the side to move.
pub fn pseudo_legal_moves(position: &Position, color: Color, mode: GenMode) -> MoveList {
    let mut moves = MoveList::new();
    let occupancy = attacks::Occupancy::new(position, color);

    for from in position.occupancy(color) {
        let Some(piece) = Piece::ALL
            .into_iter()
            .find(|p| position.pieces(*p, color).contains(from))
        else {
            continue;
        };
        match piece {
            Piece::Pawn => attacks::pawn_moves(position, &occupancy, from, color, &mut moves),
            Piece::Knight => attacks::leaper_moves(
                &occupancy,
                from,
                Piece::Knight,
                color,
                &KNIGHT_OFFSETS,
                &mut moves,
            ),
            Piece::Bishop => attacks::slider_moves(
                &occupancy,
                from,
                Piece::Bishop,
                color,
                &BISHOP_DIRECTIONS,
                &mut moves,
            ),
            Piece::Rook => attacks::slider_moves(
                &occupancy,
                from,
                Piece::Rook,
                color,
                &ROOK_DIRECTIONS,
                &mut moves,
            ),
            Piece::Queen => attacks::slider_moves(
                &occupancy,
                from,
                Piece::Queen,
                color,
                &QUEEN_DIRECTIONS,
                &mut moves,
            ),
            Piece::King => {
                attacks::leaper_moves(
                    &occupancy,
                    from,
                    Piece::King,
                    color,
                    &KING_OFFSETS,
                    &mut moves,
                );
                if mode == GenMode::Full {
                    castling::castling_moves(position, color, &mut moves);
                }
            }
        }
    }

    moves
}

/// Returns true if `color`'s king is attacked by any enemy piece.
///
/// A side without a king is never in check.
pub fn is_in_check(position: &Position, color: Color) -> bool {
    let Some(king) = position.king_square(color) else {
        return false;
    };
    pseudo_legal_moves(position, color.opposite(), GenMode::CheckProbe)
        .iter()
        .any(|m| m.to() == king)
}

/// Generates all legal moves for the side to move.
///
/// # Panics
///
/// Panics if the side to move has no king; such positions only arise inside
/// search after a king capture and must be treated as terminal there.
pub fn legal_moves(position: &Position) -> MoveList {
    let us = position.side_to_move();
    assert!(
        position.king_square(us).is_some(),
        "legal_moves called for {} without a king: {}",
        us,
        position.to_fen()
    );

    let mut moves = pseudo_legal_moves(position, us, GenMode::Full);
    moves.retain(|m| !is_in_check(&make_move(position, *m), us));
    moves
}

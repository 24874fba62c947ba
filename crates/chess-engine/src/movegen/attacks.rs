//! Movement rules for each piece kind.
//!
//! Offsets and directions are `(file_delta, rank_delta)` pairs. Their order
//! fixes the order in which a piece's moves are produced.

use super::MoveList;
use crate::{Bitboard, Position};
use chess_core::{Color, Move, MoveFlag, Piece, Square};

/// Knight leaps.
pub const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

/// King steps (castling is handled separately).
pub const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

pub const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

pub const ROOK_DIRECTIONS: [(i8, i8); 4] = [(-1, 0), (0, -1), (0, 1), (1, 0)];

pub const QUEEN_DIRECTIONS: [(i8, i8); 8] = [
    (-1, 0),
    (0, -1),
    (0, 1),
    (1, 0),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];

/// Own and enemy occupancy, computed once per generation pass.
pub(super) struct Occupancy {
    own: Bitboard,
    theirs: Bitboard,
}

impl Occupancy {
    pub(super) fn new(position: &Position, color: Color) -> Self {
        Occupancy {
            own: position.occupancy(color),
            theirs: position.occupancy(color.opposite()),
        }
    }

    #[inline]
    fn is_empty(&self, sq: Square) -> bool {
        !(self.own | self.theirs).contains(sq)
    }
}

/// Bishop, rook and queen moves: walk each ray until the edge or a piece.
pub(super) fn slider_moves(
    occupancy: &Occupancy,
    from: Square,
    piece: Piece,
    color: Color,
    directions: &[(i8, i8)],
    moves: &mut MoveList,
) {
    for &(file_delta, rank_delta) in directions {
        let mut cursor = from;
        while let Some(to) = cursor.offset(file_delta, rank_delta) {
            if occupancy.own.contains(to) {
                break;
            }
            let m = Move::new(piece, color, from, to);
            if occupancy.theirs.contains(to) {
                moves.push(m.capturing());
                break;
            }
            moves.push(m);
            cursor = to;
        }
    }
}

/// Knight and (non-castling) king moves from a fixed offset table.
pub(super) fn leaper_moves(
    occupancy: &Occupancy,
    from: Square,
    piece: Piece,
    color: Color,
    offsets: &[(i8, i8)],
    moves: &mut MoveList,
) {
    for &(file_delta, rank_delta) in offsets {
        let Some(to) = from.offset(file_delta, rank_delta) else {
            continue;
        };
        if occupancy.own.contains(to) {
            continue;
        }
        let m = Move::new(piece, color, from, to);
        if occupancy.theirs.contains(to) {
            moves.push(m.capturing());
        } else {
            moves.push(m);
        }
    }
}

/// Pawn pushes, double pushes, diagonal captures and en passant.
pub(super) fn pawn_moves(
    position: &Position,
    occupancy: &Occupancy,
    from: Square,
    color: Color,
    moves: &mut MoveList,
) {
    let forward = color.pawn_direction();

    if let Some(one) = from.offset(0, forward).filter(|sq| occupancy.is_empty(*sq)) {
        push_pawn_move(Move::new(Piece::Pawn, color, from, one), moves);

        if from.rank() == color.pawn_rank() {
            if let Some(two) = one.offset(0, forward).filter(|sq| occupancy.is_empty(*sq)) {
                moves.push(
                    Move::new(Piece::Pawn, color, from, two).with_flag(MoveFlag::DoublePush),
                );
            }
        }
    }

    for file_delta in [-1, 1] {
        let Some(to) = from.offset(file_delta, forward) else {
            continue;
        };
        if occupancy.theirs.contains(to) {
            push_pawn_move(Move::new(Piece::Pawn, color, from, to).capturing(), moves);
        } else if position.en_passant() == Some(to) && position.side_to_move() == color {
            moves.push(Move::new(Piece::Pawn, color, from, to).with_flag(MoveFlag::EnPassant));
        }
    }
}

/// Pushes `m`, or its four promotions if it lands on the far rank.
fn push_pawn_move(m: Move, moves: &mut MoveList) {
    if m.to().rank() == m.color().promotion_rank() {
        for piece in Piece::PROMOTIONS {
            moves.push(m.with_flag(MoveFlag::Promotion(piece)));
        }
    } else {
        moves.push(m);
    }
}

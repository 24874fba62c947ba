//! Move application.

use crate::Position;
use chess_core::{CastleSide, Color, Move, Piece, Square};

/// Applies `m` to a copy of `position` and returns the successor.
///
/// The input is left untouched. `m` is expected to come from the generator
/// for this position; no legality checking is done here.
///
/// # Panics
///
/// Panics if `m.from()` is empty.
pub fn make_move(position: &Position, m: Move) -> Position {
    let mut next = position.clone();
    let us = m.color();
    let from = m.from();
    let to = m.to();

    let captured = if m.is_en_passant() {
        next.remove_piece(Square::new(to.file(), from.rank()))
    } else if m.is_capture() {
        next.remove_piece(to)
    } else {
        None
    };

    let (piece, _) = next
        .remove_piece(from)
        .unwrap_or_else(|| panic!("no piece on {} for move {}", from, m));
    next.put_piece(to, m.promotion().unwrap_or(piece), us);

    if let Some(side) = m.castle() {
        let rook_home = side.rook_home(us);
        if next.remove_piece(rook_home).is_some() {
            next.put_piece(side.rook_target(us), Piece::Rook, us);
        }
    }

    revoke_castling_rights(&mut next, piece, us, from, to, captured);

    next.set_en_passant(if m.is_double_push() {
        from.offset(0, us.pawn_direction())
    } else {
        None
    });

    if piece == Piece::Pawn || captured.is_some() {
        next.set_halfmove_clock(0);
    } else {
        next.set_halfmove_clock(position.halfmove_clock().saturating_add(1));
    }

    if us == Color::Black {
        next.set_fullmove_number(position.fullmove_number().saturating_add(1));
    }
    next.set_side_to_move(us.opposite());

    next
}

/// Drops every castling right that this move invalidates.
fn revoke_castling_rights(
    position: &mut Position,
    moved: Piece,
    us: Color,
    from: Square,
    to: Square,
    captured: Option<(Piece, Color)>,
) {
    let rights = position.castling_rights_mut();
    if rights.is_empty() {
        return;
    }

    if moved == Piece::King {
        rights.remove_color(us);
    }

    for side in CastleSide::BOTH {
        if moved == Piece::Rook && from == side.rook_home(us) {
            rights.remove(us, side);
        }
        if let Some((Piece::Rook, them)) = captured {
            if to == side.rook_home(them) {
                rights.remove(them, side);
            }
        }
    }
}

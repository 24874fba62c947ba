//! Castling move generation.

use super::{is_in_check, make_move, MoveList};
use crate::Position;
use chess_core::{CastleSide, Color, File, Move, MoveFlag, Piece, Square};

/// Appends the castling moves available to `color`.
///
/// A castle is offered when the king and rook stand on their home squares,
/// the right is retained, every square between them is empty, and the king
/// is not attacked on its home square, on the square it crosses, or on the
/// square it lands on. The last two are tested by actually stepping the king
/// there on a copy of the position.
pub(super) fn castling_moves(position: &Position, color: Color, moves: &mut MoveList) {
    let home = Square::new(File::E, color.home_rank());
    if position.king_square(color) != Some(home) {
        return;
    }
    let rights = position.castling_rights();
    if rights.is_empty() {
        return;
    }

    let mut in_check = None;
    for side in CastleSide::BOTH {
        if !rights.has(color, side) {
            continue;
        }
        let rook_home = side.rook_home(color);
        if !position.pieces(Piece::Rook, color).contains(rook_home) {
            continue;
        }
        if !corridor_is_empty(position, home, rook_home, side) {
            continue;
        }
        if *in_check.get_or_insert_with(|| is_in_check(position, color)) {
            return;
        }

        let Some(transit) = home.offset(side.direction(), 0) else {
            continue;
        };
        let Some(target) = transit.offset(side.direction(), 0) else {
            continue;
        };
        if king_attacked_on(position, color, home, transit)
            || king_attacked_on(position, color, home, target)
        {
            continue;
        }

        moves.push(
            Move::new(Piece::King, color, home, target).with_flag(MoveFlag::Castle(side)),
        );
    }
}

fn corridor_is_empty(position: &Position, king: Square, rook: Square, side: CastleSide) -> bool {
    let occupied = position.occupied();
    let mut cursor = king;
    while let Some(sq) = cursor.offset(side.direction(), 0) {
        if sq == rook {
            return true;
        }
        if occupied.contains(sq) {
            return false;
        }
        cursor = sq;
    }
    false
}

fn king_attacked_on(position: &Position, color: Color, home: Square, sq: Square) -> bool {
    let step = Move::new(Piece::King, color, home, sq);
    is_in_check(&make_move(position, step), color)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn castles(fen: &str) -> Vec<String> {
        let position = Position::from_fen(fen).unwrap();
        let mut moves = MoveList::new();
        castling_moves(&position, position.side_to_move(), &mut moves);
        moves.iter().map(|m| m.to_uci()).collect()
    }

    #[test]
    fn both_sides_with_full_rights() {
        assert_eq!(
            castles("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1"),
            vec!["e1g1", "e1c1"]
        );
        assert_eq!(
            castles("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1"),
            vec!["e8g8", "e8c8"]
        );
    }

    #[test]
    fn each_right_gates_its_own_move() {
        assert_eq!(castles("r3k2r/8/8/8/8/8/8/R3K2R w Qkq - 0 1"), vec!["e1c1"]);
        assert_eq!(castles("r3k2r/8/8/8/8/8/8/R3K2R w Kkq - 0 1"), vec!["e1g1"]);
        assert!(castles("r3k2r/8/8/8/8/8/8/R3K2R w kq - 0 1").is_empty());
    }

    #[test]
    fn rook_must_be_home() {
        assert_eq!(castles("r3k2r/8/8/8/8/8/7R/R3K3 w KQkq - 0 1"), vec!["e1c1"]);
    }

    #[test]
    fn corridor_must_be_empty() {
        // b1 is only crossed by the rook, but still blocks.
        assert_eq!(castles("r3k2r/8/8/8/8/8/8/RN2K2R w KQkq - 0 1"), vec!["e1g1"]);
        assert_eq!(castles("r3k2r/8/8/8/8/8/8/R3KB1R w KQkq - 0 1"), vec!["e1c1"]);
    }

    #[test]
    fn attacked_transit_square_suppresses_only_that_side() {
        // Black rook on f8 covers f1.
        assert_eq!(castles("4kr2/8/8/8/8/8/8/R3K2R w KQ - 0 1"), vec!["e1c1"]);
        // Black rook on d8 covers d1.
        assert_eq!(castles("3rk3/8/8/8/8/8/8/R3K2R w KQ - 0 1"), vec!["e1g1"]);
    }

    #[test]
    fn attacked_target_square_suppresses_castle() {
        assert_eq!(castles("4k1r1/8/8/8/8/8/8/R3K2R w KQ - 0 1"), vec!["e1c1"]);
    }

    #[test]
    fn attacked_b_file_does_not_matter() {
        // The king never crosses b1.
        assert_eq!(
            castles("1r2k3/8/8/8/8/8/8/R3K2R w KQ - 0 1"),
            vec!["e1g1", "e1c1"]
        );
    }

    #[test]
    fn no_castling_out_of_check() {
        assert!(castles("4r1k1/8/8/8/8/8/8/R3K2R w KQ - 0 1").is_empty());
    }

    #[test]
    fn king_off_home_square() {
        assert!(castles("4k3/8/8/8/8/8/8/R2K3R w KQ - 0 1").is_empty());
    }
}

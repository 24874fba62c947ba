//! Rule invariants checked over random legal games.
//!
//! Each case plays a random prefix of a game from the starting position (or
//! from a castling-rich position), picking moves by index, and checks that
//! the invariants hold at every ply.

use chess_core::{CastleSide, Color, Piece, Square};
use chess_engine::{is_in_check, legal_moves, make_move, pseudo_legal_moves, GenMode, Position};
use proptest::prelude::*;

const CASTLING_FEN: &str = "r3k2r/pppq1ppp/2n2n2/2bpp3/2BPP3/2N2N2/PPPQ1PPP/R3K2R w KQkq - 0 1";

/// Plays moves chosen by `choices` and returns every position reached,
/// stopping early at checkmate or stalemate.
fn random_game(start: Position, choices: &[usize]) -> Vec<Position> {
    let mut positions = vec![start];
    for &choice in choices {
        let current = positions.last().unwrap();
        let moves = legal_moves(current);
        if moves.is_empty() {
            break;
        }
        let next = make_move(current, moves[choice % moves.len()]);
        positions.push(next);
    }
    positions
}

fn start_positions() -> impl Strategy<Value = Position> {
    prop_oneof![
        Just(Position::startpos()),
        Just(Position::from_fen(CASTLING_FEN).unwrap()),
    ]
}

fn piece_count(position: &Position) -> u32 {
    position.occupied().count()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn fen_round_trips_along_random_games(
        start in start_positions(),
        choices in prop::collection::vec(any::<usize>(), 0..40),
    ) {
        for position in random_game(start, &choices) {
            let fen = position.to_fen();
            let reparsed = Position::from_fen(&fen).unwrap();
            prop_assert_eq!(&reparsed, &position);
            prop_assert_eq!(reparsed.to_fen(), fen);
        }
    }

    #[test]
    fn legal_moves_never_leave_the_king_attacked(
        start in start_positions(),
        choices in prop::collection::vec(any::<usize>(), 0..30),
    ) {
        for position in random_game(start, &choices) {
            let us = position.side_to_move();
            for m in legal_moves(&position).iter() {
                prop_assert_eq!(m.color(), us);
                let after = make_move(&position, *m);
                prop_assert!(!is_in_check(&after, us), "{} leaves king in check", m);
            }
        }
    }

    #[test]
    fn filtered_moves_all_leave_the_king_attacked(
        start in start_positions(),
        choices in prop::collection::vec(any::<usize>(), 0..30),
    ) {
        for position in random_game(start, &choices) {
            let us = position.side_to_move();
            let legal = legal_moves(&position);
            for m in pseudo_legal_moves(&position, us, GenMode::Full).iter() {
                if legal.iter().any(|l| l == m) {
                    continue;
                }
                let after = make_move(&position, *m);
                prop_assert!(is_in_check(&after, us), "{} was filtered but is safe", m);
            }
        }
    }

    #[test]
    fn en_passant_target_lives_for_one_ply(
        start in start_positions(),
        choices in prop::collection::vec(any::<usize>(), 1..40),
    ) {
        let game = random_game(start, &choices);
        for pair in game.windows(2) {
            let (before, after) = (&pair[0], &pair[1]);
            let m = legal_moves(before)
                .iter()
                .copied()
                .find(|m| make_move(before, *m) == *after)
                .unwrap();
            if m.is_double_push() {
                let skipped = m.from().offset(0, m.color().pawn_direction());
                prop_assert_eq!(after.en_passant(), skipped);
            } else {
                prop_assert_eq!(after.en_passant(), None);
            }
        }
    }

    #[test]
    fn every_promotion_comes_in_four_kinds(
        start in start_positions(),
        choices in prop::collection::vec(any::<usize>(), 0..60),
    ) {
        for position in random_game(start, &choices) {
            let moves = legal_moves(&position);
            for m in moves.iter().filter(|m| m.piece() == Piece::Pawn) {
                let on_last_rank = m.to().rank() == m.color().promotion_rank();
                prop_assert_eq!(m.promotion().is_some(), on_last_rank);
                if on_last_rank {
                    let kinds: Vec<Piece> = moves
                        .iter()
                        .filter(|o| o.from() == m.from() && o.to() == m.to())
                        .filter_map(|o| o.promotion())
                        .collect();
                    prop_assert_eq!(kinds, Piece::PROMOTIONS.to_vec());
                }
            }
        }
    }

    #[test]
    fn castling_rights_only_shrink(
        start in start_positions(),
        choices in prop::collection::vec(any::<usize>(), 1..40),
    ) {
        let game = random_game(start, &choices);
        for pair in game.windows(2) {
            for color in Color::BOTH {
                for side in CastleSide::BOTH {
                    if pair[1].castling_rights().has(color, side) {
                        prop_assert!(pair[0].castling_rights().has(color, side));
                    }
                }
            }
            prop_assert!(piece_count(&pair[1]) <= piece_count(&pair[0]));
        }
    }

    #[test]
    fn clocks_follow_moves(
        choices in prop::collection::vec(any::<usize>(), 1..30),
    ) {
        let game = random_game(Position::startpos(), &choices);
        for pair in game.windows(2) {
            let (before, after) = (&pair[0], &pair[1]);
            prop_assert_eq!(after.side_to_move(), before.side_to_move().opposite());
            let expected_fullmove = match before.side_to_move() {
                Color::White => before.fullmove_number(),
                Color::Black => before.fullmove_number() + 1,
            };
            prop_assert_eq!(after.fullmove_number(), expected_fullmove);
            let reset = after.halfmove_clock() == 0;
            let advanced = after.halfmove_clock() == before.halfmove_clock() + 1;
            prop_assert!(reset || advanced);
        }
    }
}

#[test]
fn castling_gated_by_prior_rook_moves() {
    let position = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    let castles = |p: &Position| -> Vec<String> {
        legal_moves(p)
            .iter()
            .filter(|m| m.castle().is_some())
            .map(|m| m.to_uci())
            .collect()
    };
    assert_eq!(castles(&position), vec!["e1g1", "e1c1"]);

    // h1-h2, a8-a7, h2-h1, a7-a8: rooks are home again but the rights are gone.
    let mut current = position;
    for uci in ["h1h2", "a8a7", "h2h1", "a7a8"] {
        let m = legal_moves(&current)
            .iter()
            .copied()
            .find(|m| m.to_uci() == uci)
            .unwrap();
        current = make_move(&current, m);
    }
    assert_eq!(castles(&current), vec!["e1c1"]);
    assert_eq!(current.to_fen(), "r3k2r/8/8/8/8/8/8/R3K2R w Qk - 4 3");
}

#[test]
fn en_passant_expires_if_not_taken() {
    let mut position = Position::startpos();
    for uci in ["e2e4", "a7a6", "e4e5", "d7d5"] {
        let m = legal_moves(&position)
            .iter()
            .copied()
            .find(|m| m.to_uci() == uci)
            .unwrap();
        position = make_move(&position, m);
    }
    assert_eq!(position.en_passant(), Square::from_algebraic("d6"));
    assert!(legal_moves(&position).iter().any(|m| m.is_en_passant()));

    // A quiet move by each side closes the window.
    for uci in ["g1f3", "h7h6"] {
        let m = legal_moves(&position)
            .iter()
            .copied()
            .find(|m| m.to_uci() == uci)
            .unwrap();
        position = make_move(&position, m);
    }
    assert_eq!(position.en_passant(), None);
    assert!(!legal_moves(&position).iter().any(|m| m.is_en_passant()));
}

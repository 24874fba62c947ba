//! Perft (performance test) for move generator validation.
//!
//! Perft counts the leaf nodes of the legal move tree at a given depth. The
//! counts for the positions in [`REFERENCE_POSITIONS`] are well known, so any
//! disagreement points at a generation bug.

use super::{legal_moves, make_move};
use crate::Position;

/// A position with its published perft counts.
#[derive(Debug, Clone, Copy)]
pub struct ReferencePosition {
    pub name: &'static str,
    pub fen: &'static str,
    /// Node counts for depth 1, 2, 3, ...
    pub nodes: &'static [u64],
}

impl ReferencePosition {
    /// Published count at `depth`, if known.
    pub fn expected(&self, depth: u32) -> Option<u64> {
        let index = usize::try_from(depth).ok()?.checked_sub(1)?;
        self.nodes.get(index).copied()
    }
}

/// The six standard perft positions.
pub const REFERENCE_POSITIONS: [ReferencePosition; 6] = [
    ReferencePosition {
        name: "startpos",
        fen: "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        nodes: &[20, 400, 8_902, 197_281, 4_865_609],
    },
    ReferencePosition {
        name: "kiwipete",
        fen: "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        nodes: &[48, 2_039, 97_862, 4_085_603],
    },
    ReferencePosition {
        name: "endgame",
        fen: "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        nodes: &[14, 191, 2_812, 43_238, 674_624],
    },
    ReferencePosition {
        name: "promotions",
        fen: "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
        nodes: &[6, 264, 9_467, 422_333],
    },
    ReferencePosition {
        name: "discovered",
        fen: "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
        nodes: &[44, 1_486, 62_379, 2_103_487],
    },
    ReferencePosition {
        name: "middlegame",
        fen: "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10",
        nodes: &[46, 2_079, 89_890, 3_894_594],
    },
];

/// Counts the leaf nodes at the given depth.
pub fn perft(position: &Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = legal_moves(position);

    if depth == 1 {
        return moves.len() as u64;
    }

    moves
        .iter()
        .map(|m| perft(&make_move(position, *m), depth - 1))
        .sum()
}

/// Per-root-move node counts at `depth`, sorted by move text.
///
/// Comparing this against another engine's output narrows a wrong total
/// down to the subtree that causes it. Depth 0 has no root moves to break
/// down, so the result is empty.
pub fn perft_divide(position: &Position, depth: u32) -> Vec<(String, u64)> {
    if depth == 0 {
        return Vec::new();
    }
    let moves = legal_moves(position);
    let mut results: Vec<(String, u64)> = moves
        .iter()
        .map(|m| {
            let nodes = if depth > 1 {
                perft(&make_move(position, *m), depth - 1)
            } else {
                1
            };
            (m.to_uci(), nodes)
        })
        .collect();

    results.sort_by(|a, b| a.0.cmp(&b.0));
    results
}

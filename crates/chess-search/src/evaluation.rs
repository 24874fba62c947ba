//! Leaf evaluation.

use chess_core::{Color, Piece};
use chess_engine::Position;
use serde::{Deserialize, Serialize};

/// Score in centipawns. Positive favors White.
pub type Score = i32;

/// Bound on every score. Returned for positions where a king is missing.
pub const INFINITY: Score = 1_000_000;

/// Base score for checkmate, reduced by the distance to the mate.
pub const MATE: Score = 100_000;

/// Scores a position from White's point of view.
///
/// Implementations must stay within `-INFINITY..=INFINITY`, return
/// `INFINITY` when Black's king is absent and `-INFINITY` when White's is.
pub trait Evaluator {
    fn evaluate(&self, position: &Position) -> Score;
}

impl<E: Evaluator + ?Sized> Evaluator for &E {
    fn evaluate(&self, position: &Position) -> Score {
        (**self).evaluate(position)
    }
}

/// Material value of each piece kind, in centipawns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PieceValues {
    pub pawn: Score,
    pub knight: Score,
    pub bishop: Score,
    pub rook: Score,
    pub queen: Score,
    pub king: Score,
}

impl PieceValues {
    pub const fn value(&self, piece: Piece) -> Score {
        match piece {
            Piece::Pawn => self.pawn,
            Piece::Knight => self.knight,
            Piece::Bishop => self.bishop,
            Piece::Rook => self.rook,
            Piece::Queen => self.queen,
            Piece::King => self.king,
        }
    }
}

impl Default for PieceValues {
    fn default() -> Self {
        PieceValues {
            pawn: 100,
            knight: 328,
            bishop: 342,
            rook: 544,
            queen: 975,
            king: 0,
        }
    }
}

/// Sums material for both sides.
#[derive(Debug, Clone, Default)]
pub struct MaterialEvaluator {
    values: PieceValues,
}

impl MaterialEvaluator {
    pub fn new(values: PieceValues) -> Self {
        MaterialEvaluator { values }
    }

    pub fn values(&self) -> &PieceValues {
        &self.values
    }

    fn material(&self, position: &Position, color: Color) -> Score {
        Piece::ALL
            .into_iter()
            .map(|piece| self.values.value(piece) * position.pieces(piece, color).count() as Score)
            .sum()
    }
}

impl Evaluator for MaterialEvaluator {
    fn evaluate(&self, position: &Position) -> Score {
        if position.king_square(Color::White).is_none() {
            return -INFINITY;
        }
        if position.king_square(Color::Black).is_none() {
            return INFINITY;
        }
        let score = self.material(position, Color::White) - self.material(position, Color::Black);
        score.clamp(-MATE + 1, MATE - 1)
    }
}

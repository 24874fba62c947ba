//! Move representation.

use crate::{Color, Piece, Square};
use std::fmt;

/// Which rook a castling move brings across.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastleSide {
    /// O-O, with the h-file rook.
    Kingside,
    /// O-O-O, with the a-file rook.
    Queenside,
}

impl CastleSide {
    pub const BOTH: [CastleSide; 2] = [CastleSide::Kingside, CastleSide::Queenside];

    /// File delta the king travels in (one square per step).
    #[inline]
    pub const fn direction(self) -> i8 {
        match self {
            CastleSide::Kingside => 1,
            CastleSide::Queenside => -1,
        }
    }

    /// Home square of the rook for `color`.
    #[inline]
    pub const fn rook_home(self, color: Color) -> Square {
        match (color, self) {
            (Color::White, CastleSide::Kingside) => Square::H1,
            (Color::White, CastleSide::Queenside) => Square::A1,
            (Color::Black, CastleSide::Kingside) => Square::H8,
            (Color::Black, CastleSide::Queenside) => Square::A8,
        }
    }

    /// Square the rook lands on after castling.
    #[inline]
    pub const fn rook_target(self, color: Color) -> Square {
        match (color, self) {
            (Color::White, CastleSide::Kingside) => Square::F1,
            (Color::White, CastleSide::Queenside) => Square::D1,
            (Color::Black, CastleSide::Kingside) => Square::F8,
            (Color::Black, CastleSide::Queenside) => Square::D8,
        }
    }
}

/// What is special about a move, beyond moving one piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveFlag {
    Normal,
    /// Pawn advance of two squares from its starting rank.
    DoublePush,
    /// Pawn capture onto the en-passant target.
    EnPassant,
    /// King move of two squares; the rook moves too.
    Castle(CastleSide),
    /// Pawn reaching the far rank, becoming the given kind.
    Promotion(Piece),
}

/// An immutable description of one transition.
///
/// Moves come out of the generator fully annotated (moving piece, capture
/// flag, special flag), so applying one never has to re-derive what kind of
/// move it is.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    from: Square,
    to: Square,
    piece: Piece,
    color: Color,
    flag: MoveFlag,
    capture: bool,
}

impl Move {
    /// A plain, non-capturing move of `piece` owned by `color`.
    #[inline]
    pub const fn new(piece: Piece, color: Color, from: Square, to: Square) -> Self {
        Move {
            from,
            to,
            piece,
            color,
            flag: MoveFlag::Normal,
            capture: false,
        }
    }

    /// Marks the move as capturing the piece on its destination.
    #[inline]
    pub const fn capturing(mut self) -> Self {
        self.capture = true;
        self
    }

    #[inline]
    pub const fn with_flag(mut self, flag: MoveFlag) -> Self {
        self.flag = flag;
        self
    }

    #[inline]
    pub const fn from(self) -> Square {
        self.from
    }

    #[inline]
    pub const fn to(self) -> Square {
        self.to
    }

    #[inline]
    pub const fn piece(self) -> Piece {
        self.piece
    }

    #[inline]
    pub const fn color(self) -> Color {
        self.color
    }

    #[inline]
    pub const fn flag(self) -> MoveFlag {
        self.flag
    }

    /// True for every move that removes an enemy piece, en passant included.
    #[inline]
    pub const fn is_capture(self) -> bool {
        self.capture || self.is_en_passant()
    }

    #[inline]
    pub const fn is_en_passant(self) -> bool {
        matches!(self.flag, MoveFlag::EnPassant)
    }

    #[inline]
    pub const fn is_double_push(self) -> bool {
        matches!(self.flag, MoveFlag::DoublePush)
    }

    #[inline]
    pub const fn promotion(self) -> Option<Piece> {
        match self.flag {
            MoveFlag::Promotion(piece) => Some(piece),
            _ => None,
        }
    }

    #[inline]
    pub const fn castle(self) -> Option<CastleSide> {
        match self.flag {
            MoveFlag::Castle(side) => Some(side),
            _ => None,
        }
    }

    /// Long algebraic (UCI) text, e.g. `e2e4` or `e7e8q`.
    pub fn to_uci(self) -> String {
        match self.promotion() {
            Some(piece) => format!("{}{}{}", self.from, self.to, piece.to_char()),
            None => format!("{}{}", self.from, self.to),
        }
    }

    /// Placeholder for unfilled slots in fixed-capacity move buffers.
    pub const NULL: Move = Move::new(Piece::Pawn, Color::White, Square::A1, Square::A1);
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({} {:?}", self.to_uci(), self.piece)?;
        if self.is_capture() {
            write!(f, " x")?;
        }
        match self.flag {
            MoveFlag::Normal | MoveFlag::Promotion(_) => {}
            flag => write!(f, " {:?}", flag)?,
        }
        write!(f, ")")
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_uci())
    }
}

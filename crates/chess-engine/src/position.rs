//! Game state.

use std::fmt;

use chess_core::{CastleSide, Color, FenError, FenParser, File, Piece, Rank, Square};

use crate::Bitboard;

/// The four independent castling rights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const ALL: CastlingRights = CastlingRights(0b1111);

    #[inline]
    const fn flag(color: Color, side: CastleSide) -> u8 {
        match (color, side) {
            (Color::White, CastleSide::Kingside) => 0b0001,
            (Color::White, CastleSide::Queenside) => 0b0010,
            (Color::Black, CastleSide::Kingside) => 0b0100,
            (Color::Black, CastleSide::Queenside) => 0b1000,
        }
    }

    #[inline]
    pub const fn has(self, color: Color, side: CastleSide) -> bool {
        self.0 & Self::flag(color, side) != 0
    }

    #[inline]
    pub fn grant(&mut self, color: Color, side: CastleSide) {
        self.0 |= Self::flag(color, side);
    }

    #[inline]
    pub fn remove(&mut self, color: Color, side: CastleSide) {
        self.0 &= !Self::flag(color, side);
    }

    #[inline]
    pub fn remove_color(&mut self, color: Color) {
        self.remove(color, CastleSide::Kingside);
        self.remove(color, CastleSide::Queenside);
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Parses the FEN castling field. Letters may come in any order.
    fn from_fen(field: &str) -> Self {
        let mut rights = CastlingRights::NONE;
        for c in field.chars() {
            match c {
                'K' => rights.grant(Color::White, CastleSide::Kingside),
                'Q' => rights.grant(Color::White, CastleSide::Queenside),
                'k' => rights.grant(Color::Black, CastleSide::Kingside),
                'q' => rights.grant(Color::Black, CastleSide::Queenside),
                _ => {}
            }
        }
        rights
    }

    /// FEN castling field in canonical `KQkq` order.
    fn to_fen(self) -> String {
        if self.is_empty() {
            return "-".to_string();
        }
        let mut field = String::with_capacity(4);
        for color in Color::BOTH {
            for side in CastleSide::BOTH {
                if self.has(color, side) {
                    let letter = match side {
                        CastleSide::Kingside => Piece::King,
                        CastleSide::Queenside => Piece::Queen,
                    };
                    field.push(letter.to_fen_char(color));
                }
            }
        }
        field
    }
}

/// Complete game state.
///
/// Positions are values: applying a move produces a fresh `Position` and never
/// touches the one it was applied to, so search branches can be discarded by
/// dropping them. Mutators are crate-private and only used while building a
/// successor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    /// Occupancy masks indexed by `[color][piece]`. No square is set in more
    /// than one mask.
    placement: [[Bitboard; 6]; 2],
    side_to_move: Color,
    castling: CastlingRights,
    en_passant: Option<Square>,
    halfmove_clock: u32,
    fullmove_number: u32,
}

impl Position {
    /// An empty board with White to move and no rights.
    pub fn empty() -> Self {
        Position {
            placement: [[Bitboard::EMPTY; 6]; 2],
            side_to_move: Color::White,
            castling: CastlingRights::NONE,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// The standard initial setup.
    pub fn startpos() -> Self {
        let mut position = Position::empty();
        let back_rank = [
            Piece::Rook,
            Piece::Knight,
            Piece::Bishop,
            Piece::Queen,
            Piece::King,
            Piece::Bishop,
            Piece::Knight,
            Piece::Rook,
        ];
        for color in Color::BOTH {
            for (file, piece) in File::ALL.into_iter().zip(back_rank) {
                position.put_piece(Square::new(file, color.home_rank()), piece, color);
                position.put_piece(Square::new(file, color.pawn_rank()), Piece::Pawn, color);
            }
        }
        position.castling = CastlingRights::ALL;
        position
    }

    /// Builds a position from a FEN string.
    ///
    /// Besides the field checks done by [`FenParser`], a side owning more than
    /// one king is rejected. A side with no king is accepted.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let parsed = FenParser::parse(fen)?;
        let mut position = Position::empty();

        for (row, rank_str) in parsed.piece_placement.split('/').enumerate() {
            let rank = 7 - row as u8;
            let mut file = 0u8;
            for c in rank_str.chars() {
                if let Some(run) = c.to_digit(10) {
                    file += run as u8;
                } else if let Some((piece, color)) = Piece::from_fen_char(c) {
                    let sq = Square::from_index(rank * 8 + file).ok_or_else(|| {
                        FenError::InvalidPiecePlacement(format!("square out of range in rank {}", rank + 1))
                    })?;
                    position.put_piece(sq, piece, color);
                    file += 1;
                }
            }
        }

        for color in Color::BOTH {
            if position.pieces(Piece::King, color).count() > 1 {
                return Err(FenError::InvalidPiecePlacement(format!(
                    "{} has more than one king",
                    color
                )));
            }
        }

        position.side_to_move = parsed.side_to_move;
        position.castling = CastlingRights::from_fen(&parsed.castling);
        position.en_passant = parsed.en_passant;
        position.halfmove_clock = parsed.halfmove_clock;
        position.fullmove_number = parsed.fullmove_number;

        Ok(position)
    }

    /// Serializes the position as a FEN string.
    pub fn to_fen(&self) -> String {
        let mut placement = String::new();
        for rank in Rank::ALL.into_iter().rev() {
            let mut empty_run = 0;
            for file in File::ALL {
                match self.piece_at(Square::new(file, rank)) {
                    Some((piece, color)) => {
                        if empty_run > 0 {
                            placement.push_str(&empty_run.to_string());
                            empty_run = 0;
                        }
                        placement.push(piece.to_fen_char(color));
                    }
                    None => empty_run += 1,
                }
            }
            if empty_run > 0 {
                placement.push_str(&empty_run.to_string());
            }
            if rank != Rank::R1 {
                placement.push('/');
            }
        }

        FenParser {
            piece_placement: placement,
            side_to_move: self.side_to_move,
            castling: self.castling.to_fen(),
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
        }
        .to_fen()
    }

    /// Returns the piece on `sq` and its owner, if any.
    pub fn piece_at(&self, sq: Square) -> Option<(Piece, Color)> {
        for color in Color::BOTH {
            for piece in Piece::ALL {
                if self.placement[color.index()][piece.index()].contains(sq) {
                    return Some((piece, color));
                }
            }
        }
        None
    }

    /// Squares holding `piece`s of `color`.
    #[inline]
    pub fn pieces(&self, piece: Piece, color: Color) -> Bitboard {
        self.placement[color.index()][piece.index()]
    }

    /// Squares holding any piece of `color`.
    #[inline]
    pub fn occupancy(&self, color: Color) -> Bitboard {
        self.placement[color.index()]
            .iter()
            .fold(Bitboard::EMPTY, |acc, bb| acc | *bb)
    }

    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.occupancy(Color::White) | self.occupancy(Color::Black)
    }

    /// Square of `color`'s king, or `None` once it has been captured.
    #[inline]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces(Piece::King, color).first()
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn castling_rights(&self) -> CastlingRights {
        self.castling
    }

    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    #[inline]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    pub(crate) fn put_piece(&mut self, sq: Square, piece: Piece, color: Color) {
        debug_assert!(self.piece_at(sq).is_none(), "{} is already occupied", sq);
        self.placement[color.index()][piece.index()].set(sq);
    }

    /// Clears `sq`, returning what stood there.
    pub(crate) fn remove_piece(&mut self, sq: Square) -> Option<(Piece, Color)> {
        let (piece, color) = self.piece_at(sq)?;
        self.placement[color.index()][piece.index()].clear(sq);
        Some((piece, color))
    }

    pub(crate) fn set_side_to_move(&mut self, color: Color) {
        self.side_to_move = color;
    }

    pub(crate) fn castling_rights_mut(&mut self) -> &mut CastlingRights {
        &mut self.castling
    }

    pub(crate) fn set_en_passant(&mut self, sq: Option<Square>) {
        self.en_passant = sq;
    }

    pub(crate) fn set_halfmove_clock(&mut self, clock: u32) {
        self.halfmove_clock = clock;
    }

    pub(crate) fn set_fullmove_number(&mut self, number: u32) {
        self.fullmove_number = number;
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}

/// Text diagram with rank 8 on top.
impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::ALL.into_iter().rev() {
            write!(f, "{} ", rank)?;
            for file in File::ALL {
                let c = self
                    .piece_at(Square::new(file, rank))
                    .map_or('.', |(piece, color)| piece.to_fen_char(color));
                write!(f, " {}", c)?;
            }
            writeln!(f)?;
        }
        write!(f, "  ")?;
        for file in File::ALL {
            write!(f, " {}", file)?;
        }
        writeln!(f)
    }
}

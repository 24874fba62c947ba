//! FEN (Forsyth-Edwards Notation) validation.
//!
//! [`FenParser`] checks the six space-separated fields and keeps them in
//! textual form. Building a board out of them is the engine's job.

use crate::{Color, Piece, Square};
use thiserror::Error;

/// A malformed interchange string.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FenError {
    #[error("expected 6 fields, got {0}")]
    InvalidFieldCount(usize),

    #[error("invalid piece placement: {0}")]
    InvalidPiecePlacement(String),

    #[error("invalid side to move: expected 'w' or 'b', got '{0}'")]
    InvalidSideToMove(String),

    #[error("invalid castling rights: {0}")]
    InvalidCastlingRights(String),

    #[error("invalid en passant square: {0}")]
    InvalidEnPassantSquare(String),

    #[error("invalid halfmove clock: {0}")]
    InvalidHalfmoveClock(String),

    #[error("invalid fullmove number: {0}")]
    InvalidFullmoveNumber(String),
}

/// The validated fields of a FEN string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenParser {
    /// Rank 8 first, `/`-separated, digits for runs of empty squares.
    pub piece_placement: String,
    pub side_to_move: Color,
    /// Subset of `KQkq`, or `-`.
    pub castling: String,
    pub en_passant: Option<Square>,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

impl FenParser {
    /// The standard starting position.
    pub const STARTPOS: &'static str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    pub fn parse(fen: &str) -> Result<Self, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() != 6 {
            return Err(FenError::InvalidFieldCount(fields.len()));
        }

        Self::validate_piece_placement(fields[0])?;

        let side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::InvalidSideToMove(other.to_string())),
        };

        Self::validate_castling(fields[2])?;
        let en_passant = Self::parse_en_passant(fields[3], side_to_move)?;

        let halfmove_clock = fields[4]
            .parse::<u32>()
            .map_err(|_| FenError::InvalidHalfmoveClock(fields[4].to_string()))?;
        let fullmove_number = fields[5]
            .parse::<u32>()
            .map_err(|_| FenError::InvalidFullmoveNumber(fields[5].to_string()))?;

        Ok(FenParser {
            piece_placement: fields[0].to_string(),
            side_to_move,
            castling: fields[2].to_string(),
            en_passant,
            halfmove_clock,
            fullmove_number,
        })
    }

    fn validate_piece_placement(placement: &str) -> Result<(), FenError> {
        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::InvalidPiecePlacement(format!(
                "expected 8 ranks, got {}",
                ranks.len()
            )));
        }

        for (i, rank) in ranks.iter().enumerate() {
            let mut width = 0u32;
            for c in rank.chars() {
                match c {
                    '1'..='8' => width += c as u32 - '0' as u32,
                    _ if Piece::from_fen_char(c).is_some() => width += 1,
                    _ => {
                        return Err(FenError::InvalidPiecePlacement(format!(
                            "invalid character '{}' in rank {}",
                            c,
                            8 - i
                        )))
                    }
                }
            }
            if width != 8 {
                return Err(FenError::InvalidPiecePlacement(format!(
                    "rank {} has {} squares, expected 8",
                    8 - i,
                    width
                )));
            }
        }

        Ok(())
    }

    fn validate_castling(castling: &str) -> Result<(), FenError> {
        if castling == "-" {
            return Ok(());
        }
        match castling.chars().find(|c| !"KQkq".contains(*c)) {
            Some(c) => Err(FenError::InvalidCastlingRights(format!(
                "invalid character '{}' in '{}'",
                c, castling
            ))),
            None => Ok(()),
        }
    }

    /// The target is the square skipped by the opponent's double push, so
    /// it sits on rank 6 when White is to move and rank 3 when Black is.
    fn parse_en_passant(ep: &str, side_to_move: Color) -> Result<Option<Square>, FenError> {
        if ep == "-" {
            return Ok(None);
        }
        let expected_rank = match side_to_move {
            Color::White => '6',
            Color::Black => '3',
        };
        match Square::from_algebraic(ep) {
            Some(sq) if sq.rank().to_char() == expected_rank => Ok(Some(sq)),
            _ => Err(FenError::InvalidEnPassantSquare(ep.to_string())),
        }
    }

    /// Reassembles the fields, in their original order.
    pub fn to_fen(&self) -> String {
        let en_passant = self
            .en_passant
            .map_or_else(|| "-".to_string(), |sq| sq.to_algebraic());
        format!(
            "{} {} {} {} {} {}",
            self.piece_placement,
            self.side_to_move.to_fen_char(),
            self.castling,
            en_passant,
            self.halfmove_clock,
            self.fullmove_number
        )
    }
}

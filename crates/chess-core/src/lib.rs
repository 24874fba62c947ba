//! Core value types for a standard chess position.
//!
//! Everything here is a small `Copy` value shared by the engine, the search
//! and the command-line front end:
//! - [`Color`] and [`Piece`] name who owns a piece and what it is
//! - [`Square`], [`File`], and [`Rank`] address the board
//! - [`Move`], [`MoveFlag`] and [`CastleSide`] describe a single transition
//! - [`FenParser`] validates the six-field interchange string

mod color;
mod fen;
mod mov;
mod piece;
mod square;

pub use color::Color;
pub use fen::{FenError, FenParser};
pub use mov::{CastleSide, Move, MoveFlag};
pub use piece::Piece;
pub use square::{File, Rank, Square};

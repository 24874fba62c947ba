//! Chess position and move generation.
//!
//! This crate provides:
//! - [`Bitboard`] - a set of squares packed into a `u64`
//! - [`Position`] - the full game state: twelve occupancy masks, side to
//!   move, castling rights, en-passant target and clocks
//! - [`pseudo_legal_moves`], [`legal_moves`] and [`is_in_check`]
//! - [`make_move`] - copy-on-write move application
//! - [`perft`](movegen::perft::perft) for validating the generator
//!
//! # Example
//!
//! ```
//! use chess_engine::{legal_moves, make_move, Position};
//!
//! let position = Position::startpos();
//! let moves = legal_moves(&position);
//! assert_eq!(moves.len(), 20);
//!
//! let after = make_move(&position, moves[0]);
//! assert_ne!(after.side_to_move(), position.side_to_move());
//! ```

mod bitboard;
pub mod movegen;
mod position;

pub use bitboard::Bitboard;
pub use movegen::{
    is_in_check, legal_moves, make_move, pseudo_legal_moves, GenMode, MoveList,
};
pub use position::{CastlingRights, Position};

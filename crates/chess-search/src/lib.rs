//! Best-move search over the legal move generator.
//!
//! [`search`] runs a fixed-depth minimax with alpha-beta pruning. Leaves are
//! scored by an [`Evaluator`]; [`MaterialEvaluator`] counts material using
//! configurable [`PieceValues`].
//!
//! # Example
//!
//! ```
//! use chess_engine::Position;
//! use chess_search::{search, MaterialEvaluator};
//!
//! let position = Position::from_fen("4k3/8/8/3q4/8/8/3R4/4K3 w - - 0 1").unwrap();
//! let result = search(&position, 2, &MaterialEvaluator::default());
//! assert_eq!(result.best_move.unwrap().to_uci(), "d2d5");
//! ```

mod evaluation;
mod search;

pub use evaluation::{Evaluator, MaterialEvaluator, PieceValues, Score, INFINITY, MATE};
pub use search::{search, SearchResult, Searcher};

//! Minimax with alpha-beta pruning.

use crate::evaluation::{Evaluator, Score, INFINITY, MATE};
use chess_core::{Color, Move};
use chess_engine::{is_in_check, legal_moves, make_move, Position};

/// Outcome of a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    /// `None` when the root is terminal or the depth is zero.
    pub best_move: Option<Move>,
    /// Minimax value of the root, from White's point of view.
    pub score: Score,
    /// Positions visited, root included.
    pub nodes: u64,
}

/// Searches `position` to `depth` plies and returns the best move for the
/// side to move.
pub fn search<E: Evaluator>(position: &Position, depth: u32, evaluator: &E) -> SearchResult {
    Searcher::new(evaluator).search(position, depth)
}

/// Search state. Holds the evaluator and the node counter.
pub struct Searcher<E> {
    evaluator: E,
    nodes: u64,
}

impl<E: Evaluator> Searcher<E> {
    pub fn new(evaluator: E) -> Self {
        Searcher {
            evaluator,
            nodes: 0,
        }
    }

    /// Nodes visited since construction.
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    pub fn search(&mut self, position: &Position, depth: u32) -> SearchResult {
        let start = self.nodes;
        let (best_move, score) = self.alpha_beta(position, depth, 0, -INFINITY, INFINITY);
        let nodes = self.nodes - start;

        tracing::debug!(
            "depth {} best {} score {} nodes {}",
            depth,
            best_move.map_or_else(|| "(none)".to_string(), |m| m.to_uci()),
            score,
            nodes
        );

        SearchResult {
            best_move,
            score,
            nodes,
        }
    }

    fn alpha_beta(
        &mut self,
        position: &Position,
        depth: u32,
        ply: u32,
        mut alpha: Score,
        mut beta: Score,
    ) -> (Option<Move>, Score) {
        self.nodes += 1;

        if depth == 0 || !has_both_kings(position) {
            return (None, self.evaluator.evaluate(position));
        }

        let us = position.side_to_move();
        let moves = legal_moves(position);
        if moves.is_empty() {
            return (None, self.terminal_score(position, us, ply));
        }

        let maximizing = us == Color::White;
        let mut best_move = moves[0];
        let mut best_score = if maximizing { -INFINITY } else { INFINITY };

        for m in &moves {
            let child = make_move(position, *m);
            let (_, score) = self.alpha_beta(&child, depth - 1, ply + 1, alpha, beta);

            if ply == 0 {
                tracing::debug!("root move {} scored {}", m, score);
            }

            if maximizing {
                if score > best_score {
                    best_score = score;
                    best_move = *m;
                }
                alpha = alpha.max(score);
            } else {
                if score < best_score {
                    best_score = score;
                    best_move = *m;
                }
                beta = beta.min(score);
            }

            if beta <= alpha {
                break;
            }
        }

        (Some(best_move), best_score)
    }

    /// Score of a node where `us` has no legal moves: mate or stalemate.
    fn terminal_score(&self, position: &Position, us: Color, ply: u32) -> Score {
        if !is_in_check(position, us) {
            return 0;
        }
        let distance = Score::try_from(ply).unwrap_or(MATE);
        let mate = (MATE - distance).max(1);
        match us {
            Color::White => -mate,
            Color::Black => mate,
        }
    }
}

fn has_both_kings(position: &Position) -> bool {
    Color::BOTH
        .into_iter()
        .all(|color| position.king_square(color).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::MaterialEvaluator;

    fn run(fen: &str, depth: u32) -> SearchResult {
        let position = Position::from_fen(fen).unwrap();
        search(&position, depth, &MaterialEvaluator::default())
    }

    fn best_uci(result: &SearchResult) -> String {
        result.best_move.map(|m| m.to_uci()).unwrap_or_default()
    }

    #[test]
    fn depth_zero_only_evaluates() {
        let result = run("4k3/8/8/8/8/8/8/3QK3 w - - 0 1", 0);
        assert_eq!(result.best_move, None);
        assert_eq!(result.score, 975);
        assert_eq!(result.nodes, 1);
    }

    #[test]
    fn white_takes_the_hanging_queen() {
        let result = run("4k3/8/8/3q4/8/8/3R4/4K3 w - - 0 1", 2);
        assert_eq!(best_uci(&result), "d2d5");
        assert_eq!(result.score, 544);
    }

    #[test]
    fn black_takes_the_hanging_queen() {
        let result = run("4k3/8/8/3Q4/8/8/3r4/4K3 b - - 0 1", 2);
        assert_eq!(best_uci(&result), "d2d5");
        assert_eq!(result.score, -544);
    }

    #[test]
    fn finds_back_rank_mate() {
        for depth in [2, 3] {
            let result = run("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1", depth);
            assert_eq!(best_uci(&result), "a1a8", "depth {}", depth);
            assert_eq!(result.score, MATE - 1);
        }
    }

    #[test]
    fn mated_root_has_no_move() {
        let result = run(
            "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3",
            3,
        );
        assert_eq!(result.best_move, None);
        assert_eq!(result.score, -MATE);
    }

    #[test]
    fn stalemate_scores_zero() {
        let result = run("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1", 2);
        assert_eq!(result.best_move, None);
        assert_eq!(result.score, 0);
    }

    #[test]
    fn prefers_mate_over_stalemate() {
        // Qf7 is stalemate. Qf8 mates.
        let result = run("7k/8/6K1/8/8/8/8/5Q2 w - - 0 1", 2);
        assert_eq!(best_uci(&result), "f1f8");
        assert_eq!(result.score, MATE - 1);
    }

    #[test]
    fn missing_king_is_a_leaf() {
        let result = run("8/8/8/8/8/8/8/4K3 w - - 0 1", 3);
        assert_eq!(result.best_move, None);
        assert_eq!(result.score, INFINITY);
        assert_eq!(result.nodes, 1);
    }

    struct Pessimist;

    impl Evaluator for Pessimist {
        fn evaluate(&self, _: &Position) -> Score {
            -INFINITY
        }
    }

    #[test]
    fn falls_back_to_the_first_legal_move() {
        // No child ever beats the initial bound, so the first move stands.
        let position = Position::startpos();
        let result = search(&position, 1, &Pessimist);
        assert_eq!(result.best_move, Some(legal_moves(&position)[0]));
        assert_eq!(result.score, -INFINITY);
    }

    #[test]
    fn searcher_accumulates_nodes() {
        let evaluator = MaterialEvaluator::default();
        let mut searcher = Searcher::new(&evaluator);
        let first = searcher.search(&Position::startpos(), 2);
        let second = searcher.search(&Position::startpos(), 2);
        assert_eq!(first, second);
        assert_eq!(searcher.nodes(), first.nodes * 2);
        assert!(first.nodes > 1);
    }
}

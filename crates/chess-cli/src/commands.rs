//! Subcommand bodies. Each writes its report to the given writer.

use chess_core::{Color, FenError};
use chess_engine::movegen::perft::{perft, perft_divide, REFERENCE_POSITIONS};
use chess_engine::{is_in_check, make_move, Position};
use chess_search::{search, Evaluator};
use std::io::{self, Write};
use std::time::Instant;
use thiserror::Error;

/// Why a position has no move to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoMove {
    Checkmate,
    Stalemate,
}

impl NoMove {
    fn of(position: &Position) -> Self {
        if is_in_check(position, position.side_to_move()) {
            NoMove::Checkmate
        } else {
            NoMove::Stalemate
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            NoMove::Checkmate => "checkmate",
            NoMove::Stalemate => "stalemate",
        }
    }
}

/// Why a FEN string cannot be searched or counted.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PositionError {
    #[error("{0}")]
    Fen(#[from] FenError),

    #[error("no {0} king")]
    MissingKing(Color),

    #[error("side not to move is in check")]
    OpponentInCheck,
}

/// Builds a position from `fen`, refusing boards the engine cannot play
/// from: a side without a king, or a king that could be captured at once.
pub fn load_position(fen: &str) -> Result<Position, PositionError> {
    let position = Position::from_fen(fen)?;
    if let Some(color) = Color::BOTH
        .into_iter()
        .find(|color| position.king_square(*color).is_none())
    {
        return Err(PositionError::MissingKing(color));
    }
    if is_in_check(&position, position.side_to_move().opposite()) {
        return Err(PositionError::OpponentInCheck);
    }
    Ok(position)
}

/// Searches `position` and plays the best move.
///
/// With `autoplay`, keeps playing, one ply shallower after every move, until
/// the depth reaches zero or the side to move has no legal moves. Returns the
/// last position reached and, if play stopped early, why.
pub fn play<W: Write, E: Evaluator>(
    out: &mut W,
    position: &Position,
    depth: u32,
    autoplay: bool,
    evaluator: &E,
) -> io::Result<(Position, Option<NoMove>)> {
    let mut current = position.clone();
    let mut depth = depth;

    while depth > 0 {
        let result = search(&current, depth, evaluator);
        let Some(best) = result.best_move else {
            let reason = NoMove::of(&current);
            writeln!(out, "No legal moves available ({}).", reason.as_str())?;
            return Ok((current, Some(reason)));
        };

        tracing::info!(
            "depth {}: {} (score {}, {} nodes)",
            depth,
            best,
            result.score,
            result.nodes
        );

        current = make_move(&current, best);
        writeln!(out, "Best move: {}", best)?;
        writeln!(out, "New FEN: {} (depth {})", current.to_fen(), depth)?;
        writeln!(out, "{}", current)?;

        if !autoplay {
            break;
        }
        depth -= 1;
    }

    Ok((current, None))
}

/// Prints the perft count (or per-move breakdown) and returns the total.
pub fn run_perft<W: Write>(
    out: &mut W,
    position: &Position,
    depth: u32,
    divide: bool,
) -> io::Result<u64> {
    let start = Instant::now();
    let total = if divide {
        let results = perft_divide(position, depth);
        for (uci, nodes) in &results {
            writeln!(out, "{}: {}", uci, nodes)?;
        }
        writeln!(out)?;
        results.iter().map(|(_, nodes)| nodes).sum()
    } else {
        perft(position, depth)
    };
    writeln!(out, "Nodes: {}", total)?;
    tracing::info!("perft {} took {} ms", depth, start.elapsed().as_millis());
    Ok(total)
}

/// Runs perft on every reference position for depths `1..=max_depth`.
///
/// Returns the number of counts that disagree with the published value.
pub fn bench<W: Write>(out: &mut W, max_depth: u32) -> io::Result<usize> {
    let mut mismatches = 0;
    let mut total_nodes = 0u64;
    let suite_start = Instant::now();

    writeln!(
        out,
        "{:<12} {:>5} {:>12} {:>10}",
        "position", "depth", "nodes", "ms"
    )?;

    for reference in REFERENCE_POSITIONS {
        let position = match Position::from_fen(reference.fen) {
            Ok(position) => position,
            Err(e) => {
                tracing::warn!("skipping {}: {}", reference.name, e);
                continue;
            }
        };

        for depth in 1..=max_depth {
            let start = Instant::now();
            let nodes = perft(&position, depth);
            let elapsed = start.elapsed().as_millis();
            total_nodes += nodes;

            write!(
                out,
                "{:<12} {:>5} {:>12} {:>10}",
                reference.name, depth, nodes, elapsed
            )?;
            match reference.expected(depth) {
                Some(expected) if expected != nodes => {
                    mismatches += 1;
                    tracing::warn!(
                        "{} depth {}: got {}, expected {}",
                        reference.name,
                        depth,
                        nodes,
                        expected
                    );
                    writeln!(out, "  MISMATCH (expected {})", expected)?;
                }
                _ => writeln!(out)?,
            }
        }
    }

    let elapsed = suite_start.elapsed();
    let nps = if elapsed.as_secs_f64() > 0.0 {
        (total_nodes as f64 / elapsed.as_secs_f64()) as u64
    } else {
        0
    };
    writeln!(
        out,
        "Total: {} nodes in {} ms ({} nodes/s)",
        total_nodes,
        elapsed.as_millis(),
        nps
    )?;

    Ok(mismatches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::FenParser;
    use chess_search::MaterialEvaluator;

    fn output<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn play_prints_move_fen_and_board() {
        let position = Position::from_fen("4k3/8/8/3q4/8/8/3R4/4K3 w - - 0 1").unwrap();
        let text = output(|out| {
            let (after, stopped) = play(out, &position, 2, false, &MaterialEvaluator::default())?;
            assert_eq!(stopped, None);
            assert_eq!(after.side_to_move(), Color::Black);
            Ok(())
        });
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Best move: d2d5");
        assert_eq!(lines[1], "New FEN: 4k3/8/8/3R4/8/8/8/4K3 b - - 0 1 (depth 2)");
        assert!(text.contains("a b c d e f g h"));
    }

    #[test]
    fn play_reports_checkmate() {
        let position =
            Position::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3")
                .unwrap();
        let text = output(|out| {
            let (_, stopped) = play(out, &position, 3, false, &MaterialEvaluator::default())?;
            assert_eq!(stopped, Some(NoMove::Checkmate));
            Ok(())
        });
        assert_eq!(text.trim(), "No legal moves available (checkmate).");
    }

    #[test]
    fn play_reports_stalemate() {
        let position = Position::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        let text = output(|out| {
            play(out, &position, 2, false, &MaterialEvaluator::default()).map(|_| ())
        });
        assert_eq!(text.trim(), "No legal moves available (stalemate).");
    }

    #[test]
    fn autoplay_counts_depth_down() {
        let text = output(|out| {
            play(out, &Position::startpos(), 3, true, &MaterialEvaluator::default()).map(|_| ())
        });
        let depths: Vec<&str> = text
            .lines()
            .filter(|l| l.starts_with("New FEN:"))
            .filter_map(|l| l.rsplit("(depth ").next())
            .collect();
        assert_eq!(depths, vec!["3)", "2)", "1)"]);
    }

    #[test]
    fn autoplay_stops_at_mate() {
        // White mates on the first move; Black then has nothing to play.
        let position = Position::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
        let text = output(|out| {
            let (after, stopped) = play(out, &position, 3, true, &MaterialEvaluator::default())?;
            assert_eq!(stopped, Some(NoMove::Checkmate));
            assert_eq!(after.side_to_move(), Color::Black);
            Ok(())
        });
        assert!(text.starts_with("Best move: a1a8"));
        assert!(text.trim_end().ends_with("No legal moves available (checkmate)."));
    }

    #[test]
    fn perft_totals() {
        let text = output(|out| {
            assert_eq!(run_perft(out, &Position::startpos(), 2, false)?, 400);
            Ok(())
        });
        assert_eq!(text.trim(), "Nodes: 400");

        let text = output(|out| {
            assert_eq!(run_perft(out, &Position::startpos(), 2, true)?, 400);
            Ok(())
        });
        assert!(text.contains("e2e4: 20"));
        assert!(text.trim_end().ends_with("Nodes: 400"));
        assert_eq!(text.lines().filter(|l| l.contains(": ")).count(), 21);
    }

    #[test]
    fn bench_depth_one_matches_references() {
        let text = output(|out| {
            assert_eq!(bench(out, 1)?, 0);
            Ok(())
        });
        assert!(text.contains("kiwipete"));
        assert!(!text.contains("MISMATCH"));
        assert_eq!(text.lines().count(), 1 + REFERENCE_POSITIONS.len() + 1);
    }

    #[test]
    fn load_position_accepts_playable_boards() {
        assert_eq!(load_position(FenParser::STARTPOS), Ok(Position::startpos()));
    }

    #[test]
    fn load_position_rejects_missing_king() {
        let err = load_position("8/8/8/8/8/8/8/4K3 w - - 0 1").unwrap_err();
        assert_eq!(err, PositionError::MissingKing(Color::Black));
        assert_eq!(err.to_string(), "no Black king");
    }

    #[test]
    fn load_position_rejects_capturable_king() {
        // White to move with Black's king already attacked by the rook.
        let err = load_position("4k3/8/8/8/8/8/8/4R1K1 w - - 0 1").unwrap_err();
        assert_eq!(err, PositionError::OpponentInCheck);
        assert_eq!(err.to_string(), "side not to move is in check");
    }

    #[test]
    fn load_position_reports_fen_errors() {
        assert_eq!(
            load_position("8/8/8 w - - 0 1"),
            Err(PositionError::Fen(FenError::InvalidPiecePlacement(
                "expected 8 ranks, got 3".to_string()
            )))
        );
    }
}

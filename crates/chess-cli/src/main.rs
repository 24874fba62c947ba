//! chess-cli - search a position for its best move, run perft, or benchmark
//! the move generator.

use anyhow::Context;
use chess_cli::commands::{self, load_position};
use chess_cli::config::CliConfig;
use chess_core::FenParser;
use chess_engine::Position;
use chess_search::MaterialEvaluator;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "chess-cli")]
#[command(about = "Chess move search and move generator tools")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, global = true, default_value = "chess-cli.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find and play the best move in a position
    Play {
        /// Position to search, in FEN
        #[arg(short, long)]
        fen: String,
        /// Search depth in plies (defaults to the configured depth)
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
        depth: Option<u32>,
        /// Keep playing, one ply shallower after each move
        #[arg(short, long)]
        autoplay: bool,
    },
    /// Count leaf nodes of the legal move tree
    Perft {
        /// Position to count from, in FEN
        #[arg(short, long, default_value = FenParser::STARTPOS)]
        fen: String,
        /// Depth in plies
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
        depth: u32,
        /// Break the count down per root move
        #[arg(long)]
        divide: bool,
    },
    /// Run perft on the reference positions and report timings
    Bench {
        /// Deepest level to run (defaults to the configured bench depth)
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
        depth: Option<u32>,
    },
}

fn init_logging(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_position(fen: &str) -> anyhow::Result<Position> {
    load_position(fen).map_err(|e| anyhow::anyhow!("Invalid FEN: {}", e))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = CliConfig::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    init_logging(&config.log_level);

    if cli.config.exists() {
        tracing::info!("Config: {:?}", cli.config);
    } else {
        tracing::debug!("No config at {:?}, using defaults", cli.config);
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Play {
            fen,
            depth,
            autoplay,
        } => {
            let position = parse_position(&fen)?;
            let depth = depth.unwrap_or(config.default_depth);
            let evaluator = MaterialEvaluator::new(config.piece_values);
            commands::play(&mut out, &position, depth, autoplay, &evaluator)?;
        }
        Commands::Perft { fen, depth, divide } => {
            let position = parse_position(&fen)?;
            commands::run_perft(&mut out, &position, depth, divide)?;
        }
        Commands::Bench { depth } => {
            let depth = depth.unwrap_or(config.bench_depth);
            let mismatches = commands::bench(&mut out, depth)?;
            if mismatches > 0 {
                anyhow::bail!("{} perft counts disagree with the reference values", mismatches);
            }
        }
    }

    Ok(())
}

use std::{io, path::PathBuf};

use anyhow::Context as _;
use autotris_engine::{Board, PieceSource, RngSeed};
use autotris_evaluator::{HeuristicWeights, SearchEngine, Session, SessionStats};
use rand::Rng as _;

use crate::model::TunedModel;

const DEFAULT_MOVES: usize = 1000;
const DEFAULT_LOOKAHEAD: usize = 2;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct AutoPlayArg {
    /// Stop after this many moves
    #[arg(long, default_value_t = DEFAULT_MOVES)]
    pub(super) moves: usize,
    /// Number of upcoming pieces the search looks at
    #[arg(long, default_value_t = DEFAULT_LOOKAHEAD)]
    pub(super) lookahead: usize,
    /// Heuristic weights as `height,lines,holes,bumpiness`
    #[arg(long, allow_hyphen_values = true, conflicts_with = "model")]
    pub(super) weights: Option<HeuristicWeights>,
    /// Read weights from a model saved by `tune --output`
    #[arg(long)]
    model: Option<PathBuf>,
    /// Seed as 32 hex digits (random if omitted)
    #[arg(long)]
    seed: Option<RngSeed>,
    /// Print the board after every move
    #[arg(long)]
    show_board: bool,
}

impl Default for AutoPlayArg {
    fn default() -> Self {
        Self {
            moves: DEFAULT_MOVES,
            lookahead: DEFAULT_LOOKAHEAD,
            weights: None,
            model: None,
            seed: None,
            show_board: false,
        }
    }
}

pub(crate) fn run(arg: &AutoPlayArg) -> anyhow::Result<()> {
    let AutoPlayArg {
        moves,
        lookahead,
        weights,
        model,
        seed,
        show_board,
    } = arg;
    anyhow::ensure!(*lookahead >= 1, "lookahead must be at least 1");

    let weights = match (weights, model) {
        (Some(weights), _) => *weights,
        (None, Some(path)) => TunedModel::load(path)?.weights,
        (None, None) => HeuristicWeights::default(),
    };
    let seed = seed.unwrap_or_else(|| rand::rng().random());
    eprintln!("Seed: {seed}");
    eprintln!("Weights: {weights}");

    let board = Board::standard();
    let source = PieceSource::with_seed(board.columns(), seed);
    let mut session = Session::new(board, source, *lookahead);
    let engine = SearchEngine::new(weights);

    if *show_board {
        play_showing_board(&mut session, &engine, *moves, &mut io::stderr().lock())
            .context("Failed to print board")?;
    } else {
        session.play(&engine, *moves);
    }
    let stats = *session.stats();

    println!("{}", session.board());
    print_stats(&stats);
    Ok(())
}

/// Plays like [`Session::play`], writing the board after every placed piece.
fn play_showing_board<W>(
    session: &mut Session,
    engine: &SearchEngine,
    max_moves: usize,
    out: &mut W,
) -> io::Result<()>
where
    W: io::Write,
{
    while session.stats().moves() < max_moves && !session.is_over() {
        let before = session.stats().moves();
        let stats = session.play(engine, before + 1);
        if stats.moves() == before {
            break;
        }
        writeln!(out, "Move #{}:", stats.moves())?;
        writeln!(out, "{}", session.board())?;
    }
    Ok(())
}

fn print_stats(stats: &SessionStats) {
    let [_, single, double, triple, tetris] = *stats.line_cleared_counter();
    println!("Moves: {}", stats.moves());
    println!("Cleared lines: {}", stats.cleared_lines());
    println!("  Single: {single}");
    println!("  Double: {double}");
    println!("  Triple: {triple}");
    println!("  Tetris: {tetris}");
    println!("Topped out: {}", stats.topped_out());
}

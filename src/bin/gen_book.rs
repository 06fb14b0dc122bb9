use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;

use connect_four_engine::ai::{
    fingerprint, BookEntry, BookOutcome, OpeningBook, SearchAgent, SearchReport, WIN_SCORE,
};
use connect_four_engine::config::AppConfig;
use connect_four_engine::game::{Board, Player, COLS};

/// Build an opening book by searching every distinct early position.
#[derive(Parser)]
#[command(name = "gen-book", about = "Generate a Connect Four opening book")]
struct Cli {
    /// Where to write the book
    #[arg(long, default_value = "book.bin")]
    output: PathBuf,

    /// Record positions with fewer than this many pieces on the board
    #[arg(long, default_value_t = 4)]
    plies: usize,

    /// Search budget per position, in milliseconds
    #[arg(long)]
    time_ms: Option<u64>,

    /// Path to TOML configuration file
    #[arg(long, default_value = "connect4.toml")]
    config: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    if cli.plies == 0 || cli.plies > 12 {
        bail!("--plies must be between 1 and 12 (got {})", cli.plies);
    }

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;
    if let Some(ms) = cli.time_ms {
        config.search.time_budget_ms = ms;
    }
    config.validate().context("invalid settings")?;

    let mut positions = Vec::new();
    let mut seen = HashSet::new();
    collect_positions(&mut Board::new(), Player::Red, cli.plies, &mut seen, &mut positions);
    log::info!("searching {} positions below ply {}", positions.len(), cli.plies);

    let mut agent = SearchAgent::new(config.search.clone(), OpeningBook::disabled());
    let mut entries = Vec::with_capacity(positions.len());
    for (i, (board, player)) in positions.iter().enumerate() {
        let report = agent.search(board, *player);
        let Some(column) = report.column else {
            continue;
        };
        let entry = BookEntry {
            fingerprint: fingerprint(board, *player),
            column: column as u8,
            outcome: outcome_of(&report, board),
            depth: report.depth.min(u8::MAX as u32) as u8,
        };
        log::debug!(
            "[{}/{}] ply {} -> column {} ({:?}, depth {}, {} nodes)",
            i + 1,
            positions.len(),
            board.ply(),
            column,
            entry.outcome,
            report.depth,
            report.nodes
        );
        entries.push(entry);
    }

    let book = OpeningBook::from_entries(entries, config.book.max_ply);
    book.write_to(&cli.output)
        .with_context(|| format!("writing book to {}", cli.output.display()))?;
    println!("Wrote {} entries to {}", book.len(), cli.output.display());
    Ok(())
}

/// Depth-first walk over every non-terminal position with fewer than `plies`
/// pieces, skipping transpositions.
fn collect_positions(
    board: &mut Board,
    to_move: Player,
    plies: usize,
    seen: &mut HashSet<u64>,
    out: &mut Vec<(Board, Player)>,
) {
    if board.ply() >= plies || board.winner().is_some() || board.is_full() {
        return;
    }
    if !seen.insert(fingerprint(board, to_move)) {
        return;
    }
    out.push((*board, to_move));

    for col in 0..COLS {
        if board.drop_piece(col, to_move.to_cell()).is_ok() {
            collect_positions(board, to_move.other(), plies, seen, out);
            board.undo_piece(col);
        }
    }
}

fn outcome_of(report: &SearchReport, board: &Board) -> BookOutcome {
    if report.score >= WIN_SCORE {
        BookOutcome::Win
    } else if report.score <= -WIN_SCORE {
        BookOutcome::Loss
    } else if report.score == 0 && report.depth as usize >= board.empty_cells() {
        BookOutcome::Draw
    } else {
        BookOutcome::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk(plies: usize) -> Vec<(Board, Player)> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        collect_positions(&mut Board::new(), Player::Red, plies, &mut seen, &mut out);
        out
    }

    #[test]
    fn counts_distinct_early_positions() {
        assert_eq!(walk(1).len(), 1);
        assert_eq!(walk(2).len(), 1 + 7);
        assert_eq!(walk(3).len(), 1 + 7 + 49);
        // At ply 3 Red's two pieces can arrive in either order.
        assert!(walk(4).len() < 1 + 7 + 49 + 343);
    }

    #[test]
    fn walk_alternates_sides_below_the_ply_limit() {
        for (board, player) in walk(4) {
            let expected = if board.ply() % 2 == 0 { Player::Red } else { Player::Yellow };
            assert_eq!(player, expected);
            assert!(board.ply() < 4);
        }
    }

    #[test]
    fn outcome_follows_score_sign() {
        let board = Board::new();
        let report = |score, depth| SearchReport {
            column: Some(3),
            score,
            depth,
            nodes: 0,
            timed_out: false,
        };
        assert_eq!(outcome_of(&report(WIN_SCORE + 3, 5), &board), BookOutcome::Win);
        assert_eq!(outcome_of(&report(-WIN_SCORE - 1, 5), &board), BookOutcome::Loss);
        assert_eq!(outcome_of(&report(0, 12), &board), BookOutcome::Unknown);
        assert_eq!(outcome_of(&report(0, 42), &board), BookOutcome::Draw);
    }
}

use std::time::Duration;

use crate::game::{Board, Player, COLS};

use super::agent::Agent;
use super::budget::SearchBudget;
use super::heuristic::{Heuristic, ThreatHeuristic};
use super::opening_book::{opening_rule, OpeningBook};
use super::state_encoding::fingerprint;
use super::transposition::{Bound, TranspositionTable};

/// Score of a position already won by the side to move, before the
/// remaining-depth bonus that makes faster wins score higher.
pub const WIN_SCORE: i32 = 10_000_000;
const INFINITY: i32 = 2 * WIN_SCORE;

/// Past `DECISIVE_MIN_DEPTH`, a score above this ends iterative deepening.
const DECISIVE_SCORE: i32 = 50_000;
const DECISIVE_MIN_DEPTH: u32 = 8;

/// Mixed into cache keys when Yellow is the bot. Stored scores are relative
/// to the bot, so the two colours must never share entries.
const YELLOW_BOT_SALT: u64 = 0xD6E8_FEB8_6659_FD93;

/// Column ordering: center-first for better alpha-beta pruning.
pub const MOVE_ORDER: [usize; COLS] = [3, 2, 4, 1, 5, 0, 6];

/// Search limits and cache sizing.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Wall-clock budget per move decision.
    pub time_budget_ms: u64,
    /// First iterative-deepening depth.
    pub start_depth: u32,
    /// Hard cap on the deepening ceiling.
    pub max_depth: u32,
    /// Transposition cache slots.
    pub tt_capacity: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            time_budget_ms: 15_000,
            start_depth: 2,
            max_depth: 42,
            tt_capacity: 1 << 20,
        }
    }
}

impl SearchConfig {
    pub fn time_budget(&self) -> Duration {
        Duration::from_millis(self.time_budget_ms)
    }
}

/// Deepest iteration worth running with `empty_cells` squares left.
pub fn depth_ceiling(empty_cells: usize) -> u32 {
    let ceiling = match empty_cells {
        0..=12 => empty_cells,
        13..=20 => 16,
        21..=30 => 14,
        _ => 12,
    };
    ceiling.min(empty_cells) as u32
}

/// Outcome of one iterative-deepening search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchReport {
    pub column: Option<usize>,
    /// Score of the last completed iteration, from the searching side.
    pub score: i32,
    /// Depth of the last completed iteration; 0 when none completed.
    pub depth: u32,
    pub nodes: u64,
    pub timed_out: bool,
}

/// `hint` first, then the remaining columns in center-out order.
fn ordered_columns(hint: Option<usize>) -> [usize; COLS] {
    let mut order = MOVE_ORDER;
    if let Some(pos) = hint.and_then(|h| order.iter().position(|&c| c == h)) {
        order[..=pos].rotate_right(1);
    }
    order
}

fn bound_for(score: i32, alpha: i32, beta: i32) -> Bound {
    if score >= beta {
        Bound::Lower
    } else if score > alpha {
        Bound::Exact
    } else {
        Bound::Upper
    }
}

/// One decision's worth of search state. Owns a private board and the stack of
/// moves played on it, so every `play` is matched by exactly one `unplay`.
struct Searcher<'a> {
    board: Board,
    line: Vec<usize>,
    bot: Player,
    tt: &'a mut TranspositionTable,
    heuristic: &'a dyn Heuristic,
    nodes: u64,
}

impl<'a> Searcher<'a> {
    fn new(board: Board, bot: Player, tt: &'a mut TranspositionTable, heuristic: &'a dyn Heuristic) -> Self {
        Searcher {
            board,
            line: Vec::with_capacity(board.empty_cells()),
            bot,
            tt,
            heuristic,
            nodes: 0,
        }
    }

    fn play(&mut self, col: usize, side: Player) -> Option<usize> {
        let row = self.board.drop_piece(col, side.to_cell()).ok()?;
        self.line.push(col);
        Some(row)
    }

    fn unplay(&mut self) {
        if let Some(col) = self.line.pop() {
            let removed = self.board.undo_piece(col);
            debug_assert!(removed.is_some(), "unplay on empty column {col}");
        }
    }

    fn key(&self, side: Player) -> u64 {
        let key = fingerprint(&self.board, side);
        match self.bot {
            Player::Red => key,
            Player::Yellow => key ^ YELLOW_BOT_SALT,
        }
    }

    /// Static evaluation for the bot, negated when the opponent is to move.
    fn signed_eval(&self, side: Player) -> i32 {
        let score = self.heuristic.evaluate(&self.board, self.bot);
        if side == self.bot {
            score
        } else {
            -score
        }
    }

    fn terminal_score(&self, side: Player, depth: u32) -> Option<i32> {
        if self.board.has_four(side.to_cell()) {
            Some(WIN_SCORE + depth as i32)
        } else if self.board.has_four(side.other().to_cell()) {
            Some(-(WIN_SCORE + depth as i32))
        } else if self.board.is_full() {
            Some(0)
        } else {
            None
        }
    }

    /// Results computed after the deadline are partial; keep them out of the cache.
    fn store(&mut self, budget: &SearchBudget, key: u64, depth: u32, score: i32, bound: Bound, best: Option<usize>) {
        if !budget.is_exceeded() {
            self.tt.store(key, depth, score, bound, best);
        }
    }

    /// Negamax with alpha-beta. Returns the score for `side` and the move that
    /// achieved it.
    fn node(&mut self, budget: &mut SearchBudget, mut alpha: i32, beta: i32, side: Player, depth: u32) -> (i32, Option<usize>) {
        self.nodes += 1;
        if budget.check() {
            return (self.signed_eval(side), None);
        }

        let key = self.key(side);
        if let Some(score) = self.terminal_score(side, depth) {
            self.store(budget, key, depth, score, Bound::Exact, None);
            return (score, None);
        }

        let probe = self.tt.lookup(key, depth, alpha, beta);
        let hint = probe.best_move.filter(|&col| !self.board.is_column_full(col));
        if let Some(score) = probe.score {
            // The root has to report a move, so it only takes hits that carry one.
            if !self.line.is_empty() || hint.is_some() {
                return (score, hint);
            }
        }

        if depth == 0 {
            let score = self.signed_eval(side);
            self.store(budget, key, 0, score, Bound::Exact, None);
            return (score, None);
        }

        let own = side.to_cell();
        if let Some(col) = self.board.winning_column(own, &MOVE_ORDER) {
            let score = WIN_SCORE + depth as i32 - 1;
            self.store(budget, key, depth, score, Bound::Exact, Some(col));
            return (score, Some(col));
        }

        // The opponent threatens to win: the only reply worth searching is the block.
        if let Some(col) = self.board.winning_column(side.other().to_cell(), &MOVE_ORDER) {
            if let Some(row) = self.play(col, side) {
                let score = if self.board.is_winning_move(row, col, own) {
                    WIN_SCORE + depth as i32 - 1
                } else {
                    -self.node(budget, -beta, -alpha, side.other(), depth - 1).0
                };
                self.unplay();
                self.store(budget, key, depth, score, bound_for(score, alpha, beta), Some(col));
                return (score, Some(col));
            }
        }

        let alpha_orig = alpha;
        let mut best_score = -INFINITY;
        let mut best_move = None;
        for col in ordered_columns(hint) {
            if self.play(col, side).is_none() {
                continue;
            }
            let score = -self.node(budget, -beta, -alpha, side.other(), depth - 1).0;
            self.unplay();

            if score > best_score {
                best_score = score;
                best_move = Some(col);
            }
            if best_score > alpha {
                alpha = best_score;
            }
            if alpha >= beta {
                self.store(budget, key, depth, best_score, Bound::Lower, best_move);
                return (best_score, best_move);
            }
        }

        if best_move.is_none() {
            self.store(budget, key, depth, 0, Bound::Exact, None);
            return (0, None);
        }

        let bound = if best_score > alpha_orig {
            Bound::Exact
        } else {
            Bound::Upper
        };
        self.store(budget, key, depth, best_score, bound, best_move);
        (best_score, best_move)
    }
}

/// One-ply scan used when no iteration completed: an immediate win, else the
/// best static evaluation, else the first open column.
fn fallback_column(board: &Board, me: Player, heuristic: &dyn Heuristic) -> Option<usize> {
    if let Some(col) = board.winning_column(me.to_cell(), &MOVE_ORDER) {
        return Some(col);
    }

    let mut best: Option<(i32, usize)> = None;
    for col in MOVE_ORDER {
        let mut child = *board;
        if child.drop_piece(col, me.to_cell()).is_err() {
            continue;
        }
        let score = heuristic.evaluate(&child, me);
        if best.map_or(true, |(best_score, _)| score > best_score) {
            best = Some((score, col));
        }
    }

    best.map(|(_, col)| col)
        .or_else(|| MOVE_ORDER.into_iter().find(|&col| !board.is_column_full(col)))
}

/// Full-strength agent: opening book, opening rules, immediate tactics, then
/// iterative-deepening negamax under a wall-clock budget.
pub struct SearchAgent {
    config: SearchConfig,
    book: OpeningBook,
    tt: TranspositionTable,
    heuristic: Box<dyn Heuristic>,
}

impl SearchAgent {
    pub fn new(config: SearchConfig, book: OpeningBook) -> Self {
        Self::with_heuristic(config, book, Box::new(ThreatHeuristic))
    }

    pub fn with_heuristic(config: SearchConfig, book: OpeningBook, heuristic: Box<dyn Heuristic>) -> Self {
        SearchAgent {
            tt: TranspositionTable::new(config.tt_capacity),
            config,
            book,
            heuristic,
        }
    }

    pub fn transposition_table(&self) -> &TranspositionTable {
        &self.tt
    }

    /// Iterative deepening from `config.start_depth`, keeping the move of the
    /// last iteration that finished inside the budget.
    pub fn search(&mut self, board: &Board, me: Player) -> SearchReport {
        let mut budget = SearchBudget::start(self.config.time_budget());
        let ceiling = depth_ceiling(board.empty_cells()).min(self.config.max_depth).max(1);
        let start = self.config.start_depth.clamp(1, ceiling);

        let mut report = SearchReport {
            column: None,
            score: 0,
            depth: 0,
            nodes: 0,
            timed_out: false,
        };

        let mut searcher = Searcher::new(*board, me, &mut self.tt, self.heuristic.as_ref());
        for depth in start..=ceiling {
            let (score, column) = searcher.node(&mut budget, -INFINITY, INFINITY, me, depth);
            if budget.is_exceeded() {
                log::debug!(
                    "depth {depth} interrupted after {:?}, keeping depth {}",
                    budget.elapsed(),
                    report.depth
                );
                report.timed_out = true;
                break;
            }
            let Some(column) = column else {
                break;
            };

            report.column = Some(column);
            report.score = score;
            report.depth = depth;
            log::debug!(
                "depth {depth}: column {column} score {score} nodes {} elapsed {:?}",
                searcher.nodes,
                budget.elapsed()
            );

            if score.abs() >= WIN_SCORE {
                break;
            }
            if depth >= DECISIVE_MIN_DEPTH && score > DECISIVE_SCORE {
                break;
            }
        }
        report.nodes = searcher.nodes;
        debug_assert!(searcher.line.is_empty());
        debug_assert_eq!(searcher.board, *board, "search must restore the board");

        if report.column.is_none() {
            report.column = fallback_column(board, me, self.heuristic.as_ref());
        }
        report
    }

    /// The complete hard-difficulty decision.
    pub fn best_move(&mut self, board: &Board, me: Player) -> Option<usize> {
        if !board.any_valid_moves() {
            return None;
        }
        if let Some(col) = self.book.suggest(board, me) {
            log::debug!("book move {col} at ply {}", board.ply());
            return Some(col);
        }
        if let Some(col) = opening_rule(board) {
            return Some(col);
        }
        if let Some(col) = board.winning_column(me.to_cell(), &MOVE_ORDER) {
            return Some(col);
        }
        if let Some(col) = board.winning_column(me.other().to_cell(), &MOVE_ORDER) {
            return Some(col);
        }

        let report = self.search(board, me);
        report
            .column
            .or_else(|| MOVE_ORDER.into_iter().find(|&col| !board.is_column_full(col)))
    }
}

impl Agent for SearchAgent {
    fn select_column(&mut self, board: &Board, player: Player) -> Option<usize> {
        self.best_move(board, player)
    }

    fn name(&self) -> &str {
        "Negamax"
    }

    fn new_game(&mut self) {
        self.tt.clear();
    }
}

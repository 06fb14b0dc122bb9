use crate::game::{Board, Cell, Player, COLS, DIRECTIONS, ROWS};

/// Largest magnitude a static evaluation may reach. Kept well under the
/// search's terminal scores so a heuristic never reads as a forced result.
pub const EVAL_LIMIT: i32 = 5_000_000;

/// Trait for evaluating a board position from a player's perspective.
pub trait Heuristic: Send {
    fn evaluate(&self, board: &Board, player: Player) -> i32;
}

/// Per-piece weight by column; the center column connects to the most lines.
const COLUMN_WEIGHTS: [i32; COLS] = [1, 2, 3, 6, 3, 2, 1];

const OWN_FORK_BONUS: i32 = 60_000;
const OPP_FORK_PENALTY: i32 = 90_000;

const OWN_EXTRA_OPEN_THREE: i32 = 2_500;
const OPP_EXTRA_OPEN_THREE: i32 = 4_000;
const OWN_THREAT_PRESSURE: i32 = 800;
const OPP_THREAT_PRESSURE: i32 = 1_200;

/// Window scores indexed by openness: `[open, half_open, closed]`.
#[derive(Debug, Clone, Copy)]
struct Tiers {
    four: i32,
    three: [i32; 3],
    two: [i32; 3],
}

#[derive(Debug, Clone, Copy)]
struct LineWeights {
    own: Tiers,
    opponent: Tiers,
}

static HORIZONTAL: LineWeights = LineWeights {
    own: Tiers { four: 100_000, three: [5_000, 1_000, 200], two: [200, 50, 10] },
    opponent: Tiers { four: 120_000, three: [8_000, 1_500, 300], two: [300, 70, 15] },
};

static VERTICAL: LineWeights = LineWeights {
    own: Tiers { four: 100_000, three: [900, 900, 150], two: [60, 60, 8] },
    opponent: Tiers { four: 120_000, three: [1_400, 1_400, 220], two: [90, 90, 12] },
};

/// Rising to the right.
static MAIN_DIAGONAL: LineWeights = LineWeights {
    own: Tiers { four: 100_000, three: [3_000, 800, 150], two: [120, 40, 8] },
    opponent: Tiers { four: 120_000, three: [4_500, 1_200, 250], two: [180, 60, 12] },
};

/// Rising to the left.
static ANTI_DIAGONAL: LineWeights = LineWeights {
    own: Tiers { four: 100_000, three: [3_000, 800, 150], two: [120, 40, 8] },
    opponent: Tiers { four: 120_000, three: [4_500, 1_200, 250], two: [180, 60, 12] },
};

/// Threat counts gathered while scanning windows.
#[derive(Debug, Default)]
struct ThreatTally {
    own_open_threes: i32,
    opp_open_threes: i32,
    own_threes: i32,
    opp_threes: i32,
}

/// Default evaluator: center bias, tiered 4-cell windows, fork detection and
/// aggregate threat bonuses. Opponent threats weigh more than our own.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreatHeuristic;

impl ThreatHeuristic {
    fn score_window(own: usize, opp: usize, open_ends: usize, weights: &LineWeights, tally: &mut ThreatTally) -> i32 {
        let tier = 2 - open_ends;
        let empty = 4 - own - opp;
        match (own, opp, empty) {
            (4, 0, 0) => weights.own.four,
            (0, 4, 0) => -weights.opponent.four,
            (3, 0, 1) => {
                tally.own_threes += 1;
                if open_ends == 2 {
                    tally.own_open_threes += 1;
                }
                weights.own.three[tier]
            }
            (0, 3, 1) => {
                tally.opp_threes += 1;
                if open_ends == 2 {
                    tally.opp_open_threes += 1;
                }
                -weights.opponent.three[tier]
            }
            (2, 0, 2) => weights.own.two[tier],
            (0, 2, 2) => -weights.opponent.two[tier],
            _ => 0,
        }
    }

    fn line_weights(dr: isize, dc: isize) -> &'static LineWeights {
        match (dr, dc) {
            (0, _) => &HORIZONTAL,
            (_, 0) => &VERTICAL,
            _ if dr == dc => &MAIN_DIAGONAL,
            _ => &ANTI_DIAGONAL,
        }
    }
}

impl Heuristic for ThreatHeuristic {
    fn evaluate(&self, board: &Board, player: Player) -> i32 {
        let own_cell = player.to_cell();
        let opp_cell = player.other().to_cell();
        let mut score = 0;

        for row in 0..ROWS {
            for (col, weight) in COLUMN_WEIGHTS.iter().enumerate() {
                match board.get(row, col) {
                    c if c == own_cell => score += weight,
                    c if c == opp_cell => score -= weight,
                    _ => {}
                }
            }
        }

        if board.count_winning_columns(own_cell) >= 2 {
            score += OWN_FORK_BONUS;
        }
        if board.count_winning_columns(opp_cell) >= 2 {
            score -= OPP_FORK_PENALTY;
        }

        let mut tally = ThreatTally::default();
        for &(dr, dc) in &DIRECTIONS {
            let weights = Self::line_weights(dr, dc);
            for row in 0..ROWS as isize {
                for col in 0..COLS as isize {
                    let end_row = row + 3 * dr;
                    let end_col = col + 3 * dc;
                    if board.cell_at(end_row, end_col).is_none() {
                        continue;
                    }

                    let mut own = 0;
                    let mut opp = 0;
                    for i in 0..4 {
                        match board.cell_at(row + i * dr, col + i * dc) {
                            Some(c) if c == own_cell => own += 1,
                            Some(c) if c == opp_cell => opp += 1,
                            _ => {}
                        }
                    }
                    if own > 0 && opp > 0 {
                        continue;
                    }

                    let open_ends = [
                        board.cell_at(row - dr, col - dc),
                        board.cell_at(end_row + dr, end_col + dc),
                    ]
                    .iter()
                    .filter(|&&c| c == Some(Cell::Empty))
                    .count();

                    score += Self::score_window(own, opp, open_ends, weights, &mut tally);
                }
            }
        }

        if tally.own_open_threes >= 2 {
            score += OWN_EXTRA_OPEN_THREE * (tally.own_open_threes - 1);
        }
        if tally.opp_open_threes >= 2 {
            score -= OPP_EXTRA_OPEN_THREE * (tally.opp_open_threes - 1);
        }
        if tally.own_threes >= 3 {
            score += OWN_THREAT_PRESSURE * tally.own_threes;
        }
        if tally.opp_threes >= 3 {
            score -= OPP_THREAT_PRESSURE * tally.opp_threes;
        }

        score.clamp(-EVAL_LIMIT, EVAL_LIMIT)
    }
}

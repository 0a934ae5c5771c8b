use crate::game::{Axis, Board, Player, Run, COLS, REACH, ROWS};

/// Per-column step of the centre bonus (column 3 gets three steps).
const CENTER_WEIGHT: i32 = 3;
const HEIGHT_WEIGHT: i32 = 2;
const OPEN_THREE_SCORE: i32 = 50;
const OPEN_TWO_SCORE: i32 = 10;

const CENTER_COL: i32 = (COLS as i32 - 1) / 2;
const BOTTOM_ROW: i32 = ROWS as i32 - 1;

/// Heuristic value of one candidate placement.
pub struct PositionEvaluator<'a> {
    board: &'a mut Board,
}

impl<'a> PositionEvaluator<'a> {
    pub fn new(board: &'a mut Board) -> Self {
        PositionEvaluator { board }
    }

    /// Score `player`'s token at (row, col): centre bonus, height bonus and the
    /// line potential along all four axes. Line potential only counts when the
    /// cell actually holds `player`'s token. Cells off the board score 0.
    pub fn score(board: &Board, row: usize, col: usize, player: Player) -> i32 {
        if row >= ROWS || col >= COLS {
            return 0;
        }

        let center = (CENTER_COL - (col as i32 - CENTER_COL).abs()) * CENTER_WEIGHT;
        let height = (BOTTOM_ROW - row as i32) * HEIGHT_WEIGHT;

        let potential = if board.get(row, col) == player.to_cell() {
            Axis::ALL
                .into_iter()
                .map(|axis| Self::axis_potential(board.run(row, col, axis, REACH)))
                .sum()
        } else {
            0
        };

        center + height + potential
    }

    fn axis_potential(run: Run) -> i32 {
        if run.length == 3 && run.open_ends >= 1 {
            OPEN_THREE_SCORE
        } else if run.length == 2 && run.open_ends >= 2 {
            OPEN_TWO_SCORE
        } else {
            0
        }
    }

    /// Highest scoring open column for `player`; the leftmost wins ties.
    pub fn evaluate_best_move(&mut self, player: Player) -> Option<usize> {
        let cell = player.to_cell();
        let mut best: Option<(usize, i32)> = None;

        for col in 0..COLS {
            let Some(probe) = self.board.probe(col, cell) else {
                continue;
            };
            let score = Self::score(&probe, probe.row(), col, player);
            drop(probe);

            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((col, score));
            }
        }

        best.map(|(col, _)| col)
    }
}

//! Single-ply tactics: immediate wins, forks and alignments.
//!
//! Every search drops a hypothetical token through [`Board::probe`], inspects
//! the lines through it and lets the guard clear the cell again, so the board
//! is unchanged whichever way a search returns.

use crate::game::{Board, Player, Probe, Run, Scope, COLS, CONNECT, ROWS};

/// A run of three with room to grow into four.
pub fn is_open_three(run: Run) -> bool {
    run.length == CONNECT - 1 && run.open_ends >= 1
}

/// Number of axes through the probed token holding an open three.
pub fn open_threes(probe: &Probe<'_>) -> usize {
    probe.runs().filter(|&run| is_open_three(run)).count()
}

pub struct ThreatAnalyzer<'a> {
    board: &'a mut Board,
}

impl<'a> ThreatAnalyzer<'a> {
    pub fn new(board: &'a mut Board) -> Self {
        ThreatAnalyzer { board }
    }

    /// Does `player`'s token at (row, col) complete four in a row? Cells off
    /// the board never do.
    pub fn local_win_check(&self, row: usize, col: usize, player: Player) -> bool {
        row < ROWS
            && col < COLS
            && self.board.get(row, col) == player.to_cell()
            && self.board.four_in_a_row(Scope::From { row, col }).is_some()
    }

    /// First column, left to right, where `player` wins on the spot.
    pub fn find_winning_move(&mut self, player: Player) -> Option<usize> {
        self.first_column(player, |probe| {
            probe
                .four_in_a_row(Scope::From {
                    row: probe.row(),
                    col: probe.col(),
                })
                .is_some()
        })
    }

    /// First column where `player` creates two or more open threes at once.
    pub fn find_fork_move(&mut self, player: Player) -> Option<usize> {
        self.first_column(player, |probe| open_threes(probe) >= 2)
    }

    /// First column where `player`'s token joins at least one other of its
    /// own on some axis.
    pub fn find_alignment_move(&mut self, player: Player) -> Option<usize> {
        self.first_column(player, |probe| probe.runs().any(|run| run.length >= 2))
    }

    fn first_column<F>(&mut self, player: Player, mut hit: F) -> Option<usize>
    where
        F: FnMut(&Probe<'_>) -> bool,
    {
        let cell = player.to_cell();
        (0..COLS).find(|&col| self.board.probe(col, cell).is_some_and(|probe| hit(&probe)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Axis, Cell, GameState};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn board_with(tokens: &[(usize, Cell)]) -> Board {
        let mut board = Board::new();
        for &(col, cell) in tokens {
            board.drop_piece(col, cell).unwrap();
        }
        board
    }

    /// Yellow drop in column 2 opens a horizontal and a diagonal three.
    fn fork_board() -> Board {
        board_with(&[
            (3, Cell::Yellow),
            (3, Cell::Yellow),
            (4, Cell::Yellow),
            (4, Cell::Red),
            (4, Cell::Yellow),
            (6, Cell::Red),
            (6, Cell::Red),
        ])
    }

    /// Non-terminal positions reached by random play.
    fn random_positions(seed: u64, count: usize) -> Vec<GameState> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut positions = Vec::with_capacity(count);
        while positions.len() < count {
            let mut state = GameState::initial();
            let plies = rng.random_range(0..30);
            for _ in 0..plies {
                let legal = state.legal_actions();
                if legal.is_empty() {
                    break;
                }
                state.try_move(legal[rng.random_range(0..legal.len())]).unwrap();
                state.check_win();
            }
            if !state.is_terminal() {
                positions.push(state);
            }
        }
        positions
    }

    #[test]
    fn test_find_winning_move_completes_horizontal() {
        let mut board = board_with(&[(1, Cell::Yellow), (2, Cell::Yellow), (3, Cell::Yellow)]);
        let before = board;

        let col = ThreatAnalyzer::new(&mut board).find_winning_move(Player::Yellow);
        assert!(matches!(col, Some(0) | Some(4)));
        assert_eq!(col, Some(0)); // lowest index wins the tie
        assert_eq!(board, before);

        assert_eq!(
            ThreatAnalyzer::new(&mut board).find_winning_move(Player::Red),
            None
        );
        assert_eq!(board, before);
    }

    #[test]
    fn test_find_winning_move_vertical() {
        let mut board = board_with(&[(5, Cell::Red), (5, Cell::Red), (5, Cell::Red)]);
        assert_eq!(
            ThreatAnalyzer::new(&mut board).find_winning_move(Player::Red),
            Some(5)
        );
    }

    #[test]
    fn test_find_winning_move_skips_full_columns() {
        let mut board = Board::new();
        for i in 0..6 {
            let cell = if i % 2 == 0 { Cell::Red } else { Cell::Yellow };
            board.drop_piece(0, cell).unwrap();
        }
        board.drop_piece(1, Cell::Yellow).unwrap();
        board.drop_piece(2, Cell::Yellow).unwrap();
        board.drop_piece(3, Cell::Yellow).unwrap();

        assert_eq!(
            ThreatAnalyzer::new(&mut board).find_winning_move(Player::Yellow),
            Some(4)
        );
    }

    #[test]
    fn test_find_winning_move_matches_brute_force() {
        for state in random_positions(11, 300) {
            let board = *state.board();
            for player in [Player::Red, Player::Yellow] {
                let brute = board.open_columns().into_iter().find(|&col| {
                    let mut copy = board;
                    let row = copy.drop_piece(col, player.to_cell()).unwrap();
                    copy.check_win(row, col)
                });

                let mut scratch = board;
                let found = ThreatAnalyzer::new(&mut scratch).find_winning_move(player);
                assert_eq!(found, brute);
                assert_eq!(scratch, board);
            }
        }
    }

    #[test]
    fn test_find_fork_move() {
        let mut board = fork_board();
        let before = board;

        assert_eq!(
            ThreatAnalyzer::new(&mut board).find_fork_move(Player::Yellow),
            Some(2)
        );
        assert_eq!(board, before);

        let probe = board.probe(2, Cell::Yellow).unwrap();
        assert!(is_open_three(probe.run(Axis::Horizontal)));
        assert!(is_open_three(probe.run(Axis::DiagonalUp)));
        assert_eq!(open_threes(&probe), 2);
    }

    #[test]
    fn test_no_fork_on_empty_board() {
        let mut board = Board::new();
        let mut analyzer = ThreatAnalyzer::new(&mut board);
        assert_eq!(analyzer.find_fork_move(Player::Red), None);
        assert_eq!(analyzer.find_alignment_move(Player::Red), None);
    }

    #[test]
    fn test_fork_columns_resimulate_to_two_threats() {
        for state in random_positions(23, 400) {
            let mut board = *state.board();
            let before = board;
            for player in [Player::Red, Player::Yellow] {
                let fork = ThreatAnalyzer::new(&mut board).find_fork_move(player);
                assert_eq!(board, before);
                if let Some(col) = fork {
                    let probe = board.probe(col, player.to_cell()).unwrap();
                    assert!(open_threes(&probe) >= 2);
                }
                assert_eq!(board, before);
            }
        }
    }

    #[test]
    fn test_closed_three_is_not_a_threat() {
        // Red three boxed in by Yellow on the right and the wall on the left
        let mut board = board_with(&[(0, Cell::Red), (1, Cell::Red), (3, Cell::Yellow)]);
        let probe = board.probe(2, Cell::Red).unwrap();
        let run = probe.run(Axis::Horizontal);
        assert_eq!(run.length, 3);
        assert_eq!(run.open_ends, 0);
        assert!(!is_open_three(run));
    }

    #[test]
    fn test_find_alignment_move() {
        let mut board = board_with(&[(3, Cell::Red), (0, Cell::Yellow)]);
        let mut analyzer = ThreatAnalyzer::new(&mut board);
        // column 0 stacks on Yellow's own token
        assert_eq!(analyzer.find_alignment_move(Player::Yellow), Some(0));
        // Red pairs up horizontally next to (5,3) in column 2 first
        assert_eq!(analyzer.find_alignment_move(Player::Red), Some(2));
    }

    #[test]
    fn test_local_win_check() {
        let mut board = board_with(&[(2, Cell::Red), (3, Cell::Red), (4, Cell::Red), (5, Cell::Red)]);
        let analyzer = ThreatAnalyzer::new(&mut board);
        assert!(analyzer.local_win_check(5, 2, Player::Red));
        assert!(analyzer.local_win_check(5, 5, Player::Red));
        assert!(!analyzer.local_win_check(5, 5, Player::Yellow));
        assert!(!analyzer.local_win_check(5, 0, Player::Red));
        assert!(!analyzer.local_win_check(ROWS, 2, Player::Red));
        assert!(!analyzer.local_win_check(5, COLS, Player::Red));
    }
}

use log::info;
use serde::{Deserialize, Serialize};

use super::board::{Board, Scope, COLS};
use super::player::Player;
use super::snapshot::GameSnapshot;
use crate::error::{MoveError, SnapshotError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOutcome {
    Winner(Player),
    Draw,
}

/// One accepted placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub player: Player,
    pub column: usize,
    pub row: usize,
}

/// A single game: board, turn, outcome, move log and the two display names.
///
/// Only [`GameState::try_move`] and [`GameState::check_win`] mutate it. Win and
/// draw detection is not folded into `try_move`; callers run `check_win`
/// after every accepted move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    current_player: Player,
    outcome: Option<GameOutcome>,
    history: Vec<Move>,
    player1_name: String,
    player2_name: String,
}

impl GameState {
    /// Create a fresh game between two named players. Red starts.
    pub fn new(player1_name: impl Into<String>, player2_name: impl Into<String>) -> Self {
        GameState {
            board: Board::new(),
            current_player: Player::Red,
            outcome: None,
            history: Vec::new(),
            player1_name: player1_name.into(),
            player2_name: player2_name.into(),
        }
    }

    /// Create initial game state with the default player names
    pub fn initial() -> Self {
        Self::new(Player::Red.name(), Player::Yellow.name())
    }

    /// Get current player
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// Get reference to board
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Get game outcome if game is over
    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    /// Check if game is over
    pub fn is_terminal(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn winner(&self) -> Option<Player> {
        match self.outcome {
            Some(GameOutcome::Winner(player)) => Some(player),
            _ => None,
        }
    }

    pub fn history(&self) -> &[Move] {
        &self.history
    }

    pub fn total_moves(&self) -> usize {
        self.history.len()
    }

    pub fn last_move(&self) -> Option<Move> {
        self.history.last().copied()
    }

    pub fn player_name(&self, player: Player) -> &str {
        match player {
            Player::Red => &self.player1_name,
            Player::Yellow => &self.player2_name,
        }
    }

    /// Get list of legal columns (not full). Empty once the game is over.
    pub fn legal_actions(&self) -> Vec<usize> {
        if self.is_terminal() {
            return Vec::new();
        }

        (0..COLS)
            .filter(|&col| !self.board.is_column_full(col))
            .collect()
    }

    /// Drop the current player's token into `column` and hand the turn over.
    ///
    /// Returns the landing row. An invalid or full column is rejected and the
    /// state is left exactly as it was.
    pub fn try_move(&mut self, column: usize) -> Result<usize, MoveError> {
        let player = self.current_player;
        let row = self.board.drop_piece(column, player.to_cell())?;

        self.history.push(Move {
            player,
            column,
            row,
        });
        self.current_player = player.other();

        Ok(row)
    }

    /// Classify the board after a move.
    ///
    /// A four-in-a-row is credited to the player who just moved, i.e. the
    /// opponent of the player now on turn. A full board without one is a draw.
    /// Otherwise nothing changes and `None` is returned.
    pub fn check_win(&mut self) -> Option<GameOutcome> {
        if self.outcome.is_some() {
            return self.outcome;
        }

        if self.board.four_in_a_row(Scope::Everywhere).is_some() {
            let winner = self.current_player.other();
            info!(
                "{} ({}) wins after {} moves",
                self.player_name(winner),
                winner.name(),
                self.total_moves()
            );
            self.outcome = Some(GameOutcome::Winner(winner));
        } else if self.board.is_full() {
            info!("draw after {} moves", self.total_moves());
            self.outcome = Some(GameOutcome::Draw);
        }

        self.outcome
    }

    /// Read-only copy of the state for rendering or persistence.
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            grid: *self.board.cells(),
            current_player: self.current_player,
            winner: self.winner(),
            game_over: self.is_terminal(),
            history: self.history.clone(),
            total_moves: self.total_moves(),
            player1_name: self.player1_name.clone(),
            player2_name: self.player2_name.clone(),
        }
    }

    /// Rebuild a game from a snapshot by replaying its move log, checking that
    /// every recorded field agrees with the replay.
    pub fn from_snapshot(snapshot: &GameSnapshot) -> Result<Self, SnapshotError> {
        if snapshot.total_moves != snapshot.history.len() {
            return Err(SnapshotError::MoveCountMismatch {
                total_moves: snapshot.total_moves,
                history_len: snapshot.history.len(),
            });
        }

        let mut state = GameState::new(
            snapshot.player1_name.clone(),
            snapshot.player2_name.clone(),
        );

        for (index, recorded) in snapshot.history.iter().enumerate() {
            if state.is_terminal() {
                return Err(SnapshotError::MoveAfterGameOver { index });
            }
            if recorded.player != state.current_player {
                return Err(SnapshotError::OutOfTurn {
                    index,
                    expected: state.current_player,
                    found: recorded.player,
                });
            }

            let row = state
                .try_move(recorded.column)
                .map_err(|source| SnapshotError::IllegalMove { index, source })?;
            if row != recorded.row {
                return Err(SnapshotError::RowMismatch {
                    index,
                    recorded: recorded.row,
                    actual: row,
                });
            }
            state.check_win();
        }

        if state.board.cells() != &snapshot.grid {
            return Err(SnapshotError::GridMismatch);
        }
        if state.current_player != snapshot.current_player {
            return Err(SnapshotError::TurnMismatch);
        }
        if state.is_terminal() != snapshot.game_over || state.winner() != snapshot.winner {
            return Err(SnapshotError::OutcomeMismatch);
        }

        Ok(state)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::initial()
    }
}

use std::path::PathBuf;

use crate::game::Player;

/// Rejected placements. The game state is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("column {0} is outside the board")]
    InvalidColumn(usize),

    #[error("column {0} is full")]
    ColumnFull(usize),
}

/// Errors from the computer opponent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AiError {
    #[error("no legal column left to play")]
    NoLegalMove,
}

/// Errors that can occur while driving a game session.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("invalid move: {0}")]
    Move(#[from] MoveError),

    #[error("computer move failed: {0}")]
    Ai(#[from] AiError),

    #[error("the game is over")]
    GameOver,

    #[error("it is the computer's turn")]
    NotYourTurn,

    #[error("session lock poisoned")]
    Poisoned,
}

/// Errors raised when a snapshot does not describe a reachable game.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SnapshotError {
    #[error("total_moves is {total_moves} but the history holds {history_len} moves")]
    MoveCountMismatch {
        total_moves: usize,
        history_len: usize,
    },

    #[error("move {index} was played by {found:?} but it was {expected:?}'s turn")]
    OutOfTurn {
        index: usize,
        expected: Player,
        found: Player,
    },

    #[error("move {index} is illegal: {source}")]
    IllegalMove { index: usize, source: MoveError },

    #[error("move {index} was recorded after the game ended")]
    MoveAfterGameOver { index: usize },

    #[error("move {index} landed on row {actual}, history says row {recorded}")]
    RowMismatch {
        index: usize,
        recorded: usize,
        actual: usize,
    },

    #[error("grid does not match the replayed history")]
    GridMismatch,

    #[error("current player does not match the replayed history")]
    TurnMismatch,

    #[error("outcome does not match the replayed history")]
    OutcomeMismatch,

    #[error("{wins} wins recorded over only {games_played} games")]
    ScoreMismatch { wins: u64, games_played: u32 },
}

/// Unknown difficulty name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown difficulty '{0}' (expected 'easy', 'medium' or 'hard')")]
pub struct ParseDifficultyError(pub String);

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}

//! Core game logic: board, players, the move engine and read-only snapshots.

mod board;
mod player;
mod snapshot;
mod state;

pub use board::{Axis, Board, Cell, Probe, Run, Scope, COLS, CONNECT, REACH, ROWS};
pub use player::Player;
pub use snapshot::GameSnapshot;
pub use state::{GameOutcome, GameState, Move};

pub use crate::error::MoveError;

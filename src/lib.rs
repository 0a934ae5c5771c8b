//! # Power Four
//!
//! Four-in-a-row on a 6×7 grid with a tiered heuristic computer opponent.
//! Sessions keep score across rounds and are safe to share between threads;
//! the binary plays them in a Ratatui terminal UI.
//!
//! ## Modules
//!
//! - [`game`]: Board, players, moves, win/draw detection, snapshots
//! - [`ai`]: Threat analysis, position scoring, EASY/MEDIUM/HARD policies
//! - [`session`]: Scored sessions behind a per-session lock
//! - [`ui`]: Terminal UI with the computer's thinking delay
//! - [`config`]: TOML configuration loading and validation
//! - [`logging`]: File logger setup
//! - [`error`]: Structured error types

pub mod ai;
pub mod config;
pub mod error;
pub mod game;
pub mod logging;
pub mod session;
pub mod ui;

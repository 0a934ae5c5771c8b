use serde::{Deserialize, Serialize};

use super::board::{Cell, COLS, ROWS};
use super::player::Player;
use super::state::Move;

/// Plain copy of a game for callers that render or store it. The core fixes
/// the shape; the encoding is up to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub grid: [[Cell; COLS]; ROWS],
    pub current_player: Player,
    pub winner: Option<Player>,
    pub game_over: bool,
    pub history: Vec<Move>,
    pub total_moves: usize,
    pub player1_name: String,
    pub player2_name: String,
}

impl GameSnapshot {
    pub fn player_name(&self, player: Player) -> &str {
        match player {
            Player::Red => &self.player1_name,
            Player::Yellow => &self.player2_name,
        }
    }
}

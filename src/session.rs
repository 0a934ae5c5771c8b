//! Game sessions: one game plus its scoreboard and opponent settings, behind a
//! per-session lock.
//!
//! A human turn (move, outcome check, optional computer reply, outcome check)
//! runs under a single lock acquisition, so other holders of the same
//! [`SharedSession`] never see half a turn.

use std::sync::{Arc, Mutex};

use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::ai::{AiConfig, Difficulty, TierSet};
use crate::error::{ConfigError, SessionError, SnapshotError};
use crate::game::{GameOutcome, GameSnapshot, GameState, Move, Player};

/// Seat taken by the computer when it plays.
pub const COMPUTER_SEAT: Player = Player::Yellow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Opponent {
    Human,
    Computer(Difficulty),
}

impl Opponent {
    pub fn difficulty(self) -> Option<Difficulty> {
        match self {
            Opponent::Human => None,
            Opponent::Computer(difficulty) => Some(difficulty),
        }
    }

    pub fn label(self) -> String {
        match self {
            Opponent::Human => "Human vs Human".to_string(),
            Opponent::Computer(difficulty) => format!("vs Computer ({difficulty})"),
        }
    }
}

/// Display-name defaults and limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayersConfig {
    pub player_one: String,
    pub player_two: String,
    /// Name of the second seat when the computer plays it.
    pub computer: String,
    /// Longer names are cut to this many characters.
    pub max_name_len: usize,
}

impl Default for PlayersConfig {
    fn default() -> Self {
        PlayersConfig {
            player_one: Player::Red.name().to_string(),
            player_two: Player::Yellow.name().to_string(),
            computer: "Computer".to_string(),
            max_name_len: 15,
        }
    }
}

impl PlayersConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_name_len == 0 {
            return Err(ConfigError::Validation(
                "players.max_name_len must be > 0".into(),
            ));
        }
        Ok(())
    }

    /// Trimmed `raw`, or `fallback` when blank, cut to `max_name_len` chars.
    pub fn display_name(&self, raw: &str, fallback: &str) -> String {
        let name = match raw.trim() {
            "" => fallback.trim(),
            name => name,
        };
        name.chars().take(self.max_name_len).collect()
    }

    /// Names for both seats of a new game.
    pub fn resolve(&self, one: &str, two: &str, opponent: Opponent) -> (String, String) {
        let second_default = match opponent {
            Opponent::Human => &self.player_two,
            Opponent::Computer(_) => &self.computer,
        };
        (
            self.display_name(one, &self.player_one),
            self.display_name(two, second_default),
        )
    }
}

/// Results across the rounds of a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard {
    pub red_wins: u32,
    pub yellow_wins: u32,
    pub games_played: u32,
}

impl Scoreboard {
    pub fn record(&mut self, outcome: GameOutcome) {
        match outcome {
            GameOutcome::Winner(Player::Red) => self.red_wins += 1,
            GameOutcome::Winner(Player::Yellow) => self.yellow_wins += 1,
            GameOutcome::Draw => {}
        }
        self.games_played += 1;
    }

    pub fn wins(&self, player: Player) -> u32 {
        match player {
            Player::Red => self.red_wins,
            Player::Yellow => self.yellow_wins,
        }
    }

    pub fn draws(&self) -> u32 {
        self.games_played
            .saturating_sub(self.red_wins)
            .saturating_sub(self.yellow_wins)
    }

    /// Wins never outnumber games played.
    fn check(&self) -> Result<(), SnapshotError> {
        let wins = u64::from(self.red_wins) + u64::from(self.yellow_wins);
        if wins > u64::from(self.games_played) {
            return Err(SnapshotError::ScoreMismatch {
                wins,
                games_played: self.games_played,
            });
        }
        Ok(())
    }
}

/// Everything a caller needs to render or store a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub game: GameSnapshot,
    pub scores: Scoreboard,
    pub opponent: Opponent,
}

/// What happened during one human turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnReport {
    pub human: Move,
    pub computer: Option<Move>,
    pub outcome: Option<GameOutcome>,
}

pub struct GameSession {
    state: GameState,
    scores: Scoreboard,
    opponent: Opponent,
    tiers: TierSet,
    rng: StdRng,
}

impl GameSession {
    pub fn new(state: GameState, opponent: Opponent, tiers: TierSet, rng: StdRng) -> Self {
        GameSession {
            state,
            scores: Scoreboard::default(),
            opponent,
            tiers,
            rng,
        }
    }

    /// Fresh session with normalised names. Without a seed the random source
    /// is seeded from the OS.
    pub fn start(
        players: &PlayersConfig,
        ai: &AiConfig,
        names: (&str, &str),
        opponent: Opponent,
        seed: Option<u64>,
    ) -> Self {
        let (one, two) = players.resolve(names.0, names.1, opponent);
        info!("new session: {one} vs {two}, {}", opponent.label());

        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::new(GameState::new(one, two), opponent, TierSet::from_config(ai), rng)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn scores(&self) -> Scoreboard {
        self.scores
    }

    pub fn opponent(&self) -> Opponent {
        self.opponent
    }

    /// Is the computer due to move?
    pub fn is_computer_turn(&self) -> bool {
        self.opponent.difficulty().is_some()
            && self.state.current_player() == COMPUTER_SEAT
            && !self.state.is_terminal()
    }

    /// Play a human move and, when the computer holds the next seat, its reply.
    pub fn play_turn(&mut self, column: usize) -> Result<TurnReport, SessionError> {
        if self.state.is_terminal() {
            return Err(SessionError::GameOver);
        }
        if self.is_computer_turn() {
            return Err(SessionError::NotYourTurn);
        }

        let human = self.place(column)?;
        let computer = self.play_ai()?;

        Ok(TurnReport {
            human,
            computer,
            outcome: self.state.outcome(),
        })
    }

    /// Let the computer move if it is its turn; `None` otherwise.
    pub fn play_ai(&mut self) -> Result<Option<Move>, SessionError> {
        let Some(difficulty) = self.opponent.difficulty() else {
            return Ok(None);
        };
        if !self.is_computer_turn() {
            return Ok(None);
        }

        let decision = self.tiers.decide(&self.state, difficulty, &mut self.rng)?;
        self.place(decision.column).map(Some)
    }

    fn place(&mut self, column: usize) -> Result<Move, SessionError> {
        let player = self.state.current_player();
        let row = self.state.try_move(column)?;
        info!(
            "{} ({}) plays column {column}, row {row}",
            self.state.player_name(player),
            player.name()
        );
        self.state.check_win();

        Ok(Move {
            player,
            column,
            row,
        })
    }

    /// Start the next game with the same names, crediting the finished one.
    pub fn next_round(&mut self) {
        if let Some(outcome) = self.state.outcome() {
            self.scores.record(outcome);
        }
        info!(
            "round {} starts, score {}-{}",
            self.scores.games_played + 1,
            self.scores.red_wins,
            self.scores.yellow_wins
        );
        self.state = GameState::new(
            self.state.player_name(Player::Red),
            self.state.player_name(Player::Yellow),
        );
    }

    pub fn reset_scores(&mut self) {
        info!("scores reset");
        self.scores = Scoreboard::default();
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            game: self.state.snapshot(),
            scores: self.scores,
            opponent: self.opponent,
        }
    }

    /// Resume a session from a snapshot, validating its game by replay.
    pub fn restore(
        snapshot: &SessionSnapshot,
        tiers: TierSet,
        rng: StdRng,
    ) -> Result<Self, SnapshotError> {
        snapshot.scores.check()?;
        let state = GameState::from_snapshot(&snapshot.game)?;
        let mut session = Self::new(state, snapshot.opponent, tiers, rng);
        session.scores = snapshot.scores;
        Ok(session)
    }
}

/// Cloneable handle to one session. Every operation holds the session lock
/// for its whole duration.
#[derive(Clone)]
pub struct SharedSession {
    inner: Arc<Mutex<GameSession>>,
}

impl SharedSession {
    pub fn new(session: GameSession) -> Self {
        SharedSession {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    /// Run `f` with exclusive access to the session.
    pub fn with<T>(
        &self,
        f: impl FnOnce(&mut GameSession) -> Result<T, SessionError>,
    ) -> Result<T, SessionError> {
        let mut session = self.inner.lock().map_err(|_| SessionError::Poisoned)?;
        f(&mut session)
    }

    pub fn play_turn(&self, column: usize) -> Result<TurnReport, SessionError> {
        self.with(|session| session.play_turn(column))
    }

    pub fn play_ai(&self) -> Result<Option<Move>, SessionError> {
        self.with(|session| session.play_ai())
    }

    pub fn next_round(&self) -> Result<(), SessionError> {
        self.with(|session| {
            session.next_round();
            Ok(())
        })
    }

    pub fn reset_scores(&self) -> Result<(), SessionError> {
        self.with(|session| {
            session.reset_scores();
            Ok(())
        })
    }

    pub fn snapshot(&self) -> Result<SessionSnapshot, SessionError> {
        self.with(|session| Ok(session.snapshot()))
    }
}

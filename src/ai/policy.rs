//! Difficulty tiers for the computer opponent.
//!
//! A tier is an ordered list of [`Rule`]s. Each rule names a [`Tactic`] and
//! the chance that the tier even looks for it; the first rule that yields a
//! column decides the move. Probabilities are plain data taken from
//! [`AiConfig`], so tier behaviour can be tuned and measured without touching
//! control flow.

use std::fmt;
use std::str::FromStr;

use log::{debug, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::eval::PositionEvaluator;
use super::threat::ThreatAnalyzer;
use crate::error::{AiError, ConfigError, ParseDifficultyError};
use crate::game::{Board, GameState, Player, COLS};

/// Column ordering: centre first, then alternating outwards.
pub const CENTER_OUT: [usize; COLS] = [3, 2, 4, 1, 5, 0, 6];

const CENTER_COLUMN: usize = CENTER_OUT[0];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// Parse a difficulty name, falling back to medium for anything unknown.
    pub fn parse_or_default(name: &str) -> Difficulty {
        name.parse().unwrap_or_else(|err: ParseDifficultyError| {
            warn!("{err}, using {}", Difficulty::default());
            Difficulty::default()
        })
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(ParseDifficultyError(s.to_string())),
        }
    }
}

/// Something a tier can try in order to pick a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tactic {
    /// Complete our own four in a row.
    Win,
    /// Occupy the opponent's winning cell.
    Block,
    /// Create two open threes at once.
    Fork,
    /// Take the cell where the opponent would fork.
    BlockFork,
    /// Put a token next to one of our own.
    Alignment,
    /// Best [`PositionEvaluator`] score.
    BestScore,
    /// A fixed column, when it is open.
    Column(usize),
    /// Walk [`CENTER_OUT`], rolling the rule's chance once per open column.
    CenterOut,
    /// Uniformly random open column.
    AnyColumn,
    /// Defer to another tier's rules.
    Fallback(Difficulty),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rule {
    pub tactic: Tactic,
    /// Probability in [0, 1] of trying the tactic. Only chances strictly
    /// between 0 and 1 consume a random draw.
    pub chance: f64,
}

impl Rule {
    pub fn always(tactic: Tactic) -> Self {
        Rule {
            tactic,
            chance: 1.0,
        }
    }

    pub fn sometimes(tactic: Tactic, chance: f64) -> Self {
        let chance = if chance.is_nan() {
            0.0
        } else {
            chance.clamp(0.0, 1.0)
        };
        Rule { tactic, chance }
    }
}

/// The column a tier picked and the tactic that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub column: usize,
    pub tactic: Tactic,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EasyConfig {
    /// Chance of blocking an immediate opponent win.
    pub block: f64,
}

impl Default for EasyConfig {
    fn default() -> Self {
        EasyConfig { block: 0.10 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MediumConfig {
    pub win: f64,
    pub block: f64,
    /// Chance of playing the centre column outright.
    pub center: f64,
    /// Per-column chance while walking outwards from the centre.
    pub center_out: f64,
}

impl Default for MediumConfig {
    fn default() -> Self {
        MediumConfig {
            win: 0.30,
            block: 0.70,
            center: 0.40,
            center_out: 0.60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HardConfig {
    pub fork: f64,
    pub block_fork: f64,
}

impl Default for HardConfig {
    fn default() -> Self {
        HardConfig {
            fork: 0.70,
            block_fork: 0.80,
        }
    }
}

/// Computer opponent settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub difficulty: Difficulty,
    pub easy: EasyConfig,
    pub medium: MediumConfig,
    pub hard: HardConfig,
}

impl AiConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let chances = [
            ("ai.easy.block", self.easy.block),
            ("ai.medium.win", self.medium.win),
            ("ai.medium.block", self.medium.block),
            ("ai.medium.center", self.medium.center),
            ("ai.medium.center_out", self.medium.center_out),
            ("ai.hard.fork", self.hard.fork),
            ("ai.hard.block_fork", self.hard.block_fork),
        ];
        for (key, chance) in chances {
            if !(0.0..=1.0).contains(&chance) {
                return Err(ConfigError::Validation(format!(
                    "{key} must be in [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

/// Rule lists for all three tiers.
#[derive(Debug, Clone, PartialEq)]
pub struct TierSet {
    easy: Vec<Rule>,
    medium: Vec<Rule>,
    hard: Vec<Rule>,
}

impl TierSet {
    pub fn from_config(config: &AiConfig) -> Self {
        let easy = vec![
            Rule::sometimes(Tactic::Block, config.easy.block),
            Rule::always(Tactic::AnyColumn),
        ];

        let medium = vec![
            Rule::sometimes(Tactic::Win, config.medium.win),
            Rule::sometimes(Tactic::Block, config.medium.block),
            Rule::sometimes(Tactic::Column(CENTER_COLUMN), config.medium.center),
            Rule::sometimes(Tactic::CenterOut, config.medium.center_out),
            Rule::always(Tactic::Fallback(Difficulty::Easy)),
        ];

        let hard = vec![
            Rule::always(Tactic::Win),
            Rule::always(Tactic::Block),
            Rule::sometimes(Tactic::Fork, config.hard.fork),
            Rule::sometimes(Tactic::BlockFork, config.hard.block_fork),
            Rule::always(Tactic::Alignment),
            Rule::always(Tactic::BestScore),
            Rule::always(Tactic::Fallback(Difficulty::Medium)),
        ];

        TierSet { easy, medium, hard }
    }

    pub fn rules(&self, difficulty: Difficulty) -> &[Rule] {
        match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Medium => &self.medium,
            Difficulty::Hard => &self.hard,
        }
    }

    /// Pick a column for the player to move.
    pub fn select<R: Rng + ?Sized>(
        &self,
        state: &GameState,
        difficulty: Difficulty,
        rng: &mut R,
    ) -> Result<usize, AiError> {
        self.decide(state, difficulty, rng)
            .map(|decision| decision.column)
    }

    /// Pick a column for the player to move, reporting which tactic fired.
    pub fn decide<R: Rng + ?Sized>(
        &self,
        state: &GameState,
        difficulty: Difficulty,
        rng: &mut R,
    ) -> Result<Decision, AiError> {
        let decision = self.decide_on(state.board(), state.current_player(), difficulty, rng)?;
        debug!(
            "{} ({difficulty}) picks column {} via {:?}",
            state.current_player().name(),
            decision.column,
            decision.tactic
        );
        Ok(decision)
    }

    /// Pick a column for `me` on an arbitrary board. The board itself is never
    /// touched; probes run on a scratch copy.
    pub fn decide_on<R: Rng + ?Sized>(
        &self,
        board: &Board,
        me: Player,
        difficulty: Difficulty,
        rng: &mut R,
    ) -> Result<Decision, AiError> {
        if board.is_full() {
            return Err(AiError::NoLegalMove);
        }

        let mut scratch = *board;
        self.run_tier(&mut scratch, me, difficulty, rng)
            .ok_or(AiError::NoLegalMove)
    }

    fn run_tier<R: Rng + ?Sized>(
        &self,
        board: &mut Board,
        me: Player,
        difficulty: Difficulty,
        rng: &mut R,
    ) -> Option<Decision> {
        self.rules(difficulty)
            .iter()
            .find_map(|rule| self.apply(rule, board, me, rng))
    }

    fn apply<R: Rng + ?Sized>(
        &self,
        rule: &Rule,
        board: &mut Board,
        me: Player,
        rng: &mut R,
    ) -> Option<Decision> {
        let column = match rule.tactic {
            Tactic::Fallback(tier) => return self.run_tier(board, me, tier, rng),
            Tactic::Column(col) => {
                (!board.is_column_full(col) && roll(rng, rule.chance)).then_some(col)
            }
            Tactic::CenterOut => CENTER_OUT
                .into_iter()
                .find(|&col| !board.is_column_full(col) && roll(rng, rule.chance)),
            tactic => {
                if !roll(rng, rule.chance) {
                    return None;
                }
                resolve(tactic, board, me, rng)
            }
        };

        column.map(|column| Decision {
            column,
            tactic: rule.tactic,
        })
    }
}

impl Default for TierSet {
    fn default() -> Self {
        Self::from_config(&AiConfig::default())
    }
}

fn roll<R: Rng + ?Sized>(rng: &mut R, chance: f64) -> bool {
    chance >= 1.0 || (chance > 0.0 && rng.random_bool(chance))
}

fn resolve<R: Rng + ?Sized>(
    tactic: Tactic,
    board: &mut Board,
    me: Player,
    rng: &mut R,
) -> Option<usize> {
    match tactic {
        Tactic::Win => ThreatAnalyzer::new(board).find_winning_move(me),
        Tactic::Block => ThreatAnalyzer::new(board).find_winning_move(me.other()),
        Tactic::Fork => ThreatAnalyzer::new(board).find_fork_move(me),
        Tactic::BlockFork => ThreatAnalyzer::new(board).find_fork_move(me.other()),
        Tactic::Alignment => ThreatAnalyzer::new(board).find_alignment_move(me),
        Tactic::BestScore => PositionEvaluator::new(board).evaluate_best_move(me),
        Tactic::AnyColumn => {
            let open = board.open_columns();
            if open.is_empty() {
                None
            } else {
                Some(open[rng.random_range(0..open.len())])
            }
        }
        Tactic::Column(col) => (!board.is_column_full(col)).then_some(col),
        Tactic::CenterOut => CENTER_OUT
            .into_iter()
            .find(|&col| !board.is_column_full(col)),
        Tactic::Fallback(_) => None,
    }
}

/// Pick a column for the player to move using the default tier constants.
pub fn select_ai_move<R: Rng + ?Sized>(
    state: &GameState,
    difficulty: Difficulty,
    rng: &mut R,
) -> Result<usize, AiError> {
    TierSet::default().select(state, difficulty, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Cell, ROWS};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn play(cols: &[usize]) -> GameState {
        let mut state = GameState::initial();
        for &col in cols {
            state.try_move(col).unwrap();
            assert_eq!(state.check_win(), None);
        }
        state
    }

    fn full_board() -> Board {
        let mut board = Board::new();
        for col in 0..COLS {
            for row in 0..ROWS {
                let cell = if (row + col / 2) % 2 == 0 { Cell::Red } else { Cell::Yellow };
                board.drop_piece(col, cell).unwrap();
            }
        }
        board
    }

    #[test]
    fn test_difficulty_parse() {
        assert_eq!("easy".parse::<Difficulty>(), Ok(Difficulty::Easy));
        assert_eq!(" Medium ".parse::<Difficulty>(), Ok(Difficulty::Medium));
        assert_eq!("HARD".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert!("expert".parse::<Difficulty>().is_err());
        assert_eq!(Difficulty::parse_or_default("expert"), Difficulty::Medium);
        assert_eq!(Difficulty::parse_or_default("easy"), Difficulty::Easy);
        assert_eq!(Difficulty::Hard.to_string(), "hard");
    }

    #[test]
    fn test_default_config_is_valid() {
        AiConfig::default().validate().unwrap();
    }

    #[test]
    fn test_validation_rejects_out_of_range_chance() {
        let mut config = AiConfig::default();
        config.medium.center_out = 1.2;
        assert!(config.validate().is_err());

        let mut config = AiConfig::default();
        config.hard.fork = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rule_clamps_chance() {
        assert_eq!(Rule::sometimes(Tactic::Win, 3.0).chance, 1.0);
        assert_eq!(Rule::sometimes(Tactic::Win, -1.0).chance, 0.0);
        assert_eq!(Rule::sometimes(Tactic::Win, f64::NAN).chance, 0.0);
    }

    #[test]
    fn test_tiers_follow_stated_order() {
        let tiers = TierSet::default();
        let hard: Vec<Tactic> = tiers.rules(Difficulty::Hard).iter().map(|r| r.tactic).collect();
        assert_eq!(
            hard,
            vec![
                Tactic::Win,
                Tactic::Block,
                Tactic::Fork,
                Tactic::BlockFork,
                Tactic::Alignment,
                Tactic::BestScore,
                Tactic::Fallback(Difficulty::Medium),
            ]
        );
        let medium = tiers.rules(Difficulty::Medium);
        assert_eq!(medium[2], Rule::sometimes(Tactic::Column(3), 0.40));
        assert_eq!(medium[4].tactic, Tactic::Fallback(Difficulty::Easy));
    }

    #[test]
    fn test_full_board_is_rejected() {
        let board = full_board();
        let mut rng = StdRng::seed_from_u64(0);
        let tiers = TierSet::default();
        for difficulty in Difficulty::ALL {
            assert_eq!(
                tiers.decide_on(&board, Player::Red, difficulty, &mut rng),
                Err(AiError::NoLegalMove)
            );
        }
    }

    #[test]
    fn test_every_tier_plays_legal_columns() {
        let mut rng = StdRng::seed_from_u64(99);
        for difficulty in Difficulty::ALL {
            for _ in 0..20 {
                let mut state = GameState::initial();
                while !state.is_terminal() {
                    let before = state.clone();
                    let col = select_ai_move(&state, difficulty, &mut rng).unwrap();
                    assert_eq!(state, before);
                    assert!(!state.board().is_column_full(col));
                    state.try_move(col).unwrap();
                    state.check_win();
                }
            }
        }
    }

    #[test]
    fn test_same_seed_same_moves() {
        let state = play(&[3, 3, 2]);
        for difficulty in Difficulty::ALL {
            let mut a = StdRng::seed_from_u64(5);
            let mut b = StdRng::seed_from_u64(5);
            for _ in 0..50 {
                assert_eq!(
                    select_ai_move(&state, difficulty, &mut a),
                    select_ai_move(&state, difficulty, &mut b)
                );
            }
        }
    }

    #[test]
    fn test_hard_takes_win_before_block() {
        // Red threatens column 3 on the bottom row, Yellow can win in column 6
        let state = play(&[0, 6, 1, 6, 2, 6, 5]);
        assert_eq!(state.current_player(), Player::Yellow);
        let mut rng = StdRng::seed_from_u64(1);
        let decision = TierSet::default()
            .decide(&state, Difficulty::Hard, &mut rng)
            .unwrap();
        assert_eq!(
            decision,
            Decision {
                column: 6,
                tactic: Tactic::Win
            }
        );
    }

    #[test]
    fn test_hard_always_blocks() {
        let state = play(&[0, 6, 1, 6, 2]);
        assert_eq!(state.current_player(), Player::Yellow);
        let tiers = TierSet::default();
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..100 {
            let decision = tiers.decide(&state, Difficulty::Hard, &mut rng).unwrap();
            assert_eq!(
                decision,
                Decision {
                    column: 3,
                    tactic: Tactic::Block
                }
            );
        }
    }

    /// Yellow forks in column 2; Red has no fork of its own.
    fn fork_board() -> Board {
        let mut board = Board::new();
        for (col, cell) in [
            (3, Cell::Yellow),
            (3, Cell::Yellow),
            (4, Cell::Yellow),
            (4, Cell::Red),
            (4, Cell::Yellow),
            (6, Cell::Red),
            (6, Cell::Red),
        ] {
            board.drop_piece(col, cell).unwrap();
        }
        board
    }

    #[test]
    fn test_hard_forks_when_rolled() {
        let board = fork_board();
        let before = board;

        let config = AiConfig {
            hard: HardConfig {
                fork: 1.0,
                block_fork: 1.0,
            },
            ..AiConfig::default()
        };
        let tiers = TierSet::from_config(&config);
        let mut rng = StdRng::seed_from_u64(3);
        let decision = tiers
            .decide_on(&board, Player::Yellow, Difficulty::Hard, &mut rng)
            .unwrap();
        assert_eq!(
            decision,
            Decision {
                column: 2,
                tactic: Tactic::Fork
            }
        );

        // Red to move: it cannot fork itself, so it takes Yellow's fork cell
        let decision = tiers
            .decide_on(&board, Player::Red, Difficulty::Hard, &mut rng)
            .unwrap();
        assert_eq!(
            decision,
            Decision {
                column: 2,
                tactic: Tactic::BlockFork
            }
        );
        assert_eq!(board, before);
    }

    #[test]
    fn test_hard_alignment_then_best_score() {
        let mut rng = StdRng::seed_from_u64(4);
        let tiers = TierSet::default();

        let empty = GameState::initial();
        let decision = tiers.decide(&empty, Difficulty::Hard, &mut rng).unwrap();
        assert_eq!(
            decision,
            Decision {
                column: 3,
                tactic: Tactic::BestScore
            }
        );

        let state = play(&[3, 0, 3]);
        assert_eq!(state.current_player(), Player::Yellow);
        let decision = tiers.decide(&state, Difficulty::Hard, &mut rng).unwrap();
        assert_eq!(
            decision,
            Decision {
                column: 0,
                tactic: Tactic::Alignment
            }
        );
    }

    #[test]
    fn test_medium_center_rule_is_data_driven() {
        let config = AiConfig {
            medium: MediumConfig {
                win: 0.0,
                block: 0.0,
                center: 1.0,
                center_out: 1.0,
            },
            ..AiConfig::default()
        };
        let tiers = TierSet::from_config(&config);
        let mut rng = StdRng::seed_from_u64(6);

        let decision = tiers
            .decide(&GameState::initial(), Difficulty::Medium, &mut rng)
            .unwrap();
        assert_eq!(
            decision,
            Decision {
                column: 3,
                tactic: Tactic::Column(3)
            }
        );

        // centre column full: walk outwards and stop at column 2
        let state = play(&[3, 3, 3, 3, 3, 3]);
        let decision = tiers.decide(&state, Difficulty::Medium, &mut rng).unwrap();
        assert_eq!(
            decision,
            Decision {
                column: 2,
                tactic: Tactic::CenterOut
            }
        );
    }

    #[test]
    fn test_medium_falls_back_to_easy() {
        let config = AiConfig {
            medium: MediumConfig {
                win: 0.0,
                block: 0.0,
                center: 0.0,
                center_out: 0.0,
            },
            easy: EasyConfig { block: 0.0 },
            ..AiConfig::default()
        };
        let tiers = TierSet::from_config(&config);
        let mut rng = StdRng::seed_from_u64(8);
        for _ in 0..50 {
            let decision = tiers
                .decide(&GameState::initial(), Difficulty::Medium, &mut rng)
                .unwrap();
            assert_eq!(decision.tactic, Tactic::AnyColumn);
        }
    }

    #[test]
    fn test_easy_block_rate_is_about_ten_percent() {
        // Red threatens column 3 on the bottom row; it is Yellow's move
        let state = play(&[0, 6, 1, 6, 2]);
        let tiers = TierSet::default();
        let mut rng = StdRng::seed_from_u64(2024);

        let trials = 1000;
        let mut rule_blocks = 0;
        let mut column_blocks = 0;
        for _ in 0..trials {
            let decision = tiers.decide(&state, Difficulty::Easy, &mut rng).unwrap();
            if decision.tactic == Tactic::Block {
                rule_blocks += 1;
            }
            if decision.column == 3 {
                column_blocks += 1;
            }
        }

        let rule_rate = rule_blocks as f64 / trials as f64;
        assert!(
            (0.06..=0.14).contains(&rule_rate),
            "block rule fired in {rule_rate:.3} of trials"
        );

        // random picks land on the block column one time in seven
        let column_rate = column_blocks as f64 / trials as f64;
        let expected = 0.10 + 0.90 / 7.0;
        assert!(
            (column_rate - expected).abs() < 0.06,
            "column 3 chosen in {column_rate:.3} of trials"
        );
    }

    #[test]
    fn test_hard_fork_gates_fire_at_configured_rates() {
        let board = fork_board();
        let tiers = TierSet::default();
        let mut rng = StdRng::seed_from_u64(77);
        let trials = 1000;

        let rate = |me: Player, tactic: Tactic, rng: &mut StdRng| {
            let hits = (0..trials)
                .filter(|_| {
                    tiers
                        .decide_on(&board, me, Difficulty::Hard, rng)
                        .unwrap()
                        .tactic
                        == tactic
                })
                .count();
            hits as f64 / trials as f64
        };

        // Yellow's own fork behind the 70% gate
        let fork_rate = rate(Player::Yellow, Tactic::Fork, &mut rng);
        assert!(
            (fork_rate - 0.70).abs() < 0.05,
            "fork taken in {fork_rate:.3} of trials"
        );

        // Red has no fork, so only the 80% block-fork gate decides
        let block_rate = rate(Player::Red, Tactic::BlockFork, &mut rng);
        assert!(
            (block_rate - 0.80).abs() < 0.05,
            "fork blocked in {block_rate:.3} of trials"
        );
    }
}

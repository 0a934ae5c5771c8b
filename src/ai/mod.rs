//! Computer opponent: single-ply threat analysis, a positional heuristic and
//! three difficulty tiers built from them.

mod eval;
mod policy;
mod threat;

pub use eval::PositionEvaluator;
pub use policy::{
    select_ai_move, AiConfig, Decision, Difficulty, EasyConfig, HardConfig, MediumConfig, Rule,
    Tactic, TierSet, CENTER_OUT,
};
pub use threat::{is_open_three, open_threes, ThreatAnalyzer};

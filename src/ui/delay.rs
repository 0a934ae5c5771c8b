use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::ai::Difficulty;
use crate::error::ConfigError;

/// Inclusive range of milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayRange {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl DelayRange {
    pub const fn new(min_ms: u64, max_ms: u64) -> Self {
        DelayRange { min_ms, max_ms }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        let ms = if self.min_ms >= self.max_ms {
            self.min_ms
        } else {
            rng.random_range(self.min_ms..=self.max_ms)
        };
        Duration::from_millis(ms)
    }
}

/// How long the computer appears to think before its token shows, per tier.
/// Purely cosmetic: the move itself is already decided and applied.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub easy: DelayRange,
    pub medium: DelayRange,
    pub hard: DelayRange,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            easy: DelayRange::new(400, 600),
            medium: DelayRange::new(700, 1100),
            hard: DelayRange::new(1000, 1500),
        }
    }
}

impl UiConfig {
    pub fn range(&self, difficulty: Difficulty) -> DelayRange {
        match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Medium => self.medium,
            Difficulty::Hard => self.hard,
        }
    }

    pub fn thinking_delay<R: Rng + ?Sized>(&self, difficulty: Difficulty, rng: &mut R) -> Duration {
        self.range(difficulty).sample(rng)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for difficulty in Difficulty::ALL {
            let range = self.range(difficulty);
            if range.min_ms > range.max_ms {
                return Err(ConfigError::Validation(format!(
                    "ui.{difficulty}.min_ms must be <= ui.{difficulty}.max_ms"
                )));
            }
        }
        Ok(())
    }
}

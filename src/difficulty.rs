use std::time::Duration;

use serde::{Deserialize, Serialize};

/// More decoys than this would bury the target and cost a mesh each per respawn.
pub const MAX_DECOYS: usize = 64;

/// The three tunings the game ships with, in menu order.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

/// Tuning for one difficulty. Sizes are in world units, which match logical
/// pixels under the default 2D camera.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DifficultyConfig {
    pub round_seconds: u32,
    /// Diameter of the target at rest (pulse scale 1.0).
    pub circle_size: f32,
    pub decoys: usize,
    /// Seconds between automatic respawns.
    pub spawn_interval: f32,
    pub points: u32,
}

impl DifficultyConfig {
    pub fn builtin(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => DifficultyConfig {
                round_seconds: 60,
                circle_size: 110.0,
                decoys: 3,
                spawn_interval: 1.8,
                points: 10,
            },
            Difficulty::Medium => DifficultyConfig {
                round_seconds: 45,
                circle_size: 90.0,
                decoys: 6,
                spawn_interval: 1.2,
                points: 20,
            },
            Difficulty::Hard => DifficultyConfig {
                round_seconds: 30,
                circle_size: 70.0,
                decoys: 9,
                spawn_interval: 0.8,
                points: 30,
            },
        }
    }

    /// Taps closer than this to the target centre count as hits.
    /// Larger than the drawn radius.
    pub fn hit_radius(&self) -> f32 {
        self.circle_size * 0.75
    }

    pub fn target_radius(&self, pulse_scale: f32) -> f32 {
        self.circle_size * pulse_scale / 2.0
    }

    pub fn decoy_radius(&self) -> f32 {
        self.circle_size * 0.6
    }

    /// Rounded to whole milliseconds so 0.8 means exactly 800ms.
    pub fn spawn_period(&self) -> Duration {
        Duration::from_millis((self.spawn_interval * 1000.0).round() as u64)
    }

    pub fn validate(&self) -> Result<(), InvalidConfig> {
        if self.round_seconds == 0 {
            return Err(InvalidConfig::ZeroRoundLength);
        }
        if !self.circle_size.is_finite() || self.circle_size <= 0.0 {
            return Err(InvalidConfig::CircleSize(self.circle_size));
        }
        if !self.spawn_interval.is_finite() || self.spawn_interval <= 0.0 || self.spawn_period().is_zero() {
            return Err(InvalidConfig::SpawnInterval(self.spawn_interval));
        }
        if self.decoys > MAX_DECOYS {
            return Err(InvalidConfig::TooManyDecoys(self.decoys));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidConfig {
    #[error("round_seconds must be at least 1")]
    ZeroRoundLength,
    #[error("circle_size must be a positive number, got {0}")]
    CircleSize(f32),
    #[error("spawn_interval must be at least 0.001 seconds, got {0}")]
    SpawnInterval(f32),
    #[error("decoys must be at most {MAX_DECOYS}, got {0}")]
    TooManyDecoys(usize),
}

/// One config per difficulty. Missing rows in a settings file get the builtin row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyTable {
    pub easy: DifficultyConfig,
    pub medium: DifficultyConfig,
    pub hard: DifficultyConfig,
}

impl Default for DifficultyTable {
    fn default() -> Self {
        Self {
            easy: DifficultyConfig::builtin(Difficulty::Easy),
            medium: DifficultyConfig::builtin(Difficulty::Medium),
            hard: DifficultyConfig::builtin(Difficulty::Hard),
        }
    }
}

impl DifficultyTable {
    pub fn get(&self, difficulty: Difficulty) -> &DifficultyConfig {
        match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Medium => &self.medium,
            Difficulty::Hard => &self.hard,
        }
    }

    fn get_mut(&mut self, difficulty: Difficulty) -> &mut DifficultyConfig {
        match difficulty {
            Difficulty::Easy => &mut self.easy,
            Difficulty::Medium => &mut self.medium,
            Difficulty::Hard => &mut self.hard,
        }
    }

    /// Replaces every row that fails validation with its builtin row.
    /// Returns the difficulties that were replaced along with the reason.
    pub fn sanitize(&mut self) -> Vec<(Difficulty, InvalidConfig)> {
        let mut replaced = Vec::new();
        for difficulty in Difficulty::ALL {
            let row = self.get_mut(difficulty);
            if let Err(reason) = row.validate() {
                *row = DifficultyConfig::builtin(difficulty);
                replaced.push((difficulty, reason));
            }
        }
        replaced
    }
}

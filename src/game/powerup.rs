use rand::Rng;
use serde::{Deserialize, Serialize};

use super::config::GameConfig;

/// Variant carried by special food
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUp {
    SpeedBoost,
    DoublePoints,
    SuperGrowth,
}

/// What collecting a power-up does to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Switch to the boosted tick interval, restarting the boost timer
    SpeedUp,
    /// Award points in place of the ordinary food reward
    Score(u32),
    /// Append extra segments on top of the tick's no-shrink growth
    Grow(usize),
}

impl PowerUp {
    pub const ALL: [PowerUp; 3] = [
        PowerUp::SpeedBoost,
        PowerUp::DoublePoints,
        PowerUp::SuperGrowth,
    ];

    /// Pick a variant uniformly at random
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> PowerUp {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    pub fn effect(self, config: &GameConfig) -> Effect {
        match self {
            PowerUp::SpeedBoost => Effect::SpeedUp,
            PowerUp::DoublePoints => Effect::Score(config.double_points),
            PowerUp::SuperGrowth => Effect::Grow(config.super_growth_extra),
        }
    }

    /// Banner text shown when the power-up is collected
    pub fn message(self) -> &'static str {
        match self {
            PowerUp::SpeedBoost => "Speed Boost!",
            PowerUp::DoublePoints => "Double Points!",
            PowerUp::SuperGrowth => "Super Growth! +3",
        }
    }

    /// Short glyph drawn on the special food cell
    pub fn icon(self) -> &'static str {
        match self {
            PowerUp::SpeedBoost => "⚡",
            PowerUp::DoublePoints => "×2",
            PowerUp::SuperGrowth => "+3",
        }
    }
}

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use super::grid::Grid;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the play field, in the same units as `cell_pitch`
    pub field_width: u32,
    /// Height of the play field
    pub field_height: u32,
    /// Size of one grid cell
    pub cell_pitch: u32,

    /// Period of the tick source when no speed boost is active
    pub tick_interval_ms: u64,

    /// Points for ordinary food
    pub food_points: u32,
    /// Points for the DoublePoints power-up
    pub double_points: u32,

    /// Chance that special food appears alongside a fresh ordinary food
    pub special_food_chance: f64,
    /// How long uncollected special food stays on the field
    pub special_food_lifetime_ms: u64,

    /// Multiplier applied to the tick interval while boosted
    pub speed_boost_factor: f64,
    pub speed_boost_duration_ms: u64,
    /// Segments added by SuperGrowth on top of the normal no-shrink growth
    pub super_growth_extra: usize,

    /// Emit the move cue every this many ticks (0 disables it)
    pub move_cue_every: u64,

    /// Seed for food placement; entropy when unset
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            field_width: 560,
            field_height: 560,
            cell_pitch: 20,
            tick_interval_ms: 100,
            food_points: 10,
            double_points: 20,
            special_food_chance: 0.2,
            special_food_lifetime_ms: 10_000,
            speed_boost_factor: 0.7,
            speed_boost_duration_ms: 5_000,
            super_growth_extra: 2,
            move_cue_every: 5,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with a custom play-field size
    pub fn new(field_width: u32, field_height: u32) -> Self {
        Self {
            field_width,
            field_height,
            ..Default::default()
        }
    }

    /// Create a small seeded field for testing
    pub fn small() -> Self {
        Self {
            seed: Some(7),
            ..Self::new(200, 200)
        }
    }

    /// Load a configuration from a JSON file. Missing keys take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config: GameConfig =
            serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cell_pitch == 0 {
            return Err(ConfigError::Invalid("cell_pitch must be positive".into()));
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "tick_interval_ms must be positive".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.special_food_chance) {
            return Err(ConfigError::Invalid(format!(
                "special_food_chance must be within 0..=1, got {}",
                self.special_food_chance
            )));
        }
        if !(self.speed_boost_factor > 0.0 && self.speed_boost_factor.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "speed_boost_factor must be positive, got {}",
                self.speed_boost_factor
            )));
        }
        Ok(())
    }

    /// Grid derived from the configured play field
    pub fn grid(&self) -> Grid {
        Grid::from_field(self.field_width, self.field_height, self.cell_pitch)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Tick interval while a speed boost is active, never below one millisecond
    pub fn boosted_tick_interval(&self) -> Duration {
        let boosted = (self.tick_interval_ms as f64 * self.speed_boost_factor).round() as u64;
        Duration::from_millis(boosted.max(1))
    }

    pub fn special_food_lifetime(&self) -> Duration {
        Duration::from_millis(self.special_food_lifetime_ms)
    }

    pub fn speed_boost_duration(&self) -> Duration {
        Duration::from_millis(self.speed_boost_duration_ms)
    }
}

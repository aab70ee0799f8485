//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! Time is passed in explicitly, so every rule can be driven from tests.

pub mod collision;
pub mod config;
pub mod cue;
pub mod direction;
pub mod food;
pub mod grid;
pub mod powerup;
pub mod session;
pub mod snake;
pub mod snapshot;
pub mod timer;

// Re-export commonly used types
pub use collision::CollisionType;
pub use config::{ConfigError, GameConfig};
pub use cue::Cue;
pub use direction::Direction;
pub use food::{FoodPlacer, SpecialFood};
pub use grid::{Cell, Grid};
pub use powerup::{Effect, PowerUp};
pub use session::{
    Phase, Session, StepInfo, StepResult, TimerEvent, TimerKind, TimerToken,
};
pub use snake::Snake;
pub use snapshot::{SessionSnapshot, SpecialFoodView};
pub use timer::{Timer, TimerId};

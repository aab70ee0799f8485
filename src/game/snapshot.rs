use std::time::Duration;

use super::direction::Direction;
use super::grid::{Cell, Grid};
use super::powerup::PowerUp;
use super::session::Phase;

/// Special food as seen by the renderer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpecialFoodView {
    pub cell: Cell,
    pub kind: PowerUp,
    pub remaining: Duration,
    /// Share of the lifetime still left, 1.0 when freshly spawned
    pub remaining_fraction: f32,
}

/// Read-only copy of everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub phase: Phase,
    pub grid: Grid,
    /// Head first
    pub snake: Vec<Cell>,
    pub direction: Direction,
    pub food: Option<Cell>,
    pub special_food: Option<SpecialFoodView>,
    pub score: u32,
    pub best_score: u32,
    pub ticks: u64,
    pub speed_boost_remaining: Option<Duration>,
}

impl SessionSnapshot {
    pub fn head(&self) -> Option<Cell> {
        self.snake.first().copied()
    }
}

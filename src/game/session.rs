use std::time::{Duration, Instant};

use super::collision::{CollisionType, detect_collision};
use super::config::GameConfig;
use super::cue::Cue;
use super::direction::Direction;
use super::food::{FoodPlacer, SpecialFood};
use super::grid::{Cell, Grid};
use super::powerup::{Effect, PowerUp};
use super::snake::Snake;
use super::snapshot::{SessionSnapshot, SpecialFoodView};
use super::timer::{Timer, TimerId};

/// Starting body, head first, facing right
const START_SEGMENTS: [Cell; 3] = [Cell::new(5, 5), Cell::new(4, 5), Cell::new(3, 5)];
const START_DIRECTION: Direction = Direction::Right;

/// Top-level lifecycle state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Start,
    Playing,
    Paused,
    GameOver,
}

/// Which of the session's timers a token refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    SpecialFoodExpiry,
    SpeedBoostRevert,
}

/// Handle to the next pending timer, as handed to the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerToken {
    pub kind: TimerKind,
    pub id: TimerId,
    pub deadline: Instant,
}

/// A timer that fired
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    SpecialFoodExpired(SpecialFood),
    SpeedBoostEnded,
}

/// Information about a step
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StepInfo {
    /// Whether the snake ate ordinary food this step
    pub ate_food: bool,
    /// Power-up collected this step
    pub power_up: Option<PowerUp>,
    /// Type of collision if one occurred
    pub collision_type: Option<CollisionType>,
    /// Cues to hand to the audio player, in order
    pub cues: Vec<Cue>,
}

/// Result of one tick that actually advanced the game
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Whether the game has terminated
    pub terminated: bool,
    /// Set when this step ended the game with a new best score
    pub new_best_score: Option<u32>,
    /// Additional information about the step
    pub info: StepInfo,
}

/// One game of Snake: state machine, rules and timers.
///
/// The session never reads a clock. Every operation that depends on time
/// takes `now`, and the driver is expected to call [`Session::tick`] every
/// [`Session::tick_interval`] and [`Session::fire_timer`] when the deadline
/// from [`Session::next_timer`] is reached. Whenever [`Session::tick_epoch`]
/// changes the driver must drop its tick source and install a new one.
pub struct Session {
    config: GameConfig,
    grid: Grid,
    placer: FoodPlacer,
    phase: Phase,
    snake: Snake,
    direction: Direction,
    staged_direction: Direction,
    food: Option<Cell>,
    special_food: Timer<SpecialFood>,
    speed_boost: Timer<()>,
    score: u32,
    best_score: u32,
    ticks: u64,
    tick_epoch: u64,
}

impl Session {
    /// Create a session waiting in [`Phase::Start`]
    pub fn new(config: GameConfig, best_score: u32) -> Self {
        let grid = config.grid();
        let placer = FoodPlacer::new(config.seed);

        Self {
            config,
            grid,
            placer,
            phase: Phase::Start,
            snake: starting_snake(),
            direction: START_DIRECTION,
            staged_direction: START_DIRECTION,
            food: None,
            special_food: Timer::new(),
            speed_boost: Timer::new(),
            score: 0,
            best_score,
            ticks: 0,
            tick_epoch: 0,
        }
    }

    /// Leave the start screen and begin playing. Ignored in any other phase.
    pub fn start(&mut self, now: Instant) -> bool {
        if self.phase != Phase::Start {
            return false;
        }
        self.reset(now);
        true
    }

    /// Begin a fresh game after a game over. Ignored in any other phase.
    pub fn restart(&mut self, now: Instant) -> bool {
        if self.phase != Phase::GameOver {
            return false;
        }
        self.reset(now);
        true
    }

    fn reset(&mut self, now: Instant) {
        // Nothing from the previous game may outlive it
        self.special_food.cancel();
        self.speed_boost.cancel();

        self.snake = starting_snake();
        self.direction = START_DIRECTION;
        self.staged_direction = START_DIRECTION;
        self.score = 0;
        self.ticks = 0;
        self.food = None;
        self.place_food(now);

        self.phase = Phase::Playing;
        self.tick_epoch += 1;

        tracing::info!(
            columns = self.grid.columns(),
            rows = self.grid.rows(),
            food = ?self.food,
            "game started"
        );
    }

    pub fn pause(&mut self) {
        if self.phase == Phase::Playing {
            self.phase = Phase::Paused;
            tracing::debug!(ticks = self.ticks, "paused");
        }
    }

    pub fn resume(&mut self) {
        if self.phase == Phase::Paused {
            self.phase = Phase::Playing;
            tracing::debug!(ticks = self.ticks, "resumed");
        }
    }

    pub fn toggle_pause(&mut self) {
        match self.phase {
            Phase::Playing => self.pause(),
            Phase::Paused => self.resume(),
            Phase::Start | Phase::GameOver => {}
        }
    }

    /// Stage a direction for the next tick.
    ///
    /// Only honoured while playing, and never when it would reverse the
    /// direction the snake is currently moving in.
    pub fn request_direction(&mut self, direction: Direction) -> bool {
        if self.phase != Phase::Playing || self.direction.is_opposite(direction) {
            return false;
        }
        self.staged_direction = direction;
        true
    }

    /// Recompute the grid for a new play-field size.
    ///
    /// While a game is running, food that fell outside the new bounds is
    /// placed again, as is food that could not be placed before.
    pub fn resize(&mut self, field_width: u32, field_height: u32) {
        let grid = Grid::from_field(field_width, field_height, self.config.cell_pitch);
        if grid == self.grid {
            return;
        }
        self.grid = grid;
        tracing::debug!(columns = grid.columns(), rows = grid.rows(), "grid resized");

        let active = matches!(self.phase, Phase::Playing | Phase::Paused);
        if active && self.food.is_none_or(|food| !grid.contains(food)) {
            self.food = self
                .placer
                .place_food(&self.grid, &self.snake, self.special_food_cell());
        }
    }

    /// Advance the game by one step.
    ///
    /// Due timers fire first. Returns `None` when nothing moved because the
    /// session is paused or not playing.
    pub fn tick(&mut self, now: Instant) -> Option<StepResult> {
        self.poll_timers(now);

        if self.phase != Phase::Playing {
            return None;
        }

        self.direction = self.staged_direction;
        let new_head = self.snake.advance(self.direction);
        self.ticks += 1;

        let mut info = StepInfo::default();
        if self.config.move_cue_every > 0 && self.ticks % self.config.move_cue_every == 0 {
            info.cues.push(Cue::Move);
        }

        if let Some(collision_type) = detect_collision(&self.grid, &self.snake, new_head) {
            info.collision_type = Some(collision_type);
            info.cues.push(Cue::GameOver);
            let new_best_score = self.game_over(collision_type);

            return Some(StepResult {
                terminated: true,
                new_best_score,
                info,
            });
        }

        if self.food == Some(new_head) {
            self.score += self.config.food_points;
            info.ate_food = true;
            info.cues.push(Cue::Eat);
            self.place_food(now);
        } else if self.special_food_cell() == Some(new_head) {
            if let Some(special) = self.special_food.cancel() {
                self.apply_power_up(special.kind, now);
                info.power_up = Some(special.kind);
                info.cues.push(Cue::PowerUp);
            }
        } else {
            self.snake.shrink_tail();
        }

        Some(StepResult {
            terminated: false,
            new_best_score: None,
            info,
        })
    }

    fn game_over(&mut self, collision_type: CollisionType) -> Option<u32> {
        self.phase = Phase::GameOver;

        let new_best = if self.score > self.best_score {
            self.best_score = self.score;
            Some(self.best_score)
        } else {
            None
        };

        tracing::info!(
            score = self.score,
            best = self.best_score,
            ticks = self.ticks,
            ?collision_type,
            "game over"
        );
        new_best
    }

    fn apply_power_up(&mut self, kind: PowerUp, now: Instant) {
        match kind.effect(&self.config) {
            Effect::SpeedUp => {
                // Re-collecting restarts the boost instead of stacking it
                self.speed_boost
                    .arm(now, self.config.speed_boost_duration(), ());
                self.tick_epoch += 1;
            }
            Effect::Score(points) => self.score += points,
            Effect::Grow(extra) => self.snake.grow(extra),
        }
        tracing::info!(
            ?kind,
            score = self.score,
            len = self.snake.len(),
            "power-up collected"
        );
    }

    /// Replace ordinary food, then roll for special food if none is active
    fn place_food(&mut self, now: Instant) {
        self.food = self
            .placer
            .place_food(&self.grid, &self.snake, self.special_food_cell());

        if self.special_food.is_armed() {
            return;
        }
        if let Some(special) = self.placer.maybe_place_special_food(
            &self.grid,
            &self.snake,
            self.food,
            self.config.special_food_chance,
        ) {
            tracing::debug!(cell = ?special.cell, kind = ?special.kind, "special food spawned");
            self.special_food
                .arm(now, self.config.special_food_lifetime(), special);
        }
    }

    /// The earliest pending timer, if any
    pub fn next_timer(&self) -> Option<TimerToken> {
        let expiry = self.special_food.id().zip(self.special_food.deadline()).map(
            |(id, deadline)| TimerToken {
                kind: TimerKind::SpecialFoodExpiry,
                id,
                deadline,
            },
        );
        let revert = self.speed_boost.id().zip(self.speed_boost.deadline()).map(
            |(id, deadline)| TimerToken {
                kind: TimerKind::SpeedBoostRevert,
                id,
                deadline,
            },
        );

        match (expiry, revert) {
            (Some(a), Some(b)) => Some(if b.deadline < a.deadline { b } else { a }),
            (a, b) => a.or(b),
        }
    }

    /// Fire the timer behind `token`. Tokens for instances that were since
    /// collected, cancelled or replaced do nothing.
    pub fn fire_timer(&mut self, token: TimerToken, now: Instant) -> Option<TimerEvent> {
        let event = match token.kind {
            TimerKind::SpecialFoodExpiry => self
                .special_food
                .fire(token.id, now)
                .map(TimerEvent::SpecialFoodExpired),
            TimerKind::SpeedBoostRevert => self
                .speed_boost
                .fire(token.id, now)
                .map(|()| TimerEvent::SpeedBoostEnded),
        };
        if let Some(event) = event {
            self.on_timer(event);
        }
        event
    }

    /// Fire every timer whose deadline has passed
    pub fn poll_timers(&mut self, now: Instant) -> Vec<TimerEvent> {
        let mut events = Vec::new();
        if let Some(special) = self.special_food.fire_if_due(now) {
            events.push(TimerEvent::SpecialFoodExpired(special));
        }
        if self.speed_boost.fire_if_due(now).is_some() {
            events.push(TimerEvent::SpeedBoostEnded);
        }
        for event in &events {
            self.on_timer(*event);
        }
        events
    }

    fn on_timer(&mut self, event: TimerEvent) {
        match event {
            TimerEvent::SpecialFoodExpired(special) => {
                tracing::debug!(cell = ?special.cell, kind = ?special.kind, "special food expired");
            }
            TimerEvent::SpeedBoostEnded => {
                self.tick_epoch += 1;
                tracing::debug!("speed boost ended");
            }
        }
    }

    /// Current period of the tick source
    pub fn tick_interval(&self) -> Duration {
        if self.speed_boost.is_armed() {
            self.config.boosted_tick_interval()
        } else {
            self.config.tick_interval()
        }
    }

    /// Bumped whenever the tick source must be replaced
    pub fn tick_epoch(&self) -> u64 {
        self.tick_epoch
    }

    pub fn snapshot(&self, now: Instant) -> SessionSnapshot {
        let special_food = self.special_food.payload().map(|special| SpecialFoodView {
            cell: special.cell,
            kind: special.kind,
            remaining: self.special_food.remaining(now).unwrap_or_default(),
            remaining_fraction: self.special_food.remaining_fraction(now).unwrap_or(0.0),
        });

        SessionSnapshot {
            phase: self.phase,
            grid: self.grid,
            snake: self.snake.segments().to_vec(),
            direction: self.direction,
            food: self.food,
            special_food,
            score: self.score,
            best_score: self.best_score,
            ticks: self.ticks,
            speed_boost_remaining: self.speed_boost.remaining(now),
        }
    }

    fn special_food_cell(&self) -> Option<Cell> {
        self.special_food.payload().map(|special| special.cell)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn staged_direction(&self) -> Direction {
        self.staged_direction
    }

    pub fn food(&self) -> Option<Cell> {
        self.food
    }

    pub fn special_food(&self) -> Option<SpecialFood> {
        self.special_food.payload().copied()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}

fn starting_snake() -> Snake {
    Snake::new(START_SEGMENTS[0], START_DIRECTION, START_SEGMENTS.len())
}

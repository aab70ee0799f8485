use anyhow::{Context, Result};
use crossterm::{
    cursor::Show,
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};
use std::io::{Stderr, Write, stderr};
use std::time::{Duration, Instant};
use tokio::time::interval;

use crate::audio::{CueDispatcher, CuePlayer};
use crate::game::{GameConfig, Phase, Session};
use crate::input::{InputHandler, KeyAction};
use crate::modes::ticker::TickSource;
use crate::prefs::Preferences;
use crate::render::{Hud, Renderer};

/// How long a power-up banner stays up
const BANNER_DURATION: Duration = Duration::from_secs(1);
/// How long the points just scored stay next to the score
const SCORE_FLASH_DURATION: Duration = Duration::from_millis(600);

/// A value shown on screen until a deadline
struct Flash<T> {
    value: T,
    until: Instant,
}

impl<T> Flash<T> {
    fn new(value: T, now: Instant, duration: Duration) -> Self {
        Self {
            value,
            until: now + duration,
        }
    }
}

/// Drop `flash` once its deadline has passed
fn expire<T>(flash: &mut Option<Flash<T>>, now: Instant) {
    if flash.as_ref().is_some_and(|flash| flash.until <= now) {
        *flash = None;
    }
}

/// Interactive play in the terminal
pub struct HumanMode {
    session: Session,
    prefs: Preferences,
    cues: CueDispatcher,
    renderer: Renderer,
    input_handler: InputHandler,
    banner: Option<Flash<&'static str>>,
    score_flash: Option<Flash<u32>>,
    should_quit: bool,
}

/// Current time on the runtime's clock
fn now() -> Instant {
    tokio::time::Instant::now().into_std()
}

impl HumanMode {
    pub fn new(
        config: GameConfig,
        prefs: Preferences,
        player: Box<dyn CuePlayer + Send>,
    ) -> Self {
        let session = Session::new(config, prefs.high_score());
        let cues = CueDispatcher::new(player, prefs.sound_enabled());

        Self {
            session,
            prefs,
            cues,
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            banner: None,
            score_flash: None,
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut terminal = match setup_terminal() {
            Ok(terminal) => terminal,
            Err(err) => {
                if let Err(restore_err) = restore_terminal(&mut stderr()) {
                    tracing::warn!(error = %restore_err, "failed to restore terminal");
                }
                return Err(err);
            }
        };

        if let Ok(size) = terminal.size() {
            self.fit_to_terminal(size.width, size.height);
        }

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        let mut ticker = TickSource::new(self.session.tick_epoch(), self.session.tick_interval());

        // Render at 30 FPS (33ms per frame)
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        loop {
            let pending_timer = self.session.next_timer();
            let timer_due = async move {
                match pending_timer {
                    Some(token) => {
                        tokio::time::sleep_until(tokio::time::Instant::from_std(token.deadline))
                            .await
                    }
                    None => std::future::pending().await,
                }
            };

            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(err)) => {
                            tracing::warn!(error = %err, "failed to read terminal event")
                        }
                        None => self.should_quit = true,
                    }
                }

                // Game logic tick
                _ = ticker.tick() => {
                    self.update_game(now());
                }

                // Special food expiry or speed boost revert
                _ = timer_due => {
                    if let Some(token) = pending_timer {
                        self.session.fire_timer(token, now());
                    }
                }

                // Render frame
                _ = render_timer.tick() => {
                    let now = now();
                    let snapshot = self.session.snapshot(now);
                    let hud = self.hud(now);
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &snapshot, &hud);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            ticker.sync(self.session.tick_epoch(), self.session.tick_interval());

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => {
                // Only process key press events, not release
                if key.kind != KeyEventKind::Press {
                    return;
                }
                let action = self.input_handler.handle_key_event(key);
                self.apply(action, now());
            }
            Event::Resize(width, height) => self.fit_to_terminal(width, height),
            _ => {}
        }
    }

    fn apply(&mut self, action: KeyAction, now: Instant) {
        match action {
            KeyAction::Turn(direction) => {
                self.session.request_direction(direction);
            }
            KeyAction::TogglePause => self.session.toggle_pause(),
            KeyAction::Confirm => match self.session.phase() {
                Phase::Start => {
                    self.session.start(now);
                }
                Phase::GameOver => self.restart(now),
                Phase::Playing | Phase::Paused => {}
            },
            KeyAction::Restart => self.restart(now),
            KeyAction::ToggleSound => match self.prefs.toggle_sound() {
                Ok(enabled) => self.cues.set_enabled(enabled),
                Err(err) => {
                    self.cues.set_enabled(self.prefs.sound_enabled());
                    tracing::warn!(error = %err, "failed to save sound preference");
                }
            },
            KeyAction::TogglePopups => {
                if let Err(err) = self.prefs.toggle_popup_messages() {
                    tracing::warn!(error = %err, "failed to save message preference");
                }
                if !self.prefs.popup_messages_enabled() {
                    self.banner = None;
                }
            }
            KeyAction::Quit => self.should_quit = true,
            KeyAction::None => {}
        }
    }

    fn restart(&mut self, now: Instant) {
        if self.session.restart(now) {
            self.banner = None;
            self.score_flash = None;
        }
    }

    fn update_game(&mut self, now: Instant) {
        let score_before = self.session.score();
        let Some(result) = self.session.tick(now) else {
            return;
        };

        self.cues.dispatch(&result.info.cues);

        let gained = self.session.score().saturating_sub(score_before);
        if gained > 0 {
            self.score_flash = Some(Flash::new(gained, now, SCORE_FLASH_DURATION));
        }

        if let Some(kind) = result.info.power_up {
            if self.prefs.popup_messages_enabled() {
                self.banner = Some(Flash::new(kind.message(), now, BANNER_DURATION));
            }
        }

        if let Some(best) = result.new_best_score {
            if let Err(err) = self.prefs.record_high_score(best) {
                tracing::warn!(error = %err, best, "failed to save high score");
            }
        }
    }

    /// Front-end state for the next frame, dropping flashes that ran out
    fn hud(&mut self, now: Instant) -> Hud<'static> {
        expire(&mut self.banner, now);
        expire(&mut self.score_flash, now);
        Hud {
            sound_enabled: self.prefs.sound_enabled(),
            popups_enabled: self.prefs.popup_messages_enabled(),
            banner: self.banner.as_ref().map(|banner| banner.value),
            score_gain: self.score_flash.as_ref().map(|flash| flash.value),
        }
    }

    /// Shrink the play field to what the terminal can show, never beyond the configured size
    fn fit_to_terminal(&mut self, width: u16, height: u16) {
        let (columns, rows) = Renderer::playable_cells(Rect::new(0, 0, width, height));
        let config = self.session.config();
        let pitch = config.cell_pitch;
        let field_width = u32::from(columns)
            .saturating_mul(pitch)
            .min(config.field_width);
        let field_height = u32::from(rows)
            .saturating_mul(pitch)
            .min(config.field_height);
        self.session.resize(field_width, field_height);
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        restore_terminal(terminal.backend_mut())
    }
}

/// Everything after raw mode; on error the caller still has to restore
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stderr>>> {
    let mut stderr = stderr();
    execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stderr);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
    terminal.hide_cursor().context("Failed to hide cursor")?;
    terminal.clear().context("Failed to clear terminal")?;
    Ok(terminal)
}

/// Leave raw mode and the alternate screen and show the cursor.
/// Works after a partial setup as well.
fn restore_terminal<W: Write>(out: &mut W) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(out, LeaveAlternateScreen, Show).context("Failed to leave alternate screen")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::SilentPlayer;
    use crate::game::Direction;
    use crate::prefs::MemoryStore;

    fn mode() -> HumanMode {
        let config = GameConfig {
            seed: Some(3),
            special_food_chance: 0.0,
            ..GameConfig::default()
        };
        let prefs = Preferences::load(Box::new(MemoryStore::new()));
        HumanMode::new(config, prefs, Box::new(SilentPlayer))
    }

    #[test]
    fn test_game_initialization() {
        let mode = mode();
        assert_eq!(mode.session.phase(), Phase::Start);
        assert_eq!(mode.session.score(), 0);
        assert!(mode.cues.is_enabled());
    }

    #[test]
    fn test_confirm_starts_and_turns_apply() {
        let mut mode = mode();
        let now = Instant::now();

        mode.apply(KeyAction::Turn(Direction::Up), now);
        assert_eq!(mode.session.staged_direction(), Direction::Right);

        mode.apply(KeyAction::Confirm, now);
        assert_eq!(mode.session.phase(), Phase::Playing);

        mode.apply(KeyAction::Turn(Direction::Up), now);
        assert_eq!(mode.session.staged_direction(), Direction::Up);

        mode.apply(KeyAction::TogglePause, now);
        assert_eq!(mode.session.phase(), Phase::Paused);
        mode.update_game(now);
        assert_eq!(mode.session.ticks(), 0);
    }

    #[test]
    fn test_game_over_then_restart() {
        let mut mode = mode();
        let now = Instant::now();
        mode.apply(KeyAction::Confirm, now);

        // Run straight up into the top wall
        mode.apply(KeyAction::Turn(Direction::Up), now);
        for _ in 0..10 {
            mode.update_game(now);
        }
        assert_eq!(mode.session.phase(), Phase::GameOver);

        mode.apply(KeyAction::Restart, now);
        assert_eq!(mode.session.phase(), Phase::Playing);
        assert_eq!(mode.session.score(), 0);
    }

    #[test]
    fn test_sound_toggle_mutes_dispatcher() {
        let mut mode = mode();
        mode.apply(KeyAction::ToggleSound, Instant::now());
        assert!(!mode.prefs.sound_enabled());
        assert!(!mode.cues.is_enabled());
    }

    #[test]
    fn test_banner_expires() {
        let mut mode = mode();
        let now = Instant::now();
        mode.banner = Some(Flash::new("Speed Boost!", now, BANNER_DURATION));

        assert_eq!(mode.hud(now).banner, Some("Speed Boost!"));
        assert_eq!(mode.hud(now + BANNER_DURATION).banner, None);
        assert!(mode.banner.is_none());
    }

    #[test]
    fn test_eating_flashes_points_gained() {
        let mut mode = mode();
        let now = Instant::now();
        mode.apply(KeyAction::Confirm, now);
        assert_eq!(mode.hud(now).score_gain, None);

        // Steer greedily towards the food; three segments cannot bite themselves
        let food = mode.session.food().unwrap();
        let mut t = now;
        while mode.session.score() == 0 && mode.session.phase() == Phase::Playing {
            let head = mode.session.snake().head();
            let current = mode.session.direction();
            let distance = |direction: Direction| {
                let next = head.moved_in_direction(direction);
                (next.x - food.x).abs() + (next.y - food.y).abs()
            };
            let wanted = Direction::ALL
                .into_iter()
                .filter(|direction| !current.is_opposite(*direction))
                .min_by_key(|direction| distance(*direction))
                .unwrap();
            mode.apply(KeyAction::Turn(wanted), t);
            mode.update_game(t);
            t += Duration::from_millis(100);
        }

        assert_eq!(mode.session.score(), 10);
        assert_eq!(mode.hud(t).score_gain, Some(10));
        assert_eq!(mode.hud(t + SCORE_FLASH_DURATION).score_gain, None);
    }

    #[test]
    fn test_restore_terminal_leaves_alternate_screen() {
        let mut out = Vec::new();
        restore_terminal(&mut out).unwrap();

        let written = String::from_utf8(out).unwrap();
        assert!(written.contains("\x1b[?1049l"));
        assert!(written.contains("\x1b[?25h"));
    }

    #[test]
    fn test_fit_to_terminal_caps_at_configured_field() {
        let mut mode = mode();
        mode.fit_to_terminal(400, 200);
        assert_eq!(mode.session.grid().columns(), 28);
        assert_eq!(mode.session.grid().rows(), 28);

        mode.fit_to_terminal(40, 20);
        assert_eq!(mode.session.grid().columns(), 19);
        assert_eq!(mode.session.grid().rows(), 12);
    }

    #[test]
    fn test_fit_to_terminal_with_huge_pitch_does_not_overflow() {
        let config = GameConfig {
            cell_pitch: u32::MAX / 2,
            ..GameConfig::default()
        };
        assert!(config.validate().is_ok());
        let prefs = Preferences::load(Box::new(MemoryStore::new()));
        let mut mode = HumanMode::new(config, prefs, Box::new(SilentPlayer));

        mode.fit_to_terminal(400, 200);
        assert_eq!(mode.session.grid().columns(), 1);
        assert_eq!(mode.session.grid().rows(), 1);
    }
}

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};
use std::time::Duration;

use crate::game::{Cell, Phase, PowerUp, SessionSnapshot, SpecialFoodView};

const HEADER_HEIGHT: u16 = 3;
const FOOTER_HEIGHT: u16 = 3;
/// Terminal columns used by one grid cell
const CELL_WIDTH: u16 = 2;
/// Special food shows a countdown once this little time is left
const COUNTDOWN_FROM: Duration = Duration::from_secs(5);

/// Front-end state that is not part of the session
#[derive(Debug, Clone, Default)]
pub struct Hud<'a> {
    pub sound_enabled: bool,
    pub popups_enabled: bool,
    /// Power-up banner currently on screen
    pub banner: Option<&'a str>,
    /// Points from the latest score change, shown briefly next to the score
    pub score_gain: Option<u32>,
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    /// How many grid cells fit in a terminal of the given size
    pub fn playable_cells(area: Rect) -> (u16, u16) {
        let columns = area.width.saturating_sub(2) / CELL_WIDTH;
        let rows = area
            .height
            .saturating_sub(HEADER_HEIGHT + FOOTER_HEIGHT + 2);
        (columns.max(1), rows.max(1))
    }

    pub fn render(&self, frame: &mut Frame, snapshot: &SessionSnapshot, hud: &Hud) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT), // Header
                Constraint::Min(0),                // Game area
                Constraint::Length(FOOTER_HEIGHT), // Footer
            ])
            .split(frame.area());

        let stats = self.render_stats(snapshot, hud);
        frame.render_widget(stats, chunks[0]);

        let game_area = centered(chunks[1], snapshot);
        match snapshot.phase {
            Phase::Start => frame.render_widget(self.render_title(snapshot), game_area),
            Phase::Playing | Phase::Paused => {
                frame.render_widget(self.render_grid(snapshot), game_area)
            }
            Phase::GameOver => frame.render_widget(self.render_game_over(snapshot), game_area),
        }

        let controls = self.render_controls(snapshot.phase, hud);
        frame.render_widget(controls, chunks[2]);
    }

    fn render_grid(&self, snapshot: &SessionSnapshot) -> Paragraph<'_> {
        let head = snapshot.head();
        let mut lines = Vec::new();

        for y in 0..snapshot.grid.rows() as i32 {
            let mut spans = Vec::new();

            for x in 0..snapshot.grid.columns() as i32 {
                let pos = Cell::new(x, y);
                let special = snapshot.special_food.filter(|special| special.cell == pos);

                let cell = if Some(pos) == head {
                    Span::styled(
                        "■ ",
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if snapshot.snake.contains(&pos) {
                    Span::styled("□ ", Style::default().fg(Color::Green))
                } else if Some(pos) == snapshot.food {
                    Span::styled(
                        "● ",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )
                } else if let Some(special) = special {
                    special_span(&special)
                } else {
                    Span::styled(". ", Style::default().fg(Color::DarkGray))
                };

                spans.push(cell);
            }

            lines.push(Line::from(spans));
        }

        let (title, border) = if snapshot.phase == Phase::Paused {
            (" Snake - Paused ", Color::Yellow)
        } else if snapshot.speed_boost_remaining.is_some() {
            (" Snake - Boosted ", Color::LightYellow)
        } else {
            (" Snake ", Color::White)
        };

        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(border))
                .title(title),
        )
    }

    fn render_stats(&self, snapshot: &SessionSnapshot, hud: &Hud) -> Paragraph<'_> {
        let mut stats = vec![
            Span::styled("Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                snapshot.score.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
        ];
        if let Some(gain) = hud.score_gain {
            stats.push(Span::styled(
                format!(" +{gain}"),
                Style::default()
                    .fg(Color::LightGreen)
                    .add_modifier(Modifier::BOLD),
            ));
        }
        stats.extend([
            Span::raw("    "),
            Span::styled("High Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                snapshot.best_score.to_string(),
                Style::default().fg(Color::White),
            ),
            Span::raw("    "),
            Span::styled("Length: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                snapshot.snake.len().to_string(),
                Style::default().fg(Color::White),
            ),
            Span::raw("    "),
            Span::styled(
                if hud.sound_enabled { "Sound On" } else { "Sound Off" },
                Style::default().fg(Color::Gray),
            ),
        ]);
        let mut text = vec![Line::from(stats)];

        if let Some(banner) = hud.banner {
            text.push(Line::from(Span::styled(
                banner.to_string(),
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            )));
        }

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_title(&self, snapshot: &SessionSnapshot) -> Paragraph<'_> {
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "SNAKE",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("High Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    snapshot.best_score.to_string(),
                    Style::default().fg(Color::White),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("⚡", Style::default().fg(Color::Yellow)),
                Span::raw(" speed   "),
                Span::styled("×2", Style::default().fg(Color::Green)),
                Span::raw(" points   "),
                Span::styled("+3", Style::default().fg(Color::Magenta)),
                Span::raw(" growth"),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Enter",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to start", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Green)),
        )
    }

    fn render_game_over(&self, snapshot: &SessionSnapshot) -> Paragraph<'_> {
        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    snapshot.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("High Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    snapshot.best_score.to_string(),
                    Style::default().fg(Color::White),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "R",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to restart or ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Q",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to quit", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self, phase: Phase, hud: &Hud) -> Paragraph<'_> {
        let mut spans = vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
        ];
        let pause_label = if phase == Phase::Paused {
            " resume | "
        } else {
            " pause | "
        };
        spans.extend([
            Span::styled("Space", Style::default().fg(Color::Cyan)),
            Span::raw(pause_label),
            Span::styled("M", Style::default().fg(Color::Cyan)),
            Span::raw(" sound | "),
            Span::styled("P", Style::default().fg(Color::Cyan)),
            Span::raw(if hud.popups_enabled {
                " messages on | "
            } else {
                " messages off | "
            }),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ]);

        Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

fn power_up_color(kind: PowerUp) -> Color {
    match kind {
        PowerUp::SpeedBoost => Color::Yellow,
        PowerUp::DoublePoints => Color::Green,
        PowerUp::SuperGrowth => Color::Magenta,
    }
}

/// Icon for fresh special food, a seconds countdown near the end
fn special_span(special: &SpecialFoodView) -> Span<'static> {
    let style = Style::default()
        .fg(power_up_color(special.kind))
        .add_modifier(Modifier::BOLD);

    if special.remaining < COUNTDOWN_FROM {
        let secs = special.remaining.as_secs_f32().ceil() as u32;
        Span::styled(format!("{secs:<2}"), style.add_modifier(Modifier::SLOW_BLINK))
    } else {
        Span::styled(special.kind.icon(), style)
    }
}

/// Shrink `area` to the grid's footprint, centred
fn centered(area: Rect, snapshot: &SessionSnapshot) -> Rect {
    let width = (snapshot.grid.columns() as u16)
        .saturating_mul(CELL_WIDTH)
        .saturating_add(2)
        .max(40)
        .min(area.width);
    let height = (snapshot.grid.rows() as u16)
        .saturating_add(2)
        .max(12)
        .min(area.height);

    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, Grid};
    use ratatui::{Terminal, backend::TestBackend};

    fn snapshot(phase: Phase) -> SessionSnapshot {
        SessionSnapshot {
            phase,
            grid: Grid::new(10, 8),
            snake: vec![Cell::new(5, 5), Cell::new(4, 5), Cell::new(3, 5)],
            direction: Direction::Right,
            food: Some(Cell::new(1, 1)),
            special_food: Some(SpecialFoodView {
                cell: Cell::new(8, 2),
                kind: PowerUp::SuperGrowth,
                remaining: Duration::from_secs(9),
                remaining_fraction: 0.9,
            }),
            score: 30,
            best_score: 120,
            ticks: 12,
            speed_boost_remaining: None,
        }
    }

    fn draw(snapshot: &SessionSnapshot, hud: &Hud) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        let renderer = Renderer::new();
        terminal
            .draw(|frame| renderer.render(frame, snapshot, hud))
            .unwrap();

        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        let mut text = String::new();
        for (i, cell) in buffer.content().iter().enumerate() {
            text.push_str(cell.symbol());
            if (i + 1) % width == 0 {
                text.push('\n');
            }
        }
        text
    }

    #[test]
    fn test_playing_frame_shows_board_and_scores() {
        let hud = Hud {
            sound_enabled: true,
            popups_enabled: true,
            banner: Some("Super Growth! +3"),
            score_gain: None,
        };
        let text = draw(&snapshot(Phase::Playing), &hud);

        assert!(text.contains("Score: 30"));
        assert!(text.contains("High Score: 120"));
        assert!(text.contains("Super Growth! +3"));
        assert!(text.contains("■"));
        assert!(text.contains("●"));
        assert!(text.contains("+3"));
    }

    #[test]
    fn test_paused_and_game_over_frames() {
        let hud = Hud::default();
        assert!(draw(&snapshot(Phase::Paused), &hud).contains("Paused"));

        let text = draw(&snapshot(Phase::GameOver), &hud);
        assert!(text.contains("GAME OVER"));
        assert!(text.contains("Final Score: 30"));

        assert!(draw(&snapshot(Phase::Start), &hud).contains("to start"));
    }

    #[test]
    fn test_score_gain_flashes_next_to_score() {
        let hud = Hud {
            score_gain: Some(20),
            ..Hud::default()
        };
        assert!(draw(&snapshot(Phase::Playing), &hud).contains("Score: 30 +20"));
        assert!(!draw(&snapshot(Phase::Playing), &Hud::default()).contains("+20"));
    }

    #[test]
    fn test_special_food_countdown() {
        let mut view = snapshot(Phase::Playing).special_food.unwrap();
        assert_eq!(special_span(&view).content, "+3");

        view.remaining = Duration::from_millis(2300);
        assert_eq!(special_span(&view).content, "3 ");
    }

    #[test]
    fn test_playable_cells() {
        assert_eq!(Renderer::playable_cells(Rect::new(0, 0, 80, 24)), (39, 16));
        assert_eq!(Renderer::playable_cells(Rect::new(0, 0, 3, 3)), (1, 1));
    }
}

use crate::entities::{Direction, EnemyClass, GamePhase};
use crate::game::Snapshot;
use rand::Rng;
use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

/// Handles all rendering responsibilities for the game
#[derive(Debug, Default)]
pub struct GameRenderer {
    /// Play field width as a multiple of its height, in cells.
    aspect: u16,
}

impl GameRenderer {
    pub fn new() -> Self {
        Self { aspect: 2 }
    }

    /// Main render method that dispatches to phase-specific renderers
    pub fn render(&self, frame: &mut Frame, snapshot: &Snapshot) {
        match snapshot.phase {
            GamePhase::Idle => self.render_idle(frame, snapshot),
            GamePhase::Running => self.render_game(frame, snapshot),
            GamePhase::Paused => self.render_paused(frame, snapshot),
            GamePhase::Over => self.render_game_over(frame, snapshot),
        }
    }

    /// Square-ish play field centred in `area`, leaving a HUD row top and
    /// bottom.
    fn play_area(&self, area: Rect) -> Rect {
        let height = area.height.saturating_sub(2);
        let width = (height * self.aspect.max(1)).min(area.width);
        Rect {
            x: area.x + (area.width - width) / 2,
            y: area.y + 1,
            width,
            height,
        }
    }

    /// Renders the active gameplay screen
    fn render_game(&self, frame: &mut Frame, snapshot: &Snapshot) {
        let area = frame.area();
        let field_area = self.play_area(area);

        let block = Block::default()
            .borders(Borders::LEFT | Borders::RIGHT)
            .border_style(Style::default().fg(Color::DarkGray));
        let field = block.inner(field_area);
        frame.render_widget(block, field_area);
        if field.width == 0 || field.height == 0 {
            return;
        }

        // Render stars (simple background)
        if snapshot.stats.ticks % 10 < 5 {
            let star_text = (0..field.height)
                .map(|_| {
                    let mut rng = rand::rng();
                    (0..field.width)
                        .map(|_| if rng.random_bool(0.01) { '.' } else { ' ' })
                        .collect::<String>()
                })
                .collect::<Vec<_>>()
                .join("\n");
            frame.render_widget(
                Paragraph::new(star_text).style(Style::default().fg(Color::DarkGray)),
                field,
            );
        }

        let buffer = frame.buffer_mut();

        for grid in snapshot.grids {
            let (sprite, color) = match grid.class() {
                EnemyClass::Front => ("[#]", Color::Red),
                EnemyClass::Mid => ("(o)", Color::Magenta),
                EnemyClass::Back => ("/^\\", Color::Yellow),
            };
            let style = Style::default().fg(color).add_modifier(Modifier::BOLD);
            for (_, (x, y)) in grid.active_offsets() {
                draw_centered(buffer, field, to_cell(field, x, y), sprite, style);
            }
        }

        let shooter = to_cell(
            field,
            snapshot.shooter_x,
            snapshot.shooter_y + snapshot.shooter_height / 2.0,
        );
        draw_centered(
            buffer,
            field,
            shooter,
            "/A\\",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        );

        for projectile in snapshot.projectiles {
            let cell = to_cell(field, projectile.x, projectile.y + projectile.height / 2.0);
            draw_centered(buffer, field, cell, "|", Style::default().fg(Color::Yellow));
        }

        self.render_hud(frame, snapshot, area);
    }

    fn render_hud(&self, frame: &mut Frame, snapshot: &Snapshot, area: Rect) {
        let label = Style::default().fg(Color::DarkGray);
        let arrow = match snapshot.direction {
            Direction::Left => "<<",
            Direction::Right => ">>",
        };

        let stats = Line::from(vec![
            Span::styled("Score: ", label),
            Span::styled(
                format!("{}", snapshot.score),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("  Enemies: ", label),
            Span::styled(
                format!("{}", snapshot.enemies_remaining()),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("  Tempo: ", label),
            Span::styled(
                format!("{:.0}ms {arrow}", snapshot.tick_period_ms),
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("  Shots: ", label),
            Span::styled(
                format!("{}", snapshot.projectiles.len()),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
        ]);

        let stats_area = Rect {
            x: area.x + 1,
            y: area.y,
            width: area.width.saturating_sub(2),
            height: 1,
        };
        frame.render_widget(Paragraph::new(stats), stats_area);

        let controls = Line::from(vec![Span::styled(
            "[A/D/Arrows: Move] [Space: Fire] [P: Pause] [Q: Quit]",
            label,
        )]);
        let controls_area = Rect {
            x: area.x + 1,
            y: area.y + area.height.saturating_sub(1),
            width: area.width.saturating_sub(2),
            height: 1,
        };
        frame.render_widget(Paragraph::new(controls).centered(), controls_area);
    }

    fn render_idle(&self, frame: &mut Frame, _snapshot: &Snapshot) {
        let area = frame.area();
        let title = vec![
            Line::from(""),
            Line::from("I N V A D E R S").centered().green().bold(),
            Line::from(""),
            Line::from("[#] 30   (o) 20   /^\\ 10").centered().white(),
            Line::from(""),
            Line::from("Press Enter to start").centered().yellow(),
            Line::from("Press Q to quit").centered().white(),
        ];

        frame.render_widget(
            Paragraph::new(title)
                .block(Block::default().borders(Borders::ALL))
                .alignment(Alignment::Center),
            area,
        );
    }

    /// Renders the pause screen with overlay
    fn render_paused(&self, frame: &mut Frame, snapshot: &Snapshot) {
        self.render_game(frame, snapshot);

        let area = frame.area();
        let pause_text = vec![
            Line::from(""),
            Line::from("PAUSED").centered().bold().yellow(),
            Line::from(""),
            Line::from("Press P to resume").centered().white(),
        ];

        let width = 30.min(area.width);
        let height = 6.min(area.height);
        let pause_area = Rect {
            x: area.x + (area.width - width) / 2,
            y: area.y + (area.height - height) / 2,
            width,
            height,
        };

        frame.render_widget(
            Paragraph::new(pause_text)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::Yellow)),
                )
                .alignment(Alignment::Center),
            pause_area,
        );
    }

    /// Renders the game over screen
    fn render_game_over(&self, frame: &mut Frame, snapshot: &Snapshot) {
        let area = frame.area();
        let stats = snapshot.stats;
        let headline = if snapshot.enemies_remaining() == 0 {
            "║      FORMATION CLEARED!   ║"
        } else {
            "║      GAME OVER!           ║"
        };

        let game_over_text = vec![
            Line::from(""),
            Line::from("╔═══════════════════════════╗").centered().red(),
            Line::from(headline).centered().red().bold(),
            Line::from("╚═══════════════════════════╝").centered().red(),
            Line::from(""),
            Line::from(format!("Final Score: {}", snapshot.score))
                .centered()
                .yellow()
                .bold(),
            Line::from(format!(
                "Kills: {} front, {} mid, {} back",
                stats.front_kills, stats.mid_kills, stats.back_kills
            ))
            .centered()
            .cyan(),
            Line::from(format!("Reversals: {}", stats.reversals))
                .centered()
                .cyan(),
            Line::from(""),
            Line::from("Press R to reset").centered().white(),
            Line::from("Press Q to quit").centered().white(),
        ];

        frame.render_widget(
            Paragraph::new(game_over_text)
                .block(Block::default().borders(Borders::ALL))
                .alignment(Alignment::Center),
            area,
        );
    }
}

/// Maps a play-field point in [-1, 1]² (y up) to a cell of `field`.
fn to_cell(field: Rect, x: f32, y: f32) -> (u16, u16) {
    let max_col = f32::from(field.width.saturating_sub(1));
    let max_row = f32::from(field.height.saturating_sub(1));
    let col = ((x.clamp(-1.0, 1.0) + 1.0) / 2.0 * max_col).round() as u16;
    let row = ((1.0 - y.clamp(-1.0, 1.0)) / 2.0 * max_row).round() as u16;
    (field.x + col, field.y + row)
}

fn draw_centered(buffer: &mut Buffer, field: Rect, (col, row): (u16, u16), sprite: &str, style: Style) {
    let width = sprite.chars().count() as u16;
    let start = col.saturating_sub(width / 2).max(field.x);
    let right = field.x + field.width;
    if row < field.y || row >= field.y + field.height || start >= right {
        return;
    }
    buffer.set_stringn(start, row, sprite, usize::from(right - start), style);
}

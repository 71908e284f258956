use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::app::GameState;
use crate::entities::{Alien, Projectile, ProjectileOwner, Ship};
use crate::wave::{Wave, WaveView};

/// Glyphs for each alien variant, cycled when there are more variants
const ALIEN_SPRITES: [(&str, Color); 3] = [
    ("/oo\\", Color::Green),
    ("{@@}", Color::Cyan),
    ("<##>", Color::Magenta),
];

const SHIP_SPRITE: &str = "/^\\";
/// Explosion strip, stretched over however many frames the ship has
const EXPLOSION_SPRITES: [&str; 4] = ["\\*/", "-*-", " * ", " . "];

/// View struct that holds all game state needed for rendering
pub struct RenderView<'a> {
    pub game_state: GameState,
    pub wave: &'a Wave,
    pub area: Rect,
    pub fps: u32,
}

/// Maps playfield coordinates (origin bottom-left, y up) onto terminal cells
pub struct Canvas<'a> {
    buffer: &'a mut Buffer,
    area: Rect,
    game_width: f32,
    game_height: f32,
    ship_frames: usize,
}

impl<'a> Canvas<'a> {
    pub fn new(buffer: &'a mut Buffer, area: Rect, wave: &Wave) -> Self {
        let config = wave.config();
        Self {
            buffer,
            area,
            game_width: config.game_width,
            game_height: config.game_height,
            ship_frames: config.ship_frames,
        }
    }

    /// Cell containing a playfield point, if it is on screen
    pub fn to_cell(&self, x: f32, y: f32) -> Option<(u16, u16)> {
        let col = (x / self.game_width * self.area.width as f32).floor();
        let row =
            ((self.game_height - y) / self.game_height * self.area.height as f32).floor();
        if col < 0.0
            || row < 0.0
            || col >= self.area.width as f32
            || row >= self.area.height as f32
        {
            return None;
        }
        Some((self.area.x + col as u16, self.area.y + row as u16))
    }

    /// Writes `text` centered on a playfield point, clipped to the area
    fn put_centered(&mut self, x: f32, y: f32, text: &str, style: Style) {
        let Some((col, row)) = self.to_cell(x, y) else {
            return;
        };
        let half = text.chars().count() as u16 / 2;
        let start = col.saturating_sub(half).max(self.area.x);
        let room = (self.area.x + self.area.width).saturating_sub(start) as usize;
        self.buffer.set_stringn(start, row, text, room, style);
    }
}

impl WaveView for Canvas<'_> {
    fn draw_alien(&mut self, alien: &Alien) {
        let (sprite, color) = ALIEN_SPRITES[alien.variant % ALIEN_SPRITES.len()];
        self.put_centered(
            alien.x,
            alien.y,
            sprite,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        );
    }

    fn draw_ship(&mut self, ship: &Ship) {
        let (sprite, color) = if ship.is_exploding() {
            let last = self.ship_frames.saturating_sub(1).max(1);
            let index = ship.frame * (EXPLOSION_SPRITES.len() - 1) / last;
            (EXPLOSION_SPRITES[index.min(EXPLOSION_SPRITES.len() - 1)], Color::Red)
        } else {
            (SHIP_SPRITE, Color::Yellow)
        };
        self.put_centered(
            ship.x,
            ship.y,
            sprite,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        );
    }

    fn draw_defense_line(&mut self, y: f32, width: f32) {
        let Some((start, row)) = self.to_cell(0.0, y) else {
            return;
        };
        // a line reaching the right edge maps past the last column
        let end = self
            .to_cell(width, y)
            .map_or(self.area.x + self.area.width, |(col, _)| col + 1);
        let line = "─".repeat(end.saturating_sub(start) as usize);
        self.buffer
            .set_string(start, row, line, Style::default().fg(Color::DarkGray));
    }

    fn draw_bolt(&mut self, bolt: &Projectile) {
        let (glyph, color) = match bolt.owner() {
            ProjectileOwner::Player => ("|", Color::Yellow),
            ProjectileOwner::Enemy => ("!", Color::Magenta),
        };
        self.put_centered(bolt.x, bolt.y, glyph, Style::default().fg(color));
    }
}

/// Handles all rendering responsibilities for the game
#[derive(Default)]
pub struct GameRenderer {}

impl GameRenderer {
    pub fn new() -> Self {
        Self {}
    }

    /// Main render method that dispatches to state-specific overlays
    pub fn render(&self, frame: &mut Frame, view: &RenderView) {
        self.render_game(frame, view);
        match view.game_state {
            GameState::Playing => {}
            GameState::Paused => self.render_message(
                frame,
                view.area,
                Color::Yellow,
                vec![
                    Line::from("PAUSED").centered().bold().yellow(),
                    Line::from(""),
                    Line::from("Press P to resume").centered().white(),
                ],
            ),
            GameState::LifeLost => self.render_message(
                frame,
                view.area,
                Color::Red,
                vec![
                    Line::from("SHIP DESTROYED").centered().bold().red(),
                    Line::from(format!("Lives left: {}", view.wave.lives()))
                        .centered()
                        .white(),
                    Line::from("Press Space to continue").centered().white(),
                ],
            ),
            GameState::Won => self.render_message(
                frame,
                view.area,
                Color::Green,
                vec![
                    Line::from("WAVE CLEARED!").centered().bold().green(),
                    Line::from(""),
                    Line::from("Press R to play again, Q to quit")
                        .centered()
                        .white(),
                ],
            ),
            GameState::Lost => {
                let reason = if view.wave.aliens_breached() {
                    "The aliens reached the defense line"
                } else {
                    "No ships left"
                };
                self.render_message(
                    frame,
                    view.area,
                    Color::Red,
                    vec![
                        Line::from("GAME OVER!").centered().bold().red(),
                        Line::from(reason).centered().yellow(),
                        Line::from("Press R to restart, Q to quit")
                            .centered()
                            .white(),
                    ],
                )
            }
        }
    }

    /// Renders the playfield, the stats header and the controls hint
    fn render_game(&self, frame: &mut Frame, view: &RenderView) {
        let area = view.area;
        let field = Rect {
            x: area.x,
            y: area.y + 1,
            width: area.width,
            height: area.height.saturating_sub(2),
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(field);
        frame.render_widget(block, field);

        let mut canvas = Canvas::new(frame.buffer_mut(), inner, view.wave);
        view.wave.draw(&mut canvas);

        let stats = Line::from(vec![
            Span::styled("Lives: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{}", view.wave.lives()),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("  Aliens: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{}", view.wave.formation().live_count()),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("  Step: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{:.2}s", view.wave.alien_step_interval()),
                Style::default().fg(Color::White),
            ),
            Span::styled("  FPS: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{}", view.fps),
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
            "[A/D/Arrows: Move] [Space/W: Fire] [P: Pause] [Q: Quit]",
            Style::default().fg(Color::DarkGray),
        )]);
        let controls_area = Rect {
            x: area.x + 1,
            y: area.y + area.height.saturating_sub(1),
            width: area.width.saturating_sub(2),
            height: 1,
        };
        frame.render_widget(Paragraph::new(controls).centered(), controls_area);
    }

    /// Renders a bordered message box in the middle of the screen
    fn render_message(&self, frame: &mut Frame, area: Rect, border: Color, lines: Vec<Line>) {
        let width = 40.min(area.width);
        let height = (lines.len() as u16 + 2).min(area.height);
        let message_area = Rect {
            x: area.x + (area.width - width) / 2,
            y: area.y + (area.height - height) / 2,
            width,
            height,
        };

        frame.render_widget(
            Paragraph::new(lines)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(border)),
                )
                .alignment(Alignment::Center),
            message_area,
        );
    }
}

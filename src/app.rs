use color_eyre::Result;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::time::{Duration, Instant};
use tracing::info;

use crate::config::WaveConfig;
use crate::error::ConfigError;
use crate::input::{InputAction, InputManager};
use crate::renderer::{GameRenderer, RenderView};
use crate::wave::Wave;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Playing,
    Paused,
    /// The ship was destroyed and lives remain; waiting for the player
    LifeLost,
    Won,
    Lost,
}

/// The main application which runs a single wave in the terminal.
pub struct App {
    running: bool,
    game_state: GameState,
    wave: Wave,
    config: WaveConfig,
    /// Fixed seed for reproducible runs
    seed: Option<u64>,
    /// Frames info
    last_frame_time: Instant,
    fps: u32,
    /// internal components
    input_manager: InputManager,
    renderer: GameRenderer,
}

impl App {
    /// Construct a new instance of [`App`].
    pub fn new(
        config: WaveConfig,
        seed: Option<u64>,
        release_events: bool,
    ) -> Result<Self, ConfigError> {
        let wave = Self::new_wave(&config, seed)?;
        Ok(Self {
            running: true,
            game_state: GameState::Playing,
            wave,
            config,
            seed,
            last_frame_time: Instant::now(),
            fps: 0,
            input_manager: InputManager::new(release_events),
            renderer: GameRenderer::new(),
        })
    }

    fn new_wave(config: &WaveConfig, seed: Option<u64>) -> Result<Wave, ConfigError> {
        match seed {
            Some(seed) => Wave::seeded(config.clone(), seed),
            None => Wave::new(config.clone()),
        }
    }

    pub fn game_state(&self) -> GameState {
        self.game_state
    }

    pub fn wave(&self) -> &Wave {
        &self.wave
    }

    /// Run the application's main loop.
    pub fn run(
        mut self,
        terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    ) -> Result<()> {
        info!(seed = ?self.seed, "wave started");
        while self.running {
            let now = Instant::now();
            let frame_time = now.duration_since(self.last_frame_time);
            self.last_frame_time = now;
            if frame_time.as_micros() > 0 {
                self.fps = (1_000_000 / frame_time.as_micros()) as u32;
            }

            terminal.draw(|frame| {
                let view = RenderView {
                    game_state: self.game_state,
                    wave: &self.wave,
                    area: frame.area(),
                    fps: self.fps,
                };
                self.renderer.render(frame, &view);
            })?;

            self.input_manager.poll_events(self.game_state)?;
            let actions = self.input_manager.actions().to_vec();
            self.process_actions(&actions);

            if self.game_state == GameState::Playing {
                self.update_game(frame_time.as_secs_f32());
            }

            // Small sleep to maintain ~60 FPS and prevent CPU spinning
            std::thread::sleep(Duration::from_millis(16));
        }
        Ok(())
    }

    /// Process input actions and update game state accordingly
    pub fn process_actions(&mut self, actions: &[InputAction]) {
        for action in actions {
            match action {
                InputAction::Quit => {
                    self.running = false;
                }
                InputAction::Pause => {
                    self.game_state = GameState::Paused;
                    self.input_manager.release_all();
                }
                InputAction::Resume => {
                    self.game_state = GameState::Playing;
                }
                InputAction::Continue => {
                    if self.game_state == GameState::LifeLost {
                        self.wave.set_new_ship();
                        self.game_state = GameState::Playing;
                        info!(lives = self.wave.lives(), "new ship");
                    }
                }
                InputAction::Restart => match Self::new_wave(&self.config, self.seed) {
                    Ok(wave) => {
                        self.wave = wave;
                        self.game_state = GameState::Playing;
                        info!("wave restarted");
                    }
                    Err(err) => {
                        tracing::error!(error = %err, "could not restart the wave");
                        self.running = false;
                    }
                },
            }
        }
    }

    /// Advance the wave by one frame and react to its outcome
    pub fn update_game(&mut self, dt: f32) {
        self.wave.update(&self.input_manager, dt);

        if self.wave.aliens_cleared() {
            info!(lives = self.wave.lives(), "wave won");
            self.game_state = GameState::Won;
        } else if self.wave.is_over() {
            info!(
                lives = self.wave.lives(),
                breached = self.wave.aliens_breached(),
                "wave lost"
            );
            self.game_state = GameState::Lost;
        } else if self.wave.is_paused() {
            self.game_state = GameState::LifeLost;
            self.input_manager.release_all();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::new(WaveConfig::default(), Some(11), true).unwrap()
    }

    #[test]
    fn test_app_starts_playing() {
        let app = app();
        assert_eq!(app.game_state(), GameState::Playing);
        assert_eq!(app.wave().lives(), 3);
    }

    #[test]
    fn test_pause_stops_the_wave() {
        let mut app = app();
        app.process_actions(&[InputAction::Pause]);
        assert_eq!(app.game_state(), GameState::Paused);
        app.process_actions(&[InputAction::Resume]);
        assert_eq!(app.game_state(), GameState::Playing);
    }

    #[test]
    fn test_continue_ignored_while_playing() {
        let mut app = app();
        app.process_actions(&[InputAction::Continue]);
        assert_eq!(app.game_state(), GameState::Playing);
    }

    #[test]
    fn test_quit() {
        let mut app = app();
        app.process_actions(&[InputAction::Quit]);
        assert!(!app.running);
    }

    #[test]
    fn test_breach_loses_the_wave() {
        let config = WaveConfig {
            alien_speed: 0.01,
            defense_line: 400.0,
            ..WaveConfig::default()
        };
        let mut app = App::new(config, Some(5), true).unwrap();
        app.update_game(0.016);
        assert_eq!(app.game_state(), GameState::Lost);
        assert!(app.wave().aliens_breached());

        app.process_actions(&[InputAction::Restart]);
        assert_eq!(app.game_state(), GameState::Playing);
        assert!(!app.wave().aliens_breached());
    }

    #[test]
    fn test_invalid_config_fails() {
        let config = WaveConfig {
            alien_variants: Vec::new(),
            ..WaveConfig::default()
        };
        assert!(App::new(config, None, true).is_err());
    }
}

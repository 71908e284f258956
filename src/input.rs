use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

use crate::app::GameState;
use crate::wave::{Key, WaveInput};

/// Application-level actions triggered by a single key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    Pause,
    Resume,
    /// Put a new ship on the field after a life was lost
    Continue,
    Restart,
    Quit,
}

/// Tracks the state of keys that can be held down for continuous input
#[derive(Debug, Default)]
struct KeyState {
    left: bool,
    right: bool,
    up: bool,
    fire: bool,
}

/// Manages input polling and translates raw key events into wave keys and
/// application actions
pub struct InputManager {
    key_state: KeyState,
    oneshot_actions: Vec<InputAction>,
    /// The terminal reports key releases, so held keys stay down until released.
    /// Without release events every press only counts for the frame it arrives in.
    release_events: bool,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new(true)
    }
}

impl InputManager {
    pub fn new(release_events: bool) -> Self {
        Self {
            key_state: KeyState::default(),
            oneshot_actions: Vec::new(),
            release_events,
        }
    }

    /// Polls for all input events and stores one-shot actions
    /// Should be called once per frame before getting actions
    pub fn poll_events(&mut self, game_state: GameState) -> color_eyre::Result<()> {
        self.oneshot_actions.clear();
        if !self.release_events {
            self.key_state = KeyState::default();
        }

        while event::poll(Duration::from_millis(0))? {
            if let Event::Key(key_event) = event::read()? {
                self.handle_key_event(key_event, game_state);
            }
        }

        Ok(())
    }

    /// Processes a key event and updates key state and one-shot actions
    pub fn handle_key_event(&mut self, key_event: KeyEvent, game_state: GameState) {
        match key_event.kind {
            KeyEventKind::Press => self.handle_key_press(key_event, game_state),
            KeyEventKind::Repeat if game_state == GameState::Playing => {
                self.set_held(key_event.code, true)
            }
            KeyEventKind::Repeat => {}
            KeyEventKind::Release => self.set_held(key_event.code, false),
        }
    }

    fn handle_key_press(&mut self, key_event: KeyEvent, game_state: GameState) {
        // Quit works in any state
        if matches!(
            key_event.code,
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc
        ) || (key_event.code == KeyCode::Char('c')
            && key_event.modifiers.contains(KeyModifiers::CONTROL))
        {
            self.oneshot_actions.push(InputAction::Quit);
            return;
        }

        let is_pause_key = matches!(key_event.code, KeyCode::Char('p') | KeyCode::Char('P'));
        match game_state {
            GameState::Playing if is_pause_key => {
                self.oneshot_actions.push(InputAction::Pause);
                return;
            }
            GameState::Paused if is_pause_key => {
                self.oneshot_actions.push(InputAction::Resume);
                return;
            }
            GameState::LifeLost => {
                if matches!(key_event.code, KeyCode::Char(' ') | KeyCode::Enter) {
                    self.oneshot_actions.push(InputAction::Continue);
                }
                return;
            }
            GameState::Won | GameState::Lost => {
                if matches!(key_event.code, KeyCode::Char('r') | KeyCode::Char('R')) {
                    self.oneshot_actions.push(InputAction::Restart);
                }
                return;
            }
            _ => {}
        }

        if game_state == GameState::Playing {
            self.set_held(key_event.code, true);
        }
    }

    fn set_held(&mut self, code: KeyCode, down: bool) {
        match code {
            KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => {
                self.key_state.left = down;
                if down {
                    self.key_state.right = false;
                }
            }
            KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => {
                self.key_state.right = down;
                if down {
                    self.key_state.left = false;
                }
            }
            KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Up => {
                self.key_state.up = down;
            }
            KeyCode::Char(' ') => {
                self.key_state.fire = down;
            }
            _ => {}
        }
    }

    /// One-shot actions collected by the last poll
    pub fn actions(&self) -> &[InputAction] {
        &self.oneshot_actions
    }

    /// Forgets held keys, e.g. when gameplay is interrupted
    pub fn release_all(&mut self) {
        self.key_state = KeyState::default();
    }
}

impl WaveInput for InputManager {
    fn is_key_down(&self, key: Key) -> bool {
        match key {
            Key::Left => self.key_state.left,
            Key::Right => self.key_state.right,
            Key::Up => self.key_state.up,
            Key::Fire => self.key_state.fire,
        }
    }
}

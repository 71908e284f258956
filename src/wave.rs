use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, trace};

use crate::config::WaveConfig;
use crate::entities::{Alien, ExplosionProgress, Formation, Projectile, Ship};
use crate::error::ConfigError;

/// Keys the wave reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Fire,
}

/// Held-key state for one frame
pub trait WaveInput {
    fn is_key_down(&self, key: Key) -> bool;
}

impl WaveInput for [Key] {
    fn is_key_down(&self, key: Key) -> bool {
        self.contains(&key)
    }
}

/// Drawing primitives the wave draws itself with
pub trait WaveView {
    fn draw_alien(&mut self, alien: &Alien);
    fn draw_ship(&mut self, ship: &Ship);
    fn draw_defense_line(&mut self, y: f32, width: f32);
    fn draw_bolt(&mut self, bolt: &Projectile);
}

/// A single wave: the ship, the alien formation and every bolt on screen.
///
/// The wave is advanced with [`Wave::update`] once per frame and never
/// touches anything outside itself. When the wave is over, the caller
/// builds a new one.
#[derive(Debug)]
pub struct Wave<R = StdRng> {
    config: WaveConfig,
    formation: Formation,
    ship: Option<Ship>,
    projectiles: Vec<Projectile>,
    /// Direction of the next formation step
    moving_right: bool,
    /// Seconds between formation steps
    alien_speed: f32,
    /// Formation steps since the last enemy bolt
    steps_taken: u32,
    /// Steps to wait before the next enemy bolt, in `[1, bolt_rate]`
    fire_threshold: u32,
    lives: u32,
    /// An enemy bolt hit the ship and the explosion has not started yet
    ship_hit: bool,
    /// Set when the ship has finished exploding, cleared once a ship moves again
    paused: bool,
    aliens_cleared: bool,
    aliens_breached: bool,
    rng: R,
}

impl Wave<StdRng> {
    /// A full wave with an OS-seeded random source
    pub fn new(config: WaveConfig) -> Result<Self, ConfigError> {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// A full wave whose random choices are fixed by `seed`
    pub fn seeded(config: WaveConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Wave<R> {
    pub fn with_rng(config: WaveConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let formation = Formation::build(&config);
        Ok(Self::assemble(config, formation, rng))
    }

    /// A wave around a prepared formation instead of the configured layout
    pub fn with_formation(
        config: WaveConfig,
        formation: Formation,
        rng: R,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::assemble(config, formation, rng))
    }

    fn assemble(config: WaveConfig, formation: Formation, mut rng: R) -> Self {
        let fire_threshold = roll_fire_threshold(&mut rng, config.bolt_rate);
        Self {
            ship: Some(Ship::new(&config)),
            projectiles: Vec::new(),
            moving_right: true,
            alien_speed: config.alien_speed,
            steps_taken: 0,
            fire_threshold,
            lives: config.ship_lives,
            ship_hit: false,
            paused: false,
            aliens_cleared: formation.all_destroyed(),
            aliens_breached: false,
            formation,
            config,
            rng,
        }
    }

    /// Overrides the seconds between formation steps, for faster waves.
    ///
    /// # Panics
    ///
    /// Panics unless `seconds` is finite and positive.
    pub fn with_alien_speed(mut self, seconds: f32) -> Self {
        assert!(
            seconds.is_finite() && seconds > 0.0,
            "alien step interval must be positive, got {seconds}"
        );
        self.alien_speed = seconds;
        self
    }

    /// Overrides the number of lives the wave starts with
    pub fn with_lives(mut self, lives: u32) -> Self {
        self.lives = lives;
        self
    }

    /// Advances the wave by one frame.
    ///
    /// # Panics
    ///
    /// Panics if `dt` is negative or not finite.
    pub fn update<I: WaveInput + ?Sized>(&mut self, input: &I, dt: f32) {
        assert!(
            dt.is_finite() && dt >= 0.0,
            "frame time must be finite and non-negative, got {dt}"
        );

        self.move_aliens(dt);
        self.fire_alien_bolt();
        self.prune_bolts();
        self.resolve_alien_hits();
        self.resolve_ship_hit();
        self.update_outcome();
        self.fire_player_bolt(input);
        self.update_ship(input, dt);
    }

    /// Draws aliens, ship, defense line and bolts, in that order
    pub fn draw<V: WaveView + ?Sized>(&self, view: &mut V) {
        for alien in self.formation.iter() {
            view.draw_alien(alien);
        }
        if let Some(ship) = &self.ship {
            view.draw_ship(ship);
        }
        view.draw_defense_line(self.config.defense_line, self.config.game_width);
        for bolt in &self.projectiles {
            view.draw_bolt(bolt);
        }
    }

    fn move_aliens(&mut self, dt: f32) {
        let Some(outcome) = self
            .formation
            .step(self.moving_right, dt, self.alien_speed)
        else {
            return;
        };
        trace!(moving_right = outcome.moving_right, "formation stepped");
        if outcome.bounced {
            debug!(moving_right = outcome.moving_right, "formation bounced off a wall");
        }
        self.moving_right = outcome.moving_right;
        self.steps_taken += 1;
    }

    fn fire_alien_bolt(&mut self) {
        if self.steps_taken != self.fire_threshold {
            return;
        }
        if let Some(alien) = self.formation.select_fire_target(&mut self.rng) {
            debug!(x = alien.x, y = alien.y, "alien fired");
            self.projectiles.push(Projectile::enemy(alien, &self.config));
        }
        self.steps_taken = 0;
        self.fire_threshold = roll_fire_threshold(&mut self.rng, self.config.bolt_rate);
    }

    fn prune_bolts(&mut self) {
        let height = self.config.game_height;
        self.projectiles.retain(|bolt| !bolt.is_off_screen(height));
    }

    /// Each alien takes at most one bolt and each bolt destroys at most one alien
    fn resolve_alien_hits(&mut self) {
        for row in 0..self.formation.rows() {
            for col in 0..self.formation.columns() {
                let Some(alien) = self.formation.get(row, col) else {
                    continue;
                };
                let Some(index) = self
                    .projectiles
                    .iter()
                    .position(|bolt| alien.collides_with(bolt))
                else {
                    continue;
                };
                self.projectiles.remove(index);
                self.formation.remove_at(row, col);
                debug!(row, col, "alien destroyed");
            }
        }
    }

    fn resolve_ship_hit(&mut self) {
        let Some(ship) = self.ship.as_ref() else {
            return;
        };
        if ship.is_exploding() {
            return;
        }
        let before = self.projectiles.len();
        self.projectiles.retain(|bolt| !ship.collides_with(bolt));
        if self.projectiles.len() < before {
            info!(lives = self.lives, "ship hit");
            self.ship_hit = true;
        }
    }

    fn update_outcome(&mut self) {
        let cleared = self.formation.all_destroyed();
        if cleared && !self.aliens_cleared {
            info!("all aliens destroyed");
        }
        self.aliens_cleared = cleared;

        if !self.aliens_breached && self.formation.any_breached(self.config.defense_line) {
            info!(
                defense_line = self.config.defense_line,
                "aliens reached the defense line"
            );
            self.aliens_breached = true;
        }
    }

    /// Moves every bolt, then lets the ship fire if none of its bolts is on screen
    fn fire_player_bolt<I: WaveInput + ?Sized>(&mut self, input: &I) {
        let mut player_bolt_on_screen = false;
        for bolt in &mut self.projectiles {
            bolt.advance();
            player_bolt_on_screen |= bolt.is_player_bolt();
        }
        if player_bolt_on_screen {
            return;
        }

        let Some(ship) = self.ship.as_ref().filter(|ship| !ship.is_exploding()) else {
            return;
        };
        if input.is_key_down(Key::Up) || input.is_key_down(Key::Fire) {
            self.projectiles.push(Projectile::player(ship, &self.config));
        }
    }

    fn update_ship<I: WaveInput + ?Sized>(&mut self, input: &I, dt: f32) {
        let Some(ship) = self.ship.as_mut() else {
            return;
        };

        if ship.is_exploding() {
            if ship.advance_explosion(dt) == ExplosionProgress::Done {
                self.ship = None;
                self.lives = self.lives.saturating_sub(1);
                self.ship_hit = false;
                self.paused = true;
                info!(lives = self.lives, "ship destroyed");
            }
        } else if self.ship_hit {
            ship.start_explosion();
        } else {
            let movement = self.config.ship_movement;
            if input.is_key_down(Key::Left) {
                ship.move_by(-movement, self.config.game_width);
            }
            if input.is_key_down(Key::Right) {
                ship.move_by(movement, self.config.game_width);
            }
            self.paused = false;
        }
    }

    /// Puts a fresh ship on the field after a life was lost
    pub fn set_new_ship(&mut self) {
        self.ship = Some(Ship::new(&self.config));
    }

    /// The ship finished exploding and no replacement has moved yet
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    /// Every alien has been destroyed
    pub fn aliens_cleared(&self) -> bool {
        self.aliens_cleared
    }

    /// An alien reached the defense line
    pub fn aliens_breached(&self) -> bool {
        self.aliens_breached
    }

    /// The player can no longer win this wave
    pub fn is_over(&self) -> bool {
        self.aliens_breached || (self.lives == 0 && self.ship.is_none())
    }

    /// Seconds between formation steps
    pub fn alien_step_interval(&self) -> f32 {
        self.alien_speed
    }

    pub fn ship(&self) -> Option<&Ship> {
        self.ship.as_ref()
    }

    pub fn formation(&self) -> &Formation {
        &self.formation
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn config(&self) -> &WaveConfig {
        &self.config
    }
}

fn roll_fire_threshold<R: Rng>(rng: &mut R, bolt_rate: u32) -> u32 {
    rng.random_range(1..=bolt_rate)
}

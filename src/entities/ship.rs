use super::geometry::BoundingBox;
use super::projectile::Projectile;
use crate::config::WaveConfig;

/// What the explosion shows after a given amount of time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExplosionProgress {
    /// Still exploding, showing this animation frame
    Frame(usize),
    /// The explosion has run its full duration
    Done,
}

/// Maps the time since the hit to an animation frame.
///
/// Frames are spread over `[0, frame_count - 1]` across `duration` seconds;
/// once `elapsed` reaches `duration` the explosion is over.
pub fn explosion_progress(elapsed: f32, duration: f32, frame_count: usize) -> ExplosionProgress {
    if elapsed >= duration {
        return ExplosionProgress::Done;
    }
    let last = frame_count.saturating_sub(1);
    let frame = (elapsed / duration * last as f32) as usize;
    ExplosionProgress::Frame(frame.min(last))
}

/// Accumulated state of a running explosion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Explosion {
    elapsed: f32,
    duration: f32,
    frame_count: usize,
}

impl Explosion {
    pub fn new(duration: f32, frame_count: usize) -> Self {
        Self {
            elapsed: 0.0,
            duration,
            frame_count,
        }
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Feeds the time of one frame into the explosion
    pub fn advance(&mut self, dt: f32) -> ExplosionProgress {
        self.elapsed += dt;
        explosion_progress(self.elapsed, self.duration, self.frame_count)
    }
}

#[derive(Debug, Clone)]
pub struct Ship {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Animation frame currently displayed
    pub frame: usize,
    explosion: Option<Explosion>,
    death_speed: f32,
    frame_count: usize,
}

impl Ship {
    /// A ship centered horizontally, resting `ship_bottom` above the floor
    pub fn new(config: &WaveConfig) -> Self {
        Self {
            x: config.game_width / 2.0,
            y: config.ship_bottom + config.ship_height / 2.0,
            width: config.ship_width,
            height: config.ship_height,
            frame: 0,
            explosion: None,
            death_speed: config.death_speed,
            frame_count: config.ship_frames,
        }
    }

    /// Moves horizontally, staying fully inside `[0, playfield_width]`
    pub fn move_by(&mut self, dx: f32, playfield_width: f32) {
        let half = self.width / 2.0;
        self.x = (self.x + dx).clamp(half, (playfield_width - half).max(half));
    }

    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::new(self.x, self.y, self.width, self.height)
    }

    /// Only bolts fired by aliens can hit the ship
    pub fn collides_with(&self, projectile: &Projectile) -> bool {
        !projectile.is_player_bolt() && self.bounds().overlaps(&projectile.bounds())
    }

    pub fn is_exploding(&self) -> bool {
        self.explosion.is_some()
    }

    pub fn explosion(&self) -> Option<&Explosion> {
        self.explosion.as_ref()
    }

    pub fn start_explosion(&mut self) {
        self.frame = 0;
        self.explosion = Some(Explosion::new(self.death_speed, self.frame_count));
    }

    /// Advances a running explosion and updates the displayed frame.
    ///
    /// # Panics
    ///
    /// Panics if no explosion was started.
    pub fn advance_explosion(&mut self, dt: f32) -> ExplosionProgress {
        let explosion = self
            .explosion
            .as_mut()
            .expect("advance_explosion called on a ship that is not exploding");
        let progress = explosion.advance(dt);
        if let ExplosionProgress::Frame(frame) = progress {
            self.frame = frame;
        }
        progress
    }
}

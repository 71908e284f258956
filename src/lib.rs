// Library exports for testing
pub use config::WaveConfig;
pub use entities::{
    Alien, BoundingBox, Explosion, ExplosionProgress, Formation, Projectile, ProjectileOwner,
    Ship, StepOutcome, explosion_progress,
};
pub use error::ConfigError;
pub use wave::{Key, Wave, WaveInput, WaveView};

pub mod app;
pub mod config;
pub mod entities;
pub mod error;
pub mod input;
pub mod renderer;
pub mod wave;

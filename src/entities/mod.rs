mod alien;
mod formation;
mod geometry;
mod projectile;
mod ship;

// Re-export all public types
pub use alien::Alien;
pub use formation::{Formation, StepOutcome};
pub use geometry::BoundingBox;
pub use projectile::{Projectile, ProjectileOwner};
pub use ship::{Explosion, ExplosionProgress, Ship, explosion_progress};

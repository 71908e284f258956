use super::geometry::BoundingBox;
use super::projectile::Projectile;

#[derive(Debug, Clone, PartialEq)]
pub struct Alien {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Index into the configured list of visual variants
    pub variant: usize,
}

impl Alien {
    pub fn new(x: f32, y: f32, width: f32, height: f32, variant: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            variant,
        }
    }

    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::new(self.x, self.y, self.width, self.height)
    }

    /// Only bolts fired by the player can hit an alien
    pub fn collides_with(&self, projectile: &Projectile) -> bool {
        projectile.is_player_bolt() && self.bounds().overlaps(&projectile.bounds())
    }

    pub fn bottom(&self) -> f32 {
        self.y - self.height / 2.0
    }
}

use super::alien::Alien;
use super::geometry::BoundingBox;
use super::ship::Ship;
use crate::config::WaveConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectileOwner {
    Player,
    Enemy,
}

/// A laser bolt. Velocity and owner never change after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    velocity: f32,
    owner: ProjectileOwner,
}

impl Projectile {
    pub fn new(
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        velocity: f32,
        owner: ProjectileOwner,
    ) -> Self {
        Self {
            x,
            y,
            width,
            height,
            velocity,
            owner,
        }
    }

    /// Bolt fired upward from just above the ship
    pub fn player(ship: &Ship, config: &WaveConfig) -> Self {
        Self::new(
            ship.x,
            ship.y + ship.height / 2.0 + config.bolt_height / 2.0,
            config.bolt_width,
            config.bolt_height,
            config.bolt_speed,
            ProjectileOwner::Player,
        )
    }

    /// Bolt fired downward from just below an alien
    pub fn enemy(alien: &Alien, config: &WaveConfig) -> Self {
        Self::new(
            alien.x,
            alien.y - alien.height / 2.0 - config.bolt_height / 2.0,
            config.bolt_width,
            config.bolt_height,
            -config.bolt_speed,
            ProjectileOwner::Enemy,
        )
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn owner(&self) -> ProjectileOwner {
        self.owner
    }

    pub fn is_player_bolt(&self) -> bool {
        self.owner == ProjectileOwner::Player
    }

    pub fn advance(&mut self) {
        self.y += self.velocity;
    }

    /// True once the bolt has left the playfield through the top or bottom
    pub fn is_off_screen(&self, playfield_height: f32) -> bool {
        self.y > playfield_height || self.y + self.height / 2.0 < 0.0
    }

    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::new(self.x, self.y, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bolt(y: f32, owner: ProjectileOwner) -> Projectile {
        let velocity = match owner {
            ProjectileOwner::Player => 10.0,
            ProjectileOwner::Enemy => -10.0,
        };
        Projectile::new(100.0, y, 4.0, 16.0, velocity, owner)
    }

    #[test]
    fn test_projectile_new() {
        let projectile = bolt(50.0, ProjectileOwner::Player);
        assert_eq!(projectile.x, 100.0);
        assert_eq!(projectile.y, 50.0);
        assert_eq!(projectile.owner(), ProjectileOwner::Player);
        assert!(projectile.is_player_bolt());
    }

    #[test]
    fn test_player_projectile_moves_up() {
        let mut projectile = bolt(50.0, ProjectileOwner::Player);
        projectile.advance();
        assert_eq!(projectile.y, 60.0);
    }

    #[test]
    fn test_enemy_projectile_moves_down() {
        let mut projectile = bolt(50.0, ProjectileOwner::Enemy);
        projectile.advance();
        assert_eq!(projectile.y, 40.0);
        assert!(!projectile.is_player_bolt());
    }

    #[test]
    fn test_projectile_off_screen_top() {
        assert!(!bolt(700.0, ProjectileOwner::Player).is_off_screen(700.0));
        assert!(bolt(701.0, ProjectileOwner::Player).is_off_screen(700.0));
    }

    #[test]
    fn test_projectile_off_screen_bottom() {
        // still partly visible while the top half is above zero
        assert!(!bolt(-8.0, ProjectileOwner::Enemy).is_off_screen(700.0));
        assert!(bolt(-8.5, ProjectileOwner::Enemy).is_off_screen(700.0));
    }

    #[test]
    fn test_player_bolt_spawns_above_ship() {
        let config = WaveConfig::default();
        let ship = Ship::new(&config);
        let projectile = Projectile::player(&ship, &config);
        assert_eq!(projectile.x, ship.x);
        assert_eq!(projectile.y, ship.y + 22.0 + 8.0);
        assert_eq!(projectile.velocity(), config.bolt_speed);
    }

    #[test]
    fn test_enemy_bolt_spawns_below_alien() {
        let config = WaveConfig::default();
        let alien = Alien::new(200.0, 400.0, 33.0, 33.0, 0);
        let projectile = Projectile::enemy(&alien, &config);
        assert_eq!(projectile.x, 200.0);
        assert_eq!(projectile.y, 400.0 - 16.5 - 8.0);
        assert_eq!(projectile.velocity(), -config.bolt_speed);
        assert_eq!(projectile.owner(), ProjectileOwner::Enemy);
    }

    // Property-based tests
    #[cfg(test)]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_projectile_moves_in_correct_direction(
                initial_y in 0.0f32..700.0,
                owner in prop::sample::select(vec![ProjectileOwner::Player, ProjectileOwner::Enemy])
            ) {
                let mut projectile = bolt(initial_y, owner);
                projectile.advance();

                match owner {
                    ProjectileOwner::Player => prop_assert!(projectile.y > initial_y),
                    ProjectileOwner::Enemy => prop_assert!(projectile.y < initial_y),
                }
            }
        }
    }
}

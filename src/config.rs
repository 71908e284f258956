use serde::Deserialize;
use std::path::Path;

use crate::error::ConfigError;

/// Every tunable constant of a wave.
///
/// Coordinates are in playfield units with the origin at the bottom-left
/// corner and `y` growing upward. Missing keys in a TOML file fall back to
/// the defaults below.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WaveConfig {
    /// Playfield dimensions
    pub game_width: f32,
    pub game_height: f32,

    /// Ship geometry, speed and lives
    pub ship_width: f32,
    pub ship_height: f32,
    /// Gap between the bottom of the playfield and the bottom of the ship
    pub ship_bottom: f32,
    /// Horizontal distance travelled per frame while a direction key is held
    pub ship_movement: f32,
    pub ship_lives: u32,
    /// Number of frames in the explosion strip
    pub ship_frames: usize,

    /// Alien geometry and layout
    pub alien_width: f32,
    pub alien_height: f32,
    pub alien_h_sep: f32,
    pub alien_v_sep: f32,
    /// Gap between the top of the playfield and the top alien row
    pub alien_ceiling: f32,
    pub alien_rows: usize,
    pub aliens_in_row: usize,
    /// Horizontal distance of one formation step
    pub alien_h_walk: f32,
    /// Seconds between formation steps
    pub alien_speed: f32,

    /// Bolt geometry and speed
    pub bolt_width: f32,
    pub bolt_height: f32,
    pub bolt_speed: f32,
    /// Upper bound (inclusive) of formation steps between enemy bolts
    pub bolt_rate: u32,

    /// Height of the line the aliens must not reach
    pub defense_line: f32,
    /// Seconds the ship explosion takes
    pub death_speed: f32,

    /// Ordered visual variants, assigned two rows at a time
    pub alien_variants: Vec<String>,
}

impl Default for WaveConfig {
    fn default() -> Self {
        let alien_width = 33.0;
        Self {
            game_width: 800.0,
            game_height: 700.0,
            ship_width: 44.0,
            ship_height: 44.0,
            ship_bottom: 32.0,
            ship_movement: 5.0,
            ship_lives: 3,
            ship_frames: 8,
            alien_width,
            alien_height: 33.0,
            alien_h_sep: 16.0,
            alien_v_sep: 16.0,
            alien_ceiling: 100.0,
            alien_rows: 5,
            aliens_in_row: 12,
            alien_h_walk: (alien_width / 4.0).floor(),
            alien_speed: 1.0,
            bolt_width: 4.0,
            bolt_height: 16.0,
            bolt_speed: 10.0,
            bolt_rate: 5,
            defense_line: 100.0,
            death_speed: 0.3,
            alien_variants: vec!["alien1".into(), "alien2".into(), "alien3".into()],
        }
    }
}

impl WaveConfig {
    /// Parse a config from TOML text and validate it
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Checks the invariants the simulation relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("game_width", self.game_width),
            ("game_height", self.game_height),
            ("ship_width", self.ship_width),
            ("ship_height", self.ship_height),
            ("alien_width", self.alien_width),
            ("alien_height", self.alien_height),
            ("alien_speed", self.alien_speed),
            ("bolt_width", self.bolt_width),
            ("bolt_height", self.bolt_height),
            ("bolt_speed", self.bolt_speed),
            ("death_speed", self.death_speed),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }

        let non_negative = [
            ("ship_bottom", self.ship_bottom),
            ("ship_movement", self.ship_movement),
            ("alien_h_sep", self.alien_h_sep),
            ("alien_v_sep", self.alien_v_sep),
            ("alien_ceiling", self.alien_ceiling),
            ("alien_h_walk", self.alien_h_walk),
            ("defense_line", self.defense_line),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be zero or positive, got {value}"
                )));
            }
        }

        if self.alien_rows == 0 || self.aliens_in_row == 0 {
            return Err(ConfigError::Invalid(
                "the formation needs at least one row and one column".into(),
            ));
        }
        if self.bolt_rate == 0 {
            return Err(ConfigError::Invalid("bolt_rate must be at least 1".into()));
        }
        if self.ship_frames == 0 {
            return Err(ConfigError::Invalid("ship_frames must be at least 1".into()));
        }
        if self.alien_variants.is_empty() {
            return Err(ConfigError::Invalid(
                "alien_variants must name at least one variant".into(),
            ));
        }
        // the formation bounces off a wall alien_h_sep short of each edge
        let room = self.game_width - 2.0 * self.alien_h_sep;
        if self.formation_width() > room {
            return Err(ConfigError::Invalid(format!(
                "{} aliens per row need {} units but only {} fit between the wall margins",
                self.aliens_in_row,
                self.formation_width(),
                room
            )));
        }
        Ok(())
    }

    /// Width of a full alien row including the separation between aliens
    pub fn formation_width(&self) -> f32 {
        let columns = self.aliens_in_row as f32;
        columns * self.alien_width + (columns - 1.0).max(0.0) * self.alien_h_sep
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = WaveConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.alien_h_walk, 8.0);
        assert_eq!(config.alien_variants.len(), 3);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = WaveConfig::from_toml_str("alien_rows = 2\nship_lives = 5\n").unwrap();
        assert_eq!(config.alien_rows, 2);
        assert_eq!(config.ship_lives, 5);
        assert_eq!(config.game_width, 800.0);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let err = WaveConfig::from_toml_str("alien_colour = \"green\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_zero_bolt_rate_is_invalid() {
        let err = WaveConfig::from_toml_str("bolt_rate = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_formation_wider_than_playfield_is_invalid() {
        let config = WaveConfig {
            aliens_in_row: 40,
            ..WaveConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_formation_must_leave_wall_margins() {
        let fits = WaveConfig {
            game_width: 200.0,
            alien_width: 20.0,
            alien_h_sep: 10.0,
            aliens_in_row: 6,
            ..WaveConfig::default()
        };
        assert!(fits.validate().is_ok());

        // exactly as wide as the playfield, leaving no margin at either wall
        let touching = WaveConfig {
            aliens_in_row: 7,
            ..fits
        };
        assert_eq!(touching.formation_width(), 200.0);
        assert!(matches!(touching.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = WaveConfig::load("/definitely/not/here.toml").unwrap_err();
        match err {
            ConfigError::Read { path, .. } => {
                assert!(path.ends_with("here.toml"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}

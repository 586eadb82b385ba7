//! Optional TOML configuration.
//!
//! ```toml
//! tick_ms = 20
//! sound = false
//!
//! [physics]
//! gravity = 0.8
//! gap_size = 170
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::sim::Physics;

/// Environment variable holding the path of the config file.
pub const CONFIG_ENV: &str = "FLAPPY_CONFIG";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Simulation tick interval.
    pub tick_ms: u64,
    /// Render interval.
    pub frame_ms: u64,
    pub sound: bool,
    pub physics: Physics,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_ms: 20,
            frame_ms: 33, // ~30 fps
            sound: true,
            physics: Physics::default(),
        }
    }
}

impl Config {
    /// Loads the file named by `FLAPPY_CONFIG`, or the defaults if unset.
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text, path)
    }

    /// Parses and validates `text`; `origin` only shows up in errors.
    pub fn parse(text: &str, origin: &Path) -> Result<Self> {
        let config: Config = toml::from_str(text).map_err(|source| Error::ConfigParse {
            path: origin.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let p = &self.physics;
        let invalid = |detail: String| Err(Error::InvalidConfig { detail });

        if self.tick_ms == 0 {
            return invalid("tick_ms must be positive".into());
        }
        if self.frame_ms == 0 {
            return invalid("frame_ms must be positive".into());
        }
        if p.gap_top_min >= p.gap_top_max {
            return invalid(format!(
                "gap top range [{}, {}) is empty",
                p.gap_top_min, p.gap_top_max
            ));
        }
        if p.gap_top_min < 0 || f64::from(p.gap_top_max) + f64::from(p.gap_size) > p.ground_y {
            return invalid("gap must lie between the ceiling and the ground".into());
        }
        if p.gap_size <= 0 || p.obstacle_width <= 0.0 || p.window_width <= 0.0 {
            return invalid("gap_size, obstacle_width and window_width must be positive".into());
        }
        if p.ground_y > p.window_height {
            return invalid("ground_y lies below the window".into());
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<Config> {
        Config::parse(text, Path::new("test.toml"))
    }

    #[test]
    fn empty_file_gives_defaults() {
        let config = parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.tick_interval(), Duration::from_millis(20));
        assert_eq!(config.physics.lift, -10.0);
    }

    #[test]
    fn partial_physics_override() {
        let config = parse("sound = false\n[physics]\ngravity = 0.5\ngap_size = 160\n").unwrap();
        assert!(!config.sound);
        assert_eq!(config.physics.gravity, 0.5);
        assert_eq!(config.physics.gap_size, 160);
        assert_eq!(config.physics.pipe_speed, 4.0);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = parse("tick = 5").unwrap_err();
        assert!(matches!(err, Error::ConfigParse { .. }));
        assert!(err.to_string().starts_with("parse error in test.toml"));
    }

    #[test]
    fn zero_tick_is_invalid() {
        let err = parse("tick_ms = 0").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }));
    }

    #[test]
    fn empty_gap_range_is_invalid() {
        let err = parse("[physics]\ngap_top_min = 300\ngap_top_max = 300\n").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid configuration: gap top range [300, 300) is empty"
        );
    }

    #[test]
    fn huge_gap_bounds_are_rejected_not_wrapped() {
        let err = parse("[physics]\ngap_top_max = 2147483647\ngap_size = 1\n").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid configuration: gap must lie between the ceiling and the ground"
        );
    }

    #[test]
    fn gap_below_ground_is_invalid() {
        let err = parse("[physics]\ngap_size = 300\n").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }));
    }
}

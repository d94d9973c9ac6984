//! Configuration for the background animations.
//!
//! All defaults match the compiled-in look: 100 cyan particles drifting in a
//! ±5 cube, linked within 2 units, with a slow constant spin. Configs can be
//! loaded from JSON; missing fields fall back to these defaults.
//!
//! ```json
//! {
//!   "kind": "constellation",
//!   "field": { "particle_count": 400, "strategy": "uniform_grid", "seed": 7 }
//! }
//! ```

use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::proximity::ConnectionStrategy;
use crate::scene::RotationRate;

/// Neon cyan shared by the particle field and the globe.
pub const CYAN: u32 = 0x00f0ff;
/// Glyph-rain green.
pub const NEON_GREEN: u32 = 0x0aff68;

/// Which animation to run.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AnimationKind {
    /// Drifting particles linked into a proximity graph.
    #[default]
    Constellation,
    /// Rotating wireframe sphere with a point shell.
    Globe,
    /// Falling glyph columns.
    Rain,
}

impl FromStr for AnimationKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "constellation" | "field" => Ok(AnimationKind::Constellation),
            "globe" => Ok(AnimationKind::Globe),
            "rain" | "matrix" => Ok(AnimationKind::Rain),
            other => Err(ConfigError::Invalid(format!("unknown animation kind '{}'", other))),
        }
    }
}

/// Particle field parameters.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FieldConfig {
    /// Number of particles, fixed for the lifetime of the field.
    pub particle_count: usize,
    /// Half-width of the bounding cube.
    pub bounds: f32,
    /// Pairs strictly closer than this are connected.
    pub connection_radius: f32,
    /// Largest initial velocity component.
    pub max_speed: f32,
    /// Per-tick scene rotation.
    pub rotation: RotationRate,
    /// Camera distance along +Z.
    pub camera_distance: f32,
    /// `0xRRGGBB` colour for points and lines.
    pub color: u32,
    pub point_size: f32,
    pub point_opacity: f32,
    pub line_opacity: f32,
    /// How connections are searched for.
    pub strategy: ConnectionStrategy,
    /// Fixed seed for reproducible spawning.
    pub seed: Option<u64>,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            particle_count: 100,
            bounds: 5.0,
            connection_radius: 2.0,
            max_speed: 0.005,
            rotation: RotationRate::new(0.0005, 0.001),
            camera_distance: 5.0,
            color: CYAN,
            point_size: 0.05,
            point_opacity: 0.8,
            line_opacity: 0.1,
            strategy: ConnectionStrategy::BruteForce,
            seed: None,
        }
    }
}

impl FieldConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of particles.
    pub fn with_particle_count(mut self, count: usize) -> Self {
        self.particle_count = count;
        self
    }

    /// Set the bounding cube half-size (cube from -bounds to +bounds).
    pub fn with_bounds(mut self, bounds: f32) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn with_connection_radius(mut self, radius: f32) -> Self {
        self.connection_radius = radius;
        self
    }

    pub fn with_max_speed(mut self, max_speed: f32) -> Self {
        self.max_speed = max_speed;
        self
    }

    pub fn with_strategy(mut self, strategy: ConnectionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.particle_count == 0 {
            return Err(ConfigError::Invalid("field.particle_count must be > 0".into()));
        }
        if !(self.bounds > 0.0) {
            return Err(ConfigError::Invalid("field.bounds must be > 0".into()));
        }
        if !(self.connection_radius > 0.0) {
            return Err(ConfigError::Invalid("field.connection_radius must be > 0".into()));
        }
        if !(self.max_speed >= 0.0) {
            return Err(ConfigError::Invalid("field.max_speed must be >= 0".into()));
        }
        Ok(())
    }
}

/// Holo-globe parameters.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GlobeConfig {
    /// Wireframe sphere radius.
    pub radius: f32,
    /// Icosphere subdivision level of the wireframe.
    pub detail: u32,
    /// Point shell radius, slightly outside the wireframe.
    pub shell_radius: f32,
    /// Icosphere subdivision level of the point shell.
    pub shell_detail: u32,
    pub rotation: RotationRate,
    pub camera_distance: f32,
    pub color: u32,
    pub wire_opacity: f32,
    pub point_size: f32,
    pub point_opacity: f32,
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            radius: 1.5,
            detail: 12,
            shell_radius: 1.51,
            shell_detail: 15,
            rotation: RotationRate::new(0.0005, 0.002),
            camera_distance: 4.0,
            color: CYAN,
            wire_opacity: 0.15,
            point_size: 0.02,
            point_opacity: 0.6,
        }
    }
}

impl GlobeConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.radius > 0.0) || !(self.shell_radius > 0.0) {
            return Err(ConfigError::Invalid("globe radii must be > 0".into()));
        }
        // 10 * (d + 1)^2 + 2 vertices; keep index math in u32
        if self.detail > 256 || self.shell_detail > 256 {
            return Err(ConfigError::Invalid("globe detail must be <= 256".into()));
        }
        Ok(())
    }
}

/// Glyph-rain parameters.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RainConfig {
    /// Glyph cell size in pixels.
    pub font_size: u32,
    /// Chance per tick that a drop past the bottom restarts at the top.
    pub reset_chance: f64,
    /// Chance per glyph of drawing in the highlight colour.
    pub highlight_chance: f64,
    pub color: u32,
    pub highlight_color: u32,
    pub camera_distance: f32,
    pub seed: Option<u64>,
}

impl Default for RainConfig {
    fn default() -> Self {
        Self {
            font_size: 16,
            reset_chance: 0.025,
            highlight_chance: 0.05,
            color: NEON_GREEN,
            highlight_color: CYAN,
            camera_distance: 5.0,
            seed: None,
        }
    }
}

impl RainConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.font_size == 0 {
            return Err(ConfigError::Invalid("rain.font_size must be > 0".into()));
        }
        let chances = [
            ("reset_chance", self.reset_chance),
            ("highlight_chance", self.highlight_chance),
        ];
        for (name, p) in chances {
            if !(0.0..=1.0).contains(&p) {
                return Err(ConfigError::Invalid(format!("rain.{} must be within [0, 1]", name)));
            }
        }
        Ok(())
    }
}

/// Complete background configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BackgroundConfig {
    pub kind: AnimationKind,
    pub field: FieldConfig,
    pub globe: GlobeConfig,
    pub rain: RainConfig,
}

impl BackgroundConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Save the configuration as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Validate every section, not only the selected one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.field.validate()?;
        self.globe.validate()?;
        self.rain.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_compiled_constants() {
        let config = BackgroundConfig::default();
        assert_eq!(config.kind, AnimationKind::Constellation);
        assert_eq!(config.field.particle_count, 100);
        assert_eq!(config.field.bounds, 5.0);
        assert_eq!(config.field.connection_radius, 2.0);
        assert_eq!(config.field.rotation, RotationRate::new(0.0005, 0.001));
        assert_eq!(config.globe.rotation, RotationRate::new(0.0005, 0.002));
        assert_eq!(config.rain.font_size, 16);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = BackgroundConfig::from_json(
            r#"{ "kind": "globe",
                "field": { "particle_count": 400, "strategy": "uniform_grid" } }"#,
        )
        .unwrap();
        assert_eq!(config.kind, AnimationKind::Globe);
        assert_eq!(config.field.particle_count, 400);
        assert_eq!(config.field.strategy, ConnectionStrategy::UniformGrid);
        assert_eq!(config.field.connection_radius, 2.0);
        assert_eq!(config.globe, GlobeConfig::default());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = BackgroundConfig::from_json(r#"{ "field": { "connection_radius": 0.0 } }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err =
            BackgroundConfig::from_json(r#"{ "rain": { "reset_chance": 1.5 } }"#).unwrap_err();
        assert!(format!("{}", err).contains("reset_chance"));

        assert!(FieldConfig::new().with_particle_count(0).validate().is_err());
        assert!(FieldConfig::new().with_bounds(-1.0).validate().is_err());
    }

    #[test]
    fn test_malformed_json_is_json_error() {
        let err = BackgroundConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_json_roundtrip() {
        let config = BackgroundConfig {
            kind: AnimationKind::Rain,
            field: FieldConfig::new().with_seed(9).with_connection_radius(1.5),
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(BackgroundConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join("constellation_save_then_load.json");
        let config = BackgroundConfig {
            kind: AnimationKind::Globe,
            globe: GlobeConfig {
                detail: 3,
                ..Default::default()
            },
            ..Default::default()
        };

        config.save(&path).unwrap();
        let loaded = BackgroundConfig::load(&path);
        let _ = fs::remove_file(&path);
        assert_eq!(loaded.unwrap(), config);
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("Globe".parse::<AnimationKind>().unwrap(), AnimationKind::Globe);
        assert_eq!("matrix".parse::<AnimationKind>().unwrap(), AnimationKind::Rain);
        assert!("cube".parse::<AnimationKind>().is_err());
    }
}

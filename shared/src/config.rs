use serde::{Deserialize, Serialize};

use crate::{Easing, Vector};

/// Errors concerning an [`EmissionConfig`].
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ConfigError(pub String);

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConfigError {}

impl From<serde_json::Error> for ConfigError {
    fn from(error: serde_json::Error) -> Self {
        ConfigError(format!("malformed emitter config: {error}"))
    }
}

/// A horizontal strip of equally sized animation frames.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SpriteSheet {
    /// Key of the texture in the host's texture registry.
    pub texture: String,
    /// Number of frames laid out left to right.
    pub max_frames: u32,
    /// Width of a single frame in pixels.
    pub frame_width: u32,
    /// Height of a single frame in pixels.
    pub frame_height: u32,
    /// Curve over which the frames play. Linear when omitted.
    #[serde(default)]
    pub easing: Easing,
}

impl Default for SpriteSheet {
    fn default() -> Self {
        Self {
            texture: String::new(),
            max_frames: 1,
            frame_width: 1,
            frame_height: 1,
            easing: Easing::Linear,
        }
    }
}

/// Half-extents of the rectangular spawn footprint around the emitter origin.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct EmissionShape {
    pub x: i32,
    pub y: i32,
}

/// Parameters for every particle an emitter spawns, and the emission policy itself.
///
/// All fields except the sprite easing are required when parsed; there is no merging with defaults.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct EmissionConfig {
    /// Sprite drawn for each particle.
    pub sprite: SpriteSheet,
    /// Base travel direction before spread.
    pub direction: Vector,
    /// Initial speed along the spread direction.
    pub velocity: f64,
    /// Vertical acceleration.
    pub gravity: f64,
    /// Full cone of random deviation around `direction`, in degrees.
    pub spread: f64,
    /// Render scale, or its upper bound when `random_scale` is set.
    pub scale: f64,
    /// Draw an integer scale in `1..=scale` instead of using `scale` directly.
    pub random_scale: bool,
    /// Initial rotation in degrees, or the half-range when `random_angle` is set.
    pub angle: f64,
    /// Draw an integer angle in `-angle..=angle` instead of using `angle` directly.
    pub random_angle: bool,
    /// Rotation rate in degrees per second.
    pub angular_velocity: f64,
    /// Seconds each particle lives.
    pub lifetime: f64,
    /// Spawn jitter around the origin.
    pub emission_shape: EmissionShape,
    /// Fill the active set once and never refill.
    pub oneshot: bool,
    /// Fill the active set within a single tick.
    pub explosive: bool,
    /// Capacity of the emitter's active set.
    pub max_particles: usize,
}

impl EmissionConfig {
    /// Parses and validates a JSON emitter preset.
    pub fn from_json(json: &str) -> Result<EmissionConfig, ConfigError> {
        let config: EmissionConfig = serde_json::from_str(json)?;
        config.validate()?;

        Ok(config)
    }

    /// Dead particles in the active set are re-initialised in place while emitting.
    pub fn recycles(&self) -> bool {
        !self.explosive && !self.oneshot
    }

    /// Seconds between individual spawns under continuous emission.
    pub fn spawn_interval(&self) -> f64 {
        self.lifetime / self.max_particles as f64
    }

    /// Checks every field once so per-tick code never meets garbage state.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sprite = &self.sprite;

        if sprite.texture.is_empty() {
            return Err(ConfigError("sprite texture key is empty".to_string()));
        }

        if sprite.max_frames == 0 {
            return Err(ConfigError("sprite needs at least one frame".to_string()));
        }

        if sprite.frame_width == 0 || sprite.frame_height == 0 {
            return Err(ConfigError(format!(
                "sprite frame size {}x{} is empty",
                sprite.frame_width, sprite.frame_height
            )));
        }

        if !self.direction.is_finite() || self.direction.length() == 0.0 {
            return Err(ConfigError(format!(
                "direction ({}, {}) is not a usable vector",
                self.direction.x, self.direction.y
            )));
        }

        for (name, value) in [
            ("velocity", self.velocity),
            ("gravity", self.gravity),
            ("angle", self.angle),
            ("angular velocity", self.angular_velocity),
        ] {
            if !value.is_finite() {
                return Err(ConfigError(format!("{name} {value} is not finite")));
            }
        }

        if !(0.0..=360.0).contains(&self.spread) {
            return Err(ConfigError(format!(
                "spread {} lies outside 0..=360 degrees",
                self.spread
            )));
        }

        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(ConfigError(format!("scale {} must be positive", self.scale)));
        }

        if !(self.lifetime.is_finite() && self.lifetime > 0.0) {
            return Err(ConfigError(format!(
                "lifetime {} must be positive",
                self.lifetime
            )));
        }

        if self.emission_shape.x < 0 || self.emission_shape.y < 0 {
            return Err(ConfigError(format!(
                "emission shape ({}, {}) has a negative extent",
                self.emission_shape.x, self.emission_shape.y
            )));
        }

        if self.max_particles == 0 {
            return Err(ConfigError("max particles must be at least one".to_string()));
        }

        Ok(())
    }
}

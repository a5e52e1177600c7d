use std::{
    ops::{Add, AddAssign, Mul},
    str::FromStr,
};

use rand_chacha::rand_core::RngCore;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Two-dimensional vector in canvas space. `y` grows downwards.
#[derive(PartialEq, Clone, Copy, Debug, Serialize, Deserialize, Default)]
pub struct Vector {
    /// Horizontal component.
    pub x: f64,
    /// Vertical component.
    pub y: f64,
}

impl Vector {
    /// Instantiates a [`Vector`].
    pub const fn new(x: f64, y: f64) -> Vector {
        Vector { x, y }
    }

    /// Rotates the [`Vector`] by `theta` radians using the standard rotation matrix.
    pub fn rotate(&self, theta: f64) -> Vector {
        let (sin, cos) = theta.sin_cos();

        Vector {
            x: self.x * cos - self.y * sin,
            y: self.x * sin + self.y * cos,
        }
    }

    /// Euclidean length.
    pub fn length(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Both components are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vector {
    type Output = Vector;

    fn add(self, rhs: Self) -> Self::Output {
        Vector::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vector {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Mul<f64> for Vector {
    type Output = Vector;

    fn mul(self, rhs: f64) -> Self::Output {
        Vector::new(self.x * rhs, self.y * rhs)
    }
}

impl From<(f64, f64)> for Vector {
    fn from((x, y): (f64, f64)) -> Self {
        Vector::new(x, y)
    }
}

/// Uniform random integer in `min..=max`. Bounds are swapped if given in reverse.
pub fn random_int(rng: &mut impl RngCore, min: i32, max: i32) -> i32 {
    let (min, max) = if min <= max { (min, max) } else { (max, min) };
    let span = (max as i64 - min as i64 + 1) as u64;

    (min as i64 + (rng.next_u64() % span) as i64) as i32
}

/// Uniform random float in `0.0..1.0`.
pub fn random_unit(rng: &mut impl RngCore) -> f64 {
    // Top 53 bits fill the mantissa exactly.
    (rng.next_u64() >> 11) as f64 / (1u64 << 53) as f64
}

/// Converts degrees to radians.
pub fn to_radians(degrees: f64) -> f64 {
    degrees * std::f64::consts::PI / 180.0
}

/// Easing curve applied to the interpolation parameter of [`lerp`].
///
/// Serialised by name, see [`Easing::name`].
#[derive(PartialEq, Eq, Clone, Copy, Debug, Serialize, Deserialize, Default)]
#[serde(try_from = "String", into = "String")]
pub enum Easing {
    /// Identity curve.
    #[default]
    Linear,
    /// Quadratic acceleration from zero velocity.
    EaseInQuad,
    /// Quadratic deceleration to zero velocity.
    EaseOutQuad,
    /// Cubic acceleration from zero velocity.
    EaseInCubic,
    /// Cubic deceleration to zero velocity.
    EaseOutCubic,
    /// Cubic acceleration until halfway, then deceleration.
    EaseInOutCubic,
}

impl Easing {
    /// Maps `t` in `0..=1` through the curve.
    pub fn apply(&self, t: f64) -> f64 {
        match self {
            Easing::Linear => t,
            Easing::EaseInQuad => t * t,
            Easing::EaseOutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseInCubic => t * t * t,
            Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Easing::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }

    /// Name used in presets.
    pub fn name(&self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::EaseInQuad => "easeInQuad",
            Easing::EaseOutQuad => "easeOutQuad",
            Easing::EaseInCubic => "easeInCubic",
            Easing::EaseOutCubic => "easeOutCubic",
            Easing::EaseInOutCubic => "easeInOutCubic",
        }
    }
}

impl TryFrom<String> for Easing {
    type Error = ConfigError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        name.parse()
    }
}

impl From<Easing> for String {
    fn from(easing: Easing) -> Self {
        easing.name().to_string()
    }
}

impl FromStr for Easing {
    type Err = ConfigError;

    /// The empty name is linear.
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "" | "linear" => Ok(Easing::Linear),
            "easeInQuad" => Ok(Easing::EaseInQuad),
            "easeOutQuad" => Ok(Easing::EaseOutQuad),
            "easeInCubic" => Ok(Easing::EaseInCubic),
            "easeOutCubic" => Ok(Easing::EaseOutCubic),
            "easeInOutCubic" => Ok(Easing::EaseInOutCubic),
            _ => Err(ConfigError(format!("unknown easing `{name}`"))),
        }
    }
}

/// Interpolates from `a` to `b`. `t` is clamped to `0..=1` before easing, so the result never leaves `a..=b`.
pub fn lerp(a: f64, b: f64, t: f64, easing: Easing) -> f64 {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };

    a + (b - a) * easing.apply(t)
}

//! Direction and unit-sphere coordinate types

use std::fmt;
use std::ops::Add;

use serde::{Deserialize, Serialize};

use crate::binaural::StereoBuffer;
use crate::error::{SpatialError, SpatialResult};

/// Decimal places kept by the Cartesian projection
const CARTESIAN_DECIMALS: f64 = 1e6;

/// Angles compare at the precision of the stored filenames (0.1 degree)
const KEY_SCALE: f64 = 10.0;

/// Wrap an azimuth into [0, 360)
pub fn normalize_azimuth(azimuth: f64) -> f64 {
    let wrapped = azimuth.rem_euclid(360.0);
    // rem_euclid of a tiny negative value rounds up to 360.0
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Wrap an elevation into [-180, 180) so 350 reads as -10
fn wrap_elevation(elevation: f64) -> f64 {
    if (-180.0..180.0).contains(&elevation) {
        return elevation;
    }
    let wrapped = (elevation + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped >= 180.0 { -180.0 } else { wrapped }
}

/// Fold an elevation into [-90, 90]; going over a pole turns the azimuth around
fn fold_elevation(azimuth: f64, elevation: f64) -> (f64, f64) {
    let elevation = wrap_elevation(elevation);
    if elevation > 90.0 {
        (azimuth + 180.0, 180.0 - elevation)
    } else if elevation < -90.0 {
        (azimuth + 180.0, -180.0 - elevation)
    } else {
        (azimuth, elevation)
    }
}

fn round_component(value: f64) -> f64 {
    let rounded = (value * CARTESIAN_DECIMALS).round() / CARTESIAN_DECIMALS;
    // avoid -0.0 so equal points compare equal bit-for-bit in debug output
    if rounded == 0.0 { 0.0 } else { rounded }
}

/// Direction relative to the listener
///
/// Azimuth is in degrees in [0, 360), elevation in degrees from the horizon
/// (-90 to 90, positive = up).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Direction {
    /// Horizontal angle in degrees, [0, 360)
    pub azimuth: f64,
    /// Vertical angle in degrees, positive = up
    pub elevation: f64,
}

impl Direction {
    /// Create a direction, wrapping negative or >= 360 azimuths
    ///
    /// Elevations past a pole are folded back into [-90, 90] on the opposite
    /// side, so (0, 100) is the same direction as (180, 80).
    pub fn new(azimuth: f64, elevation: f64) -> Self {
        let (azimuth, elevation) = fold_elevation(azimuth, elevation);
        Self {
            azimuth: normalize_azimuth(azimuth),
            elevation,
        }
    }

    /// Create from values already in canonical range (static tables)
    pub const fn from_normalized(azimuth: f64, elevation: f64) -> Self {
        Self { azimuth, elevation }
    }

    /// Front centre
    pub const fn front() -> Self {
        Self::from_normalized(0.0, 0.0)
    }

    /// Same azimuth on another elevation plane
    pub fn with_elevation(&self, elevation: f64) -> Self {
        Self::new(self.azimuth, elevation)
    }

    /// Integer key in tenths of a degree, used for exact-match lookups
    pub fn key(&self) -> (i32, i32) {
        let az = (self.azimuth * KEY_SCALE).round() as i32;
        let el = (self.elevation * KEY_SCALE).round() as i32;
        (az.rem_euclid(3600), el)
    }

    /// True if both directions name the same measured angle
    pub fn same_angle(&self, other: &Direction) -> bool {
        self.key() == other.key()
    }

    /// Project onto the unit sphere
    pub fn to_cartesian(&self) -> CartesianPoint {
        spherical_to_cartesian(*self)
    }

    /// Euclidean distance between the unit-sphere projections
    pub fn distance_to(&self, other: &Direction) -> f64 {
        angular_distance(*self, *other)
    }
}

impl Default for Direction {
    fn default() -> Self {
        Self::front()
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1}, {:.1})", self.azimuth, self.elevation)
    }
}

/// Point on the unit sphere
///
/// Convention: x = cos(el)cos(az), y = cos(el)sin(az), z = sin(el).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CartesianPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl CartesianPoint {
    /// Create new point
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Origin
    pub fn origin() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Distance to another point
    pub fn distance_to(&self, other: &Self) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let dz = other.z - self.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Scale by a weight
    pub fn scaled(&self, weight: f64) -> Self {
        Self::new(self.x * weight, self.y * weight, self.z * weight)
    }

    /// Weighted sum of points (weights are not renormalized)
    pub fn weighted_sum(points: &[(CartesianPoint, f64)]) -> Self {
        points
            .iter()
            .fold(Self::origin(), |acc, (point, weight)| acc + point.scaled(*weight))
    }

    /// Convert back to a direction
    pub fn to_direction(&self) -> Direction {
        cartesian_to_spherical(*self)
    }
}

impl Add for CartesianPoint {
    type Output = CartesianPoint;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

/// Project a direction onto the unit sphere, rounded to 6 decimals
pub fn spherical_to_cartesian(direction: Direction) -> CartesianPoint {
    let az = direction.azimuth.to_radians();
    let el = direction.elevation.to_radians();
    let cos_el = el.cos();

    CartesianPoint {
        x: round_component(az.cos() * cos_el),
        y: round_component(az.sin() * cos_el),
        z: round_component(el.sin()),
    }
}

/// Convert a (not necessarily unit) point back to a direction
pub fn cartesian_to_spherical(point: CartesianPoint) -> Direction {
    let horizontal = (point.x * point.x + point.y * point.y).sqrt();
    if horizontal < 1e-12 && point.z.abs() < 1e-12 {
        return Direction::front();
    }

    let azimuth = point.y.atan2(point.x).to_degrees();
    let elevation = point.z.atan2(horizontal).to_degrees();

    Direction::new(azimuth, elevation)
}

/// Distance between two directions measured between their Cartesian projections
///
/// Not the great-circle distance; monotonic with it, which is all the
/// neighbourhood comparisons need.
pub fn angular_distance(a: Direction, b: Direction) -> f64 {
    spherical_to_cartesian(a).distance_to(&spherical_to_cartesian(b))
}

/// Constant-power pan law
///
/// Maps pan in [-1, 1] to (left, right) gains with theta = (pan + 1) * pi / 4.
pub fn pan_gains(pan: f64) -> SpatialResult<(f64, f64)> {
    if !(-1.0..=1.0).contains(&pan) {
        return Err(SpatialError::InvalidPan(pan));
    }

    let theta = (pan + 1.0) * std::f64::consts::FRAC_PI_4;
    Ok((theta.cos(), theta.sin()))
}

/// Place a mono signal in the stereo field with the constant-power law
pub fn pan_source(pan: f64, signal: &[f32]) -> SpatialResult<StereoBuffer> {
    let (left, right) = pan_gains(pan)?;
    let mut output = StereoBuffer::new(signal.len());
    output.add_mono(signal, left as f32, right as f32);
    Ok(output)
}

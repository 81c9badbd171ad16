use std::ops::{Add, Div, Index, Mul, Neg, Sub};

use super::coordinates::CoordinateSystem;

// ─────────────────────────────────────────────────────────────────────────────
// Vec3
// ─────────────────────────────────────────────────────────────────────────────

/// Cartesian 3-vector used for all 3-D geometry in the distance engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    /// Zero vector.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    /// Unit vector along the Z axis.
    pub const Z: Self = Self::new(0.0, 0.0, 1.0);

    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[must_use]
    pub const fn from_array(arr: [f64; 3]) -> Self {
        Self::new(arr[0], arr[1], arr[2])
    }

    #[must_use]
    pub const fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    #[must_use]
    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    #[must_use]
    pub const fn length_squared(self) -> f64 {
        self.dot(self)
    }

    #[must_use]
    pub const fn dot(self, rhs: Self) -> f64 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    #[must_use]
    pub const fn cross(self, rhs: Self) -> Self {
        Self {
            x: self.y * rhs.z - self.z * rhs.y,
            y: self.z * rhs.x - self.x * rhs.z,
            z: self.x * rhs.y - self.y * rhs.x,
        }
    }

    #[must_use]
    pub fn normalized(self) -> Option<Self> {
        let len = self.length();
        if len.is_finite() && len > 0.0 {
            Some(Self::new(self.x / len, self.y / len, self.z / len))
        } else {
            None
        }
    }

    /// Removes the component of `self` along the unit vector `axis`.
    #[must_use]
    pub fn reject_from(self, axis: Self) -> Self {
        self - axis * self.dot(axis)
    }
}

impl Default for Vec3 {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<[f64; 3]> for Vec3 {
    fn from(arr: [f64; 3]) -> Self {
        Self::from_array(arr)
    }
}

impl Add for Vec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self::Output {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Div<f64> for Vec3 {
    type Output = Self;
    fn div(self, rhs: f64) -> Self::Output {
        Self::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

impl Neg for Vec3 {
    type Output = Self;
    fn neg(self) -> Self::Output {
        Self::new(-self.x, -self.y, -self.z)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Point2
// ─────────────────────────────────────────────────────────────────────────────

/// Surface coordinate tagged with the coordinate system it was produced in.
///
/// In a spherical system the components are longitude and latitude in radians,
/// in a Cartesian system they are `x` and `y` in metres. Arithmetic between
/// points of different systems is meaningless and is rejected in debug builds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point2 {
    coords: [f64; 2],
    system: CoordinateSystem,
}

impl Point2 {
    #[must_use]
    pub const fn new(a: f64, b: f64, system: CoordinateSystem) -> Self {
        Self {
            coords: [a, b],
            system,
        }
    }

    #[must_use]
    pub const fn from_array(coords: [f64; 2], system: CoordinateSystem) -> Self {
        Self { coords, system }
    }

    #[must_use]
    pub const fn to_array(self) -> [f64; 2] {
        self.coords
    }

    #[must_use]
    pub const fn system(self) -> CoordinateSystem {
        self.system
    }

    #[must_use]
    pub const fn dot(self, rhs: Self) -> f64 {
        self.coords[0] * rhs.coords[0] + self.coords[1] * rhs.coords[1]
    }

    #[must_use]
    pub fn norm(self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Z component of the 2-D cross product `self x rhs`.
    #[must_use]
    pub const fn cross(self, rhs: Self) -> f64 {
        self.coords[0] * rhs.coords[1] - self.coords[1] * rhs.coords[0]
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.coords.iter().all(|c| c.is_finite())
    }
}

impl Index<usize> for Point2 {
    type Output = f64;
    fn index(&self, index: usize) -> &Self::Output {
        &self.coords[index]
    }
}

impl Add for Point2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        debug_assert_eq!(self.system, rhs.system, "adding points of different coordinate systems");
        Self::new(
            self.coords[0] + rhs.coords[0],
            self.coords[1] + rhs.coords[1],
            self.system,
        )
    }
}

impl Sub for Point2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        debug_assert_eq!(
            self.system, rhs.system,
            "subtracting points of different coordinate systems"
        );
        Self::new(
            self.coords[0] - rhs.coords[0],
            self.coords[1] - rhs.coords[1],
            self.system,
        )
    }
}

impl Mul<f64> for Point2 {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self::Output {
        Self::new(self.coords[0] * rhs, self.coords[1] * rhs, self.system)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Point3
// ─────────────────────────────────────────────────────────────────────────────

/// Three-component point tagged with its coordinate system.
///
/// Query positions are Cartesian-tagged; natural coordinates are carried by
/// [`NaturalCoordinate`](super::NaturalCoordinate) instead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point3 {
    coords: [f64; 3],
    system: CoordinateSystem,
}

impl Point3 {
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64, system: CoordinateSystem) -> Self {
        Self {
            coords: [x, y, z],
            system,
        }
    }

    /// Cartesian point, the tag every query position carries.
    #[must_use]
    pub const fn cartesian(x: f64, y: f64, z: f64) -> Self {
        Self::new(x, y, z, CoordinateSystem::Cartesian)
    }

    #[must_use]
    pub const fn to_array(self) -> [f64; 3] {
        self.coords
    }

    #[must_use]
    pub const fn system(self) -> CoordinateSystem {
        self.system
    }

    #[must_use]
    pub const fn to_vec3(self) -> Vec3 {
        Vec3::from_array(self.coords)
    }

    #[must_use]
    pub fn distance_to(self, other: Self) -> f64 {
        (self - other).length()
    }
}

impl Index<usize> for Point3 {
    type Output = f64;
    fn index(&self, index: usize) -> &Self::Output {
        &self.coords[index]
    }
}

impl Sub for Point3 {
    type Output = Vec3;
    fn sub(self, rhs: Self) -> Self::Output {
        debug_assert_eq!(
            self.system, rhs.system,
            "subtracting points of different coordinate systems"
        );
        self.to_vec3() - rhs.to_vec3()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tolerance
// ─────────────────────────────────────────────────────────────────────────────

/// Named tolerances for the geometric comparisons in the engine.
///
/// - `Tolerance::ZERO_LENGTH` - Segments shorter than this are skipped (1e-14)
/// - `Tolerance::ANGLE` - Below this difference a segment is straight (1e-8)
/// - `Tolerance::ALONG_PLANE` - Slack on the start of a segment projection (1e-10)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    pub eps: f64,
}

impl Tolerance {
    /// Default geometric tolerance (1e-9).
    pub const DEFAULT: Self = Self { eps: 1e-9 };

    /// Segment lengths below this value carry no geometry (1e-14).
    pub const ZERO_LENGTH: Self = Self { eps: 1e-14 };

    /// Top and bottom dip angles closer than this describe a straight segment (1e-8).
    pub const ANGLE: Self = Self { eps: 1e-8 };

    /// Slack allowed before the start of a segment when accepting a projection (1e-10).
    pub const ALONG_PLANE: Self = Self { eps: 1e-10 };

    #[must_use]
    pub const fn new(eps: f64) -> Self {
        Self { eps }
    }

    #[must_use]
    pub fn approx_eq_f64(self, a: f64, b: f64) -> bool {
        (a - b).abs() <= self.eps
    }

    #[must_use]
    pub fn approx_zero_f64(self, a: f64) -> bool {
        a.abs() <= self.eps
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

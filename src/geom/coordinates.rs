//! Conversion between Cartesian positions and natural coordinates.
//!
//! A natural coordinate splits a position into two surface coordinates and a
//! depth coordinate. For a Cartesian model these are `x`, `y` and the height
//! `z` above the model base. For a spherical model they are longitude and
//! latitude in radians and the radius.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use super::core::{Point2, Point3, Vec3};

/// The coordinate system a model is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordinateSystem {
    #[default]
    Cartesian,
    Spherical,
}

impl CoordinateSystem {
    #[must_use]
    pub const fn is_cartesian(self) -> bool {
        matches!(self, Self::Cartesian)
    }

    /// Splits a Cartesian position into surface coordinates and depth coordinate.
    #[must_use]
    pub fn to_natural(self, point: Point3) -> NaturalCoordinate {
        let [x, y, z] = point.to_array();
        match self {
            Self::Cartesian => NaturalCoordinate::new(self, [x, y], z),
            Self::Spherical => {
                let radius = (x * x + y * y + z * z).sqrt();
                let longitude = y.atan2(x);
                let latitude = if radius > 0.0 { (z / radius).asin() } else { 0.0 };
                NaturalCoordinate::new(self, [longitude, latitude], radius)
            }
        }
    }

    /// Inverse of [`Self::to_natural`].
    #[must_use]
    pub fn to_cartesian(self, natural: &NaturalCoordinate) -> Vec3 {
        self.surface_to_cartesian(natural.surface, natural.depth_coordinate)
    }

    /// Cartesian position of a surface coordinate at the given depth coordinate.
    #[must_use]
    pub fn surface_to_cartesian(self, surface: [f64; 2], depth_coordinate: f64) -> Vec3 {
        match self {
            Self::Cartesian => Vec3::new(surface[0], surface[1], depth_coordinate),
            Self::Spherical => {
                let [longitude, latitude] = surface;
                let (sin_lon, cos_lon) = longitude.sin_cos();
                let (sin_lat, cos_lat) = latitude.sin_cos();
                Vec3::new(
                    depth_coordinate * cos_lat * cos_lon,
                    depth_coordinate * cos_lat * sin_lon,
                    depth_coordinate * sin_lat,
                )
            }
        }
    }

    /// Converts a configured surface value to its natural unit.
    ///
    /// Spherical coordinates and spacings are configured in degrees.
    #[must_use]
    pub fn degrees_to_natural(self, value: f64) -> f64 {
        match self {
            Self::Cartesian => value,
            Self::Spherical => value * PI / 180.0,
        }
    }
}

impl fmt::Display for CoordinateSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cartesian => f.write_str("cartesian"),
            Self::Spherical => f.write_str("spherical"),
        }
    }
}

impl FromStr for CoordinateSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cartesian" => Ok(Self::Cartesian),
            "spherical" => Ok(Self::Spherical),
            other => Err(format!("unknown coordinate system '{other}'")),
        }
    }
}

/// A position expressed as surface coordinates plus a depth coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NaturalCoordinate {
    pub system: CoordinateSystem,
    pub surface: [f64; 2],
    pub depth_coordinate: f64,
}

impl NaturalCoordinate {
    #[must_use]
    pub const fn new(system: CoordinateSystem, surface: [f64; 2], depth_coordinate: f64) -> Self {
        Self {
            system,
            surface,
            depth_coordinate,
        }
    }

    #[must_use]
    pub const fn surface_point(&self) -> Point2 {
        Point2::from_array(self.surface, self.system)
    }

    /// Height above the model base (Cartesian) or radius (spherical).
    #[must_use]
    pub const fn depth_coordinate(&self) -> f64 {
        self.depth_coordinate
    }
}

//! Surface bounding boxes used to reject query points before the distance
//! computation.

use std::f64::consts::{PI, TAU};

use super::coordinates::CoordinateSystem;
use super::core::Point2;

/// Axis-aligned box in surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox2 {
    pub min: [f64; 2],
    pub max: [f64; 2],
}

impl BoundingBox2 {
    #[must_use]
    pub const fn new(min: [f64; 2], max: [f64; 2]) -> Self {
        Self { min, max }
    }

    /// Check if a point is inside the bounding box (inclusive).
    #[must_use]
    pub fn point_inside(&self, point: Point2) -> bool {
        point[0] >= self.min[0]
            && point[0] <= self.max[0]
            && point[1] >= self.min[1]
            && point[1] <= self.max[1]
    }

    /// Expand the bounding box by a scalar amount in all directions.
    #[must_use]
    pub fn extend(self, amount: f64) -> Self {
        Self::new(
            [self.min[0] - amount, self.min[1] - amount],
            [self.max[0] + amount, self.max[1] + amount],
        )
    }
}

/// Extreme surface coordinates of a trace, computed once per feature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceExtrema {
    pub min: [f64; 2],
    pub max: [f64; 2],
    min_lat_cos_inv: f64,
    max_lat_cos_inv: f64,
}

impl SurfaceExtrema {
    #[must_use]
    pub fn from_points(points: &[Point2]) -> Option<Self> {
        let mut iter = points.iter().copied();
        let first = iter.next()?;
        let mut min = first.to_array();
        let mut max = first.to_array();
        for p in iter {
            min[0] = min[0].min(p[0]);
            min[1] = min[1].min(p[1]);
            max[0] = max[0].max(p[0]);
            max[1] = max[1].max(p[1]);
        }
        Some(Self {
            min,
            max,
            min_lat_cos_inv: 1.0 / min[1].cos(),
            max_lat_cos_inv: 1.0 / max[1].cos(),
        })
    }

    /// Shifts a longitude by whole turns so it lies within half a turn of the
    /// middle of the trace. Longitudes already in that range are returned
    /// unchanged.
    #[must_use]
    pub fn wrap_longitude(&self, longitude: f64) -> f64 {
        let centre = 0.5 * (self.min[0] + self.max[0]);
        let offset = longitude - centre;
        if offset.abs() <= PI {
            longitude
        } else {
            longitude - TAU * (offset / TAU).round()
        }
    }

    /// Box around the trace, widened by `buffer` metres.
    ///
    /// In a spherical system the buffer is converted to an angle at
    /// `starting_radius`, and the longitudinal part is divided by the cosine of
    /// the extreme latitudes to account for meridian convergence.
    #[must_use]
    pub fn bounding_box(
        &self,
        system: CoordinateSystem,
        buffer: f64,
        starting_radius: f64,
    ) -> BoundingBox2 {
        match system {
            CoordinateSystem::Cartesian => BoundingBox2::new(self.min, self.max).extend(buffer),
            CoordinateSystem::Spherical => {
                let angular_buffer = 2.0 * PI * buffer / starting_radius;
                BoundingBox2::new(
                    [
                        self.min[0] - angular_buffer * self.min_lat_cos_inv.abs(),
                        self.min[1] - angular_buffer,
                    ],
                    [
                        self.max[0] + angular_buffer * self.max_lat_cos_inv.abs(),
                        self.max[1] + angular_buffer,
                    ],
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cartesian_box_extends_both_axes() {
        let points = [
            Point2::new(0.0, 0.0, CoordinateSystem::Cartesian),
            Point2::new(100.0, 10.0, CoordinateSystem::Cartesian),
        ];
        let extrema = SurfaceExtrema::from_points(&points).unwrap();
        let bbox = extrema.bounding_box(CoordinateSystem::Cartesian, 5.0, 1.0);
        assert_eq!(bbox.min, [-5.0, -5.0]);
        assert_eq!(bbox.max, [105.0, 15.0]);
        assert!(bbox.point_inside(Point2::new(50.0, 14.0, CoordinateSystem::Cartesian)));
        assert!(!bbox.point_inside(Point2::new(50.0, 16.0, CoordinateSystem::Cartesian)));
    }

    #[test]
    fn spherical_box_widens_longitude_towards_pole() {
        let points = [
            Point2::new(0.0, 0.0, CoordinateSystem::Spherical),
            Point2::new(0.1, 1.0, CoordinateSystem::Spherical),
        ];
        let extrema = SurfaceExtrema::from_points(&points).unwrap();
        let radius = 6_371_000.0;
        let buffer = 100_000.0;
        let bbox = extrema.bounding_box(CoordinateSystem::Spherical, buffer, radius);
        let angular = 2.0 * PI * buffer / radius;
        assert!((bbox.min[0] + angular).abs() < 1e-12);
        assert!((bbox.max[0] - (0.1 + angular / 1.0_f64.cos())).abs() < 1e-12);
        assert!((bbox.max[1] - (1.0 + angular)).abs() < 1e-12);
    }

    #[test]
    fn longitudes_wrap_towards_the_trace() {
        let points = [
            Point2::new(3.1, 0.0, CoordinateSystem::Spherical),
            Point2::new(3.2, 0.1, CoordinateSystem::Spherical),
        ];
        let extrema = SurfaceExtrema::from_points(&points).unwrap();
        assert_eq!(extrema.wrap_longitude(3.0), 3.0);
        assert!((extrema.wrap_longitude(-3.1) - (TAU - 3.1)).abs() < 1e-12);
        assert!((extrema.wrap_longitude(3.15 + 2.0 * TAU) - 3.15).abs() < 1e-12);

        let bbox = extrema.bounding_box(CoordinateSystem::Spherical, 10_000.0, 6_371_000.0);
        let across_seam = Point2::new(extrema.wrap_longitude(-3.1), 0.05, CoordinateSystem::Spherical);
        assert!(bbox.point_inside(across_seam));
    }

    #[test]
    fn empty_trace_has_no_extrema() {
        assert!(SurfaceExtrema::from_points(&[]).is_none());
    }
}

mod bbox;
mod coordinates;
mod core;
mod curved_planes;
mod path;
mod rotation;
mod spline;

pub use bbox::{BoundingBox2, SurfaceExtrema};
pub use coordinates::{CoordinateSystem, NaturalCoordinate};
pub use self::core::{Point2, Point3, Tolerance, Vec3};
pub use curved_planes::{CurvedPlaneQuery, DistanceResult, distance_from_curved_planes};
pub use path::{InterpolationType, Path};
pub use rotation::{
    IDENTITY_ROTATION, RotationMatrix, determinant, euler_zxz_to_matrix, is_finite_matrix,
    matrix_to_quaternion, quaternion_to_matrix, slerp_rotation,
};
pub use spline::MonotoneSpline;

#[cfg(test)]
mod tests;

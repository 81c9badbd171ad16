//! Rotation matrix helpers for crystal orientations.
//!
//! Rotation matrices are stored row-major as `[[f64; 3]; 3]`. Averaging two
//! orientations goes through unit quaternions so the result stays a proper
//! rotation, which a component-wise matrix average does not guarantee.

use glam::{DMat3, DQuat};

/// Row-major 3x3 rotation matrix.
pub type RotationMatrix = [[f64; 3]; 3];

/// Identity orientation.
pub const IDENTITY_ROTATION: RotationMatrix = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

fn to_dmat3(matrix: &RotationMatrix) -> DMat3 {
    // glam is column-major; the rows of `matrix` are its columns transposed.
    DMat3::from_cols_array_2d(matrix).transpose()
}

fn from_dmat3(matrix: DMat3) -> RotationMatrix {
    matrix.transpose().to_cols_array_2d()
}

/// Unit quaternion equivalent of a rotation matrix.
#[must_use]
pub fn matrix_to_quaternion(matrix: &RotationMatrix) -> DQuat {
    DQuat::from_mat3(&to_dmat3(matrix)).normalize()
}

/// Rotation matrix equivalent of a unit quaternion.
#[must_use]
pub fn quaternion_to_matrix(quaternion: DQuat) -> RotationMatrix {
    from_dmat3(DMat3::from_quat(quaternion))
}

/// Spherical interpolation between two orientations; `t = 0` gives `from`,
/// `t = 1` gives `to`.
#[must_use]
pub fn slerp_rotation(from: &RotationMatrix, to: &RotationMatrix, t: f64) -> RotationMatrix {
    let q_from = matrix_to_quaternion(from);
    let q_to = matrix_to_quaternion(to);
    quaternion_to_matrix(q_from.slerp(q_to, t))
}

/// Orientation matrix from Bunge z-x-z Euler angles given in degrees.
///
/// The result maps sample coordinates to crystal coordinates, i.e. it is the
/// transpose of the active rotation `Rz(phi1) * Rx(theta) * Rz(phi2)`.
#[must_use]
pub fn euler_zxz_to_matrix(phi1: f64, theta: f64, phi2: f64) -> RotationMatrix {
    let active = DMat3::from_rotation_z(phi1.to_radians())
        * DMat3::from_rotation_x(theta.to_radians())
        * DMat3::from_rotation_z(phi2.to_radians());
    from_dmat3(active.transpose())
}

/// Determinant of a row-major 3x3 matrix.
#[must_use]
pub fn determinant(matrix: &RotationMatrix) -> f64 {
    to_dmat3(matrix).determinant()
}

#[must_use]
pub fn is_finite_matrix(matrix: &RotationMatrix) -> bool {
    matrix.iter().flatten().all(|v| v.is_finite())
}

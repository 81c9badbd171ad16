use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::geom::{
    IDENTITY_ROTATION, RotationMatrix, determinant, euler_zxz_to_matrix, matrix_to_quaternion,
    quaternion_to_matrix, slerp_rotation,
};

fn assert_orthonormal(matrix: &RotationMatrix) {
    for i in 0..3 {
        for j in 0..3 {
            let dot: f64 = (0..3).map(|k| matrix[i][k] * matrix[j][k]).sum();
            let expected = if i == j { 1.0 } else { 0.0 };
            assert!((dot - expected).abs() < 1e-10, "rows {i} and {j}: {dot}");
        }
    }
    assert!((determinant(matrix) - 1.0).abs() < 1e-10);
}

fn assert_close(a: &RotationMatrix, b: &RotationMatrix) {
    for i in 0..3 {
        for j in 0..3 {
            assert!((a[i][j] - b[i][j]).abs() < 1e-10, "{a:?} != {b:?}");
        }
    }
}

fn random_rotation(rng: &mut StdRng) -> RotationMatrix {
    euler_zxz_to_matrix(
        rng.random_range(0.0..360.0),
        rng.random_range(0.0..180.0),
        rng.random_range(0.0..360.0),
    )
}

#[test]
fn euler_rotation_about_z() {
    let matrix = euler_zxz_to_matrix(90.0, 0.0, 0.0);
    let expected = [[0.0, 1.0, 0.0], [-1.0, 0.0, 0.0], [0.0, 0.0, 1.0]];
    assert_close(&matrix, &expected);
}

#[test]
fn euler_first_row_matches_bunge_convention() {
    let (phi1, theta, phi2) = (30.0_f64, 45.0_f64, 60.0_f64);
    let (s1, c1) = phi1.to_radians().sin_cos();
    let (s2, c2) = theta.to_radians().sin_cos();
    let (s3, c3) = phi2.to_radians().sin_cos();
    let matrix = euler_zxz_to_matrix(phi1, theta, phi2);
    let row = [c1 * c3 - s1 * s3 * c2, s1 * c3 + c1 * s3 * c2, s3 * s2];
    for (actual, expected) in matrix[0].iter().zip(row) {
        assert!((actual - expected).abs() < 1e-12);
    }
    assert!((matrix[2][2] - c2).abs() < 1e-12);
}

#[test]
fn quaternion_round_trip() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..50 {
        let matrix = random_rotation(&mut rng);
        assert_orthonormal(&matrix);
        let back = quaternion_to_matrix(matrix_to_quaternion(&matrix));
        assert_close(&matrix, &back);
    }
}

#[test]
fn slerp_endpoints_and_orthonormality() {
    let mut rng = StdRng::seed_from_u64(29);
    for _ in 0..50 {
        let from = random_rotation(&mut rng);
        let to = random_rotation(&mut rng);
        assert_close(&slerp_rotation(&from, &to, 0.0), &from);
        assert_close(&slerp_rotation(&from, &to, 1.0), &to);
        let t: f64 = rng.random_range(0.0..1.0);
        assert_orthonormal(&slerp_rotation(&from, &to, t));
    }
}

#[test]
fn slerp_halfway_about_common_axis() {
    let to = euler_zxz_to_matrix(60.0, 0.0, 0.0);
    let half = slerp_rotation(&IDENTITY_ROTATION, &to, 0.5);
    assert_close(&half, &euler_zxz_to_matrix(30.0, 0.0, 0.0));
}

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use crate::geom::{
    CoordinateSystem, CurvedPlaneQuery, DistanceResult, InterpolationType, NaturalCoordinate,
    Path, Point2, Point3, distance_from_curved_planes,
};

const SURFACE: f64 = 1000.0;

fn cartesian_trace() -> Path {
    let coords = [
        Point2::new(0.0, 0.0, CoordinateSystem::Cartesian),
        Point2::new(0.0, 100.0, CoordinateSystem::Cartesian),
    ];
    Path::build(&coords, InterpolationType::None, 0.0, CoordinateSystem::Cartesian)
}

fn query_cartesian(
    path: &Path,
    lengths: &[Vec<f64>],
    angles: &[Vec<[f64; 2]>],
    position: [f64; 3],
) -> DistanceResult {
    let point = Point3::cartesian(position[0], position[1], position[2]);
    let query = CurvedPlaneQuery {
        position: point.to_vec3(),
        natural: CoordinateSystem::Cartesian.to_natural(point),
        reference_point: Point2::new(10.0, 50.0, CoordinateSystem::Cartesian),
        path,
        segment_lengths: lengths,
        segment_angles: angles,
        starting_radius: SURFACE,
        system: CoordinateSystem::Cartesian,
    };
    distance_from_curved_planes(&query)
}

#[test]
fn straight_segment_on_dip_side() {
    let path = cartesian_trace();
    let lengths = vec![vec![100.0]; 2];
    let angles = vec![vec![[FRAC_PI_4, FRAC_PI_4]]; 2];

    let result = query_cartesian(&path, &lengths, &angles, [10.0, 50.0, SURFACE - 30.0]);
    let s = FRAC_PI_4.sin();
    assert!((result.distance_from_plane - 20.0 * s).abs() < 1e-9);
    assert!((result.distance_along_plane - 40.0 * s).abs() < 1e-9);
    assert!((result.depth_reference_surface - 20.0).abs() < 1e-9);
    assert_eq!(result.section, 0);
    assert!((result.section_fraction - 0.5).abs() < 1e-12);
    assert_eq!(result.segment, 0);
    assert!((result.segment_fraction - 0.4 * s).abs() < 1e-9);
    assert!((result.average_angle - FRAC_PI_4).abs() < 1e-12);
}

#[test]
fn point_above_the_top_is_negative() {
    let path = cartesian_trace();
    let lengths = vec![vec![100.0]; 2];
    let angles = vec![vec![[FRAC_PI_4, FRAC_PI_4]]; 2];

    let result = query_cartesian(&path, &lengths, &angles, [30.0, 50.0, SURFACE - 10.0]);
    assert!(result.is_associated());
    assert!(result.distance_from_plane < 0.0);
}

#[test]
fn point_behind_the_trench_is_not_associated() {
    let path = cartesian_trace();
    let lengths = vec![vec![100.0]; 2];
    let angles = vec![vec![[FRAC_PI_4, FRAC_PI_4]]; 2];

    let result = query_cartesian(&path, &lengths, &angles, [-500.0, 50.0, SURFACE - 100.0]);
    assert!(!result.is_associated());
    assert_eq!(result, DistanceResult::NOT_ASSOCIATED);
}

#[test]
fn quarter_circle_segment() {
    let path = cartesian_trace();
    let radius = 100.0;
    let lengths = vec![vec![FRAC_PI_2 * radius]; 2];
    let angles = vec![vec![[0.0, FRAC_PI_2]]; 2];

    // Halfway between the arc centre and the arc, at 45 degrees along it.
    let centre = [0.0, SURFACE - radius];
    let offset = 50.0 * FRAC_PI_4.sin();
    let result = query_cartesian(
        &path,
        &lengths,
        &angles,
        [centre[0] + offset, 50.0, centre[1] + offset],
    );

    assert!((result.distance_from_plane - 50.0).abs() < 1e-9);
    assert!((result.distance_along_plane - FRAC_PI_4 * radius).abs() < 1e-9);
    assert!((result.segment_fraction - 0.5).abs() < 1e-9);
    assert!((result.average_angle - FRAC_PI_4 / 2.0).abs() < 1e-9);
    let expected_depth = radius - radius * FRAC_PI_4.cos();
    assert!((result.depth_reference_surface - expected_depth).abs() < 1e-9);
}

#[test]
fn point_on_arc_has_zero_distance() {
    let path = cartesian_trace();
    let radius = 100.0;
    let lengths = vec![vec![FRAC_PI_2 * radius]; 2];
    let angles = vec![vec![[0.0, FRAC_PI_2]]; 2];

    let angle: f64 = 0.3;
    let x = radius * angle.sin();
    let z = SURFACE - radius + radius * angle.cos();
    let result = query_cartesian(&path, &lengths, &angles, [x, 20.0, z]);
    assert!(result.distance_from_plane.abs() < 1e-9);
    assert!((result.distance_along_plane - angle * radius).abs() < 1e-9);
}

#[test]
fn second_segment_continues_from_first() {
    let path = cartesian_trace();
    let lengths = vec![vec![100.0, 100.0]; 2];
    let angles = vec![vec![[0.0, 0.0], [FRAC_PI_2, FRAC_PI_2]]; 2];

    // Vertical second segment hangs from x = 100.
    let result = query_cartesian(&path, &lengths, &angles, [95.0, 50.0, SURFACE - 60.0]);
    assert_eq!(result.segment, 1);
    assert!((result.distance_from_plane - 5.0).abs() < 1e-9);
    assert!((result.distance_along_plane - 160.0).abs() < 1e-9);
    assert!((result.segment_fraction - 0.6).abs() < 1e-9);
    let expected_angle = FRAC_PI_2 * 60.0 / 160.0;
    assert!((result.average_angle - expected_angle).abs() < 1e-9);
}

#[test]
fn section_properties_are_interpolated() {
    let path = cartesian_trace();
    let lengths = vec![vec![100.0], vec![300.0]];
    let angles = vec![vec![[FRAC_PI_2, FRAC_PI_2]]; 2];

    let result = query_cartesian(&path, &lengths, &angles, [0.0, 75.0, SURFACE - 220.0]);
    assert!(result.is_associated());
    assert!((result.section_fraction - 0.75).abs() < 1e-12);
    assert!((result.distance_along_plane - 220.0).abs() < 1e-9);

    let beyond = query_cartesian(&path, &lengths, &angles, [0.0, 25.0, SURFACE - 220.0]);
    assert!(!beyond.is_associated());
}

#[test]
fn spherical_vertical_slab() {
    let system = CoordinateSystem::Spherical;
    let radius = 6_371_000.0;
    let coords = [Point2::new(0.0, -0.1, system), Point2::new(0.0, 0.1, system)];
    let path = Path::build(&coords, InterpolationType::None, 0.0, system);
    let lengths = vec![vec![100_000.0]; 2];
    let angles = vec![vec![[FRAC_PI_2, FRAC_PI_2]]; 2];

    let run = |longitude: f64, depth: f64| {
        let natural = NaturalCoordinate::new(system, [longitude, 0.0], radius - depth);
        let query = CurvedPlaneQuery {
            position: system.to_cartesian(&natural),
            natural,
            reference_point: Point2::new(0.05, 0.0, system),
            path: &path,
            segment_lengths: &lengths,
            segment_angles: &angles,
            starting_radius: radius,
            system,
        };
        distance_from_curved_planes(&query)
    };

    let on_plane = run(0.0, 50_000.0);
    assert!(on_plane.distance_from_plane.abs() < 1e-6);
    assert!((on_plane.distance_along_plane - 50_000.0).abs() < 1e-6);

    let delta: f64 = 1e-3;
    let r = radius - 50_000.0;
    let dip_side = run(delta, 50_000.0);
    assert!((dip_side.distance_from_plane + r * delta.sin()).abs() < 1e-6);
    assert!((dip_side.distance_along_plane - (radius - r * delta.cos())).abs() < 1e-6);

    let other_side = run(-delta, 50_000.0);
    assert!((other_side.distance_from_plane - r * delta.sin()).abs() < 1e-6);
}

fn straight_trace(ys: &[f64], interpolation: InterpolationType, max_spacing: f64) -> Path {
    let coords: Vec<Point2> = ys
        .iter()
        .map(|&y| Point2::new(0.0, y, CoordinateSystem::Cartesian))
        .collect();
    Path::build(&coords, interpolation, max_spacing, CoordinateSystem::Cartesian)
}

#[test]
fn nearest_chord_of_three_coordinates_is_used() {
    let path = straight_trace(&[0.0, 100.0, 200.0], InterpolationType::None, 0.0);
    let dip = 30f64.to_radians();
    let lengths = vec![vec![100.0]; 3];
    let angles = vec![vec![[dip, dip]]; 3];

    let (sin_a, cos_a) = dip.sin_cos();
    let (along, below) = (50.0, 10.0);
    let x = along * cos_a - below * sin_a;
    let z = SURFACE - (along * sin_a + below * cos_a);
    let result = query_cartesian(&path, &lengths, &angles, [x, 150.0, z]);

    assert!((result.distance_from_plane - below).abs() < 1e-9);
    assert!((result.distance_along_plane - along).abs() < 1e-9);
    assert_eq!(result.section, 1);
    assert!((result.section_fraction - 0.5).abs() < 1e-12);
    assert_eq!(result.segment, 0);
}

#[test]
fn resampled_linear_trace_keeps_section_fraction() {
    let path = straight_trace(&[0.0, 200.0], InterpolationType::Linear, 25.0);
    assert_eq!(path.len(), 9);
    let lengths = vec![vec![100.0]; 2];
    let angles = vec![vec![[0.0, 0.0]]; 2];

    let result = query_cartesian(&path, &lengths, &angles, [50.0, 100.0, SURFACE - 30.0]);
    assert!((result.distance_from_plane - 30.0).abs() < 1e-9);
    assert!((result.distance_along_plane - 50.0).abs() < 1e-9);
    assert_eq!(result.section, 0);
    assert!((result.section_fraction - 0.5).abs() < 1e-12);

    let off_vertex = query_cartesian(&path, &lengths, &angles, [50.0, 110.0, SURFACE - 30.0]);
    assert!((off_vertex.distance_along_plane - 50.0).abs() < 1e-9);
    assert!((off_vertex.section_fraction - 0.55).abs() < 1e-12);
}

#[test]
fn resampled_spline_trace_selects_inner_chord() {
    let path = straight_trace(&[0.0, 100.0, 200.0], InterpolationType::MonotoneSpline, 30.0);
    assert!(path.len() > 3);
    let dip = 30f64.to_radians();
    let lengths = vec![vec![100.0]; 3];
    let angles = vec![vec![[dip, dip]]; 3];

    let (sin_a, cos_a) = dip.sin_cos();
    let x = 40.0 * cos_a - 5.0 * sin_a;
    let z = SURFACE - (40.0 * sin_a + 5.0 * cos_a);
    let result = query_cartesian(&path, &lengths, &angles, [x, 130.0, z]);

    assert!((result.distance_from_plane - 5.0).abs() < 1e-9);
    assert!((result.distance_along_plane - 40.0).abs() < 1e-9);
    assert_eq!(result.section, 1);
    assert!((result.section_fraction - 0.3).abs() < 1e-9);
}

#[test]
fn distance_grows_monotonically_on_multi_chord_trace() {
    let path = straight_trace(&[0.0, 100.0, 200.0, 300.0], InterpolationType::Linear, 20.0);
    let dip = 30f64.to_radians();
    let lengths = vec![vec![200.0]; 4];
    let angles = vec![vec![[dip, dip]]; 4];
    let (sin_a, cos_a) = dip.sin_cos();

    for y in [35.0, 100.0, 170.0, 250.0] {
        let mut previous = f64::NEG_INFINITY;
        for step in -10..=10 {
            let offset = f64::from(step);
            let x = 60.0 * cos_a - offset * sin_a;
            let z = SURFACE - (60.0 * sin_a + offset * cos_a);
            let result = query_cartesian(&path, &lengths, &angles, [x, y, z]);
            assert!((result.distance_from_plane - offset).abs() < 1e-9);
            assert!((result.distance_along_plane - 60.0).abs() < 1e-9);
            assert!(result.distance_from_plane > previous);
            previous = result.distance_from_plane;
        }
    }
}

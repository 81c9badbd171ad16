//! Distance from a point to the curved planes spanned by a feature.
//!
//! Each chord of the resampled trace defines a vertical cross-section through
//! the query point. Inside that cross-section the feature is a chain of
//! segments hanging down from the surface, each either straight (constant dip)
//! or a circular arc (dip changing linearly with arc length). The engine picks
//! the chord nearest to the query point on the surface, finds the segment of
//! that chord closest to the point and reports the signed perpendicular
//! distance to it, the arc length along the chain, and where the projection
//! falls between the bracketing sections and segment boundaries.

use std::f64::consts::{PI, TAU};

use super::coordinates::{CoordinateSystem, NaturalCoordinate};
use super::core::{Point2, Tolerance, Vec3};
use super::path::Path;

/// Position of a query point relative to a feature's curved planes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceResult {
    /// Perpendicular distance to the top of the feature, positive below it.
    pub distance_from_plane: f64,
    /// Arc length from the surface down to the projection of the point.
    pub distance_along_plane: f64,
    /// Index of the configured coordinate the projection follows.
    pub section: usize,
    /// Fraction between `section` and the next coordinate, in `[0, 1]`.
    pub section_fraction: f64,
    pub segment: usize,
    /// Fraction between the top and bottom of `segment`, in `[0, 1]`.
    pub segment_fraction: f64,
    /// Arc-length weighted mean dip angle between the surface and the projection.
    pub average_angle: f64,
    /// Depth of the projection point below the starting radius.
    pub depth_reference_surface: f64,
}

impl DistanceResult {
    /// Result for a point that cannot be associated with any segment.
    pub const NOT_ASSOCIATED: Self = Self {
        distance_from_plane: f64::INFINITY,
        distance_along_plane: f64::INFINITY,
        section: 0,
        section_fraction: 0.0,
        segment: 0,
        segment_fraction: 0.0,
        average_angle: 0.0,
        depth_reference_surface: f64::INFINITY,
    };

    #[must_use]
    pub fn is_associated(&self) -> bool {
        self.distance_from_plane.is_finite() && self.distance_along_plane.is_finite()
    }
}

impl Default for DistanceResult {
    fn default() -> Self {
        Self::NOT_ASSOCIATED
    }
}

/// Inputs of [`distance_from_curved_planes`].
#[derive(Debug, Clone, Copy)]
pub struct CurvedPlaneQuery<'a> {
    /// Query position in Cartesian coordinates.
    pub position: Vec3,
    /// The same position in natural coordinates.
    pub natural: NaturalCoordinate,
    /// Point on the side of the trace the feature dips towards.
    pub reference_point: Point2,
    pub path: &'a Path,
    /// Segment lengths per configured coordinate.
    pub segment_lengths: &'a [Vec<f64>],
    /// Top and bottom dip angles (radians) per configured coordinate.
    pub segment_angles: &'a [Vec<[f64; 2]>],
    /// Distance from the model base (or planet centre) to the top of the feature.
    pub starting_radius: f64,
    pub system: CoordinateSystem,
}

/// Projection of the query point onto a single segment.
#[derive(Debug, Clone, Copy)]
struct SegmentProjection {
    distance: f64,
    along: f64,
    projection_height: f64,
}

/// Computes the distance of a point to the curved planes of a feature.
///
/// Returns [`DistanceResult::NOT_ASSOCIATED`] when no segment of the nearest
/// chord contains the projection of the point.
#[must_use]
pub fn distance_from_curved_planes(query: &CurvedPlaneQuery<'_>) -> DistanceResult {
    let path = query.path;
    let points = path.points();
    let arc_parameters = path.arc_parameters();
    let last_section = path.original_len().saturating_sub(1);

    let local = CoordinateSystem::Cartesian;
    let check_surface = query.natural.surface_point();
    let check_surface_cartesian = query
        .system
        .surface_to_cartesian(check_surface.to_array(), query.starting_radius);

    let Some((chord, chord_fraction)) = nearest_chord(points, check_surface) else {
        return DistanceResult::NOT_ASSOCIATED;
    };
    let mut best = DistanceResult::NOT_ASSOCIATED;

    let p1 = points[chord];
    let p1p2 = points[chord + 1] - p1;
    let (section, section_fraction) = path.section_position(chord, chord_fraction);
    let section = section.min(last_section);
    let next_section = (section + 1).min(last_section);

    let arc_parameter =
        arc_parameters[chord] + chord_fraction * (arc_parameters[chord + 1] - arc_parameters[chord]);
    let closest_surface = path
        .continuous_point_at(arc_parameter)
        .unwrap_or_else(|| p1 + p1p2 * chord_fraction);

    let closest_cartesian = query
        .system
        .surface_to_cartesian(closest_surface.to_array(), query.starting_radius);
    let bottom_cartesian = query.system.surface_to_cartesian(closest_surface.to_array(), 0.0);
    let Some(y_axis) = (closest_cartesian - bottom_cartesian).normalized() else {
        return DistanceResult::NOT_ASSOCIATED;
    };

    let horizontal = (check_surface_cartesian - closest_cartesian).reject_from(y_axis);
    let x_axis = match horizontal.normalized() {
        Some(direction) => {
            let reference_side = p1p2.cross(query.reference_point - p1);
            let check_side = p1p2.cross(check_surface - p1);
            if reference_side * check_side < 0.0 {
                -direction
            } else {
                direction
            }
        }
        // The point lies on the radial line through the trace, so its
        // horizontal offset is zero along any horizontal axis.
        None => any_orthogonal(y_axis),
    };

    let to_check = query.position - bottom_cartesian;
    let check_2d = Point2::new(to_check.dot(x_axis), to_check.dot(y_axis), local);
    let to_surface = closest_cartesian - bottom_cartesian;
    let mut begin = Point2::new(to_surface.dot(x_axis), to_surface.dot(y_axis), local);

    let lengths = (&query.segment_lengths[section], &query.segment_lengths[next_section]);
    let angles = (&query.segment_angles[section], &query.segment_angles[next_section]);
    let interpolate = |current: f64, next: f64| current + section_fraction * (next - current);

    let mut total_length = 0.0;
    let mut average_angle = 0.0;

    for segment in 0..lengths.0.len() {
        let length = interpolate(lengths.0[segment], lengths.1[segment]);
        let angle_top = interpolate(angles.0[segment][0], angles.1[segment][0]);
        let angle_bottom = interpolate(angles.0[segment][1], angles.1[segment][1]);

        if length < Tolerance::ZERO_LENGTH.eps {
            continue;
        }

        let angle_change = angle_bottom - angle_top;
        let (projection, end) = if Tolerance::ANGLE.approx_zero_f64(angle_change) {
            project_on_straight_segment(begin, angle_top, length, check_2d)
        } else {
            project_on_arc_segment(begin, angle_top, angle_bottom, length, check_2d)
        };

        if let Some(projection) = projection {
            if projection.along >= -Tolerance::ALONG_PLANE.eps
                && projection.along <= length
                && projection.distance.abs() < best.distance_from_plane.abs()
            {
                let along = projection.along.max(0.0);
                let partial_mean_angle = angle_top + 0.5 * angle_change * along / length;
                let covered = total_length + along;
                let mean_angle = if covered > 0.0 {
                    (average_angle * total_length + partial_mean_angle * along) / covered
                } else {
                    angle_top
                };

                best = DistanceResult {
                    distance_from_plane: projection.distance,
                    distance_along_plane: covered,
                    section,
                    section_fraction,
                    segment,
                    segment_fraction: (along / length).clamp(0.0, 1.0),
                    average_angle: mean_angle,
                    depth_reference_surface: query.starting_radius - projection.projection_height,
                };
            }
        }

        average_angle = (average_angle * total_length + 0.5 * (angle_top + angle_bottom) * length)
            / (total_length + length);
        total_length += length;
        begin = end;
    }

    log::trace!(
        "curved plane distance: from plane {}, along plane {}, section {} ({}), segment {} ({})",
        best.distance_from_plane,
        best.distance_along_plane,
        best.section,
        best.section_fraction,
        best.segment,
        best.segment_fraction
    );
    best
}

/// Chord of the trace closest to `check` on the surface, with the clamped
/// fraction of the foot point along it. Ties keep the earlier chord.
fn nearest_chord(points: &[Point2], check: Point2) -> Option<(usize, f64)> {
    let mut nearest: Option<(usize, f64, f64)> = None;
    for chord in 0..points.len().saturating_sub(1) {
        let p1 = points[chord];
        let p1p2 = points[chord + 1] - p1;
        let c2 = p1p2.dot(p1p2);
        let fraction = if c2 > 0.0 {
            ((check - p1).dot(p1p2) / c2).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let surface_distance = (check - (p1 + p1p2 * fraction)).norm();
        if nearest.is_none_or(|(_, _, best)| surface_distance < best) {
            nearest = Some((chord, fraction, surface_distance));
        }
    }
    nearest.map(|(chord, fraction, _)| (chord, fraction))
}

/// Straight segment leaving `begin` at dip `angle` below the horizontal.
fn project_on_straight_segment(
    begin: Point2,
    angle: f64,
    length: f64,
    check: Point2,
) -> (Option<SegmentProjection>, Point2) {
    let local = begin.system();
    let (sin_a, cos_a) = angle.sin_cos();
    let direction = Point2::new(cos_a, -sin_a, local);
    let below = Point2::new(-sin_a, -cos_a, local);
    let end = begin + direction * length;

    let offset = check - begin;
    let along = offset.dot(direction);
    if along < -Tolerance::ALONG_PLANE.eps || along > length {
        return (None, end);
    }

    let projection = begin + direction * along.max(0.0);
    (
        Some(SegmentProjection {
            distance: offset.dot(below),
            along,
            projection_height: projection[1],
        }),
        end,
    )
}

/// Circular segment whose dip changes linearly from `angle_top` to
/// `angle_bottom` over `length`.
fn project_on_arc_segment(
    begin: Point2,
    angle_top: f64,
    angle_bottom: f64,
    length: f64,
    check: Point2,
) -> (Option<SegmentProjection>, Point2) {
    let local = begin.system();
    let angle_change = angle_bottom - angle_top;
    let curvature = angle_change / length;
    let radius = 1.0 / curvature.abs();
    let signed_radius = 1.0 / curvature;

    let unit_at = |angle: f64| Point2::new(angle.sin(), angle.cos(), local);
    let center = begin - unit_at(angle_top) * signed_radius;
    let end = center + unit_at(angle_bottom) * signed_radius;

    let offset = check - center;
    let offset_norm = offset.norm();
    if offset_norm < f64::EPSILON * radius.max(1.0) {
        return (None, end);
    }

    let check_angle = if curvature > 0.0 {
        offset[0].atan2(offset[1])
    } else {
        (-offset[0]).atan2(-offset[1])
    };

    let mut swept = ((check_angle - angle_top) * curvature.signum()).rem_euclid(TAU);
    if swept > PI + 0.5 * angle_change.abs() {
        // Just before the start of the arc rather than far beyond its end.
        swept -= TAU;
    }
    let along = swept * radius;
    if along < -Tolerance::ALONG_PLANE.eps || along > length {
        return (None, end);
    }

    let distance = if curvature > 0.0 {
        radius - offset_norm
    } else {
        offset_norm - radius
    };
    let projection = center + unit_at(angle_top + curvature * along.max(0.0)) * signed_radius;

    (
        Some(SegmentProjection {
            distance,
            along,
            projection_height: projection[1],
        }),
        end,
    )
}

fn any_orthogonal(axis: Vec3) -> Vec3 {
    let helper = if axis.z.abs() < 0.9 { Vec3::Z } else { Vec3::new(1.0, 0.0, 0.0) };
    axis.cross(helper).normalized().unwrap_or(Vec3::new(1.0, 0.0, 0.0))
}

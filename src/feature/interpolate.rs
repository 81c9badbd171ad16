//! Local slab properties between the bracketing sections and segment ends.

use super::segment::Section;
use super::QueryError;
use crate::geom::DistanceResult;

/// Whether a point lies inside the slab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Membership {
    Inside,
    Outside,
}

/// Thickness, top truncation and slab length at a point's projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlabProperties {
    pub thickness: f64,
    pub top_truncation: f64,
    pub max_slab_length: f64,
}

impl SlabProperties {
    /// Bilinear interpolation over the section fraction and segment fraction,
    /// with the slab length interpolated over the section fraction only.
    pub fn interpolate(
        sections: &[Section],
        section_lengths: &[f64],
        distance: &DistanceResult,
    ) -> Result<Self, QueryError> {
        let (current, next) = bracket(sections.len(), distance.section)?;
        let segment = distance.segment;
        let lookup = |section: usize| {
            sections[section]
                .segment(segment)
                .ok_or(QueryError::SegmentOutOfRange {
                    segment,
                    segments: sections[section].len(),
                })
        };
        let (current_segment, next_segment) = (lookup(current)?, lookup(next)?);

        let along_segment = |pair: [f64; 2]| lerp(pair[0], pair[1], distance.segment_fraction);
        let across_sections = |a: f64, b: f64| lerp(a, b, distance.section_fraction);

        Ok(Self {
            thickness: across_sections(
                along_segment(current_segment.thickness),
                along_segment(next_segment.thickness),
            ),
            top_truncation: across_sections(
                along_segment(current_segment.top_truncation),
                along_segment(next_segment.top_truncation),
            ),
            max_slab_length: across_sections(section_lengths[current], section_lengths[next]),
        })
    }

    #[must_use]
    pub fn contains(&self, distance: &DistanceResult) -> Membership {
        if self.thickness.abs() < 2.0 * f64::EPSILON || self.thickness < self.top_truncation {
            return Membership::Outside;
        }
        let across = distance.distance_from_plane;
        let along = distance.distance_along_plane;
        if across >= self.top_truncation
            && across <= self.thickness
            && along >= 0.0
            && along <= self.max_slab_length
        {
            Membership::Inside
        } else {
            Membership::Outside
        }
    }
}

/// Current and next section indices; the next index is clamped to the last
/// section.
pub(crate) fn bracket(section_count: usize, section: usize) -> Result<(usize, usize), QueryError> {
    if section >= section_count {
        return Err(QueryError::SectionOutOfRange {
            section,
            sections: section_count,
        });
    }
    Ok((section, (section + 1).min(section_count - 1)))
}

/// Linear blend that returns `a` and `b` exactly at `t = 0` and `t = 1`.
pub(crate) fn lerp(a: f64, b: f64, t: f64) -> f64 {
    (1.0 - t) * a + t * b
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::segment::Segment;

    fn section(thickness: [f64; 2], top_truncation: [f64; 2]) -> Section {
        Section::new(vec![Segment {
            length: 100.0,
            thickness,
            top_truncation,
            angle: [0.0, 0.0],
            temperature_models: Vec::new(),
            composition_models: Vec::new(),
            grains_models: Vec::new(),
        }])
    }

    fn at(section_fraction: f64, segment_fraction: f64, from_plane: f64, along: f64) -> DistanceResult {
        DistanceResult {
            distance_from_plane: from_plane,
            distance_along_plane: along,
            section: 0,
            section_fraction,
            segment: 0,
            segment_fraction,
            average_angle: 0.0,
            depth_reference_surface: 0.0,
        }
    }

    #[test]
    fn bilinear_corners_and_centre() {
        let sections = [section([10.0, 20.0], [0.0, 0.0]), section([30.0, 40.0], [0.0, 0.0])];
        let lengths = [100.0, 300.0];
        let corner = SlabProperties::interpolate(&sections, &lengths, &at(1.0, 1.0, 0.0, 0.0)).unwrap();
        assert_eq!(corner.thickness, 40.0);
        assert_eq!(corner.max_slab_length, 300.0);
        let centre = SlabProperties::interpolate(&sections, &lengths, &at(0.5, 0.5, 0.0, 0.0)).unwrap();
        assert!((centre.thickness - 25.0).abs() < 1e-12);
        assert!((centre.max_slab_length - 200.0).abs() < 1e-12);
    }

    #[test]
    fn membership_rules() {
        let properties = SlabProperties {
            thickness: 50.0,
            top_truncation: 10.0,
            max_slab_length: 100.0,
        };
        assert_eq!(properties.contains(&at(0.0, 0.0, 30.0, 50.0)), Membership::Inside);
        assert_eq!(properties.contains(&at(0.0, 0.0, 5.0, 50.0)), Membership::Outside);
        assert_eq!(properties.contains(&at(0.0, 0.0, 30.0, 150.0)), Membership::Outside);
        assert_eq!(properties.contains(&at(0.0, 0.0, 30.0, -1.0)), Membership::Outside);

        let closed = SlabProperties {
            thickness: 5.0,
            ..properties
        };
        assert_eq!(closed.contains(&at(0.0, 0.0, 7.0, 50.0)), Membership::Outside);

        let vanished = SlabProperties {
            thickness: 0.0,
            top_truncation: 0.0,
            max_slab_length: 100.0,
        };
        assert_eq!(vanished.contains(&at(0.0, 0.0, 0.0, 50.0)), Membership::Outside);
    }

    #[test]
    fn last_section_clamps_next() {
        assert_eq!(bracket(3, 2).unwrap(), (2, 2));
        assert!(matches!(
            bracket(3, 3),
            Err(QueryError::SectionOutOfRange { section: 3, sections: 3 })
        ));
    }
}

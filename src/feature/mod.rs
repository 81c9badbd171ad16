//! Curved surface features and their field queries.
//!
//! A query is culled by depth and by the feature's surface bounding box,
//! located relative to the curved planes, tested for slab membership, and
//! finally handed to the submodels of the bracketing segments.

pub mod config;
pub mod dispatch;
pub mod interpolate;
pub mod segment;

use thiserror::Error;

use crate::geom::{
    BoundingBox2, CoordinateSystem, CurvedPlaneQuery, DistanceResult, NaturalCoordinate, Path,
    Point2, Point3, SurfaceExtrema, distance_from_curved_planes,
};
use crate::models::{AdditionalParameters, Grains, ModelArena, ModelInput, ModelKind};

pub use config::{ConfigError, FeatureConfig, ModelConfig, SectionConfig, SegmentConfig, WorldSettings};
pub use dispatch::SectionBracket;
pub use interpolate::{Membership, SlabProperties};
pub use segment::{Section, Segment};

/// Errors that abort a single query.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    #[error("starting radius must be positive, got {radius}")]
    NonPositiveStartingRadius { radius: f64 },
    #[error("{kind} model '{model}' returned non-finite value {value}")]
    NonFiniteOutput {
        kind: ModelKind,
        model: &'static str,
        value: f64,
    },
    #[error("grains model '{model}' returned non-finite grains")]
    NonFiniteGrains { model: &'static str },
    #[error("section {section} out of range for {sections} sections")]
    SectionOutOfRange { section: usize, sections: usize },
    #[error("segment {segment} out of range for {segments} segments")]
    SegmentOutOfRange { segment: usize, segments: usize },
    #[error("no {kind} model with handle {handle}")]
    InvalidModelHandle { kind: ModelKind, handle: usize },
    #[error("grain count changed between sections: {current} vs {next}")]
    GrainCountMismatch { current: usize, next: usize },
}

/// Validated pieces a [`Feature`] is assembled from.
pub(crate) struct FeatureParts {
    pub name: String,
    pub system: CoordinateSystem,
    pub reference_point: Point2,
    pub starting_depth: f64,
    pub maximum_depth: f64,
    pub path: Path,
    pub sections: Vec<Section>,
    pub extrema: SurfaceExtrema,
    pub models: ModelArena,
}

/// A point that passed every cull and lies inside the slab.
#[derive(Debug, Clone, Copy)]
struct Located {
    distance: DistanceResult,
    properties: SlabProperties,
}

/// A curved surface feature, immutable once built.
#[derive(Debug)]
pub struct Feature {
    name: String,
    system: CoordinateSystem,
    reference_point: Point2,
    starting_depth: f64,
    maximum_depth: f64,
    path: Path,
    sections: Vec<Section>,
    segment_lengths: Vec<Vec<f64>>,
    segment_angles: Vec<Vec<[f64; 2]>>,
    section_lengths: Vec<f64>,
    max_total_slab_length: f64,
    max_slab_thickness: f64,
    extrema: SurfaceExtrema,
    models: ModelArena,
}

impl Feature {
    pub(crate) fn assemble(parts: FeatureParts) -> Self {
        let segment_lengths: Vec<Vec<f64>> = parts.sections.iter().map(Section::lengths).collect();
        let segment_angles: Vec<Vec<[f64; 2]>> = parts.sections.iter().map(Section::angles).collect();
        let section_lengths: Vec<f64> = parts.sections.iter().map(Section::total_length).collect();
        let max_total_slab_length = section_lengths.iter().copied().fold(0.0, f64::max);
        let max_slab_thickness = parts
            .sections
            .iter()
            .map(Section::max_thickness)
            .fold(0.0, f64::max);

        log::debug!(
            "feature '{}': {} coordinates ({} after resampling), {} segments, max slab length {}, max thickness {}, models {:?}",
            parts.name,
            parts.path.original_len(),
            parts.path.len(),
            parts.sections.first().map_or(0, Section::len),
            max_total_slab_length,
            max_slab_thickness,
            parts.models.counts()
        );

        Self {
            name: parts.name,
            system: parts.system,
            reference_point: parts.reference_point,
            starting_depth: parts.starting_depth,
            maximum_depth: parts.maximum_depth,
            path: parts.path,
            sections: parts.sections,
            segment_lengths,
            segment_angles,
            section_lengths,
            max_total_slab_length,
            max_slab_thickness,
            extrema: parts.extrema,
            models: parts.models,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn coordinate_system(&self) -> CoordinateSystem {
        self.system
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    #[must_use]
    pub fn models(&self) -> &ModelArena {
        &self.models
    }

    #[must_use]
    pub fn max_total_slab_length(&self) -> f64 {
        self.max_total_slab_length
    }

    #[must_use]
    pub fn max_slab_thickness(&self) -> f64 {
        self.max_slab_thickness
    }

    fn starting_radius(&self, natural: &NaturalCoordinate, depth: f64) -> f64 {
        natural.depth_coordinate() + depth - self.starting_depth
    }

    /// Surface region outside of which the feature cannot affect a point at
    /// `depth`.
    #[must_use]
    pub fn bounding_box(&self, natural: &NaturalCoordinate, depth: f64) -> BoundingBox2 {
        let starting_radius = self.starting_radius(natural, depth);
        if self.system == CoordinateSystem::Spherical && starting_radius <= 0.0 {
            return BoundingBox2::new([f64::NEG_INFINITY; 2], [f64::INFINITY; 2]);
        }
        let buffer = self.max_slab_thickness + self.max_total_slab_length;
        self.extrema.bounding_box(self.system, buffer, starting_radius)
    }

    /// Same point with its longitude taken on the side of the antimeridian
    /// the trace lies on.
    fn wrap_to_trace(&self, natural: &NaturalCoordinate) -> NaturalCoordinate {
        let mut natural = *natural;
        if self.system == CoordinateSystem::Spherical {
            natural.surface[0] = self.extrema.wrap_longitude(natural.surface[0]);
        }
        natural
    }

    fn depth_in_range(&self, depth: f64) -> bool {
        depth >= self.starting_depth
            && depth <= self.maximum_depth
            && depth <= self.max_total_slab_length + self.max_slab_thickness
    }

    /// Position of a point relative to the curved planes of the feature.
    ///
    /// Points rejected by the depth range or the bounding box get
    /// [`DistanceResult::NOT_ASSOCIATED`].
    pub fn distance_to_planes(
        &self,
        position: Point3,
        natural: &NaturalCoordinate,
        depth: f64,
    ) -> Result<DistanceResult, QueryError> {
        debug_assert_eq!(natural.system, self.system, "query in a different coordinate system");
        if !self.depth_in_range(depth) {
            return Ok(DistanceResult::NOT_ASSOCIATED);
        }

        let natural = &self.wrap_to_trace(natural);
        let starting_radius = self.starting_radius(natural, depth);
        if starting_radius <= 0.0 {
            return Err(QueryError::NonPositiveStartingRadius {
                radius: starting_radius,
            });
        }
        if !self
            .bounding_box(natural, depth)
            .point_inside(natural.surface_point())
        {
            return Ok(DistanceResult::NOT_ASSOCIATED);
        }

        let query = CurvedPlaneQuery {
            position: position.to_vec3(),
            natural: *natural,
            reference_point: self.reference_point,
            path: &self.path,
            segment_lengths: &self.segment_lengths,
            segment_angles: &self.segment_angles,
            starting_radius,
            system: self.system,
        };
        Ok(distance_from_curved_planes(&query))
    }

    fn locate(
        &self,
        position: Point3,
        natural: &NaturalCoordinate,
        depth: f64,
    ) -> Result<Option<Located>, QueryError> {
        let distance = self.distance_to_planes(position, natural, depth)?;
        if !distance.is_associated() {
            return Ok(None);
        }
        let properties = SlabProperties::interpolate(&self.sections, &self.section_lengths, &distance)?;
        let membership = properties.contains(&distance);
        log::trace!(
            "feature '{}': distance {} along {} thickness {} -> {:?}",
            self.name,
            distance.distance_from_plane,
            distance.distance_along_plane,
            properties.thickness,
            membership
        );
        Ok((membership == Membership::Inside).then_some(Located {
            distance,
            properties,
        }))
    }

    fn model_input<'a>(
        &self,
        position: Point3,
        depth: f64,
        located: &'a Located,
        gravity_norm: f64,
        composition_index: usize,
    ) -> ModelInput<'a> {
        ModelInput {
            position: position.to_vec3(),
            depth,
            gravity_norm,
            composition_index,
            feature_min_depth: self.starting_depth,
            feature_max_depth: self.maximum_depth,
            distance: &located.distance,
            additional: AdditionalParameters {
                max_slab_length: located.properties.max_slab_length,
                thickness: located.properties.thickness,
            },
        }
    }

    fn bracket(&self, located: &Located) -> Result<SectionBracket<'_>, QueryError> {
        SectionBracket::new(
            &self.sections,
            located.distance.section,
            located.distance.segment,
            located.distance.section_fraction,
        )
    }

    /// Temperature at a point; `temperature` is returned unchanged outside
    /// the feature.
    pub fn temperature(
        &self,
        position: Point3,
        natural: &NaturalCoordinate,
        depth: f64,
        gravity_norm: f64,
        temperature: f64,
    ) -> Result<f64, QueryError> {
        let Some(located) = self.locate(position, natural, depth)? else {
            return Ok(temperature);
        };
        let input = self.model_input(position, depth, &located, gravity_norm, 0);
        dispatch::temperature(&self.models, &self.bracket(&located)?, &input, temperature)
    }

    /// Fraction of composition `composition_index` at a point; `value` is
    /// returned unchanged outside the feature.
    pub fn composition(
        &self,
        position: Point3,
        natural: &NaturalCoordinate,
        depth: f64,
        composition_index: usize,
        value: f64,
    ) -> Result<f64, QueryError> {
        let Some(located) = self.locate(position, natural, depth)? else {
            return Ok(value);
        };
        let input = self.model_input(position, depth, &located, 0.0, composition_index);
        dispatch::composition(&self.models, &self.bracket(&located)?, &input, value)
    }

    /// Grain fabric of composition `composition_index` at a point; `grains`
    /// is returned unchanged outside the feature.
    pub fn grains(
        &self,
        position: Point3,
        natural: &NaturalCoordinate,
        depth: f64,
        composition_index: usize,
        grains: &Grains,
    ) -> Result<Grains, QueryError> {
        let Some(located) = self.locate(position, natural, depth)? else {
            return Ok(grains.clone());
        };
        let input = self.model_input(position, depth, &located, 0.0, composition_index);
        dispatch::grains(&self.models, &self.bracket(&located)?, &input, grains)
    }
}

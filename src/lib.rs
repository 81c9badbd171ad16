#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! Temperature, composition and grain fabric of curved geological features
//! such as subducting slabs and faults.
//!
//! A [`Feature`] is built once from a [`FeatureConfig`] and then queried
//! concurrently. Each query locates the point relative to the feature's curved
//! planes, checks whether it lies inside the slab and, if so, lets the
//! submodels of the bracketing sections produce the new field value.

pub mod batch;
pub mod feature;
pub mod geom;
pub mod models;

pub use feature::{
    ConfigError, Feature, FeatureConfig, ModelConfig, QueryError, SectionConfig, SegmentConfig,
    WorldSettings,
};
pub use geom::{CoordinateSystem, DistanceResult, NaturalCoordinate, Point3};
pub use models::{Grains, ModelError, ModelParams, ModelRegistry};

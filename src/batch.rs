//! Field evaluation over many query points.
//!
//! Features are applied to every point in order, each one seeing the value
//! left by the previous. With the `parallel` feature the points are spread
//! over the rayon thread pool.

use crate::feature::{Feature, QueryError};
use crate::geom::{CoordinateSystem, NaturalCoordinate, Point3};
use crate::models::Grains;

/// A query position with its natural coordinate and depth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueryPoint {
    pub position: Point3,
    pub natural: NaturalCoordinate,
    pub depth: f64,
}

impl QueryPoint {
    #[must_use]
    pub fn new(system: CoordinateSystem, position: Point3, depth: f64) -> Self {
        Self {
            position,
            natural: system.to_natural(position),
            depth,
        }
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "parallel")] {
        use rayon::prelude::*;

        fn map_points<T, F>(points: &[QueryPoint], evaluate: F) -> Result<Vec<T>, QueryError>
        where
            T: Send,
            F: Fn(&QueryPoint) -> Result<T, QueryError> + Sync + Send,
        {
            points.par_iter().map(evaluate).collect()
        }
    } else {
        fn map_points<T, F>(points: &[QueryPoint], evaluate: F) -> Result<Vec<T>, QueryError>
        where
            F: Fn(&QueryPoint) -> Result<T, QueryError>,
        {
            points.iter().map(evaluate).collect()
        }
    }
}

pub fn temperatures(
    features: &[Feature],
    points: &[QueryPoint],
    gravity_norm: f64,
    initial: f64,
) -> Result<Vec<f64>, QueryError> {
    log::debug!("evaluating temperature at {} points", points.len());
    map_points(points, |p| {
        features.iter().try_fold(initial, |value, feature| {
            feature.temperature(p.position, &p.natural, p.depth, gravity_norm, value)
        })
    })
}

pub fn compositions(
    features: &[Feature],
    points: &[QueryPoint],
    composition_index: usize,
    initial: f64,
) -> Result<Vec<f64>, QueryError> {
    log::debug!(
        "evaluating composition {composition_index} at {} points",
        points.len()
    );
    map_points(points, |p| {
        features.iter().try_fold(initial, |value, feature| {
            feature.composition(p.position, &p.natural, p.depth, composition_index, value)
        })
    })
}

pub fn grains(
    features: &[Feature],
    points: &[QueryPoint],
    composition_index: usize,
    initial: &Grains,
) -> Result<Vec<Grains>, QueryError> {
    log::debug!("evaluating grains {composition_index} at {} points", points.len());
    map_points(points, |p| {
        features.iter().try_fold(initial.clone(), |value, feature| {
            feature.grains(p.position, &p.natural, p.depth, composition_index, &value)
        })
    })
}

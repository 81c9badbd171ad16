//! Folding a segment's submodels into a field value and blending the results
//! of the two bracketing sections.

use super::interpolate::{bracket, lerp};
use super::segment::{Section, Segment};
use super::QueryError;
use crate::geom::slerp_rotation;
use crate::models::{Grains, ModelArena, ModelHandle, ModelInput, ModelKind};

/// The segment a point falls in, in the current and the next section.
#[derive(Debug, Clone, Copy)]
pub struct SectionBracket<'a> {
    pub current: &'a Segment,
    pub next: &'a Segment,
    pub fraction: f64,
}

impl<'a> SectionBracket<'a> {
    /// Resolves `segment` in `section` and the section after it. The next
    /// section is clamped to the last one.
    pub fn new(
        sections: &'a [Section],
        section: usize,
        segment: usize,
        fraction: f64,
    ) -> Result<Self, QueryError> {
        let (current, next) = bracket(sections.len(), section)?;
        let resolve = |index: usize| {
            sections[index]
                .segment(segment)
                .ok_or(QueryError::SegmentOutOfRange {
                    segment,
                    segments: sections[index].len(),
                })
        };
        Ok(Self {
            current: resolve(current)?,
            next: resolve(next)?,
            fraction,
        })
    }
}

fn missing(kind: ModelKind, handle: ModelHandle) -> QueryError {
    QueryError::InvalidModelHandle {
        kind,
        handle: handle.index(),
    }
}

fn fold_temperature(
    models: &ModelArena,
    handles: &[ModelHandle],
    input: &ModelInput<'_>,
    value: f64,
) -> Result<f64, QueryError> {
    handles.iter().try_fold(value, |acc, &handle| {
        let model = models
            .temperature(handle)
            .ok_or_else(|| missing(ModelKind::Temperature, handle))?;
        finite(ModelKind::Temperature, model.name(), model.evaluate(input, acc))
    })
}

fn fold_composition(
    models: &ModelArena,
    handles: &[ModelHandle],
    input: &ModelInput<'_>,
    value: f64,
) -> Result<f64, QueryError> {
    handles.iter().try_fold(value, |acc, &handle| {
        let model = models
            .composition(handle)
            .ok_or_else(|| missing(ModelKind::Composition, handle))?;
        finite(ModelKind::Composition, model.name(), model.evaluate(input, acc))
    })
}

fn fold_grains(
    models: &ModelArena,
    handles: &[ModelHandle],
    input: &ModelInput<'_>,
    grains: &Grains,
) -> Result<Grains, QueryError> {
    handles.iter().try_fold(grains.clone(), |acc, &handle| {
        let model = models
            .grains(handle)
            .ok_or_else(|| missing(ModelKind::Grains, handle))?;
        let next = model.evaluate(input, acc);
        if next.is_finite() {
            Ok(next)
        } else {
            Err(QueryError::NonFiniteGrains { model: model.name() })
        }
    })
}

fn finite(kind: ModelKind, model: &'static str, value: f64) -> Result<f64, QueryError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(QueryError::NonFiniteOutput { kind, model, value })
    }
}

pub fn temperature(
    models: &ModelArena,
    bracket: &SectionBracket<'_>,
    input: &ModelInput<'_>,
    temperature: f64,
) -> Result<f64, QueryError> {
    let current = fold_temperature(models, &bracket.current.temperature_models, input, temperature)?;
    let next = fold_temperature(models, &bracket.next.temperature_models, input, temperature)?;
    Ok(lerp(current, next, bracket.fraction))
}

pub fn composition(
    models: &ModelArena,
    bracket: &SectionBracket<'_>,
    input: &ModelInput<'_>,
    fraction: f64,
) -> Result<f64, QueryError> {
    let current = fold_composition(models, &bracket.current.composition_models, input, fraction)?;
    let next = fold_composition(models, &bracket.next.composition_models, input, fraction)?;
    Ok(lerp(current, next, bracket.fraction))
}

/// Sizes blend linearly, orientations by quaternion slerp.
pub fn grains(
    models: &ModelArena,
    bracket: &SectionBracket<'_>,
    input: &ModelInput<'_>,
    grains: &Grains,
) -> Result<Grains, QueryError> {
    let current = fold_grains(models, &bracket.current.grains_models, input, grains)?;
    let next = fold_grains(models, &bracket.next.grains_models, input, grains)?;
    blend_grains(current, next, bracket.fraction)
}

pub(crate) fn blend_grains(current: Grains, next: Grains, fraction: f64) -> Result<Grains, QueryError> {
    if current.len() != next.len() || current.rotation_matrices.len() != next.rotation_matrices.len() {
        return Err(QueryError::GrainCountMismatch {
            current: current.len(),
            next: next.len(),
        });
    }
    if fraction <= 0.0 {
        return Ok(current);
    }
    if fraction >= 1.0 {
        return Ok(next);
    }

    let sizes = current
        .sizes
        .iter()
        .zip(&next.sizes)
        .map(|(&a, &b)| lerp(a, b, fraction))
        .collect();
    let rotation_matrices = current
        .rotation_matrices
        .iter()
        .zip(&next.rotation_matrices)
        .map(|(a, b)| slerp_rotation(a, b, fraction))
        .collect();
    Ok(Grains {
        sizes,
        rotation_matrices,
    })
}

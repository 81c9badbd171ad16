//! Built-in composition models.

use super::{CompositionModel, ModelError, ModelInput, ModelParams};

/// Assigns fixed fractions to listed compositions inside a window of distances
/// from the top of the feature. Unlisted compositions are set to zero there.
#[derive(Debug, Clone, PartialEq)]
pub struct UniformComposition {
    compositions: Vec<usize>,
    fractions: Vec<f64>,
    min_distance: f64,
    max_distance: f64,
}

impl UniformComposition {
    pub fn new(
        compositions: Vec<usize>,
        fractions: Vec<f64>,
        min_distance: f64,
        max_distance: f64,
    ) -> Result<Self, ModelError> {
        if compositions.len() != fractions.len() {
            return Err(ModelError::LengthMismatch {
                first: "compositions",
                first_len: compositions.len(),
                second: "fractions",
                second_len: fractions.len(),
            });
        }
        Ok(Self {
            compositions,
            fractions,
            min_distance,
            max_distance,
        })
    }

    /// Reads `compositions`, `fractions`, `min distance slab top` (default 0),
    /// `max distance slab top` (default unbounded) and `operation`.
    pub fn from_params(params: &ModelParams) -> Result<Box<dyn CompositionModel>, ModelError> {
        let operation = params.text_or("operation", "replace")?;
        if !operation.eq_ignore_ascii_case("replace") {
            return Err(ModelError::UnsupportedOperation {
                name: "operation",
                operation,
            });
        }
        let model = Self::new(
            params.indices("compositions")?,
            params.numbers("fractions")?,
            params.number_or("min distance slab top", 0.0)?,
            params.number_or("max distance slab top", f64::INFINITY)?,
        )?;
        Ok(Box::new(model))
    }
}

impl CompositionModel for UniformComposition {
    fn name(&self) -> &'static str {
        "uniform"
    }

    fn evaluate(&self, input: &ModelInput<'_>, fraction: f64) -> f64 {
        let distance = input.distance.distance_from_plane;
        if distance < self.min_distance || distance > self.max_distance {
            return fraction;
        }
        self.compositions
            .iter()
            .position(|&c| c == input.composition_index)
            .map_or(0.0, |i| self.fractions[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::{DistanceResult, Vec3};
    use crate::models::AdditionalParameters;

    fn input(distance: &DistanceResult, composition_index: usize) -> ModelInput<'_> {
        ModelInput {
            position: Vec3::ZERO,
            depth: 0.0,
            gravity_norm: 0.0,
            composition_index,
            feature_min_depth: 0.0,
            feature_max_depth: f64::INFINITY,
            distance,
            additional: AdditionalParameters::default(),
        }
    }

    #[test]
    fn listed_and_unlisted_compositions() {
        let model = UniformComposition::new(vec![2], vec![0.8], 10e3, 50e3).unwrap();
        let inside = DistanceResult {
            distance_from_plane: 30e3,
            ..DistanceResult::NOT_ASSOCIATED
        };
        assert_eq!(model.evaluate(&input(&inside, 2), 0.0), 0.8);
        assert_eq!(model.evaluate(&input(&inside, 1), 0.5), 0.0);

        let above = DistanceResult {
            distance_from_plane: 5e3,
            ..DistanceResult::NOT_ASSOCIATED
        };
        assert_eq!(model.evaluate(&input(&above, 2), 0.3), 0.3);
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let params = ModelParams::new()
            .with("compositions", vec![0.0, 1.0])
            .with("fractions", vec![1.0]);
        assert!(matches!(
            UniformComposition::from_params(&params),
            Err(ModelError::LengthMismatch {
                first_len: 2,
                second_len: 1,
                ..
            })
        ));
    }

    #[test]
    fn only_replace_is_supported() {
        let params = ModelParams::new()
            .with("compositions", vec![0.0])
            .with("fractions", vec![1.0])
            .with("operation", "add");
        assert!(matches!(
            UniformComposition::from_params(&params),
            Err(ModelError::UnsupportedOperation { .. })
        ));
    }
}

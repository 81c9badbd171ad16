//! Built-in temperature models.

use super::{ModelError, ModelInput, ModelParams, TemperatureModel};

/// Replaces the temperature with a constant inside a window of distances from
/// the top of the feature.
#[derive(Debug, Clone, PartialEq)]
pub struct UniformTemperature {
    temperature: f64,
    min_distance: f64,
    max_distance: f64,
}

impl UniformTemperature {
    #[must_use]
    pub fn new(temperature: f64, min_distance: f64, max_distance: f64) -> Self {
        Self {
            temperature,
            min_distance,
            max_distance,
        }
    }

    /// Reads `temperature`, `min distance slab top` (default 0) and
    /// `max distance slab top` (default unbounded).
    pub fn from_params(params: &ModelParams) -> Result<Box<dyn TemperatureModel>, ModelError> {
        let temperature = params.number("temperature")?;
        let min_distance = params.number_or("min distance slab top", 0.0)?;
        let max_distance = params.number_or("max distance slab top", f64::INFINITY)?;
        if min_distance > max_distance {
            return Err(ModelError::InvalidValue {
                name: "min distance slab top",
                reason: format!("{min_distance} exceeds max distance slab top {max_distance}"),
            });
        }
        Ok(Box::new(Self::new(temperature, min_distance, max_distance)))
    }
}

impl TemperatureModel for UniformTemperature {
    fn name(&self) -> &'static str {
        "uniform"
    }

    fn evaluate(&self, input: &ModelInput<'_>, temperature: f64) -> f64 {
        let distance = input.distance.distance_from_plane;
        if distance >= self.min_distance && distance <= self.max_distance {
            self.temperature
        } else {
            temperature
        }
    }
}

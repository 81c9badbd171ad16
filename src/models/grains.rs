//! Grain fabric values and the built-in grains models.

use super::{GrainsModel, ModelError, ModelInput, ModelParams};
use crate::geom::{IDENTITY_ROTATION, RotationMatrix, euler_zxz_to_matrix, is_finite_matrix};

/// Per-crystal grain sizes and orientations.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Grains {
    pub sizes: Vec<f64>,
    pub rotation_matrices: Vec<RotationMatrix>,
}

impl Grains {
    /// `count` crystals of equal size and identity orientation.
    #[must_use]
    pub fn uniform(count: usize) -> Self {
        let size = if count == 0 { 0.0 } else { 1.0 / count as f64 };
        Self {
            sizes: vec![size; count],
            rotation_matrices: vec![IDENTITY_ROTATION; count],
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.sizes.iter().all(|s| s.is_finite())
            && self.rotation_matrices.iter().all(is_finite_matrix)
    }
}

/// Sets every crystal of a listed composition to one orientation and size,
/// within a window of absolute distances from the fault centre.
#[derive(Debug, Clone, PartialEq)]
pub struct UniformGrains {
    compositions: Vec<usize>,
    rotation_matrices: Vec<RotationMatrix>,
    grain_sizes: Vec<f64>,
    min_distance: f64,
    max_distance: f64,
}

impl UniformGrains {
    const EULER_ANGLES: &'static str = "Euler angles z-x-z";
    const ROTATION_MATRICES: &'static str = "rotation matrices";

    /// Reads `compositions`, exactly one of `rotation matrices` or
    /// `Euler angles z-x-z` (degrees), `grain sizes` (a negative size means an
    /// equal share of all crystals), `min/max distance fault center` and
    /// `orientation operation`.
    pub fn from_params(params: &ModelParams) -> Result<Box<dyn GrainsModel>, ModelError> {
        let operation = params.text_or("orientation operation", "replace")?;
        if !operation.eq_ignore_ascii_case("replace") {
            return Err(ModelError::UnsupportedOperation {
                name: "orientation operation",
                operation,
            });
        }

        let rotation_matrices = match (
            params.contains(Self::EULER_ANGLES),
            params.contains(Self::ROTATION_MATRICES),
        ) {
            (true, true) => {
                return Err(ModelError::MutuallyExclusive {
                    first: Self::EULER_ANGLES,
                    second: Self::ROTATION_MATRICES,
                });
            }
            (false, false) => {
                return Err(ModelError::NeitherSet {
                    first: Self::EULER_ANGLES,
                    second: Self::ROTATION_MATRICES,
                });
            }
            (true, false) => params
                .triples(Self::EULER_ANGLES)?
                .into_iter()
                .map(|[phi1, theta, phi2]| euler_zxz_to_matrix(phi1, theta, phi2))
                .collect(),
            (false, true) => params.matrices(Self::ROTATION_MATRICES)?,
        };

        let compositions = params.indices("compositions")?;
        let grain_sizes = params.numbers("grain sizes")?;
        if compositions.len() != rotation_matrices.len() {
            return Err(ModelError::LengthMismatch {
                first: "compositions",
                first_len: compositions.len(),
                second: "rotation matrices",
                second_len: rotation_matrices.len(),
            });
        }
        if compositions.len() != grain_sizes.len() {
            return Err(ModelError::LengthMismatch {
                first: "compositions",
                first_len: compositions.len(),
                second: "grain sizes",
                second_len: grain_sizes.len(),
            });
        }

        Ok(Box::new(Self {
            compositions,
            rotation_matrices,
            grain_sizes,
            min_distance: params.number_or("min distance fault center", 0.0)?,
            max_distance: params.number_or("max distance fault center", f64::INFINITY)?,
        }))
    }
}

impl GrainsModel for UniformGrains {
    fn name(&self) -> &'static str {
        "uniform"
    }

    fn evaluate(&self, input: &ModelInput<'_>, mut grains: Grains) -> Grains {
        let distance = input.distance.distance_from_plane.abs();
        if distance < self.min_distance || distance > self.max_distance {
            return grains;
        }
        let Some(i) = self
            .compositions
            .iter()
            .position(|&c| c == input.composition_index)
        else {
            return grains;
        };

        let size = if self.grain_sizes[i] < 0.0 {
            1.0 / grains.sizes.len() as f64
        } else {
            self.grain_sizes[i]
        };
        grains.sizes.fill(size);
        grains.rotation_matrices.fill(self.rotation_matrices[i]);
        grains
    }
}

//! Submodels that turn a feature's geometry into field values.
//!
//! Every feature owns a [`ModelArena`] holding its submodel instances; segments
//! refer to them through [`ModelHandle`]s. Instances are created by name through
//! a [`ModelRegistry`], which is populated before any feature is built and only
//! read afterwards.

pub mod composition;
pub mod grains;
pub mod params;
pub mod temperature;

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use crate::feature::ConfigError;
use crate::geom::{DistanceResult, Vec3};

pub use grains::Grains;
pub use params::{ModelParams, ParamValue};

/// Errors raised while building a model from its parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("missing parameter '{0}'")]
    MissingParameter(String),
    #[error("parameter '{name}' must be {expected}")]
    WrongType { name: String, expected: &'static str },
    #[error("'{first}' has {first_len} entries but '{second}' has {second_len}")]
    LengthMismatch {
        first: &'static str,
        first_len: usize,
        second: &'static str,
        second_len: usize,
    },
    #[error("only one of '{first}' and '{second}' may be set, but both are")]
    MutuallyExclusive { first: &'static str, second: &'static str },
    #[error("one of '{first}' or '{second}' has to be set, but neither is")]
    NeitherSet { first: &'static str, second: &'static str },
    #[error("unsupported {name} '{operation}'")]
    UnsupportedOperation { name: &'static str, operation: String },
    #[error("parameter '{name}' is invalid: {reason}")]
    InvalidValue { name: &'static str, reason: String },
}

/// The three families of submodels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ModelKind {
    Temperature,
    Composition,
    Grains,
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Temperature => f.write_str("temperature"),
            Self::Composition => f.write_str("composition"),
            Self::Grains => f.write_str("grains"),
        }
    }
}

/// Feature-level quantities at the query point, computed by the property
/// interpolator.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AdditionalParameters {
    pub max_slab_length: f64,
    pub thickness: f64,
}

/// Everything a submodel may look at when evaluating a point.
#[derive(Debug, Clone, Copy)]
pub struct ModelInput<'a> {
    /// Query position in Cartesian coordinates.
    pub position: Vec3,
    pub depth: f64,
    /// Only meaningful for temperature models.
    pub gravity_norm: f64,
    /// Only meaningful for composition and grains models.
    pub composition_index: usize,
    pub feature_min_depth: f64,
    pub feature_max_depth: f64,
    pub distance: &'a DistanceResult,
    pub additional: AdditionalParameters,
}

/// Temperature submodel. Must be a pure function of its inputs.
pub trait TemperatureModel: fmt::Debug + Send + Sync {
    fn name(&self) -> &'static str;
    fn evaluate(&self, input: &ModelInput<'_>, temperature: f64) -> f64;
}

/// Compositional fraction submodel. Must be a pure function of its inputs.
pub trait CompositionModel: fmt::Debug + Send + Sync {
    fn name(&self) -> &'static str;
    fn evaluate(&self, input: &ModelInput<'_>, fraction: f64) -> f64;
}

/// Grain fabric submodel. Must be a pure function of its inputs.
pub trait GrainsModel: fmt::Debug + Send + Sync {
    fn name(&self) -> &'static str;
    fn evaluate(&self, input: &ModelInput<'_>, grains: Grains) -> Grains;
}

/// Index of a submodel inside its feature's [`ModelArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelHandle(usize);

impl ModelHandle {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Owning storage of every submodel instance of one feature.
#[derive(Debug, Default)]
pub struct ModelArena {
    temperature: Vec<Box<dyn TemperatureModel>>,
    composition: Vec<Box<dyn CompositionModel>>,
    grains: Vec<Box<dyn GrainsModel>>,
}

impl ModelArena {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_temperature(&mut self, model: Box<dyn TemperatureModel>) -> ModelHandle {
        self.temperature.push(model);
        ModelHandle(self.temperature.len() - 1)
    }

    pub fn push_composition(&mut self, model: Box<dyn CompositionModel>) -> ModelHandle {
        self.composition.push(model);
        ModelHandle(self.composition.len() - 1)
    }

    pub fn push_grains(&mut self, model: Box<dyn GrainsModel>) -> ModelHandle {
        self.grains.push(model);
        ModelHandle(self.grains.len() - 1)
    }

    #[must_use]
    pub fn temperature(&self, handle: ModelHandle) -> Option<&dyn TemperatureModel> {
        self.temperature.get(handle.0).map(AsRef::as_ref)
    }

    #[must_use]
    pub fn composition(&self, handle: ModelHandle) -> Option<&dyn CompositionModel> {
        self.composition.get(handle.0).map(AsRef::as_ref)
    }

    #[must_use]
    pub fn grains(&self, handle: ModelHandle) -> Option<&dyn GrainsModel> {
        self.grains.get(handle.0).map(AsRef::as_ref)
    }

    /// Number of instances per kind: temperature, composition, grains.
    #[must_use]
    pub fn counts(&self) -> [usize; 3] {
        [self.temperature.len(), self.composition.len(), self.grains.len()]
    }
}

pub type TemperatureFactory = fn(&ModelParams) -> Result<Box<dyn TemperatureModel>, ModelError>;
pub type CompositionFactory = fn(&ModelParams) -> Result<Box<dyn CompositionModel>, ModelError>;
pub type GrainsFactory = fn(&ModelParams) -> Result<Box<dyn GrainsModel>, ModelError>;

/// Name to factory mapping for every submodel kind.
///
/// Build it once, register every model, then share it immutably with
/// [`Feature::from_config`](crate::feature::Feature::from_config).
#[derive(Debug, Clone)]
pub struct ModelRegistry {
    temperature: BTreeMap<String, TemperatureFactory>,
    composition: BTreeMap<String, CompositionFactory>,
    grains: BTreeMap<String, GrainsFactory>,
}

impl Default for ModelRegistry {
    /// Registry with the built-in `uniform` models.
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register_temperature("uniform", temperature::UniformTemperature::from_params);
        registry.register_composition("uniform", composition::UniformComposition::from_params);
        registry.register_grains("uniform", grains::UniformGrains::from_params);
        registry
    }
}

impl ModelRegistry {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            temperature: BTreeMap::new(),
            composition: BTreeMap::new(),
            grains: BTreeMap::new(),
        }
    }

    pub fn register_temperature(&mut self, name: &str, factory: TemperatureFactory) {
        self.temperature.insert(normalize_name(name), factory);
    }

    pub fn register_composition(&mut self, name: &str, factory: CompositionFactory) {
        self.composition.insert(normalize_name(name), factory);
    }

    pub fn register_grains(&mut self, name: &str, factory: GrainsFactory) {
        self.grains.insert(normalize_name(name), factory);
    }

    /// Registered names of one kind, sorted.
    #[must_use]
    pub fn names(&self, kind: ModelKind) -> Vec<&str> {
        match kind {
            ModelKind::Temperature => self.temperature.keys().map(String::as_str).collect(),
            ModelKind::Composition => self.composition.keys().map(String::as_str).collect(),
            ModelKind::Grains => self.grains.keys().map(String::as_str).collect(),
        }
    }

    pub fn create_temperature(
        &self,
        name: &str,
        params: &ModelParams,
    ) -> Result<Box<dyn TemperatureModel>, ConfigError> {
        let factory = lookup(&self.temperature, ModelKind::Temperature, name)?;
        factory(params).map_err(|source| model_error(ModelKind::Temperature, name, source))
    }

    pub fn create_composition(
        &self,
        name: &str,
        params: &ModelParams,
    ) -> Result<Box<dyn CompositionModel>, ConfigError> {
        let factory = lookup(&self.composition, ModelKind::Composition, name)?;
        factory(params).map_err(|source| model_error(ModelKind::Composition, name, source))
    }

    pub fn create_grains(
        &self,
        name: &str,
        params: &ModelParams,
    ) -> Result<Box<dyn GrainsModel>, ConfigError> {
        let factory = lookup(&self.grains, ModelKind::Grains, name)?;
        factory(params).map_err(|source| model_error(ModelKind::Grains, name, source))
    }
}

fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

fn lookup<F: Copy>(factories: &BTreeMap<String, F>, kind: ModelKind, name: &str) -> Result<F, ConfigError> {
    let key = normalize_name(name);
    factories.get(&key).copied().ok_or_else(|| ConfigError::UnknownModel {
        kind,
        name: name.to_owned(),
        suggestion: suggest(factories.keys().map(String::as_str), &key),
    })
}

fn model_error(kind: ModelKind, name: &str, source: ModelError) -> ConfigError {
    ConfigError::Model {
        kind,
        name: normalize_name(name),
        source,
    }
}

/// Closest registered name, if it is close enough to be a plausible typo.
fn suggest<'a>(candidates: impl Iterator<Item = &'a str>, name: &str) -> Option<String> {
    let limit = (name.chars().count() / 3).max(2);
    candidates
        .map(|candidate| (levenshtein::levenshtein(candidate, name), candidate))
        .filter(|(distance, _)| *distance <= limit)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, candidate)| candidate.to_owned())
}

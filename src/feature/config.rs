//! Typed feature configuration and its validation into a [`Feature`].

use serde::Deserialize;
use thiserror::Error;

use super::segment::{Section, Segment};
use super::{Feature, FeatureParts};
use crate::geom::{CoordinateSystem, InterpolationType, Path, Point2, SurfaceExtrema};
use crate::models::{ModelArena, ModelError, ModelHandle, ModelKind, ModelParams, ModelRegistry};

/// Errors raised while building a feature from its configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("feature '{feature}' needs at least 2 coordinates, got {count}")]
    PathTooShort { feature: String, count: usize },
    #[error("feature '{feature}' has a non-finite value in {field}")]
    NonFinite { feature: String, field: String },
    #[error("feature '{feature}' has no segments")]
    NoSegments { feature: String },
    #[error("feature '{feature}': {field} must not be negative, got {value}")]
    Negative {
        feature: String,
        field: String,
        value: f64,
    },
    #[error("feature '{feature}': section coordinate {coordinate} is out of range for {count} coordinates")]
    SectionOutOfRange {
        feature: String,
        coordinate: usize,
        count: usize,
    },
    #[error("feature '{feature}': section {coordinate} has {found} segments, the default list has {expected}")]
    SegmentCountMismatch {
        feature: String,
        coordinate: usize,
        expected: usize,
        found: usize,
    },
    #[error("{0}")]
    UnknownInterpolation(String),
    #[error(
        "unknown {kind} model '{name}'{}",
        .suggestion.as_ref().map(|s| format!("; did you mean '{s}'?")).unwrap_or_default()
    )]
    UnknownModel {
        kind: ModelKind,
        name: String,
        suggestion: Option<String>,
    },
    #[error("invalid {kind} model '{name}': {source}")]
    Model {
        kind: ModelKind,
        name: String,
        source: ModelError,
    },
}

fn default_interpolation() -> String {
    InterpolationType::Linear.name().to_owned()
}

fn default_max_depth() -> f64 {
    f64::MAX
}

/// Settings shared by every feature of a world.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WorldSettings {
    #[serde(default, alias = "coordinate system")]
    pub coordinate_system: CoordinateSystem,
    #[serde(default = "default_interpolation")]
    pub interpolation: String,
    /// Metres for Cartesian worlds, degrees for spherical ones. Zero disables
    /// resampling.
    #[serde(default, alias = "maximum distance between coordinates")]
    pub maximum_distance_between_coordinates: f64,
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            coordinate_system: CoordinateSystem::Cartesian,
            interpolation: default_interpolation(),
            maximum_distance_between_coordinates: 0.0,
        }
    }
}

/// A submodel by registered name plus its parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ModelConfig {
    pub model: String,
    #[serde(flatten)]
    pub params: ModelParams,
}

impl ModelConfig {
    #[must_use]
    pub fn new(model: impl Into<String>, params: ModelParams) -> Self {
        Self {
            model: model.into(),
            params,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SegmentConfig {
    pub length: f64,
    pub thickness: [f64; 2],
    #[serde(default, alias = "top truncation")]
    pub top_truncation: Option<[f64; 2]>,
    /// Dip angles in degrees at the top and bottom of the segment.
    pub angle: [f64; 2],
    #[serde(default, alias = "temperature models")]
    pub temperature_models: Option<Vec<ModelConfig>>,
    #[serde(default, alias = "composition models")]
    pub composition_models: Option<Vec<ModelConfig>>,
    #[serde(default, alias = "grains models")]
    pub grains_models: Option<Vec<ModelConfig>>,
}

/// Replacement segment list for one coordinate.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SectionConfig {
    pub coordinate: usize,
    pub segments: Vec<SegmentConfig>,
    #[serde(default, alias = "temperature models")]
    pub temperature_models: Option<Vec<ModelConfig>>,
    #[serde(default, alias = "composition models")]
    pub composition_models: Option<Vec<ModelConfig>>,
    #[serde(default, alias = "grains models")]
    pub grains_models: Option<Vec<ModelConfig>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FeatureConfig {
    pub name: String,
    /// Surface trace; degrees in spherical worlds.
    pub coordinates: Vec<[f64; 2]>,
    /// `None` or `"global"` uses the world setting.
    #[serde(default)]
    pub interpolation: Option<String>,
    #[serde(alias = "dip point")]
    pub dip_point: [f64; 2],
    #[serde(default, alias = "min depth")]
    pub min_depth: f64,
    #[serde(default = "default_max_depth", alias = "max depth")]
    pub max_depth: f64,
    pub segments: Vec<SegmentConfig>,
    #[serde(default, alias = "temperature models")]
    pub temperature_models: Vec<ModelConfig>,
    #[serde(default, alias = "composition models")]
    pub composition_models: Vec<ModelConfig>,
    #[serde(default, alias = "grains models")]
    pub grains_models: Vec<ModelConfig>,
    #[serde(default)]
    pub sections: Vec<SectionConfig>,
}

/// Model handles inherited by segments that do not list their own models.
#[derive(Debug, Clone, Default)]
struct InheritedModels {
    temperature: Vec<ModelHandle>,
    composition: Vec<ModelHandle>,
    grains: Vec<ModelHandle>,
}

struct Builder<'a> {
    feature: &'a str,
    registry: &'a ModelRegistry,
    models: ModelArena,
}

impl Builder<'_> {
    fn temperature(&mut self, configs: &[ModelConfig]) -> Result<Vec<ModelHandle>, ConfigError> {
        configs
            .iter()
            .map(|c| {
                let model = self.registry.create_temperature(&c.model, &c.params)?;
                Ok(self.models.push_temperature(model))
            })
            .collect()
    }

    fn composition(&mut self, configs: &[ModelConfig]) -> Result<Vec<ModelHandle>, ConfigError> {
        configs
            .iter()
            .map(|c| {
                let model = self.registry.create_composition(&c.model, &c.params)?;
                Ok(self.models.push_composition(model))
            })
            .collect()
    }

    fn grains(&mut self, configs: &[ModelConfig]) -> Result<Vec<ModelHandle>, ConfigError> {
        configs
            .iter()
            .map(|c| {
                let model = self.registry.create_grains(&c.model, &c.params)?;
                Ok(self.models.push_grains(model))
            })
            .collect()
    }

    /// Resolves optional model lists against the inherited ones.
    fn inherit(
        &mut self,
        temperature: Option<&Vec<ModelConfig>>,
        composition: Option<&Vec<ModelConfig>>,
        grains: Option<&Vec<ModelConfig>>,
        parent: &InheritedModels,
    ) -> Result<InheritedModels, ConfigError> {
        Ok(InheritedModels {
            temperature: match temperature {
                Some(configs) => self.temperature(configs)?,
                None => parent.temperature.clone(),
            },
            composition: match composition {
                Some(configs) => self.composition(configs)?,
                None => parent.composition.clone(),
            },
            grains: match grains {
                Some(configs) => self.grains(configs)?,
                None => parent.grains.clone(),
            },
        })
    }

    fn segment(
        &mut self,
        config: &SegmentConfig,
        parent: &InheritedModels,
        field: &str,
    ) -> Result<Segment, ConfigError> {
        let top_truncation = config.top_truncation.unwrap_or([0.0, 0.0]);
        let values = [
            config.length,
            config.thickness[0],
            config.thickness[1],
            top_truncation[0],
            top_truncation[1],
            config.angle[0],
            config.angle[1],
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ConfigError::NonFinite {
                feature: self.feature.to_owned(),
                field: field.to_owned(),
            });
        }
        if config.length < 0.0 {
            return Err(ConfigError::Negative {
                feature: self.feature.to_owned(),
                field: format!("{field} length"),
                value: config.length,
            });
        }

        let models = self.inherit(
            config.temperature_models.as_ref(),
            config.composition_models.as_ref(),
            config.grains_models.as_ref(),
            parent,
        )?;
        Ok(Segment {
            length: config.length,
            thickness: config.thickness,
            top_truncation,
            angle: [config.angle[0].to_radians(), config.angle[1].to_radians()],
            temperature_models: models.temperature,
            composition_models: models.composition,
            grains_models: models.grains,
        })
    }
}

impl Feature {
    /// Validates a configuration and builds the feature, instantiating every
    /// submodel through `registry`.
    pub fn from_config(
        config: &FeatureConfig,
        world: &WorldSettings,
        registry: &ModelRegistry,
    ) -> Result<Self, ConfigError> {
        Self::build(config, world, registry).inspect_err(|err| {
            log::warn!("rejected feature '{}': {err}", config.name);
        })
    }

    fn build(
        config: &FeatureConfig,
        world: &WorldSettings,
        registry: &ModelRegistry,
    ) -> Result<Self, ConfigError> {
        let feature = config.name.as_str();
        let system = world.coordinate_system;
        let non_finite = |field: &str| ConfigError::NonFinite {
            feature: feature.to_owned(),
            field: field.to_owned(),
        };

        if config.coordinates.len() < 2 {
            return Err(ConfigError::PathTooShort {
                feature: feature.to_owned(),
                count: config.coordinates.len(),
            });
        }
        if config.coordinates.iter().flatten().any(|v| !v.is_finite()) {
            return Err(non_finite("coordinates"));
        }
        if config.dip_point.iter().any(|v| !v.is_finite()) {
            return Err(non_finite("dip point"));
        }
        if !config.min_depth.is_finite() || !config.max_depth.is_finite() {
            return Err(non_finite("depth range"));
        }
        if !world.maximum_distance_between_coordinates.is_finite() {
            return Err(non_finite("maximum distance between coordinates"));
        }
        if config.segments.is_empty() {
            return Err(ConfigError::NoSegments {
                feature: feature.to_owned(),
            });
        }

        let interpolation = match config.interpolation.as_deref().map(str::trim) {
            None => world.interpolation.as_str(),
            Some(name) if name.eq_ignore_ascii_case("global") => world.interpolation.as_str(),
            Some(name) => name,
        }
        .parse::<InterpolationType>()
        .map_err(ConfigError::UnknownInterpolation)?;

        let mut builder = Builder {
            feature,
            registry,
            models: ModelArena::new(),
        };

        let feature_models = InheritedModels {
            temperature: builder.temperature(&config.temperature_models)?,
            composition: builder.composition(&config.composition_models)?,
            grains: builder.grains(&config.grains_models)?,
        };
        let defaults = config
            .segments
            .iter()
            .enumerate()
            .map(|(i, segment)| builder.segment(segment, &feature_models, &format!("segment {i}")))
            .collect::<Result<Vec<_>, _>>()?;

        let mut sections = vec![Section::new(defaults.clone()); config.coordinates.len()];
        for section in &config.sections {
            if section.coordinate >= config.coordinates.len() {
                return Err(ConfigError::SectionOutOfRange {
                    feature: feature.to_owned(),
                    coordinate: section.coordinate,
                    count: config.coordinates.len(),
                });
            }
            if section.segments.len() != defaults.len() {
                return Err(ConfigError::SegmentCountMismatch {
                    feature: feature.to_owned(),
                    coordinate: section.coordinate,
                    expected: defaults.len(),
                    found: section.segments.len(),
                });
            }
            let section_models = builder.inherit(
                section.temperature_models.as_ref(),
                section.composition_models.as_ref(),
                section.grains_models.as_ref(),
                &feature_models,
            )?;
            let segments = section
                .segments
                .iter()
                .enumerate()
                .map(|(i, segment)| {
                    let field = format!("section {} segment {i}", section.coordinate);
                    builder.segment(segment, &section_models, &field)
                })
                .collect::<Result<Vec<_>, _>>()?;
            sections[section.coordinate] = Section::new(segments);
        }

        let coordinates: Vec<Point2> = config
            .coordinates
            .iter()
            .map(|&[a, b]| {
                Point2::new(
                    system.degrees_to_natural(a),
                    system.degrees_to_natural(b),
                    system,
                )
            })
            .collect();
        let reference_point = Point2::new(
            system.degrees_to_natural(config.dip_point[0]),
            system.degrees_to_natural(config.dip_point[1]),
            system,
        );
        let max_spacing = system.degrees_to_natural(world.maximum_distance_between_coordinates);
        let path = Path::build(&coordinates, interpolation, max_spacing, system);
        let extrema = SurfaceExtrema::from_points(path.points()).ok_or(ConfigError::PathTooShort {
            feature: feature.to_owned(),
            count: 0,
        })?;

        Ok(Self::assemble(FeatureParts {
            name: config.name.clone(),
            system,
            reference_point,
            starting_depth: config.min_depth,
            maximum_depth: config.max_depth,
            path,
            sections,
            extrema,
            models: builder.models,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment() -> SegmentConfig {
        SegmentConfig {
            length: 100e3,
            thickness: [50e3, 50e3],
            top_truncation: None,
            angle: [30.0, 30.0],
            temperature_models: None,
            composition_models: None,
            grains_models: None,
        }
    }

    fn config() -> FeatureConfig {
        FeatureConfig {
            name: "slab".to_owned(),
            coordinates: vec![[0.0, 0.0], [100e3, 0.0], [200e3, 0.0]],
            interpolation: None,
            dip_point: [0.0, 100e3],
            min_depth: 0.0,
            max_depth: f64::MAX,
            segments: vec![segment(), segment()],
            temperature_models: vec![ModelConfig::new(
                "uniform",
                ModelParams::new().with("temperature", 600.0),
            )],
            composition_models: Vec::new(),
            grains_models: Vec::new(),
            sections: Vec::new(),
        }
    }

    fn build(config: &FeatureConfig) -> Result<Feature, ConfigError> {
        Feature::from_config(config, &WorldSettings::default(), &ModelRegistry::default())
    }

    #[test]
    fn builds_with_shared_default_models() {
        let feature = build(&config()).unwrap();
        assert_eq!(feature.sections().len(), 3);
        assert_eq!(feature.models().counts(), [1, 0, 0]);
        let handles: Vec<_> = feature
            .sections()
            .iter()
            .flat_map(|s| s.segments().iter().map(|seg| seg.temperature_models.clone()))
            .collect();
        assert!(handles.iter().all(|h| h == &handles[0]));
        assert!((feature.sections()[0].segments()[0].angle[0] - 30f64.to_radians()).abs() < 1e-15);
    }

    #[test]
    fn section_overrides_replace_defaults() {
        let mut config = config();
        let mut overridden = segment();
        overridden.length = 10e3;
        overridden.temperature_models = Some(Vec::new());
        config.sections.push(SectionConfig {
            coordinate: 2,
            segments: vec![overridden, segment()],
            temperature_models: None,
            composition_models: None,
            grains_models: None,
        });
        let feature = build(&config).unwrap();
        let last = &feature.sections()[2];
        assert_eq!(last.segments()[0].length, 10e3);
        assert!(last.segments()[0].temperature_models.is_empty());
        assert_eq!(last.segments()[1].temperature_models.len(), 1);
        assert_eq!(feature.sections()[0].segments()[0].length, 100e3);
    }

    #[test]
    fn validation_errors() {
        let mut short = config();
        short.coordinates.truncate(1);
        assert!(matches!(build(&short), Err(ConfigError::PathTooShort { count: 1, .. })));

        let mut empty = config();
        empty.segments.clear();
        assert!(matches!(build(&empty), Err(ConfigError::NoSegments { .. })));

        let mut mismatch = config();
        mismatch.sections.push(SectionConfig {
            coordinate: 1,
            segments: vec![segment()],
            temperature_models: None,
            composition_models: None,
            grains_models: None,
        });
        assert!(matches!(
            build(&mismatch),
            Err(ConfigError::SegmentCountMismatch {
                expected: 2,
                found: 1,
                ..
            })
        ));

        let mut out_of_range = config();
        out_of_range.sections.push(SectionConfig {
            coordinate: 3,
            segments: vec![segment(), segment()],
            temperature_models: None,
            composition_models: None,
            grains_models: None,
        });
        assert!(matches!(build(&out_of_range), Err(ConfigError::SectionOutOfRange { .. })));

        let mut nan = config();
        nan.segments[1].thickness[0] = f64::NAN;
        assert!(matches!(build(&nan), Err(ConfigError::NonFinite { .. })));

        let mut interpolation = config();
        interpolation.interpolation = Some("cubic".to_owned());
        assert!(matches!(build(&interpolation), Err(ConfigError::UnknownInterpolation(_))));

        let mut negative = config();
        negative.segments[0].length = -1.0;
        assert!(matches!(build(&negative), Err(ConfigError::Negative { .. })));
    }

    #[test]
    fn unknown_model_message_suggests_name() {
        let mut config = config();
        config.temperature_models[0].model = "unifrom".to_owned();
        let err = build(&config).unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown temperature model 'unifrom'; did you mean 'uniform'?"
        );
    }

    #[test]
    fn global_interpolation_uses_world_setting() {
        let mut config = config();
        config.interpolation = Some("global".to_owned());
        let world = WorldSettings {
            interpolation: "monotone spline".to_owned(),
            maximum_distance_between_coordinates: 10e3,
            ..WorldSettings::default()
        };
        let feature = Feature::from_config(&config, &world, &ModelRegistry::default()).unwrap();
        assert_eq!(feature.path().interpolation(), InterpolationType::MonotoneSpline);
        assert!(feature.path().len() > 3);
    }
}

//! Resampled feature traces.
//!
//! A [`Path`] holds the surface trace of a feature after optional spline
//! resampling, together with the one-dimensional arc parameter of every point.
//! The integer part of an arc parameter is the index of the original coordinate
//! the point follows, the fractional part is how far it lies towards the next
//! original coordinate.

use std::fmt;
use std::str::FromStr;

use super::coordinates::CoordinateSystem;
use super::core::Point2;
use super::spline::MonotoneSpline;

/// Upper bound on refinement when a spline chord is unevenly parameterised.
const MAX_PARTS_PER_SECTION: usize = 1 << 16;

/// How the trace between configured coordinates is represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InterpolationType {
    None,
    #[default]
    Linear,
    MonotoneSpline,
    ContinuousMonotoneSpline,
}

impl InterpolationType {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Linear => "linear",
            Self::MonotoneSpline => "monotone spline",
            Self::ContinuousMonotoneSpline => "continuous monotone spline",
        }
    }
}

impl fmt::Display for InterpolationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for InterpolationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "linear" => Ok(Self::Linear),
            "monotone spline" => Ok(Self::MonotoneSpline),
            "continuous monotone spline" => Ok(Self::ContinuousMonotoneSpline),
            other => Err(format!(
                "unsupported interpolation type '{other}'; the options are none, linear, \
                 monotone spline and continuous monotone spline"
            )),
        }
    }
}

/// Resampled surface trace of a feature.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    points: Vec<Point2>,
    arc_parameters: Vec<f64>,
    original_len: usize,
    interpolation: InterpolationType,
    system: CoordinateSystem,
    splines: Option<(MonotoneSpline, MonotoneSpline)>,
    over_spacing: Vec<usize>,
}

impl Path {
    /// Builds the trace from the configured coordinates.
    ///
    /// `max_spacing` is expressed in natural units (metres or radians); a
    /// non-positive value disables point insertion.
    #[must_use]
    pub fn build(
        coordinates: &[Point2],
        interpolation: InterpolationType,
        max_spacing: f64,
        system: CoordinateSystem,
    ) -> Self {
        let original_len = coordinates.len();
        let original_parameters: Vec<f64> = (0..original_len).map(|j| j as f64).collect();

        let mut path = Self {
            points: coordinates.to_vec(),
            arc_parameters: original_parameters.clone(),
            original_len,
            interpolation,
            system,
            splines: None,
            over_spacing: Vec::new(),
        };

        if interpolation == InterpolationType::None || original_len == 0 {
            return path;
        }

        let monotone = interpolation != InterpolationType::Linear;
        let xs: Vec<f64> = coordinates.iter().map(|p| p[0]).collect();
        let ys: Vec<f64> = coordinates.iter().map(|p| p[1]).collect();
        let x_spline = MonotoneSpline::new(original_parameters.clone(), xs, monotone);
        let y_spline = MonotoneSpline::new(original_parameters, ys, monotone);
        path.splines = Some((x_spline, y_spline));

        if max_spacing > 0.0 && interpolation != InterpolationType::ContinuousMonotoneSpline {
            path.insert_resampled_points(max_spacing);
        }

        log::debug!(
            "built {} path: {} coordinates resampled to {} points",
            interpolation,
            original_len,
            path.points.len()
        );
        path
    }

    fn insert_resampled_points(&mut self, max_spacing: f64) {
        if self.splines.is_none() {
            return;
        }

        let mut points = Vec::with_capacity(self.points.len());
        let mut parameters = Vec::with_capacity(self.points.len());

        for section in 0..self.original_len {
            points.push(self.points[section]);
            parameters.push(section as f64);
            if section + 1 == self.original_len {
                break;
            }

            let start = section as f64;
            let p1 = self.spline_point(start);
            let p2 = self.spline_point(start + 1.0);
            let length = (p1 - p2).norm();
            if length <= max_spacing {
                continue;
            }

            let mut parts = ((length / max_spacing).ceil() as usize).min(MAX_PARTS_PER_SECTION);
            loop {
                let interior = self.interior_samples(section, parts);
                let within = self.chords_within(section, &interior, max_spacing);
                if within || parts >= MAX_PARTS_PER_SECTION {
                    if !within {
                        log::warn!(
                            "section {section}: {parts} parts still leave chords longer than {max_spacing}"
                        );
                        self.over_spacing.push(section);
                    }
                    for (parameter, point) in interior {
                        parameters.push(parameter);
                        points.push(point);
                    }
                    break;
                }
                parts = (parts * 2).min(MAX_PARTS_PER_SECTION);
            }
        }

        self.points = points;
        self.arc_parameters = parameters;
    }

    fn interior_samples(&self, section: usize, parts: usize) -> Vec<(f64, Point2)> {
        (1..parts)
            .map(|j| {
                let parameter = section as f64 + j as f64 / parts as f64;
                (parameter, self.spline_point(parameter))
            })
            .collect()
    }

    fn chords_within(&self, section: usize, interior: &[(f64, Point2)], max_spacing: f64) -> bool {
        let tolerance = max_spacing * (1.0 + 1e-12);
        let mut previous = self.points[section];
        for &(_, point) in interior {
            if (point - previous).norm() > tolerance {
                return false;
            }
            previous = point;
        }
        (self.points[section + 1] - previous).norm() <= tolerance
    }

    fn spline_point(&self, parameter: f64) -> Point2 {
        match &self.splines {
            Some((x, y)) => Point2::new(x.evaluate(parameter), y.evaluate(parameter), self.system),
            None => self.points[parameter.floor() as usize],
        }
    }

    /// Surface point on the continuous trace at an arc parameter.
    ///
    /// Returns `None` unless the path was built with
    /// [`InterpolationType::ContinuousMonotoneSpline`].
    #[must_use]
    pub fn continuous_point_at(&self, parameter: f64) -> Option<Point2> {
        if self.interpolation == InterpolationType::ContinuousMonotoneSpline {
            self.splines
                .as_ref()
                .map(|(x, y)| Point2::new(x.evaluate(parameter), y.evaluate(parameter), self.system))
        } else {
            None
        }
    }

    #[must_use]
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    #[must_use]
    pub fn arc_parameters(&self) -> &[f64] {
        &self.arc_parameters
    }

    /// Number of points after resampling.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of configured coordinates, i.e. the number of sections.
    #[must_use]
    pub fn original_len(&self) -> usize {
        self.original_len
    }

    /// Sections whose resampled chords still exceed the maximum spacing
    /// because refinement hit its cap.
    #[must_use]
    pub fn sections_over_spacing(&self) -> &[usize] {
        &self.over_spacing
    }

    #[must_use]
    pub fn interpolation(&self) -> InterpolationType {
        self.interpolation
    }

    #[must_use]
    pub fn system(&self) -> CoordinateSystem {
        self.system
    }

    /// Maps a position on the chord starting at resampled point `chord` to the
    /// original section index and the fraction within that section.
    #[must_use]
    pub fn section_position(&self, chord: usize, chord_fraction: f64) -> (usize, f64) {
        let a0 = self.arc_parameters[chord];
        let a1 = self.arc_parameters[chord + 1];
        let section = a0.floor();
        let fraction = (a0 - section) + (a1 - a0) * chord_fraction;
        (section as usize, fraction.clamp(0.0, 1.0))
    }
}

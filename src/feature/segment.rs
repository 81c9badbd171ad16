//! Per-coordinate stacks of depth segments.

use crate::models::ModelHandle;

/// One depth interval of a section.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    /// Arc length along the dip direction.
    pub length: f64,
    /// Thickness at the top and bottom of the segment.
    pub thickness: [f64; 2],
    /// Top truncation at the top and bottom of the segment.
    pub top_truncation: [f64; 2],
    /// Dip angle in radians at the top and bottom of the segment.
    pub angle: [f64; 2],
    pub temperature_models: Vec<ModelHandle>,
    pub composition_models: Vec<ModelHandle>,
    pub grains_models: Vec<ModelHandle>,
}

impl Segment {
    #[must_use]
    pub fn max_thickness(&self) -> f64 {
        self.thickness[0].max(self.thickness[1])
    }
}

/// Segments stacked by depth below one coordinate of the trace.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Section {
    segments: Vec<Segment>,
}

impl Section {
    #[must_use]
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    #[must_use]
    pub fn segment(&self, index: usize) -> Option<&Segment> {
        self.segments.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Sum of the segment lengths.
    #[must_use]
    pub fn total_length(&self) -> f64 {
        self.segments.iter().map(|s| s.length).sum()
    }

    #[must_use]
    pub fn max_thickness(&self) -> f64 {
        self.segments
            .iter()
            .map(Segment::max_thickness)
            .fold(0.0, f64::max)
    }

    #[must_use]
    pub fn lengths(&self) -> Vec<f64> {
        self.segments.iter().map(|s| s.length).collect()
    }

    #[must_use]
    pub fn angles(&self) -> Vec<[f64; 2]> {
        self.segments.iter().map(|s| s.angle).collect()
    }
}

//! Point samples: a location plus one scalar attribute

use crate::extent::BoundingBox;
use geo_types::Coord;
use serde::{Deserialize, Serialize};

/// One measurement at a geographic location
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// `x` = longitude, `y` = latitude, degrees
    pub coord: Coord<f64>,
    /// Attribute value
    pub value: f64,
}

impl Sample {
    /// Create a sample from latitude, longitude and value
    pub fn new(lat: f64, lon: f64, value: f64) -> Self {
        Self {
            coord: Coord { x: lon, y: lat },
            value,
        }
    }

    pub fn lat(&self) -> f64 {
        self.coord.y
    }

    pub fn lon(&self) -> f64 {
        self.coord.x
    }
}

/// Ordered point samples with the extent they were read from.
///
/// Duplicates are allowed; order matters only where markers overlap, in
/// which case the later sample wins.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSet {
    pub bbox: BoundingBox,
    pub samples: Vec<Sample>,
}

impl SampleSet {
    /// Wrap samples with an explicit extent
    pub fn new(bbox: BoundingBox, samples: Vec<Sample>) -> Self {
        Self { bbox, samples }
    }

    /// Wrap samples, taking their own extent as the bounding box.
    ///
    /// Returns `None` when there are no samples.
    pub fn from_samples(samples: Vec<Sample>) -> Option<Self> {
        let bbox = BoundingBox::from_coords(samples.iter().map(|s| s.coord))?;
        Some(Self { bbox, samples })
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    /// `(min, max)` of the sample values, ignoring NaN.
    ///
    /// Returns `None` when no sample carries a number.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        value_range(self.samples.iter().map(|s| s.value))
    }
}

/// `(min, max)` over an iterator of values, ignoring NaN
pub fn value_range<I: IntoIterator<Item = f64>>(values: I) -> Option<(f64, f64)> {
    values
        .into_iter()
        .filter(|v| !v.is_nan())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

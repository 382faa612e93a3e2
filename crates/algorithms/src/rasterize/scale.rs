//! Value normalization to the 0-255 intensity range

use geosplat_core::raster::RasterElement;
use geosplat_core::vector::{value_range, Sample};
use geosplat_core::{Error, Result};

/// Upper end of the intensity range
pub const MAX_INTENSITY: f64 = 255.0;

/// Intensity given to every sample of a single-valued dataset
pub const MID_SCALE: f64 = 128.0;

/// Map `value` linearly from `[min, max]` onto `[0, 255]`.
///
/// Values outside the range map outside `[0, 255]`; callers saturate when
/// converting to intensities. Fails when the range has collapsed to a point.
pub fn scale_value(value: f64, min: f64, max: f64) -> Result<f64> {
    let span = max - min;
    if span == 0.0 || !span.is_finite() {
        return Err(Error::ValueRangeCollapsed { value: min });
    }
    Ok(MAX_INTENSITY * (value - min) / span)
}

/// Dataset-relative scaler: min and max are fixed once from all sample values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueScaler {
    min: f64,
    max: f64,
}

impl ValueScaler {
    pub fn new(min: f64, max: f64) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Scaler over the non-NaN values, `None` if there are none
    pub fn from_values<I: IntoIterator<Item = f64>>(values: I) -> Option<Self> {
        value_range(values).map(|(min, max)| Self::new(min, max))
    }

    /// Scaler over the values of `samples`
    pub fn from_samples(samples: &[Sample]) -> Result<Self> {
        Self::from_values(samples.iter().map(|s| s.value)).ok_or(Error::InsufficientPoints {
            required: 1,
            found: 0,
        })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Whether every value in the dataset is the same
    pub fn is_collapsed(&self) -> bool {
        self.max - self.min == 0.0
    }

    /// Scaled value in `[0, 255]` for in-range input; [`MID_SCALE`] when the
    /// dataset has a single value.
    pub fn scale(&self, value: f64) -> f64 {
        scale_value(value, self.min, self.max).unwrap_or(MID_SCALE)
    }

    /// Scaled value rounded and saturated to an 8-bit intensity
    pub fn intensity(&self, value: f64) -> u8 {
        u8::saturating_from_f64(self.scale(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_scale_endpoints() {
        assert_eq!(scale_value(0.0, 0.0, 100.0).unwrap(), 0.0);
        assert_eq!(scale_value(100.0, 0.0, 100.0).unwrap(), 255.0);
        assert_relative_eq!(scale_value(50.0, 0.0, 100.0).unwrap(), 127.5);
        assert_relative_eq!(scale_value(-3.0, -5.0, 5.0).unwrap(), 51.0);
    }

    #[test]
    fn test_collapsed_range_errors() {
        let err = scale_value(4.0, 4.0, 4.0).unwrap_err();
        assert!(matches!(err, Error::ValueRangeCollapsed { value } if value == 4.0));
        assert_eq!(err.kind(), geosplat_core::ErrorKind::Data);
    }

    #[test]
    fn test_scaler_from_values() {
        let scaler = ValueScaler::from_values([0.0, 50.0, f64::NAN, 100.0]).unwrap();
        assert_eq!(scaler.min(), 0.0);
        assert_eq!(scaler.max(), 100.0);
        assert!(!scaler.is_collapsed());
        assert!(ValueScaler::from_values(Vec::new()).is_none());
    }

    #[test]
    fn test_intensity_rounding() {
        let scaler = ValueScaler::new(0.0, 100.0);
        // 127.5 rounds half away from zero
        assert_eq!(scaler.intensity(50.0), 128);
        assert_eq!(scaler.intensity(0.0), 0);
        assert_eq!(scaler.intensity(100.0), 255);
        // out-of-range input saturates
        assert_eq!(scaler.intensity(200.0), 255);
        assert_eq!(scaler.intensity(-10.0), 0);
    }

    #[test]
    fn test_single_valued_dataset() {
        let scaler = ValueScaler::from_values([7.0, 7.0]).unwrap();
        assert!(scaler.is_collapsed());
        assert_eq!(scaler.scale(7.0), MID_SCALE);
        assert_eq!(scaler.intensity(7.0), 128);
    }

    #[test]
    fn test_from_samples_empty() {
        assert!(matches!(
            ValueScaler::from_samples(&[]),
            Err(Error::InsufficientPoints { required: 1, found: 0 })
        ));
    }
}

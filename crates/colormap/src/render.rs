//! Raster-to-RGBA rendering using color schemes.

use crate::scheme::{evaluate, ColorScheme, Rgb};
use geosplat_core::raster::{Raster, RasterElement};

/// Parameters for colormap rendering.
#[derive(Debug, Clone)]
pub struct ColormapParams {
    pub scheme: ColorScheme,
    /// Value drawn at the start of the scheme; lower values clamp.
    pub min: f64,
    /// Value drawn at the end of the scheme; higher values clamp.
    pub max: f64,
    /// RGBA for nodata or non-finite cells. Default: fully transparent.
    pub nodata_color: [u8; 4],
}

impl ColormapParams {
    /// Create params with explicit min/max range.
    pub fn with_range(scheme: ColorScheme, min: f64, max: f64) -> Self {
        Self {
            scheme,
            min,
            max,
            nodata_color: [0, 0, 0, 0],
        }
    }

    /// Full 8-bit intensity range
    pub fn intensity(scheme: ColorScheme) -> Self {
        Self::with_range(scheme, 0.0, 255.0)
    }

    fn position(&self, v: f64) -> f64 {
        let range = self.max - self.min;
        if range.abs() > f64::EPSILON {
            (v - self.min) / range
        } else {
            0.5
        }
    }
}

/// Stretch the scheme over the valid data range of `raster`.
///
/// Empty or all-nodata rasters fall back to `[0, 1]`.
pub fn auto_params<T: RasterElement>(raster: &Raster<T>, scheme: ColorScheme) -> ColormapParams {
    let stats = raster.statistics();
    let min = stats.min.and_then(|v| v.to_f64()).filter(|v| v.is_finite());
    let max = stats.max.and_then(|v| v.to_f64()).filter(|v| v.is_finite());
    match (min, max) {
        (Some(min), Some(max)) => ColormapParams::with_range(scheme, min, max),
        _ => ColormapParams::with_range(scheme, 0.0, 1.0),
    }
}

/// Convert a raster to an RGBA pixel buffer.
///
/// Returns `rows * cols * 4` bytes in row-major order. A raster whose range
/// has collapsed renders in the middle color of the scheme.
pub fn raster_to_rgba<T: RasterElement>(raster: &Raster<T>, params: &ColormapParams) -> Vec<u8> {
    let nodata = raster.nodata();
    let mut rgba = Vec::with_capacity(raster.len() * 4);

    for val in raster.data().iter() {
        let value = if val.is_nodata(nodata) {
            None
        } else {
            val.to_f64().filter(|v| v.is_finite())
        };
        match value {
            Some(v) => {
                let Rgb { r, g, b } = evaluate(params.scheme, params.position(v));
                rgba.extend_from_slice(&[r, g, b, 255]);
            }
            None => rgba.extend_from_slice(&params.nodata_color),
        }
    }

    rgba
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raster_to_rgba_basic() {
        let mut r = Raster::<f64>::new(2, 2);
        r.set(0, 0, 0.0).unwrap();
        r.set(0, 1, 0.5).unwrap();
        r.set(1, 0, 1.0).unwrap();
        r.set(1, 1, f64::NAN).unwrap();
        r.set_nodata(Some(f64::NAN));

        let params = ColormapParams::with_range(ColorScheme::Grayscale, 0.0, 1.0);
        let rgba = raster_to_rgba(&r, &params);

        assert_eq!(rgba.len(), 16);
        assert_eq!(&rgba[0..4], &[0, 0, 0, 255]);
        assert_eq!(&rgba[4..8], &[128, 128, 128, 255]);
        assert_eq!(&rgba[8..12], &[255, 255, 255, 255]);
        assert_eq!(&rgba[12..16], &[0, 0, 0, 0]);
    }

    #[test]
    fn intensity_grid_in_hot() {
        let mut r = Raster::<u8>::new(1, 2);
        r.set(0, 1, 255).unwrap();
        let rgba = raster_to_rgba(&r, &ColormapParams::intensity(ColorScheme::Hot));
        assert_eq!(&rgba[0..4], &[11, 0, 0, 255]);
        assert_eq!(&rgba[4..8], &[255, 255, 255, 255]);
    }

    #[test]
    fn auto_params_range() {
        let mut r = Raster::<u8>::new(1, 3);
        r.set(0, 0, 10).unwrap();
        r.set(0, 1, 50).unwrap();
        r.set(0, 2, 100).unwrap();

        let params = auto_params(&r, ColorScheme::Hot);
        assert_eq!(params.min, 10.0);
        assert_eq!(params.max, 100.0);
    }

    #[test]
    fn auto_params_all_nodata() {
        let mut r = Raster::<f64>::filled(1, 2, f64::NAN);
        r.set_nodata(Some(f64::NAN));

        let params = auto_params(&r, ColorScheme::Grayscale);
        assert_eq!((params.min, params.max), (0.0, 1.0));
    }

    #[test]
    fn constant_raster_renders_mid_color() {
        let r = Raster::<u8>::filled(2, 2, 42);
        let params = auto_params(&r, ColorScheme::Grayscale);
        let rgba = raster_to_rgba(&r, &params);
        assert!(rgba.chunks(4).all(|px| px == [128, 128, 128, 255]));
    }
}

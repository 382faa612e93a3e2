//! # geosplat algorithms
//!
//! Turning scattered point samples into 8-bit grids.
//!
//! - **rasterize**: value scaling, marker strategies, point-to-grid drawing
//! - **interpolation**: linear (TIN) and nearest-neighbour grid fill with
//!   marker re-stamping

pub mod interpolation;
pub(crate) mod maybe_rayon;
pub mod rasterize;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::interpolation::{
        interpolate, interpolate_samples, InterpolateParams, InterpolationMethod, SamplePoint,
    };
    pub use crate::rasterize::{
        rasterize, rasterize_samples, scale_value, MarkerStyle, Outline, RasterizeParams,
        ValueScaler,
    };
    pub use geosplat_core::prelude::*;
}

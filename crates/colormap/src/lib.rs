//! # geosplat colormap
//!
//! Color tables for written rasters and RGBA rendering for previews.
//!
//! [`GrayRamp`] gives the straight or inverted 256-entry gray palette that
//! goes into the output GeoTIFF. [`raster_to_rgba`] turns a grid into an
//! RGBA buffer with any [`ColorScheme`], e.g. `Hot` for a quick look.
//!
//! ## Usage
//!
//! ```ignore
//! use geosplat_colormap::{auto_params, raster_to_rgba, ColorScheme};
//!
//! let params = auto_params(&grid, ColorScheme::Hot);
//! let rgba = raster_to_rgba(&grid, &params);
//! ```

mod render;
mod scheme;

pub use render::{auto_params, raster_to_rgba, ColormapParams};
pub use scheme::{evaluate, ColorScheme, ColorStop, GrayRamp, Rgb};

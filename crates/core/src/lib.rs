//! # geosplat core
//!
//! Core types and I/O shared by the geosplat rasterizer:
//! - `Raster<T>`: generic grid carrying its georeferencing
//! - `GeoTransform`: lon/lat to grid-node mapping
//! - `BoundingBox`: geographic extent and grid sizing
//! - `Sample` / `SampleSet`: point measurements
//! - Shapefile input and GeoTIFF output

pub mod crs;
pub mod error;
pub mod extent;
pub mod io;
pub mod raster;
pub mod vector;

pub use crs::CRS;
pub use error::{Error, ErrorKind, Result};
pub use extent::BoundingBox;
pub use raster::{GeoTransform, Neighborhood, Raster, RasterElement};
pub use vector::{Sample, SampleSet};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::crs::CRS;
    pub use crate::error::{Error, Result};
    pub use crate::extent::BoundingBox;
    pub use crate::raster::{GeoTransform, Neighborhood, Raster, RasterElement};
    pub use crate::vector::{Sample, SampleSet};
}

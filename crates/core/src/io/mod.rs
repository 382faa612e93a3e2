//! I/O operations for reading point samples and writing geospatial rasters

mod native;
mod points;

pub use native::{
    read_geotiff, read_geotiff_from_buffer, write_geotiff, write_geotiff_to_buffer,
    GeoTiffOptions, Palette,
};
pub use points::{read_point_shapefile, PointSource, ShapefileSource};

use crate::error::Result;
use crate::raster::Raster;
use std::path::Path;

/// Destination for a finished 8-bit grid
pub trait RasterSink {
    /// Persist `raster`, optionally with a color table
    fn write_raster(&self, raster: &Raster<u8>, path: &Path, palette: Option<&Palette>)
        -> Result<()>;
}

/// [`RasterSink`] writing georeferenced TIFF files
#[derive(Debug, Clone, Copy, Default)]
pub struct GeoTiffSink;

impl RasterSink for GeoTiffSink {
    fn write_raster(
        &self,
        raster: &Raster<u8>,
        path: &Path,
        palette: Option<&Palette>,
    ) -> Result<()> {
        let options = GeoTiffOptions {
            palette: palette.cloned(),
            ..Default::default()
        };
        write_geotiff(raster, path, &options)
    }
}

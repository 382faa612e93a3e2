//! Point-to-grid rasterization
//!
//! Samples are projected to their nearest grid node, their values scaled
//! to 0-255 over the whole dataset, and a marker is drawn for each one in
//! input order. Where markers overlap, the later sample wins.

mod marker;
mod scale;

pub use marker::{MarkerStyle, Outline};
pub use scale::{scale_value, ValueScaler, MAX_INTENSITY, MID_SCALE};

use geosplat_core::raster::{GeoTransform, Raster};
use geosplat_core::vector::{Sample, SampleSet};
use geosplat_core::{BoundingBox, Error, Result, CRS};
use tracing::{debug, warn};

/// Parameters for rasterization
#[derive(Debug, Clone, PartialEq)]
pub struct RasterizeParams {
    /// Pixels per degree (> 0)
    pub resolution: u32,
    /// Marker drawn for every sample
    pub marker: MarkerStyle,
    /// Add `resolution / 30` cells of margin around the extent
    pub margin: bool,
}

impl Default for RasterizeParams {
    fn default() -> Self {
        Self {
            resolution: 100,
            marker: MarkerStyle::default(),
            margin: true,
        }
    }
}

impl RasterizeParams {
    /// Extra cells added along each axis
    pub fn margin_cells(&self) -> usize {
        if self.margin {
            (self.resolution / 30) as usize
        } else {
            0
        }
    }
}

/// Allocate the zero-filled grid for `bbox` with its transform attached.
///
/// The grid is `ceil(extent * resolution) + margin` cells along each axis.
/// A degenerate extent or a zero resolution is rejected before allocation.
pub fn empty_grid(bbox: &BoundingBox, params: &RasterizeParams) -> Result<Raster<u8>> {
    let (rows, cols) = bbox.grid_size(params.resolution)?;
    let margin = params.margin_cells();
    let transform = GeoTransform::for_extent(bbox, params.resolution, margin)?;

    let mut grid = Raster::new(rows + margin, cols + margin);
    grid.set_transform(transform);
    grid.set_crs(Some(CRS::wgs84()));

    debug!(
        "Grid {}x{} (margin {}), pixel {:.6}x{:.6} deg",
        grid.rows(),
        grid.cols(),
        margin,
        transform.pixel_width,
        transform.pixel_height
    );

    Ok(grid)
}

/// Draw markers for `samples` into `grid`, in order.
///
/// Samples are placed at the nearest node of the grid's transform, clamped
/// into the grid. Returns how many samples had to be clamped.
pub fn stamp_markers(
    grid: &mut Raster<u8>,
    samples: &[Sample],
    scaler: &ValueScaler,
    marker: &MarkerStyle,
) -> usize {
    let transform = *grid.transform();
    let shape = grid.shape();
    let mut clamped = 0;

    for sample in samples {
        if !transform.in_grid(sample.coord, shape) {
            clamped += 1;
        }
        let (row, col) = transform.cell_index(sample.coord, shape);
        marker.stamp(grid, row, col, scaler.intensity(sample.value));
    }

    if clamped > 0 {
        warn!("{} samples fell outside the grid and were moved to its edge", clamped);
    }
    clamped
}

/// Rasterize a sample set over its own bounding box
pub fn rasterize(samples: &SampleSet, params: &RasterizeParams) -> Result<Raster<u8>> {
    rasterize_samples(&samples.samples, &samples.bbox, params)
}

/// Rasterize `samples` over `bbox`.
///
/// # Returns
/// An 8-bit grid carrying the [`GeoTransform`] used to place the samples.
pub fn rasterize_samples(
    samples: &[Sample],
    bbox: &BoundingBox,
    params: &RasterizeParams,
) -> Result<Raster<u8>> {
    params.marker.validate()?;
    if samples.is_empty() {
        return Err(Error::InsufficientPoints {
            required: 1,
            found: 0,
        });
    }

    let mut grid = empty_grid(bbox, params)?;
    let scaler = ValueScaler::from_samples(samples)?;
    if scaler.is_collapsed() {
        debug!("All samples share the value {}, drawing at mid-scale", scaler.min());
    }

    stamp_markers(&mut grid, samples, &scaler, &params.marker);
    Ok(grid)
}

//! Grid-fill interpolation of scattered samples
//!
//! Builds the same grid and transform as [`rasterize`](crate::rasterize),
//! estimates every node from the projected samples, then re-draws the
//! sample markers on top so measured locations keep their exact values:
//! - Linear: Delaunay triangulation with barycentric weights (TIN)
//! - Nearest: value of the closest sample
//!
//! Interpolation runs in grid space. Each sample becomes a point at its
//! nearest node; when several samples share a node the later one counts.

pub mod kdtree;
mod nearest;
mod tin;

pub use kdtree::{KdTree, NearestResult};

use crate::rasterize::{empty_grid, stamp_markers, RasterizeParams, ValueScaler};
use geosplat_core::raster::Raster;
use geosplat_core::vector::{Sample, SampleSet};
use geosplat_core::{BoundingBox, Error, Result};
use std::collections::HashMap;
use tracing::{debug, warn};

/// A projected sample: grid column `x`, grid row `y`, scaled value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplePoint {
    pub x: f64,
    pub y: f64,
    pub value: f64,
}

impl SamplePoint {
    pub fn new(x: f64, y: f64, value: f64) -> Self {
        Self { x, y, value }
    }

    /// Squared Euclidean distance to another point
    #[inline]
    pub fn dist_sq(&self, other_x: f64, other_y: f64) -> f64 {
        let dx = self.x - other_x;
        let dy = self.y - other_y;
        dx * dx + dy * dy
    }
}

/// Scattered-data method used to fill the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterpolationMethod {
    /// Piecewise-linear over a Delaunay triangulation
    #[default]
    Linear,
    /// Value of the nearest sample
    Nearest,
}

/// Parameters for interpolation
#[derive(Debug, Clone, PartialEq)]
pub struct InterpolateParams {
    /// Grid layout and the markers re-drawn after filling
    pub raster: RasterizeParams,
    pub method: InterpolationMethod,
    /// Value for nodes outside the convex hull of the samples (linear only)
    pub fill_value: f64,
}

impl Default for InterpolateParams {
    fn default() -> Self {
        Self {
            raster: RasterizeParams::default(),
            method: InterpolationMethod::default(),
            fill_value: 0.0,
        }
    }
}

/// Project samples to grid nodes with scaled values, one point per node.
///
/// Points keep the order in which their node was first hit.
pub fn project_samples(
    samples: &[Sample],
    grid: &Raster<u8>,
    scaler: &ValueScaler,
) -> Vec<SamplePoint> {
    let transform = grid.transform();
    let shape = grid.shape();
    let mut slot: HashMap<(usize, usize), usize> = HashMap::with_capacity(samples.len());
    let mut points: Vec<SamplePoint> = Vec::with_capacity(samples.len());

    for sample in samples {
        let (row, col) = transform.cell_index(sample.coord, shape);
        let point = SamplePoint::new(col as f64, row as f64, scaler.scale(sample.value));
        match slot.get(&(row, col)) {
            Some(&i) => points[i] = point,
            None => {
                slot.insert((row, col), points.len());
                points.push(point);
            }
        }
    }
    points
}

/// Floating-point surface over the whole grid, row-major.
///
/// Linear falls back to nearest when the points cannot be triangulated
/// (fewer than three, or all on one line).
pub fn fill_surface(
    points: &[SamplePoint],
    shape: (usize, usize),
    method: InterpolationMethod,
    fill_value: f64,
) -> Vec<f64> {
    let (rows, cols) = shape;

    if method == InterpolationMethod::Linear {
        if points.len() >= 3 && !tin::all_collinear(points) {
            let triangles = tin::delaunay(points);
            if !triangles.is_empty() {
                debug!("Triangulated {} points into {} triangles", points.len(), triangles.len());
                let mut surface = vec![fill_value; rows * cols];
                tin::fill_triangles(points, &triangles, &mut surface, rows, cols);
                return surface;
            }
        }
        warn!(
            "{} distinct sample locations cannot be triangulated, using nearest neighbour",
            points.len()
        );
    }

    nearest::nearest_surface(points, rows, cols, fill_value)
}

/// Interpolate a sample set over its own bounding box
pub fn interpolate(samples: &SampleSet, params: &InterpolateParams) -> Result<Raster<u8>> {
    interpolate_samples(&samples.samples, &samples.bbox, params)
}

/// Interpolate `samples` over `bbox`.
///
/// 1. Allocates the grid and transform exactly as rasterization does
/// 2. Fills every node from the projected, scaled samples
/// 3. Rounds and saturates the surface to 0-255
/// 4. Re-draws every sample marker on top
pub fn interpolate_samples(
    samples: &[Sample],
    bbox: &BoundingBox,
    params: &InterpolateParams,
) -> Result<Raster<u8>> {
    params.raster.marker.validate()?;
    if samples.is_empty() {
        return Err(Error::InsufficientPoints {
            required: 1,
            found: 0,
        });
    }

    let grid = empty_grid(bbox, &params.raster)?;
    let scaler = ValueScaler::from_samples(samples)?;
    let points = project_samples(samples, &grid, &scaler);

    let surface = fill_surface(&points, grid.shape(), params.method, params.fill_value);
    let mut filled = Raster::<f64>::from_vec(surface, grid.rows(), grid.cols())?;
    filled.set_transform(*grid.transform());
    filled.set_crs(grid.crs().copied());

    let mut output = filled.map_saturating::<u8>();
    stamp_markers(&mut output, samples, &scaler, &params.raster.marker);
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterize::MarkerStyle;

    fn bbox() -> BoundingBox {
        BoundingBox::new(0.0, 0.0, 1.0, 1.0)
    }

    fn params(method: InterpolationMethod) -> InterpolateParams {
        InterpolateParams {
            raster: RasterizeParams {
                resolution: 10,
                margin: false,
                ..Default::default()
            },
            method,
            fill_value: 0.0,
        }
    }

    #[test]
    fn test_project_dedups_last_wins() {
        let grid = empty_grid(&bbox(), &params(InterpolationMethod::Linear).raster).unwrap();
        let scaler = ValueScaler::new(0.0, 10.0);
        let samples = vec![
            Sample::new(0.5, 0.5, 0.0),
            Sample::new(0.9, 0.1, 4.0),
            Sample::new(0.51, 0.49, 10.0),
        ];
        let points = project_samples(&samples, &grid, &scaler);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0], SamplePoint::new(5.0, 5.0, 255.0));
        assert_eq!(points[1].x, 1.0);
        assert_eq!(points[1].y, 1.0);
    }

    #[test]
    fn test_linear_gradient() {
        // value grows west to east, rows are uniform
        let samples = vec![
            Sample::new(0.0, 0.0, 0.0),
            Sample::new(1.0, 0.0, 0.0),
            Sample::new(0.0, 1.0, 100.0),
            Sample::new(1.0, 1.0, 100.0),
        ];
        let grid = interpolate_samples(&samples, &bbox(), &params(InterpolationMethod::Linear))
            .unwrap();
        assert_eq!(grid.shape(), (10, 10));
        // east edge clamps into column 9, so column 4 holds 255 * 4 / 9
        assert_eq!(grid.get(5, 4).unwrap(), 113);
        assert_eq!(grid.get(5, 0).unwrap(), 0);
        assert_eq!(grid.get(5, 9).unwrap(), 255);
    }

    #[test]
    fn test_collinear_falls_back_to_nearest() {
        let samples = vec![Sample::new(0.5, 0.2, 0.0), Sample::new(0.5, 0.8, 100.0)];
        let grid = interpolate_samples(&samples, &bbox(), &params(InterpolationMethod::Linear))
            .unwrap();
        // nearest fill reaches the corners instead of leaving fill_value
        assert_eq!(grid.get(0, 0).unwrap(), 0);
        assert_eq!(grid.get(0, 9).unwrap(), 255);
        assert_eq!(grid.get(9, 9).unwrap(), 255);
    }

    #[test]
    fn test_fill_value_outside_hull() {
        let samples = vec![
            Sample::new(0.9, 0.1, 100.0),
            Sample::new(0.9, 0.4, 100.0),
            Sample::new(0.6, 0.1, 0.0),
        ];
        let mut p = params(InterpolationMethod::Linear);
        p.fill_value = 17.0;
        let grid = interpolate_samples(&samples, &bbox(), &p).unwrap();
        assert_eq!(grid.get(9, 9).unwrap(), 17);
    }

    #[test]
    fn test_restamp_overrides_surface() {
        let samples = vec![
            Sample::new(0.1, 0.1, 0.0),
            Sample::new(0.1, 0.9, 0.0),
            Sample::new(0.9, 0.5, 0.0),
            Sample::new(0.5, 0.5, 100.0),
        ];
        let mut p = params(InterpolationMethod::Linear);
        p.raster.marker = MarkerStyle::SingleCell;
        let plain = interpolate_samples(&samples, &bbox(), &p).unwrap();
        assert!(plain.get(4, 4).unwrap() < 255);

        p.raster.marker = MarkerStyle::Neighborhood3x3;
        let grid = interpolate_samples(&samples, &bbox(), &p).unwrap();
        assert_eq!(grid.get(5, 5).unwrap(), 255);
        for (row, col) in [(4, 4), (4, 6), (6, 4), (6, 6)] {
            assert_eq!(grid.get(row, col).unwrap(), 255);
        }
    }

    #[test]
    fn test_empty_input() {
        let err = interpolate_samples(&[], &bbox(), &InterpolateParams::default()).unwrap_err();
        assert!(matches!(err, Error::InsufficientPoints { .. }));
    }
}

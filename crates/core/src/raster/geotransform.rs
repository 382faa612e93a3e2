//! Affine mapping between geographic coordinates and grid indices

use crate::error::{Error, Result};
use crate::extent::BoundingBox;
use geo_types::Coord;
use serde::{Deserialize, Serialize};

/// Affine transformation between lon/lat and fractional grid indices.
///
/// ```text
/// col = (lon - origin_x) / pixel_width  - offset_x
/// row = (origin_y - lat) / pixel_height - offset_y
/// ```
///
/// Rows grow southward. Both pixel sizes are positive. The offsets shift the
/// grid by a number of cells; a margin of `b` cells around the extent is
/// expressed as `offset = -floor(b / 2)` so that samples on the bounding-box
/// edge land inside the grid.
///
/// Integer indices are grid *nodes*: a sample is assigned to the cell whose
/// node is nearest, so cell `(row, col)` covers `[col - 0.5, col + 0.5)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoTransform {
    /// Longitude of grid node column 0 before offset
    pub origin_x: f64,
    /// Latitude of grid node row 0 before offset
    pub origin_y: f64,
    /// Degrees per column (> 0)
    pub pixel_width: f64,
    /// Degrees per row (> 0)
    pub pixel_height: f64,
    /// Column shift in cells
    pub offset_x: f64,
    /// Row shift in cells
    pub offset_y: f64,
}

impl GeoTransform {
    /// Create a transform with no offset
    pub fn new(origin_x: f64, origin_y: f64, pixel_width: f64, pixel_height: f64) -> Self {
        Self {
            origin_x,
            origin_y,
            pixel_width,
            pixel_height,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }

    /// Same transform shifted by `(offset_x, offset_y)` cells
    pub fn with_offset(mut self, offset_x: f64, offset_y: f64) -> Self {
        self.offset_x = offset_x;
        self.offset_y = offset_y;
        self
    }

    /// Build the transform for a bounding box rasterized at `resolution`
    /// pixels per degree, with `margin` extra cells split around the extent.
    ///
    /// Pixel sizes come from the integer grid size, not from `1/resolution`,
    /// so that the northwest corner maps to node `(0, 0)` and the southeast
    /// corner to node `(rows, cols)` exactly (before the margin shift).
    ///
    /// The shift is a whole number of cells, `floor(margin / 2)`. The corner
    /// node itself takes one of the extra cells, so a grid of
    /// `rows + margin` leaves `floor(margin / 2)` cells north and west of the
    /// extent and `ceil(margin / 2) - 1` south and east of it (for a
    /// nonzero margin).
    pub fn for_extent(bbox: &BoundingBox, resolution: u32, margin: usize) -> Result<Self> {
        let (rows, cols) = bbox.grid_size(resolution)?;
        let transform = Self::new(
            bbox.west,
            bbox.north,
            bbox.width() / cols as f64,
            bbox.height() / rows as f64,
        );
        let shift = -((margin / 2) as f64);
        let transform = transform.with_offset(shift, shift);
        transform.validate()?;
        Ok(transform)
    }

    /// Reject transforms that cannot be inverted
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("pixel_width", self.pixel_width),
            ("pixel_height", self.pixel_height),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::InvalidParameter {
                    name,
                    value: value.to_string(),
                    reason: "pixel size must be positive".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Convert geographic coordinates to fractional `(col, row)`
    pub fn geo_to_pixel(&self, lon: f64, lat: f64) -> (f64, f64) {
        let col = (lon - self.origin_x) / self.pixel_width - self.offset_x;
        let row = (self.origin_y - lat) / self.pixel_height - self.offset_y;
        (col, row)
    }

    /// Convert fractional `(col, row)` back to `(lon, lat)`
    pub fn pixel_to_geo(&self, col: f64, row: f64) -> (f64, f64) {
        let lon = self.origin_x + (col + self.offset_x) * self.pixel_width;
        let lat = self.origin_y - (row + self.offset_y) * self.pixel_height;
        (lon, lat)
    }

    /// Project a coordinate (`x` = lon, `y` = lat) to fractional `(row, col)`
    pub fn project(&self, coord: Coord<f64>) -> (f64, f64) {
        let (col, row) = self.geo_to_pixel(coord.x, coord.y);
        (row, col)
    }

    /// Nearest cell `(row, col)` for a coordinate, clamped into a grid of
    /// `shape = (rows, cols)`.
    ///
    /// Indices are rounded half away from zero, then clamped to `[0, size)`
    /// on each axis; a sample sitting exactly on the far edge of the extent
    /// therefore lands in the last cell instead of one past it.
    pub fn cell_index(&self, coord: Coord<f64>, shape: (usize, usize)) -> (usize, usize) {
        let (row, col) = self.project(coord);
        (clamp_index(row, shape.0), clamp_index(col, shape.1))
    }

    /// Whether the nearest node of `coord` falls inside `shape` without clamping
    pub fn in_grid(&self, coord: Coord<f64>, shape: (usize, usize)) -> bool {
        let (row, col) = self.project(coord);
        let (row, col) = (row.round(), col.round());
        row >= 0.0 && col >= 0.0 && row < shape.0 as f64 && col < shape.1 as f64
    }

    /// Geographic location of grid node `(row, col)`
    pub fn cell_center(&self, row: usize, col: usize) -> Coord<f64> {
        let (x, y) = self.pixel_to_geo(col as f64, row as f64);
        Coord { x, y }
    }

    /// GDAL-style coefficients `[x0, pw, 0, y0, 0, -ph]` where `(x0, y0)`
    /// is the outer corner of cell `(0, 0)`.
    pub fn to_gdal(&self) -> [f64; 6] {
        let (x0, y0) = self.pixel_to_geo(-0.5, -0.5);
        [x0, self.pixel_width, 0.0, y0, 0.0, -self.pixel_height]
    }

    /// Area covered by a grid of `shape = (rows, cols)` cells
    pub fn bounds(&self, shape: (usize, usize)) -> BoundingBox {
        let (west, north) = self.pixel_to_geo(-0.5, -0.5);
        let (east, south) = self.pixel_to_geo(shape.1 as f64 - 0.5, shape.0 as f64 - 0.5);
        BoundingBox::new(west, south, east, north)
    }
}

impl Default for GeoTransform {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0, 1.0)
    }
}

fn clamp_index(value: f64, size: usize) -> usize {
    if size == 0 || !(value.round() > 0.0) {
        return 0;
    }
    (value.round() as usize).min(size - 1)
}

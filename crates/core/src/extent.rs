//! Geographic bounding boxes and grid sizing

use crate::error::{Error, Result};
use geo_types::Coord;
use serde::{Deserialize, Serialize};

/// Mean earth radius in meters used by [`BoundingBox::edge_lengths_m`].
pub const EARTH_RADIUS_M: f64 = 6_371_009.0;

/// Relative slack applied before rounding a cell count up, so that an extent
/// of `0.1 * 3` degrees at 10 px/deg gives 3 cells and not 4.
const CEIL_TOLERANCE: f64 = 1e-12;

/// West/south/east/north extent in degrees.
///
/// Always normalized: `west <= east` and `south <= north`. A box with zero
/// width or height is representable (e.g. a single point) but rejected by
/// [`BoundingBox::validate`] and everything that sizes a grid from it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl BoundingBox {
    /// Create a bounding box, swapping edges that arrive out of order.
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west: west.min(east),
            south: south.min(north),
            east: west.max(east),
            north: south.max(north),
        }
    }

    /// Smallest box covering all coordinates (`x` = lon, `y` = lat).
    ///
    /// Returns `None` for an empty iterator.
    pub fn from_coords<I>(coords: I) -> Option<Self>
    where
        I: IntoIterator<Item = Coord<f64>>,
    {
        let mut iter = coords.into_iter();
        let first = iter.next()?;
        let mut bbox = Self::new(first.x, first.y, first.x, first.y);
        for c in iter {
            bbox.west = bbox.west.min(c.x);
            bbox.east = bbox.east.max(c.x);
            bbox.south = bbox.south.min(c.y);
            bbox.north = bbox.north.max(c.y);
        }
        Some(bbox)
    }

    /// East-west extent in degrees
    pub fn width(&self) -> f64 {
        (self.west - self.east).abs()
    }

    /// North-south extent in degrees
    pub fn height(&self) -> f64 {
        (self.north - self.south).abs()
    }

    /// Whether `(lon, lat)` lies inside or on the edge of the box
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        lon >= self.west && lon <= self.east && lat >= self.south && lat <= self.north
    }

    /// Reject boxes that cannot back a grid: non-finite edges or zero extent.
    pub fn validate(&self) -> Result<()> {
        let finite = [self.west, self.south, self.east, self.north]
            .iter()
            .all(|v| v.is_finite());
        if !finite || self.width() <= 0.0 || self.height() <= 0.0 {
            return Err(Error::DegenerateExtent {
                west: self.west,
                south: self.south,
                east: self.east,
                north: self.north,
            });
        }
        Ok(())
    }

    /// Grid size `(rows, cols)` at `resolution` pixels per degree, without margin.
    ///
    /// `cols = ceil(width * resolution)`, `rows = ceil(height * resolution)`.
    pub fn grid_size(&self, resolution: u32) -> Result<(usize, usize)> {
        self.validate()?;
        if resolution == 0 {
            return Err(Error::InvalidParameter {
                name: "resolution",
                value: resolution.to_string(),
                reason: "must be a positive number of pixels per degree".to_string(),
            });
        }
        let rows = cells_along(self.height(), resolution);
        let cols = cells_along(self.width(), resolution);
        if rows == 0 || cols == 0 {
            return Err(Error::InvalidDimensions {
                width: cols,
                height: rows,
            });
        }
        Ok((rows, cols))
    }

    /// Ground length in meters of the northern and southern edges on a
    /// spherical earth.
    ///
    /// The flat transform treats both edges as equally long; the ratio of
    /// the two values shows how much that assumption stretches the grid.
    pub fn edge_lengths_m(&self) -> (f64, f64) {
        let delta_lon = self.width().to_radians();
        let north = EARTH_RADIUS_M * self.north.to_radians().cos() * delta_lon;
        let south = EARTH_RADIUS_M * self.south.to_radians().cos() * delta_lon;
        (north, south)
    }
}

fn cells_along(extent_deg: f64, resolution: u32) -> usize {
    let raw = extent_deg * resolution as f64;
    (raw - raw * CEIL_TOLERANCE).ceil().max(0.0) as usize
}

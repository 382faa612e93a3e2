//! Marker footprints drawn for each sample

use geosplat_core::raster::{Neighborhood, Raster};
use geosplat_core::{Error, Result};

/// A larger disk drawn under a circle marker at a fixed intensity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outline {
    /// Radius in cells
    pub radius: f64,
    /// Intensity written into the ring
    pub intensity: u8,
}

/// How a sample is drawn into the grid
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum MarkerStyle {
    /// Only the cell the sample falls in
    #[default]
    SingleCell,
    /// The cell and its 8 neighbours
    Neighborhood3x3,
    /// Filled disk, optionally on top of an outline disk
    CircleSplat {
        /// Radius in cells
        radius: f64,
        outline: Option<Outline>,
    },
}

impl MarkerStyle {
    /// Circle marker sized for `resolution` pixels per degree: inner radius
    /// `resolution / 300`, and with an outline intensity given, an outline
    /// of radius `resolution / 200`.
    pub fn circle_for_resolution(resolution: u32, outline_intensity: Option<u8>) -> Self {
        let resolution = resolution as f64;
        MarkerStyle::CircleSplat {
            radius: resolution / 300.0,
            outline: outline_intensity.map(|intensity| Outline {
                radius: resolution / 200.0,
                intensity,
            }),
        }
    }

    /// Footprint of the value-carrying part of the marker
    pub fn footprint(&self) -> Neighborhood {
        match self {
            MarkerStyle::SingleCell => Neighborhood::Center,
            MarkerStyle::Neighborhood3x3 => Neighborhood::Queen3x3,
            MarkerStyle::CircleSplat { radius, .. } => Neighborhood::Disk(*radius),
        }
    }

    /// Reject negative or non-finite radii
    pub fn validate(&self) -> Result<()> {
        if let MarkerStyle::CircleSplat { radius, outline } = self {
            check_radius("marker radius", *radius)?;
            if let Some(outline) = outline {
                check_radius("outline radius", outline.radius)?;
            }
        }
        Ok(())
    }

    /// Draw the marker centered on `(row, col)`.
    ///
    /// The outline goes down first so the inner disk overwrites it. Cells
    /// beyond the grid edge are skipped. Returns the number of cells written.
    pub fn stamp(&self, grid: &mut Raster<u8>, row: usize, col: usize, value: u8) -> usize {
        let mut written = 0;
        if let MarkerStyle::CircleSplat {
            outline: Some(outline),
            ..
        } = self
        {
            written += fill(grid, row, col, &Neighborhood::Disk(outline.radius), outline.intensity);
        }
        written + fill(grid, row, col, &self.footprint(), value)
    }
}

fn check_radius(name: &'static str, radius: f64) -> Result<()> {
    if radius.is_finite() && radius >= 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidParameter {
            name,
            value: radius.to_string(),
            reason: "must be a finite, non-negative number of cells".to_string(),
        })
    }
}

fn fill(grid: &mut Raster<u8>, row: usize, col: usize, footprint: &Neighborhood, value: u8) -> usize {
    let (row, col) = (row as isize, col as isize);
    footprint
        .offsets()
        .into_iter()
        .filter(|&(dr, dc)| grid.set_clipped(row + dr, col + dc, value))
        .count()
}

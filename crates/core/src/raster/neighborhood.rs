//! Cell footprints around a center cell

/// Defines a neighborhood pattern around a cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Neighborhood {
    /// The center cell only
    Center,
    /// 3x3 neighborhood (8 neighbors + center)
    Queen3x3,
    /// Filled disk of the given radius in cells.
    ///
    /// A cell belongs to the disk when its squared distance from the center
    /// is strictly below `radius²`; the center always belongs, so a radius
    /// below one cell degrades to [`Neighborhood::Center`].
    Disk(f64),
}

impl Neighborhood {
    /// Largest absolute row/column offset in the footprint
    pub fn radius(&self) -> usize {
        match self {
            Neighborhood::Center => 0,
            Neighborhood::Queen3x3 => 1,
            Neighborhood::Disk(r) if r.is_finite() && *r > 0.0 => r.ceil() as usize,
            Neighborhood::Disk(_) => 0,
        }
    }

    /// Check if a relative position is within this neighborhood
    pub fn contains(&self, dr: isize, dc: isize) -> bool {
        if dr == 0 && dc == 0 {
            return true;
        }
        match self {
            Neighborhood::Center => false,
            Neighborhood::Queen3x3 => dr.abs() <= 1 && dc.abs() <= 1,
            Neighborhood::Disk(r) => ((dr * dr + dc * dc) as f64) < r * r,
        }
    }

    /// Relative `(dr, dc)` positions in this neighborhood, row-major
    pub fn offsets(&self) -> Vec<(isize, isize)> {
        let r = self.radius() as isize;
        let mut offsets = Vec::new();

        for dr in -r..=r {
            for dc in -r..=r {
                if self.contains(dr, dc) {
                    offsets.push((dr, dc));
                }
            }
        }

        offsets
    }
}

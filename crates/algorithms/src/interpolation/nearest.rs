//! Nearest Neighbor interpolation
//!
//! Assigns each grid node the value of the closest projected sample,
//! producing a Voronoi-like tessellation. Rows are filled in parallel when
//! the `parallel` feature is on.

use crate::maybe_rayon::*;

use super::kdtree::KdTree;
use super::SamplePoint;

/// Nearest-sample value for every node of a `rows` x `cols` grid, row-major.
///
/// `points` are in grid space (`x` = column, `y` = row). With no points
/// every node gets `fill_value`.
pub(crate) fn nearest_surface(
    points: &[SamplePoint],
    rows: usize,
    cols: usize,
    fill_value: f64,
) -> Vec<f64> {
    let tree = KdTree::build(points);

    (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            (0..cols)
                .map(|col| {
                    tree.nearest(col as f64, row as f64)
                        .map_or(fill_value, |n| n.point.value)
                })
                .collect::<Vec<f64>>()
        })
        .collect()
}
